// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Binary STL decoder
//!
//! ```text
//! UINT8[80]    header (ignored)
//! UINT32       triangle count
//! foreach triangle
//!     REAL32[3] normal (ignored)
//!     REAL32[3] vertex 1
//!     REAL32[3] vertex 2
//!     REAL32[3] vertex 3
//!     UINT16    attribute byte count (ignored)
//! end
//! ```
//!
//! All multi-byte fields are little-endian regardless of host byte order.

use crate::error::{Error, Result};
use crate::sniff::{PREAMBLE_SIZE, TRIANGLE_RECORD_SIZE};
use crate::vertex::RawVertex;
use std::io::{self, Read};

/// Records reserved up front when the stream length is unknown
const MAX_UNCHECKED_RESERVE: usize = 1 << 16;

/// Offset of the first vertex inside a record (after the normal)
const VERTEX_OFFSET: usize = 12;

#[inline]
fn le_f32(bytes: &[u8], at: usize) -> f32 {
    f32::from_bits(u32::from_le_bytes([
        bytes[at],
        bytes[at + 1],
        bytes[at + 2],
        bytes[at + 3],
    ]))
}

#[inline]
fn read_vertex(record: &[u8; TRIANGLE_RECORD_SIZE], at: usize) -> RawVertex {
    RawVertex::new(
        le_f32(record, at),
        le_f32(record, at + 4),
        le_f32(record, at + 8),
    )
}

/// Decode a binary STL stream positioned at its first byte.
///
/// The length of `reader` is unknown here, so only a bounded number of
/// records is reserved before they actually arrive. A stream that ends
/// before `triangle_count` records fails with [`Error::Truncated`].
pub fn decode_binary<R: Read>(reader: R, triangle_count: u32) -> Result<Vec<RawVertex>> {
    let reserve = (triangle_count as usize).min(MAX_UNCHECKED_RESERVE);
    decode_records(reader, triangle_count, reserve)
}

/// Decode with an explicit record reservation. `reserve` must only exceed
/// [`MAX_UNCHECKED_RESERVE`] once the count has been checked against the
/// real stream length.
pub(crate) fn decode_records<R: Read>(
    mut reader: R,
    triangle_count: u32,
    reserve: usize,
) -> Result<Vec<RawVertex>> {
    let mut preamble = [0u8; PREAMBLE_SIZE];
    reader.read_exact(&mut preamble).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => Error::format(format!(
            "binary STL shorter than its {}-byte preamble",
            PREAMBLE_SIZE
        )),
        _ => Error::Io(e),
    })?;

    let mut vertices = Vec::with_capacity(reserve.saturating_mul(3));
    let mut record = [0u8; TRIANGLE_RECORD_SIZE];

    for triangle in 0..triangle_count {
        if let Err(e) = reader.read_exact(&mut record) {
            return Err(match e.kind() {
                io::ErrorKind::UnexpectedEof => Error::Truncated {
                    triangle,
                    offset: PREAMBLE_SIZE as u64
                        + u64::from(triangle) * TRIANGLE_RECORD_SIZE as u64,
                },
                _ => Error::Io(e),
            });
        }

        vertices.push(read_vertex(&record, VERTEX_OFFSET));
        vertices.push(read_vertex(&record, VERTEX_OFFSET + 12));
        vertices.push(read_vertex(&record, VERTEX_OFFSET + 24));
    }

    tracing::debug!(triangles = triangle_count, "Decoded binary STL");

    Ok(vertices)
}
