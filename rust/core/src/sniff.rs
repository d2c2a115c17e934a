// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Format Sniffer - ASCII vs binary STL detection
//!
//! Detection is text-first: a first line free of NUL bytes whose first token
//! is `solid` (any case) makes the file ASCII. Everything else is read as a
//! binary preamble and carries its declared triangle count.
//!
//! Binary headers are arbitrary bytes, so a binary file whose header happens
//! to start with `solid` and contains no NUL before the first newline will
//! be classified as ASCII. That ambiguity belongs to the STL format itself
//! and the detection order is kept as is.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::Path;

/// Size of the arbitrary binary header
pub const HEADER_SIZE: usize = 80;

/// Header plus the little-endian `u32` triangle count
pub const PREAMBLE_SIZE: usize = HEADER_SIZE + 4;

/// normal (12) + three vertices (36) + attribute byte count (2)
pub const TRIANGLE_RECORD_SIZE: usize = 50;

const SOLID: &[u8] = b"solid";

/// Encoding of an STL file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StlKind {
    Ascii,
    Binary { triangle_count: u32 },
}

impl StlKind {
    pub fn is_ascii(&self) -> bool {
        matches!(self, StlKind::Ascii)
    }
}

/// Classify the STL file at `path`
pub fn classify<P: AsRef<Path>>(path: P) -> Result<StlKind> {
    let file = File::open(path.as_ref())?;
    let mut reader = BufReader::new(file);
    classify_reader(&mut reader)
}

/// Classify a seekable STL stream. The stream position afterwards is
/// unspecified; callers rewind before decoding.
pub fn classify_reader<R: BufRead + Seek>(reader: &mut R) -> Result<StlKind> {
    reader.seek(SeekFrom::Start(0))?;
    if first_line_is_solid(reader)? {
        tracing::debug!("STL first line starts with 'solid', treating as ASCII");
        return Ok(StlKind::Ascii);
    }

    reader.seek(SeekFrom::Start(0))?;
    let mut preamble = [0u8; PREAMBLE_SIZE];
    if let Err(e) = reader.read_exact(&mut preamble) {
        return match e.kind() {
            io::ErrorKind::UnexpectedEof => Err(Error::format(format!(
                "not an ASCII STL and shorter than the {}-byte binary preamble",
                PREAMBLE_SIZE
            ))),
            _ => Err(e.into()),
        };
    }

    let triangle_count = read_triangle_count(&preamble);
    tracing::debug!(triangle_count, "STL classified as binary");
    Ok(StlKind::Binary { triangle_count })
}

/// Declared triangle count stored in bytes 80..84 (little-endian)
#[inline]
pub fn read_triangle_count(preamble: &[u8; PREAMBLE_SIZE]) -> u32 {
    u32::from_le_bytes([
        preamble[HEADER_SIZE],
        preamble[HEADER_SIZE + 1],
        preamble[HEADER_SIZE + 2],
        preamble[HEADER_SIZE + 3],
    ])
}

/// Cross-check a declared binary triangle count against the file length.
///
/// Uses integer division like every common STL reader, so up to 49 bytes of
/// trailing padding are tolerated. Must run before anything is allocated
/// from `triangle_count`.
pub fn check_binary_size(file_len: u64, triangle_count: u32) -> Result<()> {
    let preamble = PREAMBLE_SIZE as u64;
    let records_in_file = file_len.checked_sub(preamble).map(|body| body / TRIANGLE_RECORD_SIZE as u64);

    if records_in_file == Some(u64::from(triangle_count)) {
        Ok(())
    } else {
        Err(Error::format(format!(
            "no 'solid' header and declared triangle count {} does not match file size {} (expected {} bytes)",
            triangle_count,
            file_len,
            binary_len(triangle_count)
        )))
    }
}

/// Exact byte length of a binary STL holding `triangle_count` records
#[inline]
pub fn binary_len(triangle_count: u32) -> u64 {
    PREAMBLE_SIZE as u64 + u64::from(triangle_count) * TRIANGLE_RECORD_SIZE as u64
}

/// Scan the first line (ended by `\n` or `\r`), stopping early on a NUL byte.
///
/// Only the first whitespace-delimited token is kept, so a binary file with
/// no newline in it is never buffered whole.
fn first_line_is_solid<R: BufRead>(reader: &mut R) -> io::Result<bool> {
    let mut token: Vec<u8> = Vec::with_capacity(SOLID.len() + 1);
    let mut token_done = false;

    loop {
        let chunk = reader.fill_buf()?;
        if chunk.is_empty() {
            break;
        }

        let line_end = memchr::memchr2(b'\n', b'\r', chunk);
        let line = &chunk[..line_end.unwrap_or(chunk.len())];

        if memchr::memchr(0, line).is_some() {
            return Ok(false);
        }

        if !token_done {
            for &b in line {
                if b.is_ascii_whitespace() {
                    if !token.is_empty() {
                        token_done = true;
                        break;
                    }
                } else if token.len() > SOLID.len() {
                    token_done = true;
                    break;
                } else {
                    token.push(b);
                }
            }
        }

        let consumed = line_end.map_or(chunk.len(), |i| i + 1);
        reader.consume(consumed);
        if line_end.is_some() {
            break;
        }
    }

    Ok(token.eq_ignore_ascii_case(SOLID))
}
