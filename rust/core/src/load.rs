// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STL entry points: classify, size-check and decode in one forward pass

use crate::ascii::decode_ascii;
use crate::binary::decode_records;
use crate::error::Result;
use crate::sniff::{check_binary_size, classify_reader, StlKind};
use crate::vertex::RawVertex;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Seek, SeekFrom};
use std::path::Path;

/// Decode the file at `path` using an already known classification.
///
/// Binary files are size-checked against `triangle_count` before any
/// buffer is sized from it.
pub fn decode<P: AsRef<Path>>(path: P, kind: StlKind) -> Result<Vec<RawVertex>> {
    let file = File::open(path.as_ref())?;
    let len = file.metadata()?.len();
    decode_stream(BufReader::new(file), len, kind)
}

/// Sniff and decode the STL file at `path`
pub fn read_stl<P: AsRef<Path>>(path: P) -> Result<Vec<RawVertex>> {
    read_stl_classified(path).map(|(_, vertices)| vertices)
}

/// Like [`read_stl`], also returning the detected encoding
pub fn read_stl_classified<P: AsRef<Path>>(path: P) -> Result<(StlKind, Vec<RawVertex>)> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let len = file.metadata()?.len();
    let mut reader = BufReader::new(file);

    let kind = classify_reader(&mut reader)?;
    tracing::debug!(path = %path.display(), ?kind, bytes = len, "Classified STL file");

    reader.seek(SeekFrom::Start(0))?;
    let vertices = decode_stream(reader, len, kind)?;
    Ok((kind, vertices))
}

/// Sniff and decode an in-memory STL buffer
pub fn parse_stl(bytes: &[u8]) -> Result<Vec<RawVertex>> {
    let mut cursor = Cursor::new(bytes);
    let kind = classify_reader(&mut cursor)?;
    cursor.set_position(0);
    decode_stream(cursor, bytes.len() as u64, kind)
}

fn decode_stream<R: BufRead>(reader: R, len: u64, kind: StlKind) -> Result<Vec<RawVertex>> {
    match kind {
        StlKind::Ascii => decode_ascii(reader),
        StlKind::Binary { triangle_count } => {
            check_binary_size(len, triangle_count)?;
            decode_records(reader, triangle_count, triangle_count as usize)
        }
    }
}
