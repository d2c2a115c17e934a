// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! ASCII STL decoder
//!
//! Single forward pass over the lines of:
//!
//! ```text
//! solid name
//!   facet normal ni nj nk
//!     outer loop
//!       vertex v1x v1y v1z
//!       vertex v2x v2y v2z
//!       vertex v3x v3y v3z
//!     endloop
//!   endfacet
//! endsolid name
//! ```
//!
//! Only `vertex` lines produce output. Facet normals are recognized and
//! dropped; `outer loop`, `endloop`, `solid` and `endsolid` are ignored.

use crate::error::{Error, Result};
use crate::vertex::RawVertex;
use std::io::{self, BufRead};

const VERTEX: &[u8] = b"vertex";
const FACET: &[u8] = b"facet";
const NORMAL: &[u8] = b"normal";
const ENDFACET: &[u8] = b"endfacet";

/// Split a line on ASCII whitespace, skipping empty runs
#[inline]
fn tokens(line: &[u8]) -> impl Iterator<Item = &[u8]> {
    line.split(|b| b.is_ascii_whitespace()).filter(|t| !t.is_empty())
}

/// Parse one coordinate token as f32
#[inline]
fn parse_coordinate(token: Option<&[u8]>, axis: char, line: usize) -> Result<f32> {
    let token = token.ok_or_else(|| {
        Error::parse(line, format!("vertex is missing its {} coordinate", axis))
    })?;

    fast_float::parse::<f32, _>(token).map_err(|_| {
        Error::parse(
            line,
            format!(
                "invalid {} coordinate '{}'",
                axis,
                String::from_utf8_lossy(token)
            ),
        )
    })
}

/// Read the next line into `buf` without its terminator.
///
/// A line ends at `\n`, `\r` or `\r\n`; `skip_lf` carries a pending `\r`
/// across calls so `\r\n` counts as one line even when split between
/// buffer fills. Returns `false` once the stream is exhausted.
fn next_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>, skip_lf: &mut bool) -> io::Result<bool> {
    buf.clear();
    let mut read_any = false;

    loop {
        let chunk = reader.fill_buf()?;
        if chunk.is_empty() {
            return Ok(read_any);
        }

        if *skip_lf {
            *skip_lf = false;
            if chunk[0] == b'\n' {
                reader.consume(1);
                continue;
            }
        }

        match memchr::memchr2(b'\n', b'\r', chunk) {
            Some(end) => {
                buf.extend_from_slice(&chunk[..end]);
                *skip_lf = chunk[end] == b'\r';
                reader.consume(end + 1);
                return Ok(true);
            }
            None => {
                let len = chunk.len();
                buf.extend_from_slice(chunk);
                reader.consume(len);
                read_any = true;
            }
        }
    }
}

/// Decode an ASCII STL stream into raw vertices, three per facet, in file order.
pub fn decode_ascii<R: BufRead>(mut reader: R) -> Result<Vec<RawVertex>> {
    let mut vertices = Vec::new();
    let mut line = Vec::with_capacity(128);
    let mut line_no = 0usize;
    let mut skip_lf = false;
    // (line of `facet normal`, vertex count when the facet opened)
    let mut open_facet: Option<(usize, usize)> = None;

    loop {
        if !next_line(&mut reader, &mut line, &mut skip_lf)? {
            break;
        }
        line_no += 1;

        let mut words = tokens(&line);
        let Some(keyword) = words.next() else {
            continue;
        };

        if keyword == VERTEX {
            let x = parse_coordinate(words.next(), 'x', line_no)?;
            let y = parse_coordinate(words.next(), 'y', line_no)?;
            let z = parse_coordinate(words.next(), 'z', line_no)?;
            vertices.push(RawVertex::new(x, y, z));
        } else if keyword == FACET {
            if words.next() == Some(NORMAL) {
                open_facet = Some((line_no, vertices.len()));
            }
        } else if keyword == ENDFACET {
            if let Some((facet_line, first_vertex)) = open_facet.take() {
                let count = vertices.len() - first_vertex;
                if count != 3 {
                    return Err(Error::parse(
                        line_no,
                        format!(
                            "facet opened at line {} has {} vertices, expected 3",
                            facet_line, count
                        ),
                    ));
                }
            }
        }
    }

    if vertices.len() % 3 != 0 {
        return Err(Error::parse(
            line_no,
            format!(
                "{} vertices do not form whole triangles",
                vertices.len()
            ),
        ));
    }

    tracing::debug!(
        lines = line_no,
        triangles = vertices.len() / 3,
        "Decoded ASCII STL"
    );

    Ok(vertices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TRIANGLE: &str = "solid test
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
endsolid test
";

    #[test]
    fn test_single_facet() {
        let vertices = decode_ascii(Cursor::new(TRIANGLE)).unwrap();
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[1].position(), [1.0, 0.0, 0.0]);
        assert_eq!(vertices[2].position(), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_crlf_tabs_and_exponents() {
        let text = "solid x\r\n\tfacet normal 0 0 -1\r\n\t\tvertex\t1.5e2  -2.25E-1 3\r\n\t\tvertex 0 0 0\r\n\t\tvertex 1 1 1\r\n\tendfacet\r\nendsolid\r\n";
        let vertices = decode_ascii(Cursor::new(text)).unwrap();
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[0].position(), [150.0, -0.225, 3.0]);
    }

    #[test]
    fn test_cr_only_line_endings() {
        let text = TRIANGLE.replace('\n', "\r");
        let vertices = decode_ascii(Cursor::new(text)).unwrap();
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[2].position(), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_line_numbers_with_mixed_endings() {
        // \r\n is one line, a bare \r is another
        let text = "solid x\r\n facet normal 0 0 1\r  outer loop\n   vertex 0 0 0\r\n   vertex 1 bad 0\r";
        let err = decode_ascii(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 5, .. }), "{:?}", err);
    }

    #[test]
    fn test_crlf_split_across_buffer_fills() {
        let text = TRIANGLE.replace('\n', "\r\n");
        // A two-byte buffer separates most \r from their \n
        let reader = std::io::BufReader::with_capacity(2, text.as_bytes());
        assert_eq!(decode_ascii(reader).unwrap().len(), 3);

        let err = decode_ascii(std::io::BufReader::with_capacity(
            2,
            text.replace("vertex 1 0 0", "vertex 1 x 0").as_bytes(),
        ))
        .unwrap_err();
        assert!(matches!(err, Error::Parse { line: 5, .. }), "{:?}", err);
    }

    #[test]
    fn test_normal_is_not_parsed() {
        // A garbage normal must not fail the decode
        let text = TRIANGLE.replace("facet normal 0 0 1", "facet normal nope nope nope");
        assert_eq!(decode_ascii(Cursor::new(text)).unwrap().len(), 3);
    }

    #[test]
    fn test_bad_coordinate_reports_line() {
        let text = TRIANGLE.replace("vertex 1 0 0", "vertex 1 zero 0");
        match decode_ascii(Cursor::new(text)).unwrap_err() {
            Error::Parse { line, message } => {
                assert_eq!(line, 5);
                assert!(message.contains("zero"), "{}", message);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_coordinate() {
        let text = TRIANGLE.replace("vertex 0 1 0", "vertex 0 1");
        let err = decode_ascii(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 6, .. }));
    }

    #[test]
    fn test_facet_with_wrong_vertex_count() {
        let text = TRIANGLE.replace("      vertex 0 1 0\n", "");
        let err = decode_ascii(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 7, .. }), "{:?}", err);
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        // Upper-case VERTEX lines are not vertex records
        let text = TRIANGLE.replace("vertex", "VERTEX");
        let err = decode_ascii(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_empty_solid() {
        let vertices = decode_ascii(Cursor::new("solid empty\nendsolid empty\n")).unwrap();
        assert!(vertices.is_empty());
    }
}
