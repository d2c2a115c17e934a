// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! STL encoder (binary and ASCII)
//!
//! Facet normals are recomputed from the vertex winding. Coordinates in the
//! ASCII flavour use the shortest round-trip representation, so decoding a
//! written file reproduces every vertex bit for bit.

use crate::error::Result;
use crate::sniff::HEADER_SIZE;
use std::io::{self, Write};

/// Three vertex positions in winding order
pub type Facet = [[f32; 3]; 3];

/// Output encoding for [`write_stl`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StlFormat {
    Ascii,
    #[default]
    Binary,
}

/// Write `triangles` in the requested encoding
pub fn write_stl<W, I>(writer: W, format: StlFormat, name: &str, triangles: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = Facet>,
    I::IntoIter: ExactSizeIterator,
{
    match format {
        StlFormat::Ascii => write_ascii(writer, name, triangles),
        StlFormat::Binary => write_binary(writer, name, triangles),
    }
}

/// Write a binary STL. `header` is truncated to 80 bytes and NUL padded.
pub fn write_binary<W, I>(mut writer: W, header: &str, triangles: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = Facet>,
    I::IntoIter: ExactSizeIterator,
{
    let triangles = triangles.into_iter();
    let count = u32::try_from(triangles.len()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "binary STL cannot hold more than u32::MAX triangles",
        )
    })?;

    let mut head = [0u8; HEADER_SIZE];
    let text = header.as_bytes();
    let n = text.len().min(HEADER_SIZE);
    head[..n].copy_from_slice(&text[..n]);
    writer.write_all(&head)?;
    writer.write_all(&count.to_le_bytes())?;

    let mut record = [0u8; 50];
    for facet in triangles {
        let normal = facet_normal(&facet);
        let mut at = 0;
        for c in normal.iter().chain(facet.iter().flatten()) {
            record[at..at + 4].copy_from_slice(&c.to_le_bytes());
            at += 4;
        }
        record[48..50].copy_from_slice(&0u16.to_le_bytes());
        writer.write_all(&record)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write an ASCII STL
pub fn write_ascii<W, I>(mut writer: W, name: &str, triangles: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = Facet>,
{
    writeln!(writer, "solid {}", name)?;

    for facet in triangles {
        let [nx, ny, nz] = facet_normal(&facet);
        writeln!(writer, "  facet normal {} {} {}", nx, ny, nz)?;
        writeln!(writer, "    outer loop")?;
        for [x, y, z] in facet {
            writeln!(writer, "      vertex {} {} {}", x, y, z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }

    writeln!(writer, "endsolid {}", name)?;
    writer.flush()?;
    Ok(())
}

/// Unit normal from the winding, zero for degenerate facets
fn facet_normal(facet: &Facet) -> [f32; 3] {
    let [a, b, c] = facet.map(|p| p.map(f64::from));
    let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let n = [
        e1[1] * e2[2] - e1[2] * e2[1],
        e1[2] * e2[0] - e1[0] * e2[2],
        e1[0] * e2[1] - e1[1] * e2[0],
    ];
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len > f64::EPSILON {
        n.map(|c| (c / len) as f32)
    } else {
        [0.0; 3]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRI: Facet = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];

    #[test]
    fn test_binary_layout() {
        let mut out = Vec::new();
        write_binary(&mut out, "unit", vec![TRI, TRI]).unwrap();
        assert_eq!(out.len(), 84 + 2 * 50);
        assert_eq!(&out[..4], b"unit");
        assert!(out[4..80].iter().all(|&b| b == 0));
        assert_eq!(u32::from_le_bytes([out[80], out[81], out[82], out[83]]), 2);
        // normal of the first record points along +z
        let nz = f32::from_le_bytes([out[92], out[93], out[94], out[95]]);
        assert_eq!(nz, 1.0);
    }

    #[test]
    fn test_long_header_is_truncated() {
        let mut out = Vec::new();
        let header = "h".repeat(200);
        write_binary(&mut out, &header, Vec::<Facet>::new()).unwrap();
        assert_eq!(out.len(), 84);
    }

    #[test]
    fn test_ascii_keywords() {
        let mut out = Vec::new();
        write_ascii(&mut out, "part", [TRI]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("solid part\n"));
        assert!(text.contains("facet normal 0 0 1\n"));
        assert!(text.contains("vertex 1 0 0\n"));
        assert!(text.ends_with("endsolid part\n"));
    }

    #[test]
    fn test_degenerate_normal_is_zero() {
        let flat: Facet = [[1.0, 1.0, 1.0]; 3];
        assert_eq!(facet_normal(&flat), [0.0, 0.0, 0.0]);
    }
}
