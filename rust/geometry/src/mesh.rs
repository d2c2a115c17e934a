// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Indexed triangle mesh

use crate::bounds::Bounds;
use crate::canonical::canonicalize;
use crate::error::{Error, Result};
use crate::triangle::Triangle;
use meshvol_core::{read_stl_classified, Facet, RawVertex, StlFormat, StlKind};
use nalgebra::Point3;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;

/// Immutable indexed triangle mesh
///
/// Every position is unique and every index addresses a position. Built
/// once by [`Mesh::from_raw_vertices`] or [`Mesh::from_parts`] and never
/// modified afterwards, so it can be shared freely across threads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions (x, y, z)
    positions: Vec<f32>,
    /// Triangle indices (i0, i1, i2)
    indices: Vec<u32>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a mesh from decoded raw vertices.
    ///
    /// Consecutive triples form triangles in file order; exact duplicate
    /// positions are merged.
    pub fn from_raw_vertices(raw: Vec<RawVertex>) -> Result<Self> {
        if raw.len() % 3 != 0 {
            return Err(Error::InvalidMesh(format!(
                "{} raw vertices do not form whole triangles",
                raw.len()
            )));
        }

        let canonical = canonicalize(raw)?;
        let positions = canonical.vertices.into_iter().flatten().collect();

        Ok(Self {
            positions,
            indices: canonical.indices,
        })
    }

    /// Build a mesh from existing buffers, checking their shape
    pub fn from_parts(positions: Vec<f32>, indices: Vec<u32>) -> Result<Self> {
        if positions.len() % 3 != 0 {
            return Err(Error::InvalidMesh(format!(
                "position buffer length {} is not a multiple of 3",
                positions.len()
            )));
        }
        if indices.len() % 3 != 0 {
            return Err(Error::InvalidMesh(format!(
                "index buffer length {} is not a multiple of 3",
                indices.len()
            )));
        }

        let vertex_count = positions.len() / 3;
        if let Some(bad) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(Error::InvalidMesh(format!(
                "index {} out of range for {} vertices",
                bad, vertex_count
            )));
        }

        Ok(Self { positions, indices })
    }

    /// Read, decode and canonicalize the STL file at `path`
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_classified(path).map(|(_, mesh)| mesh)
    }

    /// Like [`Mesh::load`], also returning the detected encoding
    pub fn load_classified<P: AsRef<Path>>(path: P) -> Result<(StlKind, Self)> {
        let path = path.as_ref();
        let start = Instant::now();

        let (kind, raw) = read_stl_classified(path)?;
        let raw_vertices = raw.len();
        let mesh = Self::from_raw_vertices(raw)?;

        tracing::info!(
            path = %path.display(),
            triangles = mesh.triangle_count(),
            ascii = kind.is_ascii(),
            raw_vertices,
            unique_vertices = mesh.vertex_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Loaded STL mesh"
        );

        Ok((kind, mesh))
    }

    /// Flat `[x, y, z, ...]` positions
    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Flat `[i0, i1, i2, ...]` triangle indices
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh has no triangles
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Position of vertex `index` widened to f64
    ///
    /// # Panics
    /// If `index >= vertex_count()`.
    #[inline]
    pub fn vertex(&self, index: usize) -> Point3<f64> {
        let p = &self.positions[index * 3..index * 3 + 3];
        Point3::new(p[0] as f64, p[1] as f64, p[2] as f64)
    }

    /// Triangle `t` with double-precision corners
    ///
    /// # Panics
    /// If `t >= triangle_count()`.
    #[inline]
    pub fn triangle(&self, t: usize) -> Triangle {
        let i = &self.indices[t * 3..t * 3 + 3];
        Triangle::new(
            self.vertex(i[0] as usize),
            self.vertex(i[1] as usize),
            self.vertex(i[2] as usize),
        )
    }

    /// Iterate over all triangles in file order
    pub fn triangles(&self) -> impl ExactSizeIterator<Item = Triangle> + '_ {
        (0..self.triangle_count()).map(move |t| self.triangle(t))
    }

    /// Triangles as single-precision corner triples, ready for encoding
    pub fn facets(&self) -> impl ExactSizeIterator<Item = Facet> + '_ {
        self.indices.chunks_exact(3).map(move |tri| {
            [0, 1, 2].map(|k| {
                let at = tri[k] as usize * 3;
                [
                    self.positions[at],
                    self.positions[at + 1],
                    self.positions[at + 2],
                ]
            })
        })
    }

    /// Axis-aligned bounds of all vertices, `None` for an empty mesh
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_positions(&self.positions)
    }

    /// Copy of this mesh with every triangle's winding reversed
    pub fn flipped(&self) -> Self {
        let mut indices = self.indices.clone();
        for tri in indices.chunks_exact_mut(3) {
            tri.swap(1, 2);
        }
        Self {
            positions: self.positions.clone(),
            indices,
        }
    }

    /// Write the mesh as STL. The file stem becomes the solid name.
    pub fn write_stl<P: AsRef<Path>>(&self, path: P, format: StlFormat) -> Result<()> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("mesh");

        let file = File::create(path).map_err(meshvol_core::Error::from)?;
        meshvol_core::write_stl(BufWriter::new(file), format, name, self.facets())?;

        tracing::debug!(
            path = %path.display(),
            ?format,
            triangles = self.triangle_count(),
            "Wrote STL mesh"
        );
        Ok(())
    }

    /// Consume the mesh, returning its position and index buffers
    pub fn into_parts(self) -> (Vec<f32>, Vec<u32>) {
        (self.positions, self.indices)
    }
}

/// Assemble a mesh from decoded raw vertices
pub fn assemble(raw: Vec<RawVertex>) -> Result<Mesh> {
    Mesh::from_raw_vertices(raw)
}

/// Load an STL file into a canonical mesh
pub fn load_mesh<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    Mesh::load(path)
}
