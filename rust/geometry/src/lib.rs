// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # meshvol Geometry
//!
//! Turns the raw vertex stream decoded by `meshvol-core` into an indexed
//! [`Mesh`] and measures the volume it encloses.
//!
//! - [`canonicalize`] merges exact duplicate vertices with a parallel
//!   stable sort followed by a linear merge
//! - [`Mesh`] holds unique f32 positions and u32 triangle indices
//! - [`compute_volume`] sums signed tetrahedra in f64, in parallel above
//!   [`VolumeOptions::parallel_threshold`] triangles
//!
//! ```rust,ignore
//! use meshvol_geometry::{compute_volume, Mesh};
//!
//! let mesh = Mesh::load("part.stl")?;
//! println!("{} triangles, volume {:.3}", mesh.triangle_count(), compute_volume(&mesh));
//! ```

pub mod bounds;
pub mod canonical;
pub mod error;
pub mod mesh;
pub mod triangle;
pub mod volume;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};

pub use bounds::Bounds;
pub use canonical::{canonicalize, compare_vertices, Canonical};
pub use error::{Error, Result};
pub use mesh::{assemble, load_mesh, Mesh};
pub use meshvol_core::{RawVertex, StlFormat};
pub use triangle::Triangle;
pub use volume::{
    compute_volume, compute_volume_with, signed_volume, signed_volume_with, VolumeOptions,
    DEFAULT_PARALLEL_THRESHOLD,
};
