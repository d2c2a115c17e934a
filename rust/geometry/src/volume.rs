// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Enclosed volume by signed tetrahedra
//!
//! Every triangle forms a tetrahedron with the origin. Summing their signed
//! volumes cancels everything outside a closed, consistently wound surface,
//! leaving the enclosed volume. The sum is accumulated in f64 even though
//! positions are stored as f32.

use crate::mesh::Mesh;

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

/// Triangle count above which the sum is split across the rayon pool
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 200;

/// Tuning for volume integration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeOptions {
    /// Meshes with more triangles than this are summed in parallel
    pub parallel_threshold: usize,
}

impl Default for VolumeOptions {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl VolumeOptions {
    /// Always sum on the calling thread
    pub fn sequential() -> Self {
        Self {
            parallel_threshold: usize::MAX,
        }
    }
}

fn sequential_sum(mesh: &Mesh) -> f64 {
    mesh.triangles().map(|t| t.signed_volume()).sum()
}

#[cfg(not(target_arch = "wasm32"))]
fn parallel_sum(mesh: &Mesh) -> f64 {
    (0..mesh.triangle_count())
        .into_par_iter()
        .map(|t| mesh.triangle(t).signed_volume())
        .sum()
}

// No thread pool on wasm32
#[cfg(target_arch = "wasm32")]
fn parallel_sum(mesh: &Mesh) -> f64 {
    sequential_sum(mesh)
}

/// Signed enclosed volume with default options.
///
/// Positive for outward-facing winding, negative when every face is
/// reversed. An empty mesh has volume zero.
pub fn signed_volume(mesh: &Mesh) -> f64 {
    signed_volume_with(mesh, &VolumeOptions::default())
}

/// Signed enclosed volume
pub fn signed_volume_with(mesh: &Mesh, options: &VolumeOptions) -> f64 {
    let triangles = mesh.triangle_count();
    let parallel = triangles > options.parallel_threshold;

    let volume = if parallel {
        parallel_sum(mesh)
    } else {
        sequential_sum(mesh)
    };

    tracing::debug!(triangles, parallel, volume, "Integrated signed volume");
    volume
}

/// Enclosed volume (absolute value of the signed sum)
pub fn compute_volume(mesh: &Mesh) -> f64 {
    signed_volume(mesh).abs()
}

/// Enclosed volume with explicit options
pub fn compute_volume_with(mesh: &Mesh, options: &VolumeOptions) -> f64 {
    signed_volume_with(mesh, options).abs()
}

impl Mesh {
    /// See [`compute_volume`]
    pub fn volume(&self) -> f64 {
        compute_volume(self)
    }

    /// See [`signed_volume`]
    pub fn signed_volume(&self) -> f64 {
        signed_volume(self)
    }
}
