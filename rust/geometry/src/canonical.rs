// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vertex canonicalization (sort-then-merge deduplication)
//!
//! STL stores every triangle with its own copy of each corner, so a closed
//! surface repeats each vertex once per adjacent triangle. Duplicates coming
//! out of one tessellation are bit-identical, which lets us deduplicate by
//! sorting on exact coordinates and merging runs of equal neighbours, in
//! `O(n log n)` and without hashing floats.

use crate::error::{Error, Result};
use meshvol_core::RawVertex;
use std::cmp::Ordering;

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

/// Deduplicated vertex table plus, for every raw vertex, its canonical slot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Canonical {
    /// Unique positions in ascending (x, y, z) order
    pub vertices: Vec<[f32; 3]>,
    /// `indices[i]` is the slot in `vertices` raw vertex `i` was merged into
    pub indices: Vec<u32>,
}

/// Exact per-axis order: equal values (including `-0.0 == 0.0`) tie,
/// everything else follows the IEEE total order.
#[inline]
fn cmp_axis(a: f32, b: f32) -> Ordering {
    if a == b {
        Ordering::Equal
    } else {
        a.total_cmp(&b)
    }
}

/// Lexicographic x, then y, then z
#[inline]
pub fn compare_vertices(a: &RawVertex, b: &RawVertex) -> Ordering {
    cmp_axis(a.x, b.x)
        .then_with(|| cmp_axis(a.y, b.y))
        .then_with(|| cmp_axis(a.z, b.z))
}

// Stable sort: exact duplicates keep input order, so the first occurrence
// becomes the canonical representative on every run.
#[cfg(not(target_arch = "wasm32"))]
fn sort_vertices(vertices: &mut [RawVertex]) {
    vertices.par_sort_by(compare_vertices);
}

#[cfg(target_arch = "wasm32")]
fn sort_vertices(vertices: &mut [RawVertex]) {
    vertices.sort_by(compare_vertices);
}

/// Deduplicate a raw vertex stream.
///
/// `indices.len() == raw.len()` and every index is `< vertices.len()`.
/// An empty input yields an empty result.
pub fn canonicalize(mut raw: Vec<RawVertex>) -> Result<Canonical> {
    if raw.is_empty() {
        return Ok(Canonical::default());
    }
    if raw.len() > u32::MAX as usize {
        return Err(Error::TooManyVertices(raw.len()));
    }

    for (i, vertex) in raw.iter_mut().enumerate() {
        vertex.origin = i;
    }

    sort_vertices(&mut raw);

    let mut indices = vec![0u32; raw.len()];
    let mut vertices: Vec<[f32; 3]> = Vec::with_capacity(raw.len() / 2);
    let mut last: Option<&RawVertex> = None;

    for vertex in &raw {
        if !last.is_some_and(|prev| prev.same_position(vertex)) {
            vertices.push(vertex.position());
            last = Some(vertex);
        }
        indices[vertex.origin] = (vertices.len() - 1) as u32;
    }

    tracing::debug!(
        raw_vertices = raw.len(),
        unique_vertices = vertices.len(),
        "Canonicalized vertices"
    );

    Ok(Canonical { vertices, indices })
}
