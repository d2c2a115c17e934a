// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared fixtures: closed test solids written to temporary STL files

#![allow(dead_code)]

use meshvol_core::{write_stl, Facet, StlFormat};
use std::f64::consts::PI;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Split a quad given counter-clockwise from outside into two facets
fn quad(a: [f32; 3], b: [f32; 3], c: [f32; 3], d: [f32; 3]) -> [Facet; 2] {
    [[a, b, c], [a, c, d]]
}

/// Axis-aligned unit cube `[0, 1]^3`, outward winding, 12 facets
pub fn unit_cube() -> Vec<Facet> {
    let faces = [
        // z = 0
        quad([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
        // z = 1
        quad([0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]),
        // y = 0
        quad([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]),
        // y = 1
        quad([0.0, 1.0, 0.0], [0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0]),
        // x = 0
        quad([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0]),
        // x = 1
        quad([1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0], [1.0, 0.0, 1.0]),
    ];
    faces.into_iter().flatten().collect()
}

/// Angular step whose chord stays within `tolerance` of a circle of `radius`
fn angular_step(radius: f64, tolerance: f64) -> f64 {
    let ratio = (1.0 - tolerance / radius).clamp(-1.0, 1.0);
    2.0 * ratio.acos()
}

/// UV sphere centred on the origin, outward winding.
///
/// Ring points are computed once and shared by index, so every repeated
/// corner is bit-identical across the facets that use it.
pub fn uv_sphere(radius: f64, tolerance: f64) -> Vec<Facet> {
    let step = angular_step(radius, tolerance);
    let segments = ((2.0 * PI / step).ceil() as usize).max(3);
    let stacks = ((PI / step).ceil() as usize).max(2);

    let top = [0.0, 0.0, radius as f32];
    let bottom = [0.0, 0.0, -radius as f32];

    // rings[i][j]: ring i + 1 from the top pole, segment j
    let rings: Vec<Vec<[f32; 3]>> = (1..stacks)
        .map(|i| {
            let phi = PI * i as f64 / stacks as f64;
            let (rho, z) = (radius * phi.sin(), radius * phi.cos());
            (0..segments)
                .map(|j| {
                    let theta = 2.0 * PI * j as f64 / segments as f64;
                    [
                        (rho * theta.cos()) as f32,
                        (rho * theta.sin()) as f32,
                        z as f32,
                    ]
                })
                .collect()
        })
        .collect();

    let mut facets = Vec::with_capacity(2 * segments * stacks);
    let first = &rings[0];
    let last = &rings[rings.len() - 1];

    for j in 0..segments {
        let k = (j + 1) % segments;
        facets.push([top, first[j], first[k]]);
        facets.push([bottom, last[k], last[j]]);
    }

    for pair in rings.windows(2) {
        let (upper, lower) = (&pair[0], &pair[1]);
        for j in 0..segments {
            let k = (j + 1) % segments;
            facets.extend(quad(upper[j], lower[j], lower[k], upper[k]));
        }
    }

    facets
}

/// Same facets with every winding reversed
pub fn reversed(facets: &[Facet]) -> Vec<Facet> {
    facets.iter().map(|&[a, b, c]| [a, c, b]).collect()
}

/// Encode `facets` to `dir/name`
pub fn write_facets(dir: &Path, name: &str, facets: &[Facet], format: StlFormat) -> PathBuf {
    let path = dir.join(name);
    let file = File::create(&path).unwrap();
    write_stl(BufWriter::new(file), format, name, facets.iter().copied()).unwrap();
    path
}

/// Closed-form volume of a sphere
pub fn sphere_volume(radius: f64) -> f64 {
    4.0 / 3.0 * PI * radius.powi(3)
}
