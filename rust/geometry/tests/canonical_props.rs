// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property tests for vertex canonicalization

use meshvol_geometry::{canonicalize, compare_vertices, Mesh, RawVertex};
use proptest::prelude::*;
use std::cmp::Ordering;

/// Coordinates on a coarse integer grid so duplicates are common
fn grid_vertex() -> impl Strategy<Value = RawVertex> {
    (-3i8..=3, -3i8..=3, -3i8..=3)
        .prop_map(|(x, y, z)| RawVertex::new(f32::from(x), f32::from(y), f32::from(z)))
}

fn triangles() -> impl Strategy<Value = Vec<RawVertex>> {
    prop::collection::vec(
        (grid_vertex(), grid_vertex(), grid_vertex()),
        0..120,
    )
    .prop_map(|tris| tris.into_iter().flat_map(|(a, b, c)| [a, b, c]).collect())
}

proptest! {
    #[test]
    fn indices_cover_input_and_stay_in_range(raw in triangles()) {
        let canonical = canonicalize(raw.clone()).unwrap();
        prop_assert_eq!(canonical.indices.len(), raw.len());
        prop_assert!(canonical.vertices.len() <= raw.len());
        for &i in &canonical.indices {
            prop_assert!((i as usize) < canonical.vertices.len());
        }
    }

    #[test]
    fn indices_reconstruct_every_position(raw in triangles()) {
        let canonical = canonicalize(raw.clone()).unwrap();
        for (vertex, &i) in raw.iter().zip(&canonical.indices) {
            prop_assert_eq!(canonical.vertices[i as usize], vertex.position());
        }
    }

    #[test]
    fn unique_vertices_are_strictly_sorted(raw in triangles()) {
        let canonical = canonicalize(raw).unwrap();
        for pair in canonical.vertices.windows(2) {
            let (a, b) = (RawVertex::from(pair[0]), RawVertex::from(pair[1]));
            prop_assert_eq!(compare_vertices(&a, &b), Ordering::Less);
        }
    }

    #[test]
    fn canonical_vertices_are_a_fixed_point(raw in triangles()) {
        let once = canonicalize(raw).unwrap();
        let again = canonicalize(once.vertices.iter().copied().map(RawVertex::from).collect()).unwrap();
        prop_assert_eq!(&again.vertices, &once.vertices);
        let identity: Vec<u32> = (0..once.vertices.len() as u32).collect();
        prop_assert_eq!(again.indices, identity);
    }

    #[test]
    fn canonicalizing_twice_changes_nothing(raw in triangles()) {
        let once = Mesh::from_raw_vertices(raw).unwrap();
        let again: Vec<RawVertex> = once
            .triangles()
            .flat_map(|t| [t.p1, t.p2, t.p3])
            .map(|p| RawVertex::new(p.x as f32, p.y as f32, p.z as f32))
            .collect();
        let twice = Mesh::from_raw_vertices(again).unwrap();
        prop_assert_eq!(once, twice);
    }
}
