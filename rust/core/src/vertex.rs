// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Raw vertex occurrences as they appear in an STL file

/// One vertex occurrence, three per triangle, in file order.
///
/// `origin` is scratch space for canonicalization: it holds the position of
/// this vertex in the decoded sequence once the canonicalizer tags it, and is
/// `0` straight out of the decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub origin: usize,
}

impl RawVertex {
    #[inline]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, origin: 0 }
    }

    #[inline]
    pub fn position(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Exact component-wise equality (`-0.0 == 0.0`, NaN never matches)
    #[inline]
    pub fn same_position(&self, other: &RawVertex) -> bool {
        self.x == other.x && self.y == other.y && self.z == other.z
    }
}

impl From<[f32; 3]> for RawVertex {
    #[inline]
    fn from(p: [f32; 3]) -> Self {
        Self::new(p[0], p[1], p[2])
    }
}
