// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Triangle resolved to double-precision corners

use nalgebra::{Point3, Vector3};

/// One mesh face, corners in winding order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub p1: Point3<f64>,
    pub p2: Point3<f64>,
    pub p3: Point3<f64>,
}

impl Triangle {
    /// Create a new triangle
    pub fn new(p1: Point3<f64>, p2: Point3<f64>, p3: Point3<f64>) -> Self {
        Self { p1, p2, p3 }
    }

    /// Signed volume of the tetrahedron spanned by the origin and this face.
    ///
    /// Positive for counter-clockwise winding seen from outside the origin.
    #[inline]
    pub fn signed_volume(&self) -> f64 {
        self.p1.coords.dot(&self.p2.coords.cross(&self.p3.coords)) / 6.0
    }

    /// Same face with opposite winding
    #[inline]
    pub fn reversed(&self) -> Self {
        Self::new(self.p1, self.p3, self.p2)
    }

    /// Unnormalized face normal (length is twice the area)
    pub fn cross(&self) -> Vector3<f64> {
        (self.p2 - self.p1).cross(&(self.p3 - self.p1))
    }

    /// Calculate triangle area
    pub fn area(&self) -> f64 {
        self.cross().norm() * 0.5
    }
}
