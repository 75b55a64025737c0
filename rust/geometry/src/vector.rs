// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vector helpers shared by the simplifier and the deriver
//!
//! Thin wrappers over nalgebra that pin down the degenerate cases: a vector
//! shorter than [`EPSILON`] normalizes to zero instead of NaN, and angles
//! involving a zero vector are reported as zero.

use nalgebra::{Point3, Rotation3, Unit, Vector3};

/// Length below which a vector or segment is considered degenerate (model units)
pub const EPSILON: f64 = 1e-6;

/// Rotation below which a marker is considered already aligned (radians)
pub const ANGLE_EPSILON: f64 = 1e-9;

/// The model's vertical axis
#[inline]
pub fn up() -> Vector3<f64> {
    Vector3::z()
}

/// Normalize `v`, or return the zero vector when `|v| < EPSILON`
#[inline]
pub fn normalize_or_zero(v: &Vector3<f64>) -> Vector3<f64> {
    let len = v.norm();
    if len < EPSILON {
        Vector3::zeros()
    } else {
        v.unscale(len)
    }
}

/// Unsigned angle between two vectors in `[0, π]`
///
/// Uses `atan2(|a × b|, a · b)`, which stays accurate for nearly parallel
/// vectors where `acos` loses most of its digits. Returns 0 when either
/// vector is degenerate.
pub fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    if a.norm() < EPSILON || b.norm() < EPSILON {
        return 0.0;
    }
    a.cross(b).norm().atan2(a.dot(b))
}

/// Signed angle from `from` to `to` measured around `axis` (right-hand rule)
///
/// Both vectors are projected onto the plane perpendicular to `axis` first.
pub fn signed_angle_on_plane(from: &Vector3<f64>, to: &Vector3<f64>, axis: &Vector3<f64>) -> f64 {
    let n = normalize_or_zero(axis);
    let a = from - n * from.dot(&n);
    let b = to - n * to.dot(&n);
    if a.norm() < EPSILON || b.norm() < EPSILON {
        return 0.0;
    }
    n.dot(&a.cross(&b)).atan2(a.dot(&b))
}

/// Perpendicular distance from `p` to the infinite line through `origin` along unit `dir`
#[inline]
pub fn distance_to_line(origin: &Point3<f64>, dir: &Vector3<f64>, p: &Point3<f64>) -> f64 {
    let t = (p - origin).dot(dir);
    let projected = origin + dir * t;
    (p - projected).norm()
}

/// Rotate `point` by `angle` radians about the axis through `center`
///
/// A degenerate axis leaves the point unchanged.
pub fn rotate_about(point: &Point3<f64>, center: &Point3<f64>, axis: &Vector3<f64>, angle: f64) -> Point3<f64> {
    let unit_axis = match Unit::try_new(*axis, EPSILON) {
        Some(a) => a,
        None => return *point,
    };
    let rotation = Rotation3::from_axis_angle(&unit_axis, angle);
    center + rotation * (point - center)
}

/// Midpoint of two points
#[inline]
pub fn midpoint(a: &Point3<f64>, b: &Point3<f64>) -> Point3<f64> {
    nalgebra::center(a, b)
}
