// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boundary curve primitives
//!
//! A room or wall outline arrives from the host as an ordered loop of lines
//! and arcs. Arcs are horizontal in this domain: their `normal` is the
//! rotation axis (±Z) and the arc runs counter-clockwise around it from
//! `start` to `end`.

use std::f64::consts::TAU;

use nalgebra::{Point3, Vector3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::vector::{self, EPSILON};

/// Straight boundary segment
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LineSegment {
    pub start: Point3<f64>,
    pub end: Point3<f64>,
}

impl LineSegment {
    pub fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self { start, end }
    }

    /// Build a line whose endpoints are further apart than `tolerance`
    pub fn try_new(start: Point3<f64>, end: Point3<f64>, tolerance: f64) -> Result<Self> {
        let length = (end - start).norm();
        if length <= tolerance {
            return Err(Error::DegenerateLine { length, tolerance });
        }
        Ok(Self { start, end })
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Unit direction from start to end (zero vector for a degenerate line)
    pub fn direction(&self) -> Vector3<f64> {
        vector::normalize_or_zero(&(self.end - self.start))
    }

    pub fn midpoint(&self) -> Point3<f64> {
        vector::midpoint(&self.start, &self.end)
    }

    pub fn reversed(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
        }
    }
}

/// Circular arc around `normal`, running counter-clockwise from `start` to `end`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArcSegment {
    pub center: Point3<f64>,
    pub start: Point3<f64>,
    pub end: Point3<f64>,
    pub normal: Vector3<f64>,
}

impl ArcSegment {
    pub fn new(center: Point3<f64>, start: Point3<f64>, end: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            center,
            start,
            end,
            normal,
        }
    }

    /// Build an arc, rejecting a zero radius, unequal endpoint radii or a zero normal
    pub fn try_new(
        center: Point3<f64>,
        start: Point3<f64>,
        end: Point3<f64>,
        normal: Vector3<f64>,
    ) -> Result<Self> {
        let r0 = (start - center).norm();
        let r1 = (end - center).norm();
        if r0 <= EPSILON {
            return Err(Error::DegenerateArc(format!("radius {} is too small", r0)));
        }
        if (r0 - r1).abs() > EPSILON.max(r0 * 1e-9) {
            return Err(Error::DegenerateArc(format!(
                "endpoints are at different radii ({} vs {})",
                r0, r1
            )));
        }
        if normal.norm() < EPSILON {
            return Err(Error::DegenerateArc("normal has zero length".into()));
        }
        Ok(Self::new(center, start, end, normal))
    }

    /// Horizontal arc at the height of `center`
    ///
    /// A negative `sweep` produces a clockwise arc (normal −Z).
    pub fn horizontal(center: Point3<f64>, radius: f64, start_angle: f64, sweep: f64) -> Self {
        let at = |angle: f64| {
            Point3::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
                center.z,
            )
        };
        let normal = if sweep < 0.0 { -vector::up() } else { vector::up() };
        Self::new(center, at(start_angle), at(start_angle + sweep), normal)
    }

    pub fn radius(&self) -> f64 {
        (self.start - self.center).norm()
    }

    /// Swept angle in `(0, 2π]`
    pub fn sweep_angle(&self) -> f64 {
        let angle = vector::signed_angle_on_plane(
            &(self.start - self.center),
            &(self.end - self.center),
            &self.normal,
        );
        if angle <= vector::ANGLE_EPSILON {
            angle + TAU
        } else {
            angle
        }
    }

    pub fn length(&self) -> f64 {
        self.radius() * self.sweep_angle()
    }

    /// Point at `fraction` of the sweep (0 = start, 1 = end)
    pub fn point_at(&self, fraction: f64) -> Point3<f64> {
        vector::rotate_about(
            &self.start,
            &self.center,
            &self.normal,
            self.sweep_angle() * fraction,
        )
    }

    pub fn midpoint(&self) -> Point3<f64> {
        self.point_at(0.5)
    }

    pub fn reversed(&self) -> Self {
        Self {
            center: self.center,
            start: self.end,
            end: self.start,
            normal: -self.normal,
        }
    }
}

/// A single boundary primitive
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CurvePrimitive {
    Line(LineSegment),
    Arc(ArcSegment),
}

impl CurvePrimitive {
    pub fn line(start: Point3<f64>, end: Point3<f64>) -> Self {
        CurvePrimitive::Line(LineSegment::new(start, end))
    }

    pub fn arc(center: Point3<f64>, start: Point3<f64>, end: Point3<f64>, normal: Vector3<f64>) -> Self {
        CurvePrimitive::Arc(ArcSegment::new(center, start, end, normal))
    }

    /// Arc length for arcs, chord length for lines
    pub fn length(&self) -> f64 {
        match self {
            CurvePrimitive::Line(line) => line.length(),
            CurvePrimitive::Arc(arc) => arc.length(),
        }
    }

    pub fn start_point(&self) -> Point3<f64> {
        match self {
            CurvePrimitive::Line(line) => line.start,
            CurvePrimitive::Arc(arc) => arc.start,
        }
    }

    pub fn end_point(&self) -> Point3<f64> {
        match self {
            CurvePrimitive::Line(line) => line.end,
            CurvePrimitive::Arc(arc) => arc.end,
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            CurvePrimitive::Line(line) => CurvePrimitive::Line(line.reversed()),
            CurvePrimitive::Arc(arc) => CurvePrimitive::Arc(arc.reversed()),
        }
    }

    pub fn as_line(&self) -> Option<&LineSegment> {
        match self {
            CurvePrimitive::Line(line) => Some(line),
            CurvePrimitive::Arc(_) => None,
        }
    }

    pub fn is_line(&self) -> bool {
        matches!(self, CurvePrimitive::Line(_))
    }
}

impl From<LineSegment> for CurvePrimitive {
    fn from(line: LineSegment) -> Self {
        CurvePrimitive::Line(line)
    }
}

impl From<ArcSegment> for CurvePrimitive {
    fn from(arc: ArcSegment) -> Self {
        CurvePrimitive::Arc(arc)
    }
}

/// Ordered traversal of a room or wall outline
///
/// Order matters: simplification only merges neighbours in this sequence.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoundaryLoop {
    curves: Vec<CurvePrimitive>,
}

impl BoundaryLoop {
    pub fn new(curves: Vec<CurvePrimitive>) -> Self {
        Self { curves }
    }

    /// Build a loop of lines through `points`, closing back to the first point if `closed`
    pub fn from_points(points: &[Point3<f64>], closed: bool) -> Self {
        let mut curves: Vec<CurvePrimitive> = points
            .windows(2)
            .map(|pair| CurvePrimitive::line(pair[0], pair[1]))
            .collect();
        if closed && points.len() > 2 {
            curves.push(CurvePrimitive::line(points[points.len() - 1], points[0]));
        }
        Self { curves }
    }

    pub fn curves(&self) -> &[CurvePrimitive] {
        &self.curves
    }

    pub fn into_curves(self) -> Vec<CurvePrimitive> {
        self.curves
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CurvePrimitive> {
        self.curves.iter()
    }

    /// Same outline traversed the other way round
    pub fn reversed(&self) -> Self {
        Self {
            curves: self.curves.iter().rev().map(CurvePrimitive::reversed).collect(),
        }
    }

    /// Total length of all primitives
    pub fn perimeter(&self) -> f64 {
        self.curves.iter().map(CurvePrimitive::length).sum()
    }
}

impl From<Vec<CurvePrimitive>> for BoundaryLoop {
    fn from(curves: Vec<CurvePrimitive>) -> Self {
        Self::new(curves)
    }
}

impl FromIterator<CurvePrimitive> for BoundaryLoop {
    fn from_iter<I: IntoIterator<Item = CurvePrimitive>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a BoundaryLoop {
    type Item = &'a CurvePrimitive;
    type IntoIter = std::slice::Iter<'a, CurvePrimitive>;

    fn into_iter(self) -> Self::IntoIter {
        self.curves.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_line_basics() {
        let line = LineSegment::new(Point3::new(0.0, 0.0, 0.0), Point3::new(4.0, 0.0, 0.0));
        assert_relative_eq!(line.length(), 4.0);
        assert_relative_eq!(line.direction().x, 1.0);
        assert_relative_eq!(line.midpoint().x, 2.0);
        assert_eq!(line.reversed().start, line.end);
    }

    #[test]
    fn test_degenerate_line_rejected() {
        let p = Point3::new(1.0, 1.0, 0.0);
        let err = LineSegment::try_new(p, p, 1e-3).unwrap_err();
        assert!(matches!(err, Error::DegenerateLine { .. }));
    }

    #[test]
    fn test_quarter_arc_length() {
        let arc = ArcSegment::horizontal(Point3::new(0.0, 0.0, 0.0), 2.0, 0.0, FRAC_PI_2);
        assert_relative_eq!(arc.sweep_angle(), FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(arc.length(), PI, epsilon = 1e-12);

        let mid = arc.midpoint();
        assert_relative_eq!(mid.x, 2.0_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(mid.y, 2.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_major_arc_sweep() {
        // 270° counter-clockwise: must not be folded back to 90°
        let arc = ArcSegment::horizontal(Point3::origin(), 1.0, 0.0, 1.5 * PI);
        assert_relative_eq!(arc.sweep_angle(), 1.5 * PI, epsilon = 1e-12);
    }

    #[test]
    fn test_clockwise_arc_reversal() {
        let arc = ArcSegment::horizontal(Point3::origin(), 1.0, FRAC_PI_2, -FRAC_PI_2);
        assert_relative_eq!(arc.sweep_angle(), FRAC_PI_2, epsilon = 1e-12);

        let back = arc.reversed();
        assert_relative_eq!(back.sweep_angle(), FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(back.length(), arc.length(), epsilon = 1e-12);
    }

    #[test]
    fn test_arc_validation() {
        let c = Point3::origin();
        let bad = ArcSegment::try_new(c, Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 2.0, 0.0), Vector3::z());
        assert!(bad.is_err());

        let good = ArcSegment::try_new(c, Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0), Vector3::z());
        assert!(good.is_ok());
    }

    #[test]
    fn test_loop_from_points_and_reverse() {
        let pts = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(4.0, 3.0, 0.0),
        ];
        let lp = BoundaryLoop::from_points(&pts, true);
        assert_eq!(lp.len(), 3);
        assert_relative_eq!(lp.perimeter(), 12.0);

        let rev = lp.reversed();
        assert_eq!(rev.curves()[0].start_point(), pts[0]);
        assert_eq!(rev.curves()[0].end_point(), pts[2]);
    }
}
