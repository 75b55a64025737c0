// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Section and elevation derivation from boundary primitives
//!
//! Every simplified boundary primitive becomes one or more views looking
//! from inside the room at that piece of wall:
//!
//! - **Lines** map to exactly one view. The inward normal (toward the room's
//!   reference point) decides which side the viewer stands on.
//! - **Arcs** are first replaced by a polyline offset by `indent` from the
//!   arc, then each polyline segment is treated as a line.
//!
//! In section mode the result is an oriented box; in elevation mode it is a
//! marker point, a view direction and a crop rectangle.

use nalgebra::{Point3, Vector3};
use smallvec::SmallVec;

use crate::curve::{ArcSegment, CurvePrimitive};
use crate::vector::{self, EPSILON};
use crate::view::{ElevationSpec, VerticalRange, ViewBoxSpec, ViewGeometry, ViewMode};

/// Shallowest section depth in front of the cut: 50 mm in feet
pub const DEFAULT_MIN_DEPTH: f64 = 50.0 / 304.8;

/// Threshold between offsetting arc test points toward or away from the arc center (degrees)
///
/// Calibrated on architectural floor plans; 45° itself selects "toward".
pub const ARC_SIDE_THRESHOLD_DEG: f64 = 45.0;

/// Default number of segments an arc is split into
pub const DEFAULT_CURVE_SEGMENTS: i32 = 5;

/// Most segments an arc is split into
pub const MAX_CURVE_SEGMENTS: i32 = 360;

/// Shared parameters for deriving the views of one boundary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeriveParams {
    /// Distance between the boundary and the cut plane / marker
    pub indent: f64,
    /// Distance the view looks past the boundary
    pub projection_depth: f64,
    /// Lower bound for the forward depth of a section box
    pub min_depth_floor: f64,
    /// Arc subdivision count, clamped to `1..=MAX_CURVE_SEGMENTS`
    pub curve_segments: i32,
    /// Absolute vertical extent, margins already applied
    pub vertical: VerticalRange,
    /// Reference point inside the boundary (room center, picked side point)
    pub center: Point3<f64>,
    pub mode: ViewMode,
}

impl DeriveParams {
    pub fn new(center: Point3<f64>, vertical: VerticalRange, mode: ViewMode) -> Self {
        Self {
            indent: 0.0,
            projection_depth: 0.0,
            min_depth_floor: DEFAULT_MIN_DEPTH,
            curve_segments: DEFAULT_CURVE_SEGMENTS,
            vertical,
            center,
            mode,
        }
    }

    pub fn with_indent(mut self, indent: f64) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_projection_depth(mut self, projection_depth: f64) -> Self {
        self.projection_depth = projection_depth;
        self
    }

    pub fn with_curve_segments(mut self, curve_segments: i32) -> Self {
        self.curve_segments = curve_segments;
        self
    }

    pub fn with_min_depth_floor(mut self, min_depth_floor: f64) -> Self {
        self.min_depth_floor = min_depth_floor;
        self
    }

    pub fn with_center(mut self, center: Point3<f64>) -> Self {
        self.center = center;
        self
    }

    /// Negative indents are treated as zero
    #[inline]
    fn effective_indent(&self) -> f64 {
        self.indent.max(0.0)
    }

    #[inline]
    fn depth_floor(&self) -> f64 {
        self.min_depth_floor.max(0.0)
    }

    #[inline]
    fn segment_count(&self) -> usize {
        self.curve_segments.clamp(1, MAX_CURVE_SEGMENTS) as usize
    }
}

/// Horizontal normal of a segment with direction `dir`, pointing toward `to_center`
///
/// A vertical (or zero) direction has no horizontal normal; the Y axis is
/// returned unflipped in that case.
pub fn inward_normal(dir: &Vector3<f64>, to_center: &Vector3<f64>) -> Vector3<f64> {
    let n = dir.cross(&vector::up());
    let len = n.norm();
    if len < EPSILON {
        return Vector3::y();
    }

    let n = n / len;
    if n.dot(to_center) < 0.0 {
        -n
    } else {
        n
    }
}

/// Derive the views for one simplified boundary primitive
pub fn derive_views(curve: &CurvePrimitive, params: &DeriveParams) -> Vec<ViewGeometry> {
    match curve {
        CurvePrimitive::Line(line) => derive_segment(&line.start, &line.end, params).into_iter().collect(),
        CurvePrimitive::Arc(arc) => subdivide_arc(arc, params)
            .windows(2)
            .filter_map(|pair| derive_segment(&pair[0], &pair[1], params))
            .collect(),
    }
}

/// Derive the views for a whole simplified boundary, in boundary order
pub fn derive_all(curves: &[CurvePrimitive], params: &DeriveParams) -> Vec<ViewGeometry> {
    curves.iter().flat_map(|curve| derive_views(curve, params)).collect()
}

/// Polyline that replaces an arc, offset by `indent` to the side facing the reference point
///
/// The test points (arc endpoints moved `indent` toward the arc center)
/// decide the side: if the direction center→test-midpoint and
/// reference→test-midpoint differ by at most 45°, the reference point is
/// on the concave side and the polyline runs inside the arc; otherwise it
/// runs outside. The start point is then rotated about the arc axis in
/// `curve_segments` equal steps; the last point is the offset end point.
pub fn subdivide_arc(arc: &ArcSegment, params: &DeriveParams) -> SmallVec<[Point3<f64>; 8]> {
    let indent = params.effective_indent();
    let center = arc.center;
    let toward_center = |p: &Point3<f64>| vector::normalize_or_zero(&(center - p));

    let start_in = arc.start + toward_center(&arc.start) * indent;
    let end_in = arc.end + toward_center(&arc.end) * indent;

    let test_mid = vector::midpoint(&start_in, &end_in);
    let from_arc_center = vector::normalize_or_zero(&(test_mid - center));
    let from_reference = vector::normalize_or_zero(&(test_mid - params.center));
    let side_angle = vector::angle_between(&from_arc_center, &from_reference).to_degrees();

    let (start, end) = if side_angle <= ARC_SIDE_THRESHOLD_DEG {
        (start_in, end_in)
    } else {
        (
            arc.start - toward_center(&arc.start) * indent,
            arc.end - toward_center(&arc.end) * indent,
        )
    };

    let segments = params.segment_count();
    let step = arc.sweep_angle() / segments as f64;

    let mut points = SmallVec::with_capacity(segments + 1);
    points.push(start);
    for i in 1..segments {
        points.push(vector::rotate_about(&start, &center, &arc.normal, step * i as f64));
    }
    points.push(end);
    points
}

/// View for the straight segment `a→b`, or `None` if it is degenerate
fn derive_segment(a: &Point3<f64>, b: &Point3<f64>, params: &DeriveParams) -> Option<ViewGeometry> {
    let width = (b - a).norm();
    if width <= EPSILON {
        return None;
    }

    let dir = (b - a) / width;
    let mid = vector::midpoint(a, b);
    let inward = inward_normal(&dir, &(params.center - mid));

    Some(match params.mode {
        ViewMode::Section => ViewGeometry::Section(section_box(&mid, width, &inward, params)),
        ViewMode::Elevation => ViewGeometry::Elevation(elevation(&mid, width, &inward, params)),
    })
}

/// Section box looking from inside the room outward, centered on the segment
fn section_box(mid: &Point3<f64>, width: f64, inward: &Vector3<f64>, params: &DeriveParams) -> ViewBoxSpec {
    let indent = params.effective_indent();
    let (y_min, y_max) = params.vertical.ordered();

    let basis_z = -inward;
    let basis_y = vector::up();
    let basis_x = vector::normalize_or_zero(&basis_y.cross(&basis_z));

    let depth_forward = (params.projection_depth - indent).max(params.depth_floor());

    ViewBoxSpec {
        origin: Point3::new(mid.x, mid.y, 0.0),
        basis_x,
        basis_y,
        basis_z,
        min: Vector3::new(-width / 2.0, y_min, -indent),
        max: Vector3::new(width / 2.0, y_max, depth_forward),
    }
}

/// Elevation marker `indent` inside the room, cropped to the segment's width and the vertical range
fn elevation(mid: &Point3<f64>, width: f64, inward: &Vector3<f64>, params: &DeriveParams) -> ElevationSpec {
    let (y_min, y_max) = params.vertical.ordered();

    let marker_point = mid + inward * params.effective_indent();
    let right = vector::normalize_or_zero(&vector::up().cross(inward));

    let p1 = Point3::new(marker_point.x, marker_point.y, y_min) - right * (width / 2.0);
    let p2 = Point3::new(p1.x, p1.y, y_max);
    let p3 = p2 + right * width;
    let p4 = Point3::new(p3.x, p3.y, p1.z);

    let far_offset = if params.projection_depth > 0.0 {
        params.projection_depth
    } else {
        params.depth_floor()
    };

    ElevationSpec {
        marker_point,
        view_direction: -inward,
        crop_polygon: [p1, p2, p3, p4],
        far_offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn params(mode: ViewMode) -> DeriveParams {
        DeriveParams::new(Point3::new(2.0, 2.0, 0.0), VerticalRange::new(0.0, 3.0), mode)
            .with_indent(0.5)
            .with_projection_depth(2.0)
    }

    #[test]
    fn test_inward_normal_points_to_center() {
        let n = inward_normal(&Vector3::x(), &Vector3::new(0.0, 5.0, 0.0));
        assert_relative_eq!(n.y, 1.0);

        let n = inward_normal(&Vector3::x(), &Vector3::new(0.0, -5.0, 0.0));
        assert_relative_eq!(n.y, -1.0);
    }

    #[test]
    fn test_inward_normal_vertical_fallback() {
        let n = inward_normal(&Vector3::z(), &Vector3::new(0.0, -5.0, 0.0));
        assert_eq!(n, Vector3::y());
    }

    #[test]
    fn test_section_box_for_bottom_wall() {
        // Wall along the bottom edge, room above it
        let line = CurvePrimitive::line(Point3::new(0.0, 0.0, 0.0), Point3::new(4.0, 0.0, 0.0));
        let views = derive_views(&line, &params(ViewMode::Section));
        assert_eq!(views.len(), 1);

        let b = views[0].as_section().unwrap();
        assert_relative_eq!(b.width(), 4.0);
        assert_relative_eq!(b.height(), 3.0);
        assert_relative_eq!(b.min.z, -0.5);
        assert_relative_eq!(b.max.z, 1.5);
        // Looking from inside the room toward the wall: -Y
        assert_relative_eq!(b.basis_z.y, -1.0);
        assert_relative_eq!(b.origin.x, 2.0);
        assert!(b.is_orthonormal(1e-9));
    }

    #[test]
    fn test_section_depth_floor() {
        let line = CurvePrimitive::line(Point3::new(0.0, 0.0, 0.0), Point3::new(4.0, 0.0, 0.0));
        let p = params(ViewMode::Section).with_projection_depth(0.0);
        let views = derive_views(&line, &p);
        let b = views[0].as_section().unwrap();
        assert_relative_eq!(b.max.z, DEFAULT_MIN_DEPTH);
    }

    #[test]
    fn test_elevation_for_bottom_wall() {
        let line = CurvePrimitive::line(Point3::new(0.0, 0.0, 1.0), Point3::new(4.0, 0.0, 1.0));
        let views = derive_views(&line, &params(ViewMode::Elevation));
        let e = views[0].as_elevation().unwrap();

        assert_relative_eq!(e.marker_point.x, 2.0);
        assert_relative_eq!(e.marker_point.y, 0.5);
        assert_relative_eq!(e.marker_point.z, 1.0);
        assert_relative_eq!(e.view_direction.y, -1.0);
        assert_relative_eq!(e.crop_width(), 4.0);
        assert_relative_eq!(e.crop_height(), 3.0);
        assert_relative_eq!(e.far_offset, 2.0);

        let [p1, p2, _, p4] = e.crop_polygon;
        assert_relative_eq!(p1.z, 0.0);
        assert_relative_eq!(p2.z, 3.0);
        assert_relative_eq!(p1.y, 0.5);
        assert_relative_eq!(p4.y, 0.5);
    }

    #[test]
    fn test_degenerate_line_yields_nothing() {
        let p = Point3::new(1.0, 1.0, 0.0);
        let views = derive_views(&CurvePrimitive::line(p, p), &params(ViewMode::Section));
        assert!(views.is_empty());
    }

    #[test]
    fn test_concave_arc_offsets_inward() {
        // Quarter arc around the room center: reference sits on the concave side
        let arc = ArcSegment::horizontal(Point3::origin(), 5.0, 0.0, FRAC_PI_2);
        let p = params(ViewMode::Section).with_center(Point3::origin()).with_curve_segments(3);

        let pts = subdivide_arc(&arc, &p);
        assert_eq!(pts.len(), 4);
        for pt in &pts {
            assert_relative_eq!(pt.coords.norm(), 4.5, epsilon = 1e-9);
        }
        assert_relative_eq!(pts[3].y, 4.5, epsilon = 1e-9);
    }

    #[test]
    fn test_arc_bulging_into_room_offsets_outward() {
        // Rounded corner seen from a room on its convex side
        let arc = ArcSegment::horizontal(Point3::origin(), 5.0, 0.0, FRAC_PI_2);
        let p = params(ViewMode::Section)
            .with_center(Point3::new(20.0, 20.0, 0.0))
            .with_curve_segments(2);

        let pts = subdivide_arc(&arc, &p);
        assert_eq!(pts.len(), 3);
        for pt in &pts {
            assert_relative_eq!(pt.coords.norm(), 5.5, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_arc_segment_count_clamped() {
        let arc = ArcSegment::horizontal(Point3::origin(), 5.0, 0.0, PI / 3.0);
        let p = params(ViewMode::Section).with_center(Point3::origin()).with_curve_segments(-4);

        assert_eq!(subdivide_arc(&arc, &p).len(), 2);
        assert_eq!(derive_views(&CurvePrimitive::Arc(arc), &p).len(), 1);

        let p = p.with_curve_segments(2_000_000_000);
        assert_eq!(subdivide_arc(&arc, &p).len(), MAX_CURVE_SEGMENTS as usize + 1);
    }

    #[test]
    fn test_arc_views_face_the_arc() {
        let arc = ArcSegment::horizontal(Point3::origin(), 5.0, 0.0, FRAC_PI_2);
        let p = params(ViewMode::Elevation).with_center(Point3::origin()).with_curve_segments(4);

        let views = derive_views(&CurvePrimitive::Arc(arc), &p);
        assert_eq!(views.len(), 4);
        for v in &views {
            let e = v.as_elevation().unwrap();
            // Viewer inside, looking outward away from the center
            assert!(e.view_direction.dot(&e.marker_point.coords) > 0.0);
        }
    }
}
