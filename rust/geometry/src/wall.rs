// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Views of a single wall seen from a picked side
//!
//! A wall is described by its location curve (the centerline) and its
//! width. The face on the picked side is the centerline offset by half the
//! width; that face is then derived like a room boundary primitive, with
//! the picked point standing in for the room center.

use nalgebra::Point3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::curve::{ArcSegment, CurvePrimitive, LineSegment};
use crate::derive::{derive_views, inward_normal, DeriveParams};
use crate::vector::{self, EPSILON};
use crate::view::ViewGeometry;

/// Centerline and thickness of a wall
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WallLocation {
    pub curve: CurvePrimitive,
    pub width: f64,
}

impl WallLocation {
    pub fn new(curve: CurvePrimitive, width: f64) -> Self {
        Self { curve, width }
    }

    /// The wall face on the side of `side_point`
    pub fn face_toward(&self, side_point: &Point3<f64>) -> CurvePrimitive {
        let half = self.width.max(0.0) / 2.0;
        match &self.curve {
            CurvePrimitive::Line(line) => {
                let n = inward_normal(&line.direction(), &(side_point - line.midpoint()));
                CurvePrimitive::Line(LineSegment::new(line.start + n * half, line.end + n * half))
            }
            CurvePrimitive::Arc(arc) => CurvePrimitive::Arc(offset_arc(arc, half, side_point)),
        }
    }
}

/// Concentric arc `half` closer to or further from the center, toward `side_point`
fn offset_arc(arc: &ArcSegment, half: f64, side_point: &Point3<f64>) -> ArcSegment {
    let radius = arc.radius();
    if radius < EPSILON {
        return *arc;
    }

    let axis = vector::normalize_or_zero(&arc.normal);
    let offset = side_point - arc.center;
    let planar = offset - axis * offset.dot(&axis);

    let face_radius = if planar.norm() < radius {
        (radius - half).max(0.0)
    } else {
        radius + half
    };
    let scale = face_radius / radius;

    ArcSegment::new(
        arc.center,
        arc.center + (arc.start - arc.center) * scale,
        arc.center + (arc.end - arc.center) * scale,
        arc.normal,
    )
}

/// Derive the views of a wall seen from `side_point`
///
/// `params.center` is replaced by `side_point`.
pub fn derive_wall_views(wall: &WallLocation, side_point: &Point3<f64>, params: &DeriveParams) -> Vec<ViewGeometry> {
    let face = wall.face_toward(side_point);
    derive_views(&face, &params.with_center(*side_point))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{VerticalRange, ViewMode};
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn params(mode: ViewMode) -> DeriveParams {
        DeriveParams::new(Point3::origin(), VerticalRange::new(0.0, 3.0), mode)
            .with_indent(0.25)
            .with_projection_depth(1.0)
    }

    #[test]
    fn test_line_face_moves_toward_pick() {
        let wall = WallLocation::new(
            CurvePrimitive::line(Point3::new(0.0, 0.0, 0.0), Point3::new(6.0, 0.0, 0.0)),
            0.4,
        );

        let face = wall.face_toward(&Point3::new(3.0, -2.0, 0.0));
        assert_relative_eq!(face.start_point().y, -0.2);
        assert_relative_eq!(face.end_point().y, -0.2);
    }

    #[test]
    fn test_wall_section_looks_at_wall() {
        let wall = WallLocation::new(
            CurvePrimitive::line(Point3::new(0.0, 0.0, 0.0), Point3::new(6.0, 0.0, 0.0)),
            0.4,
        );
        let pick = Point3::new(3.0, -2.0, 0.0);

        let views = derive_wall_views(&wall, &pick, &params(ViewMode::Section));
        assert_eq!(views.len(), 1);

        let b = views[0].as_section().unwrap();
        // Viewer at -Y looks toward +Y, cut plane 0.25 in front of the face
        assert_relative_eq!(b.basis_z.y, 1.0);
        assert_relative_eq!(b.origin.y, -0.2);
        assert_relative_eq!(b.min.z, -0.25);
        assert_relative_eq!(b.width(), 6.0);
    }

    #[test]
    fn test_arc_face_inside_and_outside() {
        let arc = ArcSegment::horizontal(Point3::origin(), 4.0, 0.0, FRAC_PI_2);
        let wall = WallLocation::new(CurvePrimitive::Arc(arc), 0.5);

        let inner = wall.face_toward(&Point3::new(1.0, 1.0, 0.0));
        let outer = wall.face_toward(&Point3::new(5.0, 5.0, 0.0));

        match (inner, outer) {
            (CurvePrimitive::Arc(i), CurvePrimitive::Arc(o)) => {
                assert_relative_eq!(i.radius(), 3.75, epsilon = 1e-12);
                assert_relative_eq!(o.radius(), 4.25, epsilon = 1e-12);
            }
            _ => panic!("arc wall must keep an arc face"),
        }
    }

    #[test]
    fn test_curved_wall_elevations_from_inside() {
        let arc = ArcSegment::horizontal(Point3::origin(), 4.0, 0.0, FRAC_PI_2);
        let wall = WallLocation::new(CurvePrimitive::Arc(arc), 0.5);
        let pick = Point3::new(1.0, 1.0, 0.0);

        let views = derive_wall_views(&wall, &pick, &params(ViewMode::Elevation).with_curve_segments(3));
        assert_eq!(views.len(), 3);
        for v in &views {
            let e = v.as_elevation().unwrap();
            assert!(e.marker_point.coords.norm() < 3.75);
            assert!(e.view_direction.dot(&e.marker_point.coords) > 0.0);
        }
    }
}
