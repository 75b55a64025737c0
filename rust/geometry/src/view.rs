// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! View geometry descriptors handed back to the host

use nalgebra::{Point3, Vector3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::vector::{self, ANGLE_EPSILON, EPSILON};

/// Kind of view derived for each boundary segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ViewMode {
    /// Oriented cut volume
    #[default]
    Section,
    /// Marker plus crop rectangle
    Elevation,
}

/// Absolute vertical extent of the derived views
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VerticalRange {
    pub y_min: f64,
    pub y_max: f64,
}

impl VerticalRange {
    pub fn new(y_min: f64, y_max: f64) -> Self {
        Self { y_min, y_max }
    }

    /// Extend `base_z..top_z` by the given margins
    ///
    /// A range that collapses (top not above bottom) is opened to `min_span`.
    pub fn with_margins(base_z: f64, top_z: f64, indent_down: f64, indent_up: f64, min_span: f64) -> Self {
        let y_min = base_z - indent_down;
        let mut y_max = top_z + indent_up;
        if y_max <= y_min + EPSILON {
            y_max = y_min + min_span;
        }
        Self { y_min, y_max }
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Bounds in ascending order
    pub(crate) fn ordered(&self) -> (f64, f64) {
        (self.y_min.min(self.y_max), self.y_min.max(self.y_max))
    }
}

/// Oriented section volume
///
/// `min`/`max` are box extents in the local frame spanned by the basis
/// vectors. `basis_y` is the vertical axis and `origin` sits at z = 0, so
/// the local y range is the absolute elevation range.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ViewBoxSpec {
    pub origin: Point3<f64>,
    /// Right, along the cut segment
    pub basis_x: Vector3<f64>,
    /// Up
    pub basis_y: Vector3<f64>,
    /// View direction
    pub basis_z: Vector3<f64>,
    pub min: Vector3<f64>,
    pub max: Vector3<f64>,
}

impl ViewBoxSpec {
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Unit-length, mutually perpendicular and right-handed within `eps`
    pub fn is_orthonormal(&self, eps: f64) -> bool {
        let unit = |v: &Vector3<f64>| (v.norm() - 1.0).abs() <= eps;
        unit(&self.basis_x)
            && unit(&self.basis_y)
            && unit(&self.basis_z)
            && self.basis_x.dot(&self.basis_y).abs() <= eps
            && self.basis_y.dot(&self.basis_z).abs() <= eps
            && self.basis_z.dot(&self.basis_x).abs() <= eps
            && (self.basis_x.cross(&self.basis_y) - self.basis_z).norm() <= eps
    }
}

/// Elevation marker with its crop rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ElevationSpec {
    pub marker_point: Point3<f64>,
    pub view_direction: Vector3<f64>,
    /// Bottom-left, top-left, top-right, bottom-right; "right" is `up × inward`
    pub crop_polygon: [Point3<f64>; 4],
    /// Far clip distance from the marker
    pub far_offset: f64,
}

impl ElevationSpec {
    pub fn crop_width(&self) -> f64 {
        (self.crop_polygon[3] - self.crop_polygon[0]).norm()
    }

    pub fn crop_height(&self) -> f64 {
        (self.crop_polygon[1] - self.crop_polygon[0]).norm()
    }

    /// Rotation about the vertical axis that turns a marker looking along
    /// `current` into one looking along `view_direction`
    ///
    /// `None` when the marker is already aligned.
    pub fn marker_rotation(&self, current: &Vector3<f64>) -> Option<f64> {
        let angle = vector::signed_angle_on_plane(current, &self.view_direction, &vector::up());
        if angle.abs() > ANGLE_EPSILON {
            Some(angle)
        } else {
            None
        }
    }
}

/// One derived view
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ViewGeometry {
    Section(ViewBoxSpec),
    Elevation(ElevationSpec),
}

impl ViewGeometry {
    pub fn mode(&self) -> ViewMode {
        match self {
            ViewGeometry::Section(_) => ViewMode::Section,
            ViewGeometry::Elevation(_) => ViewMode::Elevation,
        }
    }

    /// Model-space width and height of the visible crop region
    pub fn crop_extent(&self) -> (f64, f64) {
        match self {
            ViewGeometry::Section(b) => (b.width(), b.height()),
            ViewGeometry::Elevation(e) => (e.crop_width(), e.crop_height()),
        }
    }

    pub fn as_section(&self) -> Option<&ViewBoxSpec> {
        match self {
            ViewGeometry::Section(b) => Some(b),
            ViewGeometry::Elevation(_) => None,
        }
    }

    pub fn as_elevation(&self) -> Option<&ElevationSpec> {
        match self {
            ViewGeometry::Section(_) => None,
            ViewGeometry::Elevation(e) => Some(e),
        }
    }
}
