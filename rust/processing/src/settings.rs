// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! User settings and their conversion into core parameters
//!
//! Lengths are kept as the text the user typed, in millimetres, exactly as
//! a settings dialog stores them. [`ElevationSettings::resolve`] parses
//! them, converts them to the host's internal unit and substitutes the
//! documented defaults for values the core cannot work with.

use elevation_lite_geometry::derive::MAX_CURVE_SEGMENTS;
use elevation_lite_geometry::simplify::DEFAULT_ANGLE_TOLERANCE;
use elevation_lite_geometry::{
    DeriveParams, Point3, SheetOrigin, SimplifyOptions, Tolerances, VerticalRange, ViewMode,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::units::LengthUnit;

pub const DEFAULT_MIN_SEGMENT_LENGTH_MM: f64 = 1000.0;
pub const DEFAULT_PROJECTION_DEPTH_MM: f64 = 500.0;
pub const DEFAULT_CURVE_SEGMENTS: i32 = 5;

/// Merge distance tolerance of the simplifier
pub const DISTANCE_TOLERANCE_MM: f64 = 1.0;
/// Shallowest section depth in front of the cut plane
pub const MIN_DEPTH_MM: f64 = 50.0;
/// Height given to a room whose vertical range collapses
pub const MIN_VERTICAL_SPAN_MM: f64 = 100.0;
pub const SHEET_INSET_X_MM: f64 = 30.0;
pub const SHEET_INSET_Y_MM: f64 = 20.0;
/// Gap between two rows of viewports
pub const ROW_MARGIN_MM: f64 = 20.0;

/// What the views are generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BuildBy {
    /// Every wall of each selected room
    #[default]
    Room,
    /// One picked wall, seen from a picked side
    Wall,
}

/// Persisted dialog settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevationSettings {
    pub build_by: BuildBy,
    pub view_kind: ViewMode,
    /// Distance of the cut plane / marker from the wall
    pub indent_mm: String,
    /// Extra height above the room
    pub indent_up_mm: String,
    /// Extra depth below the room
    pub indent_down_mm: String,
    pub projection_depth_mm: String,
    /// Number of views per arc
    pub curve_segments: String,
    /// Boundary pieces shorter than this are ignored
    pub min_segment_length_mm: String,
    pub use_template: bool,
    pub template_name: Option<String>,
    /// Section or elevation view type to create
    pub view_type_name: Option<String>,
    /// Sheet to place the views on; no placement when unset
    pub sheet_name: Option<String>,
}

impl Default for ElevationSettings {
    fn default() -> Self {
        Self {
            build_by: BuildBy::Room,
            view_kind: ViewMode::Section,
            indent_mm: "0".into(),
            indent_up_mm: "0".into(),
            indent_down_mm: "0".into(),
            projection_depth_mm: "0".into(),
            curve_segments: DEFAULT_CURVE_SEGMENTS.to_string(),
            min_segment_length_mm: "1000".into(),
            use_template: false,
            template_name: None,
            view_type_name: None,
            sheet_name: None,
        }
    }
}

/// Parse a length typed by the user
///
/// Accepts `.` or `,` as decimal separator. Anything unparsable (or not
/// finite) reads as zero.
pub fn parse_millimeters(text: &str) -> f64 {
    let text = text.trim();
    let value = text
        .parse::<f64>()
        .or_else(|_| text.replace(',', ".").parse::<f64>())
        .unwrap_or(0.0);
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// A default that replaced an unusable setting
#[derive(Debug, Clone, PartialEq)]
pub enum Substitution {
    MinSegmentLength { given_mm: f64 },
    ProjectionDepth { given_mm: f64 },
    NegativeIndent { field: &'static str, given_mm: f64 },
    CurveSegments { given: String },
}

/// Settings converted to the host's internal unit, defaults applied
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSettings {
    pub unit: LengthUnit,
    pub build_by: BuildBy,
    pub mode: ViewMode,
    pub indent: f64,
    pub indent_up: f64,
    pub indent_down: f64,
    pub projection_depth: f64,
    pub min_segment_length: f64,
    pub curve_segments: i32,
    /// Set only when templates are enabled
    pub template: Option<String>,
    pub view_type: Option<String>,
    pub sheet: Option<String>,
    pub substitutions: Vec<Substitution>,
}

impl ElevationSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the [normalized](Self::normalized) settings
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.normalized())?)
    }

    /// Trimmed copy with blank fields reset to their defaults
    pub fn normalized(&self) -> Self {
        let defaults = Self::default();
        let norm = |text: &str, default: &str| {
            let t = text.trim();
            if t.is_empty() {
                default.to_string()
            } else {
                t.to_string()
            }
        };
        let name = |name: &Option<String>| {
            name.as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string)
        };

        Self {
            build_by: self.build_by,
            view_kind: self.view_kind,
            indent_mm: norm(&self.indent_mm, &defaults.indent_mm),
            indent_up_mm: norm(&self.indent_up_mm, &defaults.indent_up_mm),
            indent_down_mm: norm(&self.indent_down_mm, &defaults.indent_down_mm),
            projection_depth_mm: norm(&self.projection_depth_mm, &defaults.projection_depth_mm),
            curve_segments: norm(&self.curve_segments, &defaults.curve_segments),
            min_segment_length_mm: norm(&self.min_segment_length_mm, &defaults.min_segment_length_mm),
            use_template: self.use_template,
            template_name: if self.use_template {
                name(&self.template_name)
            } else {
                None
            },
            view_type_name: name(&self.view_type_name),
            sheet_name: name(&self.sheet_name),
        }
    }

    /// Convert to model units, replacing unusable values with defaults
    pub fn resolve(&self, unit: LengthUnit) -> ResolvedSettings {
        let mut substitutions = Vec::new();

        let mut min_segment_mm = parse_millimeters(&self.min_segment_length_mm);
        if min_segment_mm <= 0.0 {
            tracing::warn!(
                given_mm = min_segment_mm,
                default_mm = DEFAULT_MIN_SEGMENT_LENGTH_MM,
                "Minimum segment length must be positive, using default"
            );
            substitutions.push(Substitution::MinSegmentLength { given_mm: min_segment_mm });
            min_segment_mm = DEFAULT_MIN_SEGMENT_LENGTH_MM;
        }

        let mut projection_mm = parse_millimeters(&self.projection_depth_mm);
        if projection_mm <= 0.0 {
            tracing::warn!(
                given_mm = projection_mm,
                default_mm = DEFAULT_PROJECTION_DEPTH_MM,
                "Projection depth must be positive, using default"
            );
            substitutions.push(Substitution::ProjectionDepth { given_mm: projection_mm });
            projection_mm = DEFAULT_PROJECTION_DEPTH_MM;
        }

        let mut indent = |field: &'static str, text: &str| {
            let mm = parse_millimeters(text);
            if mm < 0.0 {
                tracing::warn!(field, given_mm = mm, "Negative indent, using 0");
                substitutions.push(Substitution::NegativeIndent { field, given_mm: mm });
                0.0
            } else {
                unit.from_millimeters(mm)
            }
        };
        let indent_value = indent("indent", &self.indent_mm);
        let indent_up = indent("indent_up", &self.indent_up_mm);
        let indent_down = indent("indent_down", &self.indent_down_mm);

        let given_segments = self.curve_segments.trim().parse::<i32>().unwrap_or(0);
        let curve_segments = given_segments.clamp(1, MAX_CURVE_SEGMENTS);
        if curve_segments != given_segments {
            tracing::warn!(
                given = %self.curve_segments,
                using = curve_segments,
                "Curve segment count out of range"
            );
            substitutions.push(Substitution::CurveSegments {
                given: self.curve_segments.clone(),
            });
        }

        let normalized = self.normalized();

        ResolvedSettings {
            unit,
            build_by: self.build_by,
            mode: self.view_kind,
            indent: indent_value,
            indent_up,
            indent_down,
            projection_depth: unit.from_millimeters(projection_mm),
            min_segment_length: unit.from_millimeters(min_segment_mm),
            curve_segments,
            template: normalized.template_name,
            view_type: normalized.view_type_name,
            sheet: normalized.sheet_name,
            substitutions,
        }
    }
}

impl ResolvedSettings {
    /// Simplifier options for a closed room loop
    pub fn simplify_options(&self) -> SimplifyOptions {
        let tolerances = Tolerances::new(
            self.unit.from_millimeters(DISTANCE_TOLERANCE_MM),
            DEFAULT_ANGLE_TOLERANCE,
        );
        SimplifyOptions::new(self.min_segment_length).with_tolerances(tolerances)
    }

    /// Vertical range of `base_z..top_z` with the indent margins applied
    pub fn vertical_range(&self, base_z: f64, top_z: f64) -> VerticalRange {
        VerticalRange::with_margins(
            base_z,
            top_z,
            self.indent_down,
            self.indent_up,
            self.unit.from_millimeters(MIN_VERTICAL_SPAN_MM),
        )
    }

    pub fn derive_params(&self, center: Point3<f64>, vertical: VerticalRange) -> DeriveParams {
        DeriveParams::new(center, vertical, self.mode)
            .with_indent(self.indent)
            .with_projection_depth(self.projection_depth)
            .with_curve_segments(self.curve_segments)
            .with_min_depth_floor(self.unit.from_millimeters(MIN_DEPTH_MM))
    }

    pub fn sheet_origin(&self) -> SheetOrigin {
        SheetOrigin::new(
            self.unit.from_millimeters(SHEET_INSET_X_MM),
            self.unit.from_millimeters(SHEET_INSET_Y_MM),
        )
    }

    pub fn row_margin(&self) -> f64 {
        self.unit.from_millimeters(ROW_MARGIN_MM)
    }
}
