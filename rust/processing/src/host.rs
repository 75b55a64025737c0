// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Capabilities a building-model host provides to the pipelines
//!
//! The pipelines never touch model elements directly. A host adapter
//! answers element queries with plain values and turns derived view
//! geometry into real views and viewports.

use std::fmt;

use elevation_lite_geometry::{
    BoundaryLoop, PlacementStep, Point3, TitleBlockBounds, ViewGeometry, ViewMode, WallLocation,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::units::LengthUnit;

/// Host element identifier
pub type ElementId = u64;

/// Axis-aligned bounds in model coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl BoundingBox {
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }
}

/// Room properties relevant to view generation, all in model units
///
/// Optional fields are the ones a host may be unable to provide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomInfo {
    pub id: ElementId,
    pub number: String,
    pub name: String,
    /// Placement point of the room
    pub location: Option<Point3<f64>>,
    pub bounding_box: Option<BoundingBox>,
    pub level_elevation: Option<f64>,
    /// Offset of the room's base from its level
    pub lower_offset: Option<f64>,
    /// Explicit height parameter
    pub height: Option<f64>,
    /// Computed height up to the bounding elements
    pub unbounded_height: Option<f64>,
}

/// A wall and the vertical extent of its bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallInfo {
    pub id: ElementId,
    pub location: WallLocation,
    pub base_z: f64,
    pub top_z: f64,
}

/// Element a view was generated for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewOwner {
    Room { number: String },
    Wall,
}

/// Naming information for one generated view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewLabel {
    pub owner: ViewOwner,
    /// 1-based position within the owner's views
    pub index: usize,
    pub kind: ViewMode,
}

/// Base name such as `SEC_R101_3` or `ELV_W_1`; hosts usually append the view id
impl fmt::Display for ViewLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ViewMode::Section => "SEC",
            ViewMode::Elevation => "ELV",
        };
        match &self.owner {
            ViewOwner::Room { number } => write!(f, "{}_R{}_{}", kind, number, self.index),
            ViewOwner::Wall => write!(f, "{}_W_{}", kind, self.index),
        }
    }
}

/// Everything the host needs to create one view
#[derive(Debug, Clone, Copy)]
pub struct ViewRequest<'a> {
    pub geometry: &'a ViewGeometry,
    pub label: &'a ViewLabel,
    pub view_type: Option<&'a str>,
    /// View template to apply
    pub template: Option<&'a str>,
}

/// A view the host created
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreatedView {
    pub id: ElementId,
    /// Model units per sheet unit of the new view
    pub scale: f64,
}

/// Narrow interface to the building model
pub trait ElevationHost {
    /// Internal length unit of the model
    fn length_unit(&self) -> LengthUnit {
        LengthUnit::Feet
    }

    /// Rooms to process; an empty selection ends the build
    fn selected_rooms(&mut self) -> Result<Vec<RoomInfo>>;

    /// Boundary loops of a room, outer loop first
    fn room_boundary(&self, room: &RoomInfo) -> Result<Vec<BoundaryLoop>>;

    /// The wall to generate views for and a point on the side to look from
    fn pick_wall(&mut self) -> Result<(WallInfo, Point3<f64>)>;

    /// Create a section or elevation view
    fn create_view(&mut self, request: &ViewRequest<'_>) -> Result<CreatedView>;

    /// Bounds of the sheet's title block, if it has one
    fn title_block_bounds(&self, sheet: &str) -> Option<TitleBlockBounds>;

    /// Put a viewport of `view` on `sheet` at the step's insert point, then move it by the step's delta
    fn place_viewport(&mut self, sheet: &str, view: ElementId, step: &PlacementStep) -> Result<()>;

    /// Polled between rooms
    fn is_cancelled(&self) -> bool {
        false
    }
}
