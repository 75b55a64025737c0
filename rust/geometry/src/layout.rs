// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sheet layout: single-row shelf packing of views
//!
//! Views of one boundary are laid out left to right on a shared top
//! baseline. The view that comes first in boundary order ends up
//! rightmost. Rows are chained downward with [`SheetLayout`].

use nalgebra::{Point3, Vector3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::view::ViewGeometry;

/// Distance of the first row from the title block's left edge: 30 mm in feet
pub const DEFAULT_SHEET_INSET_X: f64 = 30.0 / 304.8;

/// Distance of the first row below the title block's top edge: 20 mm in feet
pub const DEFAULT_SHEET_INSET_Y: f64 = 20.0 / 304.8;

/// Crop size of a view in model units and the scale it is printed at
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ViewExtent {
    pub crop_width: f64,
    pub crop_height: f64,
    /// Model units per sheet unit (100 for 1:100)
    pub scale: f64,
}

impl ViewExtent {
    pub fn new(crop_width: f64, crop_height: f64, scale: f64) -> Self {
        Self {
            crop_width,
            crop_height,
            scale,
        }
    }

    /// Extent of a derived view's crop region
    pub fn of_view(view: &ViewGeometry, scale: f64) -> Self {
        let (crop_width, crop_height) = view.crop_extent();
        Self::new(crop_width, crop_height, scale)
    }

    /// Half width and half height on the sheet
    ///
    /// A scale that is not a positive finite number counts as 1.
    pub fn half_size(&self) -> (f64, f64) {
        let scale = if self.scale.is_finite() && self.scale > 0.0 {
            self.scale
        } else {
            1.0
        };
        (self.crop_width / scale / 2.0, self.crop_height / scale / 2.0)
    }
}

/// Where one viewport goes and how to shift it after insertion
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacementStep {
    /// Index of the view in the input sequence
    pub view_index: usize,
    pub viewport_insert_point: Point3<f64>,
    /// Moves a viewport inserted by its center so its top-left corner sits on the insert point
    pub move_delta: Vector3<f64>,
    pub height_consumed: f64,
}

/// Result of one [`pack`] call
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackedRow {
    /// Steps in placement order (left to right)
    pub steps: Vec<PlacementStep>,
    /// Height of the tallest view in the row
    pub total_height_consumed: f64,
    /// Insertion point following the last view
    pub cursor: Point3<f64>,
}

impl PackedRow {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Horizontal distance covered by the row
    pub fn width(&self, start: &Point3<f64>) -> f64 {
        self.cursor.x - start.x
    }
}

/// Lay `views` out in one row starting at `start`
///
/// Views are placed in reverse input order, so the first view lands
/// rightmost.
pub fn pack(views: &[ViewExtent], start: &Point3<f64>) -> PackedRow {
    let mut cursor = *start;
    let mut total_height_consumed: f64 = 0.0;

    let steps = views
        .iter()
        .enumerate()
        .rev()
        .map(|(view_index, view)| {
            let (half_width, half_height) = view.half_size();
            let step = PlacementStep {
                view_index,
                viewport_insert_point: cursor,
                move_delta: Vector3::new(half_width, -half_height, 0.0),
                height_consumed: 2.0 * half_height,
            };
            cursor.x += 2.0 * half_width;
            total_height_consumed = total_height_consumed.max(step.height_consumed);
            step
        })
        .collect();

    PackedRow {
        steps,
        total_height_consumed,
        cursor,
    }
}

/// Title block extent used to anchor the first row
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TitleBlockBounds {
    pub min_x: f64,
    pub max_y: f64,
}

/// Inset of the first row from the title block's top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SheetOrigin {
    pub inset_x: f64,
    pub inset_y: f64,
}

impl Default for SheetOrigin {
    fn default() -> Self {
        Self {
            inset_x: DEFAULT_SHEET_INSET_X,
            inset_y: DEFAULT_SHEET_INSET_Y,
        }
    }
}

impl SheetOrigin {
    pub fn new(inset_x: f64, inset_y: f64) -> Self {
        Self { inset_x, inset_y }
    }

    /// Top-left insertion point of the first row; the sheet origin without a title block
    pub fn resolve(&self, title_block: Option<&TitleBlockBounds>) -> Point3<f64> {
        match title_block {
            Some(tb) => Point3::new(tb.min_x + self.inset_x, tb.max_y - self.inset_y, 0.0),
            None => Point3::origin(),
        }
    }
}

/// Chains rows of views downward on one sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    origin: Point3<f64>,
    offset: f64,
    margin: f64,
}

impl SheetLayout {
    pub fn new(origin: Point3<f64>, margin: f64) -> Self {
        Self {
            origin,
            offset: 0.0,
            margin,
        }
    }

    /// Start point of the next row
    pub fn next_start(&self) -> Point3<f64> {
        Point3::new(self.origin.x, self.origin.y - self.offset, self.origin.z)
    }

    /// Accumulated vertical offset of the next row below the origin
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Pack one group as a new row
    ///
    /// An empty group leaves the offset unchanged.
    pub fn place_row(&mut self, views: &[ViewExtent]) -> PackedRow {
        let row = pack(views, &self.next_start());
        if !row.is_empty() {
            self.offset += row.total_height_consumed + self.margin;
        }
        row
    }
}
