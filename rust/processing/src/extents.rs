// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reference point and vertical extent of a room

use elevation_lite_geometry::vector::EPSILON;
use elevation_lite_geometry::Point3;

use crate::host::RoomInfo;
use crate::units::LengthUnit;

/// Height assumed when a room reports none
pub const FALLBACK_ROOM_HEIGHT_MM: f64 = 3000.0;

/// Where a room's vertical extent came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeightSource {
    HeightParameter,
    UnboundedHeight,
    BoundingBox,
    Fallback,
}

/// Absolute bottom and top of a room
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomExtents {
    pub base_z: f64,
    pub top_z: f64,
    pub source: HeightSource,
}

/// Point views of a room look away from: location, else bounding box center, else origin
pub fn room_center(room: &RoomInfo) -> Point3<f64> {
    room.location
        .or_else(|| room.bounding_box.map(|bb| bb.center()))
        .unwrap_or_else(Point3::origin)
}

/// Vertical extent of a room
///
/// The base is the level elevation plus the lower offset. The height is
/// the first usable (positive) value of the height parameter and the
/// unbounded height. Without one, the bounding box gives both bottom and
/// top; as a last resort a 3 m room is assumed.
pub fn room_extents(room: &RoomInfo, unit: LengthUnit) -> RoomExtents {
    let base_z = room.level_elevation.unwrap_or(0.0) + room.lower_offset.unwrap_or(0.0);
    let usable = |h: &f64| *h > EPSILON;

    if let Some(h) = room.height.filter(usable) {
        return RoomExtents {
            base_z,
            top_z: base_z + h,
            source: HeightSource::HeightParameter,
        };
    }
    if let Some(h) = room.unbounded_height.filter(usable) {
        return RoomExtents {
            base_z,
            top_z: base_z + h,
            source: HeightSource::UnboundedHeight,
        };
    }
    if let Some(bb) = room.bounding_box {
        return RoomExtents {
            base_z: bb.min.z,
            top_z: bb.max.z,
            source: HeightSource::BoundingBox,
        };
    }

    RoomExtents {
        base_z,
        top_z: base_z + unit.from_millimeters(FALLBACK_ROOM_HEIGHT_MM),
        source: HeightSource::Fallback,
    }
}
