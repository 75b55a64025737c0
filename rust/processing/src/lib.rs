// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Elevation-Lite Processing
//!
//! Host-side pipeline around [`elevation_lite_geometry`]: settings and unit
//! conversion, room extent fallbacks, room ordering and the batch builds
//! that create and place views through an [`ElevationHost`].

pub mod error;
pub mod extents;
pub mod host;
pub mod ordering;
pub mod pipeline;
pub mod settings;
pub mod units;

pub use error::{Error, Result};
pub use extents::{room_center, room_extents, HeightSource, RoomExtents};
pub use host::{
    BoundingBox, CreatedView, ElementId, ElevationHost, RoomInfo, ViewLabel, ViewOwner, ViewRequest,
    WallInfo,
};
pub use ordering::{compare_natural, sort_rooms};
pub use pipeline::{build, build_by_rooms, build_by_wall, plan_room, BuildReport, RoomPlan};
pub use settings::{parse_millimeters, BuildBy, ElevationSettings, ResolvedSettings, Substitution};
pub use units::LengthUnit;
