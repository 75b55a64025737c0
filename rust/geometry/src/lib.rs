// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Elevation-Lite Geometry
//!
//! Pure geometry core for generating section and elevation views from room
//! and wall outlines:
//!
//! - [`simplify`]: merge near-collinear boundary segments and drop noise
//! - [`derive_views`]: one section box or elevation marker per boundary piece
//! - [`pack`]: lay the resulting views out in a row on a sheet
//!
//! All lengths are in the host model's internal unit. Default constants are
//! expressed in feet; callers working in another unit pass their own
//! values. Nothing here performs I/O or keeps state between calls.
//!
//! ```
//! use elevation_lite_geometry::{
//!     derive_all, simplify, BoundaryLoop, DeriveParams, Point3, SimplifyOptions,
//!     VerticalRange, ViewMode,
//! };
//!
//! let room = BoundaryLoop::from_points(
//!     &[
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(5.0, 0.0, 0.0),
//!         Point3::new(10.0, 0.0, 0.0),
//!         Point3::new(10.0, 8.0, 0.0),
//!         Point3::new(0.0, 8.0, 0.0),
//!     ],
//!     true,
//! );
//!
//! let curves = simplify(room.curves(), &SimplifyOptions::new(1.0));
//! assert_eq!(curves.len(), 4);
//!
//! let params = DeriveParams::new(Point3::new(5.0, 4.0, 0.0), VerticalRange::new(0.0, 9.0), ViewMode::Section)
//!     .with_indent(1.0)
//!     .with_projection_depth(2.0);
//! let views = derive_all(&curves, &params);
//! assert_eq!(views.len(), 4);
//! ```

pub mod curve;
pub mod derive;
pub mod error;
pub mod layout;
pub mod simplify;
pub mod vector;
pub mod view;
pub mod wall;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};

pub use curve::{ArcSegment, BoundaryLoop, CurvePrimitive, LineSegment};
pub use derive::{derive_all, derive_views, inward_normal, subdivide_arc, DeriveParams};
pub use error::{Error, Result};
pub use layout::{
    pack, PackedRow, PlacementStep, SheetLayout, SheetOrigin, TitleBlockBounds, ViewExtent,
};
pub use simplify::{simplify, simplify_loop, simplify_with_stats, SimplifyOptions, SimplifyStats, Tolerances};
pub use view::{ElevationSpec, VerticalRange, ViewBoxSpec, ViewGeometry, ViewMode};
pub use wall::{derive_wall_views, WallLocation};
