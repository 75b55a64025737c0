// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Batch pipelines driving the geometry core through a host
//!
//! Building by rooms runs in three phases:
//!
//! 1. **Gather** (sequential): room data and boundaries are read from the
//!    host, rooms in natural number/name order.
//! 2. **Plan** (parallel): each room's outer loop is simplified and its
//!    views derived. This is pure geometry, so rooms run on the rayon pool.
//! 3. **Materialize** (sequential): views are created and placed in room
//!    order, one sheet row per room.
//!
//! A room that fails is logged and skipped; the rest of the batch goes on.
//! Only cancellation aborts a build, leaving it to the host to roll back
//! what was already created.

use elevation_lite_geometry::vector::EPSILON;
use elevation_lite_geometry::{
    derive_all, derive_wall_views, simplify_with_stats, BoundaryLoop, DeriveParams, SheetLayout,
    SimplifyOptions, SimplifyStats, ViewExtent, ViewGeometry,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::extents::{room_center, room_extents};
use crate::host::{ElementId, ElevationHost, RoomInfo, ViewLabel, ViewOwner, ViewRequest};
use crate::ordering::sort_rooms;
use crate::settings::{BuildBy, ElevationSettings, ResolvedSettings};

/// Outcome of a build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    pub rooms_processed: usize,
    pub rooms_skipped: usize,
    pub views_created: usize,
    pub views_placed: usize,
}

/// Views planned for one boundary
#[derive(Debug, Clone, PartialEq)]
pub struct RoomPlan {
    pub views: Vec<ViewGeometry>,
    pub stats: SimplifyStats,
}

/// Simplify a boundary and derive its views
pub fn plan_room(boundary: &BoundaryLoop, params: &DeriveParams, options: &SimplifyOptions) -> RoomPlan {
    let (curves, stats) = simplify_with_stats(boundary.curves(), options);
    RoomPlan {
        views: derive_all(&curves, params),
        stats,
    }
}

/// Run the build selected in `settings`
pub fn build<H: ElevationHost>(host: &mut H, settings: &ElevationSettings) -> Result<BuildReport> {
    match settings.build_by {
        BuildBy::Room => build_by_rooms(host, settings),
        BuildBy::Wall => build_by_wall(host, settings),
    }
}

/// Room data collected from the host before planning
struct RoomJob {
    room: RoomInfo,
    boundary: BoundaryLoop,
    params: DeriveParams,
}

fn gather_room<H: ElevationHost>(host: &H, resolved: &ResolvedSettings, room: RoomInfo) -> Result<RoomJob> {
    let boundary = host
        .room_boundary(&room)?
        .into_iter()
        .next()
        .filter(|outer| !outer.is_empty())
        .ok_or_else(|| Error::NoBoundary {
            room: room.number.clone(),
        })?;

    let extents = room_extents(&room, resolved.unit);
    let vertical = resolved.vertical_range(extents.base_z, extents.top_z);
    if extents.top_z + resolved.indent_up <= extents.base_z - resolved.indent_down + EPSILON {
        tracing::warn!(
            room = %room.number,
            height = vertical.height(),
            "Collapsed vertical range, using minimum span"
        );
    }
    tracing::debug!(room = %room.number, source = ?extents.source, base_z = extents.base_z, top_z = extents.top_z, "Room extents");

    let params = resolved.derive_params(room_center(&room), vertical);
    Ok(RoomJob { room, boundary, params })
}

/// Generate views for every wall of the selected rooms
pub fn build_by_rooms<H: ElevationHost>(host: &mut H, settings: &ElevationSettings) -> Result<BuildReport> {
    let resolved = settings.resolve(host.length_unit());

    let mut rooms = host.selected_rooms()?;
    if rooms.is_empty() {
        return Err(Error::Cancelled);
    }
    sort_rooms(&mut rooms);

    tracing::info!(rooms = rooms.len(), mode = ?resolved.mode, sheet = ?resolved.sheet, "Starting build by rooms");

    let mut report = BuildReport::default();
    let mut jobs = Vec::with_capacity(rooms.len());
    for room in rooms {
        if host.is_cancelled() {
            return Err(Error::Cancelled);
        }
        let number = room.number.clone();
        match gather_room(host, &resolved, room) {
            Ok(job) => jobs.push(job),
            Err(err) => {
                tracing::warn!(room = %number, error = %err, "Skipping room");
                report.rooms_skipped += 1;
            }
        }
    }

    let options = resolved.simplify_options();
    let plans: Vec<RoomPlan> = jobs
        .par_iter()
        .map(|job| plan_room(&job.boundary, &job.params, &options))
        .collect();

    let mut sheet = resolved.sheet.as_deref().map(|name| {
        let origin = resolved.sheet_origin().resolve(host.title_block_bounds(name).as_ref());
        (name, SheetLayout::new(origin, resolved.row_margin()))
    });

    for (job, plan) in jobs.iter().zip(plans) {
        if host.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let stats = &plan.stats;
        tracing::debug!(
            room = %job.room.number,
            input = stats.input_count,
            dropped = stats.dropped_short,
            merged = stats.merged,
            wrapped = stats.wrapped,
            output = stats.output_count,
            views = plan.views.len(),
            "Planned room"
        );

        if plan.views.is_empty() {
            tracing::warn!(room = %job.room.number, "No views derived, skipping room");
            report.rooms_skipped += 1;
            continue;
        }

        let owner = ViewOwner::Room {
            number: job.room.number.clone(),
        };
        let created = materialize(host, &resolved, &owner, &plan.views, &mut report);
        report.rooms_processed += 1;

        if let Some((name, layout)) = sheet.as_mut() {
            report.views_placed += place_views(host, name, layout, &created);
        }
    }

    tracing::info!(
        rooms_processed = report.rooms_processed,
        rooms_skipped = report.rooms_skipped,
        views_created = report.views_created,
        views_placed = report.views_placed,
        "Build by rooms complete"
    );

    Ok(report)
}

/// Generate views for one wall, seen from the picked side
///
/// The views go on the sheet as a single row at the sheet origin.
pub fn build_by_wall<H: ElevationHost>(host: &mut H, settings: &ElevationSettings) -> Result<BuildReport> {
    let resolved = settings.resolve(host.length_unit());
    let (wall, side_point) = host.pick_wall()?;

    tracing::info!(wall = wall.id, mode = ?resolved.mode, "Starting build by wall");

    let vertical = resolved.vertical_range(wall.base_z, wall.top_z);
    let params = resolved.derive_params(side_point, vertical);
    let views = derive_wall_views(&wall.location, &side_point, &params);

    let mut report = BuildReport::default();
    let created = materialize(host, &resolved, &ViewOwner::Wall, &views, &mut report);

    if let Some(name) = resolved.sheet.as_deref() {
        let origin = resolved.sheet_origin().resolve(host.title_block_bounds(name).as_ref());
        let mut layout = SheetLayout::new(origin, resolved.row_margin());
        report.views_placed = place_views(host, name, &mut layout, &created);
    }

    tracing::info!(
        views_created = report.views_created,
        views_placed = report.views_placed,
        "Build by wall complete"
    );

    Ok(report)
}

/// Create the host views, keeping the ones that succeeded in order
fn materialize<H: ElevationHost>(
    host: &mut H,
    resolved: &ResolvedSettings,
    owner: &ViewOwner,
    views: &[ViewGeometry],
    report: &mut BuildReport,
) -> Vec<(ElementId, ViewExtent)> {
    let mut created = Vec::with_capacity(views.len());

    for (i, geometry) in views.iter().enumerate() {
        let label = ViewLabel {
            owner: owner.clone(),
            index: i + 1,
            kind: geometry.mode(),
        };
        let request = ViewRequest {
            geometry,
            label: &label,
            view_type: resolved.view_type.as_deref(),
            template: resolved.template.as_deref(),
        };

        match host.create_view(&request) {
            Ok(view) => {
                report.views_created += 1;
                created.push((view.id, ViewExtent::of_view(geometry, view.scale)));
            }
            Err(err) => tracing::warn!(view = %label, error = %err, "Failed to create view"),
        }
    }

    created
}

/// Place created views as the next row of `layout`
fn place_views<H: ElevationHost>(
    host: &mut H,
    sheet: &str,
    layout: &mut SheetLayout,
    created: &[(ElementId, ViewExtent)],
) -> usize {
    let extents: Vec<ViewExtent> = created.iter().map(|(_, extent)| *extent).collect();
    let row = layout.place_row(&extents);

    let mut placed = 0;
    for step in &row.steps {
        let view = created[step.view_index].0;
        match host.place_viewport(sheet, view, step) {
            Ok(()) => placed += 1,
            Err(err) => tracing::warn!(view, sheet, error = %err, "Failed to place viewport"),
        }
    }
    placed
}
