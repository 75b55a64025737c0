// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end scenarios for the simplifier, deriver and packer

use approx::assert_relative_eq;
use elevation_lite_geometry::{
    derive_views, pack, simplify, simplify_with_stats, BoundaryLoop, CurvePrimitive, DeriveParams,
    Point3, SimplifyOptions, Tolerances, VerticalRange, ViewExtent, ViewMode,
};

fn p(x: f64, y: f64) -> Point3<f64> {
    Point3::new(x, y, 0.0)
}

fn tight(min: f64) -> SimplifyOptions {
    SimplifyOptions::new(min).with_tolerances(Tolerances::new(1e-3, 1e-6))
}

#[test]
fn collinear_pair_merges_into_one_line() {
    let curves = vec![
        CurvePrimitive::line(p(0.0, 0.0), p(10.0, 0.0)),
        CurvePrimitive::line(p(10.0, 0.0), p(20.0, 0.0)),
    ];

    let out = simplify(&curves, &tight(1.0).with_close_loop_merge(false));
    assert_eq!(out.len(), 1);
    assert_relative_eq!(out[0].length(), 20.0);
}

#[test]
fn short_single_line_is_dropped() {
    let curves = vec![CurvePrimitive::line(p(0.0, 0.0), p(0.5, 0.0))];
    assert!(simplify(&curves, &tight(1.0)).is_empty());
}

#[test]
fn rectangle_keeps_four_lines() {
    let rect = BoundaryLoop::from_points(&[p(0.0, 0.0), p(8.0, 0.0), p(8.0, 5.0), p(0.0, 5.0)], true);

    let (out, stats) = simplify_with_stats(rect.curves(), &tight(1.0));
    assert_eq!(out.len(), 4);
    assert!(!stats.wrapped);
}

/// Rectangle whose bottom edge is split at the loop seam; the closing piece
/// is kinked by `kink` radians against the opening one
fn kinked_seam_loop(kink: f64) -> Vec<CurvePrimitive> {
    let closing_end = p(5.0 * kink.cos(), 5.0 * kink.sin());
    vec![
        CurvePrimitive::line(p(5.0, 0.0), p(10.0, 0.0)),
        CurvePrimitive::line(p(10.0, 0.0), p(10.0, 4.0)),
        CurvePrimitive::line(p(10.0, 4.0), p(0.0, 4.0)),
        CurvePrimitive::line(p(0.0, 4.0), p(0.0, 0.0)),
        CurvePrimitive::line(p(0.0, 0.0), closing_end),
    ]
}

#[test]
fn seam_kink_above_angle_tolerance_blocks_wrap() {
    let (out, stats) = simplify_with_stats(&kinked_seam_loop(1e-5), &tight(1.0));
    assert!(!stats.wrapped);
    assert_eq!(out.len(), 5);
}

#[test]
fn seam_kink_below_angle_tolerance_wraps() {
    let (out, stats) = simplify_with_stats(&kinked_seam_loop(1e-7), &tight(1.0));
    assert!(stats.wrapped);
    assert_eq!(out.len(), 4);
    assert_eq!(out[0].start_point(), p(0.0, 0.0));
    assert_eq!(out[0].end_point(), p(10.0, 0.0));
}

#[test]
fn section_box_for_four_unit_wall() {
    let wall = CurvePrimitive::line(p(0.0, 0.0), p(4.0, 0.0));
    let params = DeriveParams::new(p(2.0, 3.0), VerticalRange::new(0.0, 3.0), ViewMode::Section)
        .with_indent(0.5)
        .with_projection_depth(1.0);

    let views = derive_views(&wall, &params);
    assert_eq!(views.len(), 1);

    let b = views[0].as_section().expect("section mode yields boxes");
    assert_relative_eq!(b.max.x - b.min.x, 4.0);
    assert_relative_eq!(b.max.y - b.min.y, 3.0);
    assert_relative_eq!(b.min.z, -0.5);
}

#[test]
fn three_equal_views_pack_side_by_side() {
    let views = [
        ViewExtent::new(2.0, 1.0, 1.0),
        ViewExtent::new(2.0, 3.0, 1.0),
        ViewExtent::new(2.0, 2.0, 1.0),
    ];

    let row = pack(&views, &Point3::origin());
    let xs: Vec<f64> = row.steps.iter().map(|s| s.viewport_insert_point.x).collect();

    assert_eq!(row.steps.len(), 3);
    assert_relative_eq!(xs[0], 0.0);
    assert_relative_eq!(xs[1], 2.0);
    assert_relative_eq!(xs[2], 4.0);
    assert_relative_eq!(row.total_height_consumed, 3.0);
}
