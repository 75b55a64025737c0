// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boundary simplification
//!
//! Room boundaries exported by a building model are full of noise: walls
//! split at every joining wall, tiny returns around columns, segments that
//! are collinear within a fraction of a millimetre. One section or
//! elevation per raw segment would be useless, so the loop is reduced
//! first:
//!
//! 1. Primitives shorter than `min_segment_length − distance` are dropped;
//!    their neighbours then meet across the gap.
//! 2. Runs of neighbouring near-collinear lines are merged into one line.
//!    Arcs close the current run and pass through untouched.
//! 3. Optionally, the last and first output lines are merged across the
//!    loop seam.
//! 4. Passes repeat until one leaves the count unchanged, so simplifying
//!    an already simplified loop returns it as is.
//!
//! Merging is sequential: only neighbours in traversal order are compared,
//! never arbitrary pairs.

use nalgebra::{Point3, Vector3};

use crate::curve::{BoundaryLoop, CurvePrimitive, LineSegment};
use crate::error::{Error, Result};
use crate::vector;

/// 1 mm expressed in feet, the usual internal length unit of the host model
pub const DEFAULT_DISTANCE_TOLERANCE: f64 = 1.0 / 304.8;

/// Maximum direction change between merged lines (radians); 1e-4 is a sane looser value
pub const DEFAULT_ANGLE_TOLERANCE: f64 = 1e-6;

/// Tolerances for one simplification run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    /// Maximum distance of a merged endpoint from the group's supporting line
    pub distance: f64,
    /// Maximum angle between merged directions (radians)
    pub angle: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            distance: DEFAULT_DISTANCE_TOLERANCE,
            angle: DEFAULT_ANGLE_TOLERANCE,
        }
    }
}

impl Tolerances {
    pub fn new(distance: f64, angle: f64) -> Self {
        Self { distance, angle }
    }

    /// Build tolerances, rejecting negative or non-finite values
    pub fn try_new(distance: f64, angle: f64) -> Result<Self> {
        if !distance.is_finite() || distance < 0.0 {
            return Err(Error::InvalidTolerance(format!("distance {}", distance)));
        }
        if !angle.is_finite() || angle < 0.0 {
            return Err(Error::InvalidTolerance(format!("angle {}", angle)));
        }
        Ok(Self { distance, angle })
    }
}

/// Parameters of a simplification run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimplifyOptions {
    /// Primitives shorter than this (minus the distance tolerance) are noise
    pub min_segment_length: f64,
    pub tolerances: Tolerances,
    /// Try to merge the last line into the first one (closed loops)
    pub close_loop_merge: bool,
}

impl SimplifyOptions {
    /// Options for a closed room loop with default tolerances
    pub fn new(min_segment_length: f64) -> Self {
        Self {
            min_segment_length,
            tolerances: Tolerances::default(),
            close_loop_merge: true,
        }
    }

    pub fn with_tolerances(mut self, tolerances: Tolerances) -> Self {
        self.tolerances = tolerances;
        self
    }

    pub fn with_close_loop_merge(mut self, close_loop_merge: bool) -> Self {
        self.close_loop_merge = close_loop_merge;
        self
    }

    /// Shortest length that survives the noise filter
    #[inline]
    pub fn length_floor(&self) -> f64 {
        self.min_segment_length - self.tolerances.distance
    }
}

/// What a simplification run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimplifyStats {
    pub input_count: usize,
    /// Input primitives and flushed groups below the length floor
    pub dropped_short: usize,
    /// Lines absorbed into a preceding group
    pub merged: usize,
    /// Whether the last line was merged into the first across the seam
    pub wrapped: bool,
    pub output_count: usize,
}

/// Run of near-collinear lines being accumulated
#[derive(Debug, Clone, Copy)]
enum MergeGroup {
    NoGroup,
    Pending {
        start: Point3<f64>,
        end: Point3<f64>,
        /// Unit direction, fixed by the line that opened the group
        dir: Vector3<f64>,
    },
}

/// State threaded through the fold over the input primitives
struct Accumulator {
    output: Vec<CurvePrimitive>,
    group: MergeGroup,
    stats: SimplifyStats,
}

impl Accumulator {
    fn new(input_count: usize) -> Self {
        Self {
            output: Vec::with_capacity(input_count),
            group: MergeGroup::NoGroup,
            stats: SimplifyStats {
                input_count,
                ..Default::default()
            },
        }
    }

    fn push(mut self, curve: &CurvePrimitive, options: &SimplifyOptions) -> Self {
        let floor = options.length_floor();
        if curve.length() < floor {
            self.stats.dropped_short += 1;
            return self;
        }

        let line = match curve {
            CurvePrimitive::Line(line) => line,
            other => {
                let mut acc = self.flush(floor);
                acc.output.push(*other);
                return acc;
            }
        };

        let dir = line.direction();
        if dir == Vector3::zeros() {
            // Only reachable when min_segment_length <= distance tolerance
            self.stats.dropped_short += 1;
            return self;
        }

        match self.group {
            MergeGroup::NoGroup => {
                self.group = MergeGroup::Pending {
                    start: line.start,
                    end: line.end,
                    dir,
                };
                self
            }
            MergeGroup::Pending {
                start,
                end,
                dir: group_dir,
            } => {
                // Traversal direction must not matter for merging
                let (a, b, dir) = if group_dir.dot(&dir) < 0.0 {
                    (line.end, line.start, -dir)
                } else {
                    (line.start, line.end, dir)
                };

                match can_merge_sequential(&start, &end, &group_dir, &a, &b, &dir, &options.tolerances) {
                    Some(new_end) => {
                        self.group = MergeGroup::Pending {
                            start,
                            end: new_end,
                            dir: group_dir,
                        };
                        self.stats.merged += 1;
                        self
                    }
                    None => {
                        let mut acc = self.flush(floor);
                        acc.group = MergeGroup::Pending { start: a, end: b, dir };
                        acc
                    }
                }
            }
        }
    }

    /// Emit the pending group as one line if it is long enough
    fn flush(mut self, floor: f64) -> Self {
        if let MergeGroup::Pending { start, end, .. } =
            std::mem::replace(&mut self.group, MergeGroup::NoGroup)
        {
            if (end - start).norm() >= floor {
                self.output.push(CurvePrimitive::line(start, end));
            } else {
                self.stats.dropped_short += 1;
            }
        }
        self
    }
}

/// Simplify an ordered boundary into a minimal sequence of lines and arcs
pub fn simplify(curves: &[CurvePrimitive], options: &SimplifyOptions) -> Vec<CurvePrimitive> {
    simplify_with_stats(curves, options).0
}

/// Simplify a [`BoundaryLoop`]
pub fn simplify_loop(boundary: &BoundaryLoop, options: &SimplifyOptions) -> BoundaryLoop {
    BoundaryLoop::new(simplify(boundary.curves(), options))
}

/// [`simplify`], also reporting what was dropped and merged
pub fn simplify_with_stats(
    curves: &[CurvePrimitive],
    options: &SimplifyOptions,
) -> (Vec<CurvePrimitive>, SimplifyStats) {
    if curves.is_empty() {
        return (Vec::new(), SimplifyStats::default());
    }

    let (mut output, mut stats) = single_pass(curves, options);

    // A merged line no longer runs along its opener's direction, so under
    // loose tolerances it can merge with a neighbour it was kept apart from.
    // Repeat until nothing merges or drops.
    let mut previous_len = curves.len();
    while output.len() < previous_len && output.len() > 1 {
        previous_len = output.len();
        let (next, pass) = single_pass(&output, options);
        stats.dropped_short += pass.dropped_short;
        stats.merged += pass.merged;
        stats.wrapped |= pass.wrapped;
        output = next;
    }

    stats.output_count = output.len();
    (output, stats)
}

/// One left-to-right pass plus the optional seam merge
fn single_pass(curves: &[CurvePrimitive], options: &SimplifyOptions) -> (Vec<CurvePrimitive>, SimplifyStats) {
    let acc = curves
        .iter()
        .fold(Accumulator::new(curves.len()), |acc, curve| acc.push(curve, options));
    let Accumulator {
        mut output,
        mut stats,
        ..
    } = acc.flush(options.length_floor());

    if options.close_loop_merge {
        stats.wrapped = merge_across_seam(&mut output, &options.tolerances);
    }

    stats.output_count = output.len();
    (output, stats)
}

/// Merge the last output line into the first one if they continue each other
fn merge_across_seam(output: &mut Vec<CurvePrimitive>, tolerances: &Tolerances) -> bool {
    if output.len() < 2 {
        return false;
    }

    let (first, last) = match (output[0].as_line(), output[output.len() - 1].as_line()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return false,
    };

    let first_dir = first.direction();
    let last_dir = last.direction();
    let (l0, l1, last_dir) = if first_dir.dot(&last_dir) < 0.0 {
        (last.end, last.start, -last_dir)
    } else {
        (last.start, last.end, last_dir)
    };

    match can_merge_sequential(&l0, &l1, &last_dir, &first.start, &first.end, &first_dir, tolerances) {
        Some(merged_end) if (merged_end - l0).norm() > tolerances.distance => {
            output.pop();
            output[0] = CurvePrimitive::Line(LineSegment::new(l0, merged_end));
            true
        }
        _ => false,
    }
}

/// Test whether line `a→b` continues the group `group_start→group_end`
///
/// Directions must agree within the angle tolerance and both endpoints of
/// the incoming line must lie on the group's infinite supporting line. The
/// gap between the two is deliberately not limited: dropped noise segments
/// leave gaps that should be bridged.
///
/// Returns the group's new end, the point reached furthest along the group
/// direction, so a merge never shortens a group.
fn can_merge_sequential(
    group_start: &Point3<f64>,
    group_end: &Point3<f64>,
    group_dir: &Vector3<f64>,
    a: &Point3<f64>,
    b: &Point3<f64>,
    dir: &Vector3<f64>,
    tolerances: &Tolerances,
) -> Option<Point3<f64>> {
    if vector::angle_between(group_dir, dir) > tolerances.angle {
        return None;
    }

    if vector::distance_to_line(group_start, group_dir, a) > tolerances.distance
        || vector::distance_to_line(group_start, group_dir, b) > tolerances.distance
    {
        return None;
    }

    let along = |p: &Point3<f64>| (p - group_start).dot(group_dir);

    let mut farthest = (along(group_end), *group_end);
    for candidate in [a, b] {
        let t = along(candidate);
        if t > farthest.0 {
            farthest = (t, *candidate);
        }
    }

    Some(farthest.1)
}
