// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Region grouper: merges detector proposals that cover the same spine and
// orders the groups for reading (rows top to bottom, then left to right).

use std::cmp::Ordering;

use shelfscan_core::geometry::{is_valid, overlap_ratio, union};
use shelfscan_core::{BookRegionGroup, RegionProposal, ScanConfig};
use tracing::{debug, instrument};

/// Group proposals into spines.
///
/// Proposals are visited by ascending `min_x`; each unclaimed proposal seeds
/// a group and absorbs every later unclaimed proposal that overlaps the seed
/// or sits directly above/below it. Invalid proposals are never merged: each
/// becomes a group of its own so that it surfaces as a per-book failure.
#[instrument(skip_all, fields(proposals = proposals.len()))]
pub fn group_regions(proposals: &[RegionProposal], config: &ScanConfig) -> Vec<BookRegionGroup> {
    let mut order: Vec<usize> = (0..proposals.len()).collect();
    order.sort_by(|&a, &b| {
        proposals[a]
            .bounding_box
            .min_x
            .total_cmp(&proposals[b].bounding_box.min_x)
    });

    let mut claimed = vec![false; proposals.len()];
    let mut groups = Vec::new();

    for (pos, &seed_idx) in order.iter().enumerate() {
        if claimed[seed_idx] {
            continue;
        }
        claimed[seed_idx] = true;
        let seed = proposals[seed_idx];
        let mut members = vec![seed];

        if is_valid(&seed.bounding_box) {
            for &other_idx in &order[pos + 1..] {
                let other = proposals[other_idx];
                if !claimed[other_idx]
                    && is_valid(&other.bounding_box)
                    && same_spine(&seed, &other, config)
                {
                    claimed[other_idx] = true;
                    members.push(other);
                }
            }
        }

        let combined_bounding_box = members[1..]
            .iter()
            .fold(seed.bounding_box, |acc, p| union(&acc, &p.bounding_box));
        groups.push(BookRegionGroup {
            proposals: members,
            combined_bounding_box,
        });
    }

    let groups = into_reading_order(groups, config.reading_order_row_tolerance);
    debug!(groups = groups.len(), "grouped region proposals");
    groups
}

fn same_spine(seed: &RegionProposal, other: &RegionProposal, config: &ScanConfig) -> bool {
    let a = &seed.bounding_box;
    let b = &other.bounding_box;
    overlap_ratio(a, b) > config.grouping_overlap_threshold
        || ((a.min_x - b.min_x).abs() < config.grouping_horizontal_gap
            && (a.mid_y() - b.mid_y()).abs() < config.grouping_vertical_center)
}

/// Sort groups into rows by vertical centre (higher `mid_y` first, since the
/// origin is bottom-left) and each row by `min_x`.
///
/// A row collects every group whose centre lies within `row_tolerance` of the
/// row's first group. Only total orders are used, so any input sorts.
pub fn into_reading_order(
    mut groups: Vec<BookRegionGroup>,
    row_tolerance: f32,
) -> Vec<BookRegionGroup> {
    groups.sort_by(|a, b| {
        b.combined_bounding_box
            .mid_y()
            .total_cmp(&a.combined_bounding_box.mid_y())
    });

    let mut rows: Vec<Vec<BookRegionGroup>> = Vec::new();
    for group in groups {
        let joins_row = rows.last().and_then(|row| row.first()).is_some_and(|anchor| {
            anchor.combined_bounding_box.mid_y() - group.combined_bounding_box.mid_y()
                <= row_tolerance
        });
        match rows.last_mut() {
            Some(row) if joins_row => row.push(group),
            _ => rows.push(vec![group]),
        }
    }

    rows.into_iter()
        .flat_map(|mut row| {
            row.sort_by(by_left_edge);
            row
        })
        .collect()
}

fn by_left_edge(a: &BookRegionGroup, b: &BookRegionGroup) -> Ordering {
    a.combined_bounding_box
        .min_x
        .total_cmp(&b.combined_bounding_box.min_x)
}
