//! No-gap and travel rules.
//!
//! An instructor's lessons at one school (or at schools sharing a route)
//! must form a contiguous block within a bucket; a new lesson may extend
//! the block or close a hole already in it, never open a new hole.
//! Lessons at unrelated schools must be far enough apart to travel.

use std::collections::BTreeMap;

use super::Rejection;
use crate::models::SchoolAdjacency;

/// How a feasible slot relates to the instructor's existing lessons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotFit {
    /// No related lessons in the bucket yet.
    Open,
    /// Contiguous with an existing related lesson.
    Extends,
    /// Closes a hole between two existing related lessons.
    FillsHole,
}

/// Checks a candidate slot against an instructor's bucket occupancy.
///
/// `occupied` maps slot index → school. The candidate slot itself must
/// already be known to be free.
pub fn check_slot(
    occupied: &BTreeMap<usize, String>,
    slot: usize,
    school: &str,
    adjacency: &SchoolAdjacency,
    min_travel_distance: usize,
) -> Result<SlotFit, Rejection> {
    let mut related = Vec::with_capacity(occupied.len());
    for (&taken, taken_school) in occupied {
        if adjacency.related(school, taken_school) {
            related.push(taken);
        } else if taken.abs_diff(slot) < min_travel_distance {
            return Err(Rejection::TravelConflict);
        }
    }

    if related.is_empty() {
        return Ok(SlotFit::Open);
    }

    // `related` is sorted: BTreeMap iterates in key order.
    let fills_hole = related
        .windows(2)
        .any(|w| w[1] - w[0] > 1 && w[0] < slot && slot < w[1]);
    if fills_hole {
        return Ok(SlotFit::FillsHole);
    }

    if related.iter().any(|&taken| taken.abs_diff(slot) == 1) {
        Ok(SlotFit::Extends)
    } else {
        Err(Rejection::CreatesGap)
    }
}
