//! Instructor eligibility and ranking.
//!
//! Given a bucket (school, weekday, shift) and one slot needing a subject,
//! decides which instructors may take it and orders the feasible ones.
//!
//! # Hard constraints (checked in order)
//!
//! | Check | Rejection |
//! |-------|-----------|
//! | Instructor teaches the subject | [`Rejection::NotQualified`] |
//! | Fixed shift allows the bucket's shift | [`Rejection::ShiftMismatch`] |
//! | Region tier is nonzero | [`Rejection::RegionIncompatible`] |
//! | Assigned < min(capacity, hard ceiling) | [`Rejection::AtCapacity`] |
//! | Slot free for the instructor | [`Rejection::SlotTaken`] |
//! | No new hole at related schools | [`Rejection::CreatesGap`] |
//! | Travel distance to unrelated schools | [`Rejection::TravelConflict`] |
//!
//! # Scoring
//!
//! Additive weights from [`ScoringWeights`](crate::config::ScoringWeights);
//! see [`ScoreBreakdown`].

mod context;
mod engine;
pub mod gap;

pub use context::{BucketContext, SlotRequest};
pub use engine::{Candidate, EligibilityEngine, ScoreBreakdown};
pub use gap::{check_slot, SlotFit};

/// Why an instructor cannot take a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// Subject not in the instructor's qualifications.
    NotQualified,
    /// Instructor is fixed to the other shift.
    ShiftMismatch,
    /// Instructor region cannot serve the class region.
    RegionIncompatible,
    /// Weekly load already at capacity.
    AtCapacity,
    /// Instructor already teaches in this slot.
    SlotTaken,
    /// Slot would leave a hole in the instructor's day.
    CreatesGap,
    /// Too close to a lesson at an unrelated school.
    TravelConflict,
}
