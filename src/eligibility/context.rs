//! Bucket context for eligibility evaluation.

use crate::config::EngineConfig;
use crate::models::{RegionCompatibility, SchoolAdjacency, Shift, Weekday};

/// Fixed facts about the bucket being scheduled.
///
/// A bucket is one (school, weekday, shift). Everything here is read-only
/// while the bucket's demand is assigned; the mutable side lives in the
/// instructor pool.
#[derive(Debug, Clone, Copy)]
pub struct BucketContext<'a> {
    /// School of every class in the bucket.
    pub school: &'a str,
    /// Shift of the bucket.
    pub shift: Shift,
    /// Weekday of the bucket (`None` for unplanned grades).
    pub weekday: Option<Weekday>,
    /// School adjacency from the route table.
    pub adjacency: &'a SchoolAdjacency,
    /// Declared region pairs.
    pub regions: &'a RegionCompatibility,
    /// Engine configuration.
    pub config: &'a EngineConfig,
}

/// One lesson slot looking for an instructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRequest<'a> {
    /// Required subject (normalized).
    pub subject: &'a str,
    /// Region of the class section.
    pub region: &'a str,
    /// Slot index within the bucket.
    pub slot: usize,
}

impl<'a> BucketContext<'a> {
    /// Creates a context for one bucket.
    pub fn new(
        school: &'a str,
        shift: Shift,
        weekday: Option<Weekday>,
        adjacency: &'a SchoolAdjacency,
        regions: &'a RegionCompatibility,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            school,
            shift,
            weekday,
            adjacency,
            regions,
            config,
        }
    }
}

impl<'a> SlotRequest<'a> {
    /// Creates a request.
    pub fn new(subject: &'a str, region: &'a str, slot: usize) -> Self {
        Self {
            subject,
            region,
            slot,
        }
    }
}
