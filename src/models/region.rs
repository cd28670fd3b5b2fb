//! Region compatibility.
//!
//! Instructors normally teach inside their own region. A district may
//! declare pairs of regions whose instructor pools are shared for every
//! subject; any other cross-region assignment is infeasible.

use serde::{Deserialize, Serialize};

use crate::normalize::normalize_label;

/// Region tier for an instructor teaching in its own region.
pub const SAME_REGION_TIER: u32 = 100;
/// Region tier for a declared compatible pair.
pub const COMPATIBLE_PAIR_TIER: u32 = 75;

/// Two regions that share instructors for all subjects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionPair {
    /// First-declared region; pooled positions are filed under it.
    pub primary: String,
    /// The other region of the pair.
    pub secondary: String,
}

/// Declared region-pair compatibility rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionCompatibility {
    pairs: Vec<RegionPair>,
}

impl RegionPair {
    /// Creates a pair. Labels are normalized.
    pub fn new(primary: &str, secondary: &str) -> Self {
        Self {
            primary: normalize_label(primary),
            secondary: normalize_label(secondary),
        }
    }

    /// Whether the pair links `a` and `b` (in either order).
    pub fn links(&self, a: &str, b: &str) -> bool {
        (self.primary == a && self.secondary == b) || (self.primary == b && self.secondary == a)
    }

    /// Whether `region` belongs to the pair.
    pub fn contains(&self, region: &str) -> bool {
        self.primary == region || self.secondary == region
    }
}

impl RegionCompatibility {
    /// Creates a rule set with no declared pairs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a rule set from declared pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = RegionPair>) -> Self {
        Self {
            pairs: pairs.into_iter().collect(),
        }
    }

    /// Declares a compatible pair (builder style).
    pub fn with_pair(mut self, primary: &str, secondary: &str) -> Self {
        self.pairs.push(RegionPair::new(primary, secondary));
        self
    }

    /// Declared pairs.
    pub fn pairs(&self) -> &[RegionPair] {
        &self.pairs
    }

    /// Tier of an instructor from `instructor_region` teaching in
    /// `class_region`: 100 same region, 75 declared pair, 0 infeasible.
    pub fn tier(&self, instructor_region: &str, class_region: &str) -> u32 {
        if instructor_region == class_region {
            SAME_REGION_TIER
        } else if self
            .pairs
            .iter()
            .any(|p| p.links(instructor_region, class_region))
        {
            COMPATIBLE_PAIR_TIER
        } else {
            0
        }
    }

    /// The region demand is pooled under for staffing purposes.
    ///
    /// Regions in a declared pair pool under the pair's primary region;
    /// others pool under themselves.
    pub fn pool_region<'a>(&'a self, region: &'a str) -> &'a str {
        self.pairs
            .iter()
            .find(|p| p.contains(region))
            .map(|p| p.primary.as_str())
            .unwrap_or(region)
    }
}
