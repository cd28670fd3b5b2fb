//! Engine configuration.
//!
//! Every tunable constant of the engine lives in [`EngineConfig`]: the
//! restart budget, workload limits, scoring weights, travel distance,
//! planning-time rule, the specialist subject filter and the declared
//! region pairs. Defaults carry the district's numeric rules but no
//! subject filter and no region pairs; [`EngineConfig::district`] adds
//! those too. A TOML document may override any subset of fields.
//!
//! ```
//! use u_timetable::config::EngineConfig;
//!
//! let config = EngineConfig::from_toml_str(r#"
//!     max_attempts = 80
//!
//!     [workload]
//!     min = 12
//!
//!     [[compatible_regions]]
//!     primary = "Fundão"
//!     secondary = "Timbuí"
//! "#).unwrap();
//!
//! assert_eq!(config.max_attempts, 80);
//! assert_eq!(config.workload.min, 12);
//! assert_eq!(config.workload.max, 30);
//! assert_eq!(config.region_compatibility().tier("TIMBUI", "FUNDAO"), 75);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{TimetableError, TimetableResult};
use crate::models::{RegionCompatibility, RegionPair};
use crate::normalize::{canonical_subject, normalize_label};

/// Subjects the district staffs with specialists.
pub const DISTRICT_SPECIALIST_SUBJECTS: [&str; 5] = [
    "Arte",
    "Educação Física",
    "Ensino Religioso",
    "Língua Inglesa",
    "Contação de História",
];

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Restart attempts per bucket before settling for a partial grid.
    pub max_attempts: usize,
    /// District-wide cap on weekly lessons per instructor.
    pub hard_ceiling: u32,
    /// Workload band and split preferences for synthesized positions.
    pub workload: WorkloadPolicy,
    /// Candidate ranking weights.
    pub scoring: ScoringWeights,
    /// Slot distance required between lessons at schools sharing no group.
    pub min_travel_distance: usize,
    /// How planning time is derived from teaching load.
    pub planning_rule: PlanningRule,
    /// Subjects taught by specialists. Empty means every subject.
    pub specialist_subjects: Vec<String>,
    /// Region pairs sharing instructors for all subjects.
    pub compatible_regions: Vec<RegionPair>,
}

/// Per-position workload limits and preferred splits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadPolicy {
    /// Smallest regular position load.
    pub min: u32,
    /// Largest position load.
    pub max: u32,
    /// Average load used to size unpinned splits.
    pub target_mean: u32,
    /// Round loads to snap to, in order of preference.
    pub preferred: Vec<u32>,
    /// How far a load may move to reach a preferred value.
    pub snap_tolerance: u32,
}

/// Additive scoring weights for candidate ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Permanent instructor at one of its home schools.
    pub home_school_permanent: i64,
    /// Multiplier applied to the region tier.
    pub region_tier: i64,
    /// Target school is a home school, any employment kind.
    pub home_school: i64,
    /// Target school already visited this run.
    pub visited_school: i64,
    /// Multiplier applied to remaining lessons under the hard ceiling.
    pub remaining_capacity: i64,
    /// Candidate slot fills a hole in the instructor's day.
    pub gap_fill: i64,
}

/// Planning-time rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanningRule {
    /// One third of the teaching load, rounded, at least 1.
    OneThird,
    /// Municipal table: half the teaching load, rounded down.
    HalfFloor,
}

/// Outcome of checking a load against the workload band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkloadCheck {
    /// Within [min, max].
    Within,
    /// Below min, allowed because the whole demand is below min.
    SmallDemandException,
    /// Above max.
    AboveMax,
    /// Below min with enough demand for a regular position.
    BelowMin,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_attempts: 50,
            hard_ceiling: 30,
            workload: WorkloadPolicy::default(),
            scoring: ScoringWeights::default(),
            min_travel_distance: 3,
            planning_rule: PlanningRule::OneThird,
            specialist_subjects: Vec::new(),
            compatible_regions: Vec::new(),
        }
    }
}

impl Default for WorkloadPolicy {
    fn default() -> Self {
        Self {
            min: 14,
            max: 30,
            target_mean: 20,
            preferred: vec![30, 25, 20, 15],
            snap_tolerance: 2,
        }
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            home_school_permanent: 100_000,
            region_tier: 1_000,
            home_school: 2_000,
            visited_school: 1_000,
            remaining_capacity: 10,
            gap_fill: 5_000,
        }
    }
}

impl EngineConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a TOML document. Missing fields take defaults.
    pub fn from_toml_str(text: &str) -> TimetableResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus the district's specialist subjects and its one
    /// compatible region pair (Fundão and Timbuí).
    ///
    /// ```
    /// use u_timetable::config::EngineConfig;
    ///
    /// let config = EngineConfig::district();
    /// assert!(config.is_specialist("LINGUA INGLESA"));
    /// assert!(!config.is_specialist("MATEMATICA"));
    /// assert_eq!(config.region_compatibility().tier("FUNDAO", "TIMBUI"), 75);
    /// ```
    pub fn district() -> Self {
        DISTRICT_SPECIALIST_SUBJECTS
            .iter()
            .fold(Self::default(), |c, s| c.with_specialist_subject(s))
            .with_compatible_regions("Fundão", "Timbuí")
    }

    /// Sets the restart budget.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the hard lesson ceiling.
    pub fn with_hard_ceiling(mut self, hard_ceiling: u32) -> Self {
        self.hard_ceiling = hard_ceiling;
        self
    }

    /// Sets the workload policy.
    pub fn with_workload(mut self, workload: WorkloadPolicy) -> Self {
        self.workload = workload;
        self
    }

    /// Sets the planning-time rule.
    pub fn with_planning_rule(mut self, rule: PlanningRule) -> Self {
        self.planning_rule = rule;
        self
    }

    /// Sets the minimum travel distance.
    pub fn with_min_travel_distance(mut self, distance: usize) -> Self {
        self.min_travel_distance = distance;
        self
    }

    /// Adds a specialist subject to the filter.
    pub fn with_specialist_subject(mut self, subject: &str) -> Self {
        self.specialist_subjects.push(canonical_subject(subject));
        self
    }

    /// Declares a compatible region pair.
    pub fn with_compatible_regions(mut self, primary: &str, secondary: &str) -> Self {
        self.compatible_regions.push(RegionPair::new(primary, secondary));
        self
    }

    /// Checks internal consistency.
    pub fn validate(&self) -> TimetableResult<()> {
        if self.max_attempts == 0 {
            return Err(TimetableError::Configuration(
                "max_attempts must be at least 1".into(),
            ));
        }
        if self.hard_ceiling == 0 {
            return Err(TimetableError::Configuration(
                "hard_ceiling must be positive".into(),
            ));
        }
        if self.workload.max == 0 || self.workload.min > self.workload.max {
            return Err(TimetableError::Configuration(format!(
                "workload band [{}, {}] is empty",
                self.workload.min, self.workload.max
            )));
        }
        if self.workload.target_mean == 0 {
            return Err(TimetableError::Configuration(
                "workload.target_mean must be positive".into(),
            ));
        }
        if self.workload.preferred.is_empty() {
            return Err(TimetableError::Configuration(
                "workload.preferred needs at least one load".into(),
            ));
        }
        if self.min_travel_distance == 0 {
            return Err(TimetableError::Configuration(
                "min_travel_distance must be at least 1".into(),
            ));
        }
        for pair in &self.compatible_regions {
            if normalize_label(&pair.primary) == normalize_label(&pair.secondary) {
                return Err(TimetableError::Configuration(format!(
                    "region pair links '{}' with itself",
                    pair.primary
                )));
            }
        }
        Ok(())
    }

    /// Region rules built from the declared pairs.
    pub fn region_compatibility(&self) -> RegionCompatibility {
        RegionCompatibility::from_pairs(
            self.compatible_regions
                .iter()
                .map(|p| RegionPair::new(&p.primary, &p.secondary)),
        )
    }

    /// Whether curriculum rows for `subject` generate specialist demand.
    pub fn is_specialist(&self, subject: &str) -> bool {
        self.specialist_subjects.is_empty()
            || self
                .specialist_subjects
                .iter()
                .any(|s| canonical_subject(s) == subject)
    }
}

impl WorkloadPolicy {
    /// Classifies `load` for a demand of `total` lessons.
    pub fn check(&self, load: u32, total: u32) -> WorkloadCheck {
        if load > self.max {
            WorkloadCheck::AboveMax
        } else if load >= self.min {
            WorkloadCheck::Within
        } else if total < self.min {
            WorkloadCheck::SmallDemandException
        } else {
            WorkloadCheck::BelowMin
        }
    }
}

impl PlanningRule {
    /// Planning time owed for a weekly teaching load.
    pub fn planning_time(&self, load: u32) -> u32 {
        match self {
            // round(load / 3); thirds never land on .5
            PlanningRule::OneThird => ((load + 1) / 3).max(1),
            PlanningRule::HalfFloor => load / 2,
        }
    }
}
