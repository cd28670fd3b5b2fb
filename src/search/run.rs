//! Whole-district run driver.
//!
//! Groups classes into buckets and searches them one after another,
//! threading the instructor pool through every bucket so that weekly
//! workload and visited schools accumulate across the run.
//!
//! Bucket order is deterministic: schools in order of first appearance,
//! then (weekday, shift) ascending with the unplanned day first.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{BucketOutcome, Coverage, RestartSearch, UnstaffableDemand};
use crate::config::EngineConfig;
use crate::demand::DemandExpander;
use crate::eligibility::BucketContext;
use crate::error::TimetableResult;
use crate::models::{
    ClassSection, Curriculum, DayPlan, Instructor, InstructorPool, SchoolAdjacency, SchoolGroup,
    Shift, Timetable, Weekday,
};
use crate::reconcile::{reconcile_deficits, DeficitMap};
use crate::validation::validate_input;

/// Input tables of a run.
#[derive(Debug, Clone, Default)]
pub struct RunInput {
    /// Registered class sections.
    pub classes: Vec<ClassSection>,
    /// Weekly lesson quotas by grade.
    pub curriculum: Curriculum,
    /// Instructor records.
    pub instructors: Vec<Instructor>,
    /// School routes.
    pub groups: Vec<SchoolGroup>,
    /// Per-grade planning days.
    pub day_plan: DayPlan,
}

/// Summary of one searched bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSummary {
    pub school: String,
    pub weekday: Option<Weekday>,
    pub shift: Shift,
    pub coverage: Coverage,
    pub attempts: usize,
    pub unfilled: usize,
}

/// Weekly load of one instructor after the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructorWorkload {
    /// Instructor id.
    pub id: String,
    /// Lessons assigned across all buckets.
    pub assigned: u32,
    /// Planning time owed for the assigned load.
    pub planning_time: u32,
    /// Distinct schools visited.
    pub schools_visited: usize,
}

/// Everything a run produces.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// All rows, bucket by bucket.
    pub timetable: Timetable,
    /// Final instructor state.
    pub pool: InstructorPool,
    /// Per-bucket outcome summaries, in processing order.
    pub buckets: Vec<BucketSummary>,
    /// Starved demand across all buckets.
    pub unstaffable: Vec<UnstaffableDemand>,
    /// Uncovered lessons by (region, subject).
    pub deficits: DeficitMap,
    /// Per-instructor load, in pool order.
    pub workloads: Vec<InstructorWorkload>,
}

/// Sequential run over every bucket of the district.
///
/// # Example
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use u_timetable::config::EngineConfig;
/// use u_timetable::models::*;
/// use u_timetable::search::{RunInput, TimetableRun};
///
/// let input = RunInput::new(
///     vec![ClassSection::new("Escola A", "1 ano", "A", Shift::Morning, "Norte")],
///     Curriculum::new().with_requirement("1 ano", "Arte", 2),
///     vec![Instructor::itinerant("P1", "Norte").with_subject("Arte").with_capacity(20)],
/// );
/// let mut rng = StdRng::seed_from_u64(1);
/// let report = TimetableRun::new(EngineConfig::default())
///     .execute(&input, &mut rng)
///     .unwrap();
///
/// assert!(report.is_fully_covered());
/// assert_eq!(report.workloads[0].assigned, 2);
/// ```
#[derive(Debug, Clone)]
pub struct TimetableRun {
    config: EngineConfig,
}

impl RunInput {
    /// Creates an input with no routes and no planning days.
    pub fn new(
        classes: Vec<ClassSection>,
        curriculum: Curriculum,
        instructors: Vec<Instructor>,
    ) -> Self {
        Self {
            classes,
            curriculum,
            instructors,
            groups: Vec::new(),
            day_plan: DayPlan::default(),
        }
    }

    /// Sets school routes.
    pub fn with_groups(mut self, groups: Vec<SchoolGroup>) -> Self {
        self.groups = groups;
        self
    }

    /// Sets the planning-day table.
    pub fn with_day_plan(mut self, day_plan: DayPlan) -> Self {
        self.day_plan = day_plan;
        self
    }

    /// Classes grouped into buckets, in processing order.
    pub fn buckets(&self) -> Vec<(String, Option<Weekday>, Shift, Vec<ClassSection>)> {
        let mut schools: Vec<&str> = Vec::new();
        let mut by_school: BTreeMap<&str, BTreeMap<(Option<Weekday>, Shift), Vec<ClassSection>>> =
            BTreeMap::new();

        for class in &self.classes {
            if !by_school.contains_key(class.school.as_str()) {
                schools.push(&class.school);
            }
            let buckets = by_school.entry(&class.school).or_default();
            for day in self.day_plan.scheduling_days(&class.grade) {
                buckets
                    .entry((day, class.shift))
                    .or_default()
                    .push(class.clone());
            }
        }

        let mut ordered = Vec::new();
        for school in schools {
            if let Some(buckets) = by_school.remove(school) {
                for ((day, shift), classes) in buckets {
                    ordered.push((school.to_string(), day, shift, classes));
                }
            }
        }
        ordered
    }
}

impl RunReport {
    /// Whether every bucket was fully covered.
    pub fn is_fully_covered(&self) -> bool {
        self.buckets.iter().all(|b| b.coverage.is_full())
    }
}

impl TimetableRun {
    /// Creates a run driver.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs every bucket and reconciles the result.
    ///
    /// Input issues found by [`validate_input`] are logged, not fatal.
    ///
    /// # Errors
    /// Only on an invalid configuration; scheduling shortfalls are
    /// reported in the [`RunReport`].
    pub fn execute<R: Rng>(&self, input: &RunInput, rng: &mut R) -> TimetableResult<RunReport> {
        self.config.validate()?;
        if let Err(issues) = validate_input(input) {
            for issue in &issues {
                warn!(kind = ?issue.kind, "{}", issue.message);
            }
        }

        let adjacency = SchoolAdjacency::from_groups(&input.groups);
        let regions = self.config.region_compatibility();
        let expander = DemandExpander::new(&input.curriculum, &self.config);

        let mut pool = InstructorPool::new(input.instructors.iter().cloned());
        let mut timetable = Timetable::new();
        let mut buckets = Vec::new();
        let mut unstaffable = Vec::new();

        for (school, weekday, shift, classes) in input.buckets() {
            let ctx = BucketContext::new(
                &school,
                shift,
                weekday,
                &adjacency,
                &regions,
                &self.config,
            );
            let demand = expander.expand_bucket(&classes);
            let (outcome, next_pool) = RestartSearch::new(ctx).search(&classes, &demand, pool, rng);
            pool = next_pool;

            let BucketOutcome {
                coverage,
                rows,
                attempts,
                unstaffable: starved,
            } = outcome;
            buckets.push(BucketSummary {
                school: school.clone(),
                weekday,
                shift,
                coverage,
                attempts,
                unfilled: rows.iter().map(|r| r.unfilled_count()).sum(),
            });
            timetable.extend(rows);
            unstaffable.extend(starved);
        }
        pool.clear_bucket_occupancy();

        let deficits = reconcile_deficits(
            &timetable,
            &input.classes,
            &input.curriculum,
            &input.instructors,
            &self.config,
        );
        let workloads = pool
            .iter()
            .map(|s| InstructorWorkload {
                id: s.instructor.id.clone(),
                assigned: s.load.assigned,
                planning_time: if s.load.assigned == 0 {
                    0
                } else {
                    self.config.planning_rule.planning_time(s.load.assigned)
                },
                schools_visited: s.load.visited.len(),
            })
            .collect();

        info!(
            buckets = buckets.len(),
            rows = timetable.rows.len(),
            unfilled = timetable.unfilled_count(),
            deficit = deficits.total(),
            "timetable run finished"
        );

        Ok(RunReport {
            timetable,
            pool,
            buckets,
            unstaffable,
            deficits,
            workloads,
        })
    }
}
