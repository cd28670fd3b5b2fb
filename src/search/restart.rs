//! Randomized-restart search for one bucket.
//!
//! # Algorithm
//!
//! 1. Snapshot the incoming pool and clear bucket occupancy.
//! 2. Shuffle the demand order with the caller's RNG.
//! 3. For each demand item, commit the best-ranked instructor or mark the
//!    cell unfilled.
//! 4. Stop at the first attempt with nothing unfilled; otherwise retry
//!    from the snapshot until the attempt budget is spent and keep the
//!    last attempt.
//!
//! # Complexity
//! O(a * d * p) where a=attempts, d=demand items, p=pool size.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::demand::DemandItem;
use crate::eligibility::{BucketContext, EligibilityEngine, SlotRequest};
use crate::models::{Cell, ClassSection, InstructorPool, Shift, TimetableRow, Weekday};

/// Whether a bucket's demand was fully met.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Coverage {
    /// Every lesson has an instructor.
    FullyCovered,
    /// The attempt budget ran out with unfilled cells left.
    Partial,
}

/// Demand no instructor could take in any attempt.
///
/// Reported so that a person can add instructors or relax constraints;
/// never aborts other buckets.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnstaffableDemand {
    /// Region of the classes needing the subject.
    pub region: String,
    /// Subject with no feasible instructor.
    pub subject: String,
    /// School of the bucket.
    pub school: String,
    /// Shift of the bucket.
    pub shift: Shift,
    /// Weekday of the bucket.
    pub weekday: Option<Weekday>,
}

/// Result of searching one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketOutcome {
    /// Coverage flag.
    pub coverage: Coverage,
    /// One row per class in the bucket, in input order.
    pub rows: Vec<TimetableRow>,
    /// Attempts used (1-based).
    pub attempts: usize,
    /// Subjects starved in every attempt (empty when fully covered).
    pub unstaffable: Vec<UnstaffableDemand>,
}

/// Randomized-restart greedy search over one bucket.
///
/// # Example
///
/// ```
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use u_timetable::config::EngineConfig;
/// use u_timetable::demand::DemandExpander;
/// use u_timetable::eligibility::BucketContext;
/// use u_timetable::models::*;
/// use u_timetable::search::{Coverage, RestartSearch};
///
/// let config = EngineConfig::default();
/// let curriculum = Curriculum::new().with_requirement("1 ANO", "Arte", 2);
/// let classes = vec![ClassSection::new("Escola A", "1 ano", "A", Shift::Morning, "Norte")];
/// let pool = InstructorPool::new(vec![
///     Instructor::itinerant("P1", "Norte").with_subject("Arte").with_capacity(20),
/// ]);
/// let adjacency = SchoolAdjacency::default();
/// let regions = RegionCompatibility::new();
/// let ctx = BucketContext::new("ESCOLA A", Shift::Morning, None, &adjacency, &regions, &config);
///
/// let demand = DemandExpander::new(&curriculum, &config).expand_bucket(&classes);
/// let mut rng = StdRng::seed_from_u64(7);
/// let (outcome, pool) = RestartSearch::new(ctx).search(&classes, &demand, pool, &mut rng);
///
/// assert_eq!(outcome.coverage, Coverage::FullyCovered);
/// assert_eq!(pool.total_assigned(), 2);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RestartSearch<'a> {
    context: BucketContext<'a>,
}

/// One attempt's grid and pool.
struct Attempt {
    rows: Vec<TimetableRow>,
    pool: InstructorPool,
    unfilled: usize,
    starved: BTreeSet<(String, String)>,
}

impl Coverage {
    /// Whether the bucket is fully covered.
    pub fn is_full(&self) -> bool {
        matches!(self, Coverage::FullyCovered)
    }
}

impl BucketOutcome {
    /// Unfilled cells in the bucket's grid.
    pub fn unfilled_count(&self) -> usize {
        self.rows.iter().map(TimetableRow::unfilled_count).sum()
    }
}

impl<'a> RestartSearch<'a> {
    /// Creates a search for a bucket.
    pub fn new(context: BucketContext<'a>) -> Self {
        Self { context }
    }

    /// Searches the bucket and returns the outcome with the updated pool.
    ///
    /// `demand` items index into `classes`. The returned pool is the one
    /// of the attempt whose grid is returned; occupancy of that bucket is
    /// left in place until the next bucket clears it.
    pub fn search<R: Rng>(
        &self,
        classes: &[ClassSection],
        demand: &[DemandItem],
        pool: InstructorPool,
        rng: &mut R,
    ) -> (BucketOutcome, InstructorPool) {
        let ctx = &self.context;
        let max_attempts = ctx.config.max_attempts.max(1);
        let mut order: Vec<usize> = (0..demand.len()).collect();
        let mut starved_every_attempt: Option<BTreeSet<(String, String)>> = None;
        let mut last: Option<Attempt> = None;

        for attempt_no in 1..=max_attempts {
            order.shuffle(rng);
            let attempt = self.attempt(classes, demand, &order, &pool);

            if attempt.unfilled == 0 {
                info!(
                    school = %ctx.school,
                    shift = %ctx.shift,
                    weekday = ?ctx.weekday,
                    attempts = attempt_no,
                    "bucket fully covered"
                );
                let outcome = BucketOutcome {
                    coverage: Coverage::FullyCovered,
                    rows: attempt.rows,
                    attempts: attempt_no,
                    unstaffable: Vec::new(),
                };
                return (outcome, attempt.pool);
            }

            debug!(
                school = %ctx.school,
                attempt = attempt_no,
                unfilled = attempt.unfilled,
                "attempt left unfilled cells"
            );
            starved_every_attempt = Some(match starved_every_attempt {
                None => attempt.starved.clone(),
                Some(prev) => prev.intersection(&attempt.starved).cloned().collect(),
            });
            last = Some(attempt);
        }

        let Some(attempt) = last else {
            // max_attempts >= 1 guarantees one attempt ran
            return (
                BucketOutcome {
                    coverage: Coverage::Partial,
                    rows: Vec::new(),
                    attempts: 0,
                    unstaffable: Vec::new(),
                },
                pool,
            );
        };

        let unstaffable: Vec<UnstaffableDemand> = starved_every_attempt
            .unwrap_or_default()
            .into_iter()
            .map(|(region, subject)| UnstaffableDemand {
                region,
                subject,
                school: ctx.school.to_string(),
                shift: ctx.shift,
                weekday: ctx.weekday,
            })
            .collect();
        for report in &unstaffable {
            warn!(
                region = %report.region,
                subject = %report.subject,
                school = %report.school,
                shift = %report.shift,
                weekday = ?report.weekday,
                "no feasible instructor for subject in any attempt"
            );
        }
        warn!(
            school = %ctx.school,
            shift = %ctx.shift,
            weekday = ?ctx.weekday,
            attempts = max_attempts,
            unfilled = attempt.unfilled,
            "attempt budget exhausted; keeping partial grid"
        );

        let outcome = BucketOutcome {
            coverage: Coverage::Partial,
            rows: attempt.rows,
            attempts: max_attempts,
            unstaffable,
        };
        (outcome, attempt.pool)
    }

    /// Runs one greedy pass over the demand in the given order.
    fn attempt(
        &self,
        classes: &[ClassSection],
        demand: &[DemandItem],
        order: &[usize],
        snapshot: &InstructorPool,
    ) -> Attempt {
        let ctx = &self.context;
        let engine = EligibilityEngine::new(self.context);
        let mut pool = snapshot.clone();
        pool.clear_bucket_occupancy();

        let mut rows: Vec<TimetableRow> = classes
            .iter()
            .map(|c| TimetableRow::for_class(c, ctx.weekday))
            .collect();
        let mut unfilled = 0;
        let mut demanded = BTreeSet::new();
        let mut served = BTreeSet::new();

        for &i in order {
            let item = &demand[i];
            let Some(subject) = item.lesson.subject() else {
                continue;
            };
            let class = &classes[item.class];
            let key = (class.region.clone(), subject.to_string());
            demanded.insert(key.clone());

            let request = SlotRequest::new(subject, &class.region, item.slot);
            let chosen = engine
                .select_best(&pool, &request)
                .and_then(|c| pool.get(c.index).map(|s| (c.index, s.instructor.id.clone())));

            match chosen {
                Some((index, id)) => {
                    pool.commit(index, item.slot, ctx.school);
                    rows[item.class].slots[item.slot] = Cell::assigned(id, subject);
                    served.insert(key);
                }
                None => {
                    rows[item.class].slots[item.slot] = Cell::Unfilled;
                    unfilled += 1;
                }
            }
        }

        let starved = demanded.difference(&served).cloned().collect();
        Attempt {
            rows,
            pool,
            unfilled,
            starved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::config::EngineConfig;
    use crate::demand::DemandExpander;
    use crate::models::{
        Curriculum, Instructor, RegionCompatibility, SchoolAdjacency, SLOTS_PER_DAY,
    };

    struct Fixture {
        adjacency: SchoolAdjacency,
        regions: RegionCompatibility,
        config: EngineConfig,
        curriculum: Curriculum,
    }

    impl Fixture {
        fn new(curriculum: Curriculum) -> Self {
            Self {
                adjacency: SchoolAdjacency::default(),
                regions: RegionCompatibility::new().with_pair("FUNDAO", "TIMBUI"),
                config: EngineConfig::default().with_max_attempts(10),
                curriculum,
            }
        }

        fn run(
            &self,
            classes: &[ClassSection],
            pool: InstructorPool,
            seed: u64,
        ) -> (BucketOutcome, InstructorPool) {
            let ctx = BucketContext::new(
                &classes[0].school,
                classes[0].shift,
                Some(Weekday::Monday),
                &self.adjacency,
                &self.regions,
                &self.config,
            );
            let demand = DemandExpander::new(&self.curriculum, &self.config).expand_bucket(classes);
            let mut rng = StdRng::seed_from_u64(seed);
            RestartSearch::new(ctx).search(classes, &demand, pool, &mut rng)
        }
    }

    fn class(section: &str, region: &str) -> ClassSection {
        ClassSection::new("ESCOLA A", "1 ANO", section, Shift::Morning, region)
    }

    fn art_instructor(id: &str, region: &str, capacity: u32) -> Instructor {
        Instructor::itinerant(id, region)
            .with_subject("ARTE")
            .with_capacity(capacity)
    }

    #[test]
    fn test_single_class_two_lessons() {
        let fx = Fixture::new(Curriculum::new().with_requirement("1 ANO", "ARTE", 2));
        let classes = vec![class("A", "FUNDAO")];
        let pool = InstructorPool::new(vec![art_instructor("P1", "FUNDAO", 20)]);

        let (outcome, pool) = fx.run(&classes, pool, 1);

        assert_eq!(outcome.coverage, Coverage::FullyCovered);
        assert_eq!(outcome.attempts, 1);
        let row = &outcome.rows[0];
        assert_eq!(row.slots.len(), SLOTS_PER_DAY);
        let p1_slots: Vec<usize> = row
            .slots
            .iter()
            .enumerate()
            .filter(|(_, c)| c.instructor_id() == Some("P1"))
            .map(|(s, _)| s)
            .collect();
        assert_eq!(p1_slots, vec![0, 1]);
        assert!(row.slots[2..].iter().all(|c| *c == Cell::NoLesson));
        assert_eq!(pool.find("P1").unwrap().load.assigned, 2);
    }

    #[test]
    fn test_two_classes_one_instructor_leaves_one_unfilled() {
        let fx = Fixture::new(Curriculum::new().with_requirement("1 ANO", "ARTE", 1));
        let classes = vec![class("A", "FUNDAO"), class("B", "FUNDAO")];
        let pool = InstructorPool::new(vec![art_instructor("P1", "FUNDAO", 1)]);

        let (outcome, pool) = fx.run(&classes, pool, 3);

        assert_eq!(outcome.coverage, Coverage::Partial);
        assert_eq!(outcome.attempts, 10);
        assert_eq!(outcome.unfilled_count(), 1);
        assert_eq!(pool.find("P1").unwrap().load.assigned, 1);
        // the subject was served in every attempt, so it is not starved
        assert!(outcome.unstaffable.is_empty());
    }

    #[test]
    fn test_unstaffable_subject_reported() {
        let curriculum = Curriculum::new()
            .with_requirement("1 ANO", "ARTE", 1)
            .with_requirement("1 ANO", "MUSICA", 1);
        let fx = Fixture::new(curriculum);
        let classes = vec![class("A", "FUNDAO")];
        let pool = InstructorPool::new(vec![art_instructor("P1", "FUNDAO", 20)]);

        let (outcome, _) = fx.run(&classes, pool, 5);

        assert_eq!(outcome.coverage, Coverage::Partial);
        assert_eq!(outcome.unstaffable.len(), 1);
        let report = &outcome.unstaffable[0];
        assert_eq!(report.subject, "MUSICA");
        assert_eq!(report.region, "FUNDAO");
        assert_eq!(report.school, "ESCOLA A");
        assert_eq!(report.weekday, Some(Weekday::Monday));
    }

    #[test]
    fn test_failed_attempts_do_not_leak_state() {
        let fx = Fixture::new(Curriculum::new().with_requirement("1 ANO", "ARTE", 2));
        let classes = vec![class("A", "FUNDAO"), class("B", "SUL")];
        let pool = InstructorPool::new(vec![art_instructor("P1", "FUNDAO", 30)]);

        let (outcome, pool) = fx.run(&classes, pool, 11);

        assert_eq!(outcome.coverage, Coverage::Partial);
        // only the grid that was returned is reflected in the pool
        let filled = outcome
            .rows
            .iter()
            .flat_map(|r| r.slots.iter())
            .filter(|c| c.instructor_id().is_some())
            .count() as u32;
        assert_eq!(pool.find("P1").unwrap().load.assigned, filled);
        assert_eq!(filled, 2);
    }

    #[test]
    fn test_filled_cells_respect_qualification_region_and_capacity() {
        let curriculum = Curriculum::new()
            .with_requirement("1 ANO", "ARTE", 2)
            .with_requirement("1 ANO", "EDUCACAO FISICA", 2);
        let fx = Fixture::new(curriculum);
        let classes = vec![
            class("A", "FUNDAO"),
            class("B", "TIMBUI"),
            class("C", "FUNDAO"),
        ];
        let pool = InstructorPool::new(vec![
            art_instructor("ART1", "FUNDAO", 3),
            art_instructor("ART2", "TIMBUI", 4),
            art_instructor("ART3", "SUL", 30),
            Instructor::itinerant("EF1", "TIMBUI")
                .with_subject("EDUCACAO FISICA")
                .with_capacity(5),
            Instructor::permanent("EF2", "FUNDAO")
                .with_subject("EDUCACAO FISICA")
                .with_home_school("ESCOLA A")
                .with_capacity(2),
        ]);
        let regions = fx.regions.clone();

        for seed in 0..8 {
            let (outcome, after) = fx.run(&classes, pool.clone(), seed);

            for (row, class) in outcome.rows.iter().zip(&classes) {
                let mut seen = BTreeSet::new();
                for cell in &row.slots {
                    if let Cell::Assigned {
                        instructor,
                        subject: Some(subject),
                    } = cell
                    {
                        let state = after.find(instructor).unwrap();
                        assert!(state.instructor.teaches(subject));
                        assert!(regions.tier(&state.instructor.region, &class.region) > 0);
                        seen.insert(instructor.clone());
                    }
                }
                assert!(!seen.contains("ART3"));
            }

            // no instructor holds two classes in one slot
            for slot in 0..SLOTS_PER_DAY {
                let ids: Vec<_> = outcome
                    .rows
                    .iter()
                    .filter_map(|r| r.slots[slot].instructor_id())
                    .collect();
                let unique: BTreeSet<_> = ids.iter().collect();
                assert_eq!(ids.len(), unique.len());
            }

            for state in after.iter() {
                assert!(state.load.assigned <= state.instructor.capacity);
            }
        }
    }

    #[test]
    fn test_seed_reproducibility() {
        let fx = Fixture::new(Curriculum::new().with_requirement("1 ANO", "ARTE", 1));
        let classes = vec![class("A", "FUNDAO"), class("B", "FUNDAO"), class("C", "FUNDAO")];
        let pool = InstructorPool::new(vec![
            art_instructor("P1", "FUNDAO", 1),
            art_instructor("P2", "FUNDAO", 1),
        ]);

        let (a, _) = fx.run(&classes, pool.clone(), 42);
        let (b, _) = fx.run(&classes, pool, 42);
        assert_eq!(a, b);
    }
}
