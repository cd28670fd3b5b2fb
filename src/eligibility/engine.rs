//! Candidate filtering and ranking.
//!
//! For one slot request, every instructor in the pool is run through the
//! feasibility predicate; survivors are scored with additive weights and
//! returned best first.

use super::gap::{check_slot, SlotFit};
use super::{BucketContext, Rejection, SlotRequest};
use crate::models::{EmploymentKind, InstructorPool, InstructorState};

/// Individual score components, kept for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    /// Permanent instructor at a home school.
    pub home_school_permanent: i64,
    /// Region tier × weight.
    pub region: i64,
    /// Home school, any employment kind.
    pub home_school: i64,
    /// School already visited this run.
    pub visited: i64,
    /// Remaining capacity under the hard ceiling.
    pub capacity: i64,
    /// Hole-filling bonus.
    pub gap_fill: i64,
}

/// A feasible instructor for a slot request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Index into the instructor pool.
    pub index: usize,
    /// Total score (higher = better).
    pub score: i64,
    /// How the slot fits the instructor's day.
    pub fit: SlotFit,
    /// Score components.
    pub breakdown: ScoreBreakdown,
}

/// Feasibility and scoring for one bucket.
#[derive(Debug, Clone, Copy)]
pub struct EligibilityEngine<'a> {
    context: BucketContext<'a>,
}

impl ScoreBreakdown {
    /// Sum of all components.
    pub fn total(&self) -> i64 {
        self.home_school_permanent
            + self.region
            + self.home_school
            + self.visited
            + self.capacity
            + self.gap_fill
    }
}

impl<'a> EligibilityEngine<'a> {
    /// Creates an engine for a bucket.
    pub fn new(context: BucketContext<'a>) -> Self {
        Self { context }
    }

    /// The bucket this engine evaluates.
    pub fn context(&self) -> &BucketContext<'a> {
        &self.context
    }

    /// Checks every hard constraint for one instructor.
    ///
    /// Returns the region tier and slot fit on success.
    pub fn check(
        &self,
        state: &InstructorState,
        request: &SlotRequest<'_>,
    ) -> Result<(u32, SlotFit), Rejection> {
        let ctx = &self.context;
        let instructor = &state.instructor;

        if !instructor.teaches(request.subject) {
            return Err(Rejection::NotQualified);
        }
        if !instructor.works_shift(ctx.shift) {
            return Err(Rejection::ShiftMismatch);
        }
        let tier = ctx.regions.tier(&instructor.region, request.region);
        if tier == 0 {
            return Err(Rejection::RegionIncompatible);
        }
        if state.remaining(ctx.config.hard_ceiling) == 0 {
            return Err(Rejection::AtCapacity);
        }
        if state.load.is_busy(request.slot) {
            return Err(Rejection::SlotTaken);
        }
        let fit = check_slot(
            &state.load.occupied,
            request.slot,
            ctx.school,
            ctx.adjacency,
            ctx.config.min_travel_distance,
        )?;
        Ok((tier, fit))
    }

    /// Scores a feasible instructor.
    pub fn score(&self, state: &InstructorState, tier: u32, fit: SlotFit) -> ScoreBreakdown {
        let ctx = &self.context;
        let weights = &ctx.config.scoring;
        let instructor = &state.instructor;
        let at_home = instructor.is_home_school(ctx.school);

        ScoreBreakdown {
            home_school_permanent: if at_home && instructor.employment == EmploymentKind::Permanent
            {
                weights.home_school_permanent
            } else {
                0
            },
            region: i64::from(tier) * weights.region_tier,
            home_school: if at_home { weights.home_school } else { 0 },
            visited: if state.load.visited.contains(ctx.school) {
                weights.visited_school
            } else {
                0
            },
            capacity: i64::from(ctx.config.hard_ceiling.saturating_sub(state.load.assigned))
                * weights.remaining_capacity,
            gap_fill: if fit == SlotFit::FillsHole {
                weights.gap_fill
            } else {
                0
            },
        }
    }

    /// Evaluates one instructor: `Ok` with its score if feasible.
    pub fn evaluate(
        &self,
        index: usize,
        state: &InstructorState,
        request: &SlotRequest<'_>,
    ) -> Result<Candidate, Rejection> {
        let (tier, fit) = self.check(state, request)?;
        let breakdown = self.score(state, tier, fit);
        Ok(Candidate {
            index,
            score: breakdown.total(),
            fit,
            breakdown,
        })
    }

    /// Feasible instructors for a request, highest score first.
    ///
    /// Equal scores keep pool order.
    pub fn rank(&self, pool: &InstructorPool, request: &SlotRequest<'_>) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = pool
            .iter()
            .enumerate()
            .filter_map(|(index, state)| self.evaluate(index, state, request).ok())
            .collect();
        candidates.sort_by(|a, b| b.score.cmp(&a.score));
        candidates
    }

    /// The best feasible instructor, if any.
    pub fn select_best(&self, pool: &InstructorPool, request: &SlotRequest<'_>) -> Option<Candidate> {
        self.rank(pool, request).into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::models::{
        Instructor, RegionCompatibility, SchoolAdjacency, SchoolGroup, Shift, ShiftPreference,
    };

    struct Fixture {
        adjacency: SchoolAdjacency,
        regions: RegionCompatibility,
        config: EngineConfig,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                adjacency: SchoolAdjacency::from_groups(&[SchoolGroup::new("R")
                    .with_school("A")
                    .with_school("C")]),
                regions: RegionCompatibility::new().with_pair("NORTE", "LESTE"),
                config: EngineConfig::default(),
            }
        }

        fn engine(&self, school: &'static str) -> EligibilityEngine<'_> {
            EligibilityEngine::new(BucketContext::new(
                school,
                Shift::Morning,
                None,
                &self.adjacency,
                &self.regions,
                &self.config,
            ))
        }
    }

    fn art(id: &str, region: &str) -> Instructor {
        Instructor::itinerant(id, region)
            .with_subject("ARTE")
            .with_capacity(30)
    }

    #[test]
    fn test_feasibility_predicates() {
        let fx = Fixture::new();
        let engine = fx.engine("A");
        let req = SlotRequest::new("ARTE", "NORTE", 0);

        let pool = InstructorPool::new(vec![
            art("ok", "NORTE"),
            Instructor::itinerant("music", "NORTE")
                .with_subject("MUSICA")
                .with_capacity(30),
            art("pm", "NORTE").with_fixed_shift(ShiftPreference::Afternoon),
            art("far", "SUL"),
            art("full", "NORTE").with_capacity(0),
        ]);

        let verdicts: Vec<_> = pool
            .iter()
            .map(|s| engine.check(s, &req).map(|(tier, _)| tier))
            .collect();
        assert_eq!(verdicts[0], Ok(100));
        assert_eq!(verdicts[1], Err(Rejection::NotQualified));
        assert_eq!(verdicts[2], Err(Rejection::ShiftMismatch));
        assert_eq!(verdicts[3], Err(Rejection::RegionIncompatible));
        assert_eq!(verdicts[4], Err(Rejection::AtCapacity));
    }

    #[test]
    fn test_hard_ceiling_caps_capacity() {
        let mut fx = Fixture::new();
        fx.config.hard_ceiling = 1;
        let engine = fx.engine("A");
        let mut pool = InstructorPool::new(vec![art("P1", "NORTE")]);
        pool.commit(0, 0, "A");
        pool.clear_bucket_occupancy();

        let req = SlotRequest::new("ARTE", "NORTE", 1);
        assert_eq!(
            engine.check(pool.get(0).unwrap(), &req),
            Err(Rejection::AtCapacity)
        );
    }

    #[test]
    fn test_slot_taken() {
        let fx = Fixture::new();
        let engine = fx.engine("A");
        let mut pool = InstructorPool::new(vec![art("P1", "NORTE")]);
        pool.commit(0, 2, "A");

        let req = SlotRequest::new("ARTE", "NORTE", 2);
        assert_eq!(
            engine.check(pool.get(0).unwrap(), &req),
            Err(Rejection::SlotTaken)
        );
    }

    #[test]
    fn test_travel_conflict_with_unrelated_school() {
        let fx = Fixture::new();
        let mut pool = InstructorPool::new(vec![art("P1", "NORTE")]);
        pool.commit(0, 0, "A");

        let engine_b = fx.engine("B");
        let req = SlotRequest::new("ARTE", "NORTE", 2);
        assert_eq!(
            engine_b.check(pool.get(0).unwrap(), &req),
            Err(Rejection::TravelConflict)
        );
    }

    #[test]
    fn test_compatible_pair_scores_lower_than_same_region() {
        let fx = Fixture::new();
        let engine = fx.engine("A");
        let pool = InstructorPool::new(vec![art("pair", "LESTE"), art("local", "NORTE")]);
        let req = SlotRequest::new("ARTE", "NORTE", 0);

        let ranked = engine.rank(&pool, &req);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].index, 1);
        assert_eq!(ranked[0].breakdown.region, 100_000);
        assert_eq!(ranked[1].breakdown.region, 75_000);
    }

    #[test]
    fn test_permanent_home_school_wins() {
        let fx = Fixture::new();
        let engine = fx.engine("A");
        let home = Instructor::permanent("home", "LESTE")
            .with_subject("ARTE")
            .with_home_school("A")
            .with_capacity(30);
        let pool = InstructorPool::new(vec![art("local", "NORTE"), home]);
        let req = SlotRequest::new("ARTE", "NORTE", 0);

        let best = engine.select_best(&pool, &req).unwrap();
        assert_eq!(best.index, 1);
        assert_eq!(best.breakdown.home_school_permanent, 100_000);
        assert_eq!(best.breakdown.home_school, 2_000);
    }

    #[test]
    fn test_itinerant_home_school_gets_affinity_only() {
        let fx = Fixture::new();
        let engine = fx.engine("A");
        let pool = InstructorPool::new(vec![art("P1", "NORTE").with_home_school("A")]);
        let req = SlotRequest::new("ARTE", "NORTE", 0);

        let c = engine.select_best(&pool, &req).unwrap();
        assert_eq!(c.breakdown.home_school_permanent, 0);
        assert_eq!(c.breakdown.home_school, 2_000);
        assert_eq!(c.score, 100_000 + 2_000 + 300);
    }

    #[test]
    fn test_gap_fill_outranks_fresh_instructor() {
        let fx = Fixture::new();
        let engine = fx.engine("A");
        let mut pool = InstructorPool::new(vec![art("fresh", "NORTE"), art("busy", "NORTE")]);
        pool.commit(1, 0, "A");
        pool.commit(1, 3, "A");

        let req = SlotRequest::new("ARTE", "NORTE", 2);
        let ranked = engine.rank(&pool, &req);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].index, 1);
        assert_eq!(ranked[0].fit, SlotFit::FillsHole);
        assert_eq!(ranked[0].breakdown.gap_fill, 5_000);
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn test_remaining_capacity_spreads_load() {
        let fx = Fixture::new();
        let engine = fx.engine("A");
        let mut pool = InstructorPool::new(vec![art("used", "NORTE"), art("idle", "NORTE")]);
        pool.commit(0, 4, "C");
        pool.clear_bucket_occupancy();

        let req = SlotRequest::new("ARTE", "NORTE", 0);
        let ranked = engine.rank(&pool, &req);
        // "used" visited C, not A, so only capacity differs
        assert_eq!(ranked[0].index, 1);
        assert_eq!(ranked[0].breakdown.capacity - ranked[1].breakdown.capacity, 10);
    }
}
