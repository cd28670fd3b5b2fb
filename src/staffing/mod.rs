//! Peak-concurrency staffing synthesis.
//!
//! Estimates how many specialist positions each (region, subject) needs
//! and proposes [`SyntheticPosition`] records for them.
//!
//! # Bounds
//!
//! | Bound | Definition |
//! |-------|-----------|
//! | Volume | ceil(total weekly lessons / hard ceiling) |
//! | Peak | max over (weekday, shift) of ceil(classes that day / slots per day) |
//! | Required | max(volume, peak) |
//!
//! Demand of regions in a declared compatible pair is pooled under the
//! pair's primary region before any bound is computed.
//!
//! The synthesizer also sizes positions straight from a [`DeficitMap`]
//! left by a timetable run; there the position count is not pinned by
//! bounds and follows the workload policy alone.

mod positions;
mod workload;

pub use positions::PositionIdAllocator;
pub use workload::distribute_workload;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::models::{
    ClassSection, Curriculum, DayPlan, EmploymentKind, RegionCompatibility, Shift,
    SyntheticPosition, Weekday, SLOTS_PER_DAY,
};
use crate::reconcile::DeficitMap;

/// Home schools proposed per member region of a position.
const HOME_SCHOOLS_PER_REGION: usize = 2;

/// Staffing need of one (pooled region, subject).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffingEstimate {
    /// Pool region (primary region of a pair, or the region itself).
    pub region: String,
    /// Regions whose demand was pooled, primary first.
    pub member_regions: Vec<String>,
    /// Subject (normalized).
    pub subject: String,
    /// Total weekly lessons.
    pub volume: u32,
    /// Largest simultaneous-demand bound over all (weekday, shift).
    pub peak_bound: u32,
    /// ceil(volume / hard ceiling).
    pub volume_bound: u32,
    /// Positions to create.
    pub required: u32,
    /// Weekly load of each position.
    pub workloads: Vec<u32>,
}

/// Demand analysis and position synthesis.
///
/// # Example
///
/// ```
/// use u_timetable::config::EngineConfig;
/// use u_timetable::models::*;
/// use u_timetable::staffing::{PositionIdAllocator, StaffingSynthesizer};
///
/// let classes = vec![ClassSection::new("Escola A", "1 ano", "A", Shift::Morning, "Fundão")];
/// let curriculum = Curriculum::new().with_requirement("1 ano", "Arte", 2);
/// let synth = StaffingSynthesizer::new(EngineConfig::default());
///
/// let estimates = synth.analyze(&classes, &curriculum, &DayPlan::new());
/// assert_eq!(estimates[0].required, 1);
///
/// let mut ids = PositionIdAllocator::new();
/// let positions = synth.propose(&estimates, &classes, &mut ids);
/// assert_eq!(positions[0].id, "P1DFARTE");
/// assert_eq!(positions[0].weekly_lessons, 2);
/// ```
#[derive(Debug, Clone)]
pub struct StaffingSynthesizer {
    config: EngineConfig,
    regions: RegionCompatibility,
}

#[derive(Default)]
struct Demand {
    volume: u32,
    concurrent: BTreeMap<(Weekday, Shift), u32>,
    regions: BTreeSet<String>,
}

impl StaffingEstimate {
    /// Whether the peak bound, not the volume, set the position count.
    pub fn peak_dominated(&self) -> bool {
        self.peak_bound > self.volume_bound
    }
}

impl StaffingSynthesizer {
    /// Creates a synthesizer.
    pub fn new(config: EngineConfig) -> Self {
        let regions = config.region_compatibility();
        Self { config, regions }
    }

    /// Estimates positions per (pooled region, subject) from raw demand.
    ///
    /// Each class contributes its grade's specialist quota to the volume,
    /// and counts once per subject on every planned day of its grade
    /// (all five weekdays when the grade has no plan).
    pub fn analyze(
        &self,
        classes: &[ClassSection],
        curriculum: &Curriculum,
        day_plan: &DayPlan,
    ) -> Vec<StaffingEstimate> {
        let mut demand: BTreeMap<(String, String), Demand> = BTreeMap::new();
        let mut seen = BTreeSet::new();

        for class in classes {
            if !seen.insert(class.key()) {
                continue;
            }
            let mut quota: BTreeMap<&str, u32> = BTreeMap::new();
            for row in curriculum
                .rows_for(&class.grade)
                .filter(|r| self.config.is_specialist(&r.subject))
            {
                *quota.entry(row.subject.as_str()).or_insert(0) += row.weekly_lessons;
            }

            let pool = self.regions.pool_region(&class.region).to_string();
            let days = day_plan.demand_days(&class.grade);
            for (subject, lessons) in quota {
                if lessons == 0 {
                    continue;
                }
                let entry = demand.entry((pool.clone(), subject.to_string())).or_default();
                entry.volume += lessons;
                entry.regions.insert(class.region.clone());
                for &day in &days {
                    *entry.concurrent.entry((day, class.shift)).or_insert(0) += 1;
                }
            }
        }

        demand
            .into_iter()
            .map(|((region, subject), d)| self.estimate(region, subject, d))
            .collect()
    }

    fn estimate(&self, region: String, subject: String, demand: Demand) -> StaffingEstimate {
        let ceiling = self.config.hard_ceiling.max(1);
        let volume_bound = demand.volume.div_ceil(ceiling);
        let peak_bound = demand
            .concurrent
            .values()
            .map(|&count| count.div_ceil(SLOTS_PER_DAY as u32))
            .max()
            .unwrap_or(1);
        let pinned = volume_bound.max(peak_bound);
        let workloads = distribute_workload(demand.volume, Some(pinned), &self.config.workload);

        debug!(
            region = %region,
            subject = %subject,
            volume = demand.volume,
            volume_bound,
            peak_bound,
            positions = workloads.len(),
            "staffing estimate"
        );

        let mut member_regions = vec![region.clone()];
        member_regions.extend(demand.regions.into_iter().filter(|r| *r != region));

        StaffingEstimate {
            required: workloads.len() as u32,
            region,
            member_regions,
            subject,
            volume: demand.volume,
            peak_bound,
            volume_bound,
            workloads,
        }
    }

    /// Proposes one itinerant position per estimated workload.
    pub fn propose(
        &self,
        estimates: &[StaffingEstimate],
        classes: &[ClassSection],
        ids: &mut PositionIdAllocator,
    ) -> Vec<SyntheticPosition> {
        let mut positions = Vec::new();
        for estimate in estimates {
            let members: Vec<&str> = estimate.member_regions.iter().map(String::as_str).collect();
            positions.extend(self.positions_for(
                &estimate.region,
                &members,
                &estimate.subject,
                &estimate.workloads,
                classes,
                ids,
            ));
        }
        info!(positions = positions.len(), "proposed positions from demand analysis");
        positions
    }

    /// Proposes positions covering a run's deficits.
    ///
    /// Deficits of paired regions are pooled; the position count follows
    /// the workload policy (not pinned).
    pub fn propose_for_deficits(
        &self,
        deficits: &DeficitMap,
        classes: &[ClassSection],
        ids: &mut PositionIdAllocator,
    ) -> Vec<SyntheticPosition> {
        let mut pooled: BTreeMap<(String, String), (u32, BTreeSet<String>)> = BTreeMap::new();
        for (region, subject, count) in deficits.iter() {
            let pool = self.regions.pool_region(region).to_string();
            let entry = pooled.entry((pool, subject.to_string())).or_default();
            entry.0 += count;
            entry.1.insert(region.to_string());
        }

        let mut positions = Vec::new();
        for ((region, subject), (total, regions)) in pooled {
            let loads = distribute_workload(total, None, &self.config.workload);
            let mut members: Vec<&str> = vec![region.as_str()];
            members.extend(regions.iter().map(String::as_str).filter(|r| *r != region));
            positions.extend(self.positions_for(&region, &members, &subject, &loads, classes, ids));
        }
        info!(
            deficit = deficits.total(),
            positions = positions.len(),
            "proposed positions from deficits"
        );
        positions
    }

    fn positions_for(
        &self,
        region: &str,
        members: &[&str],
        subject: &str,
        loads: &[u32],
        classes: &[ClassSection],
        ids: &mut PositionIdAllocator,
    ) -> Vec<SyntheticPosition> {
        let kind = EmploymentKind::Itinerant;
        let name = format!("VAGA {} {}", subject, members.join("/"));
        let home_schools: Vec<String> = members
            .iter()
            .flat_map(|m| schools_in_region(classes, m).into_iter().take(HOME_SCHOOLS_PER_REGION))
            .collect();

        loads
            .iter()
            .map(|&load| SyntheticPosition {
                id: ids.next_id(kind, region, subject),
                name: name.clone(),
                subject: subject.to_string(),
                region: region.to_string(),
                weekly_lessons: load,
                planning_time: self.config.planning_rule.planning_time(load),
                home_schools: home_schools.clone(),
                employment: kind,
            })
            .collect()
    }
}

/// Schools of a region in order of first appearance.
fn schools_in_region(classes: &[ClassSection], region: &str) -> Vec<String> {
    let mut schools: Vec<String> = Vec::new();
    for class in classes.iter().filter(|c| c.region == region) {
        if !schools.contains(&class.school) {
            schools.push(class.school.clone());
        }
    }
    schools
}
