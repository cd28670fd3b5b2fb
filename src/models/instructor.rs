//! Instructor model and run-scoped workload state.
//!
//! An [`Instructor`] is the static record supplied by the external store.
//! The engine pairs each one with an [`InstructorLoad`] that tracks what
//! the current run has assigned to it. The whole collection is an
//! [`InstructorPool`], which the search takes and returns by value so
//! that state flows explicitly from one bucket to the next.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::Shift;
use crate::normalize::{canonical_subject, normalize_label};

/// Employment relationship of an instructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmploymentKind {
    /// Tenured staff bound to home schools ("EFETIVO").
    Permanent,
    /// Temporary or travelling staff ("DT").
    Itinerant,
}

/// Fixed-shift restriction of an instructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftPreference {
    Morning,
    Afternoon,
    Either,
}

/// A specialist instructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructor {
    /// Unique instructor code.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Subjects the instructor is qualified to teach (normalized).
    pub subjects: BTreeSet<String>,
    /// Home region (normalized).
    pub region: String,
    /// Employment relationship.
    pub employment: EmploymentKind,
    /// Shift restriction; `None` means no restriction.
    pub fixed_shift: Option<ShiftPreference>,
    /// Schools the instructor is based at (normalized).
    pub home_schools: BTreeSet<String>,
    /// Weekly lesson capacity.
    pub capacity: u32,
}

/// What the current run has assigned to one instructor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructorLoad {
    /// Slot index → school, for the bucket being scheduled.
    pub occupied: BTreeMap<usize, String>,
    /// Lessons assigned across the whole run.
    pub assigned: u32,
    /// Schools taught at during the run.
    pub visited: BTreeSet<String>,
}

/// An instructor together with its run-scoped load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructorState {
    pub instructor: Instructor,
    pub load: InstructorLoad,
}

/// The instructors available to a run, with their evolving loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructorPool {
    members: Vec<InstructorState>,
}

impl ShiftPreference {
    /// Whether an instructor with this restriction may teach in `shift`.
    pub fn allows(&self, shift: Shift) -> bool {
        match self {
            ShiftPreference::Either => true,
            ShiftPreference::Morning => shift == Shift::Morning,
            ShiftPreference::Afternoon => shift == Shift::Afternoon,
        }
    }

    /// Parses a fixed-shift label; empty labels mean no restriction.
    pub fn parse(label: &str) -> Option<Option<Self>> {
        let normalized = normalize_label(label);
        match normalized.as_str() {
            "" => Some(None),
            "AMBOS" | "EITHER" | "BOTH" => Some(Some(ShiftPreference::Either)),
            _ => Shift::parse(&normalized).map(|s| {
                Some(match s {
                    Shift::Morning => ShiftPreference::Morning,
                    Shift::Afternoon => ShiftPreference::Afternoon,
                })
            }),
        }
    }
}

impl EmploymentKind {
    /// Parses an employment label (`"EFETIVO"`, `"DT"`, ...).
    pub fn parse(label: &str) -> Option<Self> {
        match normalize_label(label).as_str() {
            "EFETIVO" | "PERMANENT" => Some(EmploymentKind::Permanent),
            "DT" | "ITINERANT" | "TEMPORARY" => Some(EmploymentKind::Itinerant),
            _ => None,
        }
    }

    /// Single-letter code used in generated ids.
    pub fn code(&self) -> char {
        match self {
            EmploymentKind::Permanent => 'E',
            EmploymentKind::Itinerant => 'D',
        }
    }
}

impl Instructor {
    /// Creates an instructor with no subjects and zero capacity.
    pub fn new(id: impl Into<String>, region: &str, employment: EmploymentKind) -> Self {
        Self {
            id: id.into().trim().to_string(),
            name: String::new(),
            subjects: BTreeSet::new(),
            region: normalize_label(region),
            employment,
            fixed_shift: None,
            home_schools: BTreeSet::new(),
            capacity: 0,
        }
    }

    /// Creates a permanent instructor.
    pub fn permanent(id: impl Into<String>, region: &str) -> Self {
        Self::new(id, region, EmploymentKind::Permanent)
    }

    /// Creates an itinerant instructor.
    pub fn itinerant(id: impl Into<String>, region: &str) -> Self {
        Self::new(id, region, EmploymentKind::Itinerant)
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a qualified subject.
    pub fn with_subject(mut self, subject: &str) -> Self {
        self.subjects.insert(canonical_subject(subject));
        self
    }

    /// Adds a home school.
    pub fn with_home_school(mut self, school: &str) -> Self {
        self.home_schools.insert(normalize_label(school));
        self
    }

    /// Restricts the instructor to a shift.
    pub fn with_fixed_shift(mut self, shift: ShiftPreference) -> Self {
        self.fixed_shift = Some(shift);
        self
    }

    /// Sets the weekly lesson capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Whether the instructor is qualified for `subject`.
    pub fn teaches(&self, subject: &str) -> bool {
        self.subjects.contains(subject)
    }

    /// Whether the instructor may work in `shift`.
    pub fn works_shift(&self, shift: Shift) -> bool {
        self.fixed_shift.map_or(true, |pref| pref.allows(shift))
    }

    /// Whether `school` is one of the instructor's home schools.
    pub fn is_home_school(&self, school: &str) -> bool {
        self.home_schools.contains(school)
    }

    /// Lesson limit under a district-wide hard ceiling.
    pub fn effective_capacity(&self, hard_ceiling: u32) -> u32 {
        self.capacity.min(hard_ceiling)
    }
}

impl InstructorLoad {
    /// Whether `slot` is taken in the current bucket.
    pub fn is_busy(&self, slot: usize) -> bool {
        self.occupied.contains_key(&slot)
    }
}

impl InstructorState {
    /// Wraps an instructor with an empty load.
    pub fn new(instructor: Instructor) -> Self {
        Self {
            instructor,
            load: InstructorLoad::default(),
        }
    }

    /// Lessons the instructor can still take this run.
    pub fn remaining(&self, hard_ceiling: u32) -> u32 {
        self.instructor
            .effective_capacity(hard_ceiling)
            .saturating_sub(self.load.assigned)
    }
}

impl InstructorPool {
    /// Creates a pool with empty loads.
    pub fn new(instructors: impl IntoIterator<Item = Instructor>) -> Self {
        Self {
            members: instructors.into_iter().map(InstructorState::new).collect(),
        }
    }

    /// Number of instructors.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Instructor states in pool order.
    pub fn iter(&self) -> impl Iterator<Item = &InstructorState> {
        self.members.iter()
    }

    /// State at a pool index.
    pub fn get(&self, index: usize) -> Option<&InstructorState> {
        self.members.get(index)
    }

    /// Finds an instructor by id.
    pub fn find(&self, id: &str) -> Option<&InstructorState> {
        self.members.iter().find(|m| m.instructor.id == id)
    }

    /// Static instructor records in pool order.
    pub fn instructors(&self) -> impl Iterator<Item = &Instructor> {
        self.members.iter().map(|m| &m.instructor)
    }

    /// Total lessons assigned across the pool.
    pub fn total_assigned(&self) -> u32 {
        self.members.iter().map(|m| m.load.assigned).sum()
    }

    /// Clears per-bucket slot occupancy, keeping run totals.
    pub fn clear_bucket_occupancy(&mut self) {
        for member in &mut self.members {
            member.load.occupied.clear();
        }
    }

    /// Records one lesson for the instructor at `index`.
    ///
    /// Callers must have checked feasibility; the slot must be free and the
    /// instructor under capacity.
    pub(crate) fn commit(&mut self, index: usize, slot: usize, school: &str) {
        let member = &mut self.members[index];
        debug_assert!(!member.load.is_busy(slot), "slot {slot} double-booked");
        debug_assert!(member.load.assigned < member.instructor.capacity);
        member.load.occupied.insert(slot, school.to_string());
        member.load.assigned += 1;
        member.load.visited.insert(school.to_string());
    }
}

impl FromIterator<Instructor> for InstructorPool {
    fn from_iter<I: IntoIterator<Item = Instructor>>(iter: I) -> Self {
        Self::new(iter)
    }
}
