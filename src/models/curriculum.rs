//! Curriculum requirements and per-grade planning days.
//!
//! The curriculum is a read-only table: for each grade, which subjects are
//! taught and how many weekly lessons each needs. The day plan says on
//! which weekdays a grade receives its specialist lessons.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::Weekday;
use crate::normalize::{canonical_subject, normalize_label};

/// One curriculum row: `weekly_lessons` lessons of `subject` for `grade`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurriculumRequirement {
    /// Grade label (normalized).
    pub grade: String,
    /// Subject (normalized).
    pub subject: String,
    /// Lessons per week.
    pub weekly_lessons: u32,
}

/// Curriculum lookup table, rows kept in authoring order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Curriculum {
    rows: Vec<CurriculumRequirement>,
}

/// Weekdays on which each grade receives specialist lessons.
///
/// Grades without an entry are *unplanned*: the run driver schedules them
/// once on an unassigned day and staffing analysis spreads them over the
/// whole week.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DayPlan {
    days: BTreeMap<String, BTreeSet<Weekday>>,
}

impl CurriculumRequirement {
    /// Creates a curriculum row. Labels are normalized.
    pub fn new(grade: &str, subject: &str, weekly_lessons: u32) -> Self {
        Self {
            grade: normalize_label(grade),
            subject: canonical_subject(subject),
            weekly_lessons,
        }
    }
}

impl Curriculum {
    /// Creates an empty curriculum.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a row (builder style).
    pub fn with_requirement(mut self, grade: &str, subject: &str, weekly_lessons: u32) -> Self {
        self.add(CurriculumRequirement::new(grade, subject, weekly_lessons));
        self
    }

    /// Adds a row.
    pub fn add(&mut self, requirement: CurriculumRequirement) {
        self.rows.push(requirement);
    }

    /// All rows in authoring order.
    pub fn rows(&self) -> &[CurriculumRequirement] {
        &self.rows
    }

    /// Rows for a grade, in authoring order.
    pub fn rows_for<'a>(
        &'a self,
        grade: &'a str,
    ) -> impl Iterator<Item = &'a CurriculumRequirement> + 'a {
        self.rows.iter().filter(move |r| r.grade == grade)
    }

    /// Whether the grade has at least one row.
    pub fn has_grade(&self, grade: &str) -> bool {
        self.rows.iter().any(|r| r.grade == grade)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<CurriculumRequirement> for Curriculum {
    fn from_iter<I: IntoIterator<Item = CurriculumRequirement>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl DayPlan {
    /// Creates an empty plan (every grade unplanned).
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a planning day to a grade (builder style).
    pub fn with_day(mut self, grade: &str, day: Weekday) -> Self {
        self.add(grade, day);
        self
    }

    /// Assigns a planning day to a grade.
    pub fn add(&mut self, grade: &str, day: Weekday) {
        self.days.entry(normalize_label(grade)).or_default().insert(day);
    }

    /// Planning days of a grade, if any were configured.
    pub fn days_for(&self, grade: &str) -> Option<&BTreeSet<Weekday>> {
        self.days.get(grade).filter(|d| !d.is_empty())
    }

    /// Days the run driver schedules a grade on; `None` is the unplanned day.
    pub fn scheduling_days(&self, grade: &str) -> Vec<Option<Weekday>> {
        match self.days_for(grade) {
            Some(days) => days.iter().copied().map(Some).collect(),
            None => vec![None],
        }
    }

    /// Days over which staffing analysis spreads a grade's demand.
    pub fn demand_days(&self, grade: &str) -> Vec<Weekday> {
        match self.days_for(grade) {
            Some(days) => days.iter().copied().collect(),
            None => Weekday::ALL.to_vec(),
        }
    }
}
