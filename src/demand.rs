//! Demand expansion.
//!
//! Turns a class section's curriculum quota into the ordered lessons of
//! one scheduling day: each subject repeated by its weekly lesson count,
//! in curriculum order, padded with explicit "no lesson" fillers to fill
//! the [`SLOTS_PER_DAY`] slots.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::EngineConfig;
use crate::error::{TimetableError, TimetableResult};
use crate::models::{ClassSection, Curriculum, SLOTS_PER_DAY};

/// What one slot of a class's day requires.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lesson {
    /// A lesson of the given (normalized) subject.
    Subject(String),
    /// Intentionally free slot; always satisfied.
    NoLesson,
}

/// One unit of demand inside a bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandItem {
    /// Index of the class section in the bucket's class list.
    pub class: usize,
    /// Required lesson.
    pub lesson: Lesson,
    /// Slot index, `0..SLOTS_PER_DAY`.
    pub slot: usize,
}

/// Expands class sections into per-slot demand.
#[derive(Debug, Clone, Copy)]
pub struct DemandExpander<'a> {
    curriculum: &'a Curriculum,
    config: &'a EngineConfig,
}

impl Lesson {
    /// Subject, unless the slot is free.
    pub fn subject(&self) -> Option<&str> {
        match self {
            Lesson::Subject(s) => Some(s),
            Lesson::NoLesson => None,
        }
    }
}

impl DemandItem {
    /// Whether the item needs an instructor.
    pub fn requires_instructor(&self) -> bool {
        matches!(self.lesson, Lesson::Subject(_))
    }
}

impl<'a> DemandExpander<'a> {
    /// Creates an expander over a curriculum.
    pub fn new(curriculum: &'a Curriculum, config: &'a EngineConfig) -> Self {
        Self { curriculum, config }
    }

    /// Expands one class into exactly [`SLOTS_PER_DAY`] lessons.
    ///
    /// # Errors
    /// [`TimetableError::MissingCurriculum`] if the grade has no row at all.
    pub fn try_expand(&self, class: &ClassSection) -> TimetableResult<Vec<Lesson>> {
        if !self.curriculum.has_grade(&class.grade) {
            return Err(TimetableError::MissingCurriculum {
                grade: class.grade.clone(),
            });
        }

        let mut lessons: Vec<Lesson> = self
            .curriculum
            .rows_for(&class.grade)
            .filter(|r| self.config.is_specialist(&r.subject))
            .flat_map(|r| {
                std::iter::repeat(Lesson::Subject(r.subject.clone())).take(r.weekly_lessons as usize)
            })
            .collect();

        if lessons.len() > SLOTS_PER_DAY {
            warn!(
                school = %class.school,
                section = %class.section,
                grade = %class.grade,
                lessons = lessons.len(),
                "curriculum exceeds daily slots; extra lessons dropped"
            );
            lessons.truncate(SLOTS_PER_DAY);
        }
        lessons.resize(SLOTS_PER_DAY, Lesson::NoLesson);
        Ok(lessons)
    }

    /// Expands one class, treating a missing curriculum as zero demand.
    pub fn expand(&self, class: &ClassSection) -> Vec<Lesson> {
        self.try_expand(class).unwrap_or_else(|err| {
            warn!(
                school = %class.school,
                section = %class.section,
                error = %err,
                "treating class as having no specialist demand"
            );
            vec![Lesson::NoLesson; SLOTS_PER_DAY]
        })
    }

    /// Expands every class of a bucket into slot-ordered demand items.
    pub fn expand_bucket(&self, classes: &[ClassSection]) -> Vec<DemandItem> {
        classes
            .iter()
            .enumerate()
            .flat_map(|(class, section)| {
                self.expand(section)
                    .into_iter()
                    .enumerate()
                    .map(move |(slot, lesson)| DemandItem {
                        class,
                        lesson,
                        slot,
                    })
            })
            .collect()
    }
}
