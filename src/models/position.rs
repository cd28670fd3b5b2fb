//! Synthetic position model.
//!
//! A synthetic position is a proposed new instructor record produced by
//! staffing analysis. It is handed to the external store for human review
//! and is never committed by the engine itself.

use serde::{Deserialize, Serialize};

use super::{EmploymentKind, Instructor};

/// A proposed instructor position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticPosition {
    /// Freshly allocated instructor code.
    pub id: String,
    /// Placeholder name, e.g. `VAGA ARTE FUNDAO`.
    pub name: String,
    /// The single subject the position covers.
    pub subject: String,
    /// Region the position is filed under.
    pub region: String,
    /// Weekly teaching load.
    pub weekly_lessons: u32,
    /// Planning-time allocation derived from the teaching load.
    pub planning_time: u32,
    /// Proposed home schools.
    pub home_schools: Vec<String>,
    /// Employment relationship of the proposal.
    pub employment: EmploymentKind,
}

impl SyntheticPosition {
    /// Converts the proposal into an instructor record, as the store does
    /// once a reviewer confirms it.
    pub fn to_instructor(&self) -> Instructor {
        let mut instructor = Instructor::new(self.id.clone(), &self.region, self.employment)
            .with_name(self.name.clone())
            .with_subject(&self.subject)
            .with_capacity(self.weekly_lessons);
        for school in &self.home_schools {
            instructor = instructor.with_home_school(school);
        }
        instructor
    }
}
