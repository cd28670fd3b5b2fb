//! Class section model.
//!
//! A class section is one group of pupils (grade + section label) at one
//! school, attending in one shift. Sections are registered by
//! administrators and never change during a scheduling run.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::normalize::normalize_label;

/// Half-day period in which a class attends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Shift {
    Morning,
    Afternoon,
}

/// School weekday. Specialist lessons never happen on weekends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

/// A registered class section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSection {
    /// School identifier (normalized).
    pub school: String,
    /// Grade / level label, the curriculum lookup key (normalized).
    pub grade: String,
    /// Track or section label, unique within a school and grade (normalized).
    pub section: String,
    /// Attendance shift.
    pub shift: Shift,
    /// Administrative region of the school (normalized).
    pub region: String,
}

impl Shift {
    /// Both shifts, in scheduling order.
    pub const ALL: [Shift; 2] = [Shift::Morning, Shift::Afternoon];

    /// Parses a shift label. Accepts Portuguese and English names.
    pub fn parse(label: &str) -> Option<Self> {
        match normalize_label(label).as_str() {
            "MATUTINO" | "MANHA" | "MORNING" | "AM" => Some(Shift::Morning),
            "VESPERTINO" | "TARDE" | "AFTERNOON" | "PM" => Some(Shift::Afternoon),
            _ => None,
        }
    }

    /// Label used in exported timetables.
    pub fn label(&self) -> &'static str {
        match self {
            Shift::Morning => "MATUTINO",
            Shift::Afternoon => "VESPERTINO",
        }
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Weekday {
    /// All school weekdays, Monday first.
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// Parses a weekday label (`"SEGUNDA-FEIRA"`, `"Monday"`, ...).
    pub fn parse(label: &str) -> Option<Self> {
        let normalized = normalize_label(label);
        let head = normalized
            .split(|c: char| c == '-' || c == ' ')
            .next()
            .unwrap_or("");
        match head {
            "SEGUNDA" | "MONDAY" | "MON" => Some(Weekday::Monday),
            "TERCA" | "TUESDAY" | "TUE" => Some(Weekday::Tuesday),
            "QUARTA" | "WEDNESDAY" | "WED" => Some(Weekday::Wednesday),
            "QUINTA" | "THURSDAY" | "THU" => Some(Weekday::Thursday),
            "SEXTA" | "FRIDAY" | "FRI" => Some(Weekday::Friday),
            _ => None,
        }
    }

    /// Label used in exported timetables.
    pub fn label(&self) -> &'static str {
        match self {
            Weekday::Monday => "SEGUNDA-FEIRA",
            Weekday::Tuesday => "TERCA-FEIRA",
            Weekday::Wednesday => "QUARTA-FEIRA",
            Weekday::Thursday => "QUINTA-FEIRA",
            Weekday::Friday => "SEXTA-FEIRA",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl ClassSection {
    /// Creates a class section. Labels are normalized.
    pub fn new(
        school: &str,
        grade: &str,
        section: &str,
        shift: Shift,
        region: &str,
    ) -> Self {
        Self {
            school: normalize_label(school),
            grade: normalize_label(grade),
            section: normalize_label(section),
            shift,
            region: normalize_label(region),
        }
    }

    /// Identity of the section within the district: (school, grade,
    /// section). Section labels repeat across grades of one school.
    pub fn key(&self) -> (&str, &str, &str) {
        (&self.school, &self.grade, &self.section)
    }
}
