//! Timetable (solution) model.
//!
//! A timetable is the set of rows produced by one generation run: one row
//! per (school, class section, shift, weekday), each holding one cell per
//! daily slot. A cell names the assigned instructor, marks an intentional
//! free slot, or marks demand the engine could not cover.

use serde::{Deserialize, Serialize};

use super::{ClassSection, Shift, Weekday};

/// Number of lesson slots in one shift.
pub const SLOTS_PER_DAY: usize = 5;

/// Marker written for empty cells in exported tables.
pub const EMPTY_CELL_MARKER: &str = "---";

/// Content of one timetable slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    /// An instructor teaches the slot.
    ///
    /// `subject` is recorded by the engine; cells read back from an
    /// external table may carry only the instructor id.
    Assigned {
        instructor: String,
        subject: Option<String>,
    },
    /// No lesson is planned for the slot.
    NoLesson,
    /// A lesson was required but no instructor could be placed.
    Unfilled,
}

/// One class section's slots on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableRow {
    /// School (normalized).
    pub school: String,
    /// Grade of the class section (normalized).
    pub grade: String,
    /// Class section label (normalized).
    pub section: String,
    /// Shift of the bucket.
    pub shift: Shift,
    /// Weekday of the bucket; `None` when the grade has no planning day.
    pub weekday: Option<Weekday>,
    /// One cell per slot.
    pub slots: Vec<Cell>,
}

/// All rows produced by a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timetable {
    pub rows: Vec<TimetableRow>,
}

impl Cell {
    /// Creates an assigned cell.
    pub fn assigned(instructor: impl Into<String>, subject: impl Into<String>) -> Self {
        Cell::Assigned {
            instructor: instructor.into(),
            subject: Some(subject.into()),
        }
    }

    /// Instructor id, if the cell is assigned.
    pub fn instructor_id(&self) -> Option<&str> {
        match self {
            Cell::Assigned { instructor, .. } => Some(instructor),
            _ => None,
        }
    }

    /// Whether the cell is an uncovered lesson.
    #[inline]
    pub fn is_unfilled(&self) -> bool {
        matches!(self, Cell::Unfilled)
    }

    /// Export form: the instructor id, or the empty-cell marker.
    pub fn export_label(&self) -> &str {
        match self {
            Cell::Assigned { instructor, .. } => instructor,
            Cell::NoLesson | Cell::Unfilled => EMPTY_CELL_MARKER,
        }
    }
}

impl TimetableRow {
    /// Creates a row with every slot set to [`Cell::NoLesson`].
    pub fn empty(
        school: &str,
        grade: &str,
        section: &str,
        shift: Shift,
        weekday: Option<Weekday>,
    ) -> Self {
        Self {
            school: school.to_string(),
            grade: grade.to_string(),
            section: section.to_string(),
            shift,
            weekday,
            slots: vec![Cell::NoLesson; SLOTS_PER_DAY],
        }
    }

    /// Empty row of a class section on one day.
    pub fn for_class(class: &ClassSection, weekday: Option<Weekday>) -> Self {
        Self::empty(&class.school, &class.grade, &class.section, class.shift, weekday)
    }

    /// Class identity of the row: (school, grade, section).
    pub fn class_key(&self) -> (&str, &str, &str) {
        (&self.school, &self.grade, &self.section)
    }

    /// Number of unfilled cells in the row.
    pub fn unfilled_count(&self) -> usize {
        self.slots.iter().filter(|c| c.is_unfilled()).count()
    }
}

impl Timetable {
    /// Creates an empty timetable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends rows.
    pub fn extend(&mut self, rows: impl IntoIterator<Item = TimetableRow>) {
        self.rows.extend(rows);
    }

    /// Every (row, slot index) taught by an instructor.
    pub fn slots_for_instructor(&self, instructor_id: &str) -> Vec<(&TimetableRow, usize)> {
        self.rows
            .iter()
            .flat_map(|row| {
                row.slots
                    .iter()
                    .enumerate()
                    .filter(move |(_, c)| c.instructor_id() == Some(instructor_id))
                    .map(move |(slot, _)| (row, slot))
            })
            .collect()
    }

    /// Total unfilled cells.
    pub fn unfilled_count(&self) -> usize {
        self.rows.iter().map(TimetableRow::unfilled_count).sum()
    }

    /// Whether every required lesson has an instructor.
    pub fn is_fully_covered(&self) -> bool {
        self.unfilled_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_timetable() -> Timetable {
        let mut row =
            TimetableRow::empty("ESCOLA A", "1 ANO", "A", Shift::Morning, Some(Weekday::Monday));
        row.slots[0] = Cell::assigned("P1", "ARTE");
        row.slots[1] = Cell::assigned("P1", "ARTE");
        row.slots[2] = Cell::Unfilled;

        let mut other =
            TimetableRow::empty("ESCOLA A", "2 ANO", "A", Shift::Morning, Some(Weekday::Monday));
        other.slots[2] = Cell::assigned("P1", "ARTE");

        let mut t = Timetable::new();
        t.extend(vec![row, other]);
        t
    }

    #[test]
    fn test_cell_labels() {
        assert_eq!(Cell::assigned("P7", "ARTE").export_label(), "P7");
        assert_eq!(Cell::NoLesson.export_label(), "---");
        assert_eq!(Cell::Unfilled.export_label(), "---");
        assert_eq!(Cell::NoLesson.instructor_id(), None);
    }

    #[test]
    fn test_timetable_queries() {
        let t = sample_timetable();
        assert_eq!(t.unfilled_count(), 1);
        assert!(!t.is_fully_covered());
        assert_eq!(t.rows[0].class_key(), ("ESCOLA A", "1 ANO", "A"));
        assert_ne!(t.rows[0].class_key(), t.rows[1].class_key());
        assert_eq!(t.slots_for_instructor("P1").len(), 3);
        assert!(t.slots_for_instructor("P2").is_empty());
    }
}
