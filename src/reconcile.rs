//! Deficit reconciliation and coverage metrics.
//!
//! Compares what the curriculum expects each class to receive with what
//! the timetable actually delivers, and aggregates the shortfall by
//! (region, subject). The result feeds the staffing synthesizer.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Deficit | Σ max(0, expected - delivered) per (region, subject) |
//! | Coverage rate | filled / (filled + unfilled) |

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::models::{Cell, ClassSection, Curriculum, Instructor, Timetable};

/// Uncovered lessons per (region, subject).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeficitMap {
    entries: BTreeMap<(String, String), u32>,
}

/// Cell-level coverage indicators of a timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageKpi {
    /// Cells with an instructor.
    pub filled: usize,
    /// Required lessons left without an instructor.
    pub unfilled: usize,
    /// Intentionally free cells.
    pub no_lesson: usize,
    /// filled / (filled + unfilled); 1.0 when nothing was required.
    pub coverage_rate: f64,
}

impl DeficitMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `count` missing lessons for (region, subject). Zero is ignored.
    pub fn add(&mut self, region: &str, subject: &str, count: u32) {
        if count == 0 {
            return;
        }
        *self
            .entries
            .entry((region.to_string(), subject.to_string()))
            .or_insert(0) += count;
    }

    /// Builder form of [`add`](Self::add).
    pub fn with_entry(mut self, region: &str, subject: &str, count: u32) -> Self {
        self.add(region, subject, count);
        self
    }

    /// Missing lessons for (region, subject).
    pub fn get(&self, region: &str, subject: &str) -> u32 {
        self.entries
            .get(&(region.to_string(), subject.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Entries as (region, subject, count), ordered by region then subject.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, u32)> {
        self.entries
            .iter()
            .map(|((r, s), &n)| (r.as_str(), s.as_str(), n))
    }

    /// Sum over all entries.
    pub fn total(&self) -> u32 {
        self.entries.values().sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rebuilds the deficit map of a run.
///
/// Each class is expected to receive its grade's specialist quota once per
/// timetable row it owns (at least once). Filled cells credit their
/// recorded subject; cells carrying only an instructor id credit every
/// subject that instructor teaches. Duplicate class records count once.
pub fn reconcile_deficits<'a>(
    timetable: &Timetable,
    classes: &[ClassSection],
    curriculum: &Curriculum,
    instructors: impl IntoIterator<Item = &'a Instructor>,
    config: &EngineConfig,
) -> DeficitMap {
    let qualifications: HashMap<&str, &Instructor> =
        instructors.into_iter().map(|i| (i.id.as_str(), i)).collect();

    let mut delivered: HashMap<(&str, &str, &str), BTreeMap<String, u32>> = HashMap::new();
    let mut days: HashMap<(&str, &str, &str), u32> = HashMap::new();
    for row in &timetable.rows {
        let key = row.class_key();
        *days.entry(key).or_insert(0) += 1;
        let counts = delivered.entry(key).or_default();
        for cell in &row.slots {
            let Cell::Assigned {
                instructor,
                subject,
            } = cell
            else {
                continue;
            };
            match subject {
                Some(s) => *counts.entry(s.clone()).or_insert(0) += 1,
                None => {
                    if let Some(i) = qualifications.get(instructor.as_str()) {
                        for s in &i.subjects {
                            *counts.entry(s.clone()).or_insert(0) += 1;
                        }
                    }
                }
            }
        }
    }

    let mut deficits = DeficitMap::new();
    let mut seen = HashSet::new();
    for class in classes {
        if !seen.insert(class.key()) {
            continue;
        }
        let factor = days.get(&class.key()).copied().unwrap_or(1).max(1);
        let got = delivered.get(&class.key());

        let mut expected: BTreeMap<&str, u32> = BTreeMap::new();
        for row in curriculum
            .rows_for(&class.grade)
            .filter(|r| config.is_specialist(&r.subject))
        {
            *expected.entry(row.subject.as_str()).or_insert(0) += row.weekly_lessons * factor;
        }

        for (subject, want) in expected {
            let have = got.and_then(|c| c.get(subject)).copied().unwrap_or(0);
            deficits.add(&class.region, subject, want.saturating_sub(have));
        }
    }
    deficits
}

impl CoverageKpi {
    /// Counts cells of a timetable.
    pub fn calculate(timetable: &Timetable) -> Self {
        let mut filled = 0;
        let mut unfilled = 0;
        let mut no_lesson = 0;
        for cell in timetable.rows.iter().flat_map(|r| r.slots.iter()) {
            match cell {
                Cell::Assigned { .. } => filled += 1,
                Cell::Unfilled => unfilled += 1,
                Cell::NoLesson => no_lesson += 1,
            }
        }

        let required = filled + unfilled;
        let coverage_rate = if required == 0 {
            1.0
        } else {
            filled as f64 / required as f64
        };

        Self {
            filled,
            unfilled,
            no_lesson,
            coverage_rate,
        }
    }

    /// Whether coverage reaches `min_rate`.
    pub fn meets_threshold(&self, min_rate: f64) -> bool {
        self.coverage_rate >= min_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Shift, TimetableRow, Weekday};

    fn class(section: &str) -> ClassSection {
        ClassSection::new("ESCOLA A", "1 ANO", section, Shift::Morning, "FUNDAO")
    }

    fn row(section: &str, cells: Vec<Cell>) -> TimetableRow {
        graded_row("1 ANO", section, cells)
    }

    fn graded_row(grade: &str, section: &str, cells: Vec<Cell>) -> TimetableRow {
        let mut r = TimetableRow::empty(
            "ESCOLA A",
            grade,
            section,
            Shift::Morning,
            Some(Weekday::Monday),
        );
        for (slot, cell) in cells.into_iter().enumerate() {
            r.slots[slot] = cell;
        }
        r
    }

    fn instructors() -> Vec<Instructor> {
        vec![Instructor::itinerant("P1", "FUNDAO")
            .with_subject("ARTE")
            .with_capacity(1)]
    }

    #[test]
    fn test_two_classes_one_instructor_deficit() {
        let curriculum = Curriculum::new().with_requirement("1 ANO", "ARTE", 1);
        let classes = vec![class("A"), class("B")];
        let mut tt = Timetable::new();
        tt.extend(vec![
            row("A", vec![Cell::assigned("P1", "ARTE")]),
            row("B", vec![Cell::Unfilled]),
        ]);

        let d = reconcile_deficits(
            &tt,
            &classes,
            &curriculum,
            &instructors(),
            &EngineConfig::default(),
        );
        assert_eq!(d.get("FUNDAO", "ARTE"), 1);
        assert_eq!(d.total(), 1);
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn test_same_section_label_in_two_grades() {
        let curriculum = Curriculum::new()
            .with_requirement("1 ANO", "ARTE", 1)
            .with_requirement("2 ANO", "MUSICA", 1);
        let classes = vec![
            class("A"),
            ClassSection::new("ESCOLA A", "2 ANO", "A", Shift::Morning, "FUNDAO"),
        ];
        let mut tt = Timetable::new();
        tt.extend(vec![
            graded_row("1 ANO", "A", vec![Cell::assigned("P1", "ARTE")]),
            graded_row("2 ANO", "A", vec![Cell::Unfilled]),
        ]);

        let d = reconcile_deficits(
            &tt,
            &classes,
            &curriculum,
            &instructors(),
            &EngineConfig::default(),
        );
        assert_eq!(d.get("FUNDAO", "ARTE"), 0);
        assert_eq!(d.get("FUNDAO", "MUSICA"), 1);
        assert_eq!(d.total(), 1);
    }

    #[test]
    fn test_reconcile_is_idempotent_and_order_independent() {
        let curriculum = Curriculum::new()
            .with_requirement("1 ANO", "ARTE", 2)
            .with_requirement("1 ANO", "MUSICA", 1);
        let mut classes = vec![class("A"), class("B"), class("C")];
        let mut tt = Timetable::new();
        tt.extend(vec![
            row("A", vec![Cell::assigned("P1", "ARTE"), Cell::Unfilled, Cell::Unfilled]),
            row("B", vec![Cell::Unfilled, Cell::Unfilled, Cell::Unfilled]),
        ]);
        let config = EngineConfig::default();

        let first = reconcile_deficits(&tt, &classes, &curriculum, &instructors(), &config);
        let second = reconcile_deficits(&tt, &classes, &curriculum, &instructors(), &config);
        assert_eq!(first, second);

        classes.reverse();
        tt.rows.reverse();
        let reordered = reconcile_deficits(&tt, &classes, &curriculum, &instructors(), &config);
        assert_eq!(first, reordered);

        // A: 1 ARTE + 1 MUSICA, B: 2 + 1, C (no rows): 2 + 1
        assert_eq!(first.get("FUNDAO", "ARTE"), 5);
        assert_eq!(first.get("FUNDAO", "MUSICA"), 3);
    }

    #[test]
    fn test_cells_without_subject_credit_qualifications() {
        let curriculum = Curriculum::new()
            .with_requirement("1 ANO", "ARTE", 1)
            .with_requirement("1 ANO", "MUSICA", 1);
        let multi = Instructor::itinerant("P9", "FUNDAO")
            .with_subject("ARTE")
            .with_subject("MUSICA")
            .with_capacity(10);
        let mut tt = Timetable::new();
        tt.extend(vec![row(
            "A",
            vec![Cell::Assigned {
                instructor: "P9".into(),
                subject: None,
            }],
        )]);

        let d = reconcile_deficits(
            &tt,
            &[class("A")],
            &curriculum,
            &[multi],
            &EngineConfig::default(),
        );
        assert!(d.is_empty());
    }

    #[test]
    fn test_specialist_filter_and_multiple_days() {
        let curriculum = Curriculum::new()
            .with_requirement("1 ANO", "ARTE", 1)
            .with_requirement("1 ANO", "MATEMATICA", 4);
        let config = EngineConfig::default().with_specialist_subject("Arte");
        let mut tuesday = row("A", vec![Cell::Unfilled]);
        tuesday.weekday = Some(Weekday::Tuesday);
        let mut tt = Timetable::new();
        tt.extend(vec![row("A", vec![Cell::assigned("P1", "ARTE")]), tuesday]);

        let d = reconcile_deficits(&tt, &[class("A")], &curriculum, &instructors(), &config);
        assert_eq!(d.get("FUNDAO", "ARTE"), 1);
        assert_eq!(d.get("FUNDAO", "MATEMATICA"), 0);
    }

    #[test]
    fn test_coverage_kpi() {
        let mut tt = Timetable::new();
        tt.extend(vec![row(
            "A",
            vec![Cell::assigned("P1", "ARTE"), Cell::assigned("P1", "ARTE"), Cell::Unfilled],
        )]);

        let kpi = CoverageKpi::calculate(&tt);
        assert_eq!(kpi.filled, 2);
        assert_eq!(kpi.unfilled, 1);
        assert_eq!(kpi.no_lesson, 2);
        assert!((kpi.coverage_rate - 2.0 / 3.0).abs() < 1e-9);
        assert!(!kpi.meets_threshold(0.9));

        let empty = CoverageKpi::calculate(&Timetable::new());
        assert_eq!(empty.coverage_rate, 1.0);
    }
}
