//! Flat record adapters for the tabular store.
//!
//! The store keeps every table as rows of text cells with Portuguese
//! column headers. The record types here mirror those rows one to one
//! (serde renames carry the headers) and convert to and from the domain
//! models. Conversion normalizes labels and rejects cells that cannot be
//! parsed with [`TimetableError::InvalidRecord`].
//!
//! | Table | Record | Model |
//! |-------|--------|-------|
//! | Turmas | [`ClassRecord`] | [`ClassSection`] |
//! | Curriculo | [`CurriculumRecord`] | [`CurriculumRequirement`] |
//! | Professores | [`InstructorRecord`] | [`Instructor`], [`SyntheticPosition`] |
//! | Agrupamentos | [`SchoolGroupRecord`] | [`SchoolGroup`] |
//! | ConfigDias | [`DayPlanRecord`] | [`DayPlan`] |
//! | Horario | [`TimetableRecord`] | [`TimetableRow`] |

use serde::{Deserialize, Serialize};

use crate::error::{TimetableError, TimetableResult};
use crate::models::{
    Cell, ClassSection, Curriculum, CurriculumRequirement, DayPlan, EmploymentKind, Instructor,
    SchoolGroup, Shift, ShiftPreference, SyntheticPosition, TimetableRow, Weekday,
    EMPTY_CELL_MARKER, SLOTS_PER_DAY,
};
use crate::normalize::{canonical_subject, normalize_label, split_labels};
use crate::search::RunInput;

/// Day label written for grades without a planning day.
pub const UNPLANNED_DAY_LABEL: &str = "NAO CONFIGURADO";

/// One row of the class-section table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRecord {
    #[serde(rename = "ESCOLA")]
    pub school: String,
    #[serde(rename = "SÉRIE/ANO")]
    pub grade: String,
    #[serde(rename = "TURMA")]
    pub section: String,
    #[serde(rename = "TURNO")]
    pub shift: String,
    #[serde(rename = "REGIÃO")]
    pub region: String,
}

/// One row of the curriculum table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurriculumRecord {
    #[serde(rename = "SÉRIE/ANO")]
    pub grade: String,
    #[serde(rename = "COMPONENTE")]
    pub subject: String,
    #[serde(rename = "QTD_AULAS")]
    pub weekly_lessons: String,
}

/// One row of the instructor table.
///
/// Synthetic positions are written back in the same shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructorRecord {
    #[serde(rename = "CÓDIGO")]
    pub id: String,
    #[serde(rename = "NOME", default)]
    pub name: String,
    /// Comma-separated subjects.
    #[serde(rename = "COMPONENTES")]
    pub subjects: String,
    #[serde(rename = "CARGA_HORÁRIA")]
    pub capacity: String,
    #[serde(rename = "REGIÃO")]
    pub region: String,
    #[serde(rename = "VÍNCULO", default)]
    pub employment: String,
    #[serde(rename = "TURNO_FIXO", default)]
    pub fixed_shift: String,
    /// Comma-separated home schools.
    #[serde(rename = "ESCOLAS_ALOCADAS", default)]
    pub home_schools: String,
    #[serde(rename = "QTD_PL", default)]
    pub planning_time: String,
}

/// Position proposals share the instructor table layout.
pub type PositionRecord = InstructorRecord;

/// One row of the school-group (route) table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolGroupRecord {
    #[serde(rename = "NOME_ROTA")]
    pub name: String,
    /// Comma-separated member schools.
    #[serde(rename = "LISTA_ESCOLAS")]
    pub schools: String,
}

/// One row of the planning-day table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlanRecord {
    #[serde(rename = "SÉRIE/ANO")]
    pub grade: String,
    #[serde(rename = "DIA_PLANEJAMENTO")]
    pub day: String,
}

/// One row of the timetable table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableRecord {
    #[serde(rename = "ESCOLA")]
    pub school: String,
    #[serde(rename = "SÉRIE/ANO", default)]
    pub grade: String,
    #[serde(rename = "TURMA")]
    pub section: String,
    #[serde(rename = "TURNO")]
    pub shift: String,
    #[serde(rename = "DIA")]
    pub day: String,
    #[serde(rename = "1ª")]
    pub slot1: String,
    #[serde(rename = "2ª")]
    pub slot2: String,
    #[serde(rename = "3ª")]
    pub slot3: String,
    #[serde(rename = "4ª")]
    pub slot4: String,
    #[serde(rename = "5ª")]
    pub slot5: String,
}

/// The input tables of a run, as read from the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordSet {
    pub classes: Vec<ClassRecord>,
    pub curriculum: Vec<CurriculumRecord>,
    pub instructors: Vec<InstructorRecord>,
    #[serde(default)]
    pub groups: Vec<SchoolGroupRecord>,
    #[serde(default)]
    pub day_plan: Vec<DayPlanRecord>,
}

impl ClassRecord {
    /// Converts to a class section. `row` is used in error messages.
    pub fn to_section(&self, row: usize) -> TimetableResult<ClassSection> {
        let shift = parse_shift("Turmas", row, &self.shift)?;
        Ok(ClassSection::new(
            &self.school,
            &self.grade,
            &self.section,
            shift,
            &self.region,
        ))
    }
}

impl CurriculumRecord {
    /// Converts to a curriculum requirement.
    pub fn to_requirement(&self, row: usize) -> TimetableResult<CurriculumRequirement> {
        let lessons = parse_count("Curriculo", row, "QTD_AULAS", &self.weekly_lessons)?;
        Ok(CurriculumRequirement::new(&self.grade, &self.subject, lessons))
    }
}

impl InstructorRecord {
    /// Converts to an instructor. An empty employment cell means itinerant.
    pub fn to_instructor(&self, row: usize) -> TimetableResult<Instructor> {
        const TABLE: &str = "Professores";
        if self.id.trim().is_empty() {
            return Err(TimetableError::invalid_record(TABLE, row, "empty instructor code"));
        }
        let employment = if normalize_label(&self.employment).is_empty() {
            EmploymentKind::Itinerant
        } else {
            EmploymentKind::parse(&self.employment).ok_or_else(|| {
                TimetableError::invalid_record(
                    TABLE,
                    row,
                    format!("unknown employment kind '{}'", self.employment),
                )
            })?
        };
        let fixed_shift = ShiftPreference::parse(&self.fixed_shift).ok_or_else(|| {
            TimetableError::invalid_record(
                TABLE,
                row,
                format!("unknown fixed shift '{}'", self.fixed_shift),
            )
        })?;
        let capacity = parse_count(TABLE, row, "CARGA_HORÁRIA", &self.capacity)?;

        let mut instructor = Instructor::new(self.id.clone(), &self.region, employment)
            .with_name(self.name.trim())
            .with_capacity(capacity);
        instructor.fixed_shift = fixed_shift;
        instructor.subjects = split_labels(&self.subjects)
            .iter()
            .map(|s| canonical_subject(s))
            .collect();
        instructor.home_schools = split_labels(&self.home_schools).into_iter().collect();
        Ok(instructor)
    }
}

impl From<&SyntheticPosition> for InstructorRecord {
    fn from(position: &SyntheticPosition) -> Self {
        Self {
            id: position.id.clone(),
            name: position.name.clone(),
            subjects: position.subject.clone(),
            capacity: position.weekly_lessons.to_string(),
            region: position.region.clone(),
            employment: employment_label(position.employment).to_string(),
            fixed_shift: String::new(),
            home_schools: position.home_schools.join(","),
            planning_time: position.planning_time.to_string(),
        }
    }
}

impl SchoolGroupRecord {
    /// Converts to a school group.
    pub fn to_group(&self) -> SchoolGroup {
        split_labels(&self.schools)
            .iter()
            .fold(SchoolGroup::new(self.name.trim()), |g, s| g.with_school(s))
    }
}

impl DayPlanRecord {
    /// Parses the (grade, weekday) entry.
    pub fn to_entry(&self, row: usize) -> TimetableResult<(String, Weekday)> {
        let day = Weekday::parse(&self.day).ok_or_else(|| {
            TimetableError::invalid_record(
                "ConfigDias",
                row,
                format!("unknown weekday '{}'", self.day),
            )
        })?;
        Ok((normalize_label(&self.grade), day))
    }
}

impl From<&TimetableRow> for TimetableRecord {
    fn from(row: &TimetableRow) -> Self {
        let label = |slot: usize| {
            row.slots
                .get(slot)
                .map_or(EMPTY_CELL_MARKER, |c| c.export_label())
                .to_string()
        };
        Self {
            school: row.school.clone(),
            grade: row.grade.clone(),
            section: row.section.clone(),
            shift: row.shift.label().to_string(),
            day: row
                .weekday
                .map_or(UNPLANNED_DAY_LABEL, |d| d.label())
                .to_string(),
            slot1: label(0),
            slot2: label(1),
            slot3: label(2),
            slot4: label(3),
            slot5: label(4),
        }
    }
}

impl TimetableRecord {
    /// Reads a stored row back.
    ///
    /// Cells hold instructor codes only, so assigned cells come back
    /// without a subject, and the empty marker reads as no lesson.
    pub fn to_row(&self, row: usize) -> TimetableResult<TimetableRow> {
        let shift = parse_shift("Horario", row, &self.shift)?;
        let weekday = if normalize_label(&self.day) == UNPLANNED_DAY_LABEL {
            None
        } else {
            Some(Weekday::parse(&self.day).ok_or_else(|| {
                TimetableError::invalid_record(
                    "Horario",
                    row,
                    format!("unknown weekday '{}'", self.day),
                )
            })?)
        };

        let mut out = TimetableRow::empty(
            &normalize_label(&self.school),
            &normalize_label(&self.grade),
            &normalize_label(&self.section),
            shift,
            weekday,
        );
        let cells = [&self.slot1, &self.slot2, &self.slot3, &self.slot4, &self.slot5];
        for (slot, text) in cells.iter().enumerate().take(SLOTS_PER_DAY) {
            let code = text.trim();
            if !code.is_empty() && code != EMPTY_CELL_MARKER {
                out.slots[slot] = Cell::Assigned {
                    instructor: code.to_string(),
                    subject: None,
                };
            }
        }
        Ok(out)
    }
}

impl RecordSet {
    /// Converts every table, failing on the first invalid row.
    pub fn to_run_input(&self) -> TimetableResult<RunInput> {
        let classes = self
            .classes
            .iter()
            .enumerate()
            .map(|(i, r)| r.to_section(i))
            .collect::<TimetableResult<Vec<_>>>()?;
        let curriculum = self
            .curriculum
            .iter()
            .enumerate()
            .map(|(i, r)| r.to_requirement(i))
            .collect::<TimetableResult<Curriculum>>()?;
        let instructors = self
            .instructors
            .iter()
            .enumerate()
            .map(|(i, r)| r.to_instructor(i))
            .collect::<TimetableResult<Vec<_>>>()?;
        let groups = self.groups.iter().map(SchoolGroupRecord::to_group).collect();

        let mut day_plan = DayPlan::new();
        for (i, record) in self.day_plan.iter().enumerate() {
            let (grade, day) = record.to_entry(i)?;
            day_plan.add(&grade, day);
        }

        Ok(RunInput::new(classes, curriculum, instructors)
            .with_groups(groups)
            .with_day_plan(day_plan))
    }
}

fn employment_label(kind: EmploymentKind) -> &'static str {
    match kind {
        EmploymentKind::Permanent => "EFETIVO",
        EmploymentKind::Itinerant => "DT",
    }
}

fn parse_shift(table: &'static str, row: usize, text: &str) -> TimetableResult<Shift> {
    Shift::parse(text).ok_or_else(|| {
        TimetableError::invalid_record(table, row, format!("unknown shift '{text}'"))
    })
}

/// Parses a non-negative integer cell. Spreadsheets hand back `"20.0"`
/// for integers, so integral decimals are accepted; empty cells are 0.
fn parse_count(table: &'static str, row: usize, field: &str, text: &str) -> TimetableResult<u32> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(0);
    }
    if let Ok(n) = text.parse::<u32>() {
        return Ok(n);
    }
    match text.replace(',', ".").parse::<f64>() {
        Ok(x) if x >= 0.0 && x.fract() == 0.0 && x <= f64::from(u32::MAX) => Ok(x as u32),
        _ => Err(TimetableError::invalid_record(
            table,
            row,
            format!("{field} is not a lesson count: '{text}'"),
        )),
    }
}
