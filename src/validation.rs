//! Input validation for timetabling runs.
//!
//! Checks structural integrity of the input tables before a run.
//! Detects:
//! - Duplicate instructor codes and class sections
//! - Duplicate curriculum rows
//! - Classes whose grade has no curriculum
//! - Instructors that can never be assigned
//! - Routes that are empty or name unknown schools
//!
//! None of these stop the engine (it recovers locally), but each one
//! usually means the store was edited by mistake.

use std::collections::HashSet;

use crate::search::RunInput;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two instructors share the same code.
    DuplicateId,
    /// Two classes share (school, grade, section).
    DuplicateClassSection,
    /// A (grade, subject) pair appears twice in the curriculum.
    DuplicateCurriculumRow,
    /// A class's grade has no curriculum row.
    MissingCurriculum,
    /// An instructor teaches no subject.
    NoQualifications,
    /// An instructor has zero weekly capacity.
    ZeroCapacity,
    /// A route lists a school with no registered class.
    UnknownSchool,
    /// A route has no member schools.
    EmptyGroup,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input tables of a run.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(input: &RunInput) -> ValidationResult {
    let mut errors = Vec::new();

    let mut instructor_ids = HashSet::new();
    for i in &input.instructors {
        if !instructor_ids.insert(i.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate instructor code: {}", i.id),
            ));
        }
        if i.subjects.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::NoQualifications,
                format!("Instructor '{}' teaches no subject", i.id),
            ));
        }
        if i.capacity == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroCapacity,
                format!("Instructor '{}' has zero weekly capacity", i.id),
            ));
        }
    }

    let mut rows = HashSet::new();
    for r in input.curriculum.rows() {
        if !rows.insert((r.grade.as_str(), r.subject.as_str())) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateCurriculumRow,
                format!("Duplicate curriculum row: {} / {}", r.grade, r.subject),
            ));
        }
    }

    let mut sections = HashSet::new();
    let mut missing_grades = HashSet::new();
    let mut schools = HashSet::new();
    for c in &input.classes {
        schools.insert(c.school.as_str());
        if !sections.insert(c.key()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateClassSection,
                format!(
                    "Duplicate class section: {} / {} / {}",
                    c.school, c.grade, c.section
                ),
            ));
        }
        if !input.curriculum.has_grade(&c.grade) && missing_grades.insert(c.grade.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingCurriculum,
                format!("Grade '{}' has no curriculum", c.grade),
            ));
        }
    }

    for g in &input.groups {
        if g.schools.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyGroup,
                format!("Route '{}' has no schools", g.name),
            ));
        }
        for s in &g.schools {
            if !schools.contains(s.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownSchool,
                    format!("Route '{}' references unknown school '{}'", g.name, s),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassSection, Curriculum, Instructor, SchoolGroup, Shift};

    fn valid_input() -> RunInput {
        RunInput::new(
            vec![
                ClassSection::new("ESCOLA A", "1 ANO", "A", Shift::Morning, "NORTE"),
                ClassSection::new("ESCOLA B", "1 ANO", "A", Shift::Morning, "NORTE"),
            ],
            Curriculum::new().with_requirement("1 ANO", "ARTE", 2),
            vec![Instructor::itinerant("P1", "NORTE")
                .with_subject("ARTE")
                .with_capacity(20)],
        )
        .with_groups(vec![SchoolGroup::new("R1")
            .with_school("ESCOLA A")
            .with_school("ESCOLA B")])
    }

    fn kinds(input: &RunInput) -> Vec<ValidationErrorKind> {
        validate_input(input)
            .unwrap_err()
            .into_iter()
            .map(|e| e.kind)
            .collect()
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_input(&valid_input()).is_ok());
    }

    #[test]
    fn test_duplicate_instructor_id() {
        let mut input = valid_input();
        input.instructors.push(
            Instructor::permanent("P1", "SUL")
                .with_subject("MUSICA")
                .with_capacity(10),
        );
        assert_eq!(kinds(&input), vec![ValidationErrorKind::DuplicateId]);
    }

    #[test]
    fn test_unusable_instructor() {
        let mut input = valid_input();
        input.instructors.push(Instructor::itinerant("P2", "NORTE"));
        assert_eq!(
            kinds(&input),
            vec![
                ValidationErrorKind::NoQualifications,
                ValidationErrorKind::ZeroCapacity
            ]
        );
    }

    #[test]
    fn test_duplicate_class_and_missing_grade() {
        let mut input = valid_input();
        input
            .classes
            .push(ClassSection::new("Escola A", "1 ano", "a", Shift::Afternoon, "Norte"));
        input
            .classes
            .push(ClassSection::new("ESCOLA A", "9 ANO", "Z", Shift::Morning, "NORTE"));
        input
            .classes
            .push(ClassSection::new("ESCOLA B", "9 ANO", "Z", Shift::Morning, "NORTE"));
        assert_eq!(
            kinds(&input),
            vec![
                ValidationErrorKind::DuplicateClassSection,
                ValidationErrorKind::MissingCurriculum
            ]
        );
    }

    #[test]
    fn test_section_label_reused_across_grades() {
        let mut input = valid_input();
        input.curriculum = input.curriculum.with_requirement("2 ANO", "MUSICA", 1);
        input
            .classes
            .push(ClassSection::new("ESCOLA A", "2 ANO", "A", Shift::Morning, "NORTE"));
        assert!(validate_input(&input).is_ok());
    }

    #[test]
    fn test_duplicate_curriculum_row() {
        let mut input = valid_input();
        input.curriculum = Curriculum::new()
            .with_requirement("1 ANO", "ARTE", 2)
            .with_requirement("1 ano", "Arte", 1);
        assert_eq!(kinds(&input), vec![ValidationErrorKind::DuplicateCurriculumRow]);
    }

    #[test]
    fn test_bad_groups() {
        let mut input = valid_input();
        input.groups.push(SchoolGroup::new("EMPTY"));
        input
            .groups
            .push(SchoolGroup::new("R2").with_school("ESCOLA X"));
        let errors = validate_input(&input).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].kind, ValidationErrorKind::EmptyGroup);
        assert_eq!(errors[1].kind, ValidationErrorKind::UnknownSchool);
        assert!(errors[1].message.contains("ESCOLA X"));
    }
}
