//! Position id allocation.

use crate::models::EmploymentKind;
use crate::normalize::{region_initial, subject_abbreviation};

/// Hands out fresh instructor codes of the form
/// `P{n}{kind}{region initial}{subject abbreviation}`.
///
/// Numbering continues after the highest `P{digits}` prefix among the
/// existing ids, so proposals never collide with registered instructors.
///
/// ```
/// use u_timetable::models::EmploymentKind;
/// use u_timetable::staffing::PositionIdAllocator;
///
/// let mut ids = PositionIdAllocator::from_existing(["P7EFARTE", "P11DTEDFI", "X3"]);
/// assert_eq!(ids.next_id(EmploymentKind::Itinerant, "Fundão", "Arte"), "P12DFARTE");
/// assert_eq!(ids.next_id(EmploymentKind::Itinerant, "Timbuí", "Educação Física"), "P13DTEDFI");
/// ```
#[derive(Debug, Clone)]
pub struct PositionIdAllocator {
    next: u32,
}

impl PositionIdAllocator {
    /// Starts numbering at 1.
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Starts numbering after the highest number among `ids`.
    pub fn from_existing<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let highest = ids
            .into_iter()
            .filter_map(|id| sequence_number(id.as_ref()))
            .max()
            .unwrap_or(0);
        Self {
            next: highest.saturating_add(1),
        }
    }

    /// Number the next id will carry.
    pub fn peek(&self) -> u32 {
        self.next
    }

    /// Allocates the next id.
    pub fn next_id(&mut self, kind: EmploymentKind, region: &str, subject: &str) -> String {
        let id = format!(
            "P{}{}{}{}",
            self.next,
            kind.code(),
            region_initial(region),
            subject_abbreviation(subject)
        );
        self.next += 1;
        id
    }
}

impl Default for PositionIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Numeric part of a `P{digits}...` id.
fn sequence_number(id: &str) -> Option<u32> {
    let rest = id.trim().strip_prefix('P')?;
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_number() {
        assert_eq!(sequence_number("P12DFARTE"), Some(12));
        assert_eq!(sequence_number(" P3 "), Some(3));
        assert_eq!(sequence_number("PROF"), None);
        assert_eq!(sequence_number("12"), None);
    }

    #[test]
    fn test_allocator_starts_after_highest() {
        let mut ids = PositionIdAllocator::from_existing(vec!["P2EPARTE".to_string(), "P9DFLIIN".into()]);
        assert_eq!(ids.peek(), 10);
        assert_eq!(
            ids.next_id(EmploymentKind::Permanent, "Praia Grande", "Inglês"),
            "P10EPINGL"
        );
        assert_eq!(ids.peek(), 11);
    }

    #[test]
    fn test_allocator_empty_store() {
        let mut ids = PositionIdAllocator::from_existing(Vec::<String>::new());
        assert_eq!(
            ids.next_id(EmploymentKind::Itinerant, "Fundão", "Ensino Religioso"),
            "P1DFENRE"
        );
    }
}
