//! Label normalization.
//!
//! School, region and subject labels arrive from a hand-edited tabular
//! store, so the same entity may be spelled `"Fundão"`, `"FUNDAO "` or
//! `"fundão"`. All lookups compare the normalized form: trimmed,
//! uppercased, accents stripped by compatibility decomposition, inner
//! whitespace collapsed.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalizes a free-text label for comparison.
///
/// ```
/// use u_timetable::normalize::normalize_label;
///
/// assert_eq!(normalize_label("  Educação   Física "), "EDUCACAO FISICA");
/// assert_eq!(normalize_label("nan"), "");
/// ```
pub fn normalize_label(text: &str) -> String {
    let folded: String = text
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_uppercase)
        .collect();
    let collapsed = folded.split_whitespace().collect::<Vec<_>>().join(" ");
    // Empty spreadsheet cells round-trip as "NaN".
    if collapsed == "NAN" {
        String::new()
    } else {
        collapsed
    }
}

/// Normalizes a subject label and maps known spellings to one name.
///
/// The store spells specialist subjects many ways (`"Inglês"`,
/// `"Língua Inglesa"`, `"Artes"`); each family collapses to a single
/// canonical label. Unknown subjects are only normalized.
///
/// ```
/// use u_timetable::normalize::canonical_subject;
///
/// assert_eq!(canonical_subject("Inglês"), "LINGUA INGLESA");
/// assert_eq!(canonical_subject("Ed. Física"), "EDUCACAO FISICA");
/// assert_eq!(canonical_subject("Matemática"), "MATEMATICA");
/// ```
pub fn canonical_subject(text: &str) -> String {
    let label = normalize_label(text);
    let canonical = if label.contains("ART") {
        "ARTE"
    } else if label.contains("FISICA") {
        "EDUCACAO FISICA"
    } else if label.contains("INGLE") {
        "LINGUA INGLESA"
    } else if label.contains("RELIGIO") {
        "ENSINO RELIGIOSO"
    } else if label.contains("HIST") && label.contains("CONTA") {
        "CONTACAO DE HISTORIA"
    } else {
        return label;
    };
    canonical.to_string()
}

/// Splits a comma-separated cell into normalized, non-empty labels.
pub fn split_labels(cell: &str) -> Vec<String> {
    cell.split(',')
        .map(normalize_label)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Short code for a subject, used in generated position ids.
///
/// Multi-word subjects take two letters from each of the first two
/// significant words (`"EDUCACAO FISICA"` → `"EDFI"`); single words take
/// their first four letters.
pub fn subject_abbreviation(subject: &str) -> String {
    let normalized = normalize_label(subject);
    let words: Vec<&str> = normalized
        .split(' ')
        .filter(|w| !CONNECTORS.contains(w))
        .collect();
    match words.as_slice() {
        [] => String::new(),
        [single] => single.chars().take(4).collect(),
        [first, second, ..] => first
            .chars()
            .take(2)
            .chain(second.chars().take(2))
            .collect(),
    }
}

/// Single-letter code for a region (`"PRAIA GRANDE"` → `'P'`).
pub fn region_initial(region: &str) -> char {
    normalize_label(region).chars().next().unwrap_or('X')
}

const CONNECTORS: [&str; 8] = ["DE", "DA", "DO", "DAS", "DOS", "E", "OF", "AND"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_label() {
        assert_eq!(normalize_label("Timbuí"), "TIMBUI");
        assert_eq!(normalize_label("  praia   grande"), "PRAIA GRANDE");
        assert_eq!(normalize_label("Língua Inglesa"), "LINGUA INGLESA");
        assert_eq!(normalize_label(""), "");
        assert_eq!(normalize_label("NaN"), "");
    }

    #[test]
    fn test_normalize_decomposed_input() {
        // combining tilde / acute, as some spreadsheet exports write them
        assert_eq!(normalize_label("Funda\u{0303}o"), "FUNDAO");
        assert_eq!(normalize_label("Timbui\u{0301}"), "TIMBUI");
        assert_eq!(
            normalize_label("Educac\u{0327}a\u{0303}o Fi\u{0301}sica"),
            normalize_label("Educação Física")
        );
    }

    #[test]
    fn test_canonical_subject_aliases() {
        assert_eq!(canonical_subject("Artes Visuais"), "ARTE");
        assert_eq!(canonical_subject("Educação Física"), "EDUCACAO FISICA");
        assert_eq!(canonical_subject("Inglês"), "LINGUA INGLESA");
        assert_eq!(canonical_subject("Língua Inglesa"), "LINGUA INGLESA");
        assert_eq!(canonical_subject("Ens. Religioso"), "ENSINO RELIGIOSO");
        assert_eq!(canonical_subject("Contação de Histórias"), "CONTACAO DE HISTORIA");
        assert_eq!(canonical_subject("História"), "HISTORIA");
        assert_eq!(canonical_subject(" musica "), "MUSICA");
    }

    #[test]
    fn test_split_labels() {
        assert_eq!(
            split_labels("Arte, Educação Física,, "),
            vec!["ARTE".to_string(), "EDUCACAO FISICA".to_string()]
        );
        assert!(split_labels("").is_empty());
    }

    #[test]
    fn test_subject_abbreviation() {
        assert_eq!(subject_abbreviation("Arte"), "ARTE");
        assert_eq!(subject_abbreviation("Educação Física"), "EDFI");
        assert_eq!(subject_abbreviation("Língua Inglesa"), "LIIN");
        assert_eq!(subject_abbreviation("Ensino Religioso"), "ENRE");
        assert_eq!(subject_abbreviation("Contação de História"), "COHI");
        assert_eq!(subject_abbreviation(""), "");
    }

    #[test]
    fn test_region_initial() {
        assert_eq!(region_initial("Praia Grande"), 'P');
        assert_eq!(region_initial("fundão"), 'F');
        assert_eq!(region_initial(""), 'X');
    }
}
