//! Fuzzy column resolution
//!
//! Export headers drift between survey runs (extra metadata, punctuation),
//! so fields are located by case-insensitive substring. The first header in
//! file order that contains the search term wins.

use super::models::{ColumnMapping, FieldSpec, HeaderSet};

/// Outcome of resolving a field spec against one header set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub mapping: ColumnMapping,
    /// Fields whose search term matched no header, in spec order
    pub unresolved: Vec<String>,
}

/// First header whose lower-cased form contains the lower-cased term
pub fn find_column<'a>(headers: &'a HeaderSet, search_term: &str) -> Option<&'a str> {
    let needle = search_term.to_lowercase();
    headers.iter().find(|h| h.to_lowercase().contains(&needle))
}

/// Resolve every field of the spec to a header. Unmatched fields are left out
/// of the mapping and listed in [`Resolution::unresolved`].
pub fn resolve_with_report(headers: &HeaderSet, spec: &FieldSpec) -> Resolution {
    let mut resolution = Resolution::default();

    for (field, term) in spec.iter() {
        match find_column(headers, term) {
            Some(header) => {
                log::debug!("Resolved field '{}' -> column '{}'", field, header);
                resolution.mapping.insert(field, header);
            }
            None => {
                log::debug!("No column contains '{}' (field '{}')", term, field);
                resolution.unresolved.push(field.to_string());
            }
        }
    }

    resolution
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_match_wins() {
        let headers = HeaderSet::from(vec!["Foo Bar", "Bar Foo"]);
        assert_eq!(find_column(&headers, "bar"), Some("Foo Bar"));

        let spec = FieldSpec::new().with("x", "bar");
        let mapping = resolve_with_report(&headers, &spec).mapping;
        assert_eq!(mapping.get("x"), Some("Foo Bar"));
    }

    #[test]
    fn test_case_insensitive_substring() {
        let headers = HeaderSet::from(vec![
            "id",
            "Antragstitel [Kurz]",
            "Beantragter Betrag (in €)",
            "GENAUE BEGRÜNDUNG des Antrags",
        ]);
        let spec = FieldSpec::new()
            .with("kurzbezeichnung", "antragstitel")
            .with("bewilligter_betrag", "Beantragter Betrag")
            .with("beschreibung_massnahme", "Genaue Begründung");

        let mapping = resolve_with_report(&headers, &spec).mapping;
        assert_eq!(mapping.get("kurzbezeichnung"), Some("Antragstitel [Kurz]"));
        assert_eq!(mapping.get("bewilligter_betrag"), Some("Beantragter Betrag (in €)"));
        assert_eq!(
            mapping.get("beschreibung_massnahme"),
            Some("GENAUE BEGRÜNDUNG des Antrags")
        );
    }

    #[test]
    fn test_unresolved_fields_are_omitted_and_reported() {
        let headers = HeaderSet::from(vec!["Antragstitel", "Datum Abgeschickt"]);
        let spec = FieldSpec::new()
            .with("kurzbezeichnung", "Antragstitel")
            .with("laufzeit", "In welchem Semester")
            .with("leistungspunkte", "Leistugspunkte");

        let resolution = resolve_with_report(&headers, &spec);
        assert_eq!(resolution.mapping.len(), 1);
        assert!(!resolution.mapping.contains("laufzeit"));
        assert_eq!(resolution.unresolved, vec!["laufzeit", "leistungspunkte"]);
    }

    #[test]
    fn test_mapping_values_come_from_headers() {
        let headers = HeaderSet::from(vec!["Titel", "Betrag", "Titel (alt)"]);
        let spec = FieldSpec::new().with("a", "titel").with("b", "betrag");

        let mapping = resolve_with_report(&headers, &spec).mapping;
        for (field, header) in mapping.iter() {
            assert!(spec.get(field).is_some());
            assert!(headers.iter().any(|h| h == header));
        }
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let headers = HeaderSet::from(vec!["B x", "A x", "C x"]);
        let spec = FieldSpec::new().with("one", "x").with("two", "a");

        let first = resolve_with_report(&headers, &spec);
        let second = resolve_with_report(&headers, &spec);
        assert_eq!(first, second);
        assert_eq!(first.mapping.get("one"), Some("B x"));
    }

    #[test]
    fn test_empty_headers() {
        let headers = HeaderSet::default();
        let spec = FieldSpec::new().with("a", "a");
        let resolution = resolve_with_report(&headers, &spec);
        assert!(resolution.mapping.is_empty());
        assert_eq!(resolution.unresolved, vec!["a"]);
    }
}
