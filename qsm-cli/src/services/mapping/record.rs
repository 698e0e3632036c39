//! Per-row field derivation
//!
//! Lookup order for every field: fixed value, then resolved column, then
//! empty. The combined name/email column is split into its own two fields and
//! defaults fill whatever is still empty at the end.

use super::models::{ColumnMapping, FieldValues, MappingRules, Record};
use super::splitter::NameEmailSplitter;

/// Maps raw records to form field values using fixed rules and one column mapping
#[derive(Debug, Clone)]
pub struct RecordMapper<'a> {
    rules: &'a MappingRules,
    columns: &'a ColumnMapping,
    splitter: NameEmailSplitter,
    fields: Vec<String>,
}

impl<'a> RecordMapper<'a> {
    pub fn new(rules: &'a MappingRules, columns: &'a ColumnMapping) -> Self {
        Self::with_splitter(rules, columns, NameEmailSplitter::new())
    }

    pub fn with_splitter(
        rules: &'a MappingRules,
        columns: &'a ColumnMapping,
        splitter: NameEmailSplitter,
    ) -> Self {
        Self {
            rules,
            columns,
            splitter,
            fields: rules.output_fields(),
        }
    }

    /// Generic lookup: fixed value, else trimmed cell, else empty
    pub fn lookup(&self, record: &Record, field: &str) -> String {
        if let Some(fixed) = self.rules.fixed.get(field) {
            return fixed.to_string();
        }

        self.columns
            .get(field)
            .and_then(|header| record.value(header))
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }

    pub fn map_record(&self, record: &Record) -> FieldValues {
        let mut values = FieldValues::new();

        for field in &self.fields {
            values.insert(field.as_str(), self.lookup(record, field));
        }

        if let Some(combined) = &self.rules.combined {
            let raw = self.lookup(record, &combined.source);
            let pair = self.splitter.split(Some(&raw));

            // A fixed value for either half still beats the parsed one
            if !self.rules.fixed.contains(&combined.name_field) {
                values.insert(combined.name_field.as_str(), pair.name);
            }
            if !self.rules.fixed.contains(&combined.email_field) {
                values.insert(combined.email_field.as_str(), pair.email);
            }
        }

        for (field, default) in self.rules.defaults.iter() {
            if values.get(field).is_none_or(str::is_empty) {
                values.insert(field, default);
            }
        }

        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mapping::models::{
        CombinedField, FieldDefaults, FieldSpec, FixedValueTable, HeaderSet,
    };
    use crate::services::mapping::resolver::resolve_with_report;

    fn headers() -> HeaderSet {
        HeaderSet::from(vec![
            "Antragstitel",
            "Anzahl der Leistugspunkte",
            "Name und Email-Adresse der Antragstellerin",
            "Beantragter Betrag",
            "Datum Abgeschickt",
        ])
    }

    fn row(cells: [Option<&str>; 5]) -> Record {
        Record::from_row(
            &headers(),
            cells.iter().map(|c| c.map(String::from)).collect(),
        )
    }

    #[test]
    fn test_lookup_trims_and_normalizes_null() {
        let rules = MappingRules::default();
        let columns = resolve_with_report(&headers(), &rules.fields).mapping;
        let mapper = RecordMapper::new(&rules, &columns);

        let record = row([Some("  Exkursion  "), None, None, Some("500"), None]);
        let values = mapper.map_record(&record);

        assert_eq!(values.get("kurzbezeichnung"), Some("Exkursion"));
        assert_eq!(values.get("bewilligter_betrag"), Some("500"));
        // no column for laufzeit in this export
        assert_eq!(values.get("laufzeit"), Some(""));
        assert_eq!(values.get("beschreibung_massnahme"), Some(""));
    }

    #[test]
    fn test_leistungspunkte_defaults_to_keine() {
        let rules = MappingRules::default();
        let columns = resolve_with_report(&headers(), &rules.fields).mapping;
        let mapper = RecordMapper::new(&rules, &columns);

        let missing = mapper.map_record(&row([Some("T"), None, None, None, None]));
        assert_eq!(missing.get("leistungspunkte"), Some("keine"));

        let blank = mapper.map_record(&row([Some("T"), Some("   "), None, None, None]));
        assert_eq!(blank.get("leistungspunkte"), Some("keine"));

        let given = mapper.map_record(&row([Some("T"), Some("6"), None, None, None]));
        assert_eq!(given.get("leistungspunkte"), Some("6"));
    }

    #[test]
    fn test_leistungspunkte_default_without_column() {
        let rules = MappingRules::default();
        let columns = ColumnMapping::new();
        let mapper = RecordMapper::new(&rules, &columns);

        let values = mapper.map_record(&Record::default());
        assert_eq!(values.get("leistungspunkte"), Some("keine"));
    }

    #[test]
    fn test_fixed_values_override_columns() {
        let rules = MappingRules::default();
        let columns = resolve_with_report(&headers(), &rules.fields).mapping;
        assert_eq!(columns.get("bdatum"), Some("Datum Abgeschickt"));
        let mapper = RecordMapper::new(&rules, &columns);

        for date in ["2025-11-01 10:00:00", "2025-11-02 12:30:00"] {
            let values = mapper.map_record(&row([Some("T"), None, None, None, Some(date)]));
            assert_eq!(values.get("bdatum"), Some("2025-12-03"));
            assert_eq!(
                values.get("bewirtschaftende_einrichtung"),
                Some("Geographisches Institut")
            );
            assert_eq!(values.get("stan_telefon"), Some(""));
        }
    }

    #[test]
    fn test_combined_field_is_split() {
        let rules = MappingRules::default();
        let columns = resolve_with_report(&headers(), &rules.fields).mapping;
        let mapper = RecordMapper::new(&rules, &columns);

        let values = mapper.map_record(&row([
            None,
            None,
            Some(" Jane Doe, jane@example.com "),
            None,
            None,
        ]));
        assert_eq!(values.get("stan_name"), Some("Jane Doe"));
        assert_eq!(values.get("stan_email"), Some("jane@example.com"));
        assert!(!values.contains("stan_name_email"));

        let empty = mapper.map_record(&row([None, None, None, None, None]));
        assert_eq!(empty.get("stan_name"), Some(""));
        assert_eq!(empty.get("stan_email"), Some(""));
    }

    #[test]
    fn test_fixed_value_beats_split_result() {
        let rules = MappingRules {
            fixed: FixedValueTable::new().with("stan_email", "fachschaft@example.org"),
            ..MappingRules::default()
        };
        let columns = resolve_with_report(&headers(), &rules.fields).mapping;
        let mapper = RecordMapper::new(&rules, &columns);

        let values = mapper.map_record(&row([
            None,
            None,
            Some("Jane jane@example.com"),
            None,
            None,
        ]));
        assert_eq!(values.get("stan_name"), Some("Jane"));
        assert_eq!(values.get("stan_email"), Some("fachschaft@example.org"));
    }

    #[test]
    fn test_every_output_field_present() {
        let rules = MappingRules {
            fields: FieldSpec::new().with("a", "x").with("src", "y"),
            fixed: FixedValueTable::new().with("b", "fixed"),
            defaults: FieldDefaults::new().with("c", "dflt"),
            combined: Some(CombinedField {
                source: "src".to_string(),
                name_field: "n".to_string(),
                email_field: "e".to_string(),
            }),
        };
        let columns = ColumnMapping::new();
        let mapper = RecordMapper::new(&rules, &columns);

        let values = mapper.map_record(&Record::default());
        let keys: Vec<&str> = values.keys().collect();
        assert_eq!(keys, vec!["a", "b", "c", "e", "n"]);
        assert_eq!(values.get("c"), Some("dflt"));
        assert_eq!(rules.output_fields().len(), 5);
    }

    #[test]
    fn test_mapping_is_idempotent() {
        let rules = MappingRules::default();
        let columns = resolve_with_report(&headers(), &rules.fields).mapping;
        let mapper = RecordMapper::new(&rules, &columns);
        let record = row([
            Some("Titel"),
            Some("3"),
            Some("Jane Doe jane@example.com"),
            Some("120,50"),
            Some("2025-11-01"),
        ]);

        let first = serde_json::to_string(&mapper.map_record(&record)).unwrap();
        let second = serde_json::to_string(&mapper.map_record(&record)).unwrap();
        assert_eq!(first, second);
    }
}
