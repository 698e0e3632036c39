use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column names of one dataset load, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet(Vec<String>);

impl HeaderSet {
    pub fn new(headers: Vec<String>) -> Self {
        Self(headers)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

}

impl From<Vec<&str>> for HeaderSet {
    fn from(headers: Vec<&str>) -> Self {
        Self(headers.into_iter().map(String::from).collect())
    }
}

/// One dataset row: header -> cell, `None` being the null-like marker
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    cells: Vec<(String, Option<String>)>,
}

impl Record {
    /// Zip a row of cells with its headers. Missing trailing cells become null.
    pub fn from_row(headers: &HeaderSet, row: Vec<Option<String>>) -> Self {
        let mut row = row.into_iter();
        let cells = headers
            .iter()
            .map(|h| (h.to_string(), row.next().flatten()))
            .collect();
        Self { cells }
    }

    /// Raw cell for a header; `None` if the header is unknown or the cell is null
    pub fn value(&self, header: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(h, _)| h == header)
            .and_then(|(_, v)| v.as_deref())
    }
}

/// A logical field and the substring used to locate its column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchTerm {
    pub field: String,
    pub search: String,
}

/// Logical field name -> search term, in configured order.
///
/// Deserialized entries go through [`FieldSpec::insert`], so a field listed
/// twice keeps one entry with the later term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<SearchTerm>", into = "Vec<SearchTerm>")]
pub struct FieldSpec {
    entries: Vec<SearchTerm>,
}

impl FieldSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search term for a field, replacing any earlier term for it
    pub fn insert(&mut self, field: impl Into<String>, search: impl Into<String>) {
        let field = field.into();
        let search = search.into();
        match self.entries.iter_mut().find(|e| e.field == field) {
            Some(existing) => existing.search = search,
            None => self.entries.push(SearchTerm { field, search }),
        }
    }

    pub fn with(mut self, field: impl Into<String>, search: impl Into<String>) -> Self {
        self.insert(field, search);
        self
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.search.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|e| (e.field.as_str(), e.search.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<SearchTerm>> for FieldSpec {
    fn from(entries: Vec<SearchTerm>) -> Self {
        entries
            .into_iter()
            .fold(Self::new(), |spec, entry| spec.with(entry.field, entry.search))
    }
}

impl From<FieldSpec> for Vec<SearchTerm> {
    fn from(spec: FieldSpec) -> Self {
        spec.entries
    }
}

macro_rules! string_table {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(BTreeMap<String, String>);

        // Not every table needs every accessor
        #[allow(dead_code)]
        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
                self.0.insert(field.into(), value.into());
            }

            pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
                self.insert(field, value);
                self
            }

            pub fn get(&self, field: &str) -> Option<&str> {
                self.0.get(field).map(String::as_str)
            }

            pub fn contains(&self, field: &str) -> bool {
                self.0.contains_key(field)
            }

            pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
                self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
            }

            pub fn keys(&self) -> impl Iterator<Item = &str> {
                self.0.keys().map(String::as_str)
            }

            pub fn len(&self) -> usize {
                self.0.len()
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }
    };
}

string_table!(
    /// Literal values that never come from the dataset. Always wins over columns.
    FixedValueTable
);

string_table!(
    /// Substitutes applied when a field ends up empty
    FieldDefaults
);

string_table!(
    /// Logical field name -> resolved header
    ColumnMapping
);

string_table!(
    /// Final field values for one row, ordered by field name
    FieldValues
);

/// A dataset column holding "name and/or email" free text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedField {
    /// Logical field whose value is split (never emitted itself)
    pub source: String,
    pub name_field: String,
    pub email_field: String,
}

/// Static rules driving the record mapper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingRules {
    pub fields: FieldSpec,
    pub fixed: FixedValueTable,
    pub defaults: FieldDefaults,
    pub combined: Option<CombinedField>,
}

impl Default for MappingRules {
    fn default() -> Self {
        Self {
            fields: FieldSpec::new()
                .with("kurzbezeichnung", "Antragstitel")
                .with("beschreibung_massnahme", "Genaue Begründung")
                // "Leistugspunkte" is how the survey spells it
                .with("leistungspunkte", "Anzahl der Leistugspunkte")
                .with(
                    "dozentischeAnsprechperson",
                    "Name der ausführenden Person (Person, die den Lehrauftrag durchführt)",
                )
                .with("bewilligter_betrag", "Beantragter Betrag")
                .with("laufzeit", "In welchem Semester werden die Mittel benötigt")
                .with("stan_name_email", "Name und Email-Adresse der Antragstellerin")
                .with("bdatum", "Datum Abgeschickt"),
            fixed: FixedValueTable::new()
                .with("bewirtschaftende_einrichtung", "Geographisches Institut")
                .with("budgetverantwortlicher", "Veronika Helm")
                .with("stan_telefon", "")
                .with("bdatum", "2025-12-03"),
            defaults: FieldDefaults::new().with("leistungspunkte", "keine"),
            combined: Some(CombinedField {
                source: "stan_name_email".to_string(),
                name_field: "stan_name".to_string(),
                email_field: "stan_email".to_string(),
            }),
        }
    }
}

impl MappingRules {
    /// Every field name the mapper emits, sorted
    pub fn output_fields(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .fields
            .iter()
            .map(|(field, _)| field)
            .chain(self.fixed.keys())
            .chain(self.defaults.keys())
            .map(String::from)
            .collect();

        if let Some(combined) = &self.combined {
            names.retain(|n| *n != combined.source);
            names.push(combined.name_field.clone());
            names.push(combined.email_field.clone());
        }

        names.sort();
        names.dedup();
        names
    }
}

/// Result of splitting a combined name/email string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NameEmailPair {
    pub name: String,
    pub email: String,
}

impl NameEmailPair {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_value_null_and_missing() {
        let headers = HeaderSet::from(vec!["a", "b", "c"]);
        let record = Record::from_row(&headers, vec![Some("1".to_string()), None]);

        assert_eq!(record.value("a"), Some("1"));
        assert_eq!(record.value("b"), None);
        assert_eq!(record.value("c"), None);
        assert_eq!(record.value("zzz"), None);
    }

    #[test]
    fn test_field_spec_insert_replaces() {
        let mut spec = FieldSpec::new().with("titel", "Antragstitel");
        spec.insert("titel", "Titel");
        assert_eq!(spec.len(), 1);
        assert_eq!(spec.get("titel"), Some("Titel"));
    }

    #[test]
    fn test_field_spec_deserialize_folds_duplicates() {
        let spec: FieldSpec = serde_json::from_str(
            r#"[
                {"field": "kurzbezeichnung", "search": "Antragstitel"},
                {"field": "laufzeit", "search": "Semester"},
                {"field": "kurzbezeichnung", "search": "gibt es nicht"}
            ]"#,
        )
        .unwrap();

        assert_eq!(spec.len(), 2);
        assert_eq!(spec.get("kurzbezeichnung"), Some("gibt es nicht"));
        let order: Vec<&str> = spec.iter().map(|(field, _)| field).collect();
        assert_eq!(order, vec!["kurzbezeichnung", "laufzeit"]);
    }

    #[test]
    fn test_output_fields_replace_combined_source() {
        let rules = MappingRules::default();
        let fields = rules.output_fields();

        assert!(!fields.contains(&"stan_name_email".to_string()));
        assert!(fields.contains(&"stan_name".to_string()));
        assert!(fields.contains(&"stan_email".to_string()));
        assert!(fields.contains(&"budgetverantwortlicher".to_string()));
        // bdatum is both a column and a fixed value; listed once
        assert_eq!(fields.iter().filter(|f| *f == "bdatum").count(), 1);
    }
}
