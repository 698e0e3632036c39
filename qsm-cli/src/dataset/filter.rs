//! Keeps only applications that were actually submitted
//!
//! The survey tool exports unfinished responses too; those have no value in
//! the submission date column.

use super::Dataset;
use crate::services::mapping::{Record, find_column};

/// Records that passed the submission-date check
#[derive(Debug, Clone)]
pub struct FilterOutcome<'d> {
    /// (position in the dataset, record), in dataset order
    pub retained: Vec<(usize, &'d Record)>,
    /// Records before filtering
    pub total: usize,
    /// Header the date check ran against, if one matched
    pub date_column: Option<String>,
}

impl FilterOutcome<'_> {
    pub fn dropped(&self) -> usize {
        self.total - self.retained.len()
    }

    pub fn is_empty(&self) -> bool {
        self.retained.is_empty()
    }
}

/// Drop records whose submission date is null or blank.
///
/// When no header contains `date_search_term` no record can show a submission
/// date, so nothing is retained.
pub fn filter_submitted<'d>(dataset: &'d Dataset, date_search_term: &str) -> FilterOutcome<'d> {
    let total = dataset.records.len();

    let Some(date_column) = find_column(&dataset.headers, date_search_term) else {
        log::warn!(
            "No column matches '{}'; none of the {} records counts as submitted",
            date_search_term,
            total
        );
        return FilterOutcome {
            retained: Vec::new(),
            total,
            date_column: None,
        };
    };

    let retained: Vec<(usize, &Record)> = dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, record)| {
            record
                .value(date_column)
                .is_some_and(|date| !date.trim().is_empty())
        })
        .collect();

    let outcome = FilterOutcome {
        retained,
        total,
        date_column: Some(date_column.to_string()),
    };

    log::info!(
        "Filtered on '{}': {} of {} records submitted, {} dropped",
        date_column,
        outcome.retained.len(),
        total,
        outcome.dropped()
    );

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mapping::HeaderSet;

    fn dataset(dates: &[Option<&str>]) -> Dataset {
        let headers = HeaderSet::from(vec!["id", "Antragstitel", "Datum Abgeschickt [submitdate]"]);
        let rows = dates
            .iter()
            .enumerate()
            .map(|(i, date)| {
                vec![
                    Some(i.to_string()),
                    Some(format!("Antrag {}", i + 1)),
                    date.map(String::from),
                ]
            })
            .collect();
        Dataset::new(headers, rows)
    }

    #[test]
    fn test_blank_date_is_dropped_and_order_kept() {
        let data = dataset(&[Some("2025-11-01"), Some("   "), Some("2025-11-03")]);
        let outcome = filter_submitted(&data, "datum abgeschickt");

        let positions: Vec<usize> = outcome.retained.iter().map(|(i, _)| *i).collect();
        assert_eq!(positions, vec![0, 2]);
        assert_eq!(outcome.total, 3);
        assert_eq!(outcome.dropped(), 1);
        assert_eq!(
            outcome.date_column.as_deref(),
            Some("Datum Abgeschickt [submitdate]")
        );
        assert_eq!(outcome.retained[1].1.value("Antragstitel"), Some("Antrag 3"));
    }

    #[test]
    fn test_null_date_is_dropped() {
        let data = dataset(&[None, Some("2025-11-02")]);
        let outcome = filter_submitted(&data, "Datum Abgeschickt");
        assert_eq!(outcome.retained.len(), 1);
        assert_eq!(outcome.retained[0].0, 1);
    }

    #[test]
    fn test_all_dropped_is_empty() {
        let data = dataset(&[None, Some(""), Some("\t")]);
        let outcome = filter_submitted(&data, "Datum Abgeschickt");
        assert!(outcome.is_empty());
        assert_eq!(outcome.dropped(), 3);
    }

    #[test]
    fn test_missing_date_column_retains_nothing() {
        let data = dataset(&[Some("2025-11-01"), None]);
        let outcome = filter_submitted(&data, "Submission date");
        assert!(outcome.is_empty());
        assert_eq!(outcome.total, 2);
        assert_eq!(outcome.dropped(), 2);
        assert!(outcome.date_column.is_none());
    }

    #[test]
    fn test_export_without_date_header_keeps_drafts_out() {
        let headers = HeaderSet::from(vec!["id", "Antragstitel"]);
        let data = Dataset::new(
            headers,
            vec![vec![Some("1".to_string()), Some("Entwurf".to_string())]],
        );
        let outcome = filter_submitted(&data, "Datum Abgeschickt");
        assert_eq!(outcome.retained.len(), 0);
    }
}
