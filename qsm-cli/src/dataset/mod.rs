//! Survey export datasets
//!
//! A dataset is one loaded export: its headers plus every row in file order.
//! Loading lives in [`loader`], the "was this application submitted" filter in
//! [`filter`].

pub mod filter;
pub mod loader;

pub use filter::filter_submitted;
pub use loader::{LoadOptions, load_dataset};

use crate::services::mapping::{HeaderSet, Record};

/// Headers and records of one export
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub headers: HeaderSet,
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn new(headers: HeaderSet, rows: Vec<Vec<Option<String>>>) -> Self {
        let records = rows
            .into_iter()
            .map(|row| Record::from_row(&headers, row))
            .collect();
        Self { headers, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
