//! Filter → resolve → map over one loaded export

use anyhow::Result;

use super::record::RecordMapper;
use super::resolver::{Resolution, resolve_with_report};
use crate::config::MappingConfig;
use crate::dataset::{Dataset, filter_submitted};
use crate::services::mapping::Record;
use crate::submission::{Flow, FormSubmission, SubmissionSink};

/// Result of preparing a dataset for mapping
#[derive(Debug)]
pub enum Prepared<'c, 'd> {
    /// No submitted records remain after filtering
    Empty { total: usize },
    Ready(MappingRun<'c, 'd>),
}

/// Submitted records of one export plus their column mapping
#[derive(Debug)]
pub struct MappingRun<'c, 'd> {
    config: &'c MappingConfig,
    records: Vec<(usize, &'d Record)>,
    resolution: Resolution,
    total: usize,
}

/// Drives the mapping of an export
pub struct MappingPipeline<'c> {
    config: &'c MappingConfig,
}

impl<'c> MappingPipeline<'c> {
    pub fn new(config: &'c MappingConfig) -> Self {
        Self { config }
    }

    /// Filter the dataset and resolve its columns once
    pub fn prepare<'d>(&self, dataset: &'d Dataset) -> Prepared<'c, 'd> {
        let outcome = filter_submitted(dataset, &self.config.submission_date);
        if outcome.is_empty() {
            log::warn!("No submitted applications among {} rows", outcome.total);
            return Prepared::Empty {
                total: outcome.total,
            };
        }

        let fields = &self.config.mapping.fields;
        if fields.is_empty() {
            log::warn!("No search terms configured; only fixed values and defaults will be filled");
        }

        let resolution = resolve_with_report(&dataset.headers, fields);
        log::debug!(
            "Resolved {} of {} fields against {} columns",
            resolution.mapping.len(),
            fields.len(),
            dataset.headers.len()
        );
        for field in &resolution.unresolved {
            if !self.config.mapping.fixed.contains(field) {
                log::warn!(
                    "No column found for field '{}' (search term '{}'); it will be empty",
                    field,
                    fields.get(field).unwrap_or_default()
                );
            }
        }

        Prepared::Ready(MappingRun {
            config: self.config,
            records: outcome.retained,
            resolution,
            total: outcome.total,
        })
    }
}

impl<'c, 'd> MappingRun<'c, 'd> {
    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    /// Records that will be submitted
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Records in the export before filtering
    pub fn total(&self) -> usize {
        self.total
    }

    /// Map the submitted records lazily, in dataset order
    pub fn submissions(&self) -> impl Iterator<Item = FormSubmission> + '_ {
        let mapper = RecordMapper::new(&self.config.mapping, &self.resolution.mapping);
        self.records.iter().map(move |(row, record)| FormSubmission {
            row: *row,
            fields: mapper.map_record(record),
            selections: self.config.selections.clone(),
        })
    }

    /// Feed every submission to the sink until it asks to stop.
    /// Returns how many submissions the sink received.
    pub fn run<S: SubmissionSink>(&self, sink: &mut S) -> Result<usize> {
        let total = self.len();
        let mut submitted = 0;

        for (index, submission) in self.submissions().enumerate() {
            log::debug!("Submitting export row {}", submission.row + 1);
            submitted += 1;
            if sink.submit(&submission, index, total)? == Flow::Stop {
                break;
            }
        }

        sink.finish(submitted)?;
        Ok(submitted)
    }
}
