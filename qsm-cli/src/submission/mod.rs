//! Hand-off to the form
//!
//! A [`FormSubmission`] is everything needed to fill the form for one
//! application. Sinks decide what happens with it; none of them talk to the
//! form itself, they render the payload for whoever (or whatever) submits it.

mod sink;

pub use sink::{ConsoleSink, CsvSink, JsonLinesSink, ReviewGate};

use anyhow::Result;
use serde::Serialize;

use crate::config::FormSelections;
use crate::services::mapping::FieldValues;

/// Mapped values plus the fixed selections for one row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSubmission {
    /// 0-based position of the row in the loaded export
    pub row: usize,
    pub fields: FieldValues,
    pub selections: FormSelections,
}

/// What a sink wants the run to do after a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Receives submissions one at a time, in dataset order
pub trait SubmissionSink {
    /// `index` is 0-based among the rows being submitted, `total` their count
    fn submit(&mut self, submission: &FormSubmission, index: usize, total: usize) -> Result<Flow>;

    fn finish(&mut self, _submitted: usize) -> Result<()> {
        Ok(())
    }
}

impl<S: SubmissionSink + ?Sized> SubmissionSink for Box<S> {
    fn submit(&mut self, submission: &FormSubmission, index: usize, total: usize) -> Result<Flow> {
        (**self).submit(submission, index, total)
    }

    fn finish(&mut self, submitted: usize) -> Result<()> {
        (**self).finish(submitted)
    }
}
