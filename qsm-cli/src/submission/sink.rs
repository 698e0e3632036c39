//! Submission sinks: console summary, JSON lines, CSV and the review gate

use anyhow::{Context, Result};
use colored::*;
use std::io::Write;
use unicode_width::UnicodeWidthChar;

use super::{FormSubmission, Flow, SubmissionSink};
use crate::config::FormSelections;

const TITLE_WIDTH: usize = 60;
const SELECTION_COLUMNS: [&str; 5] = [
    "stufe",
    "deckungsfaehigkeit_mittel",
    "studienfachschaft",
    "an_qsmkommission",
    "gotcha",
];

fn selection_values(selections: &FormSelections) -> [String; 5] {
    [
        selections.stufe.clone(),
        selections.deckungsfaehigkeit_mittel.clone(),
        selections.studienfachschaft.clone(),
        selections.an_qsmkommission.to_string(),
        selections.gotcha.clone(),
    ]
}

/// Cut `text` to at most `width` display columns
fn truncate_to_width(text: &str, width: usize) -> &str {
    let mut used = 0;
    for (i, ch) in text.char_indices() {
        used += ch.width().unwrap_or(0);
        if used > width {
            return &text[..i];
        }
    }
    text
}

/// Human readable progress output, one block per row
pub struct ConsoleSink<W: Write> {
    out: W,
    title_field: String,
    amount_field: String,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W, title_field: impl Into<String>, amount_field: impl Into<String>) -> Self {
        Self {
            out,
            title_field: title_field.into(),
            amount_field: amount_field.into(),
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SubmissionSink for ConsoleSink<W> {
    fn submit(&mut self, submission: &FormSubmission, index: usize, total: usize) -> Result<Flow> {
        let rule = "=".repeat(70);
        let fields = &submission.fields;

        writeln!(self.out)?;
        writeln!(self.out, "{}", rule.dimmed())?;
        writeln!(
            self.out,
            "{} (export row {})",
            format!("Processing row {}/{}", index + 1, total).bold(),
            submission.row + 1
        )?;
        writeln!(self.out, "{}", rule.dimmed())?;

        let title = fields.get(&self.title_field).unwrap_or_default();
        let title = if title.is_empty() {
            "LEER".to_string()
        } else {
            truncate_to_width(title, TITLE_WIDTH).to_string()
        };
        let amount = fields.get(&self.amount_field).unwrap_or_default();
        writeln!(self.out, "\n{} | {} EUR", title.bright_green(), amount)?;
        writeln!(self.out)?;

        for (field, value) in fields.iter() {
            writeln!(self.out, "  {:<30} {}", field.cyan(), value)?;
        }
        for (column, value) in SELECTION_COLUMNS
            .iter()
            .zip(selection_values(&submission.selections))
        {
            writeln!(self.out, "  {:<30} {}", column.cyan(), value)?;
        }

        Ok(Flow::Continue)
    }

    fn finish(&mut self, submitted: usize) -> Result<()> {
        writeln!(self.out, "\nFinished all {} rows!", submitted)?;
        self.out.flush()?;
        Ok(())
    }
}

/// One JSON object per line
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> SubmissionSink for JsonLinesSink<W> {
    fn submit(&mut self, submission: &FormSubmission, _index: usize, _total: usize) -> Result<Flow> {
        serde_json::to_writer(&mut self.out, submission)
            .context("Failed to write JSON submission")?;
        writeln!(self.out)?;
        Ok(Flow::Continue)
    }

    fn finish(&mut self, _submitted: usize) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// CSV table: row, every field, then the selections
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    columns: Option<Vec<String>>,
}

impl<W: Write> CsvSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(out),
            columns: None,
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e.error()))
    }
}

impl<W: Write> SubmissionSink for CsvSink<W> {
    fn submit(&mut self, submission: &FormSubmission, _index: usize, _total: usize) -> Result<Flow> {
        // Header comes from the first submission; every row has the same fields
        if self.columns.is_none() {
            let columns: Vec<String> = submission.fields.keys().map(String::from).collect();
            let mut header = vec!["row".to_string()];
            header.extend(columns.iter().cloned());
            header.extend(SELECTION_COLUMNS.iter().map(|c| c.to_string()));
            self.writer
                .write_record(&header)
                .context("Failed to write CSV header")?;
            self.columns = Some(columns);
        }
        let columns = self.columns.as_deref().unwrap_or_default();

        let mut record = vec![(submission.row + 1).to_string()];
        record.extend(
            columns
                .iter()
                .map(|c| submission.fields.get(c).unwrap_or_default().to_string()),
        );
        record.extend(selection_values(&submission.selections));

        self.writer
            .write_record(&record)
            .context("Failed to write CSV row")?;
        Ok(Flow::Continue)
    }

    fn finish(&mut self, _submitted: usize) -> Result<()> {
        self.writer.flush().context("Failed to flush CSV output")?;
        Ok(())
    }
}

/// Pauses after every row so the filled form can be checked by hand
pub struct ReviewGate<S, F> {
    inner: S,
    confirm: F,
}

impl<S: SubmissionSink> ReviewGate<S, fn(usize, usize) -> Result<bool>> {
    /// Ask on the terminal whether to go on
    pub fn interactive(inner: S) -> Self {
        Self::with_prompt(inner, confirm_on_terminal)
    }
}

impl<S, F> ReviewGate<S, F>
where
    S: SubmissionSink,
    F: FnMut(usize, usize) -> Result<bool>,
{
    pub fn with_prompt(inner: S, confirm: F) -> Self {
        Self { inner, confirm }
    }
}

fn confirm_on_terminal(index: usize, total: usize) -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(format!(
            "Row {}/{} ready - review it, then continue with the next row?",
            index + 1,
            total
        ))
        .default(true)
        .interact()
        .context("Review prompt failed")
}

impl<S, F> SubmissionSink for ReviewGate<S, F>
where
    S: SubmissionSink,
    F: FnMut(usize, usize) -> Result<bool>,
{
    fn submit(&mut self, submission: &FormSubmission, index: usize, total: usize) -> Result<Flow> {
        if self.inner.submit(submission, index, total)? == Flow::Stop {
            return Ok(Flow::Stop);
        }

        // Nothing left to review after the last row
        if index + 1 >= total {
            return Ok(Flow::Continue);
        }

        if (self.confirm)(index, total)? {
            Ok(Flow::Continue)
        } else {
            log::info!("Stopped by reviewer after row {}/{}", index + 1, total);
            Ok(Flow::Stop)
        }
    }

    fn finish(&mut self, submitted: usize) -> Result<()> {
        self.inner.finish(submitted)
    }
}
