//! Fill command handler

use anyhow::{Context, Result};
use colored::*;
use std::fs::File;
use std::io::{self, BufWriter, Write};

use super::{FillCommands, OutputFormat};
use crate::config::MappingConfig;
use crate::dataset::{LoadOptions, load_dataset};
use crate::services::mapping::{MappingPipeline, Prepared};
use crate::submission::{ConsoleSink, CsvSink, JsonLinesSink, ReviewGate, SubmissionSink};

/// Load the export, map every submitted row and pass it to the output sink
pub fn handle_fill_command(args: FillCommands, config: &MappingConfig) -> Result<()> {
    if !args.delimiter.is_ascii() {
        anyhow::bail!("Delimiter must be a single ASCII character, got '{}'", args.delimiter);
    }

    let dataset = load_dataset(
        &args.input,
        LoadOptions {
            delimiter: args.delimiter as u8,
        },
    )?;

    let run = match MappingPipeline::new(config).prepare(&dataset) {
        Prepared::Empty { total } => {
            log::info!("{} rows loaded, none submitted", total);
            println!("{}", "No data to process!".yellow());
            return Ok(());
        }
        Prepared::Ready(run) => run,
    };

    log::info!(
        "Mapping {} submitted applications ({} rows in export, {} fields without a column)",
        run.len(),
        run.total(),
        run.resolution().unresolved.len()
    );

    let out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
            format!("Failed to create output file: {}", path.display())
        })?)),
        None => Box::new(io::stdout().lock()),
    };

    let mut sink: Box<dyn SubmissionSink> = match args.format {
        OutputFormat::Console => Box::new(ConsoleSink::new(
            out,
            config.title_field.as_str(),
            config.amount_field.as_str(),
        )),
        OutputFormat::Json => Box::new(JsonLinesSink::new(out)),
        OutputFormat::Csv => Box::new(CsvSink::new(out)),
    };

    if args.review {
        sink = Box::new(ReviewGate::interactive(sink));
    }

    let submitted = run.run(&mut sink)?;

    if let Some(path) = &args.output {
        eprintln!(
            "Wrote {} of {} submissions to {}",
            submitted,
            run.len(),
            path.display().to_string().bright_green()
        );
    }

    Ok(())
}
