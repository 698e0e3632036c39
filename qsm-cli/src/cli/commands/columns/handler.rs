//! Column resolution report

use anyhow::Result;
use colored::*;

use super::ColumnsCommands;
use crate::config::MappingConfig;
use crate::dataset::{LoadOptions, filter_submitted, load_dataset};
use crate::services::mapping::resolve_with_report;

/// Print how every configured field resolves against the export's headers
pub fn handle_columns_command(args: ColumnsCommands, config: &MappingConfig) -> Result<()> {
    if !args.delimiter.is_ascii() {
        anyhow::bail!("Delimiter must be a single ASCII character, got '{}'", args.delimiter);
    }

    let dataset = load_dataset(
        &args.input,
        LoadOptions {
            delimiter: args.delimiter as u8,
        },
    )?;

    if dataset.headers.is_empty() {
        println!("{}", "Export has no header row".yellow());
        return Ok(());
    }

    let outcome = filter_submitted(&dataset, &config.submission_date);
    match &outcome.date_column {
        Some(column) => println!(
            "Submission date column: {} ({} of {} rows submitted)",
            column.bright_green(),
            outcome.retained.len(),
            outcome.total
        ),
        None => println!(
            "Submission date column: {} (no header contains '{}'; none of {} rows counts as submitted)",
            "not found".red(),
            config.submission_date,
            outcome.total
        ),
    }
    println!();

    let resolution = resolve_with_report(&dataset.headers, &config.mapping.fields);

    for (field, term) in config.mapping.fields.iter() {
        let status = match (resolution.mapping.get(field), config.mapping.fixed.get(field)) {
            (_, Some(fixed)) => format!("fixed value \"{}\"", fixed).yellow(),
            (Some(header), None) => header.bright_green(),
            (None, None) => "unresolved".red(),
        };
        println!("{:<28} {}", field.bold(), status);
        println!("{:<28} search: {}", "", term.dimmed());
    }

    let fixed_only: Vec<(&str, &str)> = config
        .mapping
        .fixed
        .iter()
        .filter(|(field, _)| config.mapping.fields.get(field).is_none())
        .collect();
    if !fixed_only.is_empty() {
        println!();
        println!("{}", "Fixed values:".bold());
        for (field, value) in fixed_only {
            println!("  {:<26} \"{}\"", field, value);
        }
    }

    if let Some(combined) = &config.mapping.combined {
        println!();
        println!(
            "{} is split into {} and {}",
            combined.source.bold(),
            combined.name_field,
            combined.email_field
        );
    }

    Ok(())
}
