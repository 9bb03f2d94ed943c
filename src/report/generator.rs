//! Report generation.
//!
//! This module renders an [`AnalysisReport`] as plain text, Markdown,
//! JSON or CSV.

use crate::cli::OutputFormat;
use crate::models::{AnalysisReport, BillLengthRow, BodyMassRow, ReportMetadata};
use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::io::Write;
use std::path::Path;

/// Render the report in the requested format.
pub fn render_report(report: &AnalysisReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(generate_text_report(report)),
        OutputFormat::Markdown => Ok(generate_markdown_report(report)),
        OutputFormat::Json => generate_json_report(report),
        OutputFormat::Csv => generate_csv_report(report),
    }
}

/// Generate the console report: one result record per line.
pub fn generate_text_report(report: &AnalysisReport) -> String {
    let mut output = String::new();

    output.push_str("Average bill length results:\n");
    for row in &report.bill_lengths {
        output.push_str(&format!(
            "{{'Species': '{}', 'Island': '{}', 'Average_bill_length_mm': {:.2}}}\n",
            row.species, row.island, row.average_bill_length_mm
        ));
    }

    output.push_str(
        "\nPercentage of penguins above their species average body mass results:\n",
    );
    for row in &report.body_mass {
        output.push_str(&format!(
            "{{'Species': '{}', 'Sex': '{}', '%_above_avg_bodymass': {:.2}}}\n",
            row.species, row.sex, row.pct_above_avg_body_mass
        ));
    }

    output
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &AnalysisReport) -> String {
    let mut output = String::new();

    output.push_str("# Penguin Stats Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_bill_length_section(&report.bill_lengths));
    output.push_str(&generate_body_mass_section(&report.body_mass));

    output
}

fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** `{}`\n", metadata.source));
    section.push_str(&format!(
        "- **Analysis Date:** {}\n",
        metadata.analysis_date.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Records Loaded:** {}\n",
        metadata.records_loaded
    ));
    section.push_str(&format!("- **Species:** {}\n", metadata.species_count));
    section.push_str(&format!(
        "- **Analysis Duration:** {:.3}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

fn generate_bill_length_section(rows: &[BillLengthRow]) -> String {
    let mut section = String::new();

    section.push_str("## Average Bill Length\n\n");

    if rows.is_empty() {
        section.push_str("No records with a valid bill length.\n\n");
        return section;
    }

    section.push_str("| Species | Island | Average bill length (mm) |\n");
    section.push_str("|:---|:---|---:|\n");
    for row in rows {
        section.push_str(&format!(
            "| {} | {} | {:.2} |\n",
            row.species, row.island, row.average_bill_length_mm
        ));
    }
    section.push('\n');

    section
}

fn generate_body_mass_section(rows: &[BodyMassRow]) -> String {
    let mut section = String::new();

    section.push_str("## Body Mass Above Species Average\n\n");

    if rows.is_empty() {
        section.push_str("No records with a valid body mass.\n\n");
        return section;
    }

    section.push_str("| Species | Sex | % above average |\n");
    section.push_str("|:---|:---|---:|\n");
    for row in rows {
        section.push_str(&format!(
            "| {} | {} | {:.2} |\n",
            row.species, row.sex, row.pct_above_avg_body_mass
        ));
    }
    section.push('\n');

    section
}

/// Generate a JSON report.
pub fn generate_json_report(report: &AnalysisReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Generate both result tables as CSV, separated by a blank line.
pub fn generate_csv_report(report: &AnalysisReport) -> Result<String> {
    let bills = write_csv_section(
        ["Species", "Island", "Average_bill_length_mm"],
        report.bill_lengths.iter().map(|row| {
            [
                row.species.clone(),
                row.island.clone(),
                format!("{:.2}", row.average_bill_length_mm),
            ]
        }),
    )?;

    let masses = write_csv_section(
        ["Species", "Sex", "%_above_avg_bodymass"],
        report.body_mass.iter().map(|row| {
            [
                row.species.clone(),
                row.sex.clone(),
                format!("{:.2}", row.pct_above_avg_body_mass),
            ]
        }),
    )?;

    Ok(format!("{}\n{}", bills, masses))
}

fn write_csv_section<const N: usize>(
    header: [&str; N],
    rows: impl Iterator<Item = [String; N]>,
) -> Result<String> {
    let mut wtr = WriterBuilder::new().from_writer(Vec::new());

    wtr.write_record(header)?;
    for row in rows {
        wtr.write_record(&row)?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

/// Write rendered report content to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    Ok(())
}
