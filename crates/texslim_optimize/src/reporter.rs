use std::{
    io::{self, Write},
    path::Path,
};

use colored::Colorize;
use log::debug;
use texslim_core::BYTES_PER_MEGABYTE;

use texslim_images::ImageAction;

use crate::types::{DeletionOutcome, FileAction, FileRecord, RunReport, UnusedReport};

/// Shows `path` relative to the project root when it lives under it
fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).to_string_lossy().to_string()
}

fn megabytes(bytes: i64) -> f64 {
    bytes as f64 / BYTES_PER_MEGABYTE
}

fn describe(action: &FileAction) -> String {
    match action {
        FileAction::SkippedFiletype => "skipped (filetype)".dimmed().to_string(),
        FileAction::SkippedIgnoredFile => "skipped (ignored file)".dimmed().to_string(),
        FileAction::SkippedUnknown => "skipped (unknown type)".dimmed().to_string(),
        FileAction::Image(outcome) => {
            let what = match outcome.action {
                ImageAction::Untouched => "image untouched".to_string(),
                ImageAction::Recompressed => "image recompressed".to_string(),
                ImageAction::Resized { from, to } => {
                    format!("image resized {}x{} -> {}x{}", from.0, from.1, to.0, to.1)
                }
            };
            format!("{}, {} bytes saved", what, outcome.saved().to_string().green())
        }
        FileAction::TextCleaned { lines_changed } => {
            format!("comments stripped, {} lines changed", lines_changed.to_string().cyan())
        }
        FileAction::TextUnchanged => "comments kept".to_string(),
    }
}

fn print_record<W: Write>(writer: &mut W, root: &Path, record: &FileRecord) -> io::Result<()> {
    let marker = if record.special_case { " [special case]".magenta().to_string() } else { String::new() };
    writeln!(
        writer,
        "  {}: {}{}",
        display_path(root, &record.path).blue(),
        describe(&record.action),
        marker
    )
}

/// Lists what happened to every file and which files look unused, then the run totals.
pub fn print_summary<W: Write>(
    writer: &mut W,
    root: &Path,
    report: &RunReport,
    unused: &UnusedReport,
) -> io::Result<()> {
    debug!("Printing summary for {} files", report.files.len());

    writeln!(writer, "{}", "Processed files".bold())?;
    for record in &report.records {
        print_record(writer, root, record)?;
    }

    writeln!(writer, "\n{}", "Checking for unused files".bold())?;
    for path in &unused.unused_files {
        let shown = display_path(root, path);
        if unused.unused_images.contains(path) {
            writeln!(writer, "  {}", shown.yellow())?;
        } else {
            writeln!(writer, "  {}", shown)?;
        }
    }

    writeln!(writer, "{}", "─".repeat(60).dimmed())?;
    writeln!(writer, "{}", "Done.".bold())?;
    writeln!(
        writer,
        "  Processed: {} images, {} tex files, {} skipped",
        report.images_processed().to_string().cyan(),
        report.text_files_processed().to_string().cyan(),
        report.files_skipped().to_string().cyan()
    )?;
    writeln!(
        writer,
        "  {} potentially unused files ({} removable images).",
        unused.unused_files.len().to_string().yellow().bold(),
        unused.unused_images.len().to_string().yellow()
    )?;
    writeln!(
        writer,
        "  {} Mb saved by optimising images.",
        megabytes(report.bytes_saved).to_string().green().bold()
    )?;

    writer.flush()?;
    Ok(())
}

pub fn print_deletion_result<W: Write>(
    writer: &mut W,
    root: &Path,
    outcome: &DeletionOutcome,
) -> io::Result<()> {
    if !outcome.confirmed {
        return Ok(());
    }
    for path in &outcome.deleted {
        writeln!(writer, "  {} {}", "removed".red(), display_path(root, path))?;
    }
    writeln!(writer, "{} Removed {} files.", "✓".green().bold(), outcome.deleted.len())?;
    writer.flush()?;
    Ok(())
}
