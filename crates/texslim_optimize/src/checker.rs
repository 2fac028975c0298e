use anyhow::Result;
use log::{debug, info};
use std::path::Path;
use texslim_core::{
    Config, FileEntry, FileKind, collect_files, load_file_lines, referenced_files,
    save_file_lines, strip_comments,
};
use texslim_images::optimize_image;

use crate::types::{FileAction, FileRecord, RunReport};

/// Walks `root` once, optimizing every file in place and harvesting references.
///
/// `.tex` files are scanned for references before any ignore rule is applied, so
/// an ignored `.tex` file still counts as evidence that its figures are used.
/// Any I/O or codec error stops the run; files already rewritten stay rewritten.
pub fn run_optimization(root: &Path, cfg: &Config) -> Result<RunReport> {
    info!("Starting optimization of {}", root.display());

    let files = collect_files(root)?;
    info!("Found {} files", files.len());

    let mut references: Vec<String> = Vec::new();
    let mut records: Vec<FileRecord> = Vec::with_capacity(files.len());
    let mut bytes_saved: i64 = 0;

    for path in &files {
        let entry = FileEntry::new(path.clone());
        let record = process_file(&entry, cfg, &mut references)?;
        if let FileAction::Image(outcome) = &record.action {
            bytes_saved += outcome.saved();
        }
        records.push(record);
    }

    info!(
        "Optimization complete: {} files, {} references, {} bytes saved",
        files.len(),
        references.len(),
        bytes_saved
    );
    Ok(RunReport { files, references, records, bytes_saved })
}

fn process_file(
    entry: &FileEntry,
    cfg: &Config,
    references: &mut Vec<String>,
) -> Result<FileRecord> {
    let path = entry.path();
    let kind = entry.kind();
    let record = |action, special_case| FileRecord { path: path.to_path_buf(), action, special_case };

    let lines = if kind == FileKind::Text {
        let lines = load_file_lines(path)?;
        let found = referenced_files(&lines);
        debug!("{} references in {}", found.len(), path.display());
        references.extend(found);
        Some(lines)
    } else {
        None
    };

    if cfg.is_ignored_filetype(entry) {
        info!("Skipping based on filetype: {}", path.display());
        return Ok(record(FileAction::SkippedFiletype, false));
    }
    if cfg.is_ignored_file(entry) {
        info!("Skipping based on specific filename: {}", path.display());
        return Ok(record(FileAction::SkippedIgnoredFile, false));
    }

    let special_case = cfg.special_case_for(path);
    if special_case.is_some() {
        info!("Applying file specific parameters: {}", path.display());
    }
    let policy = special_case.unwrap_or(&cfg.policy);

    let action = match (kind, lines) {
        (FileKind::Image, _) => {
            info!("Optimising image file: {}", path.display());
            FileAction::Image(optimize_image(path, policy)?)
        }
        (FileKind::Text, Some(lines)) if policy.remove_comments => {
            info!("Optimising text file: {}", path.display());
            let cleaned = strip_comments(&lines);
            let lines_changed = lines.iter().zip(&cleaned).filter(|(a, b)| a != b).count();
            save_file_lines(&cleaned, path)?;
            FileAction::TextCleaned { lines_changed }
        }
        (FileKind::Text, _) => {
            debug!("Keeping comments in {}", path.display());
            FileAction::TextUnchanged
        }
        (FileKind::Other, _) => {
            info!("Skipping unknown file/filetype: {}", path.display());
            FileAction::SkippedUnknown
        }
    };

    Ok(record(action, special_case.is_some()))
}
