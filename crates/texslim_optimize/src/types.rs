use std::path::PathBuf;

use texslim_images::ImageOutcome;

/// What the optimize pass did with one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileAction {
    /// Extension listed in `ignore_filetypes`
    SkippedFiletype,
    /// Path or basename listed in `ignore_files`
    SkippedIgnoredFile,
    /// Not an image or `.tex` file
    SkippedUnknown,
    Image(ImageOutcome),
    /// Comments stripped and the file rewritten
    TextCleaned { lines_changed: usize },
    /// `.tex` file whose policy keeps comments
    TextUnchanged,
}

#[derive(Debug, Clone)]
pub struct FileRecord {
    pub path: PathBuf,
    pub action: FileAction,
    /// Whether a special case supplied the policy for this file
    pub special_case: bool,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    /// Every file found under the root, in walk order
    pub files: Vec<PathBuf>,
    /// Path fragments cited by `\input` / `\includegraphics`, duplicates included
    pub references: Vec<String>,
    pub records: Vec<FileRecord>,
    /// Net bytes saved across all images; negative if re-encoding grew them
    pub bytes_saved: i64,
}

impl RunReport {
    pub fn images_processed(&self) -> usize {
        self.records.iter().filter(|r| matches!(r.action, FileAction::Image(_))).count()
    }

    pub fn text_files_processed(&self) -> usize {
        self.records
            .iter()
            .filter(|r| {
                matches!(r.action, FileAction::TextCleaned { .. } | FileAction::TextUnchanged)
            })
            .count()
    }

    pub fn files_skipped(&self) -> usize {
        self.records.len() - self.images_processed() - self.text_files_processed()
    }
}

/// Files that no reference appears to mention
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnusedReport {
    pub unused_files: Vec<PathBuf>,
    /// The subset of `unused_files` that may be deleted
    pub unused_images: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionOutcome {
    pub confirmed: bool,
    pub deleted: Vec<PathBuf>,
}
