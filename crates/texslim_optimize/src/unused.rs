use log::{debug, trace};
use std::path::{Path, PathBuf};
use texslim_core::DELETABLE_IMAGE_SUFFIXES;

use crate::types::UnusedReport;

/// Whether the basename of `path` occurs inside any reference.
///
/// This is a heuristic. `\includegraphics{figs/plot}` omits the extension and
/// does not count as a use of `plot.png`, while a short name such as `a.png`
/// counts as used whenever `data.png` is referenced.
pub fn is_referenced(path: &Path, references: &[String]) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.to_string_lossy();
    references.iter().any(|r| r.contains(name.as_ref()))
}

fn is_deletable(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    DELETABLE_IMAGE_SUFFIXES.iter().any(|suffix| path_str.ends_with(suffix))
}

/// Splits out the files no reference mentions, and the images among them that may be deleted.
pub fn find_unused(files: &[PathBuf], references: &[String]) -> UnusedReport {
    debug!("Checking {} files against {} references", files.len(), references.len());
    let mut report = UnusedReport::default();
    for path in files {
        if is_referenced(path, references) {
            continue;
        }
        trace!("Potentially unused: {}", path.display());
        if is_deletable(path) {
            report.unused_images.push(path.clone());
        }
        report.unused_files.push(path.clone());
    }
    debug!(
        "Found {} potentially unused files, {} deletable images",
        report.unused_files.len(),
        report.unused_images.len()
    );
    report
}
