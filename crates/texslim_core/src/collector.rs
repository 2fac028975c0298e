use anyhow::{Context, Result, bail};
use ignore::WalkBuilder;
use log::{debug, trace};
use std::path::{Path, PathBuf};

/// Collects every non-directory path under `root`, depth-first.
///
/// Nothing is filtered: hidden files and paths listed in `.gitignore` are part of
/// the project as far as LaTeX is concerned. Entries are sorted by file name at
/// each directory level so repeated runs see the same order.
pub fn collect_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        bail!("Project root {} is not a directory", root.display());
    }

    debug!("Walking directory tree from root: {}", root.display());
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut files: Vec<PathBuf> = Vec::new();
    for res in walker {
        let dent = res.with_context(|| format!("Failed to walk {}", root.display()))?;
        let p = dent.path();
        if p.is_dir() {
            continue;
        }
        trace!("Found file: {}", p.display());
        files.push(p.to_path_buf());
    }

    debug!("Collected {} files", files.len());
    Ok(files)
}
