//! Best-effort discovery of files cited by `.tex` sources.
//!
//! This is a substring scan, not a LaTeX parser: a directive must fit on one
//! line, and the first brace group on that line is taken as its argument.
//! Optional arguments such as `[width=\linewidth]` come before the brace group
//! and are skipped naturally; multi-line arguments are not seen.

use anyhow::{Context, Result};
use log::{debug, trace, warn};
use std::{fs, path::Path};

use crate::constants::{INCLUDEGRAPHICS_DIRECTIVE, INPUT_DIRECTIVE};

/// Returns the text inside the first `{...}` group of `line`.
///
/// An unclosed group yields everything after the `{` (minus the line terminator).
/// `None` means the line has no `{` at all.
pub fn extract_braced(line: &str) -> Option<&str> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (_, rest) = line.split_once('{')?;
    Some(rest.split_once('}').map_or(rest, |(inner, _)| inner))
}

/// Collects the path fragments cited by `\input` and `\includegraphics` lines, in line order.
///
/// When both directives appear on one line only the `\input` branch is used.
/// Lines whose directive has no brace group are reported and skipped.
pub fn referenced_files<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut references = Vec::new();
    for (idx, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();
        let directive = if line.contains(INPUT_DIRECTIVE) {
            INPUT_DIRECTIVE
        } else if line.contains(INCLUDEGRAPHICS_DIRECTIVE) {
            INCLUDEGRAPHICS_DIRECTIVE
        } else {
            continue;
        };

        match extract_braced(line) {
            Some(reference) => {
                trace!("Line {}: {} -> '{}'", idx + 1, directive, reference);
                references.push(reference.to_string());
            }
            None => {
                warn!("Line {}: {} without a brace group: {}", idx + 1, directive, line.trim_end());
            }
        }
    }
    references
}

/// Reads a text file as lines, each keeping its `\n` terminator.
pub fn load_file_lines(path: &Path) -> Result<Vec<String>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let lines: Vec<String> = content.split_inclusive('\n').map(str::to_string).collect();
    debug!("Loaded {} lines from {}", lines.len(), path.display());
    Ok(lines)
}

/// Overwrites `path` with `lines` written back to back.
pub fn save_file_lines<S: AsRef<str>>(lines: &[S], path: &Path) -> Result<()> {
    let content: String = lines.iter().map(AsRef::as_ref).collect();
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    debug!("Wrote {} lines to {}", lines.len(), path.display());
    Ok(())
}
