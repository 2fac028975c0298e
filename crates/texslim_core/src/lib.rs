//! Core utilities for texslim.
//!
//! This crate provides the pieces shared by the optimizer and the CLI:
//! - Loading and validating the JSON optimization config
//! - Resolving the effective per-file policy (special cases vs. global)
//! - Collecting every file under a LaTeX project root
//! - Scanning `.tex` lines for `\input` / `\includegraphics` references
//! - Stripping `%` comments from `.tex` lines

mod collector;
mod comments;
mod config;
mod constants;
mod references;
mod types;

// Re-export public API
pub use collector::collect_files;
pub use comments::{strip_comment, strip_comments};
pub use config::{Config, Policy, ResizeDimension, load_config};
pub use constants::{
    BYTES_PER_MEGABYTE, COMMENT_MARKER, DELETABLE_IMAGE_SUFFIXES, ESCAPE_MARKER, IMAGE_EXTENSIONS,
    INCLUDEGRAPHICS_DIRECTIVE, INPUT_DIRECTIVE, TEXT_EXTENSIONS,
};
pub use references::{extract_braced, load_file_lines, referenced_files, save_file_lines};
pub use types::{FileEntry, FileKind};
