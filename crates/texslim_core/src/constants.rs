//! Constants for file extensions and LaTeX markers.
//!
//! Extensions are stored lowercase with their leading dot, matching
//! [`FileEntry::extension`](crate::FileEntry::extension).

/// Image extensions the optimizer knows how to resize and re-encode
pub const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpg", ".jpeg"];

/// Text extensions that are scanned for references and can have comments stripped
pub const TEXT_EXTENSIONS: &[&str] = &[".tex"];

/// Suffixes of unreferenced files that may be offered for deletion.
///
/// Matched case-sensitively against the full path; `.jpeg` is not offered.
pub const DELETABLE_IMAGE_SUFFIXES: &[&str] = &[".png", ".jpg"];

/// Directive that pulls another `.tex` file into the document
pub const INPUT_DIRECTIVE: &str = r"\input";

/// Directive that embeds an image
pub const INCLUDEGRAPHICS_DIRECTIVE: &str = r"\includegraphics";

/// Sizes are reported in decimal megabytes
pub const BYTES_PER_MEGABYTE: f64 = 1_000_000.0;

pub const COMMENT_MARKER: char = '%';
pub const ESCAPE_MARKER: char = '\\';
