use std::path::{Path, PathBuf};

use crate::constants::{IMAGE_EXTENSIONS, TEXT_EXTENSIONS};

/// How the optimizer treats a file, based on its extension alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Text,
    Other,
}

/// A file discovered under the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    /// Lowercase extension including the leading dot, empty when there is none
    pub extension: String,
    pub basename: String,
}

impl FileEntry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_default();
        let basename =
            path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
        Self { path, extension, basename }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> FileKind {
        let ext = self.extension.as_str();
        if IMAGE_EXTENSIONS.contains(&ext) {
            FileKind::Image
        } else if TEXT_EXTENSIONS.contains(&ext) {
            FileKind::Text
        } else {
            FileKind::Other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_derives_extension_and_basename() {
        let entry = FileEntry::new("/project/figs/Plot.PNG");
        assert_eq!(entry.extension, ".png");
        assert_eq!(entry.basename, "Plot.PNG");
        assert_eq!(entry.kind(), FileKind::Image);
    }

    #[test]
    fn test_entry_kinds() {
        assert_eq!(FileEntry::new("main.tex").kind(), FileKind::Text);
        assert_eq!(FileEntry::new("photo.jpeg").kind(), FileKind::Image);
        assert_eq!(FileEntry::new("refs.bib").kind(), FileKind::Other);
    }

    #[test]
    fn test_entry_without_extension() {
        let entry = FileEntry::new("/project/Makefile");
        assert_eq!(entry.extension, "");
        assert_eq!(entry.basename, "Makefile");
        assert_eq!(entry.kind(), FileKind::Other);
    }

    #[test]
    fn test_dotfile_has_no_extension() {
        // Path::extension treats a leading dot as part of the stem
        let entry = FileEntry::new("/project/.latexmkrc");
        assert_eq!(entry.extension, "");
        assert_eq!(entry.basename, ".latexmkrc");
    }
}
