use anyhow::{Context, Result, bail};
use log::{debug, trace};
use path_clean::clean;
use serde::Deserialize;
use std::{
    collections::{HashMap, HashSet},
    fs,
    path::Path,
};

use crate::types::FileEntry;

/// Quality used for re-encoding when compression itself is disabled
const LOSSLESS_QUALITY: u8 = 100;

/// Which side of an image is checked against `largest_size`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "i8")]
pub enum ResizeDimension {
    /// Use the side whose bound is smaller (`-1` in the config file)
    Auto,
    /// Force the width (`0`)
    Width,
    /// Force the height (`1`)
    Height,
}

impl TryFrom<i8> for ResizeDimension {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Auto),
            0 => Ok(Self::Width),
            1 => Ok(Self::Height),
            other => Err(format!("image_resize_dimension must be -1, 0 or 1, got {}", other)),
        }
    }
}

/// The optimization settings applied to a single file.
///
/// The global config carries one of these, and every special case is a complete
/// replacement for it. Keys are never merged between the two levels.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Policy {
    pub compress_images: bool,
    pub resize_images: bool,
    /// Bounding box as `(width, height)`
    pub largest_size: (u32, u32),
    pub image_resize_dimension: ResizeDimension,
    /// Only required when `compress_images` is set
    pub compression_quality: Option<u8>,
    pub optimize_compression: bool,
    pub remove_comments: bool,
}

impl Policy {
    /// The quality to encode with: the configured one when compressing, otherwise 100.
    pub fn effective_quality(&self) -> u8 {
        self.compression_quality.filter(|_| self.compress_images).unwrap_or(LOSSLESS_QUALITY)
    }

    /// Whether an image under this policy is re-encoded at all
    pub fn touches_images(&self) -> bool {
        self.compress_images || self.resize_images
    }

    fn validate(&self, label: &str) -> Result<()> {
        let (width, height) = self.largest_size;
        if width == 0 || height == 0 {
            bail!("{}: largest_size must be positive, got [{}, {}]", label, width, height);
        }
        match self.compression_quality {
            Some(q) if q > 100 => {
                bail!("{}: compression_quality must be between 0 and 100, got {}", label, q)
            }
            None if self.compress_images => {
                bail!("{}: compression_quality is required when compress_images is true", label)
            }
            _ => {}
        }
        Ok(())
    }
}

/// Top-level optimization config, as read from the JSON config file
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub policy: Policy,
    pub ignore_filetypes: HashSet<String>,
    pub ignore_files: HashSet<String>,
    pub special_cases: HashMap<String, Policy>,
}

impl Config {
    /// Parses, normalizes and validates a config from JSON text.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let mut cfg: Config =
            serde_json::from_str(content).context("Failed to parse optimization config")?;
        cfg.normalize();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks the global policy and every special case up front, so a bad
    /// override is reported before any file is rewritten.
    pub fn validate(&self) -> Result<()> {
        self.policy.validate("global config")?;
        for (key, policy) in &self.special_cases {
            policy.validate(&format!("special case '{}'", key))?;
        }
        Ok(())
    }

    fn normalize(&mut self) {
        self.ignore_filetypes =
            std::mem::take(&mut self.ignore_filetypes).iter().map(|e| normalize_extension(e)).collect();
        self.ignore_files =
            std::mem::take(&mut self.ignore_files).iter().map(|f| normalize_key(f)).collect();
        self.special_cases = std::mem::take(&mut self.special_cases)
            .into_iter()
            .map(|(key, policy)| (normalize_key(&key), policy))
            .collect();
        trace!(
            "Normalized config: {} ignored filetypes, {} ignored files, {} special cases",
            self.ignore_filetypes.len(),
            self.ignore_files.len(),
            self.special_cases.len()
        );
    }

    pub fn is_ignored_filetype(&self, entry: &FileEntry) -> bool {
        !entry.extension.is_empty() && self.ignore_filetypes.contains(&entry.extension)
    }

    pub fn is_ignored_file(&self, entry: &FileEntry) -> bool {
        self.ignore_files.contains(&normalize_path(entry.path()))
            || self.ignore_files.contains(&entry.basename)
    }

    /// The special case for `path`, if any. A full-path key wins over a basename key.
    pub fn special_case_for(&self, path: &Path) -> Option<&Policy> {
        if let Some(policy) = self.special_cases.get(&normalize_path(path)) {
            debug!("Special case matched full path: {}", path.display());
            return Some(policy);
        }
        let name = path.file_name()?.to_string_lossy();
        let policy = self.special_cases.get(name.as_ref())?;
        debug!("Special case matched basename '{}': {}", name, path.display());
        Some(policy)
    }

    /// The effective policy for `path`: its special case, or the global policy.
    pub fn resolve(&self, path: &Path) -> &Policy {
        self.special_case_for(path).unwrap_or(&self.policy)
    }
}

/// Reads and validates the JSON config file at `path`.
pub fn load_config(path: &Path) -> Result<Config> {
    debug!("Reading config from {}", path.display());
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    Config::from_json_str(&content).with_context(|| format!("Invalid config {}", path.display()))
}

fn normalize_path(path: &Path) -> String {
    clean(path).to_string_lossy().to_string()
}

fn normalize_key(key: &str) -> String {
    normalize_path(Path::new(key))
}

fn normalize_extension(ext: &str) -> String {
    let ext = ext.to_lowercase();
    if ext.starts_with('.') { ext } else { format!(".{}", ext) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use tempfile::TempDir;

    fn base_json() -> Value {
        json!({
            "compress_images": true,
            "resize_images": true,
            "largest_size": [800, 600],
            "image_resize_dimension": -1,
            "compression_quality": 80,
            "optimize_compression": true,
            "remove_comments": true,
            "ignore_filetypes": [".pdf", "BIB"],
            "ignore_files": ["./build/../figs/logo.png", "cover.jpg"],
            "special_cases": {
                "draft.tex": {
                    "compress_images": false,
                    "resize_images": false,
                    "largest_size": [800, 600],
                    "image_resize_dimension": -1,
                    "optimize_compression": false,
                    "remove_comments": false
                },
                "/project/figs/hero.png": {
                    "compress_images": true,
                    "resize_images": false,
                    "largest_size": [2000, 2000],
                    "image_resize_dimension": 0,
                    "compression_quality": 95,
                    "optimize_compression": true,
                    "remove_comments": true
                },
                "hero.png": {
                    "compress_images": true,
                    "resize_images": true,
                    "largest_size": [100, 100],
                    "image_resize_dimension": 1,
                    "compression_quality": 10,
                    "optimize_compression": true,
                    "remove_comments": true
                }
            }
        })
    }

    fn parse(value: &Value) -> Result<Config> {
        Config::from_json_str(&value.to_string())
    }

    fn base_config() -> Config {
        parse(&base_json()).unwrap()
    }

    fn error_text(value: &Value) -> String {
        format!("{:#}", parse(value).unwrap_err())
    }

    #[test]
    fn test_parse_global_policy() {
        let cfg = base_config();
        assert!(cfg.policy.compress_images);
        assert_eq!(cfg.policy.largest_size, (800, 600));
        assert_eq!(cfg.policy.image_resize_dimension, ResizeDimension::Auto);
        assert_eq!(cfg.policy.effective_quality(), 80);
        assert_eq!(cfg.special_cases.len(), 3);
    }

    #[test]
    fn test_special_case_basename_beats_global() {
        let cfg = base_config();
        let draft = cfg.resolve(Path::new("/project/chapters/draft.tex"));
        assert!(!draft.remove_comments);

        let intro = cfg.resolve(Path::new("/project/chapters/intro.tex"));
        assert!(intro.remove_comments);
        assert!(std::ptr::eq(intro, &cfg.policy));
    }

    #[test]
    fn test_example_config_matches_any_tex_dir() {
        let cfg = Config::from_json_str(include_str!("../../../config.example.json")).unwrap();
        for root in [".", "paper", "/home/me/paper"] {
            let figure = Path::new(root).join("figs/microscopy.jpg");
            assert_eq!(cfg.resolve(&figure).compression_quality, Some(95));
        }
    }

    #[test]
    fn test_full_path_beats_basename() {
        let cfg = base_config();
        let hero = cfg.resolve(Path::new("/project/figs/hero.png"));
        assert_eq!(hero.compression_quality, Some(95));
        assert_eq!(hero.image_resize_dimension, ResizeDimension::Width);

        // Same basename elsewhere falls back to the basename key
        let other = cfg.resolve(Path::new("/project/old/hero.png"));
        assert_eq!(other.compression_quality, Some(10));
    }

    #[test]
    fn test_full_path_matching_is_lexically_normalized() {
        let cfg = base_config();
        let hero = cfg.resolve(Path::new("/project/figs/./hero.png"));
        assert_eq!(hero.compression_quality, Some(95));
    }

    #[test]
    fn test_no_special_case() {
        let cfg = base_config();
        assert!(cfg.special_case_for(Path::new("/project/main.tex")).is_none());
    }

    #[test]
    fn test_ignore_filetypes_normalized() {
        let cfg = base_config();
        assert!(cfg.is_ignored_filetype(&FileEntry::new("/project/out.pdf")));
        assert!(cfg.is_ignored_filetype(&FileEntry::new("/project/refs.bib")));
        assert!(cfg.is_ignored_filetype(&FileEntry::new("/project/OUT.PDF")));
        assert!(!cfg.is_ignored_filetype(&FileEntry::new("/project/main.tex")));
        assert!(!cfg.is_ignored_filetype(&FileEntry::new("/project/Makefile")));
    }

    #[test]
    fn test_ignore_files_by_path_or_basename() {
        let cfg = base_config();
        assert!(cfg.is_ignored_file(&FileEntry::new("figs/logo.png")));
        assert!(cfg.is_ignored_file(&FileEntry::new("/anywhere/cover.jpg")));
        assert!(!cfg.is_ignored_file(&FileEntry::new("/project/figs/logo.png")));
    }

    #[test]
    fn test_missing_global_key_is_error() {
        let mut value = base_json();
        value.as_object_mut().unwrap().remove("optimize_compression");
        assert!(error_text(&value).contains("optimize_compression"));
    }

    #[test]
    fn test_missing_special_case_key_is_error() {
        let mut value = base_json();
        value["special_cases"]["hero.png"].as_object_mut().unwrap().remove("remove_comments");
        assert!(error_text(&value).contains("remove_comments"));
    }

    #[test]
    fn test_special_case_accepts_full_config_shape() {
        let mut value = base_json();
        value["special_cases"]["hero.png"]["ignore_files"] = json!([]);
        value["special_cases"]["hero.png"]["special_cases"] = json!({});
        assert!(parse(&value).is_ok());
    }

    #[test]
    fn test_quality_required_only_when_compressing() {
        let mut value = base_json();
        value.as_object_mut().unwrap().remove("compression_quality");
        assert!(error_text(&value).contains("compression_quality is required"));

        // draft.tex has no quality and compression disabled
        let cfg = base_config();
        let draft = cfg.resolve(Path::new("draft.tex"));
        assert_eq!(draft.compression_quality, None);
        assert_eq!(draft.effective_quality(), 100);
    }

    #[test]
    fn test_quality_ignored_when_not_compressing() {
        let mut value = base_json();
        value["compress_images"] = json!(false);
        let cfg = parse(&value).unwrap();
        assert_eq!(cfg.policy.compression_quality, Some(80));
        assert_eq!(cfg.policy.effective_quality(), 100);
        assert!(cfg.policy.touches_images());
    }

    #[test]
    fn test_quality_out_of_range() {
        let mut value = base_json();
        value["compression_quality"] = json!(101);
        assert!(error_text(&value).contains("between 0 and 100"));
    }

    #[test]
    fn test_resize_dimension_out_of_range() {
        let mut value = base_json();
        value["image_resize_dimension"] = json!(2);
        assert!(error_text(&value).contains("must be -1, 0 or 1"));
    }

    #[test]
    fn test_zero_largest_size_in_special_case() {
        let mut value = base_json();
        value["special_cases"]["/project/figs/hero.png"]["largest_size"] = json!([0, 2000]);
        let err = error_text(&value);
        assert!(err.contains("special case '/project/figs/hero.png'"));
        assert!(err.contains("largest_size must be positive"));
    }

    #[test]
    fn test_load_config_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, base_json().to_string()).unwrap();

        let cfg = load_config(&path).unwrap();
        assert!(cfg.policy.remove_comments);
    }

    #[test]
    fn test_load_config_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_config(&temp_dir.path().join("nope.json")).unwrap_err();
        assert!(format!("{}", err).contains("Failed to read config"));
    }
}
