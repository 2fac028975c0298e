use anyhow::{Context, Result};
use log::{debug, info};
use std::{fs, path::Path};
use texslim_core::{BYTES_PER_MEGABYTE, Policy};

use crate::{
    encode::{compress_and_save, load_image},
    resize::resize,
};

/// What happened to an image file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageAction {
    /// Neither resizing nor compression is enabled for this file
    Untouched,
    /// Re-encoded at its original dimensions
    Recompressed,
    /// Scaled down, then re-encoded
    Resized { from: (u32, u32), to: (u32, u32) },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageOutcome {
    pub size_before: u64,
    pub size_after: u64,
    pub action: ImageAction,
}

impl ImageOutcome {
    /// Bytes saved on disk; negative when re-encoding made the file larger.
    pub fn saved(&self) -> i64 {
        self.size_before as i64 - self.size_after as i64
    }
}

fn file_size(path: &Path) -> Result<u64> {
    Ok(fs::metadata(path).with_context(|| format!("Failed to stat {}", path.display()))?.len())
}

/// Applies `policy` to the image at `path`, rewriting it in place.
///
/// Resizing always forces a re-encode; without compression that re-encode uses
/// quality 100.
pub fn optimize_image(path: &Path, policy: &Policy) -> Result<ImageOutcome> {
    let size_before = file_size(path)?;

    let action = if !policy.touches_images() {
        debug!("Image policy disabled, leaving {} untouched", path.display());
        ImageAction::Untouched
    } else {
        let (mut image, format) = load_image(path)?;
        let from = (image.width(), image.height());
        let mut action = ImageAction::Recompressed;

        if policy.resize_images {
            let resized = resize(&image, policy.largest_size, policy.image_resize_dimension);
            let to = (resized.width(), resized.height());
            if to != from {
                debug!("Resized {} from {:?} to {:?}", path.display(), from, to);
                action = ImageAction::Resized { from, to };
            }
            image = resized;
        }

        compress_and_save(
            &image,
            path,
            format,
            policy.effective_quality(),
            policy.optimize_compression,
        )?;
        action
    };

    let size_after = file_size(path)?;
    info!("Original file size (mb): {}", size_before as f64 / BYTES_PER_MEGABYTE);
    info!("Optimised file size (mb): {}", size_after as f64 / BYTES_PER_MEGABYTE);

    Ok(ImageOutcome { size_before, size_after, action })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use tempfile::TempDir;
    use texslim_core::ResizeDimension;

    fn policy(compress: bool, resize: bool) -> Policy {
        Policy {
            compress_images: compress,
            resize_images: resize,
            largest_size: (20, 1000),
            image_resize_dimension: ResizeDimension::Auto,
            compression_quality: Some(30),
            optimize_compression: true,
            remove_comments: false,
        }
    }

    fn write_image(dir: &Path, name: &str, width: u32, height: u32) -> std::path::PathBuf {
        let path = dir.join(name);
        let image = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 5 % 256) as u8, (y * 9 % 256) as u8, 128])
        }));
        image.save(&path).unwrap();
        path
    }

    #[test]
    fn test_untouched_when_policy_disabled() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_image(temp_dir.path(), "fig.png", 40, 10);
        let before = fs::read(&path).unwrap();

        let outcome = optimize_image(&path, &policy(false, false)).unwrap();
        assert_eq!(outcome.action, ImageAction::Untouched);
        assert_eq!(outcome.saved(), 0);
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_resize_only_still_reencodes() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_image(temp_dir.path(), "fig.png", 40, 10);

        let outcome = optimize_image(&path, &policy(false, true)).unwrap();
        assert_eq!(outcome.action, ImageAction::Resized { from: (40, 10), to: (20, 5) });
        assert_eq!(outcome.size_after, fs::metadata(&path).unwrap().len());

        let reloaded = image::open(&path).unwrap();
        assert_eq!((reloaded.width(), reloaded.height()), (20, 5));
    }

    #[test]
    fn test_compress_without_resize_keeps_dimensions() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_image(temp_dir.path(), "photo.jpg", 40, 10);

        let outcome = optimize_image(&path, &policy(true, false)).unwrap();
        assert_eq!(outcome.action, ImageAction::Recompressed);

        let reloaded = image::open(&path).unwrap();
        assert_eq!((reloaded.width(), reloaded.height()), (40, 10));
    }

    #[test]
    fn test_small_image_recompressed_not_resized() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_image(temp_dir.path(), "icon.png", 8, 8);

        let outcome = optimize_image(&path, &policy(true, true)).unwrap();
        assert_eq!(outcome.action, ImageAction::Recompressed);
    }

    #[test]
    fn test_format_preserved() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_image(temp_dir.path(), "photo.jpeg", 64, 64);

        optimize_image(&path, &policy(true, true)).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_saved_is_signed() {
        let grew = ImageOutcome { size_before: 10, size_after: 15, action: ImageAction::Recompressed };
        assert_eq!(grew.saved(), -5);
    }

    #[test]
    fn test_missing_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        assert!(optimize_image(&temp_dir.path().join("gone.png"), &policy(true, true)).is_err());
    }
}
