use image::{DynamicImage, imageops::FilterType};
use log::trace;
use texslim_core::ResizeDimension;

/// An image side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
}

/// Picks the side that is checked against `largest_size`.
///
/// An explicit dimension wins. Otherwise the side with the smaller bound is used,
/// with ties going to the width.
pub fn governing_dimension(largest_size: (u32, u32), dimension: ResizeDimension) -> Axis {
    match dimension {
        ResizeDimension::Width => Axis::Width,
        ResizeDimension::Height => Axis::Height,
        ResizeDimension::Auto if largest_size.0 <= largest_size.1 => Axis::Width,
        ResizeDimension::Auto => Axis::Height,
    }
}

/// The size an image of `width` x `height` should be scaled to, or `None` if it already fits.
///
/// Only the governing side is compared with its bound. When it is too large it
/// becomes the bound and the other side keeps the aspect ratio, rounded to the
/// nearest pixel.
pub fn target_dimensions(
    width: u32,
    height: u32,
    largest_size: (u32, u32),
    dimension: ResizeDimension,
) -> Option<(u32, u32)> {
    let axis = governing_dimension(largest_size, dimension);
    let (current, other, bound) = match axis {
        Axis::Width => (width, height, largest_size.0),
        Axis::Height => (height, width, largest_size.1),
    };
    if current <= bound {
        return None;
    }

    let scaled = (u64::from(other) * u64::from(bound)) as f64 / f64::from(current);
    let scaled = (scaled.round() as u32).max(1);
    trace!("Scaling {:?} from {} to {} ({}x{})", axis, current, bound, width, height);
    Some(match axis {
        Axis::Width => (bound, scaled),
        Axis::Height => (scaled, bound),
    })
}

/// Returns a resized copy of `image`, or a plain copy when it already fits.
///
/// The result never aliases the input, so callers may mutate it freely.
pub fn resize(
    image: &DynamicImage,
    largest_size: (u32, u32),
    dimension: ResizeDimension,
) -> DynamicImage {
    match target_dimensions(image.width(), image.height(), largest_size, dimension) {
        Some((w, h)) => image.resize_exact(w, h, FilterType::Lanczos3),
        None => image.clone(),
    }
}
