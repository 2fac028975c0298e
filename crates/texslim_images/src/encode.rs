use anyhow::{Context, Result, anyhow, bail};
use image::{
    ColorType, DynamicImage, ImageFormat, ImageReader, Rgb, RgbImage,
    codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder},
};
use log::{debug, trace};
use std::{borrow::Cow, fs, io::Cursor, path::Path};

/// Background used when an image with transparency has to become a JPEG
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Decodes the image at `path`, sniffing the format from its content.
///
/// Decoder size limits are lifted: large scanned figures are exactly what this
/// tool exists to shrink.
pub fn load_image(path: &Path) -> Result<(DynamicImage, ImageFormat)> {
    let mut reader = ImageReader::open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?
        .with_guessed_format()
        .with_context(|| format!("Failed to read {}", path.display()))?;
    reader.no_limits();

    let format = reader
        .format()
        .or_else(|| ImageFormat::from_path(path).ok())
        .ok_or_else(|| anyhow!("Unrecognized image format: {}", path.display()))?;
    let image = reader.decode().with_context(|| format!("Failed to decode {}", path.display()))?;
    trace!("Decoded {} as {:?} ({}x{})", path.display(), format, image.width(), image.height());
    Ok((image, format))
}

/// Composites `image` onto a solid `background`, dropping the alpha channel.
pub fn flatten_alpha(image: &DynamicImage, background: Rgb<u8>) -> RgbImage {
    let rgba = image.to_rgba8();
    let mut flat = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, px) in rgba.enumerate_pixels() {
        let alpha = u32::from(px[3]);
        let blend = |fg: u8, bg: u8| {
            ((u32::from(fg) * alpha + u32::from(bg) * (255 - alpha) + 127) / 255) as u8
        };
        flat.put_pixel(
            x,
            y,
            Rgb([blend(px[0], background[0]), blend(px[1], background[1]), blend(px[2], background[2])]),
        );
    }
    flat
}

/// Encodes `image` as `format` in memory.
///
/// JPEG honours `quality` and flattens transparency onto white. JPEG has no
/// quality 0, so 0 encodes as 1. `optimize` builds Huffman tables fitted to the
/// image instead of the standard ones. PNG is lossless, so `quality` is ignored
/// and `optimize` selects the slowest, smallest compression. Other formats use
/// their encoder defaults.
pub fn encode(
    image: &DynamicImage,
    format: ImageFormat,
    quality: u8,
    optimize: bool,
) -> Result<Vec<u8>> {
    let mut buf: Vec<u8> = Vec::new();
    match format {
        ImageFormat::Jpeg => {
            let encodable: Cow<'_, DynamicImage> = match image.color() {
                ColorType::L8 | ColorType::Rgb8 => Cow::Borrowed(image),
                color if color.has_alpha() => {
                    Cow::Owned(DynamicImage::ImageRgb8(flatten_alpha(image, WHITE)))
                }
                _ => Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8())),
            };
            encode_jpeg(&encodable, &mut buf, quality, optimize)?;
        }
        ImageFormat::Png => {
            let compression =
                if optimize { CompressionType::Best } else { CompressionType::Default };
            let encoder = PngEncoder::new_with_quality(&mut buf, compression, PngFilter::Adaptive);
            image.write_with_encoder(encoder).context("PNG encoding failed")?;
        }
        other => {
            debug!("No tuned encoder for {:?}, using defaults", other);
            image
                .write_to(&mut Cursor::new(&mut buf), other)
                .with_context(|| format!("{:?} encoding failed", other))?;
        }
    }
    Ok(buf)
}

fn encode_jpeg(image: &DynamicImage, buf: &mut Vec<u8>, quality: u8, optimize: bool) -> Result<()> {
    let color = match image.color() {
        ColorType::L8 => jpeg_encoder::ColorType::Luma,
        ColorType::Rgb8 => jpeg_encoder::ColorType::Rgb,
        other => bail!("JPEG encoding needs L8 or Rgb8 pixels, got {:?}", other),
    };
    let (Ok(width), Ok(height)) = (u16::try_from(image.width()), u16::try_from(image.height()))
    else {
        bail!("JPEG cannot hold {}x{} pixels", image.width(), image.height());
    };

    let mut encoder = jpeg_encoder::Encoder::new(buf, quality.clamp(1, 100));
    encoder.set_optimized_huffman_tables(optimize);
    encoder.encode(image.as_bytes(), width, height, color).context("JPEG encoding failed")?;
    Ok(())
}

/// Re-encodes `image` and overwrites `destination` with the result.
///
/// Encoding finishes before the file is opened, so a codec failure leaves the
/// original untouched. Returns the number of bytes written.
pub fn compress_and_save(
    image: &DynamicImage,
    destination: &Path,
    format: ImageFormat,
    quality: u8,
    optimize: bool,
) -> Result<u64> {
    let bytes = encode(image, format, quality, optimize)
        .with_context(|| format!("Failed to encode {}", destination.display()))?;
    fs::write(destination, &bytes)
        .with_context(|| format!("Failed to write {}", destination.display()))?;
    debug!(
        "Saved {} ({:?}, quality {}, optimize {}): {} bytes",
        destination.display(),
        format,
        quality,
        optimize,
        bytes.len()
    );
    Ok(bytes.len() as u64)
}
