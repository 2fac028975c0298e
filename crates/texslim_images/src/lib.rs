//! Image resizing and re-encoding for texslim.
//!
//! Figures are shrunk so their governing side fits the configured bound and
//! re-encoded in place. The file format never changes: a `.png` stays a PNG
//! and a `.jpg` stays a JPEG, so `\includegraphics` paths keep working.
//!
//! ```no_run
//! use texslim_core::load_config;
//! use texslim_images::optimize_image;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = load_config(Path::new("config.json"))?;
//! let figure = Path::new("paper/figs/plot.png");
//! let outcome = optimize_image(figure, cfg.resolve(figure))?;
//! println!("saved {} bytes", outcome.saved());
//! # Ok(())
//! # }
//! ```

mod encode;
mod optimizer;
mod resize;

// Re-export public API
pub use encode::{WHITE, compress_and_save, encode, flatten_alpha, load_image};
pub use optimizer::{ImageAction, ImageOutcome, optimize_image};
pub use resize::{Axis, governing_dimension, resize, target_dimensions};
