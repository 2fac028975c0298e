//! In-place optimization of LaTeX projects.
//!
//! A run walks the project once, resizing and re-encoding figures and stripping
//! comments from `.tex` sources according to the config, while collecting every
//! path cited by `\input` and `\includegraphics`. Files whose name appears in no
//! citation are then reported, and unused `.png` / `.jpg` figures can be deleted
//! once the operator confirms.
//!
//! # Examples
//!
//! ```no_run
//! use std::io::{BufWriter, Write, stdin};
//! use std::path::Path;
//! use texslim_core::load_config;
//! use texslim_optimize::{LineConfirm, confirm_and_delete, find_unused, print_summary, run_optimization};
//!
//! # fn main() -> anyhow::Result<()> {
//! let root = Path::new("/path/to/paper");
//! let cfg = load_config(Path::new("config.json"))?;
//!
//! let report = run_optimization(root, &cfg)?;
//! let unused = find_unused(&report.files, &report.references);
//!
//! let mut stdout = BufWriter::new(std::io::stdout());
//! print_summary(&mut stdout, root, &report, &unused)?;
//! stdout.flush()?;
//!
//! // Batch callers can pass a closure instead, e.g. `&mut |_: &str| Ok(false)`
//! let mut confirm = LineConfirm::new(stdin().lock(), std::io::stdout());
//! confirm_and_delete(&unused, &mut confirm)?;
//! # Ok(())
//! # }
//! ```

mod checker;
mod confirm;
mod reporter;
mod types;
mod unused;

// Re-export public API
pub use checker::run_optimization;
pub use confirm::{
    AFFIRMATIVE, Confirm, LineConfirm, confirm_and_delete, deletion_prompt, is_affirmative,
};
pub use reporter::{print_deletion_result, print_summary};
pub use types::{DeletionOutcome, FileAction, FileRecord, RunReport, UnusedReport};
pub use unused::{find_unused, is_referenced};
