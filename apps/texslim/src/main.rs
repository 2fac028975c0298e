use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use log::{debug, info};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;
use texslim_core::load_config;
use texslim_optimize::{
    LineConfirm, confirm_and_delete, find_unused, print_deletion_result, print_summary,
    run_optimization,
};

#[derive(Debug, Parser)]
#[command(name = "texslim")]
#[command(
    about = "Shrink the figures and strip the comments of a LaTeX project in place",
    long_about = None
)]
struct Cli {
    /// Path to the directory of the LaTeX project
    #[arg(long = "tex-dir", alias = "tex_dir")]
    tex_dir: PathBuf,

    /// Path to the JSON optimization parameters
    #[arg(long)]
    config: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(io::stdout());

    let cli = Cli::parse();
    debug!("Parsed CLI arguments: {:?}", cli);

    let start = Instant::now();

    let cfg = load_config(&cli.config)?;
    info!(
        "Loaded config with {} special cases from {}",
        cfg.special_cases.len(),
        cli.config.display()
    );

    let report = run_optimization(&cli.tex_dir, &cfg)?;
    let unused = find_unused(&report.files, &report.references);

    print_summary(&mut stdout, &cli.tex_dir, &report, &unused)?;
    writeln!(
        stdout,
        "\n{} Finished in {}ms on {} files.",
        "●".bright_blue(),
        start.elapsed().as_millis().to_string().cyan(),
        report.files.len().to_string().cyan()
    )?;
    stdout.flush()?;

    let mut confirm = LineConfirm::new(io::stdin().lock(), io::stdout());
    let outcome = confirm_and_delete(&unused, &mut confirm)?;
    print_deletion_result(&mut stdout, &cli.tex_dir, &outcome)?;
    stdout.flush()?;

    Ok(())
}
