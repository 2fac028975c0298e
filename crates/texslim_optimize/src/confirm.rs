use anyhow::{Context, Result};
use log::{debug, info};
use std::{
    fs,
    io::{BufRead, Write},
};

use crate::types::{DeletionOutcome, UnusedReport};

/// The only answer that allows deletion
pub const AFFIRMATIVE: &str = "y";

/// Asks the operator a yes/no question.
///
/// Any `FnMut(&str) -> Result<bool>` closure is a `Confirm`, which lets batch
/// callers and tests answer without a terminal.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> Result<bool>,
{
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        self(prompt)
    }
}

/// True only for exactly [`AFFIRMATIVE`], once the line terminator is removed.
pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.strip_suffix('\n').unwrap_or(answer);
    let answer = answer.strip_suffix('\r').unwrap_or(answer);
    answer == AFFIRMATIVE
}

/// Prompts on a writer and reads one line of answer from a reader.
pub struct LineConfirm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for LineConfirm<R, W> {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut answer = String::new();
        // EOF leaves the answer empty, which declines
        self.input.read_line(&mut answer).context("Failed to read confirmation")?;
        debug!("Confirmation answer: {:?}", answer);
        Ok(is_affirmative(&answer))
    }
}

pub fn deletion_prompt(count: usize) -> String {
    format!(
        "Warning IRREVERSIBLE: Remove {} potentially unused image files ('.png' and '.jpg')?\n'y' or 'n': ",
        count
    )
}

/// Deletes every unused image, but only after `confirm` agrees.
///
/// Nothing is asked when there is nothing to delete.
pub fn confirm_and_delete<C>(unused: &UnusedReport, confirm: &mut C) -> Result<DeletionOutcome>
where
    C: Confirm + ?Sized,
{
    if unused.unused_images.is_empty() {
        info!("No unused images to remove");
        return Ok(DeletionOutcome::default());
    }

    if !confirm.confirm(&deletion_prompt(unused.unused_images.len()))? {
        info!("Deletion declined, keeping {} images", unused.unused_images.len());
        return Ok(DeletionOutcome { confirmed: false, deleted: Vec::new() });
    }

    let mut deleted = Vec::with_capacity(unused.unused_images.len());
    for path in &unused.unused_images {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
        info!("Removed {}", path.display());
        deleted.push(path.clone());
    }
    Ok(DeletionOutcome { confirmed: true, deleted })
}
