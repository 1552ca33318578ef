//! Interactive prompts using dialoguer

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Select};

/// Prompt user to confirm proceeding with an action
pub fn confirm_step(message: &str) -> Result<bool> {
    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(message)
        .default(true)
        .interact()?;
    Ok(confirmed)
}

/// Ask before fitting `n_candidates` configurations on `n_folds` folds each
pub fn confirm_search(n_candidates: usize, n_folds: usize) -> Result<bool> {
    let message = format!(
        "Fit {} candidates x {} folds ({} forests) plus the final refit?",
        n_candidates,
        n_folds,
        n_candidates * n_folds
    );
    confirm_step(&message)
}

/// Let the user pick the target column
pub fn select_target(columns: &[String]) -> Result<String> {
    let index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Select the target (production) column")
        .items(columns)
        .default(0)
        .interact()?;
    Ok(columns[index].clone())
}
