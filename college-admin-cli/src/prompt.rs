//! Interactive prompts for missing login fields and delete confirmation
//!
//! Prompts only run on an interactive TTY. Otherwise the caller gets an
//! error naming the flag that would have avoided the prompt.

use std::io::IsTerminal;

use anyhow::{bail, Context, Result};
use inquire::{Confirm, Password, PasswordDisplayMode, Text};

/// Whether stdin and stdout are both attached to a terminal
pub fn can_prompt() -> bool {
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}

pub fn username(provided: Option<String>) -> Result<String> {
    if let Some(username) = provided.filter(|u| !u.trim().is_empty()) {
        return Ok(username);
    }
    if !can_prompt() {
        bail!("Username required. Use --username or COLLEGE_ADMIN_USERNAME");
    }
    Text::new("Username:")
        .with_help_message("Admin account for the colleges API")
        .prompt()
        .context("Failed to get username")
}

pub fn password(provided: Option<String>) -> Result<String> {
    if let Some(password) = provided {
        return Ok(password);
    }
    if !can_prompt() {
        bail!("Password required. Use --password or COLLEGE_ADMIN_PASSWORD");
    }
    Password::new("Password:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to get password")
}

/// Ask `question`; `--yes` answers it up front
pub fn confirm(question: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    if !can_prompt() {
        bail!("Refusing to delete without confirmation. Pass --yes to skip the prompt");
    }
    Confirm::new(question)
        .with_default(false)
        .prompt()
        .context("Failed to get confirmation")
}
