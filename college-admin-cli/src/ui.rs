//! Progress feedback for college-admin
//!
//! Spinners are suppressed when:
//! - `--quiet` flag is passed
//! - `COLLEGE_ADMIN_QUIET=1` environment variable is set
//! - stderr is not a TTY (piped output)

use std::io::IsTerminal;
use std::sync::OnceLock;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

static QUIET_MODE: OnceLock<bool> = OnceLock::new();

/// Call once at startup with the --quiet flag value
pub fn init_quiet_mode(quiet_flag: bool) {
    let env_quiet = std::env::var("COLLEGE_ADMIN_QUIET")
        .map(|v| v == "1")
        .unwrap_or(false);
    QUIET_MODE
        .set(resolve_quiet(quiet_flag, env_quiet, std::io::stderr().is_terminal()))
        .ok();
}

fn resolve_quiet(flag: bool, env: bool, stderr_is_tty: bool) -> bool {
    flag || env || !stderr_is_tty
}

pub fn is_quiet() -> bool {
    *QUIET_MODE.get().unwrap_or(&false)
}

/// A spinner on stderr while a request is in flight; `None` in quiet mode
pub fn spinner(msg: impl Into<String>) -> Option<ProgressBar> {
    if is_quiet() {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
        .template("{spinner:.cyan} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(msg.into());
    pb.enable_steady_tick(Duration::from_millis(80));
    Some(pb)
}

/// Remove the spinner line; notices are printed separately
pub fn finish(pb: Option<ProgressBar>) {
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
}
