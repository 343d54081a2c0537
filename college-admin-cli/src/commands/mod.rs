//! Command implementations for college-admin
//!
//! Every command builds an [`AdminController`] over the HTTP API and the
//! on-disk credential store, runs one or more flows, then prints the
//! notices those flows raised.

pub mod colleges;
pub mod export;
pub mod session;

use anyhow::{anyhow, Context, Result};
use college_admin_core::{
    AdminConfig, AdminController, FileCredentialStore, HttpCollegeApi, NoticeLevel, Outcome,
};
use tracing::debug;

use crate::ui;

pub use colleges::{run_add, run_delete, run_districts, run_edit, run_list, run_show};
pub use export::run_export;
pub use session::{run_login, run_logout, run_status};

pub type Controller = AdminController<HttpCollegeApi, FileCredentialStore>;

/// Options every command shares
#[derive(Debug, Clone, Default)]
pub struct GlobalOpts {
    pub api_url: Option<String>,
}

/// Loaded config plus a controller wired to it
pub struct Panel {
    pub config: AdminConfig,
    pub ctl: Controller,
}

impl Panel {
    pub fn open(opts: &GlobalOpts) -> Result<Self> {
        let config = AdminConfig::load().context("Failed to load configuration")?;
        let base_url = config.api_base_url(opts.api_url.as_deref());
        let state_dir = config.state_dir();
        debug!(base_url = %base_url, state_dir = %state_dir.display(), "opening panel");

        let api = HttpCollegeApi::new(base_url);
        let store = FileCredentialStore::in_dir(&state_dir);
        Ok(Self {
            config,
            ctl: AdminController::new(api, store),
        })
    }

    /// Restore the saved session; commands other than login need one
    pub async fn require_session(&mut self) -> Result<()> {
        let pb = ui::spinner("Restoring session...");
        let outcome = self.ctl.resume_session().await;
        ui::finish(pb);

        match outcome {
            Outcome::Done => {
                // A failed list load still leaves a usable session
                warn_errors(&mut self.ctl);
                Ok(())
            }
            Outcome::Skipped => Err(anyhow!(
                "Not logged in. Run `college-admin login` first"
            )),
            Outcome::Failed => report(&mut self.ctl, outcome, true),
        }
    }
}

/// Print pending notices and turn a failed flow into an error
///
/// Error notices become the returned error's message. Other notices go to
/// stdout unless the command is printing data there.
pub fn report(ctl: &mut Controller, outcome: Outcome, data_output: bool) -> Result<()> {
    let mut errors = Vec::new();
    for notice in ctl.take_live_notices() {
        match notice.level {
            NoticeLevel::Error => errors.push(notice.message),
            NoticeLevel::Success | NoticeLevel::Info if !data_output => {
                println!("✓ {}", notice.message)
            }
            _ => {}
        }
    }

    match outcome {
        Outcome::Failed if errors.is_empty() => Err(anyhow!("Operation failed")),
        Outcome::Failed => Err(anyhow!(errors.join("; "))),
        Outcome::Done | Outcome::Skipped => {
            for message in errors {
                eprintln!("✗ {}", message);
            }
            Ok(())
        }
    }
}

/// Drain notices, echoing only errors to stderr
fn warn_errors(ctl: &mut Controller) {
    for notice in ctl.take_live_notices() {
        if notice.level == NoticeLevel::Error {
            eprintln!("✗ {}", notice.message);
        }
    }
}
