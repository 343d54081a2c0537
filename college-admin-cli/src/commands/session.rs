//! login / logout / status

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use college_admin_core::{AdminConfig, CredentialStore, Intent, Outcome};
use serde::Serialize;

use super::{report, GlobalOpts, Panel};
use crate::{prompt, ui};

#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// Admin username (prompted when omitted)
    #[arg(long, short, env = "COLLEGE_ADMIN_USERNAME")]
    pub username: Option<String>,

    /// Admin password (prompted when omitted)
    #[arg(long, short, env = "COLLEGE_ADMIN_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Check the saved credentials against the API
    #[arg(long)]
    pub verify: bool,

    /// JSON output (for piping to jq)
    #[arg(long)]
    pub json: bool,
}

pub async fn run_login(opts: &GlobalOpts, args: LoginArgs) -> Result<()> {
    let username = prompt::username(args.username)?;
    let password = prompt::password(args.password)?;

    let mut panel = Panel::open(opts)?;
    let pb = ui::spinner(format!("Logging in as {}...", username));
    let outcome = panel
        .ctl
        .dispatch(Intent::Login { username, password })
        .await;
    ui::finish(pb);

    if outcome == Outcome::Failed {
        let snapshot = panel.ctl.snapshot();
        if let Some(message) = snapshot.login_error {
            return Err(anyhow!(message));
        }
    }
    report(&mut panel.ctl, outcome, false)
}

pub async fn run_logout(opts: &GlobalOpts) -> Result<()> {
    let mut panel = Panel::open(opts)?;
    let outcome = panel.ctl.dispatch(Intent::Logout).await;
    report(&mut panel.ctl, outcome, false)
}

#[derive(Debug, Serialize)]
struct StatusReport {
    api_base_url: String,
    config_path: String,
    session_path: String,
    username: Option<String>,
    /// `None` unless `--verify` was passed
    verified: Option<bool>,
}

pub async fn run_status(opts: &GlobalOpts, args: StatusArgs) -> Result<()> {
    let mut panel = Panel::open(opts)?;
    let stored = panel
        .ctl
        .store()
        .load()
        .context("Failed to read saved session")?;

    let verified = if args.verify && stored.is_some() {
        let pb = ui::spinner("Verifying saved credentials...");
        let outcome = panel.ctl.resume_session().await;
        ui::finish(pb);
        panel.ctl.take_notices();
        Some(outcome == Outcome::Done)
    } else {
        None
    };

    let status = StatusReport {
        api_base_url: panel.config.api_base_url(opts.api_url.as_deref()),
        config_path: AdminConfig::config_path().display().to_string(),
        session_path: panel.ctl.store().path().display().to_string(),
        username: stored.map(|c| c.username),
        verified,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("┌─ college-admin");
    println!("│  API:     {}", status.api_base_url);
    println!("│  Config:  {}", status.config_path);
    println!("│  Session: {}", status.session_path);
    match (&status.username, status.verified) {
        (None, _) => println!("└─ Not logged in"),
        (Some(user), None) => println!("└─ Logged in as {}", user),
        (Some(user), Some(true)) => println!("└─ Logged in as {} (verified)", user),
        (Some(user), Some(false)) => {
            println!("└─ Saved session for {} could not be verified and was cleared", user)
        }
    }
    Ok(())
}
