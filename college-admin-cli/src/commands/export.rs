//! export: download the spreadsheet of every college

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use college_admin_core::Intent;

use super::{report, GlobalOpts, Panel};
use crate::ui;

#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Directory to write colleges-export.xlsx into
    #[arg(long, short, default_value = ".")]
    pub dir: PathBuf,
}

pub async fn run_export(opts: &GlobalOpts, args: ExportArgs) -> Result<()> {
    if !args.dir.is_dir() {
        bail!("Not a directory: {}", args.dir.display());
    }

    let mut panel = Panel::open(opts)?;
    panel.require_session().await?;

    let pb = ui::spinner("Downloading export...");
    let outcome = panel
        .ctl
        .dispatch(Intent::Export {
            dir: args.dir.clone(),
        })
        .await;
    ui::finish(pb);

    report(&mut panel.ctl, outcome, false)?;
    println!(
        "  {}",
        args.dir.join(college_admin_core::EXPORT_FILENAME).display()
    );
    Ok(())
}
