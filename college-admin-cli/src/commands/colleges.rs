//! list / districts / show / add / edit / delete

use anyhow::{anyhow, Result};
use clap::{Args, Parser};
use college_admin_core::view::FormField;
use college_admin_core::{Intent, Outcome, ProgramRow, View, DELETE_CONFIRMATION};

use super::{report, GlobalOpts, Panel};
use crate::{prompt, render, ui};

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Case-insensitive match on name, address or program name
    #[arg(long, short)]
    pub search: Option<String>,

    /// Exact district
    #[arg(long, short)]
    pub district: Option<String>,

    /// JSON output (for piping to jq)
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct DistrictsArgs {
    /// JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// College ID
    pub id: String,

    /// JSON output
    #[arg(long)]
    pub json: bool,
}

/// Form fields shared by `add` and `edit`; omitted fields are left as they are
#[derive(Args, Debug, Default)]
pub struct CollegeFields {
    /// College name
    #[arg(long)]
    pub name: Option<String>,

    /// District
    #[arg(long)]
    pub district: Option<String>,

    /// Street address
    #[arg(long)]
    pub address: Option<String>,

    /// Google Maps link
    #[arg(long, value_name = "URL")]
    pub map_link: Option<String>,

    /// Embeddable map URL
    #[arg(long, value_name = "URL")]
    pub embed_url: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long, value_name = "URL")]
    pub website: Option<String>,

    /// Program row, e.g. "name=CS;cutoff=90;eligibility=PUC;medium=English" (repeatable, replaces existing programs)
    #[arg(long = "program", value_name = "SPEC")]
    pub programs: Vec<ProgramRow>,

    /// Facility to tick (repeatable, replaces existing facilities)
    #[arg(long = "facility", value_name = "NAME")]
    pub facilities: Vec<String>,

    /// Remove every program
    #[arg(long, conflicts_with = "programs")]
    pub clear_programs: bool,

    /// Untick every facility
    #[arg(long, conflicts_with = "facilities")]
    pub clear_facilities: bool,
}

#[derive(Parser, Debug)]
pub struct AddArgs {
    #[command(flatten)]
    pub fields: CollegeFields,
}

#[derive(Parser, Debug)]
pub struct EditArgs {
    /// College ID
    pub id: String,

    #[command(flatten)]
    pub fields: CollegeFields,
}

#[derive(Parser, Debug)]
pub struct DeleteArgs {
    /// College ID
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(long, short)]
    pub yes: bool,
}

pub async fn run_list(opts: &GlobalOpts, args: ListArgs) -> Result<()> {
    let mut panel = Panel::open(opts)?;
    panel.require_session().await?;

    if let Some(search) = args.search {
        panel.ctl.dispatch(Intent::SearchChanged(search)).await;
    }
    panel
        .ctl
        .dispatch(Intent::DistrictChanged(args.district))
        .await;

    let snapshot = panel.ctl.snapshot();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot.visible)?);
    } else {
        print!("{}", render::college_list(&snapshot));
    }
    Ok(())
}

pub async fn run_districts(opts: &GlobalOpts, args: DistrictsArgs) -> Result<()> {
    let mut panel = Panel::open(opts)?;
    panel.require_session().await?;

    let districts = panel.ctl.snapshot().districts;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&districts)?);
    } else {
        for district in districts {
            println!("{}", district);
        }
    }
    Ok(())
}

pub async fn run_show(opts: &GlobalOpts, args: ShowArgs) -> Result<()> {
    let mut panel = Panel::open(opts)?;
    panel.require_session().await?;

    let pb = ui::spinner(format!("Fetching {}...", args.id));
    let fetched = panel.ctl.fetch_college(&args.id).await;
    ui::finish(pb);

    let Some(college) = fetched else {
        return report(&mut panel.ctl, Outcome::Failed, true);
    };
    if args.json {
        println!("{}", serde_json::to_string_pretty(&college)?);
    } else {
        print!("{}", render::college_detail(&college));
    }
    Ok(())
}

pub async fn run_add(opts: &GlobalOpts, args: AddArgs) -> Result<()> {
    let mut panel = Panel::open(opts)?;
    panel.require_session().await?;

    panel.ctl.dispatch(Intent::Navigate(View::Form)).await;
    fill_form(&mut panel, args.fields).await?;
    submit(&mut panel).await
}

pub async fn run_edit(opts: &GlobalOpts, args: EditArgs) -> Result<()> {
    let mut panel = Panel::open(opts)?;
    panel.require_session().await?;

    let pb = ui::spinner(format!("Loading {}...", args.id));
    let outcome = panel.ctl.dispatch(Intent::Edit(args.id)).await;
    ui::finish(pb);
    report(&mut panel.ctl, outcome, true)?;

    fill_form(&mut panel, args.fields).await?;
    submit(&mut panel).await
}

pub async fn run_delete(opts: &GlobalOpts, args: DeleteArgs) -> Result<()> {
    let mut panel = Panel::open(opts)?;
    panel.require_session().await?;

    let confirmed = prompt::confirm(DELETE_CONFIRMATION, args.yes)?;
    let pb = ui::spinner(format!("Deleting {}...", args.id));
    let outcome = panel
        .ctl
        .dispatch(Intent::Delete {
            id: args.id,
            confirmed,
        })
        .await;
    ui::finish(pb);

    if outcome == Outcome::Skipped {
        println!("Delete cancelled");
    }
    report(&mut panel.ctl, outcome, false)
}

async fn submit(panel: &mut Panel) -> Result<()> {
    let pb = ui::spinner("Saving college...");
    let outcome = panel.ctl.dispatch(Intent::SubmitForm).await;
    ui::finish(pb);
    report(&mut panel.ctl, outcome, false)
}

/// Apply the given fields to the controller's form
async fn fill_form(panel: &mut Panel, fields: CollegeFields) -> Result<()> {
    let known = panel.config.facilities();
    let facilities = fields
        .facilities
        .iter()
        .map(|raw| resolve_facility(&known, raw))
        .collect::<Result<Vec<_>>>()?;

    let text_fields = [
        (FormField::Name, fields.name),
        (FormField::District, fields.district),
        (FormField::Address, fields.address),
        (FormField::MapLink, fields.map_link),
        (FormField::EmbedUrl, fields.embed_url),
        (FormField::Phone, fields.phone),
        (FormField::Email, fields.email),
        (FormField::Website, fields.website),
    ];
    for (field, value) in text_fields {
        if let Some(value) = value {
            panel.ctl.dispatch(Intent::SetField(field, value)).await;
        }
    }

    if fields.clear_programs || !fields.programs.is_empty() {
        panel.ctl.form_mut().programs.replace(fields.programs);
    }

    if fields.clear_facilities || !facilities.is_empty() {
        panel.ctl.form_mut().clear_facilities();
        for facility in facilities {
            panel
                .ctl
                .dispatch(Intent::ToggleFacility {
                    facility,
                    checked: true,
                })
                .await;
        }
    }
    Ok(())
}

/// Map user input onto a known facility name, ignoring case
fn resolve_facility(known: &[String], raw: &str) -> Result<String> {
    let wanted = raw.trim();
    known
        .iter()
        .find(|f| f.eq_ignore_ascii_case(wanted))
        .cloned()
        .ok_or_else(|| {
            anyhow!(
                "Unknown facility '{}'. Known facilities: {}",
                wanted,
                known.join(", ")
            )
        })
}
