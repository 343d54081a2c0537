//! college-admin - command-line admin panel for the colleges API
//!
//! Log in once, then list, inspect, add, edit, delete and export college
//! records. The session is saved under `~/.college-admin/` until `logout`.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

mod commands;
mod prompt;
mod render;
mod tracing_setup;
mod ui;

use commands::colleges::{AddArgs, DeleteArgs, DistrictsArgs, EditArgs, ListArgs, ShowArgs};
use commands::export::ExportArgs;
use commands::session::{LoginArgs, StatusArgs};
use commands::GlobalOpts;
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "college-admin",
    author,
    version,
    about = "Admin panel for the colleges API",
    long_about = "Manage college records (programs, facilities, contact details) against the \
                  colleges API. Credentials are validated on login and reused until logout."
)]
struct Cli {
    /// Colleges API base URL (overrides COLLEGE_API_URL and the config file)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Suppress progress spinners (for scripts)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate credentials against the API and save the session
    Login(LoginArgs),
    /// Forget the saved session
    Logout,
    /// Show API URL, config location and session state
    Status(StatusArgs),
    /// List colleges, optionally filtered by search text and district
    List(ListArgs),
    /// List the distinct districts present in the data
    Districts(DistrictsArgs),
    /// Show every field of one college
    Show(ShowArgs),
    /// Add a new college
    Add(AddArgs),
    /// Edit an existing college
    Edit(EditArgs),
    /// Delete a college (asks for confirmation)
    Delete(DeleteArgs),
    /// Download every college as colleges-export.xlsx
    Export(ExportArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env before parsing so env-backed flags see it
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    tracing_setup::init(&TracingConfig { debug: cli.debug }).ok();
    ui::init_quiet_mode(cli.quiet);

    let opts = GlobalOpts {
        api_url: cli.api_url,
    };

    match cli.command {
        Commands::Login(args) => commands::run_login(&opts, args).await,
        Commands::Logout => commands::run_logout(&opts).await,
        Commands::Status(args) => commands::run_status(&opts, args).await,
        Commands::List(args) => commands::run_list(&opts, args).await,
        Commands::Districts(args) => commands::run_districts(&opts, args).await,
        Commands::Show(args) => commands::run_show(&opts, args).await,
        Commands::Add(args) => commands::run_add(&opts, args).await,
        Commands::Edit(args) => commands::run_edit(&opts, args).await,
        Commands::Delete(args) => commands::run_delete(&opts, args).await,
        Commands::Export(args) => commands::run_export(&opts, args).await,
        Commands::Completions(args) => run_completions(args),
    }
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());
    Ok(())
}
