//! Lead Intake CLI
//!
//! Command-line host for the lead intake workflow.
//!
//! # Usage
//!
//! ```bash
//! lead-intake new-id --prefix ACME
//! lead-intake validate --company Acme --owner priya --country India \
//!     --contact "Raj,raj@x.com"
//! lead-intake submit --company Acme --owner priya --country India \
//!     --contact "Raj,raj@x.com,+91 98765 43210" --deal-value '$12,500'
//! lead-intake submit ... --dry-run --format json
//! lead-intake config set api_url https://crm.example.com
//! ```

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod output;

#[derive(Parser)]
#[command(name = "lead-intake")]
#[command(author = "OpenSASE")]
#[command(version)]
#[command(about = "Lead Intake Command Line Interface", long_about = None)]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "LEAD_INTAKE_API_BASE")]
    api_url: Option<String>,

    /// Bearer token for the lead service
    #[arg(long, env = "LEAD_INTAKE_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Output format
    #[arg(long, short, default_value = "table")]
    format: output::OutputFormat,

    /// Profile name from config file
    #[arg(long, short)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a freshly generated lead id
    NewId {
        /// Id prefix (defaults to the configured prefix)
        #[arg(long)]
        prefix: Option<String>,
    },
    /// Build a draft and report the first validation failure
    Validate {
        #[command(flatten)]
        draft: commands::DraftArgs,
    },
    /// Build, validate and submit a lead
    Submit {
        #[command(flatten)]
        draft: commands::DraftArgs,
        /// Print the payload instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
    /// Configure CLI
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Set configuration value
    Set { key: String, value: String },
    /// Get configuration value
    Get { key: String },
    /// List all configuration
    List,
    /// Initialize configuration
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let profile = cli.profile.as_deref();
    let format = cli.format;
    let context = || commands::Context::load(profile, cli.api_url.as_deref(), cli.token.clone());

    let result = match cli.command {
        Commands::NewId { prefix } => context().and_then(|ctx| commands::intake::new_id(&ctx, prefix.as_deref(), format)),
        Commands::Validate { draft } => context().and_then(|ctx| commands::intake::validate(&ctx, draft, format)),
        Commands::Submit { draft, dry_run } => match context() {
            Ok(ctx) => commands::intake::submit(&ctx, draft, dry_run, format).await,
            Err(e) => Err(e),
        },
        Commands::Config { action } => commands::config::handle(action, profile).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
