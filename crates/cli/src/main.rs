//! Case Desk CLI - list, open, and update support cases from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # List a contact's cases
//! case-desk list --contact 0035e00000AbCdE
//!
//! # Open a case
//! case-desk create --contact 0035e00000AbCdE --subject "Projector broken"
//!
//! # Close a case
//! case-desk update-status --contact 0035e00000AbCdE --case 5005e00000XyZ --status Closed
//! ```
//!
//! # Environment Variables
//!
//! - `CASEDESK_SERVER_URL` - Base URL of the Case Desk server

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "case-desk")]
#[command(author, version, about = "Case Desk command-line client")]
struct Cli {
    /// Base URL of the Case Desk server
    #[arg(
        long,
        global = true,
        env = "CASEDESK_SERVER_URL",
        default_value = "http://127.0.0.1:3000"
    )]
    server_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List a contact's cases
    List {
        /// Contact ID
        #[arg(short, long)]
        contact: String,
    },
    /// Open a case for a contact
    Create {
        /// Contact ID
        #[arg(short, long)]
        contact: String,

        /// Case subject
        #[arg(short, long)]
        subject: String,
    },
    /// Change a case's status
    UpdateStatus {
        /// Contact ID the case belongs to
        #[arg(long)]
        contact: String,

        /// Case ID
        #[arg(long = "case")]
        case_id: String,

        /// New status (New, Working, Escalated, Closed)
        #[arg(short, long)]
        status: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::List { contact } => commands::cases::list(&cli.server_url, &contact).await,
        Commands::Create { contact, subject } => {
            commands::cases::create(&cli.server_url, &contact, &subject).await
        }
        Commands::UpdateStatus {
            contact,
            case_id,
            status,
        } => commands::cases::update_status(&cli.server_url, &contact, &case_id, &status).await,
    }
}
