//! Ecoleta CLI - Database migrations, catalog seeding and point registration.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! eco-cli migrate
//!
//! # Seed the built-in item catalog
//! eco-cli seed items
//!
//! # Seed the item catalog from a YAML file
//! eco-cli seed items --file catalog.yaml
//!
//! # Register a collection point through the API
//! eco-cli point create --name "Mercado Verde" --email contato@mercadoverde.com.br \
//!     --whatsapp 11999990000 --number 120 --state SP --city Diadema \
//!     --latitude -23.686 --longitude -46.622 --items 1,2
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed items` - Upsert the item catalog
//! - `point create` - Register a point via the API

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "eco-cli")]
#[command(author, version, about = "Ecoleta CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed reference data
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Manage collection points
    Point {
        #[command(subcommand)]
        action: PointAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Upsert the item catalog
    Items {
        /// YAML file with a list of `{title, image}` entries
        #[arg(short, long)]
        file: Option<String>,
    },
}

#[derive(Subcommand)]
enum PointAction {
    /// Register a new collection point through the API
    Create(commands::point::CreateArgs),
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Items { file } => commands::seed::items(file.as_deref()).await?,
        },
        Commands::Point { action } => match action {
            PointAction::Create(args) => commands::point::create(args).await?,
        },
    }
    Ok(())
}
