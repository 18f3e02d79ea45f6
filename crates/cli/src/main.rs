//! Thriftbox CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! tb-cli migrate
//!
//! # Create a demo store with a few listed products
//! tb-cli seed --slug attic-finds --seller 1
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations and create the session table
//! - `seed` - Create a demo store with listed, stocked products

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "tb-cli")]
#[command(author, version, about = "Thriftbox CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed a demo store
    Seed {
        /// Store slug (lowercase letters, digits and dashes)
        #[arg(short, long)]
        slug: String,

        /// Seller user ID that owns the store
        #[arg(long)]
        seller: i32,

        /// Store display name (defaults to the slug)
        #[arg(short, long)]
        name: Option<String>,
    },
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
        Commands::Seed { slug, seller, name } => {
            commands::seed::demo_store(&slug, seller, name.as_deref()).await?;
        }
    }
    Ok(())
}
