//! homie CLI - Smart home device catalog
//!
//! This is the main entry point for the homie command-line tool, which provides:
//! - The catalog HTTP API server (`serve`)
//! - Schema bootstrap for PostgreSQL (`init-db`)
//! - Admin commands against a running API (`categories`, `devices`)

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

use commands::catalog::{CategoriesArgs, DevicesArgs};
use commands::init_db::InitDbArgs;
use commands::serve::ServeArgs;
use tracing_setup::{init_tracing, TracingConfig};

#[derive(Parser, Debug)]
#[command(
    name = "homie",
    author,
    version,
    about = "Smart home device catalog with categories",
    long_about = "Serve a REST API over a PostgreSQL catalog of devices and categories, \
                  and manage the catalog from the command line."
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the catalog HTTP API
    Serve(ServeArgs),
    /// Create catalog tables if they do not exist
    InitDb(InitDbArgs),
    /// Manage categories via the API
    Categories(CategoriesArgs),
    /// Manage devices via the API
    Devices(DevicesArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::InitDb(args) => commands::run_init_db(args).await?,
        Commands::Categories(args) => commands::run_categories(args).await?,
        Commands::Devices(args) => commands::run_devices(args).await?,
    }

    Ok(())
}
