//! Create the catalog tables

use anyhow::{Context, Result};
use clap::Parser;

use homie_server::db::{create_pool, schema};

/// Arguments for the init-db command
#[derive(Parser, Debug)]
pub struct InitDbArgs {
    /// Database URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,
}

pub async fn run_init_db(args: InitDbArgs) -> Result<()> {
    let pool = create_pool(&args.database_url)
        .await
        .context("Failed to create database pool")?;

    schema::ensure(&pool)
        .await
        .context("Failed to create catalog tables")?;

    println!("Catalog tables ready");
    Ok(())
}
