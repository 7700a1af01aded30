//! Catalog admin commands - manage categories and devices via the HTTP API
//!
//! Commands: categories (list, add, rename, rm), devices (list, show, add,
//! edit, rm, search)
//!
//! ```bash
//! homie categories add "Küche"
//! homie devices add --name Lampe --type Licht --power 60 --room Küche --category 1 --image lampe
//! homie devices search lampe --json | jq '.[].name'
//! ```
//!
//! Listing degrades to an empty result when the API cannot be reached;
//! writes report the server's error and fail.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use homie_server::models::image::resolve_image;
use homie_server::models::{Category, Device};

/// Default API endpoint (matches the server's default bind address)
const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:3030";

// ============================================================================
// Shared Args
// ============================================================================

#[derive(Parser, Debug)]
pub struct ClientArgs {
    /// Catalog API endpoint
    #[arg(long, env = "HOMIE_ENDPOINT", default_value = DEFAULT_ENDPOINT, global = true)]
    pub endpoint: String,

    /// Output format
    #[arg(long, short, value_enum, default_value = "human", global = true)]
    pub output: OutputFormat,

    /// Shorthand for --output json
    #[arg(long, conflicts_with = "output", global = true)]
    pub json: bool,
}

impl ClientArgs {
    fn format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.output
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint.trim_end_matches('/'), path)
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output (for piping to jq)
    Json,
}

// ============================================================================
// Category Commands
// ============================================================================

#[derive(Parser, Debug)]
pub struct CategoriesArgs {
    #[command(flatten)]
    pub client: ClientArgs,

    #[command(subcommand)]
    pub command: CategoryCommands,
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// List categories with device counts
    List,
    /// Create a category
    Add {
        /// Category name
        name: String,
    },
    /// Rename a category
    Rename {
        /// Category id
        id: i64,
        /// New name
        name: String,
    },
    /// Delete a category (fails while devices link to it)
    Rm {
        /// Category id
        id: i64,
    },
}

// ============================================================================
// Device Commands
// ============================================================================

#[derive(Parser, Debug)]
pub struct DevicesArgs {
    #[command(flatten)]
    pub client: ClientArgs,

    #[command(subcommand)]
    pub command: DeviceCommands,
}

#[derive(Subcommand, Debug)]
pub enum DeviceCommands {
    /// List devices with their categories
    List,
    /// Show one device
    Show {
        /// Device id
        id: i64,
    },
    /// Create a device
    Add(DeviceFields),
    /// Overwrite a device, replacing its categories
    Edit {
        /// Device id
        id: i64,
        #[command(flatten)]
        fields: DeviceFields,
    },
    /// Delete a device
    Rm {
        /// Device id
        id: i64,
    },
    /// Search by text and power range
    Search(SearchArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct DeviceFields {
    /// Device name
    #[arg(long)]
    pub name: String,

    /// Device type (e.g. Licht, Heizung)
    #[arg(long = "type")]
    pub kind: String,

    /// Power draw in watts
    #[arg(long)]
    pub power: f64,

    /// Room the device is in
    #[arg(long)]
    pub room: String,

    /// Category id (repeatable)
    #[arg(long = "category", required = true)]
    pub categories: Vec<i64>,

    /// Image name or path; bare names resolve under images/ with .png
    #[arg(long, default_value = "")]
    pub image: String,
}

#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Text matched against name, type, room and category names
    #[arg(default_value = "")]
    pub query: String,

    /// Minimum power in watts
    #[arg(long)]
    pub power_min: Option<f64>,

    /// Maximum power in watts
    #[arg(long)]
    pub power_max: Option<f64>,
}

/// Body of device create/update requests
#[derive(Debug, Serialize, PartialEq)]
struct DeviceBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<i64>,
    name: String,
    #[serde(rename = "type")]
    kind: String,
    power: f64,
    room: String,
    categories: Vec<i64>,
    image: String,
}

impl DeviceBody {
    fn new(id: Option<i64>, fields: DeviceFields) -> Self {
        Self {
            id,
            name: fields.name,
            kind: fields.kind,
            power: fields.power,
            room: fields.room,
            categories: fields.categories,
            image: resolve_image(&fields.image),
        }
    }
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

#[derive(Debug, Deserialize)]
struct CreatedResponse {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    message: String,
}

// ============================================================================
// Entry Points
// ============================================================================

pub async fn run_categories(args: CategoriesArgs) -> Result<()> {
    let client = build_client()?;
    let api = &args.client;

    match args.command {
        CategoryCommands::List => {
            let categories: Vec<Category> =
                fetch_or_empty(&client, &api.url("/categories"), "categories").await;
            print_categories(&categories, api.format())
        }
        CategoryCommands::Add { name } => {
            let response = client
                .post(api.url("/categories"))
                .json(&serde_json::json!({ "name": name }))
                .send()
                .await
                .context("Failed to connect to catalog API")?;
            let created: CreatedResponse = handle_response(response).await?;
            println!("Created category {}", created.id);
            Ok(())
        }
        CategoryCommands::Rename { id, name } => {
            let response = client
                .put(api.url("/categories"))
                .json(&serde_json::json!({ "id": id, "name": name }))
                .send()
                .await
                .context("Failed to connect to catalog API")?;
            let done: MessageResponse = handle_response(response).await?;
            println!("{}", done.message);
            Ok(())
        }
        CategoryCommands::Rm { id } => {
            let response = client
                .delete(api.url("/categories"))
                .json(&serde_json::json!({ "id": id }))
                .send()
                .await
                .context("Failed to connect to catalog API")?;
            let done: MessageResponse = handle_response(response).await?;
            println!("{}", done.message);
            Ok(())
        }
    }
}

pub async fn run_devices(args: DevicesArgs) -> Result<()> {
    let client = build_client()?;
    let api = &args.client;

    match args.command {
        DeviceCommands::List => {
            let devices: Vec<Device> =
                fetch_or_empty(&client, &api.url("/devices"), "devices").await;
            print_devices(&devices, api.format())
        }
        DeviceCommands::Show { id } => {
            let response = client
                .get(api.url(&format!("/devices/{}", id)))
                .send()
                .await
                .context("Failed to connect to catalog API")?;
            let device: Device = handle_response(response).await?;
            print_devices(std::slice::from_ref(&device), api.format())
        }
        DeviceCommands::Add(fields) => {
            let body = DeviceBody::new(None, fields);
            let response = client
                .post(api.url("/devices"))
                .json(&body)
                .send()
                .await
                .context("Failed to connect to catalog API")?;
            let created: CreatedResponse = handle_response(response).await?;
            println!("Created device {} ({})", created.id, body.image);
            Ok(())
        }
        DeviceCommands::Edit { id, fields } => {
            let body = DeviceBody::new(Some(id), fields);
            let response = client
                .put(api.url("/devices"))
                .json(&body)
                .send()
                .await
                .context("Failed to connect to catalog API")?;
            let done: MessageResponse = handle_response(response).await?;
            println!("{}", done.message);
            Ok(())
        }
        DeviceCommands::Rm { id } => {
            let response = client
                .delete(api.url("/devices"))
                .json(&serde_json::json!({ "id": id }))
                .send()
                .await
                .context("Failed to connect to catalog API")?;
            let done: MessageResponse = handle_response(response).await?;
            println!("{}", done.message);
            Ok(())
        }
        DeviceCommands::Search(search) => {
            let response = client
                .get(api.url("/devices/search"))
                .query(&search_query(&search))
                .send()
                .await
                .context("Failed to connect to catalog API")?;
            let devices: Vec<Device> = handle_response(response).await?;
            print_devices(&devices, api.format())
        }
    }
}

// ============================================================================
// HTTP Client Helpers
// ============================================================================

fn build_client() -> Result<Client> {
    Client::builder()
        .build()
        .context("Failed to build HTTP client")
}

async fn handle_response<T: for<'de> Deserialize<'de>>(response: reqwest::Response) -> Result<T> {
    let status = response.status();

    if status.is_success() {
        response.json::<T>().await.context("Failed to parse response")
    } else {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        if let Ok(error_resp) = serde_json::from_str::<ErrorResponse>(&error_text) {
            Err(anyhow!(
                "{}: {} ({})",
                status,
                error_resp.message,
                error_resp.error
            ))
        } else {
            Err(anyhow!("{}: {}", status, error_text))
        }
    }
}

/// Read a collection; any failure degrades to an empty listing.
async fn fetch_or_empty<T: for<'de> Deserialize<'de>>(
    client: &Client,
    url: &str,
    what: &str,
) -> Vec<T> {
    fetch_list(client, url).await.unwrap_or_else(|e| {
        tracing::warn!("Failed to fetch {}: {:#}", what, e);
        Vec::new()
    })
}

async fn fetch_list<T: for<'de> Deserialize<'de>>(client: &Client, url: &str) -> Result<Vec<T>> {
    let response = client
        .get(url)
        .send()
        .await
        .context("Failed to connect to catalog API")?;
    handle_response(response).await
}

fn search_query(search: &SearchArgs) -> Vec<(&'static str, String)> {
    let mut query = vec![("q", search.query.clone())];
    if let Some(min) = search.power_min {
        query.push(("powermin", min.to_string()));
    }
    if let Some(max) = search.power_max {
        query.push(("powermax", max.to_string()));
    }
    query
}

// ============================================================================
// Output
// ============================================================================

fn print_categories(categories: &[Category], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(categories)?),
        OutputFormat::Human => {
            if categories.is_empty() {
                println!("(no categories)");
            }
            for category in categories {
                println!(
                    "{:>4}  {}  [{} devices]",
                    category.id, category.name, category.device_count
                );
            }
        }
    }
    Ok(())
}

fn print_devices(devices: &[Device], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(devices)?),
        OutputFormat::Human => {
            if devices.is_empty() {
                println!("(no devices)");
            }
            for device in devices {
                let categories: Vec<&str> =
                    device.categories.iter().map(|c| c.name.as_str()).collect();
                println!(
                    "{:>4}  {} ({}, {} W) in {}  [{}]  {}",
                    device.id,
                    device.name,
                    device.kind,
                    device.power,
                    device.room,
                    categories.join(", "),
                    device.image
                );
            }
        }
    }
    Ok(())
}
