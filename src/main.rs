// src/main.rs
// acplan - floor-plan based air-conditioning recommendation service

use std::time::Duration;

use acplan::config::CONFIG;
use acplan::llm::ChatClient;
use acplan::server;
use acplan::state::AppState;
use acplan::store::{seed, RecordStore};
use anyhow::Result;
use clap::{Parser, Subcommand};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "acplan")]
#[command(about = "Floor-plan based air-conditioning recommendation service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Insert the bundled catalog and reference cases
    Seed,
}

async fn open_store() -> Result<RecordStore> {
    let options =
        SqliteConnectOptions::from_str(&CONFIG.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(CONFIG.sqlite_max_connections)
        .connect_with(options)
        .await?;
    let store = RecordStore::new(pool);
    store.init_schema().await?;
    Ok(store)
}

async fn run_server() -> Result<()> {
    let store = open_store().await?;
    let chat = ChatClient::new(
        CONFIG.chat_endpoint.clone(),
        CONFIG.app_id.clone(),
        Duration::from_secs(CONFIG.request_timeout_secs),
    )?;
    let state = AppState::new(store, chat, CONFIG.admin_password.clone());

    server::run(state, &CONFIG.host, CONFIG.port, &CONFIG.cors_origin).await?;
    Ok(())
}

async fn run_seed() -> Result<()> {
    let store = open_store().await?;
    let (products, cases) = seed::install(&store).await?;
    info!(products, cases, "seed data installed");
    println!("Seeded {products} products and {cases} cases");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        None | Some(Commands::Serve) => run_server().await?,
        Some(Commands::Seed) => run_seed().await?,
    }

    Ok(())
}
