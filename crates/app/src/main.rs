use std::{sync::Arc, time::Duration};

use clap::Parser;
use migration::{Migrator, MigratorTrait};
use server::{ChatPolicy, HttpCompletion, ServerState};
use settings::Database;

mod settings;

#[derive(Debug, Parser)]
#[command(name = "spendwise", version)]
struct Args {
    /// Settings file path (TOML), without or with extension.
    #[arg(long, default_value = "settings")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();
    let settings = settings::Settings::new(&args.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "spendwise={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.server.database).await?;
    let engine = engine::Engine::builder().database(db).build().await?;

    let assistant = match &settings.assistant {
        Some(config) => {
            tracing::info!("Found assistant settings, using model {}", config.model);
            let completion = HttpCompletion::new(
                &config.base_url,
                config.api_key.clone(),
                config.model.clone(),
                Duration::from_secs(config.timeout_secs),
            )?;
            engine::Assistant::new(Some(Arc::new(completion)), config.history_turns)
        }
        None => {
            tracing::info!("No assistant settings, chat replies will be apologies");
            engine::Assistant::offline()
        }
    };

    let chat = ChatPolicy {
        persist_attempts: settings.chat.persist_attempts,
        persist_backoff: Duration::from_millis(settings.chat.persist_backoff_ms),
    };

    let bind = settings
        .server
        .bind
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    server::run_with_listener(ServerState::new(engine, assistant, chat), listener).await?;
    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    tracing::info!("Database ready");
    Ok(database)
}
