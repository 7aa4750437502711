use ditto::{
    bot,
    config::{database, settings},
    errors::{Error, Result},
};
use dotenvy::dotenv;
use std::{env, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars may also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load bot settings
    let app_config = settings::load_app_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // 4. Connect to the database and make sure the tables exist
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Run the bot
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, Arc::new(app_config), db).await
}
