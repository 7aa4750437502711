//! Bot layer - Discord-specific interface and command handlers
//!
//! This module wires the framework-agnostic core into poise: slash and prefix commands,
//! the global cooldown check, the member-join listener and interactive views.

/// Discord command implementations (general, missions, economy, pokemon)
pub mod commands;
/// Framework hooks (cooldown check, event listener)
pub mod handlers;
/// Interactive message components (confirm prompts, menus, selects)
pub mod views;

use crate::{
    config::AppConfig,
    core::cooldown::Cooldowns,
    errors::{Error, Result},
};
use chrono::TimeDelta;
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Prefix for text commands in direct messages. In guilds the bot mention is the prefix.
pub const DM_PREFIX: &str = "?";

/// Shared data available to all bot commands.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Settings loaded from config.toml
    pub config: Arc<AppConfig>,
    /// Per-user command cooldowns
    pub cooldowns: Cooldowns,
}

impl BotData {
    /// Creates the shared context, building the cooldown tracker from `config`.
    #[must_use]
    pub fn new(database: DatabaseConnection, config: Arc<AppConfig>) -> Self {
        let window = i64::try_from(config.cooldown.seconds)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX);
        let cooldowns = Cooldowns::new(window, config.cooldown.immune_ids.iter().copied());
        Self {
            database,
            config,
            cooldowns,
        }
    }
}

/// Poise context carrying [`BotData`].
pub type Context<'a> = poise::Context<'a, BotData, Error>;

/// Every command needs these to answer at all.
const REQUIRED_PERMISSIONS: serenity::Permissions =
    serenity::Permissions::SEND_MESSAGES.union(serenity::Permissions::EMBED_LINKS);

/// All commands the bot registers.
#[must_use]
pub fn all_commands() -> Vec<poise::Command<BotData, Error>> {
    let mut commands = vec![
        commands::ping(),
        commands::help(),
        commands::mission(),
        commands::balance(),
        commands::gift(),
        commands::sprite(),
    ];
    require_permissions(&mut commands);
    commands
}

fn require_permissions(commands: &mut [poise::Command<BotData, Error>]) {
    for command in commands {
        command.required_bot_permissions |= REQUIRED_PERMISSIONS;
        require_permissions(&mut command.subcommands);
    }
}

async fn dynamic_prefix(ctx: poise::PartialContext<'_, BotData, Error>) -> Result<Option<String>> {
    Ok(ctx.guild_id.is_none().then(|| DM_PREFIX.to_string()))
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("An error occurred: {error}")).await {
                error!("Failed to send error message: {e}");
            }
        }
        // The cooldown check already told the user
        poise::FrameworkError::CommandCheckFailed { error: None, .. } => {}
        poise::FrameworkError::MissingBotPermissions {
            missing_permissions,
            ctx,
            ..
        } => {
            if missing_permissions.contains(serenity::Permissions::SEND_MESSAGES) {
                return;
            }
            if let Err(e) = ctx.say(handlers::cooldown::EMBED_LINKS_REQUIRED).await {
                error!("Failed to send permission notice: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Builds the framework and runs the bot until the gateway connection ends.
#[instrument(skip(token, config, database))]
pub async fn run_bot(
    token: String,
    config: Arc<AppConfig>,
    database: DatabaseConnection,
) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: all_commands(),
            on_error: |error| Box::pin(on_error(error)),
            command_check: Some(|ctx| Box::pin(handlers::cooldown::cooldown_check(ctx))),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::welcome::event_handler(ctx, event, framework, data))
            },
            prefix_options: poise::PrefixFrameworkOptions {
                dynamic_prefix: Some(|ctx| Box::pin(dynamic_prefix(ctx))),
                mention_as_prefix: true,
                ..Default::default()
            },
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(BotData::new(database, config))
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT
        | serenity::GatewayIntents::GUILD_MEMBERS;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {e:?}"))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {e:?}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[test]
    fn test_all_commands_require_permissions() {
        let commands = all_commands();
        let names: Vec<&str> = commands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["ping", "help", "mission", "balance", "gift", "sprite"]);

        let mission = commands.iter().find(|c| c.name == "mission");
        let subcommands: Vec<&str> = mission
            .map(|c| c.subcommands.iter().map(|s| s.name.as_str()).collect())
            .unwrap_or_default();
        assert_eq!(subcommands, vec!["list", "claim"]);

        for command in commands.iter().chain(commands.iter().flat_map(|c| c.subcommands.iter())) {
            assert!(command.required_bot_permissions.contains(REQUIRED_PERMISSIONS));
        }
    }

    #[tokio::test]
    async fn test_bot_data_uses_configured_cooldown() -> Result<()> {
        let db = setup_test_db().await?;
        let mut config = AppConfig::default();
        config.cooldown.seconds = 10;
        config.cooldown.immune_ids = vec![7];

        let data = BotData::new(db, Arc::new(config));
        assert_eq!(data.cooldowns.window(), TimeDelta::seconds(10));
        assert!(matches!(
            data.cooldowns.check(7, false, chrono::Utc::now()),
            crate::core::cooldown::CooldownCheck::Immune
        ));
        Ok(())
    }
}
