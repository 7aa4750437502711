//! Global command check enforcing the per-user cooldown.

use crate::{
    bot::BotData,
    core::cooldown::{CooldownCheck, relative_timestamp},
    errors::{Error, Result},
};
use chrono::Utc;
use tracing::debug;

/// Sent when the bot can post messages but not embeds.
pub const EMBED_LINKS_REQUIRED: &str = "I require `embed_links` permission in order to function properly. Please give me that permission and try again.";

/// Runs before every command. Rejects top-level commands from users still on cooldown.
///
/// Subcommands always pass so a group invocation does not block its own subcommand.
pub async fn cooldown_check(ctx: poise::Context<'_, BotData, Error>) -> Result<bool> {
    let is_subcommand = !ctx.parent_commands().is_empty();
    let user_id = ctx.author().id.get();

    let check = ctx
        .data()
        .cooldowns
        .check(user_id, is_subcommand, Utc::now());

    let CooldownCheck::OnCooldown { until } = check else {
        return Ok(true);
    };

    if let Err(e) = ctx
        .say(format!("Command on cooldown for {}", relative_timestamp(until)))
        .await
    {
        debug!(error = %e, "Could not send cooldown notice");
    }
    Ok(false)
}
