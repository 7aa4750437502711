//! Welcome DM for members joining the official server.

use crate::{bot::BotData, errors::Result};
use poise::serenity_prelude as serenity;
use tracing::{info, warn};

/// Framework event handler. Only member joins are handled.
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    framework: poise::FrameworkContext<'_, BotData, crate::errors::Error>,
    data: &BotData,
) -> Result<()> {
    let serenity::FullEvent::GuildMemberAddition { new_member } = event else {
        return Ok(());
    };

    let welcome = &data.config.welcome;
    if !welcome.applies_to(new_member.guild_id.get(), framework.bot_id.get()) {
        return Ok(());
    }

    let embed = serenity::CreateEmbed::new()
        .title(&welcome.title)
        .description(&welcome.description);

    // Members with closed DMs cannot be reached
    match new_member
        .user
        .direct_message(ctx, serenity::CreateMessage::new().embed(embed))
        .await
    {
        Ok(_) => info!(user = %new_member.user.id, "Sent welcome message"),
        Err(e) => warn!(user = %new_member.user.id, error = %e, "Could not send welcome message"),
    }

    Ok(())
}
