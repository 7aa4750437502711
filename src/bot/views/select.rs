//! Drop-down selection over a list of strings.

use crate::{bot::Context, bot::views::menu::NOT_ALLOWED, errors::Result};
use poise::serenity_prelude as serenity;
use serenity::{
    ComponentInteractionCollector, ComponentInteractionDataKind, CreateActionRow,
    CreateInteractionResponse, CreateInteractionResponseMessage, CreateSelectMenu,
    CreateSelectMenuKind, CreateSelectMenuOption, EditMessage,
};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Discord rejects select menus with more options than this.
pub const MAX_OPTIONS: usize = 25;

const SELECT_ID: &str = "list_select";

/// Asks the invoker to pick one of `options`.
///
/// Returns the chosen option, or `None` when nobody chose within `timeout`. Options past
/// the 25th are dropped. The drop-down is removed once the question is over.
pub async fn choose(
    ctx: Context<'_>,
    content: &str,
    options: &[String],
    timeout: Duration,
) -> Result<Option<String>> {
    let menu = CreateSelectMenu::new(
        SELECT_ID,
        CreateSelectMenuKind::String {
            options: options
                .iter()
                .take(MAX_OPTIONS)
                .map(|option| CreateSelectMenuOption::new(option.clone(), option.clone()))
                .collect(),
        },
    );

    let handle = ctx
        .send(
            poise::CreateReply::default()
                .content(content)
                .components(vec![CreateActionRow::SelectMenu(menu)]),
        )
        .await?;
    let message = handle.into_message().await?;
    let deadline = Instant::now() + timeout;

    loop {
        let Some(press) = ComponentInteractionCollector::new(ctx)
            .message_id(message.id)
            .timeout(deadline.saturating_duration_since(Instant::now()))
            .await
        else {
            if let Err(e) = message
                .channel_id
                .edit_message(ctx, message.id, EditMessage::new().components(Vec::new()))
                .await
            {
                debug!(error = %e, "Select message gone before timeout cleanup");
            }
            return Ok(None);
        };

        if press.user.id != ctx.author().id {
            press
                .create_response(
                    ctx,
                    CreateInteractionResponse::Message(
                        CreateInteractionResponseMessage::new()
                            .content(NOT_ALLOWED)
                            .ephemeral(true),
                    ),
                )
                .await?;
            continue;
        }

        let ComponentInteractionDataKind::StringSelect { values } = &press.data.kind else {
            continue;
        };
        let choice = values.first().cloned();

        press
            .create_response(
                ctx,
                CreateInteractionResponse::UpdateMessage(
                    CreateInteractionResponseMessage::new().components(Vec::new()),
                ),
            )
            .await?;

        return Ok(choice);
    }
}
