//! Paginated message with navigation buttons.

use crate::{
    bot::Context,
    core::pagination::{MenuControl, PageCursor, page_footer, pagify},
    errors::Result,
};
use poise::serenity_prelude as serenity;
use serenity::{
    ButtonStyle, ComponentInteractionCollector, CreateActionRow, CreateButton, CreateEmbed,
    CreateEmbedFooter, CreateInteractionResponse, CreateInteractionResponseMessage, EditMessage,
};
use std::time::Duration;
use tracing::debug;

/// Notice shown to anyone but the invoker who presses a menu button.
pub const NOT_ALLOWED: &str = "You are not allowed to interact with this button.";

/// One page of a menu: plain text or an embed.
#[derive(Debug, Clone)]
pub enum MenuPage {
    /// Message content
    Text(String),
    /// A single embed
    Embed(CreateEmbed),
}

impl From<String> for MenuPage {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<CreateEmbed> for MenuPage {
    fn from(embed: CreateEmbed) -> Self {
        Self::Embed(embed)
    }
}

impl MenuPage {
    fn reply(&self) -> poise::CreateReply {
        match self {
            Self::Text(text) => poise::CreateReply::default().content(text.clone()),
            Self::Embed(embed) => poise::CreateReply::default().embed(embed.clone()),
        }
    }

    fn update(&self) -> CreateInteractionResponseMessage {
        match self {
            Self::Text(text) => CreateInteractionResponseMessage::new().content(text.clone()),
            Self::Embed(embed) => CreateInteractionResponseMessage::new().embed(embed.clone()),
        }
    }
}

/// Splits `text` into embed pages based on `base`, each with a "Page i/n" footer.
#[must_use]
pub fn embed_pages(base: &CreateEmbed, text: &str, per_page: usize) -> Vec<MenuPage> {
    let pages = pagify(text, per_page, "\n");
    let total = pages.len();
    pages
        .into_iter()
        .enumerate()
        .map(|(index, page)| {
            base.clone()
                .description(page)
                .footer(CreateEmbedFooter::new(page_footer(index, total)))
                .into()
        })
        .collect()
}

/// Sends `pages` as a menu and handles its buttons until it is closed or left idle.
///
/// Only the invoking user may navigate. After `idle` without a press the buttons are
/// removed; the close button deletes the message.
pub async fn run_menu(ctx: Context<'_>, pages: Vec<MenuPage>, idle: Duration) -> Result<()> {
    let mut cursor = PageCursor::new(pages.len())?;
    let controls = MenuControl::for_pages(pages.len());

    let handle = ctx
        .send(
            pages[cursor.current()]
                .reply()
                .components(vec![control_row(&controls)]),
        )
        .await?;
    let message = handle.into_message().await?;

    loop {
        let Some(press) = ComponentInteractionCollector::new(ctx)
            .message_id(message.id)
            .timeout(idle)
            .await
        else {
            if let Err(e) = message
                .channel_id
                .edit_message(ctx, message.id, EditMessage::new().components(Vec::new()))
                .await
            {
                debug!(error = %e, "Menu message gone before timeout cleanup");
            }
            return Ok(());
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

        let Some(control) = MenuControl::from_custom_id(&press.data.custom_id) else {
            continue;
        };

        if control == MenuControl::Close {
            press
                .create_response(ctx, CreateInteractionResponse::Acknowledge)
                .await?;
            if let Err(e) = message.channel_id.delete_message(ctx, message.id).await {
                debug!(error = %e, "Could not delete closed menu");
            }
            return Ok(());
        }

        let page = cursor.apply(control);
        press
            .create_response(ctx, CreateInteractionResponse::UpdateMessage(pages[page].update()))
            .await?;
    }
}

fn control_row(controls: &[MenuControl]) -> CreateActionRow {
    CreateActionRow::Buttons(
        controls
            .iter()
            .map(|control| {
                let style = if *control == MenuControl::Close {
                    ButtonStyle::Danger
                } else {
                    ButtonStyle::Primary
                };
                CreateButton::new(control.custom_id())
                    .emoji(control.emoji())
                    .style(style)
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_pages_split_text() {
        let text = (1..=5).map(|i| format!("cmd{i}")).collect::<Vec<_>>().join("\n");
        let pages = embed_pages(&CreateEmbed::new().title("Help"), &text, 2);

        assert_eq!(pages.len(), 3);
        assert!(pages.iter().all(|page| matches!(page, MenuPage::Embed(_))));
    }

    #[test]
    fn test_text_page_conversion() {
        let page = MenuPage::from("hello".to_string());
        assert!(matches!(page, MenuPage::Text(ref text) if text == "hello"));
    }
}
