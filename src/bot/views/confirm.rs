//! Discord rendition of a confirmation prompt.
//!
//! The prompt is a plain message with a green "Confirm" and a red "Deny" button. A spawned
//! collector task forwards button presses into the session until the prompt is disabled.

use crate::{
    core::confirm::{ConfirmationSession, ParticipantId, Presenter, Vote, VoteError, VoteReceipt},
    errors::Result,
};
use async_trait::async_trait;
use futures::StreamExt;
use poise::serenity_prelude as serenity;
use serenity::{
    ButtonStyle, ChannelId, ComponentInteraction, ComponentInteractionCollector, CreateActionRow,
    CreateButton, CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, CreateMessage, EditMessage, MessageId,
};
use std::sync::Arc;
use tokio::task::AbortHandle;
use tracing::{debug, warn};

/// Component id of the confirm button
pub const CONFIRM_ID: &str = "confirm";
/// Component id of the deny button
pub const DENY_ID: &str = "deny";

/// Ephemeral notice sent to a participant whose confirm did not yet resolve the prompt.
pub const WAITING_NOTICE: &str = "Confirmed your intent, waiting for other player(s)";

/// Posts confirmation prompts into one channel.
#[derive(Clone)]
pub struct DiscordPresenter {
    ctx: serenity::Context,
    channel_id: ChannelId,
}

impl DiscordPresenter {
    /// Creates a presenter posting into `channel_id`.
    #[must_use]
    pub const fn new(ctx: serenity::Context, channel_id: ChannelId) -> Self {
        Self { ctx, channel_id }
    }
}

/// A posted prompt and the task collecting its button presses.
#[derive(Debug)]
pub struct PromptMessage {
    channel_id: ChannelId,
    message_id: MessageId,
    collector: AbortHandle,
}

impl PromptMessage {
    /// Id of the prompt message.
    #[must_use]
    pub const fn message_id(&self) -> MessageId {
        self.message_id
    }
}

#[async_trait]
impl Presenter for DiscordPresenter {
    type Surface = PromptMessage;

    async fn render(
        &self,
        prompt: &str,
        session: Arc<ConfirmationSession>,
    ) -> Result<PromptMessage> {
        let message = self
            .channel_id
            .send_message(
                &self.ctx,
                CreateMessage::new()
                    .content(prompt)
                    .components(vec![confirm_buttons()]),
            )
            .await?;

        let ctx = self.ctx.clone();
        let prompt = prompt.to_string();
        let message_id = message.id;

        let collector = tokio::spawn(async move {
            let presses = ComponentInteractionCollector::new(&ctx)
                .message_id(message_id)
                .stream();
            futures::pin_mut!(presses);

            while let Some(press) = presses.next().await {
                if let Err(e) = handle_press(&ctx, &session, &prompt, &press).await {
                    warn!(error = %e, "Failed to answer confirmation button press");
                }
            }
        });

        Ok(PromptMessage {
            channel_id: self.channel_id,
            message_id,
            collector: collector.abort_handle(),
        })
    }

    async fn disable(&self, surface: &PromptMessage) -> Result<()> {
        surface.collector.abort();
        surface
            .channel_id
            .edit_message(
                &self.ctx,
                surface.message_id,
                EditMessage::new().components(Vec::new()),
            )
            .await?;
        debug!(message_id = %surface.message_id, "Removed confirmation buttons");
        Ok(())
    }
}

/// How a button press is answered.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PressReply {
    /// Ephemeral message shown only to the presser
    Rejected(String),
    /// New prompt text listing the confirmers, followed by the waiting notice
    Progress(String),
    /// Plain acknowledgement; the coordinator removes the buttons
    Acknowledge,
}

fn vote_for(custom_id: &str) -> Option<Vote> {
    match custom_id {
        CONFIRM_ID => Some(Vote::Confirm),
        DENY_ID => Some(Vote::Deny),
        _ => None,
    }
}

fn press_reply(
    result: std::result::Result<VoteReceipt, VoteError>,
    prompt: &str,
    confirmed: impl IntoIterator<Item = ParticipantId>,
) -> PressReply {
    match result {
        Err(rejection) => PressReply::Rejected(rejection.to_string()),
        Ok(VoteReceipt::Recorded { .. }) => {
            let confirmed = confirmed
                .into_iter()
                .map(|id| format!("<@{id}>"))
                .collect::<Vec<_>>()
                .join(", ");
            PressReply::Progress(format!("{prompt}\n\nConfirmed: {confirmed}"))
        }
        Ok(VoteReceipt::Resolved(_) | VoteReceipt::Ignored) => PressReply::Acknowledge,
    }
}

async fn handle_press(
    ctx: &serenity::Context,
    session: &ConfirmationSession,
    prompt: &str,
    press: &ComponentInteraction,
) -> Result<()> {
    let Some(vote) = vote_for(&press.data.custom_id) else {
        return Ok(());
    };

    let result = session.submit_vote(press.user.id.get(), vote).await;
    let response = match press_reply(result, prompt, session.responded_participants()) {
        PressReply::Rejected(message) => CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new()
                .content(message)
                .ephemeral(true),
        ),
        PressReply::Progress(content) => {
            press
                .create_response(
                    ctx,
                    CreateInteractionResponse::UpdateMessage(
                        CreateInteractionResponseMessage::new().content(content),
                    ),
                )
                .await?;
            press
                .create_followup(
                    ctx,
                    CreateInteractionResponseFollowup::new()
                        .content(WAITING_NOTICE)
                        .ephemeral(true),
                )
                .await?;
            return Ok(());
        }
        PressReply::Acknowledge => CreateInteractionResponse::Acknowledge,
    };

    press.create_response(ctx, response).await?;
    Ok(())
}

fn confirm_buttons() -> CreateActionRow {
    CreateActionRow::Buttons(vec![
        CreateButton::new(CONFIRM_ID)
            .label("Confirm")
            .style(ButtonStyle::Success),
        CreateButton::new(DENY_ID)
            .label("Deny")
            .style(ButtonStyle::Danger),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::confirm::Outcome;

    const PROMPT: &str = "Are you sure?";

    #[test]
    fn test_vote_for_button_ids() {
        assert_eq!(vote_for(CONFIRM_ID), Some(Vote::Confirm));
        assert_eq!(vote_for(DENY_ID), Some(Vote::Deny));
        assert_eq!(vote_for("next"), None);
    }

    #[test]
    fn test_rejections_are_shown_to_the_presser() {
        assert_eq!(
            press_reply(Err(VoteError::Unauthorized), PROMPT, Vec::new()),
            PressReply::Rejected("You are not allowed to interact with this button.".to_string())
        );
        assert_eq!(
            press_reply(Err(VoteError::DuplicateVote), PROMPT, [1]),
            PressReply::Rejected("You have already interacted with this button.".to_string())
        );
    }

    #[test]
    fn test_recorded_vote_lists_confirmers() {
        assert_eq!(
            press_reply(Ok(VoteReceipt::Recorded { remaining: 1 }), PROMPT, [10, 20]),
            PressReply::Progress("Are you sure?\n\nConfirmed: <@10>, <@20>".to_string())
        );
    }

    #[test]
    fn test_resolving_or_late_votes_are_acknowledged() {
        for receipt in [
            VoteReceipt::Resolved(Outcome::Confirmed),
            VoteReceipt::Resolved(Outcome::Denied),
            VoteReceipt::Ignored,
        ] {
            assert_eq!(press_reply(Ok(receipt), PROMPT, [1]), PressReply::Acknowledge);
        }
    }
}
