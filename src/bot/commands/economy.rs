//! Credit commands - check your balance and gift credits to another player.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, views::confirm::DiscordPresenter},
        core::{
            confirm::{ConfirmationCoordinator, ConfirmationSession, Outcome},
            economy,
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::sync::Arc;
    use tracing::{info, warn};

    /// Show how many credits you have.
    #[poise::command(slash_command, prefix_command, category = "Economy")]
    pub async fn balance(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let credits =
            economy::get_credits(&ctx.data().database, &ctx.author().id.to_string()).await?;
        ctx.say(format!("You have {credits} credits.")).await?;
        Ok(())
    }

    /// Gift credits to another player. Both of you have to confirm.
    #[poise::command(slash_command, prefix_command, category = "Economy")]
    pub async fn gift(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Player receiving the credits"] recipient: serenity::User,
        #[description = "Amount of credits to gift"]
        #[min = 1]
        amount: i64,
    ) -> Result<()> {
        let giver = ctx.author().id;
        let db = &ctx.data().database;

        if recipient.id == giver || recipient.bot {
            ctx.say("You cannot gift credits to that user.").await?;
            return Ok(());
        }

        // Prefix invocations bypass the slash-option minimum
        match economy::check_transfer(db, &giver.to_string(), &recipient.id.to_string(), amount)
            .await
        {
            Ok(_) => {}
            Err(Error::InvalidArgument { .. }) => {
                ctx.say("You must gift at least 1 credit.").await?;
                return Ok(());
            }
            Err(Error::InsufficientCredits { available, .. }) => {
                ctx.say(format!(
                    "You do not have enough credits! You have {available} credits."
                ))
                .await?;
                return Ok(());
            }
            Err(e) => return Err(e),
        }

        ctx.say("Gift offer sent, waiting for both players to confirm.")
            .await?;

        let channel_id = ctx.channel_id();
        let http = Arc::clone(&ctx.serenity_context().http);
        let session = Arc::new(
            ConfirmationSession::new(giver.get())
                .with_participants([giver.get(), recipient.id.get()])
                .with_timeout(ctx.data().config.confirm.timeout())
                .on_timeout(move || {
                    let http = Arc::clone(&http);
                    async move {
                        if let Err(e) = channel_id.say(&*http, "The gift offer expired.").await {
                            warn!(error = %e, "Could not announce expired gift");
                        }
                    }
                }),
        );

        let coordinator = ConfirmationCoordinator::new(DiscordPresenter::new(
            ctx.serenity_context().clone(),
            channel_id,
        ));
        let prompt = format!(
            "<@{}>, <@{giver}> wants to gift you {amount} credits. Both of you must confirm.",
            recipient.id
        );

        if !coordinator.start(&session, &prompt).await? {
            if session.outcome() == Outcome::Denied {
                ctx.say("The gift was declined.").await?;
            }
            return Ok(());
        }

        match economy::transfer_credits(db, &giver.to_string(), &recipient.id.to_string(), amount)
            .await
        {
            Ok((payer, _)) => {
                info!(%giver, recipient = %recipient.id, amount, "Gift completed");
                ctx.say(format!(
                    "Gifted {amount} credits to <@{}>! You now have {} credits.",
                    recipient.id, payer.credits
                ))
                .await?;
            }
            Err(Error::InsufficientCredits { available, .. }) => {
                ctx.say(format!(
                    "You no longer have enough credits! You have {available} credits."
                ))
                .await?;
            }
            Err(e) => return Err(e),
        }

        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
