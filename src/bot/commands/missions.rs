//! Daily mission commands - list today's missions and claim the reward.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::missions::{self, ClaimOutcome, MissionStatus},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    const RESETTING: &str = "Missions are resetting, please wait a few minutes and try again!";

    /// Daily missions
    #[poise::command(
        slash_command,
        prefix_command,
        subcommands("mission_list", "mission_claim"),
        category = "Missions"
    )]
    pub async fn mission(_ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        Ok(())
    }

    /// Show today's missions and your progress.
    #[poise::command(slash_command, prefix_command, rename = "list")]
    pub async fn mission_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let config = &ctx.data().config.missions;

        let Some(board) = missions::mission_board(db, &ctx.author().id.to_string()).await? else {
            ctx.say(RESETTING).await?;
            return Ok(());
        };

        let marker = |status: &MissionStatus| {
            if status.is_complete() {
                config.complete_emoji.as_str()
            } else {
                config.incomplete_emoji.as_str()
            }
        };

        let claimed = if board.claimed {
            "**Rewards Claimed**"
        } else {
            "**Rewards Not claimed**"
        };

        let embed = serenity::CreateEmbed::new()
            .title("Today's missions")
            .color(0x00FF_B6C1)
            .field(
                "Primary Mission",
                format!("{} {}", marker(&board.primary), board.primary_text(config)),
                true,
            )
            .field(
                "Secondary Mission",
                format!("{} {}", marker(&board.secondary), board.secondary_text(config)),
                true,
            )
            .field("Claimed", claimed, true)
            .footer(serenity::CreateEmbedFooter::new("Missions reset daily"));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Claim the reward for completing both of today's missions.
    #[poise::command(slash_command, prefix_command, rename = "claim")]
    pub async fn mission_claim(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let reward = ctx.data().config.missions.reward;

        match missions::claim_rewards(db, &ctx.author().id.to_string(), reward).await? {
            ClaimOutcome::Claimed { reward, credits } => {
                let embed = serenity::CreateEmbed::new()
                    .title(format!(
                        "Congratulations!\nYou have claimed {reward} credits!"
                    ))
                    .description(format!("Your balance is now {credits} credits."));
                ctx.send(poise::CreateReply::default().embed(embed)).await?;
            }
            ClaimOutcome::AlreadyClaimed => {
                ctx.say(
                    "**You have already claimed rewards for today!\nPlease wait till missions reset.**",
                )
                .await?;
            }
            ClaimOutcome::Incomplete => {
                ctx.say("Today's missions have not been completed!").await?;
            }
            ClaimOutcome::MissionsResetting => {
                ctx.say(RESETTING).await?;
            }
        }

        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
