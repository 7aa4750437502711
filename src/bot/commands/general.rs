//! General Discord commands - ping and help.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            views::{menu, select},
        },
        core::async_iter::AsyncIter,
        errors::{Error, Result},
    };
    use futures::StreamExt;
    use poise::serenity_prelude as serenity;

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command, category = "General")]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Browse the bot's commands by category.
    ///
    /// Pick a category from the drop-down, then page through its commands.
    #[poise::command(slash_command, prefix_command, category = "General")]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let commands = &ctx.framework().options().commands;
        let menu_config = &ctx.data().config.menu;

        let categories: Vec<String> =
            AsyncIter::new(commands.iter().filter_map(|command| command.category.clone()))
                .without_duplicates()
                .collect()
                .await;

        let Some(category) = select::choose(
            ctx,
            "Select a command category",
            &categories,
            menu_config.timeout(),
        )
        .await?
        else {
            return Ok(());
        };

        let listing = commands
            .iter()
            .filter(|command| command.category.as_deref() == Some(category.as_str()))
            .flat_map(|command| {
                std::iter::once(command).chain(command.subcommands.iter())
            })
            .filter(|command| command.subcommands.is_empty())
            .map(|command| {
                format!(
                    "`/{}` - {}",
                    command.qualified_name,
                    command.description.as_deref().unwrap_or("No description")
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let base = serenity::CreateEmbed::new()
            .title(format!("{category} commands"))
            .color(0x00FF_B6C1);
        let pages = menu::embed_pages(&base, &listing, menu_config.per_page);

        menu::run_menu(ctx, pages, menu_config.timeout()).await
    }
}

// Re-export all commands
pub use inner::*;
