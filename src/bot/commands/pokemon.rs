//! Pokemon commands - sprite lookup.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::images::{self, SpriteStyle},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Show the sprite of a pokemon.
    #[poise::command(slash_command, prefix_command, category = "Pokemon")]
    pub async fn sprite(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Pokemon name, e.g. raichu-alola"] name: String,
        #[description = "Show the shiny sprite"] shiny: Option<bool>,
        #[description = "Show the radiant sprite"] radiant: Option<bool>,
        #[description = "Skin to show"] skin: Option<String>,
        #[description = "Show the pixel sprite"] pixel: Option<bool>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let config = &ctx.data().config.images;

        let style = SpriteStyle {
            shiny: shiny.unwrap_or(false),
            radiant: radiant.unwrap_or(false),
            skin,
        };

        let url = if pixel.unwrap_or(false) {
            images::pixel_sprite_url(db, config, &name, style.shiny).await
        } else {
            images::sprite_url(db, config, &name, &style).await
        };

        let url = match url {
            Ok(url) => url,
            Err(Error::UnknownPokemon { name }) => {
                ctx.say(format!("`{name}` is not a pokemon I know.")).await?;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let emoji = images::sprite_emoji(style.skin.as_deref(), style.radiant, style.shiny);
        let title = format!("{emoji} {}", name.to_lowercase()).trim().to_string();

        let embed = serenity::CreateEmbed::new()
            .title(title)
            .image(url)
            .color(0x00FF_B6C1);
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
