//! Sprite file names and URLs.
//!
//! Sprites are stored as `{pokemon_id}-{form_id}-.png` under optional `radiant/`, `shiny/`
//! and skin directories. Names are resolved to ids through the `forms` table.

use crate::{
    config::settings::ImagesConfig,
    entities::{Form, form},
    errors::{Error, Result},
};
use sea_orm::prelude::*;

/// How a pokemon should be drawn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpriteStyle {
    /// Use the shiny sprite
    pub shiny: bool,
    /// Use the radiant sprite
    pub radiant: bool,
    /// Skin name; skins ending in `_gif` are animated
    pub skin: Option<String>,
}

/// Dex id and form index a name resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteId {
    /// National dex id of the base species
    pub pokemon_id: i64,
    /// Zero-based form index, 0 for the base form
    pub form_id: i64,
}

/// Looks up the sprite ids for `name` (case-insensitive).
///
/// When the name carries its form suffix (`raichu-alola`), the form index comes from the
/// form entry and the dex id from the base species entry (`raichu`).
///
/// # Errors
/// Returns [`Error::UnknownPokemon`] when the name or its base species is not in `forms`.
pub async fn resolve_sprite_id(db: &DatabaseConnection, name: &str) -> Result<SpriteId> {
    let name = name.to_lowercase();
    let entry = find_form(db, &name).await?;

    let Some(suffix) = entry
        .form_identifier
        .as_deref()
        .filter(|suffix| !suffix.is_empty() && name.ends_with(suffix))
    else {
        return Ok(SpriteId {
            pokemon_id: entry.pokemon_id,
            form_id: 0,
        });
    };

    // Drop the suffix and the separator in front of it
    let mut base_name = name[..name.len() - suffix.len()].chars();
    base_name.next_back();

    let base = find_form(db, base_name.as_str())
        .await
        .map_err(|e| match e {
            Error::UnknownPokemon { .. } => Error::UnknownPokemon { name: name.clone() },
            other => other,
        })?;

    Ok(SpriteId {
        pokemon_id: base.pokemon_id,
        form_id: entry.form_order - 1,
    })
}

/// File name of the sprite for `name` drawn in `style`.
pub async fn file_name(db: &DatabaseConnection, name: &str, style: &SpriteStyle) -> Result<String> {
    let id = resolve_sprite_id(db, name).await?;
    Ok(format_file_name(id, style))
}

/// File name of the pixel sprite for `name`. Pixel sprites have no radiant or skin variants.
pub async fn pixel_file_name(db: &DatabaseConnection, name: &str, shiny: bool) -> Result<String> {
    let id = resolve_sprite_id(db, name).await?;
    let shiny = if shiny { "shiny/" } else { "" };
    Ok(format!("{shiny}{}-{}-.png", id.pokemon_id, id.form_id))
}

/// Builds the sprite path for already resolved ids.
#[must_use]
pub fn format_file_name(id: SpriteId, style: &SpriteStyle) -> String {
    let radiant = if style.radiant { "radiant/" } else { "" };
    let shiny = if style.shiny { "shiny/" } else { "" };
    let (skin, extension) = match style.skin.as_deref() {
        Some(skin) if skin.ends_with("_gif") => (format!("{skin}/"), "gif"),
        Some(skin) => (format!("{skin}/"), "png"),
        None => (String::new(), "png"),
    };
    format!(
        "{radiant}{shiny}{skin}{}-{}-.{extension}",
        id.pokemon_id, id.form_id
    )
}

/// Full image URL for `name` drawn in `style`. Skinned sprites are served from the skin host.
pub async fn sprite_url(
    db: &DatabaseConnection,
    images: &ImagesConfig,
    name: &str,
    style: &SpriteStyle,
) -> Result<String> {
    let file = file_name(db, name, style).await?;
    let base = if style.skin.is_some() {
        &images.skin_base
    } else {
        &images.spawn_base
    };
    Ok(format!("{base}{file}"))
}

/// Full pixel sprite URL for `name`.
pub async fn pixel_sprite_url(
    db: &DatabaseConnection,
    images: &ImagesConfig,
    name: &str,
    shiny: bool,
) -> Result<String> {
    let file = pixel_file_name(db, name, shiny).await?;
    Ok(format!("{}{file}", images.pixel_base))
}

/// Emoji shown in front of a pokemon's name. Skins take precedence over radiant,
/// radiant over shiny. Plain pokemon get no prefix.
#[must_use]
pub fn sprite_emoji(skin: Option<&str>, radiant: bool, shiny: bool) -> &'static str {
    if let Some(skin) = skin {
        let skin = skin.to_lowercase();
        return match skin.as_str() {
            s if s.starts_with("staff") => "<:staff2:1012753310916296786>",
            s if s.starts_with("custom") => "<a:custom:1012757910222274560>",
            s if s.starts_with("patreon") => "<:patreon:1012765476272738374>",
            "vote" | "vote2" | "vote3" => "<a:votestreak:998338987070603354>",
            "rad" | "rad2" | "rad3" => "<a:rad3:1012731646958641213>",
            "xmas" => "<:xmas:927667765135945798>",
            "xmas_special" => "<:xmas_special:927668471943282698>",
            "tourney" => "<a:ezgif3105ced7e5d:1012731636300922940>",
            "shadow" => "<:shadow4:946570262244122685>",
            "dittobot" => "<:skin:1012748961125249094>",
            "ditto" => "<a:ditto:1012916886968737893>",
            _ => "<:skin23:1012754684576014416>",
        };
    }
    if radiant {
        "<:radiant:1012775392202997820>"
    } else if shiny {
        ":star2:"
    } else {
        ""
    }
}

/// Whether `input` names the spawned `pokemon`.
///
/// Spaces count as dashes. Regional forms also accept the region in front, e.g.
/// `alolan raichu` for `raichu-alola`.
#[must_use]
pub fn spawn_name_matches(input: &str, pokemon: &str) -> bool {
    let guess = input.to_lowercase().replace(' ', "-");
    let pokemon = pokemon.to_lowercase();

    if guess == pokemon {
        return true;
    }

    match pokemon.as_str() {
        "mr-mime" => return guess == "mr.-mime",
        "mime-jr" => return guess == "mime-jr.",
        _ => {}
    }

    [("-alola", "alolan"), ("-galar", "galarian"), ("-hisui", "hisuian")]
        .into_iter()
        .find_map(|(suffix, adjective)| {
            pokemon
                .strip_suffix(suffix)
                .map(|base| (&suffix[1..], adjective, base))
        })
        .is_some_and(|(region, adjective, base)| {
            guess == format!("{region}-{base}") || guess == format!("{adjective}-{base}")
        })
}

async fn find_form(db: &DatabaseConnection, identifier: &str) -> Result<form::Model> {
    Form::find()
        .filter(form::Column::Identifier.eq(identifier))
        .one(db)
        .await?
        .ok_or_else(|| Error::UnknownPokemon {
            name: identifier.to_string(),
        })
}
