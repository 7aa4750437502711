//! Bot settings loaded from config.toml
//!
//! Every section and field has a default, so a missing file or a partial file still
//! produces a usable configuration. Secrets (the bot token, the database URL) never
//! live here; they come from the environment.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Environment variable that overrides the config file location
pub const CONFIG_PATH_VAR: &str = "DITTO_CONFIG";

/// Default config file location
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Command cooldown settings
    pub cooldown: CooldownConfig,
    /// Welcome DM for the official server
    pub welcome: WelcomeConfig,
    /// Confirmation dialog settings
    pub confirm: ConfirmConfig,
    /// Paginated menu settings
    pub menu: MenuConfig,
    /// Daily mission texts and rewards
    pub missions: MissionsConfig,
    /// Sprite URL bases
    pub images: ImagesConfig,
}

/// Global per-user command cooldown
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CooldownConfig {
    /// Seconds a user must wait between top-level commands
    pub seconds: u64,
    /// Discord user IDs that are never put on cooldown
    pub immune_ids: Vec<u64>,
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            seconds: 3,
            immune_ids: Vec::new(),
        }
    }
}

/// Welcome message sent to members joining the official server
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WelcomeConfig {
    /// Guild the welcome applies to; unset disables the welcome
    pub guild_id: Option<u64>,
    /// Bot account that sends the welcome; unset means any
    pub bot_id: Option<u64>,
    /// Embed title
    pub title: String,
    /// Embed description
    pub description: String,
}

impl Default for WelcomeConfig {
    fn default() -> Self {
        Self {
            guild_id: None,
            bot_id: None,
            title: "Welcome to the DittoBOT's Official Server!".to_string(),
            description: "Thanks for joining! Hope you enjoy your time here!!".to_string(),
        }
    }
}

impl WelcomeConfig {
    /// Whether a join in `guild_id`, seen by bot `bot_id`, should be welcomed.
    #[must_use]
    pub fn applies_to(&self, guild_id: u64, bot_id: u64) -> bool {
        self.guild_id == Some(guild_id) && self.bot_id.is_none_or(|id| id == bot_id)
    }
}

/// Confirmation dialog settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConfirmConfig {
    /// Seconds a confirmation prompt stays answerable
    pub timeout_secs: u64,
}

impl Default for ConfirmConfig {
    fn default() -> Self {
        Self { timeout_secs: 120 }
    }
}

impl ConfirmConfig {
    /// Timeout as a `Duration`.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Paginated menu and select settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Seconds without interaction before a menu's buttons are removed
    pub timeout_secs: u64,
    /// Lines per page for text menus
    pub per_page: usize,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            per_page: 15,
        }
    }
}

impl MenuConfig {
    /// Idle timeout as a `Duration`.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Daily mission texts and reward
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MissionsConfig {
    /// Credits granted for completing both missions
    pub reward: i64,
    /// Marker shown next to a completed mission
    pub complete_emoji: String,
    /// Marker shown next to an incomplete mission
    pub incomplete_emoji: String,
    /// Text templates for primary missions, keyed by mission key.
    /// `{x}` is replaced by the target and `{done}` by the progress.
    pub primaries: HashMap<String, String>,
    /// Text templates for secondary missions, keyed by mission key
    pub secondaries: HashMap<String, String>,
}

impl Default for MissionsConfig {
    fn default() -> Self {
        Self {
            reward: 10_000,
            complete_emoji: "\u{2705}".to_string(),
            incomplete_emoji: "\u{274C}".to_string(),
            primaries: HashMap::new(),
            secondaries: HashMap::new(),
        }
    }
}

/// Base URLs for sprite images
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// Base URL for regular sprites
    pub spawn_base: String,
    /// Base URL for skinned sprites
    pub skin_base: String,
    /// Base URL for pixel sprites
    pub pixel_base: String,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            spawn_base: "https://skylarr1227.github.io/images/".to_string(),
            skin_base: "https://bot.ditto.skin/".to_string(),
            pixel_base: "https://skylarr1227.github.io/pixel_images/".to_string(),
        }
    }
}

/// Parses configuration from TOML text.
///
/// # Errors
/// Returns [`Error::Config`] when the TOML is invalid or a field has the wrong type.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path);
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;
    parse_config(&contents)
}

/// Loads configuration from `$DITTO_CONFIG` or `./config.toml`.
///
/// A missing file is not an error: the defaults are used instead.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_app_config() -> Result<AppConfig> {
    let path =
        std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    if !Path::new(&path).exists() {
        info!("No config file at {path}, using defaults");
        return Ok(AppConfig::default());
    }

    let config = load_config(&path)?;
    info!("Loaded configuration from {path}");
    Ok(config)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.cooldown.seconds, 3);
        assert!(config.cooldown.immune_ids.is_empty());
        assert_eq!(config.confirm.timeout(), Duration::from_secs(120));
        assert_eq!(config.menu.timeout(), Duration::from_secs(60));
        assert_eq!(config.menu.per_page, 15);
        assert_eq!(config.missions.reward, 10_000);
        assert_eq!(config.images.skin_base, "https://bot.ditto.skin/");
        assert!(config.welcome.guild_id.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
            [cooldown]
            seconds = 5
            immune_ids = [455277032625012737, 728736503366156361]

            [welcome]
            guild_id = 999953429751414784
            bot_id = 1000125868938633297

            [missions]
            reward = 500

            [missions.primaries]
            catch = "Catch {x} pokemon ({done}/{x})"

            [missions.secondaries]
            hatch = "Hatch {x} eggs ({done}/{x})"
        "#;

        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.cooldown.seconds, 5);
        assert_eq!(config.cooldown.immune_ids.len(), 2);
        assert_eq!(config.missions.reward, 500);
        assert_eq!(
            config.missions.primaries.get("catch").map(String::as_str),
            Some("Catch {x} pokemon ({done}/{x})")
        );
        // Untouched fields in a present section keep their defaults
        assert_eq!(config.missions.complete_emoji, "\u{2705}");
        assert_eq!(
            config.welcome.title,
            "Welcome to the DittoBOT's Official Server!"
        );
    }

    #[test]
    fn test_shipped_config_parses() {
        let config = parse_config(include_str!("../../config.toml")).unwrap();
        assert_eq!(config.welcome.guild_id, Some(999_953_429_751_414_784));
        assert!(config.welcome.applies_to(999_953_429_751_414_784, 1_000_125_868_938_633_297));
        assert!(config.cooldown.immune_ids.contains(&455_277_032_625_012_737));
        assert!(config.missions.primaries.contains_key("catch"));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = parse_config("[cooldown]\nseconds = \"soon\"");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_missing_file_is_an_error_for_explicit_path() {
        let result = load_config("definitely/not/here.toml");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_welcome_applies_only_to_configured_pair() {
        let welcome = WelcomeConfig {
            guild_id: Some(10),
            bot_id: Some(20),
            ..Default::default()
        };
        assert!(welcome.applies_to(10, 20));
        assert!(!welcome.applies_to(10, 21));
        assert!(!welcome.applies_to(11, 20));

        let any_bot = WelcomeConfig {
            guild_id: Some(10),
            bot_id: None,
            ..Default::default()
        };
        assert!(any_bot.applies_to(10, 99));
        assert!(!WelcomeConfig::default().applies_to(10, 20));
    }
}
