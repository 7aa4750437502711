//! Unified error types for Ditto.
//!
//! Every fallible operation in the crate returns [`Result`], so command handlers can
//! propagate with `?` and let the framework error hook report the failure.

use thiserror::Error;

/// All errors that can occur inside the bot.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem access failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required environment variable is missing or malformed
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// A caller passed a value the operation cannot work with
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the rejected value
        message: String,
    },

    /// A pokemon name had no entry in the forms table
    #[error("Unknown pokemon: {name}")]
    UnknownPokemon {
        /// The name that was looked up
        name: String,
    },

    /// A credit transfer needed more than the payer holds
    #[error("Insufficient credits: have {available}, need {required}")]
    InsufficientCredits {
        /// Credits the payer currently holds
        available: i64,
        /// Credits the operation needed
        required: i64,
    },

    /// Serenity/Poise reported an error while talking to Discord
    #[error("Discord error: {0}")]
    Discord(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Discord(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::InsufficientCredits {
            available: 5,
            required: 10,
        };
        assert_eq!(err.to_string(), "Insufficient credits: have 5, need 10");

        let err = Error::UnknownPokemon {
            name: "missingno".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown pokemon: missingno");
    }

    #[test]
    fn test_db_error_converts() {
        let err: Error = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert!(matches!(err, Error::Database(_)));
    }
}
