//! Shared test utilities for Ditto.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test rows with sensible defaults.

use crate::{
    core::economy,
    entities::form,
    errors::Result,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all database tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Sets up a database holding one user with `credits` credits.
pub async fn setup_user_with_credits(user_id: &str, credits: i64) -> Result<DatabaseConnection> {
    let db = setup_test_db().await?;
    economy::add_credits(&db, user_id, credits).await?;
    Ok(db)
}

/// Inserts a `forms` row.
///
/// # Arguments
/// * `identifier` - Full lower-case name, e.g. `"raichu-alola"`
/// * `form_identifier` - Form suffix for variants, None for base species
/// * `form_order` - 1-based form position
/// * `pokemon_id` - Dex id
pub async fn create_test_form(
    db: &DatabaseConnection,
    identifier: &str,
    form_identifier: Option<&str>,
    form_order: i64,
    pokemon_id: i64,
) -> Result<form::Model> {
    let row = form::ActiveModel {
        identifier: Set(identifier.to_string()),
        form_identifier: Set(form_identifier.map(str::to_string)),
        form_order: Set(form_order),
        pokemon_id: Set(pokemon_id),
        ..Default::default()
    };
    Ok(row.insert(db).await?)
}
