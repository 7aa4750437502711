//! Database configuration module for Ditto.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs. Creation is idempotent, which lets the bot
//! call it on every start.

use crate::entities::{DailyMission, Form, MissionProgress, User, mission_progress};
use crate::errors::Result;
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema, sea_query::Index,
};
use tracing::info;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/ditto.sqlite?mode=rwc";

/// Gets the database URL from environment variable or returns default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by `DATABASE_URL`.
///
/// Falls back to a local `SQLite` file if no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    if database_url == DEFAULT_DATABASE_URL {
        std::fs::create_dir_all("data")?;
    }
    info!("Connecting to database");
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all tables that do not exist yet.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    create_table(db, User).await?;
    create_table(db, DailyMission).await?;
    create_table(db, MissionProgress).await?;
    create_table(db, Form).await?;

    // One progress row per user and mission, so increments can upsert
    let index = Index::create()
        .name("idx_mission_progress_user_mission")
        .table(MissionProgress)
        .col(mission_progress::Column::UserId)
        .col(mission_progress::Column::MissionKey)
        .unique()
        .if_not_exists()
        .to_owned();
    let builder = db.get_database_backend();
    db.execute(builder.build(&index)).await?;
    Ok(())
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();

    db.execute(builder.build(&table)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{DailyMissionModel, FormModel, MissionProgressModel, UserModel};
    use sea_orm::QuerySelect;

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<UserModel> = User::find().limit(1).all(&db).await?;
        let _: Vec<DailyMissionModel> = DailyMission::find().limit(1).all(&db).await?;
        let _: Vec<MissionProgressModel> = MissionProgress::find().limit(1).all(&db).await?;
        let _: Vec<FormModel> = Form::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_progress_rows_are_unique_per_mission() -> Result<()> {
        use sea_orm::{ActiveModelTrait, Set};

        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        let row = || mission_progress::ActiveModel {
            user_id: Set("user1".to_string()),
            mission_key: Set("catch".to_string()),
            amount: Set(1),
            ..Default::default()
        };
        row().insert(&db).await?;
        assert!(row().insert(&db).await.is_err());
        Ok(())
    }
}
