//! Mission progress entity - How far a user has come on one mission key today.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Mission progress database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mission_progress")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user ID
    pub user_id: String,
    /// Mission key (e.g., "catch", "hatch")
    pub mission_key: String,
    /// Progress made today
    pub amount: i64,
}

/// `MissionProgress` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
