//! Daily mission entity - The two missions active today.
//!
//! There is at most one row per slot. The daily reset replaces both rows.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Daily mission database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "daily_missions")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Which slot this mission fills ("primary" or "secondary")
    #[sea_orm(unique)]
    pub slot: String,
    /// Mission key used for progress tracking and text templates (e.g., "catch")
    pub mission_key: String,
    /// Amount of progress needed to complete the mission
    pub target: i64,
}

/// `DailyMission` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
