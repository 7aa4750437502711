//! User entity - A player's credit balance and daily reward state.
//!
//! Rows are created lazily the first time a user touches missions or credits.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user ID
    #[sea_orm(unique)]
    pub user_id: String,
    /// Credits available to spend or gift
    pub credits: i64,
    /// Whether today's mission rewards were already collected
    pub missions_claimed: bool,
}

/// User has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
