//! Form entity - Maps pokemon names (including form variants) to sprite ids.
//!
//! `identifier` is the full lower-case name, e.g. `"raichu-alola"`. For form variants
//! `form_identifier` holds the suffix (`"alola"`) and `form_order` its 1-based position.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Form database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "forms")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full lower-case pokemon name
    #[sea_orm(unique)]
    pub identifier: String,
    /// Form suffix, if this entry is a form variant
    pub form_identifier: Option<String>,
    /// 1-based order of the form among its species' forms
    pub form_order: i64,
    /// National dex id of the base species
    pub pokemon_id: i64,
}

/// `Form` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
