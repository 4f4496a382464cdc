//! Order entity
//!
//! One row per purchased cart line. `game_name` is a snapshot so the history survives a
//! game being withdrawn from the catalog (`game_id` is then set to NULL).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub game_id: Option<i32>,
    #[sea_orm(column_type = "Text")]
    pub game_name: String,
    pub unit_price_cents: i64,
    pub quantity: i32,
    pub created_at: i64,
}

impl Model {
    pub fn total_cents(&self) -> i64 {
        self.unit_price_cents * i64::from(self.quantity)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::UserId",
        to = "super::profiles::Column::Id",
        on_delete = "Cascade"
    )]
    Profiles,
    #[sea_orm(
        belongs_to = "super::videogames::Entity",
        from = "Column::GameId",
        to = "super::videogames::Column::Id",
        on_delete = "SetNull"
    )]
    Videogames,
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profiles.def()
    }
}

impl Related<super::videogames::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Videogames.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
