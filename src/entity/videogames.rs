//! Videogame entity
//!
//! The catalog table. Prices are stored in cents.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::enums::{Genre, Pegi, Platform};
use crate::utils::price::format_price;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "videogames")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(column_type = "Text")]
    pub company_name: String,
    pub genre: Genre,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    pub platform: Platform,
    pub pegi: Pegi,

    // === Sales ===
    pub price_cents: i64,
    pub stock: i32,
    pub release_date: Date,

    // === Timestamps ===
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

impl Model {
    /// One catalog row as shown in the shop tables.
    pub fn display_row(&self) -> String {
        format!(
            "{} | {} | {} | {} | {} | {} | stock {} | {}",
            self.name,
            self.company_name,
            self.genre,
            self.platform,
            self.pegi,
            format_price(self.price_cents),
            self.stock,
            self.release_date.format("%Y-%m-%d"),
        )
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::orders::Entity")]
    Orders,
    #[sea_orm(has_many = "super::reviews::Entity")]
    Reviews,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
