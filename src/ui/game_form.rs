//! Add / modify game form.

use sea_orm::DatabaseConnection;

use super::{Dialogs, Navigation, Session, Window};
use crate::database::dto::{InsertGameData, UpdateGameData};
use crate::database::service;
use crate::entity::enums::{Genre, Pegi, Platform};
use crate::entity::videogames;
use crate::utils::price::{format_price, parse_price};
use crate::utils::validate;

#[derive(Debug, Clone)]
pub struct GameFormWindow {
    /// `None` while adding
    game_id: Option<i32>,
    pub name: String,
    pub company_name: String,
    pub genre: Genre,
    pub platform: Platform,
    pub pegi: Pegi,
    pub price: String,
    pub stock: String,
    pub release_date: String,
}

impl Default for GameFormWindow {
    fn default() -> Self {
        Self {
            game_id: None,
            name: String::new(),
            company_name: String::new(),
            genre: Genre::Action,
            platform: Platform::Pc,
            pegi: Pegi::Pegi3,
            price: String::new(),
            stock: "0".to_string(),
            release_date: String::new(),
        }
    }
}

impl GameFormWindow {
    /// Empty form for a new game
    pub fn new() -> Self {
        Self::default()
    }

    /// Form filled with a stored game
    pub async fn edit(db: &DatabaseConnection, game_id: i32) -> crate::error::Result<Self> {
        let game = service::find_game(db, game_id).await?;
        Ok(Self::from_model(&game))
    }

    fn from_model(game: &videogames::Model) -> Self {
        Self {
            game_id: Some(game.id),
            name: game.name.clone(),
            company_name: game.company_name.clone(),
            genre: game.genre,
            platform: game.platform,
            pegi: game.pegi,
            // without the currency sign so the field reads back as typed
            price: format_price(game.price_cents).trim_start_matches('$').to_string(),
            stock: game.stock.to_string(),
            release_date: game.release_date.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn game_id(&self) -> Option<i32> {
        self.game_id
    }

    pub fn title(&self) -> &'static str {
        if self.game_id.is_some() {
            "Modify game"
        } else {
            "Add game"
        }
    }

    /// Parses the text fields
    fn to_game_data(&self) -> Result<InsertGameData, String> {
        validate::require_filled(&[
            ("Name", &self.name),
            ("Company", &self.company_name),
            ("Price", &self.price),
            ("Stock", &self.stock),
            ("Release date", &self.release_date),
        ])?;
        let price_cents = parse_price(&self.price)
            .ok_or_else(|| format!("'{}' is not a valid price", self.price.trim()))?;
        let stock = self
            .stock
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|s| *s >= 0)
            .ok_or_else(|| "The stock must be a whole number of 0 or more".to_string())?;
        let release_date = validate::parse_date(&self.release_date)
            .ok_or_else(|| "The release date must look like YYYY-MM-DD".to_string())?;

        Ok(InsertGameData {
            company_name: self.company_name.clone(),
            genre: self.genre,
            name: self.name.clone(),
            platform: self.platform,
            pegi: self.pegi,
            price_cents,
            stock,
            release_date,
        })
    }

    pub async fn on_save(
        &mut self,
        db: &DatabaseConnection,
        session: &Session,
        dialogs: &mut dyn Dialogs,
    ) -> Navigation {
        let data = match self.to_game_data() {
            Ok(data) => data,
            Err(message) => {
                dialogs.error(self.title(), &message);
                return Navigation::Stay;
            }
        };

        let result = match self.game_id {
            Some(id) => {
                service::modify_game(db, &session.account, id, UpdateGameData::from(data)).await
            }
            None => service::add_game(db, &session.account, data).await,
        };
        match result {
            Ok(game) => {
                let verb = if self.game_id.is_some() { "updated" } else { "added" };
                dialogs.info(self.title(), &format!("{} {}", game.name, verb));
                Navigation::Open(Window::AdminShop)
            }
            Err(e) => {
                dialogs.error(self.title(), &e.to_string());
                Navigation::Stay
            }
        }
    }

    pub fn on_cancel(&self) -> Navigation {
        Navigation::Open(Window::AdminShop)
    }
}
