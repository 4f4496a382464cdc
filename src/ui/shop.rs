//! Catalog browser for users: search, filter, select, add to cart.

use std::collections::HashMap;

use sea_orm::DatabaseConnection;

use super::{Dialogs, Navigation, Session, Window};
use crate::database::dto::{GameFilter, SortOption, SortOrder};
use crate::database::service;
use crate::entity::videogames;

#[derive(Debug, Clone)]
pub struct ShopWindow {
    pub filter: GameFilter,
    pub sort_option: SortOption,
    pub sort_order: SortOrder,
    /// Quantity text field
    pub quantity: String,
    games: Vec<videogames::Model>,
    ratings: HashMap<i32, f64>,
    selected: Option<i32>,
}

impl Default for ShopWindow {
    fn default() -> Self {
        Self {
            filter: GameFilter::default(),
            sort_option: SortOption::default(),
            sort_order: SortOrder::default(),
            quantity: "1".to_string(),
            games: Vec::new(),
            ratings: HashMap::new(),
            selected: None,
        }
    }
}

impl ShopWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn games(&self) -> &[videogames::Model] {
        &self.games
    }

    pub fn selected(&self) -> Option<&videogames::Model> {
        self.selected
            .and_then(|id| self.games.iter().find(|g| g.id == id))
    }

    /// Reloads the table with the current filter and sort.
    ///
    /// The selection survives when the game is still listed.
    pub async fn refresh(&mut self, db: &DatabaseConnection, dialogs: &mut dyn Dialogs) {
        let games =
            match service::search_games(db, &self.filter, self.sort_option, self.sort_order).await
            {
                Ok(games) => games,
                Err(e) => {
                    dialogs.error("Shop", &e.to_string());
                    return;
                }
            };
        let ids: Vec<i32> = games.iter().map(|g| g.id).collect();
        self.ratings = match service::average_ratings(db, &ids).await {
            Ok(ratings) => ratings,
            Err(e) => {
                log::warn!("could not load ratings: {}", e);
                HashMap::new()
            }
        };
        self.games = games;
        if self.selected().is_none() {
            self.selected = None;
        }
    }

    /// Table rows with the average rating appended
    pub fn rows(&self) -> Vec<String> {
        self.games
            .iter()
            .map(|game| match self.ratings.get(&game.id) {
                Some(rating) => format!("{} | {:.1}/5", game.display_row(), rating),
                None => format!("{} | not rated", game.display_row()),
            })
            .collect()
    }

    /// Selects a listed game; returns `false` when it is not in the table
    pub fn select(&mut self, game_id: i32) -> bool {
        if self.games.iter().any(|g| g.id == game_id) {
            self.selected = Some(game_id);
            true
        } else {
            false
        }
    }

    pub fn on_add_to_cart(&mut self, session: &mut Session, dialogs: &mut dyn Dialogs) -> Navigation {
        let Some(game) = self.selected().cloned() else {
            dialogs.error("Add to cart", "Select a game first");
            return Navigation::Stay;
        };
        let quantity = match self.quantity.trim().parse::<i32>() {
            Ok(quantity) if quantity >= 1 => quantity,
            _ => {
                dialogs.error("Add to cart", "Quantity must be a whole number of at least 1");
                return Navigation::Stay;
            }
        };

        let in_cart = session.cart.line(game.id).map_or(0, |l| l.quantity);
        if i64::from(in_cart) + i64::from(quantity) > i64::from(game.stock) {
            dialogs.error(
                "Add to cart",
                &format!(
                    "Only {} copies of {} in stock ({} already in your cart)",
                    game.stock, game.name, in_cart
                ),
            );
            return Navigation::Stay;
        }

        match session.cart.add_game(&game, quantity) {
            Ok(line) => {
                log::debug!("cart: {} x game {}", line.quantity, line.game_id);
                dialogs.info(
                    "Add to cart",
                    &format!("Added {} x {} to your cart", quantity, game.name),
                );
                self.quantity = "1".to_string();
            }
            Err(e) => dialogs.error("Add to cart", &e.to_string()),
        }
        Navigation::Stay
    }

    pub fn on_review(&self, dialogs: &mut dyn Dialogs) -> Navigation {
        match self.selected {
            Some(id) => Navigation::Open(Window::Review(id)),
            None => {
                dialogs.error("Reviews", "Select a game first");
                Navigation::Stay
            }
        }
    }

    pub fn on_open_cart(&self) -> Navigation {
        Navigation::Open(Window::Cart)
    }

    pub fn on_back(&self) -> Navigation {
        Navigation::Open(Window::Menu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{memory_db, new_admin, new_game, new_user};
    use crate::ui::dialogs::scripted::ScriptedDialogs;

    #[tokio::test]
    async fn adding_twice_merges_the_line() {
        let db = memory_db().await;
        let admin = new_admin(&db, "root").await;
        let game = new_game(&db, &admin, "Game A", 5999, 5).await;
        let mut session = Session::new(new_user(&db, "ana").await);
        let mut dialogs = ScriptedDialogs::default();

        let mut window = ShopWindow::new();
        window.refresh(&db, &mut dialogs).await;
        assert!(window.select(game.id));

        window.quantity = "2".into();
        window.on_add_to_cart(&mut session, &mut dialogs);
        window.quantity = "1".into();
        window.on_add_to_cart(&mut session, &mut dialogs);

        assert_eq!(session.cart.lines().len(), 1);
        assert_eq!(session.cart.total_items(), 3);
        assert!(dialogs.errors.is_empty());
    }

    #[tokio::test]
    async fn bad_quantities_and_missing_selection_are_rejected() {
        let db = memory_db().await;
        let admin = new_admin(&db, "root").await;
        let game = new_game(&db, &admin, "Game A", 5999, 2).await;
        let mut session = Session::new(new_user(&db, "ana").await);
        let mut dialogs = ScriptedDialogs::default();

        let mut window = ShopWindow::new();
        window.refresh(&db, &mut dialogs).await;
        window.on_add_to_cart(&mut session, &mut dialogs);
        assert_eq!(dialogs.last_error(), Some("Select a game first"));

        window.select(game.id);
        window.quantity = "0".into();
        window.on_add_to_cart(&mut session, &mut dialogs);
        window.quantity = "3".into();
        window.on_add_to_cart(&mut session, &mut dialogs);

        assert_eq!(dialogs.errors.len(), 3);
        assert!(session.cart.is_empty());
    }

    #[tokio::test]
    async fn filter_narrows_the_table() {
        let db = memory_db().await;
        let admin = new_admin(&db, "root").await;
        new_game(&db, &admin, "Elden Ring", 5999, 5).await;
        let halo = new_game(&db, &admin, "Halo", 3999, 0).await;
        let mut dialogs = ScriptedDialogs::default();

        let mut window = ShopWindow::new();
        window.refresh(&db, &mut dialogs).await;
        assert_eq!(window.rows().len(), 2);
        assert!(window.select(halo.id));

        window.filter.in_stock_only = true;
        window.refresh(&db, &mut dialogs).await;
        assert_eq!(window.games().len(), 1);
        assert!(window.selected().is_none());
        assert!(window.rows()[0].ends_with("not rated"));
    }
}
