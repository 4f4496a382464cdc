//! Administrator catalog table: add, modify and delete games.

use sea_orm::DatabaseConnection;

use super::{Dialogs, Navigation, Session, Window};
use crate::database::dto::{GameFilter, SortOption, SortOrder};
use crate::database::service;
use crate::entity::videogames;

#[derive(Debug, Clone, Default)]
pub struct AdminShopWindow {
    pub filter: GameFilter,
    games: Vec<videogames::Model>,
    selected: Option<i32>,
}

impl AdminShopWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn games(&self) -> &[videogames::Model] {
        &self.games
    }

    pub fn selected(&self) -> Option<i32> {
        self.selected
    }

    pub async fn refresh(&mut self, db: &DatabaseConnection, dialogs: &mut dyn Dialogs) {
        match service::search_games(db, &self.filter, SortOption::Addtime, SortOrder::Asc).await {
            Ok(games) => {
                if !self
                    .selected
                    .is_some_and(|id| games.iter().any(|g| g.id == id))
                {
                    self.selected = None;
                }
                self.games = games;
            }
            Err(e) => dialogs.error("Catalog", &e.to_string()),
        }
    }

    pub fn rows(&self) -> Vec<String> {
        self.games
            .iter()
            .map(|g| format!("#{} | {}", g.id, g.display_row()))
            .collect()
    }

    pub fn select(&mut self, game_id: i32) -> bool {
        if self.games.iter().any(|g| g.id == game_id) {
            self.selected = Some(game_id);
            true
        } else {
            false
        }
    }

    pub fn on_add(&self) -> Navigation {
        Navigation::Open(Window::GameForm(None))
    }

    pub fn on_modify(&self, dialogs: &mut dyn Dialogs) -> Navigation {
        match self.selected {
            Some(id) => Navigation::Open(Window::GameForm(Some(id))),
            None => {
                dialogs.error("Modify game", "Select a game first");
                Navigation::Stay
            }
        }
    }

    pub async fn on_delete(
        &mut self,
        db: &DatabaseConnection,
        session: &Session,
        dialogs: &mut dyn Dialogs,
    ) -> Navigation {
        let Some(game) = self
            .selected
            .and_then(|id| self.games.iter().find(|g| g.id == id))
        else {
            dialogs.error("Delete game", "Select a game first");
            return Navigation::Stay;
        };
        let (id, name) = (game.id, game.name.clone());

        if !dialogs.confirm("Delete game", &format!("Delete {} from the catalog?", name)) {
            return Navigation::Stay;
        }
        match service::delete_game(db, &session.account, id).await {
            Ok(()) => {
                dialogs.info("Delete game", &format!("{} deleted", name));
                self.selected = None;
                self.refresh(db, dialogs).await;
            }
            Err(e) => dialogs.error("Delete game", &e.to_string()),
        }
        Navigation::Stay
    }

    pub fn on_back(&self) -> Navigation {
        Navigation::Open(Window::Menu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{memory_db, new_admin, new_game};
    use crate::ui::dialogs::scripted::ScriptedDialogs;

    #[tokio::test]
    async fn delete_needs_selection_and_confirmation() {
        let db = memory_db().await;
        let session = Session::new(new_admin(&db, "root").await);
        let game = new_game(&db, &session.account, "Game A", 5999, 5).await;
        let mut dialogs = ScriptedDialogs::answering(&[false, true]);

        let mut window = AdminShopWindow::new();
        window.refresh(&db, &mut dialogs).await;
        window.on_delete(&db, &session, &mut dialogs).await;
        assert_eq!(dialogs.last_error(), Some("Select a game first"));
        assert_eq!(window.on_modify(&mut dialogs), Navigation::Stay);

        window.select(game.id);
        window.on_delete(&db, &session, &mut dialogs).await;
        assert_eq!(window.games().len(), 1);

        window.on_delete(&db, &session, &mut dialogs).await;
        assert!(window.games().is_empty());
        assert_eq!(window.selected(), None);
        assert_eq!(dialogs.infos, ["Game A deleted"]);
    }

    #[tokio::test]
    async fn modify_opens_the_form_for_the_selection() {
        let db = memory_db().await;
        let session = Session::new(new_admin(&db, "root").await);
        let game = new_game(&db, &session.account, "Game A", 5999, 5).await;
        let mut dialogs = ScriptedDialogs::default();

        let mut window = AdminShopWindow::new();
        window.refresh(&db, &mut dialogs).await;
        assert!(window.select(game.id));
        assert_eq!(
            window.on_modify(&mut dialogs),
            Navigation::Open(Window::GameForm(Some(game.id)))
        );
        assert!(window.rows()[0].starts_with(&format!("#{} | Game A", game.id)));
    }
}
