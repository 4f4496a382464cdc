use sea_orm::DatabaseConnection;

use super::{Dialogs, Navigation, Session, Window};
use crate::database::dto::{NewReview, ReviewView};
use crate::database::service;
use crate::entity::videogames;

/// Reviews of one game plus the form to add one
#[derive(Debug, Clone)]
pub struct ReviewWindow {
    pub rating: String,
    pub comment: String,
    game: videogames::Model,
    reviews: Vec<ReviewView>,
    average: Option<f64>,
    already_reviewed: bool,
}

impl ReviewWindow {
    /// Loads the game and its reviews
    pub async fn open(
        db: &DatabaseConnection,
        session: &Session,
        game_id: i32,
    ) -> crate::error::Result<Self> {
        let game = service::find_game(db, game_id).await?;
        let mut window = Self {
            rating: String::new(),
            comment: String::new(),
            game,
            reviews: Vec::new(),
            average: None,
            already_reviewed: false,
        };
        window.reload(db, session).await?;
        Ok(window)
    }

    async fn reload(&mut self, db: &DatabaseConnection, session: &Session) -> crate::error::Result<()> {
        self.reviews = service::reviews_for_game(db, self.game.id).await?;
        self.average = service::average_rating(db, self.game.id).await?;
        self.already_reviewed = service::has_reviewed(db, session.account.id(), self.game.id).await?;
        Ok(())
    }

    pub fn game(&self) -> &videogames::Model {
        &self.game
    }

    /// Whether the submit button is enabled
    pub fn can_submit(&self) -> bool {
        !self.already_reviewed
    }

    /// `Elden Ring: 4.3/5 from 3 review(s)`
    pub fn header(&self) -> String {
        match self.average {
            Some(avg) => format!(
                "{}: {:.1}/5 from {} review(s)",
                self.game.name,
                avg,
                self.reviews.len()
            ),
            None => format!("{}: no reviews yet", self.game.name),
        }
    }

    pub fn rows(&self) -> Vec<String> {
        self.reviews
            .iter()
            .map(|r| format!("{} | {:.1} | {}", r.username, r.rating, r.comment))
            .collect()
    }

    pub async fn on_submit(
        &mut self,
        db: &DatabaseConnection,
        session: &Session,
        dialogs: &mut dyn Dialogs,
    ) -> Navigation {
        let rating = match self.rating.trim().replace(',', ".").parse::<f64>() {
            Ok(rating) => rating,
            Err(_) => {
                dialogs.error("Review", "The rating must be a number between 0 and 5");
                return Navigation::Stay;
            }
        };

        let review = NewReview {
            user_id: session.account.id(),
            game_id: self.game.id,
            rating,
            comment: self.comment.clone(),
        };
        match service::submit_review(db, review).await {
            Ok(_) => {
                dialogs.info("Review", "Thanks for your review!");
                self.rating.clear();
                self.comment.clear();
                if let Err(e) = self.reload(db, session).await {
                    dialogs.error("Review", &e.to_string());
                }
            }
            Err(e) => dialogs.error("Review", &e.to_string()),
        }
        Navigation::Stay
    }

    pub fn on_back(&self) -> Navigation {
        Navigation::Open(Window::Shop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{memory_db, new_admin, new_game, new_user};
    use crate::ui::dialogs::scripted::ScriptedDialogs;

    #[tokio::test]
    async fn one_review_per_user() {
        let db = memory_db().await;
        let admin = new_admin(&db, "root").await;
        let game = new_game(&db, &admin, "Game A", 5999, 5).await;
        let session = Session::new(new_user(&db, "ana").await);
        let mut dialogs = ScriptedDialogs::default();

        let mut window = ReviewWindow::open(&db, &session, game.id).await.unwrap();
        assert_eq!(window.header(), "Game A: no reviews yet");
        assert!(window.can_submit());

        window.rating = "4,5".into();
        window.comment = "Great".into();
        window.on_submit(&db, &session, &mut dialogs).await;
        assert_eq!(window.header(), "Game A: 4.5/5 from 1 review(s)");
        assert_eq!(window.rows(), ["ana | 4.5 | Great"]);
        assert!(!window.can_submit());

        window.rating = "1".into();
        window.on_submit(&db, &session, &mut dialogs).await;
        assert_eq!(dialogs.last_error(), Some("You have already reviewed this game"));
    }

    #[tokio::test]
    async fn rating_must_be_a_half_step() {
        let db = memory_db().await;
        let admin = new_admin(&db, "root").await;
        let game = new_game(&db, &admin, "Game A", 5999, 5).await;
        let session = Session::new(new_user(&db, "ana").await);
        let mut dialogs = ScriptedDialogs::default();

        let mut window = ReviewWindow::open(&db, &session, game.id).await.unwrap();
        window.rating = "great".into();
        window.on_submit(&db, &session, &mut dialogs).await;
        window.rating = "4.3".into();
        window.on_submit(&db, &session, &mut dialogs).await;

        assert_eq!(dialogs.errors.len(), 2);
        assert!(window.can_submit());
    }
}
