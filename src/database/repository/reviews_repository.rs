use crate::database::dto::{NewReview, ReviewView};
use crate::entity::prelude::*;
use crate::entity::reviews;
use sea_orm::*;

/// Review data repository
pub struct ReviewsRepository;

impl ReviewsRepository {
    /// Inserts a review; the (user_id, game_id) unique index rejects duplicates
    pub async fn insert(
        db: &DatabaseConnection,
        review: NewReview,
    ) -> Result<reviews::Model, DbErr> {
        let review = reviews::ActiveModel {
            id: NotSet,
            user_id: Set(review.user_id),
            game_id: Set(review.game_id),
            rating: Set(review.rating),
            comment: Set(review.comment),
            created_at: Set(chrono::Utc::now().timestamp()),
        };

        review.insert(db).await
    }

    /// Whether the user already reviewed the game
    pub async fn exists(
        db: &DatabaseConnection,
        user_id: i32,
        game_id: i32,
    ) -> Result<bool, DbErr> {
        Ok(Reviews::find()
            .filter(reviews::Column::UserId.eq(user_id))
            .filter(reviews::Column::GameId.eq(game_id))
            .count(db)
            .await?
            > 0)
    }

    /// Reviews of a game with their authors, newest first
    pub async fn find_by_game(
        db: &DatabaseConnection,
        game_id: i32,
    ) -> Result<Vec<ReviewView>, DbErr> {
        let rows = Reviews::find()
            .filter(reviews::Column::GameId.eq(game_id))
            .find_also_related(Profiles)
            .order_by_desc(reviews::Column::CreatedAt)
            .order_by_desc(reviews::Column::Id)
            .all(db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(review, profile)| ReviewView {
                username: profile.map(|p| p.username).unwrap_or_default(),
                rating: review.rating,
                comment: review.comment,
                created_at: review.created_at,
            })
            .collect())
    }

    /// Mean rating of a game, `None` when nobody reviewed it
    pub async fn average_rating(
        db: &DatabaseConnection,
        game_id: i32,
    ) -> Result<Option<f64>, DbErr> {
        let ratings: Vec<f64> = Reviews::find()
            .select_only()
            .column(reviews::Column::Rating)
            .filter(reviews::Column::GameId.eq(game_id))
            .into_tuple()
            .all(db)
            .await?;

        if ratings.is_empty() {
            return Ok(None);
        }
        Ok(Some(ratings.iter().sum::<f64>() / ratings.len() as f64))
    }
}
