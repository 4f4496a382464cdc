//! Videogame repository
//!
//! Catalog CRUD plus the guarded stock decrement used at checkout.

use crate::database::dto::{GameFilter, InsertGameData, SortOption, SortOrder, UpdateGameData};
use crate::entity::prelude::*;
use crate::entity::videogames;
use sea_orm::sea_query::Expr;
use sea_orm::*;

/// Videogame data repository
pub struct GamesRepository;

impl GamesRepository {
    // ==================== Game CRUD ====================

    /// Inserts a game
    pub async fn insert(
        db: &DatabaseConnection,
        game: InsertGameData,
    ) -> Result<videogames::Model, DbErr> {
        let now = chrono::Utc::now().timestamp();

        let game_active = videogames::ActiveModel {
            id: NotSet,
            company_name: Set(game.company_name),
            genre: Set(game.genre),
            name: Set(game.name),
            platform: Set(game.platform),
            pegi: Set(game.pegi),
            price_cents: Set(game.price_cents),
            stock: Set(game.stock),
            release_date: Set(game.release_date),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
        };

        game_active.insert(db).await
    }

    /// Partial update; fields left as `None` keep their value
    pub async fn update(
        db: &DatabaseConnection,
        game_id: i32,
        updates: UpdateGameData,
    ) -> Result<videogames::Model, DbErr> {
        let now = chrono::Utc::now().timestamp();

        let game_active = videogames::ActiveModel {
            id: Set(game_id),
            company_name: updates.company_name.map_or(NotSet, Set),
            genre: updates.genre.map_or(NotSet, Set),
            name: updates.name.map_or(NotSet, Set),
            platform: updates.platform.map_or(NotSet, Set),
            pegi: updates.pegi.map_or(NotSet, Set),
            price_cents: updates.price_cents.map_or(NotSet, Set),
            stock: updates.stock.map_or(NotSet, Set),
            release_date: updates.release_date.map_or(NotSet, Set),
            updated_at: Set(Some(now)),
            ..Default::default()
        };

        game_active.update(db).await
    }

    /// Deletes a game (its reviews cascade, its orders keep the name snapshot)
    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<DeleteResult, DbErr> {
        Videogames::delete_by_id(id).exec(db).await
    }

    /// Removes `quantity` copies from stock unless fewer are left.
    ///
    /// Returns `false` when the row is missing or short on stock; nothing changes then.
    pub async fn decrement_stock<C>(conn: &C, game_id: i32, quantity: i32) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let result = Videogames::update_many()
            .col_expr(
                videogames::Column::Stock,
                Expr::col(videogames::Column::Stock).sub(quantity),
            )
            .col_expr(
                videogames::Column::UpdatedAt,
                Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(videogames::Column::Id.eq(game_id))
            .filter(videogames::Column::Stock.gte(quantity))
            .exec(conn)
            .await?;
        Ok(result.rows_affected == 1)
    }

    // ==================== Queries ====================

    /// Looks up a game by id
    pub async fn find_by_id<C>(conn: &C, id: i32) -> Result<Option<videogames::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Videogames::find_by_id(id).one(conn).await
    }

    /// Catalog search with filters and sorting
    pub async fn find_all(
        db: &DatabaseConnection,
        filter: &GameFilter,
        sort_option: SortOption,
        sort_order: SortOrder,
    ) -> Result<Vec<videogames::Model>, DbErr> {
        let order = match sort_order {
            SortOrder::Asc => Order::Asc,
            SortOrder::Desc => Order::Desc,
        };
        let column = match sort_option {
            SortOption::Name => videogames::Column::Name,
            SortOption::Price => videogames::Column::PriceCents,
            SortOption::ReleaseDate => videogames::Column::ReleaseDate,
            SortOption::Addtime => videogames::Column::Id,
        };

        let games = Self::build_base_query(filter)
            .order_by(column, order)
            .order_by_asc(videogames::Column::Id)
            .all(db)
            .await?;

        // SQLite only folds ASCII case, so names are matched here
        Ok(match Self::name_needle(filter) {
            Some(needle) => games
                .into_iter()
                .filter(|game| game.name.to_lowercase().contains(&needle))
                .collect(),
            None => games,
        })
    }

    /// Number of games in the catalog
    pub async fn count(db: &DatabaseConnection) -> Result<u64, DbErr> {
        Videogames::find().count(db).await
    }

    // ==================== Private helpers ====================

    /// Lowercased name filter, if any
    fn name_needle(filter: &GameFilter) -> Option<String> {
        filter
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_lowercase)
    }

    /// Applies the column filters; the name filter is matched after loading
    fn build_base_query(filter: &GameFilter) -> Select<Videogames> {
        let mut query = Videogames::find();

        if let Some(genre) = filter.genre {
            query = query.filter(videogames::Column::Genre.eq(genre));
        }
        if let Some(platform) = filter.platform {
            query = query.filter(videogames::Column::Platform.eq(platform));
        }
        if let Some(max_pegi) = filter.max_pegi {
            query = query.filter(videogames::Column::Pegi.lte(max_pegi));
        }
        if filter.in_stock_only {
            query = query.filter(videogames::Column::Stock.gt(0));
        }
        query
    }
}
