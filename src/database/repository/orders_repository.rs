use crate::cart::CartLine;
use crate::entity::orders;
use crate::entity::prelude::*;
use sea_orm::*;

/// Order data repository
pub struct OrdersRepository;

impl OrdersRepository {
    /// Records one purchased cart line
    pub async fn insert<C>(conn: &C, line: &CartLine) -> Result<orders::Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let order = orders::ActiveModel {
            id: NotSet,
            user_id: Set(line.user_id),
            game_id: Set(Some(line.game_id)),
            game_name: Set(line.game_name.clone()),
            unit_price_cents: Set(line.unit_price_cents),
            quantity: Set(line.quantity),
            created_at: Set(chrono::Utc::now().timestamp()),
        };

        order.insert(conn).await
    }

    /// Purchase history of a user, newest first
    pub async fn find_by_user(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> Result<Vec<orders::Model>, DbErr> {
        Orders::find()
            .filter(orders::Column::UserId.eq(user_id))
            .order_by_desc(orders::Column::CreatedAt)
            .order_by_desc(orders::Column::Id)
            .all(db)
            .await
    }
}
