//! Review and catalog indexes
//!
//! 1. reviews gets a unique (user_id, game_id) index, one review per user and game
//! 2. videogames gets an index on name for catalog searches

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_user_game")
                    .table(Reviews::Table)
                    .col(Reviews::UserId)
                    .col(Reviews::GameId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_videogames_name")
                    .table(Videogames::Table)
                    .col(Videogames::Name)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_videogames_name")
                    .table(Videogames::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_reviews_user_game")
                    .table(Reviews::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Reviews {
    Table,
    UserId,
    GameId,
}

#[derive(DeriveIden)]
enum Videogames {
    Table,
    Name,
}
