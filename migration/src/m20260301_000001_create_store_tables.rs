//! Baseline store schema
//!
//! Profiles use joined-table inheritance: `profiles` holds the shared identity columns,
//! `users` and `admins` hold the role-specific columns keyed by the profile id.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 1. profiles
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profiles::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Profiles::Username).text().not_null().unique_key())
                    .col(ColumnDef::new(Profiles::PasswordHash).text().not_null())
                    .col(ColumnDef::new(Profiles::Email).text().not_null().unique_key())
                    .col(ColumnDef::new(Profiles::Name).text().not_null())
                    .col(ColumnDef::new(Profiles::Surname).text().not_null())
                    .col(ColumnDef::new(Profiles::Telephone).text().not_null())
                    .col(ColumnDef::new(Profiles::Kind).text().not_null())
                    .col(ColumnDef::new(Profiles::CreatedAt).big_integer().null())
                    .col(ColumnDef::new(Profiles::UpdatedAt).big_integer().null())
                    .to_owned(),
            )
            .await?;

        // 2. users
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::ProfileId)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Gender).text().not_null())
                    .col(ColumnDef::new(Users::CardNumber).text().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_profile")
                            .from(Users::Table, Users::ProfileId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 3. admins
        manager
            .create_table(
                Table::create()
                    .table(Admins::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Admins::ProfileId)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Admins::CurrentAccount).text().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_admins_profile")
                            .from(Admins::Table, Admins::ProfileId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 4. videogames
        manager
            .create_table(
                Table::create()
                    .table(Videogames::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Videogames::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Videogames::CompanyName).text().not_null())
                    .col(ColumnDef::new(Videogames::Genre).text().not_null())
                    .col(ColumnDef::new(Videogames::Name).text().not_null())
                    .col(ColumnDef::new(Videogames::Platform).text().not_null())
                    .col(ColumnDef::new(Videogames::Pegi).integer().not_null())
                    .col(ColumnDef::new(Videogames::PriceCents).big_integer().not_null())
                    .col(
                        ColumnDef::new(Videogames::Stock)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Videogames::ReleaseDate).date().not_null())
                    .col(ColumnDef::new(Videogames::CreatedAt).big_integer().null())
                    .col(ColumnDef::new(Videogames::UpdatedAt).big_integer().null())
                    .to_owned(),
            )
            .await?;

        // 5. orders (game_id is cleared when a game is withdrawn, the name snapshot stays)
        manager
            .create_table(
                Table::create()
                    .table(Orders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Orders::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Orders::UserId).integer().not_null())
                    .col(ColumnDef::new(Orders::GameId).integer().null())
                    .col(ColumnDef::new(Orders::GameName).text().not_null())
                    .col(ColumnDef::new(Orders::UnitPriceCents).big_integer().not_null())
                    .col(ColumnDef::new(Orders::Quantity).integer().not_null())
                    .col(ColumnDef::new(Orders::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_profile")
                            .from(Orders::Table, Orders::UserId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_orders_videogame")
                            .from(Orders::Table, Orders::GameId)
                            .to(Videogames::Table, Videogames::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 6. reviews
        manager
            .create_table(
                Table::create()
                    .table(Reviews::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reviews::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reviews::UserId).integer().not_null())
                    .col(ColumnDef::new(Reviews::GameId).integer().not_null())
                    .col(ColumnDef::new(Reviews::Rating).double().not_null())
                    .col(ColumnDef::new(Reviews::Comment).text().not_null())
                    .col(ColumnDef::new(Reviews::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_profile")
                            .from(Reviews::Table, Reviews::UserId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_videogame")
                            .from(Reviews::Table, Reviews::GameId)
                            .to(Videogames::Table, Videogames::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reviews::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Orders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Videogames::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Admins::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Profiles {
    Table,
    Id,
    Username,
    PasswordHash,
    Email,
    Name,
    Surname,
    Telephone,
    Kind,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    ProfileId,
    Gender,
    CardNumber,
}

#[derive(DeriveIden)]
enum Admins {
    Table,
    ProfileId,
    CurrentAccount,
}

#[derive(DeriveIden)]
enum Videogames {
    Table,
    Id,
    CompanyName,
    Genre,
    Name,
    Platform,
    Pegi,
    PriceCents,
    Stock,
    ReleaseDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Orders {
    Table,
    Id,
    UserId,
    GameId,
    GameName,
    UnitPriceCents,
    Quantity,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Reviews {
    Table,
    Id,
    UserId,
    GameId,
    Rating,
    Comment,
    CreatedAt,
}
