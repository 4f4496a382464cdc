//! Fixtures shared by the unit tests.

use chrono::NaiveDate;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectionTrait, DatabaseConnection};

use crate::database::db::establish_connection;
use crate::database::dto::{Account, InsertGameData, InsertProfileData, NewRole, SignupData};
use crate::database::repository::profiles_repository::ProfilesRepository;
use crate::database::service;
use crate::entity::enums::{Gender, Genre, Pegi, Platform};
use crate::entity::videogames;
use crate::utils::password::hash_password;

/// Fresh in-memory database with the schema applied
pub async fn memory_db() -> DatabaseConnection {
    let db = establish_connection("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

/// Valid user signup; password `secret1`, email `<username>@mail.com`
pub fn user_signup(username: &str) -> SignupData {
    SignupData {
        username: username.to_string(),
        password: "secret1".to_string(),
        password_confirmation: "secret1".to_string(),
        email: format!("{}@mail.com", username),
        name: "Test".to_string(),
        surname: "Person".to_string(),
        telephone: "+34 600 111 222".to_string(),
        role: NewRole::User {
            gender: Gender::Female,
            card_number: "4111 1111 1111 1111".to_string(),
        },
    }
}

pub async fn new_user(db: &DatabaseConnection, username: &str) -> Account {
    service::signup(db, user_signup(username)).await.unwrap()
}

pub fn admin_signup(username: &str) -> SignupData {
    SignupData {
        role: NewRole::Admin {
            current_account: "ES91 2100 0418 4502 0005 1332".to_string(),
        },
        ..user_signup(username)
    }
}

/// Administrator inserted straight through the repository, as the seed path does
pub async fn new_admin(db: &DatabaseConnection, username: &str) -> Account {
    let data = admin_signup(username);
    ProfilesRepository::insert(
        db,
        InsertProfileData {
            username: data.username,
            password_hash: hash_password(&data.password).unwrap(),
            email: data.email,
            name: data.name,
            surname: data.surname,
            telephone: data.telephone,
            role: data.role,
        },
    )
    .await
    .unwrap()
}

pub fn game_data(name: &str, price_cents: i64, stock: i32) -> InsertGameData {
    InsertGameData {
        company_name: "Test Studio".to_string(),
        genre: Genre::Action,
        name: name.to_string(),
        platform: Platform::Pc,
        pegi: Pegi::Pegi16,
        price_cents,
        stock,
        release_date: NaiveDate::from_ymd_opt(2022, 2, 25).unwrap(),
    }
}

pub async fn new_game(
    db: &DatabaseConnection,
    admin: &Account,
    name: &str,
    price_cents: i64,
    stock: i32,
) -> videogames::Model {
    service::add_game(db, admin, game_data(name, price_cents, stock))
        .await
        .unwrap()
}

/// Makes every order insert for `game_name` abort, so one checkout line fails mid-way
pub async fn fail_orders_for(db: &DatabaseConnection, game_name: &str) {
    db.execute_unprepared(&format!(
        "CREATE TRIGGER fail_orders BEFORE INSERT ON orders WHEN NEW.game_name = '{}' \
         BEGIN SELECT RAISE(ABORT, 'order rejected'); END",
        game_name
    ))
    .await
    .unwrap();
}
