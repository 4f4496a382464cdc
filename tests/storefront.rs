//! Full customer journey through the window controllers.

use std::collections::VecDeque;

use chrono::NaiveDate;
use game_store_lib::database::db::establish_connection;
use game_store_lib::database::dto::InsertGameData;
use game_store_lib::database::service;
use game_store_lib::entity::enums::{Gender, Genre, Pegi, Platform};
use game_store_lib::entity::videogames;
use game_store_lib::ui::cart::CartWindow;
use game_store_lib::ui::login::LoginWindow;
use game_store_lib::ui::review::ReviewWindow;
use game_store_lib::ui::shop::ShopWindow;
use game_store_lib::ui::signup::SignupWindow;
use game_store_lib::ui::{Dialogs, Navigation, Session, Window};
use migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;

#[derive(Default)]
struct Script {
    infos: Vec<String>,
    errors: Vec<String>,
    answers: VecDeque<bool>,
}

impl Script {
    fn answer(&mut self, yes: bool) {
        self.answers.push_back(yes);
    }
}

impl Dialogs for Script {
    fn info(&mut self, _title: &str, message: &str) {
        self.infos.push(message.to_string());
    }

    fn error(&mut self, _title: &str, message: &str) {
        self.errors.push(message.to_string());
    }

    fn confirm(&mut self, _title: &str, _question: &str) -> bool {
        self.answers.pop_front().unwrap_or(false)
    }
}

async fn store() -> DatabaseConnection {
    let db = establish_connection("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

async fn stock_catalog(db: &DatabaseConnection) -> (videogames::Model, videogames::Model) {
    let admin = service::ensure_default_admin(db, "admin", "changeme")
        .await
        .unwrap()
        .unwrap();
    let game = |name: &str, price_cents: i64, stock: i32| InsertGameData {
        company_name: "Studio".to_string(),
        genre: Genre::Adventure,
        name: name.to_string(),
        platform: Platform::PlayStation5,
        pegi: Pegi::Pegi12,
        price_cents,
        stock,
        release_date: NaiveDate::from_ymd_opt(2023, 5, 12).unwrap(),
    };
    let a = service::add_game(db, &admin, game("Game A", 5999, 5)).await.unwrap();
    let b = service::add_game(db, &admin, game("Game B", 6999, 1)).await.unwrap();
    (a, b)
}

async fn sign_up_and_log_in(db: &DatabaseConnection, dialogs: &mut Script) -> Session {
    let mut signup = SignupWindow {
        username: "ana".into(),
        password: "secret1".into(),
        password_confirmation: "secret1".into(),
        email: "ana@mail.com".into(),
        name: "Ana".into(),
        surname: "Lopez".into(),
        telephone: "+34 600 111 222".into(),
        gender: Gender::Female,
        card_number: "4111 1111 1111 1111".into(),
        ..SignupWindow::new()
    };
    assert_eq!(
        signup.on_submit(db, dialogs).await,
        Navigation::Open(Window::Login)
    );
    assert_eq!(dialogs.infos.len(), 1);

    let mut login = LoginWindow {
        username: "ana".into(),
        password: "secret1".into(),
    };
    match login.on_login(db, dialogs).await {
        Navigation::LoggedIn(account) => Session::new(account),
        other => panic!("login failed: {:?} / {:?}", other, dialogs.errors),
    }
}

#[tokio::test]
async fn signup_shop_checkout_review() {
    let db = store().await;
    let (a, b) = stock_catalog(&db).await;
    let mut dialogs = Script::default();
    let mut session = sign_up_and_log_in(&db, &mut dialogs).await;

    // shop: 2 x A, then 1 x B
    let mut shop = ShopWindow::new();
    shop.refresh(&db, &mut dialogs).await;
    assert_eq!(shop.games().len(), 2);
    shop.select(a.id);
    shop.quantity = "2".into();
    shop.on_add_to_cart(&mut session, &mut dialogs);
    shop.select(b.id);
    shop.on_add_to_cart(&mut session, &mut dialogs);
    assert_eq!(shop.on_open_cart(), Navigation::Open(Window::Cart));

    // cart: totals, then checkout
    let mut cart = CartWindow::new();
    assert_eq!(cart.summary(&session.cart), "Items: 3 | Total: $189.97");
    dialogs.answer(true);
    let nav = cart.on_checkout(&db, &mut session.cart, &mut dialogs).await;
    assert_eq!(nav, Navigation::Open(Window::Shop));
    assert!(session.cart.is_empty());
    assert_eq!(cart.summary(&session.cart), "Items: 0 | Total: $0.00");

    assert_eq!(service::find_game(&db, a.id).await.unwrap().stock, 3);
    assert_eq!(service::find_game(&db, b.id).await.unwrap().stock, 0);
    let orders = service::orders_for_user(&db, session.account.id()).await.unwrap();
    assert_eq!(orders.len(), 2);

    // review A once; the second attempt is refused
    shop.refresh(&db, &mut dialogs).await;
    shop.select(a.id);
    assert_eq!(shop.on_review(&mut dialogs), Navigation::Open(Window::Review(a.id)));
    let mut review = ReviewWindow::open(&db, &session, a.id).await.unwrap();
    review.rating = "5".into();
    review.comment = "Loved it".into();
    review.on_submit(&db, &session, &mut dialogs).await;
    assert!(!review.can_submit());

    review.rating = "3".into();
    review.on_submit(&db, &session, &mut dialogs).await;
    assert_eq!(
        dialogs.errors.last().map(String::as_str),
        Some("You have already reviewed this game")
    );
    assert_eq!(service::average_rating(&db, a.id).await.unwrap(), Some(5.0));
}

#[tokio::test]
async fn checkout_over_stock_changes_nothing() {
    let db = store().await;
    let (a, b) = stock_catalog(&db).await;
    let mut dialogs = Script::default();
    let mut session = sign_up_and_log_in(&db, &mut dialogs).await;

    // the shop refuses more than the stock, so build the cart directly
    session.cart.add_game(&a, 2).unwrap();
    session.cart.add_game(&b, 2).unwrap();

    let mut cart = CartWindow::new();
    dialogs.answer(true);
    let nav = cart.on_checkout(&db, &mut session.cart, &mut dialogs).await;

    assert_eq!(nav, Navigation::Stay);
    assert_eq!(session.cart.total_items(), 4);
    assert_eq!(
        dialogs.errors.last().map(String::as_str),
        Some("Not enough stock:\n- Game B: requested 2, only 1 in stock")
    );
    assert_eq!(service::find_game(&db, a.id).await.unwrap().stock, 5);
    assert_eq!(service::find_game(&db, b.id).await.unwrap().stock, 1);
    assert!(service::orders_for_user(&db, session.account.id())
        .await
        .unwrap()
        .is_empty());
}
