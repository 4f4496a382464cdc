//! Store service
//!
//! The business facade between the window controllers and the repositories. Every function
//! takes the shared connection by reference, validates its input, calls the repositories and
//! lifts `DbErr` into `StoreError`.

use std::collections::HashMap;
use std::path::Path;

use sea_orm::{DatabaseConnection, DbErr, SqlErr, TransactionTrait};

use crate::cart::{Cart, CartLine};
use crate::database::db::{self, BackupResult};
use crate::database::dto::{
    Account, GameFilter, InsertGameData, InsertProfileData, NewReview, NewRole, ReviewView, Role,
    SignupData, SortOption, SortOrder, UpdateGameData, UpdateProfileData,
};
use crate::database::repository::{
    games_repository::GamesRepository, orders_repository::OrdersRepository,
    profiles_repository::ProfilesRepository, reviews_repository::ReviewsRepository,
};
use crate::entity::{orders, reviews, videogames};
use crate::error::{Result, StockShortage, StoreError};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validate;

// ==================== Accounts ====================

fn validate_role(role: &NewRole) -> Result<()> {
    match role {
        NewRole::User { card_number, .. } => {
            if !validate::is_valid_card_number(card_number) {
                return Err(StoreError::Validation(
                    "The card number must have 13 to 19 digits".to_string(),
                ));
            }
        }
        NewRole::Admin { current_account } => {
            validate::require_filled(&[("Current account", current_account)])
                .map_err(StoreError::Validation)?;
        }
    }
    Ok(())
}

fn validate_contact(email: &str, telephone: &str) -> Result<()> {
    if !validate::is_valid_email(email) {
        return Err(StoreError::Validation(format!(
            "'{}' is not a valid email address",
            email
        )));
    }
    if !validate::is_valid_telephone(telephone) {
        return Err(StoreError::Validation(format!(
            "'{}' is not a valid telephone number",
            telephone
        )));
    }
    Ok(())
}

/// Public signup. Only regular user accounts can be created this way.
pub async fn signup(db: &DatabaseConnection, data: SignupData) -> Result<Account> {
    if let NewRole::Admin { .. } = data.role {
        log::warn!("signup rejected, {} asked for an administrator account", data.username);
        return Err(StoreError::Forbidden);
    }
    create_account(db, data).await
}

/// Creates another administrator; administrators only
pub async fn create_admin(
    db: &DatabaseConnection,
    actor: &Account,
    data: SignupData,
) -> Result<Account> {
    require_admin(actor)?;
    if !matches!(data.role, NewRole::Admin { .. }) {
        return Err(StoreError::Validation(
            "Administrator accounts need a current account".to_string(),
        ));
    }
    let account = create_account(db, data).await?;
    log::info!("{} created administrator {}", actor.username(), account.username());
    Ok(account)
}

/// Validates and inserts an account. The password is stored as an argon2 hash.
async fn create_account(db: &DatabaseConnection, data: SignupData) -> Result<Account> {
    validate::require_filled(&[
        ("Username", &data.username),
        ("Password", &data.password),
        ("Email", &data.email),
        ("Name", &data.name),
        ("Surname", &data.surname),
        ("Telephone", &data.telephone),
    ])
    .map_err(StoreError::Validation)?;
    let username = data.username.trim().to_string();
    let email = data.email.trim().to_string();
    if !validate::is_valid_username(&username) {
        return Err(StoreError::Validation(
            "Usernames have 3 to 32 letters, digits, '.', '-' or '_'".to_string(),
        ));
    }
    validate::check_password(&data.password, &data.password_confirmation)
        .map_err(StoreError::Validation)?;
    validate_contact(&email, &data.telephone)?;
    validate_role(&data.role)?;

    if ProfilesRepository::username_exists(db, &username, None).await? {
        log::warn!("signup rejected, username taken: {}", username);
        return Err(StoreError::UsernameTaken(username));
    }
    if ProfilesRepository::email_exists(db, &email, None).await? {
        log::warn!("signup rejected, email taken: {}", email);
        return Err(StoreError::EmailTaken(email));
    }

    let password_hash = hash_password(&data.password).map_err(StoreError::Password)?;
    let account = ProfilesRepository::insert(
        db,
        InsertProfileData {
            username,
            password_hash,
            email,
            name: data.name.trim().to_string(),
            surname: data.surname.trim().to_string(),
            telephone: data.telephone.trim().to_string(),
            role: data.role,
        },
    )
    .await?;

    log::info!(
        "created {:?} profile {} ({})",
        account.profile.kind,
        account.id(),
        account.username()
    );
    Ok(account)
}

/// Checks the credentials; unknown usernames and wrong passwords look the same.
pub async fn login(db: &DatabaseConnection, username: &str, password: &str) -> Result<Account> {
    let Some(account) = ProfilesRepository::find_by_username(db, username.trim()).await? else {
        log::warn!("login failed, unknown username: {}", username);
        return Err(StoreError::InvalidCredentials);
    };

    if !verify_password(password, &account.profile.password_hash).map_err(StoreError::Password)? {
        log::warn!("login failed, wrong password for {}", username);
        return Err(StoreError::InvalidCredentials);
    }

    log::info!("{} logged in", account.username());
    Ok(account)
}

pub async fn find_account(db: &DatabaseConnection, id: i32) -> Result<Account> {
    ProfilesRepository::find_by_id(db, id)
        .await?
        .ok_or(StoreError::not_found("Profile", id))
}

/// Every account; administrators only
pub async fn list_accounts(db: &DatabaseConnection, actor: &Account) -> Result<Vec<Account>> {
    require_admin(actor)?;
    Ok(ProfilesRepository::find_all(db).await?)
}

/// Edits contact and role fields of a profile
pub async fn update_profile(
    db: &DatabaseConnection,
    id: i32,
    updates: UpdateProfileData,
) -> Result<Account> {
    let current = find_account(db, id).await?;

    for (label, value) in [
        ("Email", &updates.email),
        ("Name", &updates.name),
        ("Surname", &updates.surname),
        ("Telephone", &updates.telephone),
        ("Card number", &updates.card_number),
        ("Current account", &updates.current_account),
    ] {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err(StoreError::Validation(format!("{} cannot be empty", label)));
        }
    }
    let email = updates.email.as_deref().unwrap_or(&current.profile.email);
    let telephone = updates
        .telephone
        .as_deref()
        .unwrap_or(&current.profile.telephone);
    validate_contact(email.trim(), telephone)?;

    match &current.role {
        Role::User(user) => {
            if updates.current_account.is_some() {
                return Err(StoreError::Validation(
                    "Only administrators have a current account".to_string(),
                ));
            }
            validate_role(&NewRole::User {
                gender: updates.gender.unwrap_or(user.gender),
                card_number: updates
                    .card_number
                    .clone()
                    .unwrap_or_else(|| user.card_number.clone()),
            })?;
        }
        Role::Admin(_) => {
            if updates.gender.is_some() || updates.card_number.is_some() {
                return Err(StoreError::Validation(
                    "Administrators have no gender or card number".to_string(),
                ));
            }
        }
    }

    if let Some(email) = &updates.email {
        if ProfilesRepository::email_exists(db, email.trim(), Some(id)).await? {
            return Err(StoreError::EmailTaken(email.trim().to_string()));
        }
    }

    let updates = UpdateProfileData {
        email: updates.email.map(|e| e.trim().to_string()),
        name: updates.name.map(|n| n.trim().to_string()),
        surname: updates.surname.map(|s| s.trim().to_string()),
        telephone: updates.telephone.map(|t| t.trim().to_string()),
        ..updates
    };
    let account = ProfilesRepository::update(db, id, updates).await?;
    log::info!("updated profile {}", id);
    Ok(account)
}

/// Changes a password after checking the current one
pub async fn change_password(
    db: &DatabaseConnection,
    id: i32,
    current_password: &str,
    new_password: &str,
    confirmation: &str,
) -> Result<()> {
    let account = find_account(db, id).await?;
    if !verify_password(current_password, &account.profile.password_hash)
        .map_err(StoreError::Password)?
    {
        return Err(StoreError::InvalidCredentials);
    }
    validate::check_password(new_password, confirmation).map_err(StoreError::Validation)?;

    let hash = hash_password(new_password).map_err(StoreError::Password)?;
    ProfilesRepository::update_password(db, id, hash).await?;
    log::info!("password changed for profile {}", id);
    Ok(())
}

/// Deletes a profile.
///
/// Users may only delete themselves; administrators may delete anyone but themselves.
pub async fn delete_profile(db: &DatabaseConnection, actor: &Account, target_id: i32) -> Result<()> {
    if actor.is_admin() {
        if actor.id() == target_id {
            log::warn!("admin {} tried to delete their own profile", actor.id());
            return Err(StoreError::SelfDeletion);
        }
    } else if actor.id() != target_id {
        return Err(StoreError::Forbidden);
    }

    let result = ProfilesRepository::delete(db, target_id).await?;
    if result.rows_affected == 0 {
        return Err(StoreError::not_found("Profile", target_id));
    }
    log::info!("profile {} deleted by {}", target_id, actor.username());
    Ok(())
}

/// Creates the first administrator when the store has none.
///
/// Returns `None` if an administrator already exists.
pub async fn ensure_default_admin(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<Option<Account>> {
    if ProfilesRepository::count_admins(db).await? > 0 {
        return Ok(None);
    }

    let account = create_account(
        db,
        SignupData {
            username: username.to_string(),
            password: password.to_string(),
            password_confirmation: password.to_string(),
            email: format!("{}@store.local", username),
            name: "Store".to_string(),
            surname: "Administrator".to_string(),
            telephone: "000000".to_string(),
            role: NewRole::Admin {
                current_account: "unassigned".to_string(),
            },
        },
    )
    .await?;
    log::info!("seeded administrator {}", account.username());
    Ok(Some(account))
}

fn require_admin(actor: &Account) -> Result<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        log::warn!("{} attempted an administrator action", actor.username());
        Err(StoreError::Forbidden)
    }
}

// ==================== Catalog ====================

fn validate_game(game: &InsertGameData) -> Result<()> {
    validate::require_filled(&[("Name", &game.name), ("Company", &game.company_name)])
        .map_err(StoreError::Validation)?;
    if game.price_cents < 0 {
        return Err(StoreError::Validation("The price cannot be negative".to_string()));
    }
    if game.stock < 0 {
        return Err(StoreError::Validation("The stock cannot be negative".to_string()));
    }
    Ok(())
}

/// Adds a game to the catalog; administrators only
pub async fn add_game(
    db: &DatabaseConnection,
    actor: &Account,
    game: InsertGameData,
) -> Result<videogames::Model> {
    require_admin(actor)?;
    validate_game(&game)?;

    let game = InsertGameData {
        name: game.name.trim().to_string(),
        company_name: game.company_name.trim().to_string(),
        ..game
    };
    let model = GamesRepository::insert(db, game).await?;
    log::info!("added game {} ({})", model.id, model.name);
    Ok(model)
}

/// Writes back an edit form; administrators only
pub async fn modify_game(
    db: &DatabaseConnection,
    actor: &Account,
    game_id: i32,
    updates: UpdateGameData,
) -> Result<videogames::Model> {
    require_admin(actor)?;
    let current = find_game(db, game_id).await?;

    // validate the merged result, not just the changed fields
    let merged = InsertGameData {
        company_name: updates
            .company_name
            .clone()
            .unwrap_or(current.company_name),
        genre: updates.genre.unwrap_or(current.genre),
        name: updates.name.clone().unwrap_or(current.name),
        platform: updates.platform.unwrap_or(current.platform),
        pegi: updates.pegi.unwrap_or(current.pegi),
        price_cents: updates.price_cents.unwrap_or(current.price_cents),
        stock: updates.stock.unwrap_or(current.stock),
        release_date: updates.release_date.unwrap_or(current.release_date),
    };
    validate_game(&merged)?;

    let updates = UpdateGameData {
        name: updates.name.map(|n| n.trim().to_string()),
        company_name: updates.company_name.map(|c| c.trim().to_string()),
        ..updates
    };
    match GamesRepository::update(db, game_id, updates).await {
        Ok(model) => {
            log::info!("modified game {} ({})", model.id, model.name);
            Ok(model)
        }
        Err(DbErr::RecordNotUpdated) => Err(StoreError::not_found("Game", game_id)),
        Err(e) => {
            log::error!("failed to modify game {}: {}", game_id, e);
            Err(e.into())
        }
    }
}

/// Removes a game from the catalog; administrators only
pub async fn delete_game(db: &DatabaseConnection, actor: &Account, game_id: i32) -> Result<()> {
    require_admin(actor)?;
    let result = GamesRepository::delete(db, game_id).await?;
    if result.rows_affected == 0 {
        return Err(StoreError::not_found("Game", game_id));
    }
    log::info!("deleted game {}", game_id);
    Ok(())
}

pub async fn find_game(db: &DatabaseConnection, game_id: i32) -> Result<videogames::Model> {
    GamesRepository::find_by_id(db, game_id)
        .await?
        .ok_or(StoreError::not_found("Game", game_id))
}

pub async fn search_games(
    db: &DatabaseConnection,
    filter: &GameFilter,
    sort_option: SortOption,
    sort_order: SortOrder,
) -> Result<Vec<videogames::Model>> {
    Ok(GamesRepository::find_all(db, filter, sort_option, sort_order).await?)
}

pub async fn count_games(db: &DatabaseConnection) -> Result<u64> {
    Ok(GamesRepository::count(db).await?)
}

// ==================== Checkout ====================

/// A cart line that could not be turned into an order
#[derive(Debug, Clone, PartialEq)]
pub struct LineFailure {
    pub game_id: i32,
    pub game_name: String,
    pub reason: String,
}

/// Result of a checkout that passed the stock check
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutReport {
    pub orders: Vec<orders::Model>,
    pub failures: Vec<LineFailure>,
}

impl CheckoutReport {
    /// Every line became an order
    pub fn is_total_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn total_cents(&self) -> i64 {
        self.orders.iter().map(orders::Model::total_cents).sum()
    }

    /// Game ids that were ordered
    pub fn ordered_game_ids(&self) -> Vec<i32> {
        self.orders.iter().filter_map(|o| o.game_id).collect()
    }
}

/// Checks every line against current stock without changing anything
pub async fn check_stock(db: &DatabaseConnection, cart: &Cart) -> Result<Vec<StockShortage>> {
    let mut shortages = Vec::new();
    for line in cart.lines() {
        let available = GamesRepository::find_by_id(db, line.game_id)
            .await?
            .map(|game| game.stock);
        if available.is_none_or(|stock| stock < line.quantity) {
            shortages.push(StockShortage {
                game_id: line.game_id,
                game_name: line.game_name.clone(),
                requested: line.quantity,
                available,
            });
        }
    }
    Ok(shortages)
}

/// Turns the cart into orders.
///
/// Aborts before writing anything when the cart is empty or any line exceeds stock. After
/// that, each line is placed in its own transaction; a failing line is reported and the
/// remaining lines still go through.
pub async fn checkout(db: &DatabaseConnection, cart: &Cart) -> Result<CheckoutReport> {
    if cart.is_empty() {
        return Err(StoreError::EmptyCart);
    }

    let shortages = check_stock(db, cart).await?;
    if !shortages.is_empty() {
        log::warn!(
            "checkout for user {} aborted, {} line(s) short on stock",
            cart.user_id(),
            shortages.len()
        );
        return Err(StoreError::InsufficientStock(shortages));
    }

    let mut report = CheckoutReport::default();
    for line in cart.lines() {
        match place_line(db, line).await {
            Ok(order) => report.orders.push(order),
            Err(e) => {
                log::error!("order line for game {} failed: {}", line.game_id, e);
                report.failures.push(LineFailure {
                    game_id: line.game_id,
                    game_name: line.game_name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    log::info!(
        "checkout for user {}: {} order(s), {} failure(s)",
        cart.user_id(),
        report.orders.len(),
        report.failures.len()
    );
    Ok(report)
}

/// Stock decrement and order insert for one line, in one transaction
async fn place_line(db: &DatabaseConnection, line: &CartLine) -> Result<orders::Model> {
    let txn = db.begin().await?;

    if !GamesRepository::decrement_stock(&txn, line.game_id, line.quantity).await? {
        let available = GamesRepository::find_by_id(&txn, line.game_id)
            .await?
            .map(|game| game.stock);
        return Err(StoreError::InsufficientStock(vec![StockShortage {
            game_id: line.game_id,
            game_name: line.game_name.clone(),
            requested: line.quantity,
            available,
        }]));
    }
    let order = OrdersRepository::insert(&txn, line).await?;

    txn.commit().await?;
    Ok(order)
}

pub async fn orders_for_user(db: &DatabaseConnection, user_id: i32) -> Result<Vec<orders::Model>> {
    Ok(OrdersRepository::find_by_user(db, user_id).await?)
}

// ==================== Reviews ====================

/// 0 to 5 in half-point steps
pub fn is_valid_rating(rating: f64) -> bool {
    (0.0..=5.0).contains(&rating) && (rating * 2.0).fract() == 0.0
}

/// Stores a review; one per user and game
pub async fn submit_review(db: &DatabaseConnection, review: NewReview) -> Result<reviews::Model> {
    if !is_valid_rating(review.rating) {
        return Err(StoreError::InvalidRating(review.rating));
    }
    find_game(db, review.game_id).await?;
    if ReviewsRepository::exists(db, review.user_id, review.game_id).await? {
        log::warn!(
            "user {} already reviewed game {}",
            review.user_id,
            review.game_id
        );
        return Err(StoreError::AlreadyReviewed);
    }

    let review = NewReview {
        comment: review.comment.trim().to_string(),
        ..review
    };
    match ReviewsRepository::insert(db, review).await {
        Ok(model) => {
            log::info!(
                "user {} rated game {} with {}",
                model.user_id,
                model.game_id,
                model.rating
            );
            Ok(model)
        }
        // lost a race against a concurrent insert
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            Err(StoreError::AlreadyReviewed)
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn has_reviewed(db: &DatabaseConnection, user_id: i32, game_id: i32) -> Result<bool> {
    Ok(ReviewsRepository::exists(db, user_id, game_id).await?)
}

pub async fn reviews_for_game(db: &DatabaseConnection, game_id: i32) -> Result<Vec<ReviewView>> {
    Ok(ReviewsRepository::find_by_game(db, game_id).await?)
}

pub async fn average_rating(db: &DatabaseConnection, game_id: i32) -> Result<Option<f64>> {
    Ok(ReviewsRepository::average_rating(db, game_id).await?)
}

/// Average rating of several games at once, for catalog tables
pub async fn average_ratings(
    db: &DatabaseConnection,
    game_ids: &[i32],
) -> Result<HashMap<i32, f64>> {
    let mut ratings = HashMap::new();
    for &game_id in game_ids {
        if let Some(avg) = ReviewsRepository::average_rating(db, game_id).await? {
            ratings.insert(game_id, avg);
        }
    }
    Ok(ratings)
}

// ==================== Maintenance ====================

/// Hot database backup into `backup_dir`; administrators only
pub async fn backup_database(
    db: &DatabaseConnection,
    actor: &Account,
    backup_dir: &Path,
) -> Result<BackupResult> {
    require_admin(actor)?;
    Ok(db::backup_database(db, backup_dir).await?)
}
