//! Data transfer objects
//!
//! Shapes passed between the window controllers and the repositories.

use chrono::NaiveDate;

use crate::entity::enums::{Gender, Genre, Pegi, Platform, ProfileKind};
use crate::entity::{admins, profiles, users};

// ==================== Profiles ====================

/// Role-specific signup data
#[derive(Clone, Debug, PartialEq)]
pub enum NewRole {
    User { gender: Gender, card_number: String },
    Admin { current_account: String },
}

impl NewRole {
    pub fn kind(&self) -> ProfileKind {
        match self {
            NewRole::User { .. } => ProfileKind::User,
            NewRole::Admin { .. } => ProfileKind::Admin,
        }
    }
}

/// Signup form contents (password still in clear text)
#[derive(Clone, Debug)]
pub struct SignupData {
    pub username: String,
    pub password: String,
    pub password_confirmation: String,
    pub email: String,
    pub name: String,
    pub surname: String,
    pub telephone: String,
    pub role: NewRole,
}

/// Profile row ready to insert (password already hashed)
#[derive(Clone, Debug)]
pub struct InsertProfileData {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub name: String,
    pub surname: String,
    pub telephone: String,
    pub role: NewRole,
}

/// Profile edit. `None` leaves a field unchanged.
#[derive(Clone, Debug, Default)]
pub struct UpdateProfileData {
    pub email: Option<String>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub telephone: Option<String>,
    pub gender: Option<Gender>,
    pub card_number: Option<String>,
    pub current_account: Option<String>,
}

/// Role-specific part of an account
#[derive(Clone, Debug, PartialEq)]
pub enum Role {
    User(users::Model),
    Admin(admins::Model),
}

/// A profile together with its role row
#[derive(Clone, Debug, PartialEq)]
pub struct Account {
    pub profile: profiles::Model,
    pub role: Role,
}

impl Account {
    pub fn id(&self) -> i32 {
        self.profile.id
    }

    pub fn username(&self) -> &str {
        &self.profile.username
    }

    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin(_))
    }

    /// One row of the profile tables.
    pub fn display_row(&self) -> String {
        let detail = match &self.role {
            Role::User(user) => format!("user | {} | card {}", user.gender, user.masked_card()),
            Role::Admin(admin) => format!("admin | account {}", admin.current_account),
        };
        format!(
            "{} | {} | {} | {} | {}",
            self.profile.username,
            self.profile.full_name(),
            self.profile.email,
            self.profile.telephone,
            detail
        )
    }
}

// ==================== Videogames ====================

/// Game insert data; also the complete form for modifications
#[derive(Clone, Debug, PartialEq)]
pub struct InsertGameData {
    pub company_name: String,
    pub genre: Genre,
    pub name: String,
    pub platform: Platform,
    pub pegi: Pegi,
    pub price_cents: i64,
    pub stock: i32,
    pub release_date: NaiveDate,
}

/// Partial game update. `None` leaves a field unchanged.
#[derive(Clone, Debug, Default)]
pub struct UpdateGameData {
    pub company_name: Option<String>,
    pub genre: Option<Genre>,
    pub name: Option<String>,
    pub platform: Option<Platform>,
    pub pegi: Option<Pegi>,
    pub price_cents: Option<i64>,
    pub stock: Option<i32>,
    pub release_date: Option<NaiveDate>,
}

impl From<InsertGameData> for UpdateGameData {
    fn from(game: InsertGameData) -> Self {
        Self {
            company_name: Some(game.company_name),
            genre: Some(game.genre),
            name: Some(game.name),
            platform: Some(game.platform),
            pegi: Some(game.pegi),
            price_cents: Some(game.price_cents),
            stock: Some(game.stock),
            release_date: Some(game.release_date),
        }
    }
}

/// Catalog filter; every `None` matches everything
#[derive(Clone, Debug, Default)]
pub struct GameFilter {
    pub name: Option<String>,
    pub genre: Option<Genre>,
    pub platform: Option<Platform>,
    pub max_pegi: Option<Pegi>,
    pub in_stock_only: bool,
}

/// Catalog sort key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOption {
    #[default]
    Name,
    Price,
    ReleaseDate,
    Addtime,
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

// ==================== Reviews ====================

/// Review form contents
#[derive(Clone, Debug)]
pub struct NewReview {
    pub user_id: i32,
    pub game_id: i32,
    pub rating: f64,
    pub comment: String,
}

/// A review with its author's username
#[derive(Clone, Debug, PartialEq)]
pub struct ReviewView {
    pub username: String,
    pub rating: f64,
    pub comment: String,
    pub created_at: i64,
}
