use sea_orm::DbErr;
use thiserror::Error;

use crate::cart::CartError;

/// A cart line asking for more copies than the catalog holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockShortage {
    pub game_id: i32,
    pub game_name: String,
    pub requested: i32,
    /// `None` when the game is no longer in the catalog
    pub available: Option<i32>,
}

impl std::fmt::Display for StockShortage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.available {
            Some(available) => write!(
                f,
                "{}: requested {}, only {} in stock",
                self.game_name, self.requested, available
            ),
            None => write!(f, "{}: no longer available", self.game_name),
        }
    }
}

fn itemize(shortages: &[StockShortage]) -> String {
    shortages
        .iter()
        .map(|s| format!("- {}", s))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),

    #[error("Username '{0}' is already taken")]
    UsernameTaken(String),

    #[error("Email '{0}' is already registered")]
    EmailTaken(String),

    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },

    #[error("An administrator cannot delete their own profile")]
    SelfDeletion,

    #[error("Only administrators can do that")]
    Forbidden,

    #[error("You have already reviewed this game")]
    AlreadyReviewed,

    #[error("Rating must be between 0 and 5 in steps of 0.5, got {0}")]
    InvalidRating(f64),

    #[error("The cart is empty")]
    EmptyCart,

    #[error("Not enough stock:\n{}", itemize(.0))]
    InsufficientStock(Vec<StockShortage>),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error("Configuration error: {0}")]
    Config(#[from] store_path::NoDataDir),

    #[error("Password error: {0}")]
    Password(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        StoreError::NotFound { entity, id }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortage_message_is_itemized() {
        let err = StoreError::InsufficientStock(vec![
            StockShortage {
                game_id: 1,
                game_name: "Elden Ring".into(),
                requested: 3,
                available: Some(1),
            },
            StockShortage {
                game_id: 2,
                game_name: "Halo".into(),
                requested: 1,
                available: None,
            },
        ]);
        assert_eq!(
            err.to_string(),
            "Not enough stock:\n- Elden Ring: requested 3, only 1 in stock\n- Halo: no longer available"
        );
    }

    #[test]
    fn path_failures_are_configuration_errors() {
        let err = StoreError::from(store_path::NoDataDir);
        assert!(matches!(err, StoreError::Config(_)));
        assert_eq!(
            err.to_string(),
            "Configuration error: cannot resolve the user data directory"
        );
    }
}
