//! Data entities
//!
//! SeaORM entity definitions plus the enum columns they share.

pub mod prelude;

// === Enum columns ===
pub mod enums;

// === SeaORM entities (one per table) ===
pub mod admins;
pub mod orders;
pub mod profiles;
pub mod reviews;
pub mod users;
pub mod videogames;
