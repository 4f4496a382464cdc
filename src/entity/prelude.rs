//! Common re-exports.

// === SeaORM entities ===
pub use super::admins::Entity as Admins;
pub use super::orders::Entity as Orders;
pub use super::profiles::Entity as Profiles;
pub use super::reviews::Entity as Reviews;
pub use super::users::Entity as Users;
pub use super::videogames::Entity as Videogames;

// === Enum columns ===
pub use super::enums::{Gender, Genre, Pegi, Platform, ProfileKind};
