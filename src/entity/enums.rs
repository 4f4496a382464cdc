//! Enum columns stored as text or integers.
//!
//! Each enum parses from either its stored value or its display label (case-insensitive), so
//! window forms can accept what the user sees.

use sea_orm::entity::prelude::*;
use sea_orm::Iterable;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Game genre
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    #[sea_orm(string_value = "action")]
    Action,
    #[sea_orm(string_value = "adventure")]
    Adventure,
    #[sea_orm(string_value = "rpg")]
    Rpg,
    #[sea_orm(string_value = "shooter")]
    Shooter,
    #[sea_orm(string_value = "sports")]
    Sports,
    #[sea_orm(string_value = "racing")]
    Racing,
    #[sea_orm(string_value = "strategy")]
    Strategy,
    #[sea_orm(string_value = "simulation")]
    Simulation,
    #[sea_orm(string_value = "puzzle")]
    Puzzle,
    #[sea_orm(string_value = "fighting")]
    Fighting,
    #[sea_orm(string_value = "horror")]
    Horror,
    #[sea_orm(string_value = "platformer")]
    Platformer,
}

impl Genre {
    pub fn label(&self) -> &'static str {
        match self {
            Genre::Action => "Action",
            Genre::Adventure => "Adventure",
            Genre::Rpg => "RPG",
            Genre::Shooter => "Shooter",
            Genre::Sports => "Sports",
            Genre::Racing => "Racing",
            Genre::Strategy => "Strategy",
            Genre::Simulation => "Simulation",
            Genre::Puzzle => "Puzzle",
            Genre::Fighting => "Fighting",
            Genre::Horror => "Horror",
            Genre::Platformer => "Platformer",
        }
    }
}

/// Target platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    #[sea_orm(string_value = "pc")]
    Pc,
    #[sea_orm(string_value = "ps4")]
    PlayStation4,
    #[sea_orm(string_value = "ps5")]
    PlayStation5,
    #[sea_orm(string_value = "xbox_one")]
    XboxOne,
    #[sea_orm(string_value = "xbox_series")]
    XboxSeries,
    #[sea_orm(string_value = "switch")]
    NintendoSwitch,
}

impl Platform {
    pub fn label(&self) -> &'static str {
        match self {
            Platform::Pc => "PC",
            Platform::PlayStation4 => "PS4",
            Platform::PlayStation5 => "PS5",
            Platform::XboxOne => "Xbox One",
            Platform::XboxSeries => "Xbox Series",
            Platform::NintendoSwitch => "Switch",
        }
    }
}

/// PEGI age rating, stored as the minimum age
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum Pegi {
    #[sea_orm(num_value = 3)]
    Pegi3,
    #[sea_orm(num_value = 7)]
    Pegi7,
    #[sea_orm(num_value = 12)]
    Pegi12,
    #[sea_orm(num_value = 16)]
    Pegi16,
    #[sea_orm(num_value = 18)]
    Pegi18,
}

impl Pegi {
    /// Minimum player age; also the stored value
    pub fn min_age(&self) -> i32 {
        self.to_value()
    }
}

/// Gender recorded for regular users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[sea_orm(string_value = "male")]
    Male,
    #[sea_orm(string_value = "female")]
    Female,
    #[sea_orm(string_value = "other")]
    Other,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

/// Which role table a profile row is joined with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    #[sea_orm(string_value = "user")]
    User,
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl ProfileKind {
    pub fn label(&self) -> &'static str {
        match self {
            ProfileKind::User => "User",
            ProfileKind::Admin => "Admin",
        }
    }
}

/// Unknown enum text coming from a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub input: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {}", self.kind, self.input)
    }
}

impl std::error::Error for UnknownVariant {}

fn matches_input(input: &str, value: &str, label: &str) -> bool {
    let input = input.trim();
    input.eq_ignore_ascii_case(value) || input.eq_ignore_ascii_case(label)
}

impl FromStr for Genre {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Genre::iter()
            .find(|g| matches_input(s, &g.to_value(), g.label()))
            .ok_or_else(|| UnknownVariant {
                kind: "genre",
                input: s.to_string(),
            })
    }
}

impl FromStr for Platform {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::iter()
            .find(|p| matches_input(s, &p.to_value(), p.label()))
            .ok_or_else(|| UnknownVariant {
                kind: "platform",
                input: s.to_string(),
            })
    }
}

impl FromStr for Pegi {
    type Err = UnknownVariant;

    /// Accepts `18`, `PEGI 18` or `pegi18`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let digits = compact
            .strip_prefix("PEGI")
            .or_else(|| compact.strip_prefix("pegi"))
            .or_else(|| compact.strip_prefix("Pegi"))
            .unwrap_or(&compact);
        digits
            .parse::<i32>()
            .ok()
            .and_then(|age| Pegi::iter().find(|p| p.min_age() == age))
            .ok_or_else(|| UnknownVariant {
                kind: "PEGI rating",
                input: s.to_string(),
            })
    }
}

impl FromStr for Gender {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::iter()
            .find(|g| matches_input(s, &g.to_value(), g.label()))
            .ok_or_else(|| UnknownVariant {
                kind: "gender",
                input: s.to_string(),
            })
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Pegi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PEGI {}", self.min_age())
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
