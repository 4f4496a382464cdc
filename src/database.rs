pub mod db;
pub mod dto;
pub mod repository;
pub mod service;

// Re-export the service layer for the window controllers
pub use service::*;
