pub mod games_repository;
pub mod orders_repository;
pub mod profiles_repository;
pub mod reviews_repository;
