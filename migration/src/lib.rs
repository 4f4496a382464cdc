pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_store_tables;
mod m20260315_000002_add_review_constraints;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_store_tables::Migration),
            Box::new(m20260315_000002_add_review_constraints::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm_migration::sea_orm::{ConnectOptions, Database};

    #[tokio::test]
    async fn migrations_apply_and_roll_back() {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).min_connections(1);
        let db = Database::connect(options).await.unwrap();

        Migrator::up(&db, None).await.unwrap();
        let manager = SchemaManager::new(&db);
        for table in ["profiles", "users", "admins", "videogames", "orders", "reviews"] {
            assert!(manager.has_table(table).await.unwrap(), "missing {table}");
        }
        assert!(
            manager
                .has_index("reviews", "idx_reviews_user_game")
                .await
                .unwrap()
        );

        Migrator::down(&db, None).await.unwrap();
        assert!(!manager.has_table("profiles").await.unwrap());
    }
}
