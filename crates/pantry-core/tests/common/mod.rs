#![allow(dead_code)]

use pantry_core::{
    models::DishCategory, Database, Ingredient, MigrationRunner, NewRecipe, Pantry, PantryBuilder,
};
use tempfile::TempDir;

/// Routes `log` output through the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Helper function to create a migrated database in a temporary directory
pub fn create_test_db() -> (TempDir, Database) {
    init_logging();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db = Database::open(temp_dir.path().join("test.db")).expect("Failed to open database");
    MigrationRunner::with_builtin()
        .run_migrations(&db)
        .expect("Failed to run migrations");
    (temp_dir, db)
}

/// Helper function to create a test pantry
pub async fn create_test_pantry() -> (TempDir, Pantry) {
    init_logging();
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let pantry = PantryBuilder::new()
        .with_database_path(Some(&db_path))
        .build()
        .await
        .expect("Failed to create pantry");
    (temp_dir, pantry)
}

/// A minimal valid recipe.
pub fn recipe(title: &str, category: DishCategory) -> NewRecipe {
    NewRecipe {
        title: title.to_string(),
        servings: 2,
        category,
        ingredients: vec![Ingredient::named("water")],
        steps: vec!["Boil".to_string()],
        ..Default::default()
    }
}
