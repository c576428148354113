//! Built-in schema history.
//!
//! Version 1 creates the three entity tables, version 2 adds the indexes
//! used by the repository queries.

use super::{Database, Migration};
use crate::error::Result;

/// The application's migrations, in version order.
pub fn builtin_migrations() -> Vec<Migration> {
    vec![
        Migration {
            version: 1,
            name: "001_initial_schema",
            description: "Create recipes, meal_plans, and shopping_list_items tables",
            up: initial_schema_up,
            down: initial_schema_down,
        },
        Migration {
            version: 2,
            name: "002_add_indexes",
            description: "Add indexes for common query patterns",
            up: add_indexes_up,
            down: add_indexes_down,
        },
    ]
}

const CREATE_RECIPES_SQL: &str = "
    CREATE TABLE IF NOT EXISTS recipes (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        servings INTEGER NOT NULL CHECK (servings >= 1 AND servings <= 50),
        category TEXT NOT NULL,
        ingredients TEXT NOT NULL,
        steps TEXT NOT NULL,
        imageUri TEXT NULL,
        prepTime INTEGER NULL CHECK (prepTime >= 0 AND prepTime <= 1440),
        cookTime INTEGER NULL CHECK (cookTime >= 0 AND cookTime <= 1440),
        tags TEXT NULL,
        createdAt TEXT NOT NULL,
        updatedAt TEXT NOT NULL,
        deletedAt TEXT NULL
    );";

const CREATE_MEAL_PLANS_SQL: &str = "
    CREATE TABLE IF NOT EXISTS meal_plans (
        id TEXT PRIMARY KEY,
        recipeId TEXT NOT NULL,
        date TEXT NOT NULL CHECK (date LIKE '____-__-__'),
        mealType TEXT NOT NULL CHECK (mealType IN ('breakfast', 'lunch', 'dinner', 'snack')),
        createdAt TEXT NOT NULL,
        FOREIGN KEY (recipeId) REFERENCES recipes(id) ON DELETE CASCADE
    );";

const CREATE_SHOPPING_LIST_ITEMS_SQL: &str = "
    CREATE TABLE IF NOT EXISTS shopping_list_items (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL CHECK (length(name) > 0 AND length(name) <= 100),
        quantity REAL NULL CHECK (quantity IS NULL OR (quantity > 0 AND quantity <= 1000)),
        unit TEXT NULL,
        checked INTEGER NOT NULL DEFAULT 0 CHECK (checked IN (0, 1)),
        recipeId TEXT NULL,
        mealPlanId TEXT NULL,
        createdAt TEXT NOT NULL,
        FOREIGN KEY (recipeId) REFERENCES recipes(id) ON DELETE CASCADE,
        FOREIGN KEY (mealPlanId) REFERENCES meal_plans(id) ON DELETE CASCADE
    );";

fn initial_schema_up(db: &Database) -> Result<()> {
    db.execute_batch(CREATE_RECIPES_SQL)?;
    db.execute_batch(CREATE_MEAL_PLANS_SQL)?;
    db.execute_batch(CREATE_SHOPPING_LIST_ITEMS_SQL)
}

fn initial_schema_down(db: &Database) -> Result<()> {
    // Children first so the foreign keys never dangle.
    db.execute_batch(
        "DROP TABLE IF EXISTS shopping_list_items;
         DROP TABLE IF EXISTS meal_plans;
         DROP TABLE IF EXISTS recipes;",
    )
}

/// (index name, table, columns)
const INDEXES: &[(&str, &str, &str)] = &[
    ("idx_meal_plans_date_meal_type", "meal_plans", "date, mealType"),
    ("idx_meal_plans_recipe_id", "meal_plans", "recipeId"),
    ("idx_meal_plans_date", "meal_plans", "date"),
    ("idx_shopping_list_items_checked", "shopping_list_items", "checked"),
    ("idx_shopping_list_items_recipe_id", "shopping_list_items", "recipeId"),
    ("idx_shopping_list_items_meal_plan_id", "shopping_list_items", "mealPlanId"),
    ("idx_shopping_list_items_name", "shopping_list_items", "name"),
    ("idx_recipes_deleted_at", "recipes", "deletedAt"),
    ("idx_recipes_category", "recipes", "category"),
    ("idx_recipes_title", "recipes", "title"),
    ("idx_recipes_created_at", "recipes", "createdAt"),
    ("idx_recipes_updated_at", "recipes", "updatedAt"),
    ("idx_recipes_active", "recipes", "deletedAt, createdAt"),
];

fn add_indexes_up(db: &Database) -> Result<()> {
    for (name, table, columns) in INDEXES {
        db.execute_batch(&format!(
            "CREATE INDEX IF NOT EXISTS {name} ON {table}({columns})"
        ))?;
    }
    Ok(())
}

fn add_indexes_down(db: &Database) -> Result<()> {
    for (name, _, _) in INDEXES.iter().rev() {
        db.execute_batch(&format!("DROP INDEX IF EXISTS {name}"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{value, MigrationRunner};

    fn index_count(db: &Database) -> u64 {
        db.query_count(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name LIKE 'idx_%'",
            &[],
        )
        .unwrap()
    }

    #[test]
    fn test_builtin_migrations_apply_cleanly() {
        let db = Database::open_in_memory().unwrap();
        let runner = MigrationRunner::with_builtin();
        assert_eq!(runner.latest_version(), 2);
        assert_eq!(runner.run_migrations(&db).unwrap(), 2);
        assert_eq!(index_count(&db), INDEXES.len() as u64);

        runner.rollback_to_version(&db, 1).unwrap();
        assert_eq!(index_count(&db), 0);
        assert_eq!(db.user_version().unwrap(), 1);
    }

    #[test]
    fn test_schema_enforces_checks() {
        let db = Database::open_in_memory().unwrap();
        MigrationRunner::with_builtin().run_migrations(&db).unwrap();

        let result = db.execute(
            "INSERT INTO meal_plans (id, recipeId, date, mealType, createdAt) VALUES (?1, ?2, ?3, ?4, ?5)",
            &[
                value::text("mp-1"),
                value::text("no-such-recipe"),
                value::text("2025-01-01"),
                value::text("dinner"),
                value::text("2025-01-01T00:00:00.000Z"),
            ],
        );
        assert!(result.is_err(), "foreign key must be enforced");

        let result = db.execute(
            "INSERT INTO shopping_list_items (id, name, checked, createdAt) VALUES (?1, ?2, 2, ?3)",
            &[
                value::text("item-1"),
                value::text("Milk"),
                value::text("2025-01-01T00:00:00.000Z"),
            ],
        );
        assert!(result.is_err(), "checked must be 0 or 1");
    }
}
