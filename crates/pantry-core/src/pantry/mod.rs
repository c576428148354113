//! Asynchronous handle over the recipe store.
//!
//! [`Pantry`] owns the one [`Database`] connection of the process and hands
//! every operation to a blocking thread while holding the connection lock,
//! so operations never overlap on the connection and callers can `.await`
//! them from async code.
//!
//! ## Submodules
//!
//! - [`builder`]: opens the store, runs migrations, optionally seeds
//! - `recipe_ops`, `meal_plan_ops`, `shopping_ops`: one async method per
//!   repository operation
//!
//! # Usage
//!
//! ```rust
//! use pantry_core::{models::DishCategory, params::NewRecipe, Ingredient, PantryBuilder};
//!
//! # async fn example() -> pantry_core::Result<()> {
//! let pantry = PantryBuilder::new().in_memory().build().await?;
//!
//! let tea = pantry
//!     .create_recipe(NewRecipe {
//!         title: "Tea".to_string(),
//!         servings: 1,
//!         category: DishCategory::Beverage,
//!         ingredients: vec![Ingredient::named("water")],
//!         steps: vec!["Boil water".to_string()],
//!         ..Default::default()
//!     })
//!     .await?;
//! assert!(pantry.get_recipe_by_id(&tea.id).await?.is_some());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::{sync::Mutex, task};

use crate::{
    db::{Database, MigrationRunner, MigrationStatus},
    error::{Result, StoreError},
};

pub mod builder;
mod meal_plan_ops;
mod recipe_ops;
mod shopping_ops;


pub use builder::PantryBuilder;

/// Shared handle to the store. Cloning is cheap and every clone uses the
/// same connection.
#[derive(Debug, Clone)]
pub struct Pantry {
    db: Arc<Mutex<Database>>,
    migrations: Arc<MigrationRunner>,
}

impl Pantry {
    pub(crate) fn new(db: Database, migrations: MigrationRunner) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            migrations: Arc::new(migrations),
        }
    }

    /// Runs `op` against the connection on a blocking thread.
    pub(crate) async fn with_db<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> Result<T> + Send + 'static,
    {
        let guard = Arc::clone(&self.db).lock_owned().await;
        task::spawn_blocking(move || op(&guard))
            .await
            .map_err(join_error)?
    }

    /// Runs `body` inside one transaction: it commits if `body` returns
    /// `Ok` and rolls back otherwise.
    pub async fn transaction<T, F>(&self, body: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> Result<T> + Send + 'static,
    {
        self.with_db(move |db| db.transaction(body)).await
    }

    /// Schema version report.
    pub async fn migration_status(&self) -> Result<MigrationStatus> {
        let migrations = Arc::clone(&self.migrations);
        self.with_db(move |db| migrations.status(db)).await
    }

    /// `SELECT 1` round trip; `false` on any failure.
    pub async fn health_check(&self) -> bool {
        self.with_db(|db| Ok(db.health_check()))
            .await
            .unwrap_or(false)
    }

    /// True until [`Pantry::close`] has been called.
    pub async fn is_ready(&self) -> bool {
        self.db.lock().await.is_ready()
    }

    /// Closes the connection for every clone of this handle. Later
    /// operations fail with `StoreError::NotInitialized`.
    pub async fn close(&self) -> Result<()> {
        let mut guard = Arc::clone(&self.db).lock_owned().await;
        task::spawn_blocking(move || guard.close())
            .await
            .map_err(join_error)?
    }
}

fn join_error(e: task::JoinError) -> StoreError {
    StoreError::Configuration {
        message: format!("Task join error: {e}"),
    }
}
