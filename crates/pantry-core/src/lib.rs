//! Embedded persistence for the Pantry recipe keeper.
//!
//! This crate stores recipes, meal plans, and shopping list items in a single
//! SQLite file. It provides a connection manager, versioned schema
//! migrations, validation for every entity, and one repository per entity
//! with soft delete for recipes.
//!
//! # Layers
//!
//! - [`db`]: the [`Database`] connection manager and [`db::MigrationRunner`]
//! - [`models`]: entities, their stored rows, validation, and filters
//! - [`params`]: creation inputs and typed partial-update patches
//! - [`repository`]: synchronous repositories borrowing a [`Database`]
//! - [`pantry`]: the async [`Pantry`] handle the application holds
//! - [`seed`]: first-run sample recipes
//!
//! # Quick Start
//!
//! ```rust
//! use jiff::civil::date;
//! use pantry_core::{
//!     models::{DishCategory, MealType},
//!     params::{NewMealPlan, NewRecipe},
//!     Ingredient, PantryBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pantry = PantryBuilder::new()
//!     .with_database_path(Some("pantry.db"))
//!     .with_seed(true)
//!     .build()
//!     .await?;
//!
//! let recipe = pantry
//!     .create_recipe(NewRecipe {
//!         title: "Tea".to_string(),
//!         servings: 1,
//!         category: DishCategory::Beverage,
//!         ingredients: vec![Ingredient::named("water")],
//!         steps: vec!["Boil water".to_string()],
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! if pantry.is_meal_slot_available(date(2025, 3, 1), MealType::Breakfast).await? {
//!     pantry
//!         .create_meal_plan(NewMealPlan {
//!             recipe_id: recipe.id.clone(),
//!             date: date(2025, 3, 1),
//!             meal_type: MealType::Breakfast,
//!         })
//!         .await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod error;
pub mod models;
pub mod pantry;
pub mod params;
pub mod repository;
pub mod seed;

// Re-export commonly used types
pub use db::{Database, MigrationRunner, MigrationStatus};
pub use error::{Result, StoreError};
pub use models::{
    DishCategory, Ingredient, MealPlan, MealType, MeasurementUnit, Recipe, ShoppingListItem,
};
pub use pantry::{Pantry, PantryBuilder};
pub use params::{
    MealPlanPatch, NewMealPlan, NewRecipe, NewShoppingItem, RecipePatch, ShoppingItemPatch,
};
pub use repository::{MealPlanRepository, RecipeRepository, ShoppingListRepository};
