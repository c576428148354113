//! Domain models for recipes, meal plans, and shopping list items.
//!
//! Each entity has an in-memory shape (plain Rust types, enums, timestamps)
//! and a row shape that mirrors its table. The row shape is the only place
//! where composite fields exist as encoded JSON text.
//!
//! Every entity module provides the same set of pure functions:
//!
//! - `create` builds an entity from input, filling defaults and timestamps.
//!   The id is left empty; repositories assign it.
//! - `validate` returns every violated invariant as a message.
//! - `to_row` / `from_row` convert to and from the stored shape.
//! - `apply` merges a typed patch.
//!
//! # Timestamps
//!
//! Timestamps are stored as fixed-width RFC 3339 text with nanosecond
//! digits, for example `2025-03-01T12:30:00.000000000Z`, so any `Timestamp`
//! survives storage unchanged. Fixed width makes text order equal time
//! order, which the `ORDER BY createdAt` queries rely on. Text with fewer
//! fractional digits still parses.

use jiff::Timestamp;

use crate::error::{Result, StoreError};

pub mod enums;
pub mod filters;
pub mod meal_plan;
pub mod recipe;
pub mod shopping;

#[cfg(test)]
mod tests;

pub use enums::{DishCategory, MealType, MeasurementUnit};
pub use filters::{MealPlanFilter, RecipeFilter, ShoppingItemFilter};
pub use meal_plan::{MealPlan, MealPlanRow, MealPlanWithRecipe};
pub use recipe::{Ingredient, Recipe, RecipeRow};
pub use shopping::{
    aggregate_shopping_items, AggregatedShoppingItem, ShoppingItemWithRecipe, ShoppingListItem,
    ShoppingListItemRow,
};

/// Current time.
pub fn now() -> Timestamp {
    Timestamp::now()
}

/// Stored text form of a timestamp.
pub fn timestamp_to_text(ts: &Timestamp) -> String {
    format!("{ts:.9}")
}

/// Parses a stored timestamp column.
pub fn parse_timestamp(column: &'static str, text: &str) -> Result<Timestamp> {
    parse_column(column, text)
}

pub(crate) fn parse_column<T: std::str::FromStr>(column: &'static str, text: &str) -> Result<T> {
    text.parse::<T>().map_err(|_| StoreError::InvalidRow {
        column,
        value: text.to_string(),
    })
}
