//! Repository services, one per entity.
//!
//! A repository borrows the [`Database`] handle and owns no state of its
//! own. Every write validates first and performs no statement when the
//! entity is invalid. Batch operations run inside one transaction so a
//! failure part way leaves storage as it was.
//!
//! ```rust
//! use pantry_core::{db::Database, params::NewShoppingItem};
//!
//! # fn example() -> pantry_core::Result<()> {
//! let db = Database::open_in_memory()?;
//! pantry_core::db::MigrationRunner::with_builtin().run_migrations(&db)?;
//!
//! let item = db.shopping_list().create_shopping_item(NewShoppingItem::named("Milk"))?;
//! assert!(!item.checked);
//! # Ok(())
//! # }
//! ```

use rusqlite::types::Value;
use uuid::Uuid;

use crate::{
    db::{
        update::{build_update, ColumnPatch},
        Database,
    },
    error::{Result, StoreError},
};

pub mod meal_plans;
pub mod recipes;
pub mod shopping_list;

pub use meal_plans::MealPlanRepository;
pub use recipes::RecipeRepository;
pub use shopping_list::ShoppingListRepository;

impl Database {
    /// Recipe operations on this connection.
    pub fn recipes(&self) -> RecipeRepository<'_> {
        RecipeRepository::new(self)
    }

    /// Meal plan operations on this connection.
    pub fn meal_plans(&self) -> MealPlanRepository<'_> {
        MealPlanRepository::new(self)
    }

    /// Shopping list operations on this connection.
    pub fn shopping_list(&self) -> ShoppingListRepository<'_> {
        ShoppingListRepository::new(self)
    }
}

/// Fresh random identifier for a new record.
pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Turns a non-empty violation list into a validation error.
pub(crate) fn ensure_valid(entity: &'static str, errors: Vec<String>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(StoreError::validation(entity, errors))
    }
}

/// Converts raw rows to entities, failing on the first bad row.
pub(crate) fn from_rows<R, T>(rows: Vec<R>, convert: fn(R) -> Result<T>) -> Result<Vec<T>> {
    rows.into_iter().map(convert).collect()
}

/// Writes the columns a patch touches. Returns the affected row count, or
/// 0 without running anything when the patch is empty.
pub(crate) fn write_patch<P: ColumnPatch>(
    db: &Database,
    table: &str,
    patch: &P,
    row: &P::Row,
    condition: Option<&str>,
) -> Result<usize> {
    match build_update(table, patch.assignments(row), "id", patch.id(), condition) {
        Some((sql, params)) => db.execute(&sql, &params),
        None => Ok(0),
    }
}

/// Accumulates `AND`-joined conditions and their numbered parameters.
#[derive(Debug, Default)]
pub(crate) struct WhereClause {
    conditions: Vec<String>,
    params: Vec<Value>,
}

impl WhereClause {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Adds a condition without parameters.
    pub(crate) fn push(&mut self, condition: &str) {
        self.conditions.push(condition.to_string());
    }

    /// Adds a condition containing one `?` that is bound to `value`.
    pub(crate) fn push_bound(&mut self, condition: &str, value: Value) {
        self.params.push(value);
        let placeholder = format!("?{}", self.params.len());
        self.conditions
            .push(condition.replacen('?', &placeholder, 1));
    }

    /// Binds a value for a placeholder outside the `WHERE` clause and
    /// returns that placeholder.
    pub(crate) fn bind(&mut self, value: Value) -> String {
        self.params.push(value);
        format!("?{}", self.params.len())
    }

    /// ` WHERE a AND b`, or an empty string when there are no conditions.
    pub(crate) fn sql(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }

    pub(crate) fn params(&self) -> &[Value] {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::value;

    #[test]
    fn test_where_clause_numbers_parameters() {
        let mut clause = WhereClause::new();
        clause.push("deletedAt IS NULL");
        clause.push_bound("category = ?", value::text("dinner"));
        clause.push_bound("title LIKE ?", value::text("%soup%"));
        let limit = clause.bind(value::int(10));

        assert_eq!(
            clause.sql(),
            " WHERE deletedAt IS NULL AND category = ?1 AND title LIKE ?2"
        );
        assert_eq!(limit, "?3");
        assert_eq!(clause.params().len(), 3);
    }

    #[test]
    fn test_empty_where_clause() {
        let clause = WhereClause::new();
        assert_eq!(clause.sql(), "");
        assert!(clause.params().is_empty());
    }
}
