//! Recipe persistence with soft delete.

use log::debug;

use super::{ensure_valid, from_rows, new_id, write_patch, WhereClause};
use crate::{
    db::{value, Database},
    error::{Result, StoreError},
    models::{DishCategory, Recipe, RecipeFilter, RecipeRow},
    params::{NewRecipe, RecipePatch},
};

const ENTITY: &str = "Recipe";

const INSERT_RECIPE_SQL: &str = "INSERT INTO recipes (id, title, servings, category, ingredients, steps, imageUri, prepTime, cookTime, tags, createdAt, updatedAt, deletedAt) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)";
const SELECT_ACTIVE_RECIPE_SQL: &str = "SELECT id, title, servings, category, ingredients, steps, imageUri, prepTime, cookTime, tags, createdAt, updatedAt, deletedAt FROM recipes WHERE id = ?1 AND deletedAt IS NULL";
const SOFT_DELETE_RECIPE_SQL: &str =
    "UPDATE recipes SET deletedAt = ?1, updatedAt = ?2 WHERE id = ?3 AND deletedAt IS NULL";
const COUNT_ACTIVE_RECIPES_SQL: &str = "SELECT COUNT(*) FROM recipes WHERE deletedAt IS NULL";
const COUNT_ALL_RECIPES_SQL: &str = "SELECT COUNT(*) FROM recipes";
const HAS_TAG_CONDITION: &str =
    "EXISTS (SELECT 1 FROM json_each(recipes.tags) WHERE json_each.value = ?)";
// rowid breaks ties between recipes created in the same instant.
const NEWEST_FIRST: &str = "ORDER BY createdAt DESC, rowid DESC";

/// Recipe CRUD on a borrowed connection.
#[derive(Debug, Clone, Copy)]
pub struct RecipeRepository<'db> {
    db: &'db Database,
}

impl<'db> RecipeRepository<'db> {
    pub fn new(db: &'db Database) -> Self {
        Self { db }
    }

    /// Validates and inserts a new recipe, returning it with its new id.
    ///
    /// # Errors
    ///
    /// `StoreError::Validation` with every violation when the input is
    /// invalid; nothing is written in that case.
    pub fn create_recipe(&self, input: NewRecipe) -> Result<Recipe> {
        let mut recipe = Recipe::create(input);
        recipe.id = new_id();
        ensure_valid(ENTITY, recipe.validate())?;

        let row = recipe.to_row()?;
        self.db.execute(INSERT_RECIPE_SQL, &row.to_params())?;
        debug!("Created recipe {} ({})", recipe.id, recipe.title);
        Ok(recipe)
    }

    /// Active recipe by id; `None` when absent or soft-deleted.
    pub fn get_recipe_by_id(&self, id: &str) -> Result<Option<Recipe>> {
        self.db
            .query_optional(
                SELECT_ACTIVE_RECIPE_SQL,
                &[value::text(id)],
                RecipeRow::from_sql_row,
            )?
            .map(Recipe::from_row)
            .transpose()
    }

    /// Lists recipes newest first, one page at a time.
    pub fn get_all_recipes(&self, filter: &RecipeFilter) -> Result<Vec<Recipe>> {
        let mut clause = WhereClause::new();
        if !filter.include_deleted {
            clause.push("deletedAt IS NULL");
        }
        if let Some(category) = filter.category {
            clause.push_bound("category = ?", value::text(category.as_str()));
        }
        if let Some(tag) = &filter.tag {
            clause.push_bound(HAS_TAG_CONDITION, value::text(tag));
        }
        let limit = clause.bind(value::int(i64::from(filter.limit)));
        let offset = clause.bind(value::int(i64::from(filter.offset)));

        let sql = format!(
            "SELECT {} FROM recipes{} {NEWEST_FIRST} LIMIT {limit} OFFSET {offset}",
            RecipeRow::COLUMNS,
            clause.sql()
        );
        self.select(&sql, &clause)
    }

    /// Active recipes whose title contains `term`, case-insensitively for
    /// ASCII. The term is used as given, whitespace included; `%` and `_`
    /// in it match literally.
    pub fn search_recipes(&self, term: &str) -> Result<Vec<Recipe>> {
        let mut clause = WhereClause::new();
        clause.push_bound(
            "title LIKE ? ESCAPE '\\'",
            value::text(&format!("%{}%", escape_like(term))),
        );
        clause.push("deletedAt IS NULL");
        self.select_unpaged(&clause)
    }

    /// All active recipes in a category.
    pub fn get_recipes_by_category(&self, category: DishCategory) -> Result<Vec<Recipe>> {
        let mut clause = WhereClause::new();
        clause.push_bound("category = ?", value::text(category.as_str()));
        clause.push("deletedAt IS NULL");
        self.select_unpaged(&clause)
    }

    /// All active recipes carrying `tag` (exact match).
    pub fn get_recipes_by_tag(&self, tag: &str) -> Result<Vec<Recipe>> {
        let mut clause = WhereClause::new();
        clause.push("deletedAt IS NULL");
        clause.push_bound(HAS_TAG_CONDITION, value::text(tag));
        self.select_unpaged(&clause)
    }

    /// Applies a patch to an active recipe. Only the patched columns and
    /// `updatedAt` are written.
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` when no active recipe has the patch's id,
    /// `StoreError::Validation` when the patched recipe is invalid.
    pub fn update_recipe(&self, patch: &RecipePatch) -> Result<Recipe> {
        self.db.transaction(|db| {
            let existing = self
                .get_recipe_by_id(&patch.id)?
                .ok_or_else(|| StoreError::not_found(ENTITY, patch.id.as_str()))?;

            let updated = existing.apply(patch);
            ensure_valid(ENTITY, updated.validate())?;

            let row = updated.to_row()?;
            let changed = write_patch(db, "recipes", patch, &row, Some("deletedAt IS NULL"))?;
            if changed == 0 {
                return Err(StoreError::not_found(ENTITY, patch.id.as_str()));
            }
            debug!("Updated recipe {}", updated.id);
            Ok(updated)
        })
    }

    /// Soft-deletes an active recipe. The row stays in storage with
    /// `deletedAt` set. Meal plans and shopping items that reference it are
    /// left untouched.
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` when no active recipe has this id.
    pub fn delete_recipe(&self, id: &str) -> Result<()> {
        self.db.transaction(|db| {
            let existing = self
                .get_recipe_by_id(id)?
                .ok_or_else(|| StoreError::not_found(ENTITY, id))?;
            let deleted = existing.soft_delete().to_row()?;

            let changed = db.execute(
                SOFT_DELETE_RECIPE_SQL,
                &[
                    value::opt_text(deleted.deleted_at.as_deref()),
                    value::text(&deleted.updated_at),
                    value::text(id),
                ],
            )?;
            if changed == 0 {
                return Err(StoreError::not_found(ENTITY, id));
            }
            debug!("Soft-deleted recipe {id}");
            Ok(())
        })
    }

    /// Creates every recipe or none.
    pub fn create_recipes_batch(&self, inputs: Vec<NewRecipe>) -> Result<Vec<Recipe>> {
        let count = inputs.len();
        let recipes = self.db.transaction(|_| {
            inputs
                .into_iter()
                .map(|input| self.create_recipe(input))
                .collect::<Result<Vec<_>>>()
        })?;
        debug!("Created {count} recipes in batch");
        Ok(recipes)
    }

    /// Soft-deletes every recipe or none; any missing id aborts the batch.
    pub fn delete_recipes_batch(&self, ids: &[String]) -> Result<()> {
        self.db.transaction(|_| {
            ids.iter().try_for_each(|id| self.delete_recipe(id))
        })?;
        debug!("Soft-deleted {} recipes in batch", ids.len());
        Ok(())
    }

    /// Number of active recipes, or of all rows with `include_deleted`.
    pub fn get_recipe_count(&self, include_deleted: bool) -> Result<u64> {
        let sql = if include_deleted {
            COUNT_ALL_RECIPES_SQL
        } else {
            COUNT_ACTIVE_RECIPES_SQL
        };
        self.db.query_count(sql, &[])
    }

    fn select_unpaged(&self, clause: &WhereClause) -> Result<Vec<Recipe>> {
        let sql = format!(
            "SELECT {} FROM recipes{} {NEWEST_FIRST}",
            RecipeRow::COLUMNS,
            clause.sql()
        );
        self.select(&sql, clause)
    }

    fn select(&self, sql: &str, clause: &WhereClause) -> Result<Vec<Recipe>> {
        let rows = self
            .db
            .query(sql, clause.params(), RecipeRow::from_sql_row)?;
        from_rows(rows, Recipe::from_row)
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
