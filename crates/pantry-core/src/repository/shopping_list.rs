//! Shopping list persistence. Items are hard-deleted.

use log::debug;

use super::{ensure_valid, from_rows, new_id, write_patch, WhereClause};
use crate::{
    db::{value, Database},
    error::{Result, StoreError},
    models::{ShoppingItemFilter, ShoppingItemWithRecipe, ShoppingListItem, ShoppingListItemRow},
    params::{NewShoppingItem, ShoppingItemPatch},
};

const ENTITY: &str = "Shopping list item";

const INSERT_ITEM_SQL: &str = "INSERT INTO shopping_list_items (id, name, quantity, unit, checked, recipeId, mealPlanId, createdAt) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";
const SELECT_ITEM_SQL: &str = "SELECT id, name, quantity, unit, checked, recipeId, mealPlanId, createdAt FROM shopping_list_items WHERE id = ?1";
const UPDATE_CHECKED_SQL: &str = "UPDATE shopping_list_items SET checked = ?1 WHERE id = ?2";
const SET_ALL_CHECKED_SQL: &str = "UPDATE shopping_list_items SET checked = ?1 WHERE checked <> ?1";
const DELETE_ITEM_SQL: &str = "DELETE FROM shopping_list_items WHERE id = ?1";
const DELETE_CHECKED_SQL: &str = "DELETE FROM shopping_list_items WHERE checked = 1";
const DELETE_BY_RECIPE_SQL: &str = "DELETE FROM shopping_list_items WHERE recipeId = ?1";
const DELETE_BY_MEAL_PLAN_SQL: &str = "DELETE FROM shopping_list_items WHERE mealPlanId = ?1";
const WITH_RECIPE_SQL: &str = "SELECT sli.id, sli.name, sli.quantity, sli.unit, sli.checked, sli.recipeId, sli.mealPlanId, sli.createdAt, r.title, r.imageUri FROM shopping_list_items sli LEFT JOIN recipes r ON sli.recipeId = r.id ORDER BY sli.checked ASC, sli.createdAt DESC, sli.rowid DESC";
const UNCHECKED_FIRST: &str = "ORDER BY checked ASC, createdAt DESC, rowid DESC";
const NEWEST_FIRST: &str = "ORDER BY createdAt DESC, rowid DESC";

/// Shopping list CRUD on a borrowed connection.
#[derive(Debug, Clone, Copy)]
pub struct ShoppingListRepository<'db> {
    db: &'db Database,
}

impl<'db> ShoppingListRepository<'db> {
    pub fn new(db: &'db Database) -> Self {
        Self { db }
    }

    pub fn create_shopping_item(&self, input: NewShoppingItem) -> Result<ShoppingListItem> {
        let mut item = ShoppingListItem::create(input);
        item.id = new_id();
        ensure_valid(ENTITY, item.validate())?;

        self.db.execute(INSERT_ITEM_SQL, &item.to_row().to_params())?;
        debug!("Created shopping item {} ({})", item.id, item.name);
        Ok(item)
    }

    pub fn get_shopping_item_by_id(&self, id: &str) -> Result<Option<ShoppingListItem>> {
        self.db
            .query_optional(
                SELECT_ITEM_SQL,
                &[value::text(id)],
                ShoppingListItemRow::from_sql_row,
            )?
            .map(ShoppingListItem::from_row)
            .transpose()
    }

    /// Lists items, unchecked first, then newest first.
    pub fn get_all_shopping_items(
        &self,
        filter: &ShoppingItemFilter,
    ) -> Result<Vec<ShoppingListItem>> {
        let clause = filter_clause(filter);
        let sql = format!(
            "SELECT {} FROM shopping_list_items{} {UNCHECKED_FIRST}",
            ShoppingListItemRow::COLUMNS,
            clause.sql()
        );
        self.select(&sql, &clause)
    }

    pub fn get_shopping_items_by_recipe(&self, recipe_id: &str) -> Result<Vec<ShoppingListItem>> {
        let mut clause = WhereClause::new();
        clause.push_bound("recipeId = ?", value::text(recipe_id));
        self.select_newest_first(&clause)
    }

    pub fn get_shopping_items_by_meal_plan(
        &self,
        meal_plan_id: &str,
    ) -> Result<Vec<ShoppingListItem>> {
        let mut clause = WhereClause::new();
        clause.push_bound("mealPlanId = ?", value::text(meal_plan_id));
        self.select_newest_first(&clause)
    }

    /// Every item joined with its recipe's title and image.
    pub fn get_shopping_items_with_recipe(&self) -> Result<Vec<ShoppingItemWithRecipe>> {
        let rows = self.db.query(WITH_RECIPE_SQL, &[], |row| {
            Ok((
                ShoppingListItemRow::from_sql_row(row)?,
                row.get::<_, Option<String>>(8)?,
                row.get::<_, Option<String>>(9)?,
            ))
        })?;

        rows.into_iter()
            .map(|(item, recipe_title, recipe_image_uri)| {
                Ok(ShoppingItemWithRecipe {
                    item: ShoppingListItem::from_row(item)?,
                    recipe_title,
                    recipe_image_uri,
                })
            })
            .collect()
    }

    /// Applies a patch. An empty patch returns the stored item unchanged.
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` when the id does not exist.
    pub fn update_shopping_item(&self, patch: &ShoppingItemPatch) -> Result<ShoppingListItem> {
        self.db.transaction(|db| {
            let existing = self
                .get_shopping_item_by_id(&patch.id)?
                .ok_or_else(|| StoreError::not_found(ENTITY, patch.id.as_str()))?;

            let updated = existing.apply(patch);
            ensure_valid(ENTITY, updated.validate())?;

            if write_patch(db, "shopping_list_items", patch, &updated.to_row(), None)? > 0 {
                debug!("Updated shopping item {}", updated.id);
            }
            Ok(updated)
        })
    }

    /// Sets one item's checked flag.
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` when the id does not exist.
    pub fn update_checked_state(&self, id: &str, checked: bool) -> Result<()> {
        let changed = self.db.execute(
            UPDATE_CHECKED_SQL,
            &[value::int(i64::from(checked)), value::text(id)],
        )?;
        if changed == 0 {
            return Err(StoreError::not_found(ENTITY, id));
        }
        Ok(())
    }

    /// Checks every item; returns how many changed.
    pub fn check_all_items(&self) -> Result<usize> {
        self.set_all_checked(true)
    }

    /// Unchecks every item; returns how many changed.
    pub fn uncheck_all_items(&self) -> Result<usize> {
        self.set_all_checked(false)
    }

    /// Hard-deletes an item. A missing id is not an error.
    pub fn delete_shopping_item(&self, id: &str) -> Result<()> {
        let removed = self.db.execute(DELETE_ITEM_SQL, &[value::text(id)])?;
        debug!("Deleted shopping item {id} ({removed} rows)");
        Ok(())
    }

    pub fn delete_all_checked_items(&self) -> Result<usize> {
        let removed = self.db.execute(DELETE_CHECKED_SQL, &[])?;
        debug!("Deleted {removed} checked shopping items");
        Ok(removed)
    }

    pub fn delete_shopping_items_by_recipe(&self, recipe_id: &str) -> Result<usize> {
        let removed = self
            .db
            .execute(DELETE_BY_RECIPE_SQL, &[value::text(recipe_id)])?;
        debug!("Deleted {removed} shopping items for recipe {recipe_id}");
        Ok(removed)
    }

    pub fn delete_shopping_items_by_meal_plan(&self, meal_plan_id: &str) -> Result<usize> {
        let removed = self
            .db
            .execute(DELETE_BY_MEAL_PLAN_SQL, &[value::text(meal_plan_id)])?;
        debug!("Deleted {removed} shopping items for meal plan {meal_plan_id}");
        Ok(removed)
    }

    /// Creates every item or none.
    pub fn create_shopping_items_batch(
        &self,
        inputs: Vec<NewShoppingItem>,
    ) -> Result<Vec<ShoppingListItem>> {
        self.db.transaction(|_| {
            inputs
                .into_iter()
                .map(|input| self.create_shopping_item(input))
                .collect()
        })
    }

    /// Deletes every listed item in one transaction.
    pub fn delete_shopping_items_batch(&self, ids: &[String]) -> Result<()> {
        self.db.transaction(|_| {
            ids.iter()
                .try_for_each(|id| self.delete_shopping_item(id))
        })
    }

    /// Number of items matching the filter.
    pub fn get_shopping_item_count(&self, filter: &ShoppingItemFilter) -> Result<u64> {
        let clause = filter_clause(filter);
        let sql = format!("SELECT COUNT(*) FROM shopping_list_items{}", clause.sql());
        self.db.query_count(&sql, clause.params())
    }

    fn set_all_checked(&self, checked: bool) -> Result<usize> {
        let changed = self
            .db
            .execute(SET_ALL_CHECKED_SQL, &[value::int(i64::from(checked))])?;
        debug!("Set checked={checked} on {changed} shopping items");
        Ok(changed)
    }

    fn select_newest_first(&self, clause: &WhereClause) -> Result<Vec<ShoppingListItem>> {
        let sql = format!(
            "SELECT {} FROM shopping_list_items{} {NEWEST_FIRST}",
            ShoppingListItemRow::COLUMNS,
            clause.sql()
        );
        self.select(&sql, clause)
    }

    fn select(&self, sql: &str, clause: &WhereClause) -> Result<Vec<ShoppingListItem>> {
        let rows = self
            .db
            .query(sql, clause.params(), ShoppingListItemRow::from_sql_row)?;
        from_rows(rows, ShoppingListItem::from_row)
    }
}

fn filter_clause(filter: &ShoppingItemFilter) -> WhereClause {
    let mut clause = WhereClause::new();
    if filter.checked_only {
        clause.push("checked = 1");
    }
    if filter.unchecked_only {
        clause.push("checked = 0");
    }
    if filter.recipe_only {
        clause.push("recipeId IS NOT NULL");
    }
    if filter.manual_only {
        clause.push("recipeId IS NULL AND mealPlanId IS NULL");
    }
    if let Some(recipe_id) = &filter.recipe_id {
        clause.push_bound("recipeId = ?", value::text(recipe_id));
    }
    if let Some(meal_plan_id) = &filter.meal_plan_id {
        clause.push_bound("mealPlanId = ?", value::text(meal_plan_id));
    }
    clause
}
