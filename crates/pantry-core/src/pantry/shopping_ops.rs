//! Shopping list operations for the Pantry.

use super::Pantry;
use crate::{
    error::Result,
    models::{ShoppingItemFilter, ShoppingItemWithRecipe, ShoppingListItem},
    params::{NewShoppingItem, ShoppingItemPatch},
};

impl Pantry {
    pub async fn create_shopping_item(&self, input: NewShoppingItem) -> Result<ShoppingListItem> {
        self.with_db(move |db| db.shopping_list().create_shopping_item(input))
            .await
    }

    pub async fn get_shopping_item_by_id(&self, id: &str) -> Result<Option<ShoppingListItem>> {
        let id = id.to_string();
        self.with_db(move |db| db.shopping_list().get_shopping_item_by_id(&id))
            .await
    }

    pub async fn get_all_shopping_items(
        &self,
        filter: ShoppingItemFilter,
    ) -> Result<Vec<ShoppingListItem>> {
        self.with_db(move |db| db.shopping_list().get_all_shopping_items(&filter))
            .await
    }

    pub async fn get_shopping_items_by_recipe(
        &self,
        recipe_id: &str,
    ) -> Result<Vec<ShoppingListItem>> {
        let recipe_id = recipe_id.to_string();
        self.with_db(move |db| db.shopping_list().get_shopping_items_by_recipe(&recipe_id))
            .await
    }

    pub async fn get_shopping_items_by_meal_plan(
        &self,
        meal_plan_id: &str,
    ) -> Result<Vec<ShoppingListItem>> {
        let meal_plan_id = meal_plan_id.to_string();
        self.with_db(move |db| {
            db.shopping_list()
                .get_shopping_items_by_meal_plan(&meal_plan_id)
        })
        .await
    }

    pub async fn get_shopping_items_with_recipe(&self) -> Result<Vec<ShoppingItemWithRecipe>> {
        self.with_db(|db| db.shopping_list().get_shopping_items_with_recipe())
            .await
    }

    pub async fn update_shopping_item(&self, patch: ShoppingItemPatch) -> Result<ShoppingListItem> {
        self.with_db(move |db| db.shopping_list().update_shopping_item(&patch))
            .await
    }

    pub async fn update_checked_state(&self, id: &str, checked: bool) -> Result<()> {
        let id = id.to_string();
        self.with_db(move |db| db.shopping_list().update_checked_state(&id, checked))
            .await
    }

    pub async fn check_all_items(&self) -> Result<usize> {
        self.with_db(|db| db.shopping_list().check_all_items())
            .await
    }

    pub async fn uncheck_all_items(&self) -> Result<usize> {
        self.with_db(|db| db.shopping_list().uncheck_all_items())
            .await
    }

    /// Hard-deletes an item; a missing id is not an error.
    pub async fn delete_shopping_item(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.with_db(move |db| db.shopping_list().delete_shopping_item(&id))
            .await
    }

    pub async fn delete_all_checked_items(&self) -> Result<usize> {
        self.with_db(|db| db.shopping_list().delete_all_checked_items())
            .await
    }

    pub async fn delete_shopping_items_by_recipe(&self, recipe_id: &str) -> Result<usize> {
        let recipe_id = recipe_id.to_string();
        self.with_db(move |db| {
            db.shopping_list()
                .delete_shopping_items_by_recipe(&recipe_id)
        })
        .await
    }

    pub async fn delete_shopping_items_by_meal_plan(&self, meal_plan_id: &str) -> Result<usize> {
        let meal_plan_id = meal_plan_id.to_string();
        self.with_db(move |db| {
            db.shopping_list()
                .delete_shopping_items_by_meal_plan(&meal_plan_id)
        })
        .await
    }

    pub async fn create_shopping_items_batch(
        &self,
        inputs: Vec<NewShoppingItem>,
    ) -> Result<Vec<ShoppingListItem>> {
        self.with_db(move |db| db.shopping_list().create_shopping_items_batch(inputs))
            .await
    }

    pub async fn delete_shopping_items_batch(&self, ids: Vec<String>) -> Result<()> {
        self.with_db(move |db| db.shopping_list().delete_shopping_items_batch(&ids))
            .await
    }

    pub async fn get_shopping_item_count(&self, filter: ShoppingItemFilter) -> Result<u64> {
        self.with_db(move |db| db.shopping_list().get_shopping_item_count(&filter))
            .await
    }
}
