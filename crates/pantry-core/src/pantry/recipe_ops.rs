//! Recipe operations for the Pantry.

use super::Pantry;
use crate::{
    error::Result,
    models::{DishCategory, Recipe, RecipeFilter},
    params::{NewRecipe, RecipePatch},
};

impl Pantry {
    /// Validates and stores a new recipe.
    pub async fn create_recipe(&self, input: NewRecipe) -> Result<Recipe> {
        self.with_db(move |db| db.recipes().create_recipe(input))
            .await
    }

    /// Active recipe by id.
    pub async fn get_recipe_by_id(&self, id: &str) -> Result<Option<Recipe>> {
        let id = id.to_string();
        self.with_db(move |db| db.recipes().get_recipe_by_id(&id))
            .await
    }

    pub async fn get_all_recipes(&self, filter: RecipeFilter) -> Result<Vec<Recipe>> {
        self.with_db(move |db| db.recipes().get_all_recipes(&filter))
            .await
    }

    pub async fn search_recipes(&self, term: &str) -> Result<Vec<Recipe>> {
        let term = term.to_string();
        self.with_db(move |db| db.recipes().search_recipes(&term))
            .await
    }

    pub async fn get_recipes_by_category(&self, category: DishCategory) -> Result<Vec<Recipe>> {
        self.with_db(move |db| db.recipes().get_recipes_by_category(category))
            .await
    }

    pub async fn get_recipes_by_tag(&self, tag: &str) -> Result<Vec<Recipe>> {
        let tag = tag.to_string();
        self.with_db(move |db| db.recipes().get_recipes_by_tag(&tag))
            .await
    }

    pub async fn update_recipe(&self, patch: RecipePatch) -> Result<Recipe> {
        self.with_db(move |db| db.recipes().update_recipe(&patch))
            .await
    }

    /// Soft-deletes a recipe. Fails with `NotFound` when absent.
    pub async fn delete_recipe(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.with_db(move |db| db.recipes().delete_recipe(&id))
            .await
    }

    pub async fn create_recipes_batch(&self, inputs: Vec<NewRecipe>) -> Result<Vec<Recipe>> {
        self.with_db(move |db| db.recipes().create_recipes_batch(inputs))
            .await
    }

    pub async fn delete_recipes_batch(&self, ids: Vec<String>) -> Result<()> {
        self.with_db(move |db| db.recipes().delete_recipes_batch(&ids))
            .await
    }

    pub async fn get_recipe_count(&self, include_deleted: bool) -> Result<u64> {
        self.with_db(move |db| db.recipes().get_recipe_count(include_deleted))
            .await
    }
}
