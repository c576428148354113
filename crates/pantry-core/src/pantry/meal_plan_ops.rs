//! Meal plan operations for the Pantry.

use jiff::civil::Date;

use super::Pantry;
use crate::{
    error::Result,
    models::{MealPlan, MealPlanFilter, MealPlanWithRecipe, MealType},
    params::{MealPlanPatch, NewMealPlan},
};

impl Pantry {
    pub async fn create_meal_plan(&self, input: NewMealPlan) -> Result<MealPlan> {
        self.with_db(move |db| db.meal_plans().create_meal_plan(input))
            .await
    }

    pub async fn get_meal_plan_by_id(&self, id: &str) -> Result<Option<MealPlan>> {
        let id = id.to_string();
        self.with_db(move |db| db.meal_plans().get_meal_plan_by_id(&id))
            .await
    }

    pub async fn get_all_meal_plans(&self, filter: MealPlanFilter) -> Result<Vec<MealPlan>> {
        self.with_db(move |db| db.meal_plans().get_all_meal_plans(&filter))
            .await
    }

    pub async fn get_meal_plans_by_date(&self, date: Date) -> Result<Vec<MealPlan>> {
        self.with_db(move |db| db.meal_plans().get_meal_plans_by_date(date))
            .await
    }

    pub async fn get_meal_plans_by_date_range(
        &self,
        start: Date,
        end: Date,
    ) -> Result<Vec<MealPlan>> {
        self.with_db(move |db| db.meal_plans().get_meal_plans_by_date_range(start, end))
            .await
    }

    pub async fn get_meal_plans_by_recipe(&self, recipe_id: &str) -> Result<Vec<MealPlan>> {
        let recipe_id = recipe_id.to_string();
        self.with_db(move |db| db.meal_plans().get_meal_plans_by_recipe(&recipe_id))
            .await
    }

    pub async fn get_meal_plans_with_recipe(
        &self,
        range: Option<(Date, Date)>,
    ) -> Result<Vec<MealPlanWithRecipe>> {
        self.with_db(move |db| db.meal_plans().get_meal_plans_with_recipe(range))
            .await
    }

    pub async fn update_meal_plan(&self, patch: MealPlanPatch) -> Result<MealPlan> {
        self.with_db(move |db| db.meal_plans().update_meal_plan(&patch))
            .await
    }

    /// Hard-deletes a meal plan; a missing id is not an error.
    pub async fn delete_meal_plan(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.with_db(move |db| db.meal_plans().delete_meal_plan(&id))
            .await
    }

    pub async fn delete_meal_plans_by_date(&self, date: Date) -> Result<usize> {
        self.with_db(move |db| db.meal_plans().delete_meal_plans_by_date(date))
            .await
    }

    pub async fn delete_meal_plans_by_recipe(&self, recipe_id: &str) -> Result<usize> {
        let recipe_id = recipe_id.to_string();
        self.with_db(move |db| db.meal_plans().delete_meal_plans_by_recipe(&recipe_id))
            .await
    }

    pub async fn create_meal_plans_batch(&self, inputs: Vec<NewMealPlan>) -> Result<Vec<MealPlan>> {
        self.with_db(move |db| db.meal_plans().create_meal_plans_batch(inputs))
            .await
    }

    pub async fn delete_meal_plans_batch(&self, ids: Vec<String>) -> Result<()> {
        self.with_db(move |db| db.meal_plans().delete_meal_plans_batch(&ids))
            .await
    }

    pub async fn get_meal_plan_count(&self) -> Result<u64> {
        self.with_db(|db| db.meal_plans().get_meal_plan_count())
            .await
    }

    pub async fn is_meal_slot_available(&self, date: Date, meal_type: MealType) -> Result<bool> {
        self.with_db(move |db| db.meal_plans().is_meal_slot_available(date, meal_type))
            .await
    }
}
