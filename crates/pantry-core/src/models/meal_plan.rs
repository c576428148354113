//! Meal plan entity: one recipe scheduled into a (date, meal type) slot.

use jiff::{civil::Date, Timestamp};
use rusqlite::{types::Value, Row};
use serde::{Deserialize, Serialize};

use super::{now, parse_column, parse_timestamp, timestamp_to_text, MealType};
use crate::{
    db::value,
    error::Result,
    params::{MealPlanPatch, NewMealPlan},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    pub id: String,
    pub recipe_id: String,
    pub date: Date,
    pub meal_type: MealType,
    pub created_at: Timestamp,
}

/// The `meal_plans` table row.
#[derive(Debug, Clone, PartialEq)]
pub struct MealPlanRow {
    pub id: String,
    pub recipe_id: String,
    pub date: String,
    pub meal_type: String,
    pub created_at: String,
}

impl MealPlanRow {
    pub const COLUMNS: &'static str = "id, recipeId, date, mealType, createdAt";

    pub fn from_sql_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            recipe_id: row.get(1)?,
            date: row.get(2)?,
            meal_type: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    pub fn to_params(&self) -> Vec<Value> {
        vec![
            value::text(&self.id),
            value::text(&self.recipe_id),
            value::text(&self.date),
            value::text(&self.meal_type),
            value::text(&self.created_at),
        ]
    }
}

impl MealPlan {
    pub fn create(input: NewMealPlan) -> Self {
        Self {
            id: String::new(),
            recipe_id: input.recipe_id,
            date: input.date,
            meal_type: input.meal_type,
            created_at: now(),
        }
    }

    /// The meal type is valid by construction. Dates must have a four
    /// digit year to be stored as `YYYY-MM-DD`.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.recipe_id.trim().is_empty() {
            errors.push("Recipe ID is required".to_string());
        }
        if !(0..=9999).contains(&self.date.year()) {
            errors.push("Date must be in YYYY-MM-DD format".to_string());
        }
        errors
    }

    pub fn to_row(&self) -> MealPlanRow {
        MealPlanRow {
            id: self.id.clone(),
            recipe_id: self.recipe_id.clone(),
            date: self.date.to_string(),
            meal_type: self.meal_type.as_str().to_string(),
            created_at: timestamp_to_text(&self.created_at),
        }
    }

    pub fn from_row(row: MealPlanRow) -> Result<Self> {
        Ok(Self {
            date: parse_column("date", &row.date)?,
            meal_type: parse_column("mealType", &row.meal_type)?,
            created_at: parse_timestamp("createdAt", &row.created_at)?,
            id: row.id,
            recipe_id: row.recipe_id,
        })
    }

    /// Meal plans carry no update timestamp; only the patched fields change.
    pub fn apply(&self, patch: &MealPlanPatch) -> Self {
        let mut updated = self.clone();
        if let Some(recipe_id) = &patch.recipe_id {
            updated.recipe_id.clone_from(recipe_id);
        }
        if let Some(date) = patch.date {
            updated.date = date;
        }
        if let Some(meal_type) = patch.meal_type {
            updated.meal_type = meal_type;
        }
        updated
    }
}

/// A meal plan joined with the summary of its recipe. Recipe fields are
/// `None` when the recipe row no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanWithRecipe {
    #[serde(flatten)]
    pub meal_plan: MealPlan,
    pub recipe_title: Option<String>,
    pub recipe_image_uri: Option<String>,
    pub recipe_servings: Option<i32>,
    pub recipe_prep_time: Option<i32>,
    pub recipe_cook_time: Option<i32>,
}
