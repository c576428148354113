//! Recipe entity and its stored row.

use jiff::Timestamp;
use rusqlite::{types::Value, Row};
use serde::{Deserialize, Serialize};

use super::{now, parse_column, parse_timestamp, timestamp_to_text, DishCategory, MeasurementUnit};
use crate::{
    db::value,
    error::Result,
    params::{NewRecipe, RecipePatch},
};

pub const MAX_TITLE_LENGTH: usize = 200;
pub const MIN_SERVINGS: i32 = 1;
pub const MAX_SERVINGS: i32 = 50;
pub const MAX_INGREDIENTS: usize = 50;
pub const MAX_INGREDIENT_NAME_LENGTH: usize = 100;
pub const MAX_QUANTITY: f64 = 1000.0;
pub const MAX_STEPS: usize = 50;
pub const MAX_STEP_LENGTH: usize = 1000;
pub const MAX_MINUTES: i32 = 1440;
pub const MAX_TAGS: usize = 20;
pub const MAX_TAG_LENGTH: usize = 30;

/// One line of a recipe's ingredient list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<MeasurementUnit>,
}

impl Ingredient {
    /// Ingredient with no quantity or unit ("salt to taste").
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: None,
            unit: None,
        }
    }

    pub fn new(name: impl Into<String>, quantity: f64, unit: Option<MeasurementUnit>) -> Self {
        Self {
            name: name.into(),
            quantity: Some(quantity),
            unit,
        }
    }
}

/// A stored recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub servings: i32,
    pub category: DishCategory,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<String>,
    pub image_uri: Option<String>,
    /// Minutes
    pub prep_time: Option<i32>,
    /// Minutes
    pub cook_time: Option<i32>,
    pub tags: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Soft-delete marker; set once, never cleared.
    pub deleted_at: Option<Timestamp>,
}

/// The `recipes` table row, composite fields JSON-encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeRow {
    pub id: String,
    pub title: String,
    pub servings: i32,
    pub category: String,
    pub ingredients: String,
    pub steps: String,
    pub image_uri: Option<String>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub tags: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

impl RecipeRow {
    /// Column list matching [`RecipeRow::from_sql_row`] and
    /// [`RecipeRow::to_params`].
    pub const COLUMNS: &'static str = "id, title, servings, category, ingredients, steps, imageUri, prepTime, cookTime, tags, createdAt, updatedAt, deletedAt";

    /// Reads a row selected with [`RecipeRow::COLUMNS`].
    pub fn from_sql_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            servings: row.get(2)?,
            category: row.get(3)?,
            ingredients: row.get(4)?,
            steps: row.get(5)?,
            image_uri: row.get(6)?,
            prep_time: row.get(7)?,
            cook_time: row.get(8)?,
            tags: row.get(9)?,
            created_at: row.get(10)?,
            updated_at: row.get(11)?,
            deleted_at: row.get(12)?,
        })
    }

    /// Bound values in [`RecipeRow::COLUMNS`] order.
    pub fn to_params(&self) -> Vec<Value> {
        vec![
            value::text(&self.id),
            value::text(&self.title),
            value::int(i64::from(self.servings)),
            value::text(&self.category),
            value::text(&self.ingredients),
            value::text(&self.steps),
            value::opt_text(self.image_uri.as_deref()),
            value::opt_int(self.prep_time.map(i64::from)),
            value::opt_int(self.cook_time.map(i64::from)),
            value::opt_text(self.tags.as_deref()),
            value::text(&self.created_at),
            value::text(&self.updated_at),
            value::opt_text(self.deleted_at.as_deref()),
        ]
    }
}

impl Recipe {
    /// Builds a recipe from input. Both timestamps are set to now and the id
    /// is left empty.
    pub fn create(input: NewRecipe) -> Self {
        let timestamp = now();
        Self {
            id: String::new(),
            title: input.title,
            servings: input.servings,
            category: input.category,
            ingredients: input.ingredients,
            steps: input.steps,
            image_uri: input.image_uri,
            prep_time: input.prep_time,
            cook_time: input.cook_time,
            tags: input.tags,
            created_at: timestamp,
            updated_at: timestamp,
            deleted_at: None,
        }
    }

    /// Every violated invariant, empty when the recipe is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push("Title is required".to_string());
        } else if self.title.chars().count() > MAX_TITLE_LENGTH {
            errors.push(format!(
                "Title must be {MAX_TITLE_LENGTH} characters or less"
            ));
        }

        if !(MIN_SERVINGS..=MAX_SERVINGS).contains(&self.servings) {
            errors.push(format!(
                "Servings must be between {MIN_SERVINGS} and {MAX_SERVINGS}"
            ));
        }

        if self.ingredients.is_empty() {
            errors.push("At least one ingredient is required".to_string());
        } else if self.ingredients.len() > MAX_INGREDIENTS {
            errors.push(format!("Maximum {MAX_INGREDIENTS} ingredients allowed"));
        }
        for (index, ingredient) in self.ingredients.iter().enumerate() {
            validate_ingredient(index + 1, ingredient, &mut errors);
        }

        if self.steps.is_empty() {
            errors.push("At least one step is required".to_string());
        } else if self.steps.len() > MAX_STEPS {
            errors.push(format!("Maximum {MAX_STEPS} steps allowed"));
        }
        for (index, step) in self.steps.iter().enumerate() {
            let position = index + 1;
            if step.trim().is_empty() {
                errors.push(format!("Step {position} is required"));
            } else if step.chars().count() > MAX_STEP_LENGTH {
                errors.push(format!(
                    "Step {position} must be {MAX_STEP_LENGTH} characters or less"
                ));
            }
        }

        validate_minutes("Prep time", self.prep_time, &mut errors);
        validate_minutes("Cook time", self.cook_time, &mut errors);

        if self.tags.len() > MAX_TAGS {
            errors.push(format!("Maximum {MAX_TAGS} tags allowed"));
        }
        for tag in &self.tags {
            if tag.trim().is_empty() {
                errors.push("Tag cannot be empty".to_string());
            } else if tag.chars().count() > MAX_TAG_LENGTH {
                errors.push(format!("Tag must be {MAX_TAG_LENGTH} characters or less"));
            }
        }

        errors
    }

    /// Converts to the stored shape.
    pub fn to_row(&self) -> Result<RecipeRow> {
        Ok(RecipeRow {
            id: self.id.clone(),
            title: self.title.clone(),
            servings: self.servings,
            category: self.category.as_str().to_string(),
            ingredients: serde_json::to_string(&self.ingredients)?,
            steps: serde_json::to_string(&self.steps)?,
            image_uri: self.image_uri.clone(),
            prep_time: self.prep_time,
            cook_time: self.cook_time,
            tags: Some(serde_json::to_string(&self.tags)?),
            created_at: timestamp_to_text(&self.created_at),
            updated_at: timestamp_to_text(&self.updated_at),
            deleted_at: self.deleted_at.as_ref().map(timestamp_to_text),
        })
    }

    /// Converts from the stored shape. A NULL tags column reads as no tags.
    pub fn from_row(row: RecipeRow) -> Result<Self> {
        let tags = match row.tags.as_deref() {
            Some(json) => serde_json::from_str(json)?,
            None => Vec::new(),
        };
        Ok(Self {
            category: parse_column("category", &row.category)?,
            ingredients: serde_json::from_str(&row.ingredients)?,
            steps: serde_json::from_str(&row.steps)?,
            tags,
            created_at: parse_timestamp("createdAt", &row.created_at)?,
            updated_at: parse_timestamp("updatedAt", &row.updated_at)?,
            deleted_at: row
                .deleted_at
                .as_deref()
                .map(|text| parse_timestamp("deletedAt", text))
                .transpose()?,
            id: row.id,
            title: row.title,
            servings: row.servings,
            image_uri: row.image_uri,
            prep_time: row.prep_time,
            cook_time: row.cook_time,
        })
    }

    /// Returns a copy with the patch's present fields applied and
    /// `updated_at` refreshed.
    pub fn apply(&self, patch: &RecipePatch) -> Self {
        let mut updated = self.clone();
        if let Some(title) = &patch.title {
            updated.title.clone_from(title);
        }
        if let Some(servings) = patch.servings {
            updated.servings = servings;
        }
        if let Some(category) = patch.category {
            updated.category = category;
        }
        if let Some(ingredients) = &patch.ingredients {
            updated.ingredients.clone_from(ingredients);
        }
        if let Some(steps) = &patch.steps {
            updated.steps.clone_from(steps);
        }
        if let Some(image_uri) = &patch.image_uri {
            updated.image_uri.clone_from(image_uri);
        }
        if let Some(prep_time) = patch.prep_time {
            updated.prep_time = prep_time;
        }
        if let Some(cook_time) = patch.cook_time {
            updated.cook_time = cook_time;
        }
        if let Some(tags) = &patch.tags {
            updated.tags.clone_from(tags);
        }
        updated.updated_at = now();
        updated
    }

    /// Returns a copy marked deleted now.
    pub fn soft_delete(&self) -> Self {
        let timestamp = now();
        Self {
            deleted_at: Some(timestamp),
            updated_at: timestamp,
            ..self.clone()
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Prep plus cook time in minutes, `None` when neither is known.
    pub fn total_time(&self) -> Option<i32> {
        match (self.prep_time, self.cook_time) {
            (None, None) => None,
            (prep, cook) => Some(prep.unwrap_or(0) + cook.unwrap_or(0)),
        }
    }
}

fn validate_ingredient(position: usize, ingredient: &Ingredient, errors: &mut Vec<String>) {
    if ingredient.name.trim().is_empty() {
        errors.push(format!("Ingredient {position}: name is required"));
    } else if ingredient.name.chars().count() > MAX_INGREDIENT_NAME_LENGTH {
        errors.push(format!(
            "Ingredient {position}: name must be {MAX_INGREDIENT_NAME_LENGTH} characters or less"
        ));
    }
    if let Some(quantity) = ingredient.quantity {
        if quantity.is_nan() || quantity <= 0.0 {
            errors.push(format!("Ingredient {position}: quantity must be positive"));
        } else if quantity > MAX_QUANTITY {
            errors.push(format!(
                "Ingredient {position}: quantity must be {MAX_QUANTITY} or less"
            ));
        }
    }
}

fn validate_minutes(label: &str, minutes: Option<i32>, errors: &mut Vec<String>) {
    if let Some(minutes) = minutes {
        if !(0..=MAX_MINUTES).contains(&minutes) {
            errors.push(format!(
                "{label} must be between 0 and {MAX_MINUTES} minutes"
            ));
        }
    }
}
