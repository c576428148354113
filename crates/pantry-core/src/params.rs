//! Input and patch structures for repository operations.
//!
//! `New*` structs carry everything needed to create a record. `*Patch`
//! structs carry an id plus the fields to change: `None` leaves a field
//! alone, and for nullable columns `Some(None)` clears it.

use jiff::civil::Date;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{
    db::{
        update::{Assignment, ColumnPatch},
        value,
    },
    models::{
        DishCategory, Ingredient, MealPlanRow, MealType, MeasurementUnit, RecipeRow,
        ShoppingListItemRow,
    },
};

/// Reads a present field, `null` included, as `Some(..)`. An absent field
/// falls back to `None` through `#[serde(default)]`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Parameters for creating a recipe.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewRecipe {
    pub title: String,
    pub servings: i32,
    pub category: DishCategory,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<String>,
    pub image_uri: Option<String>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub tags: Vec<String>,
}

/// Partial update of a recipe.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipePatch {
    pub id: String,
    pub title: Option<String>,
    pub servings: Option<i32>,
    pub category: Option<DishCategory>,
    pub ingredients: Option<Vec<Ingredient>>,
    pub steps: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub image_uri: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<Option<i32>>,
    pub tags: Option<Vec<String>>,
}

impl RecipePatch {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

impl ColumnPatch for RecipePatch {
    type Row = RecipeRow;

    fn id(&self) -> &str {
        &self.id
    }

    /// `updatedAt` is always written.
    fn assignments(&self, row: &RecipeRow) -> Vec<Assignment> {
        let mut assignments = Vec::new();
        if self.title.is_some() {
            assignments.push(Assignment::new("title", value::text(&row.title)));
        }
        if self.servings.is_some() {
            assignments.push(Assignment::new(
                "servings",
                value::int(i64::from(row.servings)),
            ));
        }
        if self.category.is_some() {
            assignments.push(Assignment::new("category", value::text(&row.category)));
        }
        if self.ingredients.is_some() {
            assignments.push(Assignment::new(
                "ingredients",
                value::text(&row.ingredients),
            ));
        }
        if self.steps.is_some() {
            assignments.push(Assignment::new("steps", value::text(&row.steps)));
        }
        if self.image_uri.is_some() {
            assignments.push(Assignment::new(
                "imageUri",
                value::opt_text(row.image_uri.as_deref()),
            ));
        }
        if self.prep_time.is_some() {
            assignments.push(Assignment::new(
                "prepTime",
                value::opt_int(row.prep_time.map(i64::from)),
            ));
        }
        if self.cook_time.is_some() {
            assignments.push(Assignment::new(
                "cookTime",
                value::opt_int(row.cook_time.map(i64::from)),
            ));
        }
        if self.tags.is_some() {
            assignments.push(Assignment::new(
                "tags",
                value::opt_text(row.tags.as_deref()),
            ));
        }
        assignments.push(Assignment::new("updatedAt", value::text(&row.updated_at)));
        assignments
    }
}

/// Parameters for scheduling a recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMealPlan {
    pub recipe_id: String,
    pub date: Date,
    pub meal_type: MealType,
}

/// Partial update of a meal plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanPatch {
    pub id: String,
    pub recipe_id: Option<String>,
    pub date: Option<Date>,
    pub meal_type: Option<MealType>,
}

impl ColumnPatch for MealPlanPatch {
    type Row = MealPlanRow;

    fn id(&self) -> &str {
        &self.id
    }

    fn assignments(&self, row: &MealPlanRow) -> Vec<Assignment> {
        let mut assignments = Vec::new();
        if self.recipe_id.is_some() {
            assignments.push(Assignment::new("recipeId", value::text(&row.recipe_id)));
        }
        if self.date.is_some() {
            assignments.push(Assignment::new("date", value::text(&row.date)));
        }
        if self.meal_type.is_some() {
            assignments.push(Assignment::new("mealType", value::text(&row.meal_type)));
        }
        assignments
    }
}

/// Parameters for adding a shopping list item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewShoppingItem {
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<MeasurementUnit>,
    pub checked: bool,
    pub recipe_id: Option<String>,
    pub meal_plan_id: Option<String>,
}

impl NewShoppingItem {
    /// A manually added item with only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Partial update of a shopping list item. Recipe and meal plan links are
/// fixed at creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItemPatch {
    pub id: String,
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub unit: Option<Option<MeasurementUnit>>,
    pub checked: Option<bool>,
}

impl ColumnPatch for ShoppingItemPatch {
    type Row = ShoppingListItemRow;

    fn id(&self) -> &str {
        &self.id
    }

    fn assignments(&self, row: &ShoppingListItemRow) -> Vec<Assignment> {
        let mut assignments = Vec::new();
        if self.name.is_some() {
            assignments.push(Assignment::new("name", value::text(&row.name)));
        }
        if self.quantity.is_some() {
            assignments.push(Assignment::new("quantity", value::opt_real(row.quantity)));
        }
        if self.unit.is_some() {
            assignments.push(Assignment::new(
                "unit",
                value::opt_text(row.unit.as_deref()),
            ));
        }
        if self.checked.is_some() {
            assignments.push(Assignment::new("checked", value::int(row.checked)));
        }
        assignments
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_null_in_patch_json_clears_the_field() {
        let patch: RecipePatch =
            serde_json::from_value(json!({ "id": "r1", "imageUri": null, "prepTime": 5 }))
                .unwrap();
        assert_eq!(patch.image_uri, Some(None));
        assert_eq!(patch.prep_time, Some(Some(5)));
        assert_eq!(patch.cook_time, None);

        let text = serde_json::to_string(&patch).unwrap();
        let back: RecipePatch = serde_json::from_str(&text).unwrap();
        assert_eq!(back.image_uri, Some(None));
        assert_eq!(back.cook_time, None);
    }

    #[test]
    fn test_shopping_patch_distinguishes_absent_and_null() {
        let patch: ShoppingItemPatch =
            serde_json::from_value(json!({ "id": "i1", "quantity": null })).unwrap();
        assert_eq!(patch.quantity, Some(None));
        assert_eq!(patch.unit, None);

        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json["quantity"], serde_json::Value::Null);
        assert!(json.get("unit").is_none());
    }
}
