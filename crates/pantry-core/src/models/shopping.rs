//! Shopping list items.

use std::collections::HashMap;

use jiff::Timestamp;
use rusqlite::{types::Value, Row};
use serde::{Deserialize, Serialize};

use super::{now, parse_column, parse_timestamp, timestamp_to_text, MeasurementUnit};
use crate::{
    db::value,
    error::Result,
    params::{NewShoppingItem, ShoppingItemPatch},
};

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_QUANTITY: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListItem {
    pub id: String,
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<MeasurementUnit>,
    pub checked: bool,
    pub recipe_id: Option<String>,
    pub meal_plan_id: Option<String>,
    pub created_at: Timestamp,
}

/// The `shopping_list_items` table row; `checked` is stored as 0/1.
#[derive(Debug, Clone, PartialEq)]
pub struct ShoppingListItemRow {
    pub id: String,
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub checked: i64,
    pub recipe_id: Option<String>,
    pub meal_plan_id: Option<String>,
    pub created_at: String,
}

impl ShoppingListItemRow {
    pub const COLUMNS: &'static str =
        "id, name, quantity, unit, checked, recipeId, mealPlanId, createdAt";

    pub fn from_sql_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            quantity: row.get(2)?,
            unit: row.get(3)?,
            checked: row.get(4)?,
            recipe_id: row.get(5)?,
            meal_plan_id: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    pub fn to_params(&self) -> Vec<Value> {
        vec![
            value::text(&self.id),
            value::text(&self.name),
            value::opt_real(self.quantity),
            value::opt_text(self.unit.as_deref()),
            value::int(self.checked),
            value::opt_text(self.recipe_id.as_deref()),
            value::opt_text(self.meal_plan_id.as_deref()),
            value::text(&self.created_at),
        ]
    }
}

impl ShoppingListItem {
    /// Builds an item from input; unchecked unless the input says otherwise.
    pub fn create(input: NewShoppingItem) -> Self {
        Self {
            id: String::new(),
            name: input.name,
            quantity: input.quantity,
            unit: input.unit,
            checked: input.checked,
            recipe_id: input.recipe_id,
            meal_plan_id: input.meal_plan_id,
            created_at: now(),
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("Item name is required".to_string());
        } else if self.name.chars().count() > MAX_NAME_LENGTH {
            errors.push(format!(
                "Item name must be {MAX_NAME_LENGTH} characters or less"
            ));
        }

        if let Some(quantity) = self.quantity {
            if quantity.is_nan() || quantity <= 0.0 {
                errors.push("Quantity must be positive".to_string());
            } else if quantity > MAX_QUANTITY {
                errors.push(format!("Quantity must be {MAX_QUANTITY} or less"));
            }
        }

        errors
    }

    pub fn to_row(&self) -> ShoppingListItemRow {
        ShoppingListItemRow {
            id: self.id.clone(),
            name: self.name.clone(),
            quantity: self.quantity,
            unit: self.unit.map(|u| u.as_str().to_string()),
            checked: i64::from(self.checked),
            recipe_id: self.recipe_id.clone(),
            meal_plan_id: self.meal_plan_id.clone(),
            created_at: timestamp_to_text(&self.created_at),
        }
    }

    pub fn from_row(row: ShoppingListItemRow) -> Result<Self> {
        Ok(Self {
            unit: row
                .unit
                .as_deref()
                .map(|text| parse_column("unit", text))
                .transpose()?,
            checked: row.checked != 0,
            created_at: parse_timestamp("createdAt", &row.created_at)?,
            id: row.id,
            name: row.name,
            quantity: row.quantity,
            recipe_id: row.recipe_id,
            meal_plan_id: row.meal_plan_id,
        })
    }

    pub fn apply(&self, patch: &ShoppingItemPatch) -> Self {
        let mut updated = self.clone();
        if let Some(name) = &patch.name {
            updated.name.clone_from(name);
        }
        if let Some(quantity) = patch.quantity {
            updated.quantity = quantity;
        }
        if let Some(unit) = patch.unit {
            updated.unit = unit;
        }
        if let Some(checked) = patch.checked {
            updated.checked = checked;
        }
        updated
    }

    /// True when the item was generated from a recipe.
    pub fn is_from_recipe(&self) -> bool {
        self.recipe_id.is_some()
    }

    /// True when the user added the item by hand.
    pub fn is_manual(&self) -> bool {
        self.recipe_id.is_none() && self.meal_plan_id.is_none()
    }
}

/// A shopping item joined with its recipe's title and image.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItemWithRecipe {
    #[serde(flatten)]
    pub item: ShoppingListItem,
    pub recipe_title: Option<String>,
    pub recipe_image_uri: Option<String>,
}

/// Items sharing a name and unit, merged for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedShoppingItem {
    pub name: String,
    pub total_quantity: Option<f64>,
    pub unit: Option<MeasurementUnit>,
    pub checked: bool,
    pub item_ids: Vec<String>,
}

/// Groups items by case-insensitive name and unit.
///
/// Quantities are summed over the members that have one; a group whose
/// members have no quantity keeps `None`. A group is checked only when every
/// member is. Groups appear in order of first occurrence and keep the first
/// member's spelling of the name.
pub fn aggregate_shopping_items(items: &[ShoppingListItem]) -> Vec<AggregatedShoppingItem> {
    let mut groups: Vec<AggregatedShoppingItem> = Vec::new();
    let mut index: HashMap<(String, Option<MeasurementUnit>), usize> = HashMap::new();

    for item in items {
        let key = (item.name.trim().to_lowercase(), item.unit);
        match index.get(&key) {
            Some(&position) => {
                let group = &mut groups[position];
                if let Some(quantity) = item.quantity {
                    group.total_quantity = Some(group.total_quantity.unwrap_or(0.0) + quantity);
                }
                group.checked &= item.checked;
                group.item_ids.push(item.id.clone());
            }
            None => {
                index.insert(key, groups.len());
                groups.push(AggregatedShoppingItem {
                    name: item.name.trim().to_string(),
                    total_quantity: item.quantity,
                    unit: item.unit,
                    checked: item.checked,
                    item_ids: vec![item.id.clone()],
                });
            }
        }
    }

    groups
}
