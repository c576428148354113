//! Fixed enumerations stored as text columns.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Dish category of a recipe.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum DishCategory {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Dessert,
    Appetizer,
    Beverage,
    #[default]
    Other,
}

impl DishCategory {
    pub const ALL: [DishCategory; 8] = [
        DishCategory::Breakfast,
        DishCategory::Lunch,
        DishCategory::Dinner,
        DishCategory::Snack,
        DishCategory::Dessert,
        DishCategory::Appetizer,
        DishCategory::Beverage,
        DishCategory::Other,
    ];

    /// Database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            DishCategory::Breakfast => "breakfast",
            DishCategory::Lunch => "lunch",
            DishCategory::Dinner => "dinner",
            DishCategory::Snack => "snack",
            DishCategory::Dessert => "dessert",
            DishCategory::Appetizer => "appetizer",
            DishCategory::Beverage => "beverage",
            DishCategory::Other => "other",
        }
    }
}

impl FromStr for DishCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DishCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Invalid dish category: {s}"))
    }
}

/// Measurement unit of an ingredient or shopping item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MeasurementUnit {
    // Volume
    #[serde(rename = "tsp")]
    Teaspoon,
    #[serde(rename = "tbsp")]
    Tablespoon,
    #[serde(rename = "cup")]
    Cup,
    #[serde(rename = "fl oz")]
    FluidOunce,
    #[serde(rename = "ml")]
    Milliliter,
    #[serde(rename = "l")]
    Liter,

    // Weight
    #[serde(rename = "oz")]
    Ounce,
    #[serde(rename = "lb")]
    Pound,
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "kg")]
    Kilogram,

    // Count
    #[serde(rename = "unit")]
    Unit,
    #[serde(rename = "piece")]
    Piece,
    #[serde(rename = "slice")]
    Slice,
    #[serde(rename = "clove")]
    Clove,
    #[serde(rename = "head")]
    Head,
    #[serde(rename = "bunch")]
    Bunch,
    #[serde(rename = "can")]
    Can,
    #[serde(rename = "bottle")]
    Bottle,
    #[serde(rename = "package")]
    Package,
    #[serde(rename = "bag")]
    Bag,
    #[serde(rename = "box")]
    Box,
}

impl MeasurementUnit {
    pub const ALL: [MeasurementUnit; 21] = [
        MeasurementUnit::Teaspoon,
        MeasurementUnit::Tablespoon,
        MeasurementUnit::Cup,
        MeasurementUnit::FluidOunce,
        MeasurementUnit::Milliliter,
        MeasurementUnit::Liter,
        MeasurementUnit::Ounce,
        MeasurementUnit::Pound,
        MeasurementUnit::Gram,
        MeasurementUnit::Kilogram,
        MeasurementUnit::Unit,
        MeasurementUnit::Piece,
        MeasurementUnit::Slice,
        MeasurementUnit::Clove,
        MeasurementUnit::Head,
        MeasurementUnit::Bunch,
        MeasurementUnit::Can,
        MeasurementUnit::Bottle,
        MeasurementUnit::Package,
        MeasurementUnit::Bag,
        MeasurementUnit::Box,
    ];

    /// Database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementUnit::Teaspoon => "tsp",
            MeasurementUnit::Tablespoon => "tbsp",
            MeasurementUnit::Cup => "cup",
            MeasurementUnit::FluidOunce => "fl oz",
            MeasurementUnit::Milliliter => "ml",
            MeasurementUnit::Liter => "l",
            MeasurementUnit::Ounce => "oz",
            MeasurementUnit::Pound => "lb",
            MeasurementUnit::Gram => "g",
            MeasurementUnit::Kilogram => "kg",
            MeasurementUnit::Unit => "unit",
            MeasurementUnit::Piece => "piece",
            MeasurementUnit::Slice => "slice",
            MeasurementUnit::Clove => "clove",
            MeasurementUnit::Head => "head",
            MeasurementUnit::Bunch => "bunch",
            MeasurementUnit::Can => "can",
            MeasurementUnit::Bottle => "bottle",
            MeasurementUnit::Package => "package",
            MeasurementUnit::Bag => "bag",
            MeasurementUnit::Box => "box",
        }
    }
}

impl FromStr for MeasurementUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MeasurementUnit::ALL
            .into_iter()
            .find(|u| u.as_str() == s)
            .ok_or_else(|| format!("Invalid measurement unit: {s}"))
    }
}

impl fmt::Display for MeasurementUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Slot of a day a meal is planned for.
///
/// Variant order is the display order within a day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    /// Database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            _ => Err(format!("Invalid meal type: {s}")),
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for DishCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SQL expression ranking `mealType` in day order.
pub(crate) const MEAL_TYPE_ORDER_SQL: &str = "CASE mealType \
     WHEN 'breakfast' THEN 0 \
     WHEN 'lunch' THEN 1 \
     WHEN 'dinner' THEN 2 \
     ELSE 3 END";
