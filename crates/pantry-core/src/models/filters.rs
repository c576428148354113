//! Filter types for list and count queries.

use jiff::civil::Date;

use super::DishCategory;

/// Default page size for recipe listings.
pub const DEFAULT_RECIPE_LIMIT: u32 = 100;

/// Filter options for listing recipes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeFilter {
    pub limit: u32,
    pub offset: u32,

    /// Also return soft-deleted recipes
    pub include_deleted: bool,

    /// Exact category match
    pub category: Option<DishCategory>,

    /// Recipes whose tag list contains this tag (exact match)
    pub tag: Option<String>,
}

impl Default for RecipeFilter {
    fn default() -> Self {
        Self {
            limit: DEFAULT_RECIPE_LIMIT,
            offset: 0,
            include_deleted: false,
            category: None,
            tag: None,
        }
    }
}

impl RecipeFilter {
    pub fn including_deleted() -> Self {
        Self {
            include_deleted: true,
            ..Self::default()
        }
    }

    pub fn page(limit: u32, offset: u32) -> Self {
        Self {
            limit,
            offset,
            ..Self::default()
        }
    }
}

/// Filter options for listing meal plans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MealPlanFilter {
    /// Inclusive date range; either bound may be open
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,

    pub recipe_id: Option<String>,

    /// No limit when `None`
    pub limit: Option<u32>,
    pub offset: u32,
}

impl MealPlanFilter {
    pub fn between(start_date: Date, end_date: Date) -> Self {
        Self {
            start_date: Some(start_date),
            end_date: Some(end_date),
            ..Self::default()
        }
    }
}

/// Filter options for listing and counting shopping items. Flags combine
/// with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingItemFilter {
    pub checked_only: bool,
    pub unchecked_only: bool,

    /// Items generated from a recipe
    pub recipe_only: bool,

    /// Items tied to neither a recipe nor a meal plan
    pub manual_only: bool,

    pub recipe_id: Option<String>,
    pub meal_plan_id: Option<String>,
}

impl ShoppingItemFilter {
    pub fn checked() -> Self {
        Self {
            checked_only: true,
            ..Self::default()
        }
    }

    pub fn unchecked() -> Self {
        Self {
            unchecked_only: true,
            ..Self::default()
        }
    }
}
