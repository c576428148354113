//! Meal plan persistence. Meal plans are hard-deleted.

use jiff::civil::Date;
use log::debug;

use super::{ensure_valid, from_rows, new_id, write_patch, WhereClause};
use crate::{
    db::{value, Database},
    error::{Result, StoreError},
    models::{
        enums::MEAL_TYPE_ORDER_SQL, MealPlan, MealPlanFilter, MealPlanRow, MealPlanWithRecipe,
        MealType,
    },
    params::{MealPlanPatch, NewMealPlan},
};

const ENTITY: &str = "Meal plan";

const INSERT_MEAL_PLAN_SQL: &str =
    "INSERT INTO meal_plans (id, recipeId, date, mealType, createdAt) VALUES (?1, ?2, ?3, ?4, ?5)";
const SELECT_MEAL_PLAN_SQL: &str =
    "SELECT id, recipeId, date, mealType, createdAt FROM meal_plans WHERE id = ?1";
const DELETE_MEAL_PLAN_SQL: &str = "DELETE FROM meal_plans WHERE id = ?1";
const DELETE_BY_DATE_SQL: &str = "DELETE FROM meal_plans WHERE date = ?1";
const DELETE_BY_RECIPE_SQL: &str = "DELETE FROM meal_plans WHERE recipeId = ?1";
const COUNT_MEAL_PLANS_SQL: &str = "SELECT COUNT(*) FROM meal_plans";
const COUNT_SLOT_SQL: &str = "SELECT COUNT(*) FROM meal_plans WHERE date = ?1 AND mealType = ?2";
const WITH_RECIPE_SQL: &str = "SELECT mp.id, mp.recipeId, mp.date, mp.mealType, mp.createdAt, r.title, r.imageUri, r.servings, r.prepTime, r.cookTime FROM meal_plans mp LEFT JOIN recipes r ON mp.recipeId = r.id";

/// Meal plan CRUD on a borrowed connection.
#[derive(Debug, Clone, Copy)]
pub struct MealPlanRepository<'db> {
    db: &'db Database,
}

impl<'db> MealPlanRepository<'db> {
    pub fn new(db: &'db Database) -> Self {
        Self { db }
    }

    /// Schedules a recipe. The slot is not checked here; callers use
    /// [`MealPlanRepository::is_meal_slot_available`] first.
    pub fn create_meal_plan(&self, input: NewMealPlan) -> Result<MealPlan> {
        let mut meal_plan = MealPlan::create(input);
        meal_plan.id = new_id();
        ensure_valid(ENTITY, meal_plan.validate())?;

        self.db
            .execute(INSERT_MEAL_PLAN_SQL, &meal_plan.to_row().to_params())?;
        debug!(
            "Created meal plan {} ({} {})",
            meal_plan.id, meal_plan.date, meal_plan.meal_type
        );
        Ok(meal_plan)
    }

    pub fn get_meal_plan_by_id(&self, id: &str) -> Result<Option<MealPlan>> {
        self.db
            .query_optional(
                SELECT_MEAL_PLAN_SQL,
                &[value::text(id)],
                MealPlanRow::from_sql_row,
            )?
            .map(MealPlan::from_row)
            .transpose()
    }

    /// Lists meal plans newest first.
    pub fn get_all_meal_plans(&self, filter: &MealPlanFilter) -> Result<Vec<MealPlan>> {
        let mut clause = WhereClause::new();
        if let Some(start) = filter.start_date {
            clause.push_bound("date >= ?", value::date(start));
        }
        if let Some(end) = filter.end_date {
            clause.push_bound("date <= ?", value::date(end));
        }
        if let Some(recipe_id) = &filter.recipe_id {
            clause.push_bound("recipeId = ?", value::text(recipe_id));
        }

        let mut sql = format!(
            "SELECT {} FROM meal_plans{} ORDER BY createdAt DESC, rowid DESC",
            MealPlanRow::COLUMNS,
            clause.sql()
        );
        // SQLite accepts OFFSET only after LIMIT; -1 means unlimited.
        if filter.limit.is_some() || filter.offset > 0 {
            let limit = clause.bind(value::int(filter.limit.map_or(-1, i64::from)));
            let offset = clause.bind(value::int(i64::from(filter.offset)));
            sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}"));
        }
        self.select(&sql, &clause)
    }

    /// Plans for one day in breakfast, lunch, dinner, snack order.
    pub fn get_meal_plans_by_date(&self, date: Date) -> Result<Vec<MealPlan>> {
        let mut clause = WhereClause::new();
        clause.push_bound("date = ?", value::date(date));
        let sql = format!(
            "SELECT {} FROM meal_plans{} ORDER BY {MEAL_TYPE_ORDER_SQL}, createdAt",
            MealPlanRow::COLUMNS,
            clause.sql()
        );
        self.select(&sql, &clause)
    }

    /// Plans in an inclusive date range, by date then meal order.
    pub fn get_meal_plans_by_date_range(&self, start: Date, end: Date) -> Result<Vec<MealPlan>> {
        let mut clause = WhereClause::new();
        clause.push_bound("date >= ?", value::date(start));
        clause.push_bound("date <= ?", value::date(end));
        let sql = format!(
            "SELECT {} FROM meal_plans{} ORDER BY date, {MEAL_TYPE_ORDER_SQL}, createdAt",
            MealPlanRow::COLUMNS,
            clause.sql()
        );
        self.select(&sql, &clause)
    }

    /// Plans using a recipe, latest date first.
    pub fn get_meal_plans_by_recipe(&self, recipe_id: &str) -> Result<Vec<MealPlan>> {
        let mut clause = WhereClause::new();
        clause.push_bound("recipeId = ?", value::text(recipe_id));
        let sql = format!(
            "SELECT {} FROM meal_plans{} ORDER BY date DESC, {MEAL_TYPE_ORDER_SQL}",
            MealPlanRow::COLUMNS,
            clause.sql()
        );
        self.select(&sql, &clause)
    }

    /// Plans joined with their recipe summary, optionally limited to an
    /// inclusive date range. Soft-deleted recipes still join; a missing
    /// recipe leaves the summary fields empty.
    pub fn get_meal_plans_with_recipe(
        &self,
        range: Option<(Date, Date)>,
    ) -> Result<Vec<MealPlanWithRecipe>> {
        let mut clause = WhereClause::new();
        if let Some((start, end)) = range {
            clause.push_bound("mp.date >= ?", value::date(start));
            clause.push_bound("mp.date <= ?", value::date(end));
        }
        let sql = format!(
            "{WITH_RECIPE_SQL}{} ORDER BY mp.date, {MEAL_TYPE_ORDER_SQL}, mp.createdAt",
            clause.sql()
        );

        let rows = self.db.query(&sql, clause.params(), |row| {
            Ok((
                MealPlanRow::from_sql_row(row)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, Option<String>>(6)?,
                row.get::<_, Option<i32>>(7)?,
                row.get::<_, Option<i32>>(8)?,
                row.get::<_, Option<i32>>(9)?,
            ))
        })?;

        rows.into_iter()
            .map(|(plan, title, image_uri, servings, prep_time, cook_time)| {
                Ok(MealPlanWithRecipe {
                    meal_plan: MealPlan::from_row(plan)?,
                    recipe_title: title,
                    recipe_image_uri: image_uri,
                    recipe_servings: servings,
                    recipe_prep_time: prep_time,
                    recipe_cook_time: cook_time,
                })
            })
            .collect()
    }

    /// Applies a patch. An empty patch returns the stored plan unchanged.
    ///
    /// # Errors
    ///
    /// `StoreError::NotFound` when the id does not exist.
    pub fn update_meal_plan(&self, patch: &MealPlanPatch) -> Result<MealPlan> {
        self.db.transaction(|db| {
            let existing = self
                .get_meal_plan_by_id(&patch.id)?
                .ok_or_else(|| StoreError::not_found(ENTITY, patch.id.as_str()))?;

            let updated = existing.apply(patch);
            ensure_valid(ENTITY, updated.validate())?;

            if write_patch(db, "meal_plans", patch, &updated.to_row(), None)? > 0 {
                debug!("Updated meal plan {}", updated.id);
            }
            Ok(updated)
        })
    }

    /// Hard-deletes a meal plan. A missing id is not an error.
    pub fn delete_meal_plan(&self, id: &str) -> Result<()> {
        let removed = self.db.execute(DELETE_MEAL_PLAN_SQL, &[value::text(id)])?;
        debug!("Deleted meal plan {id} ({removed} rows)");
        Ok(())
    }

    /// Removes every plan on a date; returns how many were removed.
    pub fn delete_meal_plans_by_date(&self, date: Date) -> Result<usize> {
        let removed = self.db.execute(DELETE_BY_DATE_SQL, &[value::date(date)])?;
        debug!("Deleted {removed} meal plans on {date}");
        Ok(removed)
    }

    /// Removes every plan using a recipe; returns how many were removed.
    pub fn delete_meal_plans_by_recipe(&self, recipe_id: &str) -> Result<usize> {
        let removed = self
            .db
            .execute(DELETE_BY_RECIPE_SQL, &[value::text(recipe_id)])?;
        debug!("Deleted {removed} meal plans for recipe {recipe_id}");
        Ok(removed)
    }

    /// Creates every plan or none.
    pub fn create_meal_plans_batch(&self, inputs: Vec<NewMealPlan>) -> Result<Vec<MealPlan>> {
        self.db.transaction(|_| {
            inputs
                .into_iter()
                .map(|input| self.create_meal_plan(input))
                .collect()
        })
    }

    /// Deletes every listed plan in one transaction.
    pub fn delete_meal_plans_batch(&self, ids: &[String]) -> Result<()> {
        self.db.transaction(|_| {
            ids.iter().try_for_each(|id| self.delete_meal_plan(id))
        })
    }

    pub fn get_meal_plan_count(&self) -> Result<u64> {
        self.db.query_count(COUNT_MEAL_PLANS_SQL, &[])
    }

    /// True when nothing is planned for this date and meal type.
    pub fn is_meal_slot_available(&self, date: Date, meal_type: MealType) -> Result<bool> {
        let taken = self.db.query_count(
            COUNT_SLOT_SQL,
            &[value::date(date), value::text(meal_type.as_str())],
        )?;
        Ok(taken == 0)
    }

    fn select(&self, sql: &str, clause: &WhereClause) -> Result<Vec<MealPlan>> {
        let rows = self
            .db
            .query(sql, clause.params(), MealPlanRow::from_sql_row)?;
        from_rows(rows, MealPlan::from_row)
    }
}
