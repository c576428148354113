#[cfg(test)]
mod model_tests {
    use jiff::{civil::date, Timestamp};

    use crate::{
        models::{
            aggregate_shopping_items, now, parse_timestamp, timestamp_to_text, DishCategory,
            Ingredient, MealPlan, MealType, MeasurementUnit, Recipe, RecipeRow, ShoppingListItem,
        },
        params::{MealPlanPatch, NewMealPlan, NewRecipe, NewShoppingItem, RecipePatch},
        StoreError,
    };

    fn tea() -> NewRecipe {
        NewRecipe {
            title: "Tea".to_string(),
            servings: 1,
            category: DishCategory::Beverage,
            ingredients: vec![Ingredient::named("water")],
            steps: vec!["Boil water".to_string()],
            ..Default::default()
        }
    }

    fn full_recipe() -> Recipe {
        let mut recipe = Recipe::create(NewRecipe {
            title: "Shakshuka".to_string(),
            servings: 2,
            category: DishCategory::Breakfast,
            ingredients: vec![
                Ingredient::new("eggs", 4.0, Some(MeasurementUnit::Unit)),
                Ingredient::new("olive oil", 0.1, Some(MeasurementUnit::FluidOunce)),
                Ingredient::named("cumin"),
            ],
            steps: vec!["Cook the sauce".to_string(), "Poach the eggs".to_string()],
            image_uri: Some("file:///images/shakshuka.jpg".to_string()),
            prep_time: Some(10),
            cook_time: Some(20),
            tags: vec!["Middle Eastern".to_string(), "Vegetarian".to_string()],
        });
        recipe.id = "3f2b8f5e-0c1a-4d8e-9a57-3b1f6c2d4e10".to_string();
        recipe
    }

    #[test]
    fn test_create_fills_defaults() {
        let recipe = Recipe::create(tea());
        assert!(recipe.id.is_empty());
        assert!(recipe.tags.is_empty());
        assert_eq!(recipe.image_uri, None);
        assert_eq!(recipe.created_at, recipe.updated_at);
        assert_eq!(recipe.deleted_at, None);
        assert!(recipe.validate().is_empty());
    }

    #[test]
    fn test_validation_catches_each_invariant() {
        let cases: Vec<(&str, Box<dyn Fn(&mut Recipe)>)> = vec![
            ("empty title", Box::new(|r| r.title = String::new())),
            ("blank title", Box::new(|r| r.title = "   ".to_string())),
            ("long title", Box::new(|r| r.title = "a".repeat(201))),
            ("zero servings", Box::new(|r| r.servings = 0)),
            ("too many servings", Box::new(|r| r.servings = 51)),
            ("no ingredients", Box::new(|r| r.ingredients.clear())),
            ("no steps", Box::new(|r| r.steps.clear())),
            ("negative prep", Box::new(|r| r.prep_time = Some(-1))),
            ("negative cook", Box::new(|r| r.cook_time = Some(-5))),
            ("long cook", Box::new(|r| r.cook_time = Some(1441))),
            ("blank step", Box::new(|r| r.steps.push(" ".to_string()))),
            (
                "too many tags",
                Box::new(|r| r.tags = (0..21).map(|i| format!("tag{i}")).collect()),
            ),
            ("long tag", Box::new(|r| r.tags = vec!["t".repeat(31)])),
            (
                "zero quantity",
                Box::new(|r| r.ingredients[0].quantity = Some(0.0)),
            ),
            (
                "huge quantity",
                Box::new(|r| r.ingredients[0].quantity = Some(1000.5)),
            ),
        ];

        for (label, mutate) in cases {
            let mut recipe = Recipe::create(tea());
            mutate(&mut recipe);
            assert!(!recipe.validate().is_empty(), "{label} should be rejected");
        }
    }

    #[test]
    fn test_validation_reports_every_violation() {
        let mut recipe = Recipe::create(tea());
        recipe.title.clear();
        recipe.servings = 0;
        recipe.steps.clear();
        let errors = recipe.validate();
        assert_eq!(
            errors,
            vec![
                "Title is required".to_string(),
                "Servings must be between 1 and 50".to_string(),
                "At least one step is required".to_string(),
            ]
        );
    }

    #[test]
    fn test_ingredient_errors_name_position() {
        let mut recipe = Recipe::create(tea());
        recipe.ingredients.push(Ingredient::named(""));
        assert_eq!(
            recipe.validate(),
            vec!["Ingredient 2: name is required".to_string()]
        );
    }

    #[test]
    fn test_boundaries_are_accepted() {
        let mut recipe = Recipe::create(tea());
        recipe.title = "a".repeat(200);
        recipe.servings = 50;
        recipe.prep_time = Some(0);
        recipe.cook_time = Some(1440);
        recipe.tags = (0..20).map(|_| "t".repeat(30)).collect();
        recipe.ingredients[0].quantity = Some(1000.0);
        assert!(recipe.validate().is_empty());
    }

    #[test]
    fn test_recipe_row_round_trip() {
        let recipe = full_recipe();
        let row = recipe.to_row().unwrap();
        assert_eq!(row.category, "breakfast");
        assert!(row.ingredients.contains("\"fl oz\""));
        assert_eq!(Recipe::from_row(row).unwrap(), recipe);

        let deleted = recipe.soft_delete();
        assert_eq!(Recipe::from_row(deleted.to_row().unwrap()).unwrap(), deleted);
    }

    #[test]
    fn test_recipe_row_round_trip_with_empty_lists_and_nulls() {
        let mut recipe = Recipe::create(tea());
        recipe.id = "tea".to_string();
        let row = recipe.to_row().unwrap();
        assert_eq!(row.tags.as_deref(), Some("[]"));
        assert_eq!(row.prep_time, None);
        assert_eq!(Recipe::from_row(row.clone()).unwrap(), recipe);

        // Rows written without a tags value read back as no tags.
        let legacy = RecipeRow { tags: None, ..row };
        assert!(Recipe::from_row(legacy).unwrap().tags.is_empty());
    }

    #[test]
    fn test_from_row_rejects_bad_columns() {
        let row = full_recipe().to_row().unwrap();

        let bad_category = RecipeRow {
            category: "brunch".to_string(),
            ..row.clone()
        };
        assert!(matches!(
            Recipe::from_row(bad_category),
            Err(StoreError::InvalidRow {
                column: "category",
                ..
            })
        ));

        let bad_json = RecipeRow {
            steps: "not json".to_string(),
            ..row
        };
        assert!(matches!(
            Recipe::from_row(bad_json),
            Err(StoreError::Serialization { .. })
        ));
    }

    #[test]
    fn test_partial_update_changes_only_patched_fields() {
        let recipe = full_recipe();
        let patch = RecipePatch {
            image_uri: Some(None),
            ..RecipePatch::new(recipe.id.clone()).title("X")
        };
        let updated = recipe.apply(&patch);

        assert_eq!(updated.title, "X");
        assert_eq!(updated.image_uri, None);
        assert!(updated.updated_at >= recipe.updated_at);
        assert_eq!(
            Recipe {
                title: recipe.title.clone(),
                image_uri: recipe.image_uri.clone(),
                updated_at: recipe.updated_at,
                ..updated
            },
            recipe
        );
    }

    #[test]
    fn test_soft_delete_and_totals() {
        let recipe = full_recipe();
        assert!(!recipe.is_deleted());
        assert_eq!(recipe.total_time(), Some(30));

        let deleted = recipe.soft_delete();
        assert!(deleted.is_deleted());
        assert_eq!(deleted.deleted_at, Some(deleted.updated_at));

        let quick = Recipe::create(tea());
        assert_eq!(quick.total_time(), None);
    }

    #[test]
    fn test_timestamp_text_is_fixed_width() {
        let whole = Timestamp::from_second(1_700_000_000).unwrap();
        assert_eq!(
            timestamp_to_text(&whole),
            "2023-11-14T22:13:20.000000000Z"
        );

        let current = now();
        let text = timestamp_to_text(&current);
        assert_eq!(text.len(), "2023-11-14T22:13:20.000000000Z".len());
        assert_eq!(parse_timestamp("createdAt", &text).unwrap(), current);

        // Millisecond text written by older builds still parses.
        assert_eq!(
            parse_timestamp("createdAt", "2023-11-14T22:13:20.000Z").unwrap(),
            whole
        );
    }

    #[test]
    fn test_sub_millisecond_timestamps_survive_round_trip() {
        let precise = Timestamp::from_nanosecond(1_700_000_000_123_456_789).unwrap();
        let mut recipe = Recipe::create(tea());
        recipe.id = "recipe-1".to_string();
        recipe.created_at = precise;
        recipe.updated_at = precise;
        recipe.deleted_at = Some(precise);

        let row = recipe.to_row().unwrap();
        assert_eq!(row.created_at, "2023-11-14T22:13:20.123456789Z");
        assert_eq!(Recipe::from_row(row).unwrap(), recipe);

        let earlier = Timestamp::from_nanosecond(1_700_000_000_123_456_788).unwrap();
        assert!(timestamp_to_text(&earlier) < timestamp_to_text(&precise));
    }

    #[test]
    fn test_meal_plan_round_trip_and_patch() {
        let mut plan = MealPlan::create(NewMealPlan {
            recipe_id: "recipe-1".to_string(),
            date: date(2025, 2, 28),
            meal_type: MealType::Lunch,
        });
        plan.id = "plan-1".to_string();

        let row = plan.to_row();
        assert_eq!(row.date, "2025-02-28");
        assert_eq!(row.meal_type, "lunch");
        assert_eq!(MealPlan::from_row(row).unwrap(), plan);

        let moved = plan.apply(&MealPlanPatch {
            id: plan.id.clone(),
            meal_type: Some(MealType::Dinner),
            ..Default::default()
        });
        assert_eq!(moved.meal_type, MealType::Dinner);
        assert_eq!(moved.date, plan.date);
        assert_eq!(moved.created_at, plan.created_at);

        let orphan = MealPlan {
            recipe_id: String::new(),
            ..plan
        };
        assert_eq!(orphan.validate(), vec!["Recipe ID is required".to_string()]);

        let ancient = MealPlan {
            date: date(-1, 1, 1),
            ..orphan.clone()
        };
        assert_eq!(ancient.to_row().date, "-000001-01-01");
        assert_eq!(
            ancient.validate(),
            vec![
                "Recipe ID is required".to_string(),
                "Date must be in YYYY-MM-DD format".to_string(),
            ]
        );
        assert!(MealPlan {
            date: date(0, 1, 1),
            recipe_id: "recipe-1".to_string(),
            ..orphan
        }
        .validate()
        .is_empty());
    }

    #[test]
    fn test_shopping_item_round_trip_and_validation() {
        let mut item = ShoppingListItem::create(NewShoppingItem {
            name: "Flour".to_string(),
            quantity: Some(2.5),
            unit: Some(MeasurementUnit::Kilogram),
            checked: true,
            recipe_id: Some("recipe-1".to_string()),
            meal_plan_id: None,
        });
        item.id = "item-1".to_string();

        let row = item.to_row();
        assert_eq!(row.checked, 1);
        assert_eq!(row.unit.as_deref(), Some("kg"));
        assert_eq!(ShoppingListItem::from_row(row).unwrap(), item);
        assert!(item.is_from_recipe());
        assert!(!item.is_manual());

        let mut manual = ShoppingListItem::create(NewShoppingItem::named("Milk"));
        manual.id = "item-2".to_string();
        assert!(!manual.checked);
        assert!(manual.is_manual());
        assert_eq!(ShoppingListItem::from_row(manual.to_row()).unwrap(), manual);

        let invalid = ShoppingListItem {
            name: String::new(),
            quantity: Some(-1.0),
            ..manual
        };
        assert_eq!(
            invalid.validate(),
            vec![
                "Item name is required".to_string(),
                "Quantity must be positive".to_string(),
            ]
        );
    }

    #[test]
    fn test_aggregate_shopping_items() {
        let item = |id: &str, name: &str, quantity: Option<f64>, unit, checked| {
            let mut item = ShoppingListItem::create(NewShoppingItem {
                name: name.to_string(),
                quantity,
                unit,
                checked,
                ..Default::default()
            });
            item.id = id.to_string();
            item
        };
        let items = vec![
            item("1", "Milk", Some(1.0), Some(MeasurementUnit::Liter), true),
            item("2", "eggs", Some(6.0), None, false),
            item("3", "milk", Some(0.5), Some(MeasurementUnit::Liter), false),
            item("4", "Milk", Some(2.0), Some(MeasurementUnit::Cup), true),
            item("5", "Salt", None, None, true),
        ];

        let groups = aggregate_shopping_items(&items);
        assert_eq!(groups.len(), 4);

        assert_eq!(groups[0].name, "Milk");
        assert_eq!(groups[0].total_quantity, Some(1.5));
        assert!(!groups[0].checked);
        assert_eq!(groups[0].item_ids, vec!["1".to_string(), "3".to_string()]);

        assert_eq!(groups[2].unit, Some(MeasurementUnit::Cup));
        assert!(groups[2].checked);
        assert_eq!(groups[3].total_quantity, None);
    }

    #[test]
    fn test_enum_string_forms() {
        for category in DishCategory::ALL {
            assert_eq!(category.as_str().parse::<DishCategory>(), Ok(category));
        }
        for unit in MeasurementUnit::ALL {
            assert_eq!(unit.as_str().parse::<MeasurementUnit>(), Ok(unit));
            let json = serde_json::to_string(&unit).unwrap();
            assert_eq!(json, format!("\"{}\"", unit.as_str()));
        }
        for meal in MealType::ALL {
            assert_eq!(meal.as_str().parse::<MealType>(), Ok(meal));
        }
        assert!("brunch".parse::<MealType>().is_err());
        assert!(MealType::Breakfast < MealType::Snack);
    }
}
