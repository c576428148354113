//! First-run sample data.

use log::{info, warn};

use crate::{
    db::Database,
    error::{Result, StoreError},
    models::{DishCategory, Ingredient, MeasurementUnit as Unit, RecipeFilter},
    params::NewRecipe,
};

/// True when there are no active recipes.
pub fn needs_seeding(db: &Database) -> Result<bool> {
    Ok(db.recipes().get_recipe_count(false)? == 0)
}

/// Inserts the sample recipes when the store has no active recipes.
///
/// Each recipe is created on its own; one failure does not stop the rest.
/// Returns the number created.
///
/// # Errors
///
/// `StoreError::SeedFailed` when any sample was rejected.
pub fn seed_database(db: &Database) -> Result<usize> {
    let existing = db.recipes().get_recipe_count(false)?;
    if existing > 0 {
        info!("Database already has {existing} recipes, skipping seed");
        return Ok(0);
    }

    let samples = sample_recipes();
    let total = samples.len();
    let mut created = 0;
    for sample in samples {
        let title = sample.title.clone();
        match db.recipes().create_recipe(sample) {
            Ok(_) => {
                created += 1;
                info!("Seeded recipe: {title} ({created}/{total})");
            }
            Err(e) => warn!("Failed to seed recipe {title}: {e}"),
        }
    }

    let failed = total - created;
    if failed > 0 {
        return Err(StoreError::SeedFailed { failed, total });
    }
    info!("Seeded {created} sample recipes");
    Ok(created)
}

/// Soft-deletes every active recipe; returns how many were deleted.
pub fn clear_database(db: &Database) -> Result<usize> {
    warn!("Clearing all recipes");
    let repo = db.recipes();
    db.transaction(|_| {
        let mut cleared = 0;
        loop {
            let batch = repo.get_all_recipes(&RecipeFilter::default())?;
            if batch.is_empty() {
                break;
            }
            for recipe in &batch {
                repo.delete_recipe(&recipe.id)?;
            }
            cleared += batch.len();
        }
        Ok(cleared)
    })
}

/// Clears, then seeds again.
pub fn reset_database(db: &Database) -> Result<usize> {
    clear_database(db)?;
    seed_database(db)
}

fn recipe(
    title: &str,
    servings: i32,
    category: DishCategory,
    (prep_time, cook_time): (i32, i32),
    ingredients: Vec<Ingredient>,
    steps: &[&str],
    tags: &[&str],
) -> NewRecipe {
    NewRecipe {
        title: title.to_string(),
        servings,
        category,
        ingredients,
        steps: steps.iter().map(ToString::to_string).collect(),
        image_uri: None,
        prep_time: Some(prep_time),
        cook_time: Some(cook_time),
        tags: tags.iter().map(ToString::to_string).collect(),
    }
}

/// The built-in sample set.
pub fn sample_recipes() -> Vec<NewRecipe> {
    vec![
        recipe(
            "Buttermilk Pancakes",
            4,
            DishCategory::Breakfast,
            (10, 15),
            vec![
                Ingredient::new("all-purpose flour", 2.0, Some(Unit::Cup)),
                Ingredient::new("buttermilk", 2.0, Some(Unit::Cup)),
                Ingredient::new("eggs", 2.0, Some(Unit::Unit)),
                Ingredient::new("sugar", 2.0, Some(Unit::Tablespoon)),
                Ingredient::new("baking powder", 2.0, Some(Unit::Teaspoon)),
                Ingredient::new("melted butter", 3.0, Some(Unit::Tablespoon)),
                Ingredient::named("salt"),
            ],
            &[
                "Whisk the flour, sugar, baking powder and salt in a large bowl.",
                "Beat the eggs with the buttermilk and melted butter.",
                "Fold the wet ingredients into the dry until just combined.",
                "Cook quarter-cup portions on a hot greased griddle until bubbles form, then flip.",
            ],
            &["American", "Vegetarian"],
        ),
        recipe(
            "Cinnamon Oatmeal",
            2,
            DishCategory::Breakfast,
            (2, 8),
            vec![
                Ingredient::new("rolled oats", 1.0, Some(Unit::Cup)),
                Ingredient::new("milk", 2.0, Some(Unit::Cup)),
                Ingredient::new("ground cinnamon", 1.0, Some(Unit::Teaspoon)),
                Ingredient::new("maple syrup", 2.0, Some(Unit::Tablespoon)),
            ],
            &[
                "Bring the milk to a simmer.",
                "Stir in the oats and cinnamon and cook for five minutes.",
                "Sweeten with maple syrup and serve.",
            ],
            &["Quick", "Vegetarian"],
        ),
        recipe(
            "Chicken Caesar Salad",
            2,
            DishCategory::Lunch,
            (15, 12),
            vec![
                Ingredient::new("chicken breast", 2.0, Some(Unit::Piece)),
                Ingredient::new("romaine lettuce", 1.0, Some(Unit::Head)),
                Ingredient::new("parmesan", 50.0, Some(Unit::Gram)),
                Ingredient::new("croutons", 1.0, Some(Unit::Cup)),
                Ingredient::new("caesar dressing", 4.0, Some(Unit::Tablespoon)),
            ],
            &[
                "Season and grill the chicken until cooked through, then slice.",
                "Tear the lettuce and toss with the dressing.",
                "Top with chicken, croutons and shaved parmesan.",
            ],
            &["High-Protein"],
        ),
        recipe(
            "Spaghetti Bolognese",
            4,
            DishCategory::Dinner,
            (15, 45),
            vec![
                Ingredient::new("spaghetti", 400.0, Some(Unit::Gram)),
                Ingredient::new("ground beef", 1.0, Some(Unit::Pound)),
                Ingredient::new("crushed tomatoes", 1.0, Some(Unit::Can)),
                Ingredient::new("onion", 1.0, Some(Unit::Unit)),
                Ingredient::new("garlic", 3.0, Some(Unit::Clove)),
                Ingredient::new("olive oil", 2.0, Some(Unit::Tablespoon)),
            ],
            &[
                "Soften the chopped onion and garlic in olive oil.",
                "Brown the beef, then add the tomatoes and simmer for 30 minutes.",
                "Cook the spaghetti until al dente and toss with the sauce.",
            ],
            &["Italian", "Comfort Food"],
        ),
        recipe(
            "Lemon Herb Salmon",
            2,
            DishCategory::Dinner,
            (10, 15),
            vec![
                Ingredient::new("salmon fillets", 2.0, Some(Unit::Piece)),
                Ingredient::new("lemon", 1.0, Some(Unit::Unit)),
                Ingredient::new("fresh dill", 1.0, Some(Unit::Bunch)),
                Ingredient::new("olive oil", 1.0, Some(Unit::Tablespoon)),
            ],
            &[
                "Heat the oven to 200 C.",
                "Place the salmon on a tray, drizzle with oil and lemon juice, scatter dill.",
                "Bake for 12 to 15 minutes until it flakes easily.",
            ],
            &["Healthy", "Gluten-Free"],
        ),
        recipe(
            "Chocolate Cake",
            8,
            DishCategory::Dessert,
            (20, 35),
            vec![
                Ingredient::new("all-purpose flour", 1.75, Some(Unit::Cup)),
                Ingredient::new("cocoa powder", 0.75, Some(Unit::Cup)),
                Ingredient::new("sugar", 2.0, Some(Unit::Cup)),
                Ingredient::new("eggs", 2.0, Some(Unit::Unit)),
                Ingredient::new("milk", 1.0, Some(Unit::Cup)),
                Ingredient::new("vegetable oil", 0.5, Some(Unit::Cup)),
            ],
            &[
                "Heat the oven to 175 C and grease two cake tins.",
                "Mix the dry ingredients, then beat in eggs, milk and oil.",
                "Divide between the tins and bake for 30 to 35 minutes.",
                "Cool completely before frosting.",
            ],
            &["Baking", "Vegetarian"],
        ),
    ]
}
