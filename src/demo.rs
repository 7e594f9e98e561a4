// Copyright 2023 Remi Bernotavicius

use crate::Result;
use recipe_book::{NewRecipe, RecipeBook};

fn sample_recipes() -> Vec<NewRecipe> {
    vec![
        NewRecipe::new(
            "Spaghetti Carbonara",
            "1. Cook spaghetti until al dente, 2. Cook bacon in a large skillet until crispy. \
             3. In a bowl, whisk together eggs and parmesan cheese. 4. Add garlic to the bacon \
             and cook for 1 minute. 5. Add spaghetti to the skillet and toss with bacon and \
             garlic. 6. Pour the egg mixture over the spaghetti and toss until the eggs are \
             cooked. Serve hot.",
        )
        .ingredient("spaghetti")
        .ingredient("eggs")
        .ingredient("bacon")
        .ingredient("parmesan cheese")
        .ingredient("garlic")
        .ingredient("olive oil")
        .category("Italian"),
        NewRecipe::new(
            "Chicken Parmesan",
            "1. Preheat oven to 400°F. 2. Coat chicken breast in beaten eggs, then coat in \
             breadcrumbs mixed with parmesan cheese. 3. Place chicken in a baking dish and bake \
             for 20-25 minutes. 4. Spoon marinara sauce over chicken and top with mozzarella \
             cheese. 5. Bake for an additional 10-15 minutes. Serve hot.",
        )
        .ingredient("chicken breast")
        .ingredient("breadcrumbs")
        .ingredient("parmesan cheese")
        .ingredient("eggs")
        .ingredient("marinara sauce")
        .ingredient("mozzarella cheese")
        .category("Italian"),
        NewRecipe::new(
            "ugali",
            "1. Boil water for 10mins 2. add flour when water boils. 3. stir untill ready. \
             Serve hot.",
        )
        .ingredient("water")
        .ingredient("maize flour")
        .category("Kenyan"),
    ]
}

/// Adds the sample recipes, searches them, and moves a random recipe's ingredients through the
/// grocery list.
pub fn run(book: &mut RecipeBook) -> Result<()> {
    for recipe in sample_recipes() {
        book.add_recipe(recipe)?;
    }

    let query = "spaghetti";
    println!("Search results for '{query}':");
    for recipe in book.search_recipe(query)? {
        println!("{recipe}");
    }

    let picked = book.random_recipe()?;
    println!(
        "Adding ingredients for '{}' to grocery list...",
        picked.recipe
    );
    book.add_to_grocery_list(picked.ingredient_names())?;

    if let Some(first) = picked.ingredients.first() {
        println!("Removing '{}' from grocery list...", first.ingredient);
        book.remove_from_grocery_list(&first.ingredient.name)?;
    }

    Ok(())
}

#[test]
fn demo_runs_on_empty_book() {
    let mut book = RecipeBook::open_in_memory().unwrap();
    run(&mut book).unwrap();

    assert_eq!(book.recipes().unwrap().len(), 3);
    assert_eq!(book.search_recipe("spaghetti").unwrap().len(), 1);
}
