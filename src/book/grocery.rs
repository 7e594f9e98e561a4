// Copyright 2023 Remi Bernotavicius

//! The grocery list is just every ingredient in the store.

use super::{
    contains_ignoring_case, eq_ignoring_case, find_ingredient, fold_case, insert_ingredient,
    RecipeBook,
};
use crate::database::{
    self,
    models::{Ingredient, IngredientId},
    schema,
};
use crate::error::{Error, Result};
use diesel::prelude::Connection as _;
use diesel::ExpressionMethods as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;
use std::collections::HashSet;

fn all_ingredients(conn: &mut database::Connection) -> Result<Vec<Ingredient>> {
    use schema::ingredient::dsl::*;

    Ok(ingredient
        .select(Ingredient::as_select())
        .order_by(id.asc())
        .load(conn)?)
}

fn delete_ingredient(conn: &mut database::Connection, delete_id: IngredientId) -> Result<()> {
    use schema::ingredient::dsl::*;

    diesel::delete(ingredient.filter(id.eq(delete_id))).execute(conn)?;
    Ok(())
}

impl RecipeBook {
    /// Every ingredient, sorted by name ignoring case, then by id.
    pub fn grocery_list(&mut self) -> Result<Vec<Ingredient>> {
        let mut all = all_ingredients(&mut self.conn)?;
        all.sort_by_key(|i| (fold_case(&i.name), i.id));
        Ok(all)
    }

    /// Adds each name not already on the list. Names are compared ignoring case, against both the
    /// store and the names earlier in `names`, so at most one ingredient is added per name. Returns
    /// the ingredients that were added.
    pub fn add_to_grocery_list<I, S>(&mut self, names: I) -> Result<Vec<Ingredient>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let added = self.conn.transaction::<_, Error, _>(|conn| {
            let mut known: HashSet<String> = all_ingredients(conn)?
                .into_iter()
                .map(|i| fold_case(&i.name))
                .collect();

            let mut added = vec![];
            for name in names {
                let name = name.as_ref();
                if known.insert(fold_case(name)) {
                    added.push(insert_ingredient(conn, name)?);
                } else {
                    log::debug!("{name:?} is already on the grocery list");
                }
            }
            Ok(added)
        })?;
        log::info!("added {} ingredient(s) to the grocery list", added.len());
        Ok(added)
    }

    /// Removes the first ingredient whose name equals `name` ignoring case. Nothing on the list by
    /// that name is not an error.
    pub fn remove_from_grocery_list(&mut self, name: &str) -> Result<Option<Ingredient>> {
        let removed = self.conn.transaction::<_, Error, _>(|conn| {
            let Some(found) = all_ingredients(conn)?
                .into_iter()
                .find(|i| eq_ignoring_case(&i.name, name))
            else {
                return Ok(None);
            };
            delete_ingredient(conn, found.id)?;
            Ok(Some(found))
        })?;
        match &removed {
            Some(i) => log::info!("removed {:?} from the grocery list", i.name),
            None => log::debug!("{name:?} isn't on the grocery list"),
        }
        Ok(removed)
    }

    /// Removes an ingredient by id. It disappears from every recipe that used it.
    pub fn remove_ingredient(&mut self, ingredient_id: IngredientId) -> Result<Ingredient> {
        let removed = self.conn.transaction::<_, Error, _>(|conn| {
            let existing = find_ingredient(conn, ingredient_id)?;
            delete_ingredient(conn, ingredient_id)?;
            Ok(existing)
        })?;
        log::info!("removed ingredient {} ({:?})", removed.id, removed.name);
        Ok(removed)
    }

    /// Ingredients whose name contains `query` ignoring case, oldest first.
    pub fn search_ingredients(&mut self, query: &str) -> Result<Vec<Ingredient>> {
        let mut found = all_ingredients(&mut self.conn)?;
        found.retain(|i| contains_ignoring_case(&i.name, query));
        Ok(found)
    }
}

#[cfg(test)]
fn names(ingredients: &[Ingredient]) -> Vec<&str> {
    ingredients.iter().map(|i| &i.name[..]).collect()
}

#[test]
fn add_dedupes_within_call() {
    let mut book = super::test_book();
    let added = book.add_to_grocery_list(["eggs", "eggs", "Eggs"]).unwrap();

    assert_eq!(names(&added), vec!["eggs"]);
    assert_eq!(names(&book.grocery_list().unwrap()), vec!["eggs"]);
}

#[test]
fn add_skips_existing_ignoring_case() {
    let mut book = super::test_book();
    book.add_to_grocery_list(vec!["Garlic".to_owned()]).unwrap();
    let added = book
        .add_to_grocery_list(["garlic", "olive oil", "GARLIC"])
        .unwrap();

    assert_eq!(names(&added), vec!["olive oil"]);
    assert_eq!(
        names(&book.grocery_list().unwrap()),
        vec!["Garlic", "olive oil"]
    );
}

#[test]
fn add_nothing() {
    let mut book = super::test_book();
    let added = book.add_to_grocery_list(Vec::<String>::new()).unwrap();
    assert!(added.is_empty());
    assert!(book.grocery_list().unwrap().is_empty());
}

#[test]
fn grocery_list_ties_keep_id_order() {
    let mut book = super::test_book();
    book.add_to_grocery_list(["Eggs", "bacon"]).unwrap();
    book.add_recipe(super::NewRecipe::new("Omelette", "whisk").ingredient("eggs"))
        .unwrap();

    assert_eq!(
        names(&book.grocery_list().unwrap()),
        vec!["bacon", "Eggs", "eggs"]
    );
}

#[test]
fn remove_missing_is_noop() {
    let mut book = super::test_book();
    book.add_to_grocery_list(["eggs", "bacon"]).unwrap();
    let before = book.grocery_list().unwrap();

    assert_eq!(book.remove_from_grocery_list("nonexistent").unwrap(), None);
    assert_eq!(book.grocery_list().unwrap(), before);
}

#[test]
fn remove_matches_exact_name_ignoring_case() {
    let mut book = super::test_book();
    book.add_to_grocery_list(["parmesan cheese", "mozzarella cheese"])
        .unwrap();

    assert_eq!(book.remove_from_grocery_list("cheese").unwrap(), None);
    let removed = book
        .remove_from_grocery_list("Parmesan Cheese")
        .unwrap()
        .unwrap();
    assert_eq!(removed.name, "parmesan cheese");
    assert_eq!(
        names(&book.grocery_list().unwrap()),
        vec!["mozzarella cheese"]
    );
}

#[test]
fn remove_takes_first_of_duplicates() {
    use super::NewRecipe;

    let mut book = super::test_book();
    let first = book
        .add_recipe(NewRecipe::new("Carbonara", "cook").ingredient("eggs"))
        .unwrap();
    book.add_recipe(NewRecipe::new("Omelette", "whisk").ingredient("Eggs"))
        .unwrap();

    let removed = book.remove_from_grocery_list("EGGS").unwrap().unwrap();
    assert_eq!(removed, first.ingredients[0].ingredient);
    assert_eq!(names(&book.grocery_list().unwrap()), vec!["Eggs"]);
}

#[test]
fn removing_ingredient_unlinks_recipes() {
    use super::NewRecipe;

    let mut book = super::test_book();
    let recipe = book
        .add_recipe(
            NewRecipe::new("Carbonara", "cook")
                .ingredient("spaghetti")
                .ingredient("bacon"),
        )
        .unwrap();

    book.remove_from_grocery_list("bacon").unwrap().unwrap();
    let fetched = book.get_recipe(recipe.recipe.id).unwrap();
    assert_eq!(fetched.ingredient_names().collect::<Vec<_>>(), vec!["spaghetti"]);

    let spaghetti = fetched.ingredients[0].ingredient.id;
    book.remove_ingredient(spaghetti).unwrap();
    assert!(book
        .get_recipe(recipe.recipe.id)
        .unwrap()
        .ingredients
        .is_empty());
    assert!(matches!(
        book.remove_ingredient(spaghetti),
        Err(Error::NotFound {
            kind: "ingredient",
            ..
        })
    ));
}

#[test]
fn search_ingredients_by_substring() {
    let mut book = super::test_book();
    book.add_to_grocery_list(["parmesan cheese", "eggs", "Mozzarella Cheese"])
        .unwrap();

    assert_eq!(
        names(&book.search_ingredients("CHEESE").unwrap()),
        vec!["parmesan cheese", "Mozzarella Cheese"]
    );
}
