// Copyright 2023 Remi Bernotavicius

use crate::database::{
    self,
    models::{
        Ingredient, IngredientId, Recipe, RecipeCategory, RecipeCategoryId, RecipeCategoryLink,
        RecipeId, RecipeIngredientLink,
    },
    schema,
};
use crate::error::{Error, Result};
use diesel::prelude::Connection as _;
use diesel::prelude::OptionalExtension as _;
use diesel::BelongingToDsl as _;
use diesel::ExpressionMethods as _;
use diesel::QueryDsl as _;
use diesel::RunQueryDsl as _;
use diesel::SelectableHelper as _;
use rand::seq::SliceRandom as _;
use std::path::Path;

mod draft;
mod grocery;

pub use draft::{Attachment, IngredientDraft, NewRecipe};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeIngredient {
    pub ingredient: Ingredient,
    pub quantity: Option<String>,
}

/// A recipe along with everything linked to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDetails {
    pub recipe: Recipe,
    pub ingredients: Vec<RecipeIngredient>,
    pub categories: Vec<RecipeCategory>,
}

impl RecipeDetails {
    pub fn ingredient_names(&self) -> impl Iterator<Item = &str> {
        self.ingredients.iter().map(|i| &i.ingredient.name[..])
    }
}

fn fold_case(s: &str) -> String {
    s.to_lowercase()
}

/// Case-insensitive substring test. Done here rather than with SQL `LIKE` because SQLite only
/// folds ASCII.
pub(crate) fn contains_ignoring_case(haystack: &str, needle: &str) -> bool {
    fold_case(haystack).contains(&fold_case(needle))
}

pub(crate) fn eq_ignoring_case(a: &str, b: &str) -> bool {
    fold_case(a) == fold_case(b)
}

fn find_recipe(conn: &mut database::Connection, recipe_id: RecipeId) -> Result<Recipe> {
    use schema::recipe::dsl::*;

    recipe
        .select(Recipe::as_select())
        .filter(id.eq(recipe_id))
        .get_result(conn)
        .optional()?
        .ok_or_else(|| Error::not_found("recipe", recipe_id))
}

fn find_ingredient(
    conn: &mut database::Connection,
    ingredient_id: IngredientId,
) -> Result<Ingredient> {
    use schema::ingredient::dsl::*;

    ingredient
        .select(Ingredient::as_select())
        .filter(id.eq(ingredient_id))
        .get_result(conn)
        .optional()?
        .ok_or_else(|| Error::not_found("ingredient", ingredient_id))
}

fn find_category(
    conn: &mut database::Connection,
    category_id: RecipeCategoryId,
) -> Result<RecipeCategory> {
    use schema::recipe_category::dsl::*;

    recipe_category
        .select(RecipeCategory::as_select())
        .filter(id.eq(category_id))
        .get_result(conn)
        .optional()?
        .ok_or_else(|| Error::not_found("recipe category", category_id))
}

fn insert_ingredient(conn: &mut database::Connection, new_name: &str) -> Result<Ingredient> {
    use schema::ingredient::dsl::*;

    let new = diesel::insert_into(ingredient)
        .values(name.eq(new_name))
        .returning(Ingredient::as_returning())
        .get_result(conn)?;
    log::debug!("inserted ingredient {} ({:?})", new.id, new.name);
    Ok(new)
}

fn insert_category(conn: &mut database::Connection, new_name: &str) -> Result<RecipeCategory> {
    use schema::recipe_category::dsl::*;

    let new = diesel::insert_into(recipe_category)
        .values(name.eq(new_name))
        .returning(RecipeCategory::as_returning())
        .get_result(conn)?;
    log::debug!("inserted recipe category {} ({:?})", new.id, new.name);
    Ok(new)
}

fn load_details(conn: &mut database::Connection, recipe: Recipe) -> Result<RecipeDetails> {
    let ingredients = RecipeIngredientLink::belonging_to(&recipe)
        .inner_join(schema::ingredient::table)
        .select((RecipeIngredientLink::as_select(), Ingredient::as_select()))
        .order_by(schema::ingredient::id.asc())
        .load::<(RecipeIngredientLink, Ingredient)>(conn)?
        .into_iter()
        .map(|(link, ingredient)| RecipeIngredient {
            ingredient,
            quantity: link.quantity,
        })
        .collect();
    let categories = RecipeCategoryLink::belonging_to(&recipe)
        .inner_join(schema::recipe_category::table)
        .select(RecipeCategory::as_select())
        .order_by(schema::recipe_category::id.asc())
        .load(conn)?;
    Ok(RecipeDetails {
        recipe,
        ingredients,
        categories,
    })
}

fn link_ingredient(
    conn: &mut database::Connection,
    recipe_id: RecipeId,
    ingredient: Attachment<IngredientId>,
    quantity: Option<String>,
) -> Result<()> {
    let ingredient_id = match ingredient {
        Attachment::New(name) => insert_ingredient(conn, &name)?.id,
        Attachment::Existing(id) => find_ingredient(conn, id)?.id,
    };
    let link = RecipeIngredientLink {
        recipe_id,
        ingredient_id,
        quantity,
    };
    let inserted = diesel::insert_or_ignore_into(schema::recipe_ingredient_association::table)
        .values(&link)
        .execute(conn)?;
    if inserted == 0 {
        log::warn!("ingredient {ingredient_id} already linked to recipe {recipe_id}, skipping");
    }
    Ok(())
}

fn link_category(
    conn: &mut database::Connection,
    recipe_id: RecipeId,
    category: Attachment<RecipeCategoryId>,
) -> Result<()> {
    let category_id = match category {
        Attachment::New(name) => insert_category(conn, &name)?.id,
        Attachment::Existing(id) => find_category(conn, id)?.id,
    };
    let link = RecipeCategoryLink {
        recipe_id,
        category_id,
    };
    let inserted = diesel::insert_or_ignore_into(schema::recipe_category_association::table)
        .values(&link)
        .execute(conn)?;
    if inserted == 0 {
        log::warn!("category {category_id} already linked to recipe {recipe_id}, skipping");
    }
    Ok(())
}

/// The recipe catalog. Owns the connection to the underlying database; every method is its own
/// transaction.
pub struct RecipeBook {
    conn: database::Connection,
}

impl RecipeBook {
    pub fn new(conn: database::Connection) -> Self {
        Self { conn }
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(database::establish_connection(path)?))
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(database::establish_in_memory_connection()?))
    }

    /// Inserts the recipe along with any new ingredients and categories attached to it.
    ///
    /// Attaching an existing ingredient or category that isn't in the store fails with
    /// [`Error::NotFound`] and nothing is written.
    pub fn add_recipe(&mut self, new_recipe: NewRecipe) -> Result<RecipeDetails> {
        let details = self.conn.transaction::<_, Error, _>(|conn| {
            let NewRecipe {
                name,
                instructions,
                ingredients,
                categories,
            } = new_recipe;

            let new = {
                use schema::recipe::dsl;
                diesel::insert_into(dsl::recipe)
                    .values((dsl::name.eq(name), dsl::instructions.eq(instructions)))
                    .returning(Recipe::as_returning())
                    .get_result(conn)?
            };

            for IngredientDraft {
                ingredient,
                quantity,
            } in ingredients
            {
                link_ingredient(conn, new.id, ingredient, quantity)?;
            }
            for category in categories {
                link_category(conn, new.id, category)?;
            }

            load_details(conn, new)
        })?;
        log::info!(
            "added recipe {} ({:?})",
            details.recipe.id,
            details.recipe.name
        );
        Ok(details)
    }

    /// Deletes the recipe and its links. Ingredients and categories are left alone since other
    /// recipes may use them.
    pub fn remove_recipe(&mut self, recipe_id: RecipeId) -> Result<Recipe> {
        let removed = self.conn.transaction::<_, Error, _>(|conn| {
            use schema::recipe::dsl::*;

            let existing = find_recipe(conn, recipe_id)?;
            diesel::delete(recipe.filter(id.eq(recipe_id))).execute(conn)?;
            Ok(existing)
        })?;
        log::info!("removed recipe {} ({:?})", removed.id, removed.name);
        Ok(removed)
    }

    pub fn get_recipe(&mut self, recipe_id: RecipeId) -> Result<RecipeDetails> {
        self.conn.transaction::<_, Error, _>(|conn| {
            let recipe = find_recipe(conn, recipe_id)?;
            load_details(conn, recipe)
        })
    }

    /// All recipes, oldest first.
    pub fn recipes(&mut self) -> Result<Vec<Recipe>> {
        use schema::recipe::dsl::*;

        Ok(recipe
            .select(Recipe::as_select())
            .order_by(id.asc())
            .load(&mut self.conn)?)
    }

    /// Recipes whose name contains `query`, ignoring case. The empty query matches everything.
    pub fn search_recipe(&mut self, query: &str) -> Result<Vec<Recipe>> {
        log::debug!("searching recipes for {query:?}");
        let mut found = self.recipes()?;
        found.retain(|r| contains_ignoring_case(&r.name, query));
        Ok(found)
    }

    pub fn random_recipe(&mut self) -> Result<RecipeDetails> {
        self.random_recipe_with(&mut rand::thread_rng())
    }

    /// Picks a recipe uniformly at random using the given source of randomness.
    pub fn random_recipe_with<R: rand::Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<RecipeDetails> {
        self.conn.transaction::<_, Error, _>(|conn| {
            let ids: Vec<i32> = {
                use schema::recipe::dsl::*;
                recipe.select(id).order_by(id.asc()).load(conn)?
            };
            let picked = ids.choose(rng).ok_or(Error::EmptyCatalog)?;
            let recipe = find_recipe(conn, RecipeId::from(*picked))?;
            load_details(conn, recipe)
        })
    }

    /// Categories sorted by name.
    pub fn categories(&mut self) -> Result<Vec<RecipeCategory>> {
        use schema::recipe_category::dsl::*;

        let mut all: Vec<RecipeCategory> = recipe_category
            .select(RecipeCategory::as_select())
            .load(&mut self.conn)?;
        all.sort_by_key(|c| (fold_case(&c.name), c.id));
        Ok(all)
    }

    pub fn recipes_in_category(&mut self, category_id: RecipeCategoryId) -> Result<Vec<Recipe>> {
        self.conn.transaction::<_, Error, _>(|conn| {
            let category = find_category(conn, category_id)?;
            Ok(RecipeCategoryLink::belonging_to(&category)
                .inner_join(schema::recipe::table)
                .select(Recipe::as_select())
                .order_by(schema::recipe::id.asc())
                .load(conn)?)
        })
    }
}

#[cfg(test)]
pub(crate) fn test_book() -> RecipeBook {
    RecipeBook::open_in_memory().unwrap()
}

#[cfg(test)]
fn carbonara() -> NewRecipe {
    NewRecipe::new(
        "Spaghetti Carbonara",
        "1. Cook spaghetti until al dente, 2. Cook bacon in a large skillet until crispy.",
    )
    .ingredient("spaghetti")
    .ingredient("eggs")
    .ingredient("bacon")
    .category("Italian")
}

#[cfg(test)]
fn chicken_parmesan() -> NewRecipe {
    NewRecipe::new(
        "Chicken Parmesan",
        "1. Preheat oven to 400°F. 2. Coat chicken breast in beaten eggs.",
    )
    .ingredient("chicken breast")
    .ingredient("breadcrumbs")
    .category("Italian")
}

#[test]
fn case_folding() {
    assert!(contains_ignoring_case("Spaghetti Carbonara", "SPAGHETTI"));
    assert!(contains_ignoring_case("Crème Brûlée", "BRÛLÉE"));
    assert!(contains_ignoring_case("ugali", ""));
    assert!(!contains_ignoring_case("ugali", "rice"));
    assert!(eq_ignoring_case("Eggs", "eggs"));
    assert!(!eq_ignoring_case("eggs", "egg"));
}

#[test]
fn add_then_search_exact_name() {
    let mut book = test_book();
    let added = book.add_recipe(carbonara()).unwrap();

    let found = book.search_recipe("Spaghetti Carbonara").unwrap();
    assert_eq!(found, vec![added.recipe]);
}

#[test]
fn search_is_case_insensitive_substring() {
    let mut book = test_book();
    let carbonara = book.add_recipe(carbonara()).unwrap().recipe;
    let parmesan = book.add_recipe(chicken_parmesan()).unwrap().recipe;
    let ugali = book
        .add_recipe(NewRecipe::new("ugali", "stir untill ready"))
        .unwrap()
        .recipe;

    assert_eq!(
        book.search_recipe("SPAGHETTI").unwrap(),
        vec![carbonara.clone()]
    );
    assert_eq!(
        book.search_recipe("ar").unwrap(),
        vec![carbonara.clone(), parmesan.clone()]
    );
    assert_eq!(
        book.search_recipe("").unwrap(),
        vec![carbonara, parmesan, ugali]
    );
    assert!(book.search_recipe("lasagna").unwrap().is_empty());
}

#[test]
fn duplicate_recipe_names_allowed() {
    let mut book = test_book();
    let first = book.add_recipe(NewRecipe::new("ugali", "a")).unwrap();
    let second = book.add_recipe(NewRecipe::new("ugali", "b")).unwrap();

    assert_ne!(first.recipe.id, second.recipe.id);
    assert_eq!(book.search_recipe("ugali").unwrap().len(), 2);
}

#[test]
fn round_trip() {
    use maplit::btreeset;
    use std::collections::BTreeSet;

    let mut book = test_book();
    let added = book
        .add_recipe(carbonara().ingredient_with_quantity("parmesan cheese", "1 cup"))
        .unwrap();

    let fetched = book.get_recipe(added.recipe.id).unwrap();
    assert_eq!(fetched, added);
    assert_eq!(fetched.recipe.name, "Spaghetti Carbonara");
    assert_eq!(
        fetched.ingredient_names().collect::<BTreeSet<_>>(),
        btreeset! {"spaghetti", "eggs", "bacon", "parmesan cheese"}
    );
    let parmesan = fetched
        .ingredients
        .iter()
        .find(|i| i.ingredient.name == "parmesan cheese")
        .unwrap();
    assert_eq!(parmesan.quantity.as_deref(), Some("1 cup"));
    assert!(fetched
        .ingredients
        .iter()
        .filter(|i| i.ingredient.name != "parmesan cheese")
        .all(|i| i.quantity.is_none()));
    assert_eq!(
        fetched
            .categories
            .iter()
            .map(|c| &c.name[..])
            .collect::<Vec<_>>(),
        vec!["Italian"]
    );
}

#[test]
fn new_ingredients_are_always_inserted() {
    let mut book = test_book();
    book.add_recipe(carbonara()).unwrap();
    book.add_recipe(NewRecipe::new("Omelette", "whisk").ingredient("eggs"))
        .unwrap();

    let eggs = book.search_ingredients("eggs").unwrap();
    assert_eq!(eggs.len(), 2);
}

#[test]
fn existing_attachments_are_linked() {
    let mut book = test_book();
    let carbonara = book.add_recipe(carbonara()).unwrap();
    let eggs = carbonara
        .ingredients
        .iter()
        .find(|i| i.ingredient.name == "eggs")
        .unwrap()
        .ingredient
        .clone();
    let italian = carbonara.categories[0].clone();

    let frittata = book
        .add_recipe(
            NewRecipe::new("Frittata", "bake")
                .existing_ingredient_with_quantity(eggs.id, "6")
                .existing_ingredient(eggs.id)
                .existing_category(italian.id),
        )
        .unwrap();

    assert_eq!(
        frittata.ingredients,
        vec![RecipeIngredient {
            ingredient: eggs,
            quantity: Some("6".into()),
        }]
    );
    assert_eq!(frittata.categories, vec![italian.clone()]);
    assert_eq!(book.search_ingredients("eggs").unwrap().len(), 1);
    assert_eq!(book.categories().unwrap(), vec![italian]);
}

#[test]
fn unknown_attachment_rolls_back() {
    let mut book = test_book();
    let result = book.add_recipe(
        NewRecipe::new("Toast", "toast it")
            .ingredient("bread")
            .existing_ingredient(IngredientId::from(42)),
    );

    assert!(matches!(
        result,
        Err(Error::NotFound {
            kind: "ingredient",
            id: 42
        })
    ));
    assert!(book.recipes().unwrap().is_empty());
    assert!(book.grocery_list().unwrap().is_empty());

    let result = book.add_recipe(
        NewRecipe::new("Toast", "toast it").existing_category(RecipeCategoryId::from(9)),
    );
    assert!(matches!(result, Err(Error::NotFound { .. })));
    assert!(book.recipes().unwrap().is_empty());
}

#[test]
fn remove_recipe_keeps_ingredients() {
    let mut book = test_book();
    let added = book.add_recipe(carbonara()).unwrap();

    let removed = book.remove_recipe(added.recipe.id).unwrap();
    assert_eq!(removed, added.recipe);
    assert!(book.recipes().unwrap().is_empty());
    assert_eq!(book.grocery_list().unwrap().len(), 3);
    assert_eq!(book.categories().unwrap().len(), 1);

    let ingredient_links: i64 = schema::recipe_ingredient_association::table
        .count()
        .get_result(&mut book.conn)
        .unwrap();
    let category_links: i64 = schema::recipe_category_association::table
        .count()
        .get_result(&mut book.conn)
        .unwrap();
    assert_eq!((ingredient_links, category_links), (0, 0));
}

#[test]
fn categories_sorted_by_name_then_id() {
    let mut book = test_book();
    book.add_recipe(NewRecipe::new("a", "a").category("soup").category("Baking"))
        .unwrap();
    book.add_recipe(NewRecipe::new("b", "b").category("Soup")).unwrap();

    let names: Vec<_> = book
        .categories()
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Baking", "soup", "Soup"]);
}

#[test]
fn remove_recipe_twice_is_not_found() {
    let mut book = test_book();
    let added = book.add_recipe(carbonara()).unwrap();
    book.remove_recipe(added.recipe.id).unwrap();

    assert!(matches!(
        book.remove_recipe(added.recipe.id),
        Err(Error::NotFound { kind: "recipe", .. })
    ));
    assert!(matches!(
        book.remove_recipe(RecipeId::from(100)),
        Err(Error::NotFound { .. })
    ));
    assert!(matches!(
        book.get_recipe(added.recipe.id),
        Err(Error::NotFound { .. })
    ));
}

#[test]
fn random_recipe_from_empty_book() {
    let mut book = test_book();
    assert!(matches!(book.random_recipe(), Err(Error::EmptyCatalog)));
}

#[test]
fn random_recipe_is_a_member() {
    use rand::SeedableRng as _;

    let mut book = test_book();
    let ids = [
        book.add_recipe(carbonara()).unwrap().recipe.id,
        book.add_recipe(chicken_parmesan()).unwrap().recipe.id,
        book.add_recipe(NewRecipe::new("ugali", "stir")).unwrap().recipe.id,
    ];

    let mut rng = rand::rngs::StdRng::seed_from_u64(7);
    let mut seen = std::collections::HashSet::new();
    for _ in 0..64 {
        let picked = book.random_recipe_with(&mut rng).unwrap();
        assert!(ids.contains(&picked.recipe.id));
        seen.insert(picked.recipe.id);
    }
    assert_eq!(seen.len(), ids.len());

    let picked = book.random_recipe().unwrap();
    assert!(ids.contains(&picked.recipe.id));
}

#[test]
fn recipes_by_category() {
    let mut book = test_book();
    let carbonara = book.add_recipe(carbonara()).unwrap();
    let italian = carbonara.categories[0].id;
    let parmesan = book
        .add_recipe(
            NewRecipe::new("Chicken Parmesan", "bake")
                .existing_category(italian)
                .category("Dinner"),
        )
        .unwrap();
    book.add_recipe(NewRecipe::new("ugali", "stir")).unwrap();

    assert_eq!(
        book.recipes_in_category(italian).unwrap(),
        vec![carbonara.recipe.clone(), parmesan.recipe.clone()]
    );
    assert_eq!(
        book.categories()
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect::<Vec<_>>(),
        vec!["Dinner", "Italian"]
    );

    book.remove_recipe(carbonara.recipe.id).unwrap();
    assert_eq!(
        book.recipes_in_category(italian).unwrap(),
        vec![parmesan.recipe]
    );
    assert!(matches!(
        book.recipes_in_category(RecipeCategoryId::from(77)),
        Err(Error::NotFound { .. })
    ));
}

#[test]
fn reopening_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("recipe_book.sqlite");

    let id = {
        let mut book = RecipeBook::open(&path).unwrap();
        book.add_recipe(carbonara()).unwrap().recipe.id
    };

    let mut book = RecipeBook::open(&path).unwrap();
    let fetched = book.get_recipe(id).unwrap();
    assert_eq!(fetched.recipe.name, "Spaghetti Carbonara");
    assert_eq!(fetched.ingredients.len(), 3);
}

#[test]
fn open_bad_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("recipe_book.sqlite");

    assert!(matches!(
        RecipeBook::open(path),
        Err(Error::StorageUnavailable(_))
    ));
}
