// Copyright 2023 Remi Bernotavicius

use derive_more::{Display, From, Into};
use diesel::associations::{Associations, Identifiable};
use diesel::deserialize::Queryable;
use diesel::expression::Selectable;
use diesel::prelude::Insertable;
use diesel_derive_newtype::DieselNewType;

#[derive(
    DieselNewType, Debug, Display, From, Into, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone,
)]
pub struct IngredientId(i32);

#[derive(Queryable, Selectable, Identifiable, Debug, Display, PartialEq, Eq, Clone)]
#[diesel(table_name = crate::database::schema::ingredient)]
#[display("{name}")]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
}

#[derive(
    DieselNewType, Debug, Display, From, Into, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone,
)]
pub struct RecipeCategoryId(i32);

#[derive(Queryable, Selectable, Identifiable, Debug, Display, PartialEq, Eq, Clone)]
#[diesel(table_name = crate::database::schema::recipe_category)]
#[display("{name}")]
pub struct RecipeCategory {
    pub id: RecipeCategoryId,
    pub name: String,
}

#[derive(
    DieselNewType, Debug, Display, From, Into, Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone,
)]
pub struct RecipeId(i32);

#[derive(Queryable, Selectable, Identifiable, Debug, Display, PartialEq, Eq, Clone)]
#[diesel(table_name = crate::database::schema::recipe)]
#[display("{name}")]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    pub instructions: String,
}

/// A row of `recipe_ingredient_association`. `quantity` is free text ("2 cups", "a pinch") and
/// is never filled in unless the recipe was given one.
#[derive(Associations, Queryable, Selectable, Identifiable, Insertable, Debug, Clone)]
#[diesel(belongs_to(Recipe))]
#[diesel(belongs_to(Ingredient))]
#[diesel(primary_key(recipe_id, ingredient_id))]
#[diesel(table_name = crate::database::schema::recipe_ingredient_association)]
pub struct RecipeIngredientLink {
    pub recipe_id: RecipeId,
    pub ingredient_id: IngredientId,
    pub quantity: Option<String>,
}

#[derive(Associations, Queryable, Selectable, Identifiable, Insertable, Debug, Clone)]
#[diesel(belongs_to(Recipe))]
#[diesel(belongs_to(RecipeCategory, foreign_key = category_id))]
#[diesel(primary_key(recipe_id, category_id))]
#[diesel(table_name = crate::database::schema::recipe_category_association)]
pub struct RecipeCategoryLink {
    pub recipe_id: RecipeId,
    pub category_id: RecipeCategoryId,
}

#[test]
fn display_uses_names() {
    let recipe = Recipe {
        id: RecipeId::from(1),
        name: "ugali".into(),
        instructions: "stir".into(),
    };
    assert_eq!(recipe.to_string(), "ugali");
    assert_eq!(RecipeId::from(12).to_string(), "12");
    assert_eq!(i32::from(IngredientId::from(3)), 3);
}
