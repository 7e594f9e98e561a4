// Copyright 2023 Remi Bernotavicius

//! A personal recipe catalog kept in a SQLite file: recipes with their ingredients and categories,
//! a grocery list, and a random pick for when you can't decide what to cook.

pub mod book;
pub mod database;
pub mod error;

pub use book::{
    Attachment, IngredientDraft, NewRecipe, RecipeBook, RecipeDetails, RecipeIngredient,
};
pub use database::models::{
    Ingredient, IngredientId, Recipe, RecipeCategory, RecipeCategoryId, RecipeId,
};
pub use error::{Error, Result, StorageError};
