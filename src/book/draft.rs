// Copyright 2023 Remi Bernotavicius

use crate::database::models::{IngredientId, RecipeCategoryId};

/// Something hung off a recipe draft: either a row that doesn't exist yet and gets inserted along
/// with the recipe, or a row that is already in the store and only gets linked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment<IdT> {
    New(String),
    Existing(IdT),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientDraft {
    pub ingredient: Attachment<IngredientId>,
    pub quantity: Option<String>,
}

/// A recipe that hasn't been added to a [`RecipeBook`](super::RecipeBook) yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub name: String,
    pub instructions: String,
    pub ingredients: Vec<IngredientDraft>,
    pub categories: Vec<Attachment<RecipeCategoryId>>,
}

impl NewRecipe {
    pub fn new(name: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            ingredients: vec![],
            categories: vec![],
        }
    }

    pub fn ingredient(self, name: impl Into<String>) -> Self {
        self.with_ingredient(Attachment::New(name.into()), None)
    }

    pub fn ingredient_with_quantity(
        self,
        name: impl Into<String>,
        quantity: impl Into<String>,
    ) -> Self {
        self.with_ingredient(Attachment::New(name.into()), Some(quantity.into()))
    }

    pub fn existing_ingredient(self, id: IngredientId) -> Self {
        self.with_ingredient(Attachment::Existing(id), None)
    }

    pub fn existing_ingredient_with_quantity(
        self,
        id: IngredientId,
        quantity: impl Into<String>,
    ) -> Self {
        self.with_ingredient(Attachment::Existing(id), Some(quantity.into()))
    }

    pub fn category(mut self, name: impl Into<String>) -> Self {
        self.categories.push(Attachment::New(name.into()));
        self
    }

    pub fn existing_category(mut self, id: RecipeCategoryId) -> Self {
        self.categories.push(Attachment::Existing(id));
        self
    }

    fn with_ingredient(
        mut self,
        ingredient: Attachment<IngredientId>,
        quantity: Option<String>,
    ) -> Self {
        self.ingredients.push(IngredientDraft {
            ingredient,
            quantity,
        });
        self
    }
}

#[test]
fn builder_keeps_attachment_order() {
    let draft = NewRecipe::new("Chicken Parmesan", "bake")
        .ingredient("chicken breast")
        .ingredient_with_quantity("eggs", "2")
        .existing_ingredient(IngredientId::from(4))
        .category("Italian")
        .existing_category(RecipeCategoryId::from(1));

    assert_eq!(
        draft.ingredients,
        vec![
            IngredientDraft {
                ingredient: Attachment::New("chicken breast".into()),
                quantity: None,
            },
            IngredientDraft {
                ingredient: Attachment::New("eggs".into()),
                quantity: Some("2".into()),
            },
            IngredientDraft {
                ingredient: Attachment::Existing(IngredientId::from(4)),
                quantity: None,
            },
        ]
    );
    assert_eq!(
        draft.categories,
        vec![
            Attachment::New("Italian".into()),
            Attachment::Existing(RecipeCategoryId::from(1))
        ]
    );
}
