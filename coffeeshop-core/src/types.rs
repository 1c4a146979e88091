//! Drink domain types

use crate::error::CoffeeShopResult;
use crate::validation_error;
use serde::{Deserialize, Serialize};

/// Storage-assigned drink identity
pub type DrinkId = i64;

/// One entry of a drink recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Ingredient {
    #[cfg_attr(feature = "openapi", schema(example = "water"))]
    pub name: String,
    #[cfg_attr(feature = "openapi", schema(example = "blue"))]
    pub color: String,
    /// Relative quantity of this ingredient in the drink
    #[cfg_attr(feature = "openapi", schema(example = 1))]
    pub parts: u32,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, color: impl Into<String>, parts: u32) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            parts,
        }
    }
}

/// A persisted drink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drink {
    pub id: DrinkId,
    pub title: String,
    pub ingredients: Vec<Ingredient>,
}

/// Short projection: identity and title only
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DrinkShort {
    #[cfg_attr(feature = "openapi", schema(value_type = i64))]
    pub id: DrinkId,
    pub title: String,
}

/// Long projection: identity, title and the full recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DrinkLong {
    #[cfg_attr(feature = "openapi", schema(value_type = i64, example = 1))]
    pub id: DrinkId,
    #[cfg_attr(feature = "openapi", schema(example = "Water"))]
    pub title: String,
    pub ingredients: Vec<Ingredient>,
}

impl Drink {
    pub fn short(&self) -> DrinkShort {
        DrinkShort {
            id: self.id,
            title: self.title.clone(),
        }
    }

    pub fn long(&self) -> DrinkLong {
        DrinkLong {
            id: self.id,
            title: self.title.clone(),
            ingredients: self.ingredients.clone(),
        }
    }

    /// Apply a partial update; fields left as `None` keep their value
    pub fn apply(&mut self, update: DrinkUpdate) -> CoffeeShopResult<()> {
        if let Some(title) = &update.title {
            validate_title(title)?;
        }
        if let Some(ingredients) = &update.ingredients {
            validate_ingredients(ingredients)?;
        }

        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(ingredients) = update.ingredients {
            self.ingredients = ingredients;
        }
        Ok(())
    }
}

/// A drink that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDrink {
    pub title: String,
    pub ingredients: Vec<Ingredient>,
}

impl NewDrink {
    pub fn new(title: impl Into<String>, ingredients: Vec<Ingredient>) -> Self {
        Self {
            title: title.into(),
            ingredients,
        }
    }

    pub fn validate(&self) -> CoffeeShopResult<()> {
        validate_title(&self.title)?;
        validate_ingredients(&self.ingredients)
    }
}

/// Partial update of a stored drink
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkUpdate {
    pub title: Option<String>,
    pub ingredients: Option<Vec<Ingredient>>,
}

fn validate_title(title: &str) -> CoffeeShopResult<()> {
    if title.trim().is_empty() {
        return Err(validation_error!("title must not be empty", "title", "drink"));
    }
    Ok(())
}

fn validate_ingredients(ingredients: &[Ingredient]) -> CoffeeShopResult<()> {
    if ingredients.is_empty() {
        return Err(validation_error!(
            "a drink needs at least one ingredient",
            "ingredients",
            "drink"
        ));
    }
    if ingredients.iter().any(|i| i.name.trim().is_empty()) {
        return Err(validation_error!(
            "ingredient name must not be empty",
            "ingredients",
            "drink"
        ));
    }
    Ok(())
}
