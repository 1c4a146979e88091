//! Request and response bodies

use chrono::{DateTime, Utc};
use coffeeshop_core::{DrinkId, DrinkLong, Ingredient};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateDrinkRequest {
    #[schema(example = "Latte")]
    pub title: String,
    pub ingredients: Vec<Ingredient>,
}

/// Fields left out keep their stored value
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateDrinkRequest {
    pub title: Option<String>,
    pub ingredients: Option<Vec<Ingredient>>,
}

/// Public menu: drink id to title
#[derive(Debug, Serialize, ToSchema)]
pub struct DrinkMenuResponse {
    pub success: bool,
    #[schema(value_type = Object, example = json!({"1": "water"}))]
    pub drinks: BTreeMap<DrinkId, String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DrinkDetailsResponse {
    pub success: bool,
    pub drinks: Vec<DrinkLong>,
}

/// A single created or updated drink
#[derive(Debug, Serialize, ToSchema)]
pub struct DrinkResponse {
    pub success: bool,
    pub drinks: DrinkLong,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteDrinkResponse {
    pub success: bool,
    #[schema(value_type = i64)]
    pub delete: DrinkId,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

/// Body of every error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    /// HTTP status code
    pub error: u16,
    pub message: String,
    /// Machine readable reason, present on authentication failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}
