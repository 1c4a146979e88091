//! Drink menu handlers
//!
//! Gated handlers receive the verified [`Claims`] from the permission
//! middleware.

use super::types::*;
use crate::{auth::Claims, error::ApiError, AppState};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    response::Json,
    Extension,
};
use coffeeshop_core::{DrinkId, DrinkUpdate, NewDrink};
use tracing::{debug, info};

fn drink_id(path: Result<Path<DrinkId>, PathRejection>) -> Result<DrinkId, ApiError> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(rejection) => {
            debug!("Unroutable drink id: {}", rejection.body_text());
            Err(ApiError::NotFound)
        }
    }
}

/// List the public menu
#[utoipa::path(
    get,
    path = "/drinks",
    tag = "Drinks",
    summary = "List drinks",
    description = "Map of drink id to title. No authentication required.",
    responses(
        (status = 200, description = "Drink menu", body = DrinkMenuResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn list_drinks(State(state): State<AppState>) -> Result<Json<DrinkMenuResponse>, ApiError> {
    let drinks = state
        .drinks
        .list()
        .await
        .map_err(|e| ApiError::from_store(e, ApiError::Internal))?;

    let drinks = drinks
        .iter()
        .map(|drink| {
            let short = drink.short();
            (short.id, short.title)
        })
        .collect();

    Ok(Json(DrinkMenuResponse {
        success: true,
        drinks,
    }))
}

/// List every drink with its recipe
#[utoipa::path(
    get,
    path = "/drinks-detail",
    tag = "Drinks",
    summary = "List drink recipes",
    responses(
        (status = 200, description = "Drinks with ingredients", body = DrinkDetailsResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Missing get:drinks-detail", body = ErrorResponse)
    ),
    security(("bearer_auth" = ["get:drinks-detail"]))
)]
pub async fn list_drink_details(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<DrinkDetailsResponse>, ApiError> {
    debug!("Listing drink details for {}", claims.subject());

    let drinks = state
        .drinks
        .list()
        .await
        .map_err(|e| ApiError::from_store(e, ApiError::Internal))?;

    Ok(Json(DrinkDetailsResponse {
        success: true,
        drinks: drinks.iter().map(|drink| drink.long()).collect(),
    }))
}

/// Add a drink to the menu
#[utoipa::path(
    post,
    path = "/drinks",
    tag = "Drinks",
    summary = "Create a drink",
    request_body = CreateDrinkRequest,
    responses(
        (status = 200, description = "Drink created", body = DrinkResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Missing post:drinks", body = ErrorResponse),
        (status = 422, description = "Malformed body, invalid drink or duplicate title", body = ErrorResponse)
    ),
    security(("bearer_auth" = ["post:drinks"]))
)]
pub async fn create_drink(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<CreateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinkResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        debug!("Rejected drink body: {}", rejection.body_text());
        ApiError::Unprocessable
    })?;

    let drink = state
        .drinks
        .insert(NewDrink::new(request.title, request.ingredients))
        .await
        .map_err(|e| ApiError::from_store(e, ApiError::Unprocessable))?;

    info!(
        drink_id = drink.id,
        user = claims.subject(),
        "Created drink {}",
        drink.title
    );

    Ok(Json(DrinkResponse {
        success: true,
        drinks: drink.long(),
    }))
}

/// Change a drink's title or recipe
#[utoipa::path(
    patch,
    path = "/drinks/{id}",
    tag = "Drinks",
    summary = "Update a drink",
    params(("id" = i64, Path, description = "Drink id")),
    request_body = UpdateDrinkRequest,
    responses(
        (status = 200, description = "Drink updated", body = DrinkResponse),
        (status = 400, description = "Malformed body or invalid change", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Missing patch:drinks", body = ErrorResponse),
        (status = 404, description = "No such drink", body = ErrorResponse)
    ),
    security(("bearer_auth" = ["patch:drinks"]))
)]
pub async fn update_drink(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    path: Result<Path<DrinkId>, PathRejection>,
    payload: Result<Json<UpdateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinkResponse>, ApiError> {
    let id = drink_id(path)?;

    // Existence is checked before the body is looked at.
    let mut drink = state
        .drinks
        .find(id)
        .await
        .map_err(|e| ApiError::from_store(e, ApiError::BadRequest))?
        .ok_or(ApiError::NotFound)?;

    let Json(request) = payload.map_err(|rejection| {
        debug!("Rejected drink update: {}", rejection.body_text());
        ApiError::BadRequest
    })?;

    drink
        .apply(DrinkUpdate {
            title: request.title,
            ingredients: request.ingredients,
        })
        .map_err(|e| ApiError::from_store(e, ApiError::BadRequest))?;

    state
        .drinks
        .update(&drink)
        .await
        .map_err(|e| ApiError::from_store(e, ApiError::BadRequest))?;

    info!(drink_id = id, user = claims.subject(), "Updated drink");

    Ok(Json(DrinkResponse {
        success: true,
        drinks: drink.long(),
    }))
}

/// Remove a drink from the menu
#[utoipa::path(
    delete,
    path = "/drinks/{id}",
    tag = "Drinks",
    summary = "Delete a drink",
    params(("id" = i64, Path, description = "Drink id")),
    responses(
        (status = 200, description = "Drink deleted", body = DeleteDrinkResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Missing delete:drinks", body = ErrorResponse),
        (status = 404, description = "No such drink", body = ErrorResponse),
        (status = 422, description = "Storage refused the delete", body = ErrorResponse)
    ),
    security(("bearer_auth" = ["delete:drinks"]))
)]
pub async fn delete_drink(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    path: Result<Path<DrinkId>, PathRejection>,
) -> Result<Json<DeleteDrinkResponse>, ApiError> {
    let id = drink_id(path)?;

    state
        .drinks
        .find(id)
        .await
        .map_err(|e| ApiError::from_store(e, ApiError::Unprocessable))?
        .ok_or(ApiError::NotFound)?;

    state
        .drinks
        .delete(id)
        .await
        .map_err(|e| ApiError::from_store(e, ApiError::Unprocessable))?;

    info!(drink_id = id, user = claims.subject(), "Deleted drink");

    Ok(Json(DeleteDrinkResponse {
        success: true,
        delete: id,
    }))
}
