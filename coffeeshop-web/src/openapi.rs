//! OpenAPI documentation

use crate::handlers::{self, types::*};
use coffeeshop_core::{DrinkLong, Ingredient};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Coffee Shop API",
        version = "0.1.0",
        description = "Drink menu for the coffee shop. Baristas and managers authenticate with bearer tokens carrying permission strings.",
    ),
    paths(
        handlers::health_check,
        handlers::list_drinks,
        handlers::list_drink_details,
        handlers::create_drink,
        handlers::update_drink,
        handlers::delete_drink,
    ),
    components(
        schemas(
            Ingredient,
            DrinkLong,
            CreateDrinkRequest,
            UpdateDrinkRequest,
            DrinkMenuResponse,
            DrinkDetailsResponse,
            DrinkResponse,
            DeleteDrinkResponse,
            HealthResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Drinks", description = "Drink menu management"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Registers the bearer token scheme referenced by gated operations
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
