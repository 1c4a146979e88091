//! Route definitions for the coffee shop server

use crate::{
    auth::{self, permissions, PermissionGate},
    handlers,
    openapi::ApiDoc,
    AppState,
};
use axum::{
    middleware,
    response::Json,
    routing::{delete, get, patch, post},
    Router,
};
use utoipa::OpenApi;

/// Drink endpoints; everything except the public menu sits behind a
/// permission gate
pub fn drink_routes(state: &AppState) -> Router<AppState> {
    let gate = |permission: &'static str| {
        middleware::from_fn_with_state(
            PermissionGate::new(state.verifier.clone(), permission),
            auth::require_permission,
        )
    };

    Router::new()
        .route(
            "/drinks",
            get(handlers::list_drinks)
                .merge(post(handlers::create_drink).route_layer(gate(permissions::POST_DRINKS)))
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/drinks-detail",
            get(handlers::list_drink_details)
                .route_layer(gate(permissions::GET_DRINKS_DETAIL))
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/drinks/{id}",
            patch(handlers::update_drink)
                .route_layer(gate(permissions::PATCH_DRINKS))
                .merge(delete(handlers::delete_drink).route_layer(gate(permissions::DELETE_DRINKS)))
                .fallback(handlers::method_not_allowed),
        )
}

/// Health check and API description
pub fn service_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/health",
            get(handlers::health_check).fallback(handlers::method_not_allowed),
        )
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }).fallback(handlers::method_not_allowed),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthError, Claims, TokenVerifier};
    use crate::database::DrinkDatabase;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use coffeeshop_core::{CoffeeShopConfig, DatabaseConfig, DrinkStore, Ingredient, NewDrink};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Treats the token as a comma separated permission list
    struct PermissionListVerifier;

    #[async_trait]
    impl TokenVerifier for PermissionListVerifier {
        async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
            if token == "expired" {
                return Err(AuthError::TokenExpired);
            }
            Ok(Claims {
                sub: Some("tester".to_string()),
                iss: None,
                aud: None,
                exp: None,
                permissions: Some(token.split(',').map(str::to_string).collect()),
                extra: Default::default(),
            })
        }
    }

    async fn test_app() -> (Router, Arc<DrinkDatabase>) {
        let database = Arc::new(
            DrinkDatabase::connect(&DatabaseConfig::in_memory())
                .await
                .unwrap(),
        );
        database
            .insert(NewDrink::new(
                "Water",
                vec![Ingredient::new("water", "blue", 1)],
            ))
            .await
            .unwrap();

        let state = AppState::with_components(
            CoffeeShopConfig::default(),
            database.clone(),
            Arc::new(PermissionListVerifier),
        );
        (crate::create_app(state), database)
    }

    async fn send(
        app: Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app.oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_health_check_route() {
        let (app, _) = test_app().await;
        let (status, body) = send(app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn test_openapi_route() {
        let (app, _) = test_app().await;
        let (status, body) = send(app, Method::GET, "/api-docs/openapi.json", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/drinks"].is_object());
    }

    #[tokio::test]
    async fn test_public_menu_needs_no_token() {
        let (app, _) = test_app().await;
        let (status, body) = send(app, Method::GET, "/drinks", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({"success": true, "drinks": {"1": "Water"}}));
    }

    #[tokio::test]
    async fn test_detail_route_is_gated() {
        let (app, _) = test_app().await;

        let (status, _) = send(app.clone(), Method::GET, "/drinks-detail", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) =
            send(app.clone(), Method::GET, "/drinks-detail", Some("post:drinks"), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "unauthorized");

        let (status, body) = send(
            app,
            Method::GET,
            "/drinks-detail",
            Some("get:drinks-detail"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["drinks"][0]["ingredients"][0]["name"], "water");
    }

    #[tokio::test]
    async fn test_gate_runs_before_body_parsing() {
        let (app, database) = test_app().await;

        let (status, body) = send(
            app,
            Method::POST,
            "/drinks",
            Some("expired"),
            Some(serde_json::json!({"garbage": true})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "token_expired");
        assert_eq!(database.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_each_method_has_its_own_permission() {
        let (app, _) = test_app().await;

        let (status, _) = send(
            app.clone(),
            Method::DELETE,
            "/drinks/1",
            Some("patch:drinks"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = send(
            app,
            Method::PATCH,
            "/drinks/1",
            Some("patch:drinks"),
            Some(serde_json::json!({"title": "Still Water"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["drinks"]["title"], "Still Water");
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_not_found() {
        let (app, _) = test_app().await;
        let (status, body) = send(
            app,
            Method::DELETE,
            "/drinks/latte",
            Some("delete:drinks"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "resource not found");
    }

    #[tokio::test]
    async fn test_unsupported_method_gets_json_405() {
        let (app, database) = test_app().await;

        let (status, body) = send(
            app.clone(),
            Method::PUT,
            "/drinks/1",
            Some("patch:drinks"),
            Some(serde_json::json!({"title": "Tea"})),
        )
        .await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            body,
            serde_json::json!({"success": false, "error": 405, "message": "method not allowed"})
        );

        let (status, body) = send(app, Method::DELETE, "/drinks", None, None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["error"], 405);
        assert_eq!(database.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_route_uses_json_fallback() {
        let (app, _) = test_app().await;
        let (status, body) = send(app, Method::GET, "/coffee", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], 404);
        assert_eq!(body["success"], false);
    }
}
