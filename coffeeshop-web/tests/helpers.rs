//! Integration test helpers
//!
//! Each test gets its own server on a random port, backed by an in-memory
//! database and a local key set endpoint serving the fixture signing key.

#![allow(dead_code)]

use axum::{routing::get, Json, Router};
use coffeeshop_core::{AuthConfig, CoffeeShopConfig, DatabaseConfig};
use coffeeshop_web::CoffeeShopServer;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use std::sync::LazyLock;
use tokio::net::TcpListener;

pub const AUDIENCE: &str = "drinks";
pub const KEY_ID: &str = "coffee-test-key";

const SIGNING_KEY: &[u8] = include_bytes!("fixtures/signing_key.pem");
const FOREIGN_KEY: &[u8] = include_bytes!("fixtures/foreign_key.pem");

/// Public half of `fixtures/signing_key.pem`
const SIGNING_KEY_MODULUS: &str = "rnFBo81tntuMpgcBKeyLngodzyMRfKFqtdjNe5RnrVNVCBYT1UqkloIXi5lCq4JVwKiZq4tOVLTMUOjuVb3uCVLCkit_5EDL0phCYnCW3XT47y3bYGwuz7RIGt8lPuFCGKpRwti1VuZj0VZdxlcv3fAwuyfjpy7hoJdnV3U7PlaLqxTDlR3PPtSNSyUsp_prRMpz7_FIl9vDnqsqQzMqQRWEl5w6jIRCCj22dUKmaO0_lGFDqYdKy2urK-YFdhB1okstuzJm-ajEJzAPEIWgYtlflJug_GZ_xAMabyYhnCwzmD55I8XqMth8zE7EjZAmbqhzakiiSVJejRFRPSQ2yQ";

pub const BARISTA: &[&str] = &["get:drinks-detail"];
pub const MANAGER: &[&str] = &[
    "get:drinks-detail",
    "post:drinks",
    "patch:drinks",
    "delete:drinks",
];

// Only one global subscriber per test binary
static TRACING: LazyLock<()> = LazyLock::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(std::io::sink)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
});

pub struct TestApp {
    pub address: String,
    pub issuer: String,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn get_drinks(&self) -> reqwest::Response {
        self.api_client
            .get(format!("{}/drinks", &self.address))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_drinks_detail(&self, token: Option<&str>) -> reqwest::Response {
        self.authorized(self.api_client.get(format!("{}/drinks-detail", &self.address)), token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_drink(&self, token: Option<&str>, body: &Value) -> reqwest::Response {
        self.authorized(self.api_client.post(format!("{}/drinks", &self.address)), token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn patch_drink(&self, token: Option<&str>, id: &str, body: &Value) -> reqwest::Response {
        self.authorized(
            self.api_client.patch(format!("{}/drinks/{}", &self.address, id)),
            token,
        )
        .json(body)
        .send()
        .await
        .expect("Failed to execute request.")
    }

    pub async fn delete_drink(&self, token: Option<&str>, id: &str) -> reqwest::Response {
        self.authorized(
            self.api_client.delete(format!("{}/drinks/{}", &self.address, id)),
            token,
        )
        .send()
        .await
        .expect("Failed to execute request.")
    }

    fn authorized(&self, request: reqwest::RequestBuilder, token: Option<&str>) -> reqwest::RequestBuilder {
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Valid token carrying `permissions`
    pub fn token(&self, permissions: &[&str]) -> String {
        self.sign(&self.claims(permissions), SIGNING_KEY, Some(KEY_ID))
    }

    /// Standard claim set, ready to be tweaked
    pub fn claims(&self, permissions: &[&str]) -> Value {
        json!({
            "sub": "auth0|tester",
            "iss": self.issuer,
            "aud": AUDIENCE,
            "iat": chrono::Utc::now().timestamp(),
            "exp": chrono::Utc::now().timestamp() + 3600,
            "permissions": permissions,
        })
    }

    pub fn sign(&self, claims: &Value, pem: &[u8], kid: Option<&str>) -> String {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = kid.map(str::to_string);
        let key = EncodingKey::from_rsa_pem(pem).expect("fixture key");
        encode(&header, claims, &key).expect("token")
    }

    /// Same claims and kid, signed by a key the issuer never published
    pub fn forged_token(&self, permissions: &[&str]) -> String {
        self.sign(&self.claims(permissions), FOREIGN_KEY, Some(KEY_ID))
    }
}

/// Serve the fixture key set, returning its URL
async fn spawn_jwks_server() -> String {
    let jwks = json!({
        "keys": [{
            "kty": "RSA",
            "use": "sig",
            "alg": "RS256",
            "kid": KEY_ID,
            "n": SIGNING_KEY_MODULUS,
            "e": "AQAB",
        }]
    });

    let app = Router::new().route(
        "/.well-known/jwks.json",
        get(move || {
            let jwks = jwks.clone();
            async move { Json(jwks) }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind key set listener");
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    format!("http://{}/.well-known/jwks.json", address)
}

pub async fn spawn_app() -> TestApp {
    let jwks_url = spawn_jwks_server().await;
    spawn_app_with_jwks_url(jwks_url, false).await
}

/// Server whose database starts with the seeded sample drink
pub async fn spawn_seeded_app() -> TestApp {
    let jwks_url = spawn_jwks_server().await;
    spawn_app_with_jwks_url(jwks_url, true).await
}

pub async fn spawn_app_with_jwks_url(jwks_url: String, seeded: bool) -> TestApp {
    LazyLock::force(&TRACING);

    let issuer = "https://coffee.test/".to_string();
    let mut config = CoffeeShopConfig::default();
    config.database = DatabaseConfig::in_memory();
    config.database.reset_on_startup = seeded;
    config.auth = AuthConfig {
        issuer: issuer.clone(),
        audience: AUDIENCE.to_string(),
        jwks_url,
    };

    let server = CoffeeShopServer::new(config)
        .await
        .expect("Failed to build server");

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(server.serve(listener, std::future::pending()));

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        issuer,
        api_client: reqwest::Client::new(),
    }
}

pub fn latte() -> Value {
    json!({
        "title": "Latte",
        "ingredients": [
            {"name": "espresso", "color": "brown", "parts": 1},
            {"name": "milk", "color": "white", "parts": 3}
        ]
    })
}
