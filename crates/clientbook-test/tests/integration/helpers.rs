#![allow(clippy::expect_used, dead_code)]
//! Test helpers for integration tests.
//!
//! Provides utilities for:
//! - Creating a test Salvo service over a fresh in-memory store
//! - Making JSON requests
//! - Asserting on responses
//!
//! ## Isolation
//! Every `TestApp` owns its own `MemoryStore`, so tests run in parallel without
//! sharing rows.

use std::sync::Arc;

use salvo::http::{Method, StatusCode};
use salvo::prelude::*;
use salvo::test::{RequestBuilder, ResponseExt, TestClient};
use serde_json::Value;

use clientbook_test::app::api::{CLIENTS_ROUTE_PREFIX, CONTACTS_ROUTE_PREFIX, routes};
use clientbook_test::component::config::*;
use clientbook_test::component::store::{MemoryStore, Store, StoreHandler};

pub use serde_json::json;

/// Test configuration - static struct instead of loading from file.
fn test_config() -> Settings {
    Settings {
        database: DatabaseConfig {
            url: None,
            max_connections: 1,
            run_migrations: false,
        },
        store: StoreConfig {
            backend: StoreBackend::Memory,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5800,
            serve_origin: None,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
        clients: ClientsConfig {
            placeholder_email_domain: "clients.test".to_string(),
        },
    }
}

/// A service plus direct access to the store behind it.
pub struct TestApp {
    pub service: Service,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    /// ## Summary
    /// Builds the router the binary serves (store and config hoops in front of
    /// the API routes) over an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let handle: Arc<dyn Store> = store.clone();

        let router = Router::new()
            .hoop(StoreHandler { store: handle })
            .hoop(ConfigHandler::new(test_config()))
            .push(routes());

        Self {
            service: Service::new(router),
            store,
        }
    }

    /// ## Summary
    /// Creates a client through the API and returns its JSON.
    ///
    /// ## Panics
    /// Panics if the request does not return 201.
    pub async fn create_client(&self, name: &str) -> Value {
        TestRequest::post(CLIENTS_ROUTE_PREFIX)
            .json(json!({ "name": name }))
            .send(self)
            .await
            .assert_status(StatusCode::CREATED)
            .json()
    }

    /// ## Summary
    /// Creates a contact through the API and returns its JSON.
    ///
    /// ## Panics
    /// Panics if the request does not return 201.
    pub async fn create_contact(&self, name: &str, surname: &str, email: &str) -> Value {
        TestRequest::post(CONTACTS_ROUTE_PREFIX)
            .json(json!({ "name": name, "surname": surname, "email": email }))
            .send(self)
            .await
            .assert_status(StatusCode::CREATED)
            .json()
    }
}

/// Reads the `id` of a created entity.
///
/// ## Panics
/// Panics if the value has no integer `id`.
#[must_use]
pub fn id_of(entity: &Value) -> i64 {
    entity["id"].as_i64().expect("entity has an id")
}

#[must_use]
pub fn client_path(id: i64) -> String {
    format!("{CLIENTS_ROUTE_PREFIX}/{id}")
}

#[must_use]
pub fn contact_path(id: i64) -> String {
    format!("{CONTACTS_ROUTE_PREFIX}/{id}")
}

/// `/api/clients/{client}/contacts/{contact}`
#[must_use]
pub fn client_contact_path(client_id: i64, contact_id: i64) -> String {
    format!("{}/contacts/{contact_id}", client_path(client_id))
}

/// `/api/contacts/{contact}/clients/{client}`
#[must_use]
pub fn contact_client_path(contact_id: i64, client_id: i64) -> String {
    format!("{}/clients/{client_id}", contact_path(contact_id))
}

/// Test request builder for constructing HTTP requests.
pub struct TestRequest {
    method: Method,
    path: String,
    body: Option<Value>,
}

impl TestRequest {
    #[must_use]
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            body: None,
        }
    }

    #[must_use]
    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: &str) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn delete(path: &str) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Sets a JSON body.
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Sends the request to the test service and returns the response.
    pub async fn send(self, app: &TestApp) -> TestResponse {
        let url = format!("http://127.0.0.1:5800{}", self.path);

        let mut client = match self.method.as_str() {
            "GET" => TestClient::get(&url),
            "POST" => TestClient::post(&url),
            "PUT" => TestClient::put(&url),
            "DELETE" => TestClient::delete(&url),
            _ => RequestBuilder::new(&url, self.method.clone()),
        };

        if let Some(body) = &self.body {
            client = client.json(body);
        }

        let mut response = client.send(&app.service).await;

        let status = response
            .status_code
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = response.take_string().await.unwrap_or_default();

        TestResponse { status, body }
    }
}

/// Represents an HTTP test response for assertions.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: String,
}

impl TestResponse {
    /// Asserts that the response status matches the expected code.
    pub fn assert_status(self, expected: StatusCode) -> Self {
        assert_eq!(
            self.status, expected,
            "Expected status {expected} but got {}: {}",
            self.status, self.body
        );
        self
    }

    /// Parses the body as JSON.
    ///
    /// ## Panics
    /// Panics if the body is not JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|e| panic!("Expected JSON body ({e}) but got:\n{}", self.body))
    }

    /// Field names listed in an error body's `fields`.
    #[must_use]
    pub fn error_fields(&self) -> Vec<String> {
        self.json()["fields"]
            .as_array()
            .map(|fields| {
                fields
                    .iter()
                    .filter_map(|f| f["field"].as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}
