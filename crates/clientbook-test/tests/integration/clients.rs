//! Integration tests for client operations.
//!
//! Tests:
//! - Client code allocation through the API
//! - Placeholder and explicit emails
//! - Renaming, listing and detail views

use std::collections::HashSet;

use salvo::http::StatusCode;

use clientbook_test::component::model::client::NewClient;
use clientbook_test::component::store::ClientStore;

use super::helpers::*;

#[test_log::test(tokio::test)]
async fn codes_follow_prefix_sequence() {
    let app = TestApp::new();

    let first = app.create_client("First National Bank").await;
    let second = app.create_client("First National Bank").await;
    let third = app.create_client("Fine New Brews").await;

    assert_eq!(first["client_code"], "FNB001");
    assert_eq!(second["client_code"], "FNB002");
    assert_eq!(third["client_code"], "FNB003");
}

#[test_log::test(tokio::test)]
async fn short_names_are_padded() {
    let app = TestApp::new();

    let it = app.create_client("IT").await;
    let protea = app.create_client("Protea").await;

    assert_eq!(it["client_code"], "ITA001");
    assert_eq!(protea["client_code"], "PRO001");
}

#[test_log::test(tokio::test)]
async fn placeholder_email_uses_configured_domain() {
    let app = TestApp::new();

    let client = app.create_client("Protea").await;
    assert_eq!(client["email"], "pro001@clients.test");

    let client = TestRequest::post("/api/clients")
        .json(json!({ "name": "Protea", "email": "accounts@protea.co.za" }))
        .send(&app)
        .await
        .assert_status(StatusCode::CREATED)
        .json();
    assert_eq!(client["email"], "accounts@protea.co.za");
    assert_eq!(client["client_code"], "PRO002");
}

#[test_log::test(tokio::test)]
async fn invalid_input_reports_fields() {
    let app = TestApp::new();

    let response = TestRequest::post("/api/clients")
        .json(json!({ "name": "   " }))
        .send(&app)
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.error_fields(), vec!["name"]);

    let response = TestRequest::post("/api/clients")
        .json(json!({ "name": "Protea", "email": "not-an-email" }))
        .send(&app)
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.error_fields(), vec!["email"]);

    let listed = TestRequest::get("/api/clients")
        .send(&app)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(listed, json!([]));
}

#[test_log::test(tokio::test)]
async fn exhausted_prefix_is_unavailable() {
    let app = TestApp::new();
    app.store
        .insert_client(NewClient {
            name: "Protea",
            email: "pro999@clients.test",
            client_code: "PRO999",
        })
        .await
        .expect("seed client");

    let response = TestRequest::post("/api/clients")
        .json(json!({ "name": "Protea" }))
        .send(&app)
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert!(
        response.json()["error"]
            .as_str()
            .is_some_and(|msg| msg.contains("PRO")),
        "{}",
        response.body
    );
}

#[test_log::test(tokio::test)]
async fn update_renames_only() {
    let app = TestApp::new();
    let created = app.create_client("Protea").await;
    let id = id_of(&created);

    let updated = TestRequest::put(&client_path(id))
        .json(json!({ "name": "Protea Holdings", "email": "ignored@example.com" }))
        .send(&app)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(updated["name"], "Protea Holdings");
    assert_eq!(updated["client_code"], created["client_code"]);
    assert_eq!(updated["email"], created["email"]);

    TestRequest::put(&client_path(id + 100))
        .json(json!({ "name": "Ghost" }))
        .send(&app)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn list_is_ordered_by_name_with_contact_counts() {
    let app = TestApp::new();
    let zeta = app.create_client("Zeta").await;
    app.create_client("Alpha").await;
    let ann = app.create_contact("Ann", "Smith", "ann@example.com").await;

    TestRequest::put(&client_contact_path(id_of(&zeta), id_of(&ann)))
        .send(&app)
        .await
        .assert_status(StatusCode::OK);

    let listed = TestRequest::get("/api/clients")
        .send(&app)
        .await
        .assert_status(StatusCode::OK)
        .json();

    assert_eq!(listed[0]["client"]["name"], "Alpha");
    assert_eq!(listed[0]["contact_count"], 0);
    assert_eq!(listed[1]["client"]["name"], "Zeta");
    assert_eq!(listed[1]["contact_count"], 1);
}

#[test_log::test(tokio::test)]
async fn detail_lists_linked_contacts_by_surname() {
    let app = TestApp::new();
    let client = app.create_client("Protea").await;
    let client_id = id_of(&client);

    for (name, surname, email) in [
        ("Zed", "Adams", "zed@example.com"),
        ("Ann", "Smith", "ann@example.com"),
        ("Bob", "Adams", "bob@example.com"),
    ] {
        let contact = app.create_contact(name, surname, email).await;
        TestRequest::put(&client_contact_path(client_id, id_of(&contact)))
            .send(&app)
            .await
            .assert_status(StatusCode::OK);
    }

    let detail = TestRequest::get(&client_path(client_id))
        .send(&app)
        .await
        .assert_status(StatusCode::OK)
        .json();

    let names: Vec<&str> = detail["contacts"]
        .as_array()
        .expect("contacts array")
        .iter()
        .filter_map(|c| c["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Bob", "Zed", "Ann"]);
}

#[test_log::test(tokio::test)]
async fn concurrent_creates_get_distinct_codes() {
    const CALLERS: usize = 20;

    let app = TestApp::new();

    let requests = (0..CALLERS).map(|_| {
        TestRequest::post("/api/clients")
            .json(json!({ "name": "First National Bank" }))
            .send(&app)
    });
    let responses = futures::future::join_all(requests).await;

    let codes: HashSet<String> = responses
        .into_iter()
        .map(|response| {
            response.assert_status(StatusCode::CREATED).json()["client_code"]
                .as_str()
                .expect("client code")
                .to_string()
        })
        .collect();

    assert_eq!(codes.len(), CALLERS);
    assert!(codes.contains("FNB001"));
    assert!(codes.contains("FNB020"));
}
