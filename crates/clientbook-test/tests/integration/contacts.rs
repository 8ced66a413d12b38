//! Integration tests for contact operations.

use salvo::http::StatusCode;

use super::helpers::*;

#[test_log::test(tokio::test)]
async fn create_trims_fields() {
    let app = TestApp::new();

    let contact = TestRequest::post("/api/contacts")
        .json(json!({ "name": " Ann ", "surname": "Smith  ", "email": " ann@example.com" }))
        .send(&app)
        .await
        .assert_status(StatusCode::CREATED)
        .json();

    assert_eq!(contact["name"], "Ann");
    assert_eq!(contact["surname"], "Smith");
    assert_eq!(contact["email"], "ann@example.com");
}

#[test_log::test(tokio::test)]
async fn validation_reports_every_field() {
    let app = TestApp::new();

    let response = TestRequest::post("/api/contacts")
        .json(json!({ "name": "", "surname": "", "email": "nope" }))
        .send(&app)
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(response.error_fields(), vec!["name", "surname", "email"]);
}

#[test_log::test(tokio::test)]
async fn duplicate_email_is_a_field_error() {
    let app = TestApp::new();
    app.create_contact("Ann", "Smith", "ann@example.com").await;

    let response = TestRequest::post("/api/contacts")
        .json(json!({ "name": "Annie", "surname": "Smith", "email": "ANN@example.COM" }))
        .send(&app)
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(response.error_fields(), vec!["email"]);
    let body = response.json();
    assert_eq!(
        body["fields"][0]["message"],
        "A contact with this email address already exists."
    );
}

#[test_log::test(tokio::test)]
async fn update_checks_email_against_other_contacts() {
    let app = TestApp::new();
    let ann = app.create_contact("Ann", "Smith", "ann@example.com").await;
    app.create_contact("Bob", "Jones", "bob@example.com").await;
    let path = contact_path(id_of(&ann));

    let updated = TestRequest::put(&path)
        .json(json!({ "name": "Anne", "surname": "Smith", "email": "ANN@example.com" }))
        .send(&app)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(updated["name"], "Anne");
    assert_eq!(updated["email"], "ANN@example.com");

    let response = TestRequest::put(&path)
        .json(json!({ "name": "Anne", "surname": "Smith", "email": "bob@example.com" }))
        .send(&app)
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.error_fields(), vec!["email"]);
}

#[test_log::test(tokio::test)]
async fn create_links_selected_clients() {
    let app = TestApp::new();
    let protea = app.create_client("Protea").await;
    let acme = app.create_client("Acme").await;
    let bank = app.create_client("First National Bank").await;

    let contact = TestRequest::post("/api/contacts")
        .json(json!({
            "name": "Ann",
            "surname": "Smith",
            "email": "ann@example.com",
            "client_ids": [id_of(&protea), id_of(&bank), id_of(&protea)],
        }))
        .send(&app)
        .await
        .assert_status(StatusCode::CREATED)
        .json();

    let detail = TestRequest::get(&contact_path(id_of(&contact)))
        .send(&app)
        .await
        .assert_status(StatusCode::OK)
        .json();

    let linked: Vec<&str> = detail["clients"]
        .as_array()
        .expect("clients array")
        .iter()
        .filter_map(|c| c["name"].as_str())
        .collect();
    assert_eq!(linked, vec!["First National Bank", "Protea"]);

    let available = detail["available_clients"]
        .as_array()
        .expect("available clients array");
    assert_eq!(available.len(), 1);
    assert_eq!(available[0]["id"], acme["id"]);
}

#[test_log::test(tokio::test)]
async fn unknown_client_creates_nothing() {
    let app = TestApp::new();

    TestRequest::post("/api/contacts")
        .json(json!({
            "name": "Ann",
            "surname": "Smith",
            "email": "ann@example.com",
            "client_ids": [404],
        }))
        .send(&app)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let listed = TestRequest::get("/api/contacts")
        .send(&app)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(listed, json!([]));
}

#[test_log::test(tokio::test)]
async fn list_is_ordered_by_surname_then_name() {
    let app = TestApp::new();
    app.create_contact("Zed", "Adams", "zed@example.com").await;
    app.create_contact("Ann", "Smith", "ann@example.com").await;
    app.create_contact("Bob", "Adams", "bob@example.com").await;

    let listed = TestRequest::get("/api/contacts")
        .send(&app)
        .await
        .assert_status(StatusCode::OK)
        .json();

    let names: Vec<String> = listed
        .as_array()
        .expect("contacts array")
        .iter()
        .map(|s| {
            format!(
                "{} {}",
                s["contact"]["name"].as_str().unwrap_or_default(),
                s["contact"]["surname"].as_str().unwrap_or_default()
            )
        })
        .collect();
    assert_eq!(names, vec!["Bob Adams", "Zed Adams", "Ann Smith"]);
    assert!(listed.as_array().expect("array").iter().all(|s| s["client_count"] == 0));
}
