//! Integration tests for linking and the deletion guard.
//!
//! Tests:
//! - Linking and unlinking from the client and contact sides
//! - Idempotent link/unlink outcomes
//! - Deletion refused while links exist

use salvo::http::StatusCode;

use super::helpers::*;

async fn linked_pair(app: &TestApp) -> (i64, i64) {
    let client = app.create_client("Protea").await;
    let contact = app.create_contact("Ann", "Smith", "ann@example.com").await;
    let (client_id, contact_id) = (id_of(&client), id_of(&contact));

    let outcome = TestRequest::put(&client_contact_path(client_id, contact_id))
        .send(app)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(outcome, json!({ "success": true }));

    (client_id, contact_id)
}

#[test_log::test(tokio::test)]
async fn linking_twice_keeps_one_link() {
    let app = TestApp::new();
    let (client_id, contact_id) = linked_pair(&app).await;

    // Same pair from the contact side.
    let outcome = TestRequest::put(&contact_client_path(contact_id, client_id))
        .send(&app)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(outcome, json!({ "success": false }));

    let detail = TestRequest::get(&client_path(client_id))
        .send(&app)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(detail["contacts"].as_array().map(Vec::len), Some(1));
}

#[test_log::test(tokio::test)]
async fn unlinking_reports_whether_anything_changed() {
    let app = TestApp::new();
    let (client_id, contact_id) = linked_pair(&app).await;

    let outcome = TestRequest::delete(&contact_client_path(contact_id, client_id))
        .send(&app)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(outcome, json!({ "success": true }));

    let outcome = TestRequest::delete(&client_contact_path(client_id, contact_id))
        .send(&app)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(outcome, json!({ "success": false }));
}

#[test_log::test(tokio::test)]
async fn linking_unknown_entities_is_not_found() {
    let app = TestApp::new();
    let client = app.create_client("Protea").await;
    let contact = app.create_contact("Ann", "Smith", "ann@example.com").await;

    TestRequest::put(&client_contact_path(id_of(&client), id_of(&contact) + 50))
        .send(&app)
        .await
        .assert_status(StatusCode::NOT_FOUND);
    TestRequest::put(&contact_client_path(id_of(&contact), id_of(&client) + 50))
        .send(&app)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[test_log::test(tokio::test)]
async fn linked_entities_cannot_be_deleted() {
    let app = TestApp::new();
    let (client_id, contact_id) = linked_pair(&app).await;

    for path in [client_path(client_id), contact_path(contact_id)] {
        let deletable = TestRequest::get(&format!("{path}/deletable"))
            .send(&app)
            .await
            .assert_status(StatusCode::OK)
            .json();
        assert_eq!(deletable, json!({ "deletable": false }));
    }

    let response = TestRequest::delete(&client_path(client_id))
        .send(&app)
        .await
        .assert_status(StatusCode::CONFLICT);
    assert_eq!(
        response.json()["error"],
        format!("Cannot delete client {client_id}: it has linked records")
    );

    TestRequest::delete(&contact_path(contact_id))
        .send(&app)
        .await
        .assert_status(StatusCode::CONFLICT);

    TestRequest::get(&client_path(client_id))
        .send(&app)
        .await
        .assert_status(StatusCode::OK);
}

#[test_log::test(tokio::test)]
async fn unlinked_entities_can_be_deleted() {
    let app = TestApp::new();
    let (client_id, contact_id) = linked_pair(&app).await;

    TestRequest::delete(&client_contact_path(client_id, contact_id))
        .send(&app)
        .await
        .assert_status(StatusCode::OK);

    let deletable = TestRequest::get(&format!("{}/deletable", client_path(client_id)))
        .send(&app)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(deletable, json!({ "deletable": true }));

    TestRequest::delete(&client_path(client_id))
        .send(&app)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    TestRequest::delete(&contact_path(contact_id))
        .send(&app)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    TestRequest::get(&client_path(client_id))
        .send(&app)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
