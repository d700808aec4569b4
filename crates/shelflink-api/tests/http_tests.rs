// HTTP surface tests: routes, status mapping, and body shapes.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use shelflink_api::routes;
use shelflink_api::state::AppState;
use shelflink_store::catalog::bookstore_registry;
use shelflink_store::{db, schema};
use tower::util::ServiceExt;

fn test_app() -> Router {
    let conn = db::open_in_memory().unwrap();
    schema::ensure_schema(&conn).unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO books (id, title, price) VALUES (5, 'Beloved', 11.5), (6, 'Sula', 9.0);
        INSERT INTO authors (id, name) VALUES
            (1, 'Toni Morrison'), (2, 'A.N. Other'), (3, 'Octavia Butler');
        INSERT INTO genres (id, name) VALUES (7, 'Fiction'), (8, 'Historical');
        INSERT INTO locations (id, name) VALUES (2, 'Downtown');
        INSERT INTO book_authors (book_id, author_id, created_at) VALUES (5, 1, 0), (5, 2, 0);
        INSERT INTO book_genres (book_id, genre_id, created_at) VALUES (5, 7, 0);
        INSERT INTO book_locations (book_id, location_id, quantity, created_at) VALUES (5, 2, 12, 0);
    "#,
    )
    .unwrap();
    let state = AppState::new(conn, bookstore_registry().unwrap());
    routes::router(state)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn test_health() {
    let app = test_app();
    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"ok");
}

// ---------------------------------------------------------------------------
// Books
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_list_books_embeds_related_labels() {
    let app = test_app();
    let (status, body) = send(app, get("/books")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));
    assert_eq!(body[0]["id"], 5);
    assert_eq!(body[0]["title"], "Beloved");
    assert_eq!(body[0]["related"]["book-author"], "A.N. Other, Toni Morrison");
    assert_eq!(body[0]["related"]["book-genre"], "Fiction");
    assert_eq!(body[0]["related"]["book-location"], "Downtown");
    // Sula has no links: every derived field is null, never ""
    assert_eq!(body[1]["id"], 6);
    assert_eq!(body[1]["related"]["book-author"], Value::Null);
    assert_eq!(body[1]["related"]["book-genre"], Value::Null);
}

#[tokio::test]
async fn test_title_search_filters() {
    let app = test_app();
    let (status, body) = send(app, get("/books?title=elo")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["title"], "Beloved");
}

#[tokio::test]
async fn test_book_detail_flattens_fields_and_related() {
    let app = test_app();
    let (status, body) = send(app, get("/books/5")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 5);
    assert_eq!(body["price"], 11.5);
    assert_eq!(body["related"]["book-genre"], "Fiction");
}

#[tokio::test]
async fn test_missing_book_is_404_with_code() {
    let app = test_app();
    let (status, body) = send(app, get("/books/99")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "ERR_NOT_FOUND");
}

#[tokio::test]
async fn test_book_authors_listing_sorted_by_label() {
    let app = test_app();
    let (status, body) = send(app, get("/books/5/authors")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "id": 2, "label": "A.N. Other" },
            { "id": 1, "label": "Toni Morrison" },
        ])
    );
}

// ---------------------------------------------------------------------------
// Entity CRUD
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_author_create_fetch_update_delete() {
    let app = test_app();

    let (status, body) = send(
        app.clone(),
        json_request("POST", "/authors", json!({"name": "James Baldwin"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().unwrap();

    let (status, body) = send(app.clone(), get(&format!("/authors/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "James Baldwin");

    let (status, body) = send(
        app.clone(),
        json_request(
            "PUT",
            &format!("/authors/{id}"),
            json!({"name": "J. Baldwin"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "J. Baldwin");

    let (status, _) = send(app.clone(), delete(&format!("/authors/{id}"))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(app, get(&format!("/authors/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_name_is_rejected() {
    let app = test_app();
    let (status, body) = send(
        app,
        json_request("POST", "/authors", json!({"name": "   "})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "ERR_INVALID_INPUT");
}

#[tokio::test]
async fn test_order_routes_enforce_references() {
    let app = test_app();
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/orders",
            json!({"customer_id": 42, "placed_on": "2024-03-01"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "ERR_INVALID_INPUT");
}

// ---------------------------------------------------------------------------
// Relations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_relation_kind_listing() {
    let app = test_app();
    let (status, body) = send(app, get("/relations")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["book-author", "book-genre", "book-location"]));
}

#[tokio::test]
async fn test_membership_view() {
    let app = test_app();
    let (status, body) = send(app, get("/relations/book-author/owners/5")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "owner_id": 5, "targets": [1, 2] }));
}

#[tokio::test]
async fn test_reconcile_via_put() {
    let app = test_app();

    let (status, body) = send(
        app.clone(),
        json_request(
            "PUT",
            "/relations/book-author/owners/5",
            json!({"target_ids": [2, 3]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "added": [3], "removed": [1] }));

    let (_, body) = send(app, get("/relations/book-author/owners/5")).await;
    assert_eq!(body["targets"], json!([2, 3]));
}

#[tokio::test]
async fn test_reconcile_unknown_kind_is_500() {
    let app = test_app();
    let (status, body) = send(
        app,
        json_request(
            "PUT",
            "/relations/book-reviewer/owners/5",
            json!({"target_ids": []}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "ERR_UNKNOWN_RELATION_KIND");
}

#[tokio::test]
async fn test_reconcile_missing_target_is_400() {
    let app = test_app();
    let (status, body) = send(
        app,
        json_request(
            "PUT",
            "/relations/book-author/owners/5",
            json!({"target_ids": [99]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "ERR_UNKNOWN_REFERENCE");
}

#[tokio::test]
async fn test_duplicate_link_is_409() {
    let app = test_app();
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/relations/book-author/links",
            json!({"owner_id": 5, "target_id": 1}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ERR_DUPLICATE_LINK");
}

#[tokio::test]
async fn test_link_create_then_delete_pair() {
    let app = test_app();

    let (status, _) = send(
        app.clone(),
        json_request(
            "POST",
            "/relations/book-author/links",
            json!({"owner_id": 6, "target_id": 3}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        app.clone(),
        delete("/relations/book-author/owners/6/targets/3"),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(app, delete("/relations/book-author/owners/6/targets/3")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_patch_link_payload() {
    let app = test_app();

    let (status, body) = send(
        app.clone(),
        json_request(
            "POST",
            "/relations/book-location/links",
            json!({"owner_id": 6, "target_id": 2, "payload": 4}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let link_id = body["link_id"].as_i64().unwrap();

    let (status, body) = send(
        app,
        json_request(
            "PATCH",
            &format!("/relations/book-location/links/{link_id}"),
            json!({"payload": 9}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payload"], 9);
    assert_eq!(body["owner_id"], 6);
}

#[tokio::test]
async fn test_patch_payload_on_payloadless_kind_is_400() {
    let app = test_app();

    let (_, body) = send(
        app.clone(),
        json_request(
            "POST",
            "/relations/book-author/links",
            json!({"owner_id": 6, "target_id": 1}),
        ),
    )
    .await;
    let link_id = body["link_id"].as_i64().unwrap();

    let (status, body) = send(
        app,
        json_request(
            "PATCH",
            &format!("/relations/book-author/links/{link_id}"),
            json!({"payload": 3}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "ERR_INVALID_INPUT");
}

#[tokio::test]
async fn test_delete_link_by_id() {
    let app = test_app();

    let (_, body) = send(
        app.clone(),
        json_request(
            "POST",
            "/relations/book-genre/links",
            json!({"owner_id": 6, "target_id": 8}),
        ),
    )
    .await;
    let link_id = body["link_id"].as_i64().unwrap();

    let (status, _) = send(
        app.clone(),
        delete(&format!("/relations/book-genre/links/{link_id}")),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        app,
        delete(&format!("/relations/book-genre/links/{link_id}")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
