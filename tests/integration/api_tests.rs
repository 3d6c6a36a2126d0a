//! API integration tests against a running server backed by PostgreSQL

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080";

async fn post(client: &Client, path: &str, body: Value) -> (u16, Value) {
    let response = client
        .post(format!("{}{}", BASE_URL, path))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");
    let status = response.status().as_u16();
    let body = response.json().await.expect("Failed to parse response");
    (status, body)
}

async fn book_copies(client: &Client, book_id: i64) -> i64 {
    let body: Value = client
        .get(format!("{}/books/{}/", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    body["data"]["available_copies"].as_i64().expect("No copies in response")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_reaches_database() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_borrow_and_return() {
    let client = Client::new();

    let (status, author) = post(
        &client,
        "/authors/",
        json!({"name": "Jane", "surname": "Doe", "date_of_birth": "1970-01-01"}),
    )
    .await;
    assert_eq!(status, 201);
    let author_id = author["data"]["id"].as_i64().expect("No author id");

    let (status, book) = post(
        &client,
        "/books/",
        json!({"title": "X", "description": "", "author_id": author_id, "available_copies": 1}),
    )
    .await;
    assert_eq!(status, 201);
    let book_id = book["data"]["id"].as_i64().expect("No book id");

    let (status, borrow) = post(
        &client,
        "/borrows/",
        json!({"book_id": book_id, "reader_name": "Bob"}),
    )
    .await;
    assert_eq!(status, 201);
    let borrow_id = borrow["data"]["id"].as_i64().expect("No borrow id");
    assert_eq!(book_copies(&client, book_id).await, 0);

    let (status, refused) = post(
        &client,
        "/borrows/",
        json!({"book_id": book_id, "reader_name": "Alice"}),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(refused["error"], "book is not available now");

    let response = client
        .patch(format!("{}/borrows/{}/return", BASE_URL, borrow_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    assert_eq!(book_copies(&client, book_id).await, 1);

    let response = client
        .patch(format!("{}/borrows/{}/return", BASE_URL, borrow_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_borrows_of_last_copy() {
    let client = Client::new();

    let (_, author) = post(
        &client,
        "/authors/",
        json!({"name": "Jane", "surname": "Doe", "date_of_birth": "1970-01-01"}),
    )
    .await;
    let author_id = author["data"]["id"].as_i64().expect("No author id");
    let (_, book) = post(
        &client,
        "/books/",
        json!({"title": "Race", "author_id": author_id, "available_copies": 1}),
    )
    .await;
    let book_id = book["data"]["id"].as_i64().expect("No book id");

    let mut handles = Vec::new();
    for i in 0..10 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            post(
                &client,
                "/borrows/",
                json!({"book_id": book_id, "reader_name": format!("reader-{}", i)}),
            )
            .await
            .0
        }));
    }

    let mut created = 0;
    for handle in handles {
        if handle.await.expect("Task panicked") == 201 {
            created += 1;
        }
    }

    assert_eq!(created, 1);
    assert_eq!(book_copies(&client, book_id).await, 0);
}

#[tokio::test]
#[ignore]
async fn test_list_authors() {
    let client = Client::new();

    let response = client
        .get(format!("{}/authors/?limit=5", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["data"]["items"].is_array());
    assert_eq!(body["data"]["pagination"]["limit"], 5);
    assert!(body["data"]["pagination"]["total"].is_i64());
}
