//! API integration tests
//!
//! These run against a live server with seeded data: an `admin` user holding
//! every capability (password `admin`) and at least one book with a reserved
//! copy. Run with: cargo test -- --ignored

use chrono::{Duration, Utc};
use reqwest::{redirect, Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to get an authenticated token
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response
        .json()
        .await
        .expect("Failed to parse login response");
    body["token"]
        .as_str()
        .expect("No token in response")
        .to_string()
}

/// Helper to find a reserved copy to renew
async fn get_reserved_instance_id(client: &Client, token: &str) -> String {
    let response = client
        .get(format!("{}/catalog/instances/borrowed", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to list borrowed copies");

    let body: Value = response.json().await.expect("Failed to parse response");
    body[0]["id"]
        .as_str()
        .expect("No reserved copy in seed data")
        .to_string()
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
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_summary_counts() {
    let client = Client::new();

    let response = client
        .get(format!("{}/catalog/summary", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["num_books"].is_number());
    assert!(body["num_instances"].is_number());
    assert!(body["num_instances_available"].is_number());
    assert!(body["num_authors"].is_number());
    assert_eq!(body["num_visits"], 1);
}

#[tokio::test]
#[ignore]
async fn test_summary_visit_counter_increments() {
    // Cookie store keeps the num_visits cookie between the two calls
    let client = Client::builder().cookie_store(true).build().unwrap();

    let first: Value = client
        .get(format!("{}/catalog/summary", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    let second: Value = client
        .get(format!("{}/catalog/summary", BASE_URL))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    assert_eq!(
        second["num_visits"].as_u64().unwrap(),
        first["num_visits"].as_u64().unwrap() + 1
    );
}

#[tokio::test]
#[ignore]
async fn test_list_books_paginated() {
    let client = Client::new();

    let response = client
        .get(format!("{}/catalog/books?page=1&per_page=10", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_array());
    assert!(body["total"].is_number());
    assert_eq!(body["page"], 1);
    assert_eq!(body["per_page"], 10);
}

#[tokio::test]
#[ignore]
async fn test_book_detail_not_found() {
    let client = Client::new();

    let response = client
        .get(format!("{}/catalog/books/999999", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_borrowed_list_requires_token() {
    let client = Client::new();

    let response = client
        .get(format!("{}/catalog/instances/borrowed", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_renewal_form_proposes_three_weeks() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let instance_id = get_reserved_instance_id(&client, &token).await;

    let response = client
        .get(format!(
            "{}/catalog/instances/{}/renew",
            BASE_URL, instance_id
        ))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let expected = (Utc::now().date_naive() + Duration::weeks(3)).to_string();
    assert_eq!(body["renewal_date"], expected.as_str());
    assert!(body["error"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_renewal_rejects_past_date() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let instance_id = get_reserved_instance_id(&client, &token).await;

    let before: Value = client
        .get(format!("{}/catalog/instances/{}", BASE_URL, instance_id))
        .send()
        .await
        .expect("Failed to fetch instance")
        .json()
        .await
        .expect("Failed to parse instance");

    let past = (Utc::now().date_naive() - Duration::days(1)).to_string();
    let response = client
        .post(format!(
            "{}/catalog/instances/{}/renew",
            BASE_URL, instance_id
        ))
        .header("Authorization", format!("Bearer {}", token))
        .form(&[("renewal_date", past.as_str())])
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Invalid date - renewal in past");
    // Submitted value is retained in the redisplayed form
    assert_eq!(body["renewal_date"], past.as_str());

    // And the copy was not touched
    let after: Value = client
        .get(format!("{}/catalog/instances/{}", BASE_URL, instance_id))
        .send()
        .await
        .expect("Failed to fetch instance")
        .json()
        .await
        .expect("Failed to parse instance");
    assert_eq!(before["due_back"], after["due_back"]);
}

#[tokio::test]
#[ignore]
async fn test_renewal_rejects_date_past_four_weeks() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let instance_id = get_reserved_instance_id(&client, &token).await;

    let too_far = (Utc::now().date_naive() + Duration::weeks(10)).to_string();
    let response = client
        .post(format!(
            "{}/catalog/instances/{}/renew",
            BASE_URL, instance_id
        ))
        .header("Authorization", format!("Bearer {}", token))
        .form(&[("renewal_date", too_far.as_str())])
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Invalid date - renewal more than 4 weeks ahead");
}

#[tokio::test]
#[ignore]
async fn test_renewal_success_redirects_to_borrowed_list() {
    // Keep the 303 visible instead of following it
    let client = Client::builder()
        .redirect(redirect::Policy::none())
        .build()
        .unwrap();
    let token = get_auth_token(&client).await;
    let instance_id = get_reserved_instance_id(&client, &token).await;

    let proposed = (Utc::now().date_naive() + Duration::weeks(2)).to_string();
    let response = client
        .post(format!(
            "{}/catalog/instances/{}/renew",
            BASE_URL, instance_id
        ))
        .header("Authorization", format!("Bearer {}", token))
        .form(&[("renewal_date", proposed.as_str())])
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()["location"],
        "/api/v1/catalog/instances/borrowed"
    );

    // Due date was updated to the proposed date
    let after: Value = client
        .get(format!("{}/catalog/instances/{}", BASE_URL, instance_id))
        .send()
        .await
        .expect("Failed to fetch instance")
        .json()
        .await
        .expect("Failed to parse instance");
    assert_eq!(after["due_back"], proposed.as_str());
}

#[tokio::test]
#[ignore]
async fn test_renewal_requires_token() {
    let client = Client::new();

    let response = client
        .get(format!(
            "{}/catalog/instances/00000000-0000-0000-0000-000000000000/renew",
            BASE_URL
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_create_and_delete_author() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .post(format!("{}/catalog/authors", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "first_name": "Ursula",
            "last_name": "Le Guin"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let author_id = body["id"].as_i64().expect("No author ID");

    let response = client
        .delete(format!("{}/catalog/authors/{}", BASE_URL, author_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 204);
}

#[tokio::test]
#[ignore]
async fn test_create_book_rejects_short_isbn() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .post(format!("{}/catalog/books", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "title": "Test Book",
            "summary": "A test book",
            "isbn": "123"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_unknown_status_rejected() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    // Unrecognized status codes are rejected, never defaulted
    let response = client
        .post(format!("{}/catalog/books/1/instances", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "imprint": "Test imprint",
            "status": "lost"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 422);
}
