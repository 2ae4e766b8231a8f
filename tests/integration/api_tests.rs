//! API integration tests against a running server backed by PostgreSQL.
//!
//! Run with: cargo test -- --ignored

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::{redirect::Policy, Client, StatusCode};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:8080";

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Client that reports redirects instead of following them
fn client() -> Client {
    Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client")
}

/// 13-character ISBN unlikely to collide across test runs
fn unique_isbn() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos() as u64;
    let seq = SEQUENCE.fetch_add(1, Ordering::SeqCst);
    format!("{:013}", (nanos / 1000 + seq * 7919) % 10_000_000_000_000)
}

fn today() -> String {
    chrono::Utc::now().date_naive().to_string()
}

async fn get_json(client: &Client, path: &str) -> (StatusCode, Value) {
    let response = client
        .get(format!("{}{}", BASE_URL, path))
        .send()
        .await
        .expect("Failed to send request");
    let status = response.status();
    let body = response.json().await.unwrap_or(Value::Null);
    (status, body)
}

async fn post_form(client: &Client, path: &str, form: &[(&str, &str)]) -> (StatusCode, Value) {
    let response = client
        .post(format!("{}{}", BASE_URL, path))
        .form(form)
        .send()
        .await
        .expect("Failed to send request");
    let status = response.status();
    let body = response.json().await.unwrap_or(Value::Null);
    (status, body)
}

/// Create a book and return it as stored
async fn create_book(client: &Client, title: &str, author: &str, total_copies: i32) -> Value {
    let isbn = unique_isbn();
    let total = total_copies.to_string();
    let (status, _) = post_form(
        client,
        "/livres/nouveau/",
        &[
            ("title", title),
            ("author", author),
            ("isbn", &isbn),
            ("total_copies", &total),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let (_, form) = get_json(client, "/emprunts/nouveau/").await;
    let id = form["books"]
        .as_array()
        .expect("No book choices")
        .iter()
        .rev()
        .find(|b| b["title"] == title)
        .and_then(|b| b["id"].as_i64())
        .expect("Created book not offered on the loan form");

    book(client, id).await
}

async fn book(client: &Client, id: i64) -> Value {
    let (status, body) = get_json(client, &format!("/livres/supprimer/{}/", id)).await;
    assert_eq!(status, StatusCode::OK);
    body
}

/// Every loan of a book, walking all list pages
async fn loans_of(client: &Client, book_id: i64) -> Vec<Value> {
    let mut loans = Vec::new();
    let mut page = 1;
    loop {
        let (_, body) = get_json(client, &format!("/emprunts/?page={}", page)).await;
        loans.extend(
            body["items"]
                .as_array()
                .expect("No loan items")
                .iter()
                .filter(|l| l["book_id"].as_i64() == Some(book_id))
                .cloned(),
        );
        if body["has_next"] != true {
            return loans;
        }
        page += 1;
    }
}

async fn lend(client: &Client, book_id: i64, return_date: &str) -> StatusCode {
    let id = book_id.to_string();
    let (status, _) = post_form(
        client,
        "/emprunts/nouveau/",
        &[("book_id", &id), ("return_date", return_date)],
    )
    .await;
    status
}

fn title(prefix: &str) -> String {
    format!("{} {}", prefix, unique_isbn())
}

#[tokio::test]
#[ignore]
async fn test_health_check() {
    let (status, body) = get_json(&client(), "/health").await;
    assert!(status.is_success());
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_created_book_has_every_copy_available() {
    let client = client();
    let book = create_book(&client, &title("Germinal"), "Zola", 3).await;

    assert_eq!(book["total_copies"], 3);
    assert_eq!(book["available_copies"], 3);
}

#[tokio::test]
#[ignore]
async fn test_duplicate_isbn_is_rejected() {
    let client = client();
    let first = create_book(&client, &title("Nana"), "Zola", 1).await;
    let isbn = first["isbn"].as_str().unwrap().to_string();

    let (status, body) = post_form(
        &client,
        "/livres/nouveau/",
        &[
            ("title", "Another"),
            ("author", "Someone"),
            ("isbn", &isbn),
            ("total_copies", "1"),
        ],
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Duplicate");
    assert!(body["fields"]["isbn"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_loan_lifecycle_restores_stock() {
    let client = client();
    let created = create_book(&client, &title("Au Bonheur des Dames"), "Zola", 3).await;
    let book_id = created["id"].as_i64().unwrap();

    assert_eq!(lend(&client, book_id, "").await, StatusCode::SEE_OTHER);
    assert_eq!(book(&client, book_id).await["available_copies"], 2);

    let loans = loans_of(&client, book_id).await;
    assert_eq!(loans.len(), 1);
    assert!(loans[0]["return_date"].is_null());
    assert_eq!(loans[0]["loan_date"], today());

    let loan_id = loans[0]["id"].as_i64().unwrap();
    let (status, _) = post_form(&client, &format!("/emprunts/supprimer/{}/", loan_id), &[]).await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    assert_eq!(book(&client, book_id).await["available_copies"], 3);
    assert!(loans_of(&client, book_id).await.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_loan_against_empty_stock_is_rejected() {
    let client = client();
    let created = create_book(&client, &title("L'Assommoir"), "Zola", 1).await;
    let book_id = created["id"].as_i64().unwrap();

    assert_eq!(lend(&client, book_id, "").await, StatusCode::SEE_OTHER);
    assert_eq!(lend(&client, book_id, "").await, StatusCode::BAD_REQUEST);

    assert_eq!(book(&client, book_id).await["available_copies"], 0);
    assert_eq!(loans_of(&client, book_id).await.len(), 1);
}

#[tokio::test]
#[ignore]
async fn test_loan_against_unknown_book_is_rejected() {
    let (status, body) = post_form(
        &client(),
        "/emprunts/nouveau/",
        &[("book_id", "2147483647"), ("return_date", "")],
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["book_id"].is_array());
}

/// Known discrepancy: setting a return date does not put the copy back on
/// the shelf, and deleting the returned loan afterwards does not either.
#[tokio::test]
#[ignore]
async fn test_returned_loan_does_not_restock() {
    let client = client();
    let created = create_book(&client, &title("La Bête humaine"), "Zola", 2).await;
    let book_id = created["id"].as_i64().unwrap();
    let id = book_id.to_string();

    assert_eq!(lend(&client, book_id, "").await, StatusCode::SEE_OTHER);
    let loan_id = loans_of(&client, book_id).await[0]["id"].as_i64().unwrap();

    let return_date = today();
    let (status, _) = post_form(
        &client,
        &format!("/emprunts/modifier/{}/", loan_id),
        &[("book_id", &id), ("return_date", &return_date)],
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(book(&client, book_id).await["available_copies"], 1);

    let (status, _) = post_form(&client, &format!("/emprunts/supprimer/{}/", loan_id), &[]).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(book(&client, book_id).await["available_copies"], 1);
}

#[tokio::test]
#[ignore]
async fn test_editing_total_copies_keeps_available_copies() {
    let client = client();
    let created = create_book(&client, &title("Thérèse Raquin"), "Zola", 2).await;
    let book_id = created["id"].as_i64().unwrap();
    let isbn = created["isbn"].as_str().unwrap().to_string();
    let book_title = created["title"].as_str().unwrap().to_string();

    let (status, _) = post_form(
        &client,
        &format!("/livres/modifier/{}/", book_id),
        &[
            ("title", &book_title),
            ("author", "Zola"),
            ("isbn", &isbn),
            ("total_copies", "5"),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let updated = book(&client, book_id).await;
    assert_eq!(updated["total_copies"], 5);
    assert_eq!(updated["available_copies"], 2);

    let (status, body) = post_form(
        &client,
        &format!("/livres/modifier/{}/", book_id),
        &[
            ("title", &book_title),
            ("author", "Zola"),
            ("isbn", &isbn),
            ("total_copies", "1"),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["total_copies"].is_array());
}

#[tokio::test]
#[ignore]
async fn test_deleting_book_deletes_its_loans() {
    let client = client();
    let created = create_book(&client, &title("La Curée"), "Zola", 2).await;
    let book_id = created["id"].as_i64().unwrap();

    assert_eq!(lend(&client, book_id, "").await, StatusCode::SEE_OTHER);
    let loan_id = loans_of(&client, book_id).await[0]["id"].as_i64().unwrap();

    let (status, _) = post_form(&client, &format!("/livres/supprimer/{}/", book_id), &[]).await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let (status, _) = get_json(&client, &format!("/emprunts/supprimer/{}/", loan_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get_json(&client, &format!("/livres/modifier/{}/", book_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_dashboard_totals_are_consistent() {
    let client = client();
    let created = create_book(&client, &title("Pot-Bouille"), "Zola", 1).await;
    let book_id = created["id"].as_i64().unwrap();
    assert_eq!(lend(&client, book_id, "").await, StatusCode::SEE_OTHER);

    let (status, body) = get_json(&client, "/").await;
    assert!(status.is_success());

    let total = body["total_exemplaires"].as_i64().unwrap();
    let available = body["livres_dispos"].as_i64().unwrap();
    let borrowed = body["livres_empruntes"].as_i64().unwrap();
    assert_eq!(borrowed, total - available);
    assert!(body["total_titres"].as_i64().unwrap() >= 1);
    assert!(body["rupture_stock"].as_i64().unwrap() >= 1);
    assert!(body["top_auteur"].is_string());
}

#[tokio::test]
#[ignore]
async fn test_book_list_is_paginated_by_three() {
    let client = client();
    for _ in 0..4 {
        create_book(&client, &title("Page"), "Pager", 1).await;
    }

    let (status, body) = get_json(&client, "/livres/?page=1").await;
    assert!(status.is_success());
    assert_eq!(body["per_page"], 3);
    assert_eq!(body["items"].as_array().unwrap().len(), 3);
    assert_eq!(body["has_next"], true);

    let (_, last) = get_json(&client, "/livres/?page=9999").await;
    assert_eq!(last["page"], last["num_pages"]);
}

#[tokio::test]
#[ignore]
async fn test_unknown_ids_are_not_found() {
    let client = client();
    for path in [
        "/livres/modifier/2147483647/",
        "/livres/supprimer/2147483647/",
        "/emprunts/modifier/2147483647/",
        "/emprunts/supprimer/2147483647/",
    ] {
        let (status, _) = get_json(&client, path).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", path);
    }

    let (status, _) = post_form(&client, "/emprunts/supprimer/2147483647/", &[]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_moving_loan_to_empty_book_is_rejected() {
    let client = client();
    let lent = create_book(&client, &title("Le Ventre de Paris"), "Zola", 2).await;
    let empty = create_book(&client, &title("La Débâcle"), "Zola", 1).await;
    let lent_id = lent["id"].as_i64().unwrap();
    let empty_id = empty["id"].as_i64().unwrap();

    assert_eq!(lend(&client, lent_id, "").await, StatusCode::SEE_OTHER);
    assert_eq!(lend(&client, empty_id, "").await, StatusCode::SEE_OTHER);
    let loan_id = loans_of(&client, lent_id).await[0]["id"].as_i64().unwrap();

    let target = empty_id.to_string();
    let (status, body) = post_form(
        &client,
        &format!("/emprunts/modifier/{}/", loan_id),
        &[("book_id", &target), ("return_date", "")],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ItemNotAvailable");
    assert!(body["fields"]["book_id"].is_array());

    assert_eq!(book(&client, lent_id).await["available_copies"], 1);
    assert_eq!(book(&client, empty_id).await["available_copies"], 0);
    assert_eq!(loans_of(&client, lent_id).await.len(), 1);
}

#[tokio::test]
#[ignore]
async fn test_moving_loan_to_unknown_book_is_rejected() {
    let client = client();
    let created = create_book(&client, &title("Le Rêve"), "Zola", 1).await;
    let book_id = created["id"].as_i64().unwrap();

    assert_eq!(lend(&client, book_id, "").await, StatusCode::SEE_OTHER);
    let loan_id = loans_of(&client, book_id).await[0]["id"].as_i64().unwrap();

    let (status, body) = post_form(
        &client,
        &format!("/emprunts/modifier/{}/", loan_id),
        &[("book_id", "2147483647"), ("return_date", "")],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["book_id"].is_array());
    assert_eq!(loans_of(&client, book_id).await.len(), 1);
}

#[tokio::test]
#[ignore]
async fn test_moving_loan_does_not_touch_stock() {
    let client = client();
    let from = create_book(&client, &title("L'Argent"), "Zola", 2).await;
    let to = create_book(&client, &title("L'Œuvre"), "Zola", 2).await;
    let from_id = from["id"].as_i64().unwrap();
    let to_id = to["id"].as_i64().unwrap();

    assert_eq!(lend(&client, from_id, "").await, StatusCode::SEE_OTHER);
    let loan_id = loans_of(&client, from_id).await[0]["id"].as_i64().unwrap();

    let target = to_id.to_string();
    let (status, _) = post_form(
        &client,
        &format!("/emprunts/modifier/{}/", loan_id),
        &[("book_id", &target), ("return_date", "")],
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    assert_eq!(book(&client, from_id).await["available_copies"], 1);
    assert_eq!(book(&client, to_id).await["available_copies"], 2);
    assert_eq!(loans_of(&client, to_id).await.len(), 1);
}

#[tokio::test]
#[ignore]
async fn test_posting_to_missing_entities_is_not_found() {
    let client = client();
    let created = create_book(&client, &title("Le Docteur Pascal"), "Zola", 1).await;
    let book_id = created["id"].as_i64().unwrap().to_string();
    let isbn = unique_isbn();

    let (status, _) = post_form(
        &client,
        "/emprunts/modifier/2147483647/",
        &[("book_id", &book_id), ("return_date", "")],
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post_form(
        &client,
        "/livres/modifier/2147483647/",
        &[
            ("title", "Nowhere"),
            ("author", "Nobody"),
            ("isbn", &isbn),
            ("total_copies", "1"),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post_form(&client, "/livres/supprimer/2147483647/", &[]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
