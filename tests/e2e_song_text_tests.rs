//! End-to-end tests for the paginated lyrics endpoint

mod common;

use common::*;
use reqwest::StatusCode;
use serde_json::{json, Value};

fn known_lines() -> Vec<&'static str> {
    KNOWN_TEXT.split('\n').collect()
}

#[tokio::test]
async fn test_text_default_pagination() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());
    let id = client.create_song_id(KNOWN_SONG, KNOWN_GROUP).await;

    let response = client.get_song_text(id, None, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    let lines = known_lines();
    assert_eq!(
        body,
        json!({ "page": 1, "limit": 2, "text": [lines[0], lines[1]] })
    );
}

#[tokio::test]
async fn test_text_pages() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());
    let id = client.create_song_id(KNOWN_SONG, KNOWN_GROUP).await;
    let lines = known_lines();

    let body: Value = client
        .get_song_text(id, Some("2"), Some("2"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["text"], json!([lines[2], lines[3]]));

    // Last page is short
    let body: Value = client
        .get_song_text(id, Some("3"), Some("2"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["text"], json!([lines[4]]));

    // Whole text in one page
    let body: Value = client
        .get_song_text(id, Some("1"), Some("100"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["text"].as_array().unwrap().len(), lines.len());
}

#[tokio::test]
async fn test_text_page_out_of_range() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());
    let id = client.create_song_id(KNOWN_SONG, KNOWN_GROUP).await;

    let response = client.get_song_text(id, Some("4"), Some("2")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let error: Value = response.json().await.unwrap();
    assert!(error["error"].is_string());
}

#[tokio::test]
async fn test_text_invalid_pagination_falls_back_to_defaults() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());
    let id = client.create_song_id(KNOWN_SONG, KNOWN_GROUP).await;

    let body: Value = client
        .get_song_text(id, Some("-1"), Some("many"))
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 2);
}

#[tokio::test]
async fn test_text_of_missing_song() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.get_song_text(31337, None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client.get_song_text("abc", None, None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_text_follows_patch() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());
    let id = client.create_song_id(KNOWN_SONG, KNOWN_GROUP).await;

    let response = client
        .patch_song(id, json!({ "text": "first\nsecond\nthird" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = client
        .get_song_text(id, Some("2"), Some("2"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["text"], json!(["third"]));

    // Emptied lyrics are reported as missing
    client.patch_song(id, json!({ "text": "" })).await;
    let response = client.get_song_text(id, None, None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
