//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all song library endpoints.
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::{json, Value};
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn home(&self) -> Response {
        self.client
            .get(self.url("/"))
            .send()
            .await
            .expect("Home request failed")
    }

    // ========================================================================
    // Song Endpoints
    // ========================================================================

    pub async fn create_song(&self, song: &str, group: &str) -> Response {
        self.create_song_raw(json!({ "song": song, "group": group }))
            .await
    }

    pub async fn create_song_raw(&self, body: Value) -> Response {
        self.client
            .post(self.url("/api/songs"))
            .json(&body)
            .send()
            .await
            .expect("Create song request failed")
    }

    /// Creates a song and returns its id, panicking on any failure.
    pub async fn create_song_id(&self, song: &str, group: &str) -> i64 {
        let response = self.create_song(song, group).await;
        assert_eq!(
            response.status(),
            reqwest::StatusCode::CREATED,
            "Failed to create song {:?}",
            song
        );
        let body: Value = response.json().await.expect("Invalid song body");
        body["id"].as_i64().expect("Song id missing")
    }

    /// Lists songs; `query` is appended verbatim, e.g. `"page=2&limit=5"`.
    pub async fn list_songs(&self, query: &str) -> Response {
        self.client
            .get(self.url(&format!("/api/songs?{}", query)))
            .send()
            .await
            .expect("List songs request failed")
    }

    pub async fn list_songs_filtered(&self, song: Option<&str>, group: Option<&str>) -> Response {
        let mut params = Vec::new();
        if let Some(song) = song {
            params.push(("song", song));
        }
        if let Some(group) = group {
            params.push(("group", group));
        }
        self.client
            .get(self.url("/api/songs"))
            .query(&params)
            .send()
            .await
            .expect("List songs request failed")
    }

    pub async fn get_song(&self, id: impl std::fmt::Display) -> Response {
        self.client
            .get(self.url(&format!("/api/song/{}", id)))
            .send()
            .await
            .expect("Get song request failed")
    }

    pub async fn get_song_text(
        &self,
        id: impl std::fmt::Display,
        page: Option<&str>,
        limit: Option<&str>,
    ) -> Response {
        let mut params = Vec::new();
        if let Some(page) = page {
            params.push(("page", page));
        }
        if let Some(limit) = limit {
            params.push(("limit", limit));
        }
        self.client
            .get(self.url(&format!("/api/song/{}/text", id)))
            .query(&params)
            .send()
            .await
            .expect("Get song text request failed")
    }

    pub async fn update_song(&self, id: impl std::fmt::Display, song: &str, group: &str) -> Response {
        self.client
            .put(self.url(&format!("/api/song/{}", id)))
            .json(&json!({ "song": song, "group": group }))
            .send()
            .await
            .expect("Update song request failed")
    }

    pub async fn patch_song(&self, id: impl std::fmt::Display, patch: Value) -> Response {
        self.client
            .patch(self.url(&format!("/api/song/{}", id)))
            .json(&patch)
            .send()
            .await
            .expect("Patch song request failed")
    }

    pub async fn delete_song(&self, id: impl std::fmt::Display) -> Response {
        self.client
            .delete(self.url(&format!("/api/song/{}", id)))
            .send()
            .await
            .expect("Delete song request failed")
    }
}
