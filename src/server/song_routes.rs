//! Routes under `/api`.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::enrichment::EnrichmentError;
use crate::service::{
    PageRequest, SongInput, SongServiceError, DEFAULT_SONGS_LIMIT, DEFAULT_TEXT_LIMIT,
};
use crate::song_store::{SongFilter, SongId, SongPatch};

use super::state::{GuardedSongService, ServerState};

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

#[derive(Deserialize, Debug, Default)]
struct ListSongsQuery {
    song: Option<String>,
    group: Option<String>,
    page: Option<String>,
    limit: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
struct SongTextQuery {
    page: Option<String>,
    limit: Option<String>,
}

impl IntoResponse for SongServiceError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            SongServiceError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            SongServiceError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            SongServiceError::Upstream(EnrichmentError::UnexpectedStatus(_)) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            SongServiceError::Upstream(err) => {
                error!("Enrichment failed: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            SongServiceError::Storage(err) => {
                error!("Storage failure: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal storage error".to_string(),
                )
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

fn parse_song_id(raw: &str) -> Result<SongId, SongServiceError> {
    match raw.parse::<SongId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(SongServiceError::Validation(format!(
            "Invalid song id: {}",
            raw
        ))),
    }
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, SongServiceError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| SongServiceError::Validation(rejection.body_text()))
}

async fn create_song(
    State(service): State<GuardedSongService>,
    body: Result<Json<SongInput>, JsonRejection>,
) -> Response {
    let input = match json_body(body) {
        Ok(input) => input,
        Err(err) => return err.into_response(),
    };
    match service.create(input).await {
        Ok(song) => (StatusCode::CREATED, Json(song)).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn list_songs(
    State(service): State<GuardedSongService>,
    Query(query): Query<ListSongsQuery>,
) -> Response {
    let page = PageRequest::parse(
        query.page.as_deref(),
        query.limit.as_deref(),
        DEFAULT_SONGS_LIMIT,
    );
    let filter = SongFilter {
        title: query.song,
        group: query.group,
    };
    match service.list(filter, page) {
        Ok(songs) => Json(songs).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn get_song(State(service): State<GuardedSongService>, Path(id): Path<String>) -> Response {
    match parse_song_id(&id).and_then(|id| service.get(id)) {
        Ok(song) => Json(song).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn get_song_text(
    State(service): State<GuardedSongService>,
    Path(id): Path<String>,
    Query(query): Query<SongTextQuery>,
) -> Response {
    let page = PageRequest::parse(
        query.page.as_deref(),
        query.limit.as_deref(),
        DEFAULT_TEXT_LIMIT,
    );
    match parse_song_id(&id).and_then(|id| service.get_text(id, page)) {
        Ok(text) => Json(text).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn update_song(
    State(service): State<GuardedSongService>,
    Path(id): Path<String>,
    body: Result<Json<SongInput>, JsonRejection>,
) -> Response {
    let (id, input) = match parse_song_id(&id).and_then(|id| Ok((id, json_body(body)?))) {
        Ok(parsed) => parsed,
        Err(err) => return err.into_response(),
    };
    match service.update(id, input).await {
        Ok(song) => Json(song).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn patch_song(
    State(service): State<GuardedSongService>,
    Path(id): Path<String>,
    body: Result<Json<SongPatch>, JsonRejection>,
) -> Response {
    let result = parse_song_id(&id)
        .and_then(|id| Ok((id, json_body(body)?)))
        .and_then(|(id, patch)| service.partial_update(id, patch));
    match result {
        Ok(song) => Json(song).into_response(),
        Err(err) => err.into_response(),
    }
}

async fn delete_song(
    State(service): State<GuardedSongService>,
    Path(id): Path<String>,
) -> Response {
    match parse_song_id(&id).and_then(|id| service.delete(id).map(|_| id)) {
        Ok(id) => Json(MessageResponse {
            message: format!("Song {} deleted", id),
        })
        .into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn make_song_routes(state: ServerState) -> Router {
    Router::new()
        .route("/songs", get(list_songs).post(create_song))
        .route(
            "/song/{id}",
            get(get_song)
                .put(update_song)
                .patch(patch_song)
                .delete(delete_song),
        )
        .route("/song/{id}/text", get(get_song_text))
        .with_state(state)
}
