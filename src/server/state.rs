use axum::extract::FromRef;
use std::sync::Arc;
use std::time::Instant;

use crate::service::SongService;

use super::ServerConfig;

pub type GuardedSongService = Arc<SongService>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub hash: String,
    pub song_service: GuardedSongService,
}

impl FromRef<ServerState> for GuardedSongService {
    fn from_ref(input: &ServerState) -> Self {
        input.song_service.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
