//! Song operations: validation, enrichment and persistence orchestration.

mod error;
mod pagination;

pub use error::{ServiceResult, SongServiceError};
pub use pagination::{paginate_lines, PageRequest, DEFAULT_SONGS_LIMIT, DEFAULT_TEXT_LIMIT};

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::enrichment::{SongEnricher, SongEnrichment};
use crate::song_store::{
    NewSong, NewSongDetails, Song, SongFilter, SongId, SongPatch, SongStore,
};

/// Body of create and full update requests.
#[derive(Debug, Clone, Deserialize)]
pub struct SongInput {
    pub song: String,
    pub group: String,
}

#[derive(Debug, Serialize)]
pub struct SongPage {
    pub page: usize,
    pub limit: usize,
    pub songs: Vec<Song>,
}

#[derive(Debug, Serialize)]
pub struct TextPage {
    pub page: usize,
    pub limit: usize,
    pub text: Vec<String>,
}

impl From<SongEnrichment> for NewSongDetails {
    fn from(enrichment: SongEnrichment) -> Self {
        NewSongDetails {
            release_date: enrichment.release_date,
            text: enrichment.text,
            link: enrichment.link,
        }
    }
}

fn song_not_found(id: SongId) -> SongServiceError {
    SongServiceError::NotFound(format!("Song {} not found", id))
}

fn validate_input(input: &SongInput) -> ServiceResult<NewSong> {
    let title = input.song.trim();
    if title.is_empty() {
        return Err(SongServiceError::Validation(
            "Song title must not be empty".to_string(),
        ));
    }
    let group = input.group.trim();
    if group.is_empty() {
        return Err(SongServiceError::Validation(
            "Group name must not be empty".to_string(),
        ));
    }
    Ok(NewSong {
        title: title.to_string(),
        group_name: group.to_string(),
    })
}

pub struct SongService {
    store: Arc<dyn SongStore>,
    enricher: Arc<dyn SongEnricher>,
}

impl SongService {
    pub fn new(store: Arc<dyn SongStore>, enricher: Arc<dyn SongEnricher>) -> Self {
        Self { store, enricher }
    }

    /// Enriches and stores a new song. Nothing is written if enrichment fails.
    pub async fn create(&self, input: SongInput) -> ServiceResult<Song> {
        let new_song = validate_input(&input)?;
        let enrichment = self
            .enricher
            .fetch(&new_song.title, &new_song.group_name)
            .await?;

        let song = self.store.create_song(&new_song, &enrichment.into())?;
        info!(
            "New song created: {} - {} (id {})",
            song.group.name, song.song, song.id
        );
        Ok(song)
    }

    pub fn list(&self, filter: SongFilter, page: PageRequest) -> ServiceResult<SongPage> {
        let songs = self.store.list_songs(&filter, page.to_pagination())?;
        debug!(
            "Listed {} songs (page {}, limit {}, filter {:?})",
            songs.len(),
            page.page,
            page.limit,
            filter
        );
        Ok(SongPage {
            page: page.page,
            limit: page.limit,
            songs,
        })
    }

    pub fn get(&self, id: SongId) -> ServiceResult<Song> {
        self.store.get_song(id)?.ok_or_else(|| song_not_found(id))
    }

    pub fn get_text(&self, id: SongId, page: PageRequest) -> ServiceResult<TextPage> {
        let text = self
            .store
            .get_song_text(id)?
            .filter(|text| !text.is_empty())
            .ok_or_else(|| SongServiceError::NotFound(format!("Song {} has no text", id)))?;

        let lines = paginate_lines(&text, page)
            .ok_or_else(|| SongServiceError::Validation("Page out of range".to_string()))?;

        Ok(TextPage {
            page: page.page,
            limit: page.limit,
            text: lines,
        })
    }

    /// Replaces title and group and re-enriches the song. The previous
    /// details are kept untouched if enrichment fails.
    pub async fn update(&self, id: SongId, input: SongInput) -> ServiceResult<Song> {
        let new_song = validate_input(&input)?;
        if !self.store.song_exists(id)? {
            return Err(song_not_found(id));
        }

        let enrichment = self
            .enricher
            .fetch(&new_song.title, &new_song.group_name)
            .await?;

        let song = self
            .store
            .replace_song(id, &new_song, &enrichment.into())?
            .ok_or_else(|| song_not_found(id))?;
        info!("Updated song {}", id);
        Ok(song)
    }

    pub fn partial_update(&self, id: SongId, mut patch: SongPatch) -> ServiceResult<Song> {
        if patch.is_empty() {
            return Err(SongServiceError::Validation(
                "No fields to update".to_string(),
            ));
        }
        if let Some(title) = patch.song.as_mut() {
            *title = title.trim().to_string();
            if title.is_empty() {
                return Err(SongServiceError::Validation(
                    "Song title must not be empty".to_string(),
                ));
            }
        }
        if let Some(group_id) = patch.group_id {
            if !self.store.group_exists(group_id)? {
                return Err(SongServiceError::Validation(format!(
                    "Group {} does not exist",
                    group_id
                )));
            }
        }

        let song = self
            .store
            .patch_song(id, &patch)?
            .ok_or_else(|| song_not_found(id))?;
        info!("Partially updated song {}", id);
        Ok(song)
    }

    pub fn delete(&self, id: SongId) -> ServiceResult<()> {
        if !self.store.delete_song(id)? {
            return Err(song_not_found(id));
        }
        info!("Song {} was deleted", id);
        Ok(())
    }
}
