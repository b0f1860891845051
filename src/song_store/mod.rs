mod models;
mod query;
mod schema;
mod sqlite_song_store;

pub use models::*;
pub use query::SongQuery;
pub use schema::SONG_VERSIONED_SCHEMAS;
pub use sqlite_song_store::SqliteSongStore;

use anyhow::Result;

/// Persistence for songs, their groups and their details.
///
/// Absence is reported through `Option`/`bool`; `Err` always means the
/// storage itself failed.
pub trait SongStore: Send + Sync {
    /// Inserts the song (creating its group when needed) and its details
    /// atomically. Returns the stored song.
    fn create_song(&self, song: &NewSong, details: &NewSongDetails) -> Result<Song>;

    fn list_songs(&self, filter: &SongFilter, pagination: Pagination) -> Result<Vec<Song>>;

    fn get_song(&self, id: SongId) -> Result<Option<Song>>;

    fn song_exists(&self, id: SongId) -> Result<bool>;

    /// Lyrics of the song, `None` when the song or its details are missing.
    fn get_song_text(&self, id: SongId) -> Result<Option<String>>;

    /// Overwrites title and group and replaces the details row, all in one
    /// transaction. `None` when the song does not exist, in which case
    /// nothing is written.
    fn replace_song(
        &self,
        id: SongId,
        song: &NewSong,
        details: &NewSongDetails,
    ) -> Result<Option<Song>>;

    /// Writes only the fields present in `patch`. `None` when the song does
    /// not exist.
    fn patch_song(&self, id: SongId, patch: &SongPatch) -> Result<Option<Song>>;

    /// Deletes the details and the song together. `false` when there was no
    /// such song, in which case nothing is deleted.
    fn delete_song(&self, id: SongId) -> Result<bool>;

    fn get_group(&self, id: GroupId) -> Result<Option<Group>>;

    fn group_exists(&self, id: GroupId) -> Result<bool> {
        Ok(self.get_group(id)?.is_some())
    }

    fn count_songs(&self) -> Result<usize>;
}
