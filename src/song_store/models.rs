use serde::{Deserialize, Serialize};

pub type SongId = i64;
pub type GroupId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongDetails {
    pub id: i64,
    pub song_id: SongId,
    pub release_date: String,
    pub text: String,
    pub link: String,
}

/// A song together with its group and, when present, its enrichment details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: SongId,
    /// The song title.
    pub song: String,
    pub group_id: GroupId,
    pub group: Group,
    pub song_details: Option<SongDetails>,
}

/// Details to be written for a song, as produced by enrichment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewSongDetails {
    pub release_date: String,
    pub text: String,
    pub link: String,
}

/// Title and group name of a song, the fields required to create or replace one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSong {
    pub title: String,
    pub group_name: String,
}

/// Optional filters for listing songs. Both match case-insensitive substrings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongFilter {
    pub title: Option<String>,
    pub group: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: usize,
    pub offset: usize,
}

/// Partial update of a song. Only fields that are present are written.
///
/// Unknown keys are rejected at deserialization time, so this struct is the
/// complete allow-list of columns a PATCH may touch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SongPatch {
    pub song: Option<String>,
    pub group_id: Option<GroupId>,
    pub release_date: Option<String>,
    pub text: Option<String>,
    pub link: Option<String>,
}

impl SongPatch {
    pub fn is_empty(&self) -> bool {
        self.song.is_none() && self.group_id.is_none() && !self.touches_details()
    }

    pub fn touches_song(&self) -> bool {
        self.song.is_some() || self.group_id.is_some()
    }

    pub fn touches_details(&self) -> bool {
        self.release_date.is_some() || self.text.is_some() || self.link.is_some()
    }
}
