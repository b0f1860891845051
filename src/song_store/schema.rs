//! SQLite schema definitions for the song library database.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema,
};

// =============================================================================
// Version 1 - Groups, songs and song details
// =============================================================================

const GROUP_FK: ForeignKey = ForeignKey {
    foreign_table: "song_groups",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Restrict,
};

const SONG_FK: ForeignKey = ForeignKey {
    foreign_table: "songs",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Cascade,
};

const GROUPS_TABLE_V1: Table = Table {
    name: "song_groups",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true, is_unique = true),
    ],
    indices: &[],
};

const SONGS_TABLE_V1: Table = Table {
    name: "songs",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!(
            "group_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&GROUP_FK)
        ),
    ],
    indices: &[("idx_songs_group_id", "group_id")],
};

const SONG_DETAILS_TABLE_V1: Table = Table {
    name: "song_details",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!(
            "song_id",
            &SqlType::Integer,
            non_null = true,
            is_unique = true,
            foreign_key = Some(&SONG_FK)
        ),
        sqlite_column!("release_date", &SqlType::Text, non_null = true),
        sqlite_column!("text", &SqlType::Text, non_null = true),
        sqlite_column!("link", &SqlType::Text, non_null = true),
    ],
    indices: &[],
};

pub const SONG_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 1,
    tables: &[GROUPS_TABLE_V1, SONGS_TABLE_V1, SONG_DETAILS_TABLE_V1],
    migration: None,
}];
