use super::models::{
    Group, GroupId, NewSong, NewSongDetails, Pagination, Song, SongDetails, SongFilter, SongId,
    SongPatch,
};
use super::query::{fold_case, SongQuery, SONG_SELECT, UNICODE_LOWER_FN};
use super::schema::SONG_VERSIONED_SCHEMAS;
use super::SongStore;
use crate::sqlite_persistence::open_versioned;
use anyhow::{anyhow, Context, Result};
use rusqlite::functions::FunctionFlags;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

pub struct SqliteSongStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSongStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let path = db_path.as_ref();
        let is_new_db = !path.exists();

        let mut conn = Connection::open(path).context("Failed to open song database")?;
        conn.execute("PRAGMA foreign_keys = ON;", [])?;
        Self::register_functions(&conn)?;

        if is_new_db {
            info!("Creating new song database at {:?}", path);
        }
        open_versioned(&mut conn, SONG_VERSIONED_SCHEMAS, is_new_db)
            .with_context(|| format!("Failed to prepare song database at {:?}", path))?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn register_functions(conn: &Connection) -> Result<()> {
        conn.create_scalar_function(
            UNICODE_LOWER_FN,
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| {
                let value = ctx.get::<Option<String>>(0)?;
                Ok(value.map(|s| fold_case(&s)))
            },
        )?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("Song database connection lock poisoned"))
    }

    fn row_to_song(row: &rusqlite::Row) -> rusqlite::Result<Song> {
        let id: SongId = row.get(0)?;
        let group_id: GroupId = row.get(2)?;
        let details_id: Option<i64> = row.get(4)?;

        let song_details = match details_id {
            Some(details_id) => Some(SongDetails {
                id: details_id,
                song_id: id,
                release_date: row.get(5)?,
                text: row.get(6)?,
                link: row.get(7)?,
            }),
            None => None,
        };

        Ok(Song {
            id,
            song: row.get(1)?,
            group_id,
            group: Group {
                id: group_id,
                name: row.get(3)?,
            },
            song_details,
        })
    }

    fn query_song(conn: &Connection, id: SongId) -> Result<Option<Song>> {
        let song = conn
            .query_row(
                &format!("{} WHERE s.id = ?1", SONG_SELECT),
                params![id],
                Self::row_to_song,
            )
            .optional()?;
        Ok(song)
    }

    fn get_or_create_group(conn: &Connection, name: &str) -> Result<GroupId> {
        conn.execute(
            "INSERT INTO song_groups (name) VALUES (?1) ON CONFLICT(name) DO NOTHING",
            params![name],
        )?;
        let id = conn.query_row(
            "SELECT id FROM song_groups WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        Ok(id)
    }

    fn insert_details(conn: &Connection, song_id: SongId, details: &NewSongDetails) -> Result<()> {
        conn.execute(
            "INSERT INTO song_details (song_id, release_date, text, link) VALUES (?1, ?2, ?3, ?4)",
            params![song_id, details.release_date, details.text, details.link],
        )?;
        Ok(())
    }

    /// Runs `UPDATE <table> SET <col> = ?, ... WHERE <key_column> = ?` for the
    /// given assignments. Column names come from fixed call sites only.
    fn update_columns(
        conn: &Connection,
        table: &'static str,
        key_column: &'static str,
        key: i64,
        assignments: Vec<(&'static str, Value)>,
    ) -> Result<usize> {
        if assignments.is_empty() {
            return Ok(0);
        }
        let mut values = Vec::with_capacity(assignments.len() + 1);
        let mut set_clauses = Vec::with_capacity(assignments.len());
        for (column, value) in assignments {
            values.push(value);
            set_clauses.push(format!("{} = ?{}", column, values.len()));
        }
        values.push(Value::Integer(key));
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?{}",
            table,
            set_clauses.join(", "),
            key_column,
            values.len()
        );
        Ok(conn.execute(&sql, params_from_iter(values))?)
    }
}

fn text_assignment(column: &'static str, value: &Option<String>) -> Option<(&'static str, Value)> {
    value.as_ref().map(|v| (column, Value::Text(v.clone())))
}

impl SongStore for SqliteSongStore {
    fn create_song(&self, song: &NewSong, details: &NewSongDetails) -> Result<Song> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let group_id = Self::get_or_create_group(&tx, &song.group_name)?;
        tx.execute(
            "INSERT INTO songs (title, group_id) VALUES (?1, ?2)",
            params![song.title, group_id],
        )?;
        let song_id = tx.last_insert_rowid();
        Self::insert_details(&tx, song_id, details)?;

        let created = Self::query_song(&tx, song_id)?
            .with_context(|| format!("Song {} vanished right after insertion", song_id))?;
        tx.commit()?;

        debug!("Inserted song {} with group {}", song_id, group_id);
        Ok(created)
    }

    fn list_songs(&self, filter: &SongFilter, pagination: Pagination) -> Result<Vec<Song>> {
        let (sql, values) = SongQuery::new().with_filter(filter).build(pagination);
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let songs = stmt
            .query_map(params_from_iter(values), Self::row_to_song)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(songs)
    }

    fn get_song(&self, id: SongId) -> Result<Option<Song>> {
        let conn = self.conn()?;
        Self::query_song(&conn, id)
    }

    fn song_exists(&self, id: SongId) -> Result<bool> {
        let conn = self.conn()?;
        let exists = conn
            .query_row("SELECT 1 FROM songs WHERE id = ?1", params![id], |_| Ok(()))
            .optional()?
            .is_some();
        Ok(exists)
    }

    fn get_song_text(&self, id: SongId) -> Result<Option<String>> {
        let conn = self.conn()?;
        let text = conn
            .query_row(
                "SELECT text FROM song_details WHERE song_id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(text)
    }

    fn replace_song(
        &self,
        id: SongId,
        song: &NewSong,
        details: &NewSongDetails,
    ) -> Result<Option<Song>> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let group_id = Self::get_or_create_group(&tx, &song.group_name)?;
        let updated = tx.execute(
            "UPDATE songs SET title = ?1, group_id = ?2 WHERE id = ?3",
            params![song.title, group_id, id],
        )?;
        if updated == 0 {
            // Dropping the transaction rolls back the group insertion as well.
            return Ok(None);
        }

        tx.execute("DELETE FROM song_details WHERE song_id = ?1", params![id])?;
        Self::insert_details(&tx, id, details)?;

        let replaced = Self::query_song(&tx, id)?;
        tx.commit()?;
        Ok(replaced)
    }

    fn patch_song(&self, id: SongId, patch: &SongPatch) -> Result<Option<Song>> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let exists = tx
            .query_row("SELECT 1 FROM songs WHERE id = ?1", params![id], |_| Ok(()))
            .optional()?
            .is_some();
        if !exists {
            return Ok(None);
        }

        let song_assignments: Vec<_> = [
            text_assignment("title", &patch.song),
            patch.group_id.map(|g| ("group_id", Value::Integer(g))),
        ]
        .into_iter()
        .flatten()
        .collect();
        Self::update_columns(&tx, "songs", "id", id, song_assignments)?;

        if patch.touches_details() {
            let details_assignments: Vec<_> = [
                text_assignment("release_date", &patch.release_date),
                text_assignment("text", &patch.text),
                text_assignment("link", &patch.link),
            ]
            .into_iter()
            .flatten()
            .collect();
            let updated =
                Self::update_columns(&tx, "song_details", "song_id", id, details_assignments)?;
            if updated == 0 {
                let details = NewSongDetails {
                    release_date: patch.release_date.clone().unwrap_or_default(),
                    text: patch.text.clone().unwrap_or_default(),
                    link: patch.link.clone().unwrap_or_default(),
                };
                Self::insert_details(&tx, id, &details)?;
            }
        }

        let patched = Self::query_song(&tx, id)?;
        tx.commit()?;
        Ok(patched)
    }

    fn delete_song(&self, id: SongId) -> Result<bool> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM song_details WHERE song_id = ?1", params![id])?;
        let deleted = tx.execute("DELETE FROM songs WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Ok(false);
        }
        tx.commit()?;
        Ok(true)
    }

    fn get_group(&self, id: GroupId) -> Result<Option<Group>> {
        let conn = self.conn()?;
        let group = conn
            .query_row(
                "SELECT id, name FROM song_groups WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Group {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(group)
    }

    fn count_songs(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM songs", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}
