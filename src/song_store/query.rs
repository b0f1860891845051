//! Builder for the song listing query.
//!
//! User supplied values only ever reach SQLite as bound parameters; the SQL
//! text is assembled from fixed fragments and `?N` placeholders.

use rusqlite::types::Value;

use super::models::{Pagination, SongFilter};

/// Name of the Unicode-aware lowercase function registered on every connection.
/// SQLite's own `lower()` and `LIKE` only fold ASCII.
pub const UNICODE_LOWER_FN: &str = "unicode_lower";

/// Lowercases one character at a time so a letter folds the same way wherever
/// it sits in a word. Final sigma is folded to the plain form.
pub fn fold_case(value: &str) -> String {
    value
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c == 'ς' { 'σ' } else { c })
        .collect()
}

pub const SONG_SELECT: &str = "SELECT s.id, s.title, s.group_id, g.name, \
     d.id, d.release_date, d.text, d.link \
     FROM songs s \
     JOIN song_groups g ON g.id = s.group_id \
     LEFT JOIN song_details d ON d.song_id = s.id";

#[derive(Debug, Default)]
pub struct SongQuery {
    conditions: Vec<String>,
    params: Vec<Value>,
}

impl SongQuery {
    pub fn new() -> Self {
        Self::default()
    }

    fn bind(&mut self, value: Value) -> usize {
        self.params.push(value);
        self.params.len()
    }

    fn contains_ignore_case(&mut self, column: &'static str, needle: &str) {
        let index = self.bind(Value::Text(fold_case(needle)));
        self.conditions.push(format!(
            "instr({}({}), ?{}) > 0",
            UNICODE_LOWER_FN, column, index
        ));
    }

    pub fn with_filter(mut self, filter: &SongFilter) -> Self {
        if let Some(title) = filter.title.as_deref().map(str::trim) {
            if !title.is_empty() {
                self.contains_ignore_case("s.title", title);
            }
        }
        if let Some(group) = filter.group.as_deref().map(str::trim) {
            if !group.is_empty() {
                self.contains_ignore_case("g.name", group);
            }
        }
        self
    }

    /// Returns the final SQL and its parameters, newest songs first.
    pub fn build(mut self, pagination: Pagination) -> (String, Vec<Value>) {
        let mut sql = SONG_SELECT.to_string();
        if !self.conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.conditions.join(" AND "));
        }
        let limit = self.bind(Value::Integer(
            i64::try_from(pagination.limit).unwrap_or(i64::MAX),
        ));
        let offset = self.bind(Value::Integer(
            i64::try_from(pagination.offset).unwrap_or(i64::MAX),
        ));
        sql.push_str(&format!(" ORDER BY s.id DESC LIMIT ?{} OFFSET ?{}", limit, offset));
        (sql, self.params)
    }
}
