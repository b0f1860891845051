//! Page/limit handling shared by the song listing and the lyrics endpoint.

use serde::Serialize;

use crate::song_store::Pagination;

pub const DEFAULT_SONGS_LIMIT: usize = 10;
pub const DEFAULT_TEXT_LIMIT: usize = 2;

/// A 1-based page request. Both values are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

fn positive_or(value: Option<&str>, default: usize) -> usize {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

impl PageRequest {
    /// Missing, unparseable and non-positive values fall back to page 1 and
    /// `default_limit` instead of being rejected.
    pub fn parse(page: Option<&str>, limit: Option<&str>, default_limit: usize) -> Self {
        Self {
            page: positive_or(page, 1),
            limit: positive_or(limit, default_limit),
        }
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    pub fn to_pagination(self) -> Pagination {
        Pagination {
            limit: self.limit,
            offset: self.offset(),
        }
    }
}

/// Splits `text` on newlines and returns the lines of the requested page.
/// `None` when the page starts past the last line.
pub fn paginate_lines(text: &str, page: PageRequest) -> Option<Vec<String>> {
    let lines: Vec<&str> = text.split('\n').collect();
    let offset = page.offset();
    if offset >= lines.len() {
        return None;
    }
    let end = offset.saturating_add(page.limit).min(lines.len());
    Some(lines[offset..end].iter().map(|line| line.to_string()).collect())
}
