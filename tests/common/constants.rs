//! Shared constants for end-to-end tests
//!
//! The fake lyrics API only knows the songs listed here; anything else
//! gets a 404 from it.

// ============================================================================
// Fake lyrics API catalog
// ============================================================================

pub const KNOWN_SONG: &str = "Supermassive Black Hole";
pub const KNOWN_GROUP: &str = "Muse";
pub const KNOWN_RELEASE_DATE: &str = "16.07.2006";
pub const KNOWN_LINK: &str = "https://www.youtube.com/watch?v=Xsp3_a-PMTw";

/// Lyrics of the known song, five lines.
pub const KNOWN_TEXT: &str = "Ooh baby, don't you know I suffer?\n\
Ooh baby, can you hear me moan?\n\
You caught me under false pretenses\n\
How long before you let me go?\n\
Ooh, you set my soul alight";

pub const SECOND_SONG: &str = "Yesterday";
pub const SECOND_GROUP: &str = "The Beatles";

pub const CYRILLIC_SONG: &str = "Группа крови";
pub const CYRILLIC_GROUP: &str = "Кино";

/// Title the fake API answers with a 500.
pub const FAILING_SONG: &str = "Server Meltdown";

/// Title the fake API answers with a body that is not JSON.
pub const GARBLED_SONG: &str = "Garbled";

// ============================================================================
// Timeouts
// ============================================================================

pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 20;
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
