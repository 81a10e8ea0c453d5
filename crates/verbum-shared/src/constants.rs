/// Application name
pub const APP_NAME: &str = "Verbum";

/// Separator between the book, chapter and verse parts of a verse key
pub const VERSE_KEY_DELIMITER: char = '.';

/// Default verse-by-reference service
pub const DEFAULT_VERSE_API_URL: &str = "https://bible-api.com";

/// Translation used when none is configured
pub const DEFAULT_TRANSLATION: &str = "kjv";

/// Book opened by a fresh reader
pub const DEFAULT_BOOK: &str = "Genesis";

/// Chapter bound assumed for a book the catalog does not know
pub const FALLBACK_CHAPTER_BOUND: u32 = 50;

/// Default HTTP request timeout in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

/// Backend REST prefix (PostgREST)
pub const BACKEND_REST_PATH: &str = "/rest/v1";

/// Backend auth prefix
pub const BACKEND_AUTH_PATH: &str = "/auth/v1";

/// Backend table names
pub const TABLE_BOOKMARKS: &str = "bookmarks";
pub const TABLE_HIGHLIGHTS: &str = "highlights";
pub const TABLE_READING_PLANS: &str = "reading_plans";
pub const TABLE_READING_PROGRESS: &str = "reading_progress";
