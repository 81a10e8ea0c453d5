// Upstream scripture services: chapter sources, the book catalog and the
// daily random verse.

pub mod catalog;
pub mod daily;
pub mod error;
pub mod http;
pub mod schema;
pub mod source;

pub use catalog::BookCatalog;
pub use daily::DailyVerse;
pub use error::{NetError, Result};
pub use http::build_http_client;
pub use source::{BooksApiSource, ChapterSource, VerseApiSource};
