//! Types shared by every Verbum crate: verse identity, the book catalog,
//! the highlight palette and the constants the clients agree on.

pub mod canon;
pub mod catalog;
pub mod constants;
pub mod error;
pub mod highlight;
pub mod verse;

pub use catalog::{Book, BookAddressing, Catalog};
pub use error::VerseKeyError;
pub use highlight::HighlightColor;
pub use verse::{Verse, VerseKey, VerseRef};
