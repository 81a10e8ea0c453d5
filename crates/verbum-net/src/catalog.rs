//! Session-scoped book catalog.
//!
//! The catalog is fetched at most once per [`BookCatalog`] instance and held
//! in memory for the lifetime of the view session; nothing is persisted.  A
//! failed load is not cached, so the next [`BookCatalog::list_books`] call
//! tries again.

use tokio::sync::OnceCell;
use tracing::{debug, info};

use verbum_shared::{Book, Catalog};

use crate::error::{NetError, Result};
use crate::http::{get_json, normalize_base};
use crate::schema::BooksResponse;

#[derive(Debug, Clone)]
enum CatalogOrigin {
    /// Built-in 66-book table.
    Static,
    /// `GET {base}/books` on the books service.
    Api {
        base_url: String,
        http: reqwest::Client,
    },
}

#[derive(Debug)]
pub struct BookCatalog {
    origin: CatalogOrigin,
    books: OnceCell<Catalog>,
}

impl BookCatalog {
    /// Catalog backed by the static canonical table.  Already loaded.
    pub fn static_canon() -> Self {
        Self {
            origin: CatalogOrigin::Static,
            books: OnceCell::new_with(Some(Catalog::canonical())),
        }
    }

    /// Catalog fetched from the books service on first use.
    pub fn from_api(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            origin: CatalogOrigin::Api {
                base_url: normalize_base(base_url),
                http,
            },
            books: OnceCell::new(),
        }
    }

    /// The full catalog, loading it if needed.
    pub async fn list_books(&self) -> Result<&Catalog> {
        self.books.get_or_try_init(|| self.fetch()).await
    }

    /// The catalog if it has already been loaded.
    pub fn loaded(&self) -> Option<&Catalog> {
        self.books.get()
    }

    /// Chapter count for `name`; 0 when the catalog is not loaded or does
    /// not list the book, so callers can pick their own fallback bound.
    pub fn chapter_count(&self, name: &str) -> u32 {
        self.loaded().map(|c| c.chapter_count(name)).unwrap_or(0)
    }

    pub fn resolve(&self, name: &str) -> Result<Book> {
        self.loaded()
            .and_then(|c| c.get(name))
            .cloned()
            .ok_or_else(|| NetError::UnknownBook(name.to_string()))
    }

    async fn fetch(&self) -> Result<Catalog> {
        match &self.origin {
            CatalogOrigin::Static => Ok(Catalog::canonical()),
            CatalogOrigin::Api { base_url, http } => {
                let url = format!("{base_url}/books");
                let resp = get_json::<BooksResponse>(http, &url, &[])
                    .await?
                    .ok_or_else(|| NetError::UpstreamUnavailable(format!("{url} returned 404")))?;

                if resp.data.is_empty() {
                    return Err(NetError::UpstreamUnavailable(format!(
                        "{url} returned an empty book list"
                    )));
                }

                let books: Vec<Book> = resp
                    .data
                    .into_iter()
                    .map(|b| Book::new(b.name, b.abbreviation, b.chapters))
                    .collect();

                info!(count = books.len(), "book catalog loaded");
                debug!(first = %books[0].name, "catalog order starts");
                Ok(Catalog::new(books))
            }
        }
    }
}
