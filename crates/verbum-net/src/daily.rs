//! Random "verse of the day" from the verse service.

use serde::Serialize;
use tracing::debug;

use verbum_shared::{Verse, VerseRef};

use crate::error::{NetError, Result};
use crate::http::get_json;
use crate::schema::RandomVerseResponse;
use crate::source::VerseApiSource;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyVerse {
    /// Human-readable reference as the upstream formats it.
    pub reference: String,
    pub verse: Verse,
}

impl VerseApiSource {
    /// `GET {base}/random?translation={code}`
    pub async fn random_verse(&self, translation: &str) -> Result<DailyVerse> {
        let url = format!("{}/random", self.base_url());
        let resp = get_json::<RandomVerseResponse>(&self.http, &url, &[("translation", translation)])
            .await?
            .ok_or_else(|| NetError::UpstreamUnavailable(format!("{url} returned 404")))?;

        let reference = VerseRef::new(resp.book_name.trim(), resp.chapter, resp.verse)
            .map_err(|e| NetError::UpstreamUnavailable(format!("{url}: {e}")))?;

        debug!(verse = %reference, translation, "random verse loaded");

        Ok(DailyVerse {
            reference: resp.reference.unwrap_or_else(|| reference.to_string()),
            verse: Verse {
                reference,
                text: resp.text.trim().to_string(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn random_verse_builds_key_from_book_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/random"))
            .and(query_param("translation", "kjv"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "book_id": "PSA",
                "book_name": "Psalms",
                "chapter": 23,
                "verse": 1,
                "text": "The LORD is my shepherd; I shall not want.\n",
                "reference": "Psalms 23:1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let source = VerseApiSource::new(server.uri(), reqwest::Client::new());
        let daily = source.random_verse("kjv").await.unwrap();

        assert_eq!(daily.reference, "Psalms 23:1");
        assert_eq!(daily.verse.key().as_str(), "Psalms.23.1");
        assert_eq!(daily.verse.text, "The LORD is my shepherd; I shall not want.");
    }

    #[tokio::test]
    async fn random_verse_reference_falls_back_to_display() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/random"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "book": "John",
                "chapter": 11,
                "verse": 35,
                "text": "Jesus wept."
            })))
            .mount(&server)
            .await;

        let source = VerseApiSource::new(server.uri(), reqwest::Client::new());
        let daily = source.random_verse("kjv").await.unwrap();
        assert_eq!(daily.reference, "John 11:35");
    }

    #[tokio::test]
    async fn random_verse_failure_is_upstream_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/random"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let source = VerseApiSource::new(server.uri(), reqwest::Client::new());
        let err = source.random_verse("kjv").await.unwrap_err();
        assert!(matches!(err, NetError::UpstreamUnavailable(_)));
    }
}
