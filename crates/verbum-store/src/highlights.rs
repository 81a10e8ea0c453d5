//! CRUD operations for [`Highlight`] rows.
//!
//! A highlight is never deleted: clearing writes `color = null` over the
//! existing row, which reads back exactly like a verse that was never
//! highlighted.

use reqwest::Method;
use serde_json::json;
use tracing::info;

use verbum_shared::constants::TABLE_HIGHLIGHTS;
use verbum_shared::{HighlightColor, VerseKey};

use crate::error::Result;
use crate::models::{Highlight, HighlightRow};
use crate::rest::{eq, in_keys, RestStore};
use crate::session::Session;

const HIGHLIGHT_COLUMNS: &str = "user_id,verse_id,color";

impl RestStore {
    /// The caller's colour for one verse.  Missing rows, tombstones and
    /// unrecognised stored values all read as `None`.
    pub async fn fetch_highlight(
        &self,
        session: &Session,
        key: &VerseKey,
    ) -> Result<Option<HighlightColor>> {
        let url = self.table_url(TABLE_HIGHLIGHTS);
        let req = self
            .request(Method::GET, &url, Some(session))
            .query(&[
                ("select", HIGHLIGHT_COLUMNS.to_string()),
                ("user_id", eq(&session.user_id)),
                ("verse_id", eq(key.as_str())),
                ("limit", "1".to_string()),
            ]);
        let rows: Vec<HighlightRow> = self.send_json(req).await?;
        Ok(rows
            .into_iter()
            .next()
            .and_then(|row| Highlight::from(row).color))
    }

    /// Highlight rows among `keys`, tombstones included.
    pub async fn fetch_highlights_for(
        &self,
        session: &Session,
        keys: &[VerseKey],
    ) -> Result<Vec<Highlight>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let url = self.table_url(TABLE_HIGHLIGHTS);
        let req = self
            .request(Method::GET, &url, Some(session))
            .query(&[
                ("select", HIGHLIGHT_COLUMNS.to_string()),
                ("user_id", eq(&session.user_id)),
                ("verse_id", in_keys(keys)),
            ]);
        let rows: Vec<HighlightRow> = self.send_json(req).await?;
        Ok(rows.into_iter().map(Highlight::from).collect())
    }

    /// Upsert on `(user_id, verse_id)`.  `None` writes the tombstone.
    pub async fn upsert_highlight(
        &self,
        session: &Session,
        key: &VerseKey,
        color: Option<HighlightColor>,
    ) -> Result<()> {
        let url = self.table_url(TABLE_HIGHLIGHTS);
        let req = self
            .request(Method::POST, &url, Some(session))
            .query(&[("on_conflict", "user_id,verse_id")])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&json!({
                "user_id": session.user_id,
                "verse_id": key.as_str(),
                "color": HighlightColor::to_stored(color),
            }));
        self.send_empty(req).await?;

        match color {
            Some(c) => info!(verse = %key, color = %c, "highlight set"),
            None => info!(verse = %key, "highlight cleared"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header_regex, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session() -> Session {
        Session {
            user_id: "u1".into(),
            access_token: "jwt-u1".into(),
            email: None,
        }
    }

    fn store(server: &MockServer) -> RestStore {
        RestStore::new(server.uri(), "anon-key", reqwest::Client::new())
    }

    async fn mount_get(server: &MockServer, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/rest/v1/highlights"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn fetch_reads_color() {
        let server = MockServer::start().await;
        mount_get(
            &server,
            json!([{"user_id": "u1", "verse_id": "John.3.16", "color": "green"}]),
        )
        .await;

        let color = store(&server)
            .fetch_highlight(&session(), &VerseKey::from_raw("John.3.16"))
            .await
            .unwrap();
        assert_eq!(color, Some(HighlightColor::Green));
    }

    #[tokio::test]
    async fn tombstone_and_missing_row_read_the_same() {
        let server = MockServer::start().await;
        mount_get(
            &server,
            json!([{"user_id": "u1", "verse_id": "John.3.16", "color": null}]),
        )
        .await;
        let key = VerseKey::from_raw("John.3.16");
        let tombstone = store(&server).fetch_highlight(&session(), &key).await.unwrap();

        let empty = MockServer::start().await;
        mount_get(&empty, json!([])).await;
        let missing = store(&empty).fetch_highlight(&session(), &key).await.unwrap();

        assert_eq!(tombstone, None);
        assert_eq!(tombstone, missing);
    }

    #[tokio::test]
    async fn legacy_stored_values_are_normalised() {
        let server = MockServer::start().await;
        mount_get(
            &server,
            json!([
                {"user_id": "u1", "verse_id": "John.3.16", "color": "bg-yellow-200"},
                {"user_id": "u1", "verse_id": "John.3.17", "color": "bg-transparent"}
            ]),
        )
        .await;

        let keys = [VerseKey::from_raw("John.3.16"), VerseKey::from_raw("John.3.17")];
        let rows = store(&server)
            .fetch_highlights_for(&session(), &keys)
            .await
            .unwrap();
        assert_eq!(rows[0].color, Some(HighlightColor::Yellow));
        assert_eq!(rows[1].color, None);
    }

    #[tokio::test]
    async fn upsert_sends_merge_duplicates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/highlights"))
            .and(query_param("on_conflict", "user_id,verse_id"))
            .and(header_regex("prefer", "resolution=merge-duplicates"))
            .and(body_json(
                json!({"user_id": "u1", "verse_id": "John.3.16", "color": "pink"}),
            ))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        store(&server)
            .upsert_highlight(
                &session(),
                &VerseKey::from_raw("John.3.16"),
                Some(HighlightColor::Pink),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn clearing_writes_null_color() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/highlights"))
            .and(body_json(
                json!({"user_id": "u1", "verse_id": "John.3.16", "color": null}),
            ))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        store(&server)
            .upsert_highlight(&session(), &VerseKey::from_raw("John.3.16"), None)
            .await
            .unwrap();
    }
}
