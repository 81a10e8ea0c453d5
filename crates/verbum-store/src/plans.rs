//! CRUD operations for reading plans and per-user progress.

use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use verbum_shared::constants::{TABLE_READING_PLANS, TABLE_READING_PROGRESS};

use crate::error::{Result, StoreError};
use crate::models::{ReadingPlan, ReadingProgress};
use crate::rest::{eq, RestStore};
use crate::session::Session;

const PLAN_COLUMNS: &str = "id,name,description,duration_days,is_public";
const PROGRESS_COLUMNS: &str = "user_id,plan_id,day_completed";

impl RestStore {
    /// Public plans, readable anonymously.
    pub async fn fetch_public_plans(&self, session: Option<&Session>) -> Result<Vec<ReadingPlan>> {
        let url = self.table_url(TABLE_READING_PLANS);
        let req = self
            .request(Method::GET, &url, session)
            .query(&[
                ("select", PLAN_COLUMNS),
                ("is_public", "eq.true"),
                ("order", "name.asc"),
            ]);
        let plans: Vec<ReadingPlan> = self.send_json(req).await?;
        debug!(count = plans.len(), "public plans listed");
        Ok(plans)
    }

    pub async fn fetch_progress(&self, session: &Session) -> Result<Vec<ReadingProgress>> {
        let url = self.table_url(TABLE_READING_PROGRESS);
        let req = self
            .request(Method::GET, &url, Some(session))
            .query(&[
                ("select", PROGRESS_COLUMNS.to_string()),
                ("user_id", eq(&session.user_id)),
            ]);
        self.send_json(req).await
    }

    async fn fetch_plan_progress(
        &self,
        session: &Session,
        plan_id: Uuid,
    ) -> Result<Option<ReadingProgress>> {
        let url = self.table_url(TABLE_READING_PROGRESS);
        let req = self
            .request(Method::GET, &url, Some(session))
            .query(&[
                ("select", PROGRESS_COLUMNS.to_string()),
                ("user_id", eq(&session.user_id)),
                ("plan_id", eq(&plan_id.to_string())),
                ("limit", "1".to_string()),
            ]);
        let rows: Vec<ReadingProgress> = self.send_json(req).await?;
        Ok(rows.into_iter().next())
    }

    /// Enrol the caller in a plan at day 0.  Starting a plan already in
    /// progress returns the existing row untouched.
    pub async fn insert_progress(&self, session: &Session, plan_id: Uuid) -> Result<ReadingProgress> {
        if let Some(existing) = self.fetch_plan_progress(session, plan_id).await? {
            debug!(plan = %plan_id, day = existing.day_completed, "plan already started");
            return Ok(existing);
        }

        let url = self.table_url(TABLE_READING_PROGRESS);
        let req = self
            .request(Method::POST, &url, Some(session))
            .header("Prefer", "return=representation")
            .json(&json!({
                "user_id": session.user_id,
                "plan_id": plan_id,
                "day_completed": 0,
            }));
        let rows: Vec<ReadingProgress> = self.send_json(req).await?;
        let created = rows.into_iter().next().ok_or(StoreError::NotFound)?;
        info!(plan = %plan_id, "reading plan started");
        Ok(created)
    }

    /// Record `day` as the last completed day of an active plan.
    pub async fn update_progress(
        &self,
        session: &Session,
        plan_id: Uuid,
        day: u32,
    ) -> Result<ReadingProgress> {
        let url = self.table_url(TABLE_READING_PROGRESS);
        let req = self
            .request(Method::PATCH, &url, Some(session))
            .query(&[
                ("user_id", eq(&session.user_id)),
                ("plan_id", eq(&plan_id.to_string())),
            ])
            .header("Prefer", "return=representation")
            .json(&json!({ "day_completed": day }));
        let rows: Vec<ReadingProgress> = self.send_json(req).await?;
        let updated = rows.into_iter().next().ok_or(StoreError::NotFound)?;
        info!(plan = %plan_id, day, "reading progress recorded");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PLAN: &str = "0b7e4f0a-8d3c-4e0f-9a55-3f6f0d2b9c01";

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

    fn plan_id() -> Uuid {
        Uuid::parse_str(PLAN).unwrap()
    }

    #[tokio::test]
    async fn public_plans_are_readable_anonymously() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/reading_plans"))
            .and(query_param("is_public", "eq.true"))
            .and(header("authorization", "Bearer anon-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": PLAN,
                "name": "Gospels in 30 days",
                "description": null,
                "duration_days": 30,
                "is_public": true
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let plans = store(&server).fetch_public_plans(None).await.unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].duration_days, 30);
        assert!(plans[0].description.is_none());
    }

    #[tokio::test]
    async fn starting_creates_progress_at_day_zero() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/reading_progress"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/reading_progress"))
            .and(body_json(json!({"user_id": "u1", "plan_id": PLAN, "day_completed": 0})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([
                {"user_id": "u1", "plan_id": PLAN, "day_completed": 0}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let progress = store(&server)
            .insert_progress(&session(), plan_id())
            .await
            .unwrap();
        assert_eq!(progress.day_completed, 0);
    }

    #[tokio::test]
    async fn starting_twice_keeps_existing_progress() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/reading_progress"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"user_id": "u1", "plan_id": PLAN, "day_completed": 4}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let progress = store(&server)
            .insert_progress(&session(), plan_id())
            .await
            .unwrap();
        assert_eq!(progress.day_completed, 4);
    }

    #[tokio::test]
    async fn updating_missing_progress_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/rest/v1/reading_progress"))
            .and(query_param("plan_id", format!("eq.{PLAN}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let err = store(&server)
            .update_progress(&session(), plan_id(), 3)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }
}
