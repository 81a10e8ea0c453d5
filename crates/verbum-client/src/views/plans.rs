//! Reading plans: browse public plans, start one, tick off days.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use verbum_store::{PlanStore, ReadingPlan, ReadingProgress, SessionContext};

use crate::error::{ClientError, Result};
use crate::events::Notifier;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanProgress {
    pub plan: ReadingPlan,
    pub day_completed: u32,
    pub finished: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlansSnapshot {
    pub loading: bool,
    pub plans: Vec<ReadingPlan>,
    pub active: Vec<PlanProgress>,
}

#[derive(Default)]
struct PlansState {
    loading: bool,
    plans: Vec<ReadingPlan>,
    progress: HashMap<Uuid, u32>,
}

pub struct ReadingPlansView {
    store: Arc<dyn PlanStore>,
    session: SessionContext,
    notifier: Notifier,
    state: Mutex<PlansState>,
}

impl ReadingPlansView {
    pub fn new(store: Arc<dyn PlanStore>, session: SessionContext, notifier: Notifier) -> Self {
        Self {
            store,
            session,
            notifier,
            state: Mutex::new(PlansState::default()),
        }
    }

    /// Public plans, plus the caller's progress when signed in.
    pub async fn load(&self) {
        self.state.lock().await.loading = true;
        let result = self.sync().await;
        self.state.lock().await.loading = false;

        if let Err(e) = result {
            self.notifier.failure("load reading plans", &e);
        }
    }

    async fn sync(&self) -> Result<()> {
        let (plans, progress) = self.fetch().await?;
        debug!(plans = plans.len(), active = progress.len(), "reading plans loaded");

        let mut state = self.state.lock().await;
        state.plans = plans;
        state.progress = progress
            .into_iter()
            .map(|p| (p.plan_id, p.day_completed))
            .collect();
        Ok(())
    }

    async fn fetch(&self) -> Result<(Vec<ReadingPlan>, Vec<ReadingProgress>)> {
        let session = self.session.current();
        let plans = self.store.list_public_plans(session.as_ref()).await?;
        let progress = match &session {
            Some(s) => self.store.list_progress(s).await?,
            None => Vec::new(),
        };
        Ok((plans, progress))
    }

    /// Enrol in a plan at day 0.
    pub async fn start(&self, plan_id: Uuid) {
        let result = async {
            let session = self.session.require()?;
            Ok::<_, ClientError>(self.store.start_plan(&session, plan_id).await?)
        }
        .await;

        match result {
            Ok(progress) => {
                self.state
                    .lock()
                    .await
                    .progress
                    .insert(plan_id, progress.day_completed);
                info!(plan = %plan_id, "plan started");
                self.notifier.success("Reading plan started");
            }
            Err(e) => self.notifier.failure("start reading plan", &e),
        }
    }

    /// Mark the next day of an active plan as read.  A finished plan stays
    /// at its last day.
    pub async fn complete_day(&self, plan_id: Uuid) {
        let session = match self.session.require() {
            Ok(s) => s,
            Err(e) => {
                self.notifier
                    .failure("complete reading day", &ClientError::from(e));
                return;
            }
        };

        // The bound comes from the plan row, so make sure it is known.
        if self.duration(plan_id).await.is_none() {
            if let Err(e) = self.sync().await {
                self.notifier.failure("complete reading day", &e);
                return;
            }
        }
        let Some(duration) = self.duration(plan_id).await else {
            self.notifier.error("Reading plan not found.");
            return;
        };

        let current = self.state.lock().await.progress.get(&plan_id).copied();
        let Some(current) = current else {
            self.notifier.error("Start this plan first.");
            return;
        };
        if current >= duration {
            self.notifier.success("Plan already complete");
            return;
        }

        match self
            .store
            .set_day_completed(&session, plan_id, current + 1)
            .await
        {
            Ok(progress) => {
                let finished = progress.day_completed >= duration;
                self.state
                    .lock()
                    .await
                    .progress
                    .insert(plan_id, progress.day_completed);
                info!(plan = %plan_id, day = progress.day_completed, finished, "reading day completed");
                self.notifier.success(if finished {
                    "Plan complete!"
                } else {
                    "Day completed"
                });
            }
            Err(e) => self
                .notifier
                .failure("complete reading day", &ClientError::from(e)),
        }
    }

    async fn duration(&self, plan_id: Uuid) -> Option<u32> {
        self.state
            .lock()
            .await
            .plans
            .iter()
            .find(|p| p.id == plan_id)
            .map(|p| p.duration_days)
    }

    /// Plans the caller has started.
    pub async fn progress(&self) -> Vec<PlanProgress> {
        self.snapshot().await.active
    }

    pub async fn snapshot(&self) -> PlansSnapshot {
        let state = self.state.lock().await;
        let active = state
            .plans
            .iter()
            .filter_map(|plan| {
                state.progress.get(&plan.id).map(|day| PlanProgress {
                    plan: plan.clone(),
                    day_completed: *day,
                    finished: *day >= plan.duration_days,
                })
            })
            .collect();

        PlansSnapshot {
            loading: state.loading,
            plans: state.plans.clone(),
            active,
        }
    }
}
