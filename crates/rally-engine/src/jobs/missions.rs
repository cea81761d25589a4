//! Mission sweeps: overdue detection and deadline reminders.

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, info, warn};

use rally_shared::constants::{reminder_window, MISSIONS};
use rally_shared::models::{Mission, MissionStatus, Notification};
use rally_shared::{build_payload, Event};
use rally_store::batch::fields;
use rally_store::{Filter, WriteBatch};

use crate::error::Result;
use crate::join::settle_all;

use super::{JobReport, MaintenanceJobs};

/// Missions still in progress, decoded alongside their document id.
fn decode_missions(docs: &[rally_store::Document]) -> Vec<(String, Mission)> {
    docs.iter()
        .filter_map(|doc| Some((doc.id.clone(), doc.decode::<Mission>().ok()?)))
        .collect()
}

impl MaintenanceJobs {
    /// Flag in-progress missions whose deadline has passed.
    ///
    /// The status transition commits first as one atomic batch; the
    /// predicate `status == in-progress` makes the sweep idempotent
    /// across runs.  Per-mission follow-ups (notification record + push)
    /// then run concurrently and independently.
    pub(crate) async fn mark_overdue_missions(&self, now: DateTime<Utc>) -> Result<JobReport> {
        let now_ms = now.timestamp_millis();
        let docs = self
            .store
            .query(
                MISSIONS,
                &Filter::new()
                    .field_eq("status", MissionStatus::InProgress.as_str())
                    .field_lt("deadline", now_ms),
            )
            .await?;

        if docs.is_empty() {
            debug!("No overdue missions");
            return Ok(JobReport::default());
        }

        let mut batch = WriteBatch::new();
        for doc in &docs {
            batch.update(
                MISSIONS,
                &doc.id,
                fields(&[("status", json!(MissionStatus::Overdue.as_str()))]),
            );
        }
        self.store.commit(batch).await?;

        let missions = decode_missions(&docs);
        let follow_ups: Vec<_> = missions
            .into_iter()
            .filter_map(|(id, mission)| {
                let assignee = mission.assigned_to.clone()?;
                Some(self.overdue_follow_up(id, mission, assignee, now_ms))
            })
            .collect();

        let mut pushes_sent = 0;
        for result in settle_all(follow_ups).await {
            match result {
                Ok(true) => pushes_sent += 1,
                Ok(false) => {}
                Err(e) => warn!(error = %e, "Overdue follow-up failed"),
            }
        }

        info!(marked = docs.len(), pushes_sent, "Marked missions overdue");
        Ok(JobReport {
            examined: docs.len(),
            mutated: docs.len(),
            pushes_sent,
        })
    }

    /// Notification record and push for one overdue mission.  The two
    /// effects are independent; a failed record does not block the push.
    async fn overdue_follow_up(
        &self,
        mission_id: String,
        mission: Mission,
        assignee: String,
        now_ms: i64,
    ) -> Result<bool> {
        let record = Notification {
            user_id: assignee.clone(),
            kind: "missionOverdue".to_string(),
            title: "Mission Overdue".to_string(),
            message: format!("Mission \"{}\" is past its deadline", mission.title),
            actor_id: mission.created_by.clone(),
            action_id: mission_id.clone(),
            is_read: false,
            created_at: now_ms,
        };

        let event = Event::MissionOverdue {
            mission_id,
            mission,
        };
        // The actor name does not appear in overdue payloads.
        let payload = build_payload(&event, "");

        let (record_result, pushed) = tokio::join!(
            self.create_notification(record),
            self.push_to_user(&assignee, &payload),
        );
        if let Err(e) = record_result {
            warn!(error = %e, "Failed to write overdue notification record");
        }
        pushed
    }

    /// Remind assignees of missions due within the next 24 hours.
    ///
    /// `reminder_sent` is a one-way latch checked after decode (the store
    /// cannot express "not true") and set *last*, after the notification
    /// record and push, so a crash mid-sequence re-sends rather than
    /// silently dropping a reminder whose effects never happened.
    pub(crate) async fn send_mission_reminders(&self, now: DateTime<Utc>) -> Result<JobReport> {
        let now_ms = now.timestamp_millis();
        let horizon = (now + reminder_window()).timestamp_millis();
        let docs = self
            .store
            .query(
                MISSIONS,
                &Filter::new()
                    .field_eq("status", MissionStatus::InProgress.as_str())
                    .field_gt("deadline", now_ms)
                    .field_lt("deadline", horizon),
            )
            .await?;

        if docs.is_empty() {
            debug!("No missions needing reminders");
            return Ok(JobReport::default());
        }

        let reminders: Vec<_> = decode_missions(&docs)
            .into_iter()
            .filter(|(_, mission)| !mission.reminder_sent)
            .filter_map(|(id, mission)| {
                let assignee = mission.assigned_to.clone()?;
                Some(self.remind(id, mission, assignee, now_ms))
            })
            .collect();

        let mut latched = 0;
        let mut pushes_sent = 0;
        for result in settle_all(reminders).await {
            match result {
                Ok(pushed) => {
                    latched += 1;
                    if pushed {
                        pushes_sent += 1;
                    }
                }
                Err(e) => warn!(error = %e, "Reminder failed"),
            }
        }

        info!(
            examined = docs.len(),
            reminded = latched,
            pushes_sent,
            "Sent mission reminders"
        );
        Ok(JobReport {
            examined: docs.len(),
            mutated: latched,
            pushes_sent,
        })
    }

    /// All three reminder effects for one mission: record, push, latch.
    async fn remind(
        &self,
        mission_id: String,
        mission: Mission,
        assignee: String,
        now_ms: i64,
    ) -> Result<bool> {
        let record = Notification {
            user_id: assignee.clone(),
            kind: "missionReminder".to_string(),
            title: "Mission Deadline Soon".to_string(),
            message: format!("\"{}\" is due in 24 hours", mission.title),
            actor_id: mission.created_by.clone(),
            action_id: mission_id.clone(),
            is_read: false,
            created_at: now_ms,
        };

        let event = Event::MissionReminder {
            mission_id: mission_id.clone(),
            mission,
        };
        let payload = build_payload(&event, "");

        let (record_result, push_result) = tokio::join!(
            self.create_notification(record),
            self.push_to_user(&assignee, &payload),
        );
        if let Err(e) = record_result {
            warn!(error = %e, "Failed to write reminder notification record");
        }
        let pushed = match push_result {
            Ok(pushed) => pushed,
            Err(e) => {
                warn!(error = %e, "Reminder push failed");
                false
            }
        };

        // Latch last: once set, no later sweep touches this mission.
        let mut batch = WriteBatch::new();
        batch.update(MISSIONS, &mission_id, fields(&[("reminderSent", json!(true))]));
        self.store.commit(batch).await?;

        Ok(pushed)
    }
}
