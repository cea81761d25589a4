//! Scheduled maintenance jobs.
//!
//! Every job follows the same shape: query a predicate, compute the
//! action set, apply it via batches, optionally fire notifications.  Jobs
//! take `now` explicitly so tests control the clock, and return a
//! [`JobReport`] of what they touched.  The scheduler calls
//! [`MaintenanceJobs::run_logged`], which catches everything: a job never
//! panics or propagates an error out of its top-level invocation, and
//! already-committed batches stand (partial progress, no rollback).

mod leaderboard;
mod missions;
mod retention;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use rally_shared::constants::NOTIFICATIONS;
use rally_shared::models::Notification;
use rally_shared::PushPayload;
use rally_store::{DocumentStore, WriteBatch};

use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::resolve::fetch_token;

// ---------------------------------------------------------------------------
// Job registry
// ---------------------------------------------------------------------------

/// Every maintenance job the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    PruneNotifications,
    PruneMessages,
    ExpireFriendRequests,
    MarkOverdueMissions,
    SendMissionReminders,
    UpdateLeaderboard,
}

impl JobKind {
    pub const ALL: [JobKind; 6] = [
        JobKind::PruneNotifications,
        JobKind::PruneMessages,
        JobKind::ExpireFriendRequests,
        JobKind::MarkOverdueMissions,
        JobKind::SendMissionReminders,
        JobKind::UpdateLeaderboard,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            JobKind::PruneNotifications => "prune_notifications",
            JobKind::PruneMessages => "prune_messages",
            JobKind::ExpireFriendRequests => "expire_friend_requests",
            JobKind::MarkOverdueMissions => "mark_overdue_missions",
            JobKind::SendMissionReminders => "send_mission_reminders",
            JobKind::UpdateLeaderboard => "update_leaderboard",
        }
    }

    pub fn from_name(name: &str) -> Option<JobKind> {
        Self::ALL.into_iter().find(|job| job.name() == name)
    }
}

/// What a job invocation touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct JobReport {
    /// Documents matched by the job's predicate.
    pub examined: usize,
    /// Documents deleted or updated.
    pub mutated: usize,
    /// Pushes successfully dispatched.
    pub pushes_sent: usize,
}

// ---------------------------------------------------------------------------
// Schedule descriptors
// ---------------------------------------------------------------------------

/// When a job runs.  The cron expression (UTC) is descriptive metadata for
/// external scheduler infrastructure; the in-process scheduler binds the
/// plain cadence.  The job itself stays invocable on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub job: JobKind,
    /// Cron expression, UTC.
    pub cron: &'static str,
    /// Interval cadence for the in-process scheduler.
    pub every: Duration,
}

const HOUR: u64 = 60 * 60;
const DAY: u64 = 24 * HOUR;

/// The fixed schedule table for all maintenance jobs.
pub fn schedules() -> [Schedule; 6] {
    [
        Schedule {
            job: JobKind::PruneNotifications,
            cron: "0 2 * * *",
            every: Duration::from_secs(DAY),
        },
        Schedule {
            job: JobKind::PruneMessages,
            cron: "0 3 * * 0",
            every: Duration::from_secs(7 * DAY),
        },
        Schedule {
            job: JobKind::ExpireFriendRequests,
            cron: "0 4 * * 0",
            every: Duration::from_secs(7 * DAY),
        },
        Schedule {
            job: JobKind::MarkOverdueMissions,
            cron: "0 * * * *",
            every: Duration::from_secs(HOUR),
        },
        Schedule {
            job: JobKind::SendMissionReminders,
            cron: "0 */6 * * *",
            every: Duration::from_secs(6 * HOUR),
        },
        Schedule {
            job: JobKind::UpdateLeaderboard,
            cron: "0 3 * * *",
            every: Duration::from_secs(DAY),
        },
    ]
}

// ---------------------------------------------------------------------------
// Job runner
// ---------------------------------------------------------------------------

/// All scheduled maintenance jobs, sharing the store and dispatcher
/// capabilities.
pub struct MaintenanceJobs {
    pub(crate) store: Arc<dyn DocumentStore>,
    pub(crate) dispatcher: Arc<dyn Dispatcher>,
}

impl MaintenanceJobs {
    pub fn new(store: Arc<dyn DocumentStore>, dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self { store, dispatcher }
    }

    /// Run one job on demand.
    pub async fn run(&self, job: JobKind, now: DateTime<Utc>) -> Result<JobReport> {
        match job {
            JobKind::PruneNotifications => self.prune_notifications(now).await,
            JobKind::PruneMessages => self.prune_messages(now).await,
            JobKind::ExpireFriendRequests => self.expire_friend_requests(now).await,
            JobKind::MarkOverdueMissions => self.mark_overdue_missions(now).await,
            JobKind::SendMissionReminders => self.send_mission_reminders(now).await,
            JobKind::UpdateLeaderboard => self.update_leaderboard().await,
        }
    }

    /// Scheduler entry point.  Catches and logs any failure so the tick
    /// loop keeps running.
    pub async fn run_logged(&self, job: JobKind, now: DateTime<Utc>) {
        match self.run(job, now).await {
            Ok(report) => {
                info!(
                    job = job.name(),
                    examined = report.examined,
                    mutated = report.mutated,
                    pushes = report.pushes_sent,
                    "Job complete"
                );
            }
            Err(e) => {
                error!(job = job.name(), error = %e, "Job failed");
            }
        }
    }

    /// Write an in-app notification record with a fresh id.
    pub(crate) async fn create_notification(
        &self,
        record: Notification,
    ) -> Result<()> {
        let id = Uuid::new_v4().to_string();
        let mut batch = WriteBatch::new();
        batch.set(NOTIFICATIONS, &id, json!(record));
        self.store.commit(batch).await?;
        Ok(())
    }

    /// Dispatch a push to a user if they have a device token.  Returns
    /// whether a push went out.
    pub(crate) async fn push_to_user(
        &self,
        user_id: &str,
        payload: &PushPayload,
    ) -> Result<bool> {
        let Some(token) = fetch_token(self.store.as_ref(), user_id).await? else {
            return Ok(false);
        };
        self.dispatcher.send(&token, payload).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_names_round_trip() {
        for job in JobKind::ALL {
            assert_eq!(JobKind::from_name(job.name()), Some(job));
        }
        assert_eq!(JobKind::from_name("nope"), None);
    }

    #[test]
    fn test_schedule_table_covers_every_job() {
        let table = schedules();
        for job in JobKind::ALL {
            assert!(table.iter().any(|s| s.job == job));
        }
    }

    #[test]
    fn test_overdue_sweep_is_hourly() {
        let schedule = schedules()
            .into_iter()
            .find(|s| s.job == JobKind::MarkOverdueMissions)
            .unwrap();
        assert_eq!(schedule.cron, "0 * * * *");
        assert_eq!(schedule.every, Duration::from_secs(3600));
    }
}
