//! Leaderboard recomputation.

use serde_json::json;
use tracing::{debug, info};

use rally_shared::constants::{MISSIONS, USERS, POINTS_PER_COMPLETED_MISSION};
use rally_shared::models::MissionStatus;
use rally_store::batch::fields;
use rally_store::{Filter, WriteBatch};

use crate::error::Result;

use super::{JobReport, MaintenanceJobs};

#[derive(Debug)]
struct Ranking {
    user_id: String,
    score: i64,
    completed: usize,
}

impl MaintenanceJobs {
    /// Recompute every user's rank and score from their completed
    /// missions, and write the whole leaderboard in one atomic batch.
    ///
    /// Ties break by user id ascending, so reruns over unchanged data
    /// produce identical ranks.
    pub(crate) async fn update_leaderboard(&self) -> Result<JobReport> {
        let users = self.store.query(USERS, &Filter::all()).await?;
        if users.is_empty() {
            debug!("No users to rank");
            return Ok(JobReport::default());
        }

        let mut rankings = Vec::with_capacity(users.len());
        for user in &users {
            let completed = self
                .store
                .query(
                    MISSIONS,
                    &Filter::new()
                        .field_eq("assignedTo", user.id.as_str())
                        .field_eq("status", MissionStatus::Completed.as_str()),
                )
                .await?
                .len();

            rankings.push(Ranking {
                user_id: user.id.clone(),
                score: completed as i64 * POINTS_PER_COMPLETED_MISSION,
                completed,
            });
        }

        rankings.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });

        let mut batch = WriteBatch::new();
        for (index, ranking) in rankings.iter().enumerate() {
            batch.update(
                USERS,
                &ranking.user_id,
                fields(&[
                    ("rank", json!(index + 1)),
                    ("score", json!(ranking.score)),
                    ("completedMissions", json!(ranking.completed)),
                ]),
            );
        }
        self.store.commit(batch).await?;

        info!(users = rankings.len(), "Updated leaderboard");
        Ok(JobReport {
            examined: rankings.len(),
            mutated: rankings.len(),
            pushes_sent: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use rally_store::{DocumentStore, MemoryStore};

    use crate::dispatch::RecordingDispatcher;
    use crate::jobs::MaintenanceJobs;

    fn jobs(store: Arc<MemoryStore>) -> MaintenanceJobs {
        MaintenanceJobs::new(store, Arc::new(RecordingDispatcher::new()))
    }

    async fn completed_missions(store: &MemoryStore, assignee: &str, count: usize) {
        for i in 0..count {
            store
                .insert(
                    "missions",
                    &format!("{assignee}-m{i}"),
                    json!({
                        "createdBy": "lead",
                        "assignedTo": assignee,
                        "title": "t",
                        "status": "completed",
                        "deadline": 0,
                    }),
                )
                .await;
        }
    }

    #[tokio::test]
    async fn test_ranks_by_completed_missions() {
        let store = Arc::new(MemoryStore::new());
        for id in ["u1", "u2", "u3"] {
            store.insert("users", id, json!({})).await;
        }
        completed_missions(&store, "u1", 2).await;
        completed_missions(&store, "u3", 5).await;
        // An in-progress mission must not count.
        store
            .insert(
                "missions",
                "u2-wip",
                json!({ "assignedTo": "u2", "status": "in-progress", "deadline": 0 }),
            )
            .await;

        let report = jobs(store.clone()).update_leaderboard().await.unwrap();
        assert_eq!(report.mutated, 3);

        let u3 = store.get("users", "u3").await.unwrap().unwrap();
        assert_eq!(u3.data["rank"], 1);
        assert_eq!(u3.data["score"], 500);
        assert_eq!(u3.data["completedMissions"], 5);

        let u1 = store.get("users", "u1").await.unwrap().unwrap();
        assert_eq!(u1.data["rank"], 2);
        assert_eq!(u1.data["score"], 200);

        let u2 = store.get("users", "u2").await.unwrap().unwrap();
        assert_eq!(u2.data["rank"], 3);
        assert_eq!(u2.data["score"], 0);
        assert_eq!(u2.data["completedMissions"], 0);
    }

    #[tokio::test]
    async fn test_ties_break_by_user_id() {
        let store = Arc::new(MemoryStore::new());
        store.insert("users", "zed", json!({})).await;
        store.insert("users", "amy", json!({})).await;

        jobs(store.clone()).update_leaderboard().await.unwrap();

        let amy = store.get("users", "amy").await.unwrap().unwrap();
        let zed = store.get("users", "zed").await.unwrap().unwrap();
        assert_eq!(amy.data["rank"], 1);
        assert_eq!(zed.data["rank"], 2);
    }

    #[tokio::test]
    async fn test_empty_user_collection_is_a_noop() {
        let store = Arc::new(MemoryStore::new());
        let report = jobs(store).update_leaderboard().await.unwrap();
        assert_eq!(report, Default::default());
    }
}
