//! Retention pruning: old notifications, old messages, expired friend
//! requests.  Nothing younger than its retention window is ever deleted.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use rally_shared::constants::{
    conversation_messages, friend_request_retention, message_retention,
    notification_retention, CONVERSATIONS, FRIEND_REQUESTS, NOTIFICATIONS,
};
use rally_store::{Filter, WriteBatch};

use crate::error::Result;
use crate::join::settle_all;

use super::{JobReport, MaintenanceJobs};

impl MaintenanceJobs {
    /// Delete notifications older than 30 days in a single atomic batch.
    pub(crate) async fn prune_notifications(&self, now: DateTime<Utc>) -> Result<JobReport> {
        let cutoff = (now - notification_retention()).timestamp_millis();
        let old = self
            .store
            .query(NOTIFICATIONS, &Filter::new().field_lt("createdAt", cutoff))
            .await?;

        if old.is_empty() {
            debug!("No old notifications to delete");
            return Ok(JobReport::default());
        }

        let mut batch = WriteBatch::new();
        for doc in &old {
            batch.delete(NOTIFICATIONS, &doc.id);
        }
        self.store.commit(batch).await?;

        info!(deleted = old.len(), "Pruned old notifications");
        Ok(JobReport {
            examined: old.len(),
            mutated: old.len(),
            pushes_sent: 0,
        })
    }

    /// Delete messages older than 90 days, one batch per conversation.
    /// Conversations are cleaned concurrently and independently: one
    /// failing batch leaves the others' deletions in place.
    pub(crate) async fn prune_messages(&self, now: DateTime<Utc>) -> Result<JobReport> {
        let cutoff = (now - message_retention()).timestamp_millis();
        let conversations = self.store.query(CONVERSATIONS, &Filter::all()).await?;

        let sweeps: Vec<_> = conversations
            .iter()
            .map(|conversation| self.prune_conversation(conversation.id.clone(), cutoff))
            .collect();

        let mut deleted = 0;
        for result in settle_all(sweeps).await {
            match result {
                Ok(count) => deleted += count,
                Err(e) => warn!(error = %e, "Conversation sweep failed"),
            }
        }

        info!(deleted, "Pruned old messages");
        Ok(JobReport {
            examined: deleted,
            mutated: deleted,
            pushes_sent: 0,
        })
    }

    async fn prune_conversation(&self, conversation_id: String, cutoff: i64) -> Result<usize> {
        let path = conversation_messages(&conversation_id);
        let old = self
            .store
            .query(&path, &Filter::new().field_lt("timestamp", cutoff))
            .await?;

        if old.is_empty() {
            return Ok(0);
        }

        let mut batch = WriteBatch::new();
        for doc in &old {
            batch.delete(&path, &doc.id);
        }
        self.store.commit(batch).await?;
        Ok(old.len())
    }

    /// Delete friend requests still pending after 30 days, one batch.
    pub(crate) async fn expire_friend_requests(&self, now: DateTime<Utc>) -> Result<JobReport> {
        let cutoff = (now - friend_request_retention()).timestamp_millis();
        let expired = self
            .store
            .query(
                FRIEND_REQUESTS,
                &Filter::new()
                    .field_eq("status", "pending")
                    .field_lt("createdAt", cutoff),
            )
            .await?;

        if expired.is_empty() {
            debug!("No friend requests to expire");
            return Ok(JobReport::default());
        }

        let mut batch = WriteBatch::new();
        for doc in &expired {
            batch.delete(FRIEND_REQUESTS, &doc.id);
        }
        self.store.commit(batch).await?;

        info!(expired = expired.len(), "Expired old friend requests");
        Ok(JobReport {
            examined: expired.len(),
            mutated: expired.len(),
            pushes_sent: 0,
        })
    }
}
