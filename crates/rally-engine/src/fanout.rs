//! Trigger handlers for newly created documents.
//!
//! One handler per event type.  Each invocation resolves recipients,
//! builds the payload once, and dispatches to every token-bearing
//! recipient concurrently.  Dispatch failures are logged and swallowed;
//! the handler always returns normally so the hosting trigger
//! infrastructure never retries (a retry would duplicate sends).

use std::sync::Arc;

use tracing::{error, info, warn};

use rally_shared::models::{FriendRequest, Message, Mission};
use rally_shared::{build_payload, Event};
use rally_store::DocumentStore;

use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::join::{settle_all, tally};
use crate::resolve::{resolve_actor_name, resolve_recipients};

/// Fan-out handlers for document-creation triggers.
pub struct TriggerHandlers {
    store: Arc<dyn DocumentStore>,
    dispatcher: Arc<dyn Dispatcher>,
}

impl TriggerHandlers {
    pub fn new(store: Arc<dyn DocumentStore>, dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self { store, dispatcher }
    }

    /// A message was created under `conversations/{id}/messages`.
    pub async fn on_message_created(
        &self,
        conversation_id: &str,
        message_id: &str,
        message: Message,
    ) {
        self.handle(Event::MessageCreated {
            conversation_id: conversation_id.to_string(),
            message_id: message_id.to_string(),
            message,
        })
        .await;
    }

    /// A friend request document was created.
    pub async fn on_friend_request_created(&self, request_id: &str, request: FriendRequest) {
        self.handle(Event::FriendRequestCreated {
            request_id: request_id.to_string(),
            request,
        })
        .await;
    }

    /// A mission document was created.  Without an assignee there is
    /// nobody to notify and the handler takes no action.
    pub async fn on_mission_created(&self, mission_id: &str, mission: Mission) {
        if mission.assigned_to.is_none() {
            return;
        }
        self.handle(Event::MissionAssigned {
            mission_id: mission_id.to_string(),
            mission,
        })
        .await;
    }

    /// Invocation boundary: everything below is caught and logged here so
    /// nothing propagates to the trigger infrastructure.
    async fn handle(&self, event: Event) {
        let kind = event.kind();
        match self.fan_out(&event).await {
            Ok((sent, failed)) => {
                info!(event = kind, sent, failed, "Fan-out complete");
            }
            Err(e) => {
                error!(event = kind, error = %e, "Fan-out aborted");
            }
        }
    }

    /// Resolve, build, dispatch.  Returns `(sent, failed)` dispatch counts.
    async fn fan_out(&self, event: &Event) -> Result<(usize, usize)> {
        let recipients = resolve_recipients(self.store.as_ref(), event).await?;
        let actor_name = resolve_actor_name(self.store.as_ref(), event.actor_id()).await?;
        let payload = build_payload(event, &actor_name);

        let sends: Vec<_> = recipients
            .iter()
            .filter_map(|r| r.fcm_token.as_deref())
            .map(|token| self.dispatcher.send(token, &payload))
            .collect();

        let results = settle_all(sends).await;
        for result in &results {
            if let Err(e) = result {
                warn!(event = event.kind(), error = %e, "Push dispatch failed");
            }
        }
        Ok(tally(&results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rally_shared::models::MessageType;
    use rally_store::{Document, Filter, MemoryStore, StoreError, WriteBatch};
    use serde_json::json;

    fn handlers(store: Arc<MemoryStore>) -> (TriggerHandlers, Arc<crate::RecordingDispatcher>) {
        let dispatcher = Arc::new(crate::RecordingDispatcher::new());
        (
            TriggerHandlers::new(store, dispatcher.clone()),
            dispatcher,
        )
    }

    async fn three_way_conversation(store: &MemoryStore) {
        store
            .insert("conversations", "c1", json!({ "participants": ["a", "b", "c"] }))
            .await;
        store
            .insert("users", "a", json!({ "displayName": "Alice", "fcmToken": "tok-a" }))
            .await;
        store.insert("users", "b", json!({ "fcmToken": "tok-b" })).await;
        store.insert("users", "c", json!({ "fcmToken": "tok-c" })).await;
    }

    fn text_message(sender: &str, content: &str) -> Message {
        Message {
            sender_id: sender.into(),
            message_type: MessageType::Text,
            content: content.into(),
            timestamp: 0,
        }
    }

    #[tokio::test]
    async fn test_message_fans_out_to_other_participants() {
        let store = Arc::new(MemoryStore::new());
        three_way_conversation(&store).await;
        let (handlers, dispatcher) = handlers(store);

        handlers
            .on_message_created("c1", "m1", text_message("a", "hi"))
            .await;

        let sent = dispatcher.sent();
        assert_eq!(sent.len(), 2);
        let tokens: Vec<_> = sent.iter().map(|s| s.token.as_str()).collect();
        assert!(tokens.contains(&"tok-b"));
        assert!(tokens.contains(&"tok-c"));
        for push in &sent {
            assert_eq!(push.payload.title, "Alice");
            assert_eq!(push.payload.body, "hi");
        }
    }

    #[tokio::test]
    async fn test_sender_without_profile_titles_someone() {
        let store = Arc::new(MemoryStore::new());
        store
            .insert("conversations", "c1", json!({ "participants": ["ghost", "b"] }))
            .await;
        store.insert("users", "b", json!({ "fcmToken": "tok-b" })).await;
        let (handlers, dispatcher) = handlers(store);

        handlers
            .on_message_created("c1", "m1", text_message("ghost", "hi"))
            .await;

        let sent = dispatcher.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].payload.title, "Someone");
    }

    #[tokio::test]
    async fn test_one_failing_recipient_does_not_block_others() {
        let store = Arc::new(MemoryStore::new());
        three_way_conversation(&store).await;
        let (handlers, dispatcher) = handlers(store);
        dispatcher.fail_token("tok-b");

        handlers
            .on_message_created("c1", "m1", text_message("a", "hi"))
            .await;

        let sent = dispatcher.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].token, "tok-c");
    }

    #[tokio::test]
    async fn test_recipient_without_token_is_skipped() {
        let store = Arc::new(MemoryStore::new());
        store
            .insert("conversations", "c1", json!({ "participants": ["a", "b"] }))
            .await;
        store.insert("users", "a", json!({ "displayName": "Alice" })).await;
        store.insert("users", "b", json!({})).await;
        let (handlers, dispatcher) = handlers(store);

        handlers
            .on_message_created("c1", "m1", text_message("a", "hi"))
            .await;

        assert!(dispatcher.sent().is_empty());
    }

    #[tokio::test]
    async fn test_friend_request_notifies_receiver() {
        let store = Arc::new(MemoryStore::new());
        store.insert("users", "bob", json!({ "displayName": "Bob" })).await;
        store.insert("users", "carol", json!({ "fcmToken": "tok-c" })).await;
        let (handlers, dispatcher) = handlers(store);

        handlers
            .on_friend_request_created(
                "r1",
                FriendRequest {
                    sender_id: "bob".into(),
                    receiver_id: "carol".into(),
                    ..Default::default()
                },
            )
            .await;

        let sent = dispatcher.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].payload.title, "New Friend Request");
        assert_eq!(sent[0].payload.body, "Bob sent you a friend request");
    }

    #[tokio::test]
    async fn test_unassigned_mission_is_ignored() {
        let store = Arc::new(MemoryStore::new());
        let (handlers, dispatcher) = handlers(store);

        handlers
            .on_mission_created(
                "m1",
                Mission {
                    created_by: "lead".into(),
                    assigned_to: None,
                    title: "x".into(),
                    ..Default::default()
                },
            )
            .await;

        assert!(dispatcher.sent().is_empty());
    }

    #[tokio::test]
    async fn test_mission_assignment_notifies_assignee() {
        let store = Arc::new(MemoryStore::new());
        store.insert("users", "lead", json!({ "displayName": "Lead" })).await;
        store.insert("users", "dev", json!({ "fcmToken": "tok-d" })).await;
        let (handlers, dispatcher) = handlers(store);

        handlers
            .on_mission_created(
                "m1",
                Mission {
                    created_by: "lead".into(),
                    assigned_to: Some("dev".into()),
                    title: "Fix the roof".into(),
                    ..Default::default()
                },
            )
            .await;

        let sent = dispatcher.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].payload.body, "Lead assigned you: Fix the roof");
    }

    /// Store that fails every call, for exercising the handler boundary.
    struct BrokenStore;

    #[async_trait]
    impl DocumentStore for BrokenStore {
        async fn get(&self, _: &str, _: &str) -> rally_store::Result<Option<Document>> {
            Err(StoreError::Backend("unavailable".into()))
        }
        async fn query(&self, _: &str, _: &Filter) -> rally_store::Result<Vec<Document>> {
            Err(StoreError::Backend("unavailable".into()))
        }
        async fn commit(&self, _: WriteBatch) -> rally_store::Result<()> {
            Err(StoreError::Backend("unavailable".into()))
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_swallowed_at_the_boundary() {
        let dispatcher = Arc::new(crate::RecordingDispatcher::new());
        let handlers = TriggerHandlers::new(Arc::new(BrokenStore), dispatcher.clone());

        // Must return normally despite the store being down.
        handlers
            .on_message_created("c1", "m1", text_message("a", "hi"))
            .await;

        assert!(dispatcher.sent().is_empty());
    }
}
