//! Recipient resolution.
//!
//! Maps an event to the set of users to notify, excluding the actor, and
//! looks up each one's device token.  Missing documents are data, not
//! errors: an absent conversation yields no recipients and an absent user
//! yields a recipient without a token.

use rally_shared::constants::{CONVERSATIONS, USERS};
use rally_shared::models::{Conversation, User};
use rally_shared::Event;
use rally_store::DocumentStore;

use crate::error::Result;

/// A user that should be notified, with their device token if they have one.
#[derive(Debug, Clone, PartialEq)]
pub struct Recipient {
    pub user_id: String,
    pub fcm_token: Option<String>,
}

/// Resolve the recipients for an event.
///
/// Each recipient is looked up independently; one user without a token
/// never blocks the others.  Store failures do propagate; the handler
/// boundary catches them.
pub async fn resolve_recipients(
    store: &dyn DocumentStore,
    event: &Event,
) -> Result<Vec<Recipient>> {
    match event {
        Event::MessageCreated {
            conversation_id,
            message,
            ..
        } => {
            let Some(doc) = store.get(CONVERSATIONS, conversation_id).await? else {
                return Ok(Vec::new());
            };
            let conversation: Conversation = doc.decode().unwrap_or_default();

            let mut recipients = Vec::new();
            for participant in &conversation.participants {
                if participant == &message.sender_id {
                    continue;
                }
                recipients.push(lookup_recipient(store, participant).await?);
            }
            Ok(recipients)
        }
        Event::FriendRequestCreated { request, .. } => {
            Ok(vec![lookup_recipient(store, &request.receiver_id).await?])
        }
        Event::MissionAssigned { mission, .. }
        | Event::MissionOverdue { mission, .. }
        | Event::MissionReminder { mission, .. } => match &mission.assigned_to {
            Some(assignee) => Ok(vec![lookup_recipient(store, assignee).await?]),
            None => Ok(Vec::new()),
        },
    }
}

/// Resolve a user id to a recipient.  A missing or undecodable user
/// document behaves like an empty record: no token.
async fn lookup_recipient(store: &dyn DocumentStore, user_id: &str) -> Result<Recipient> {
    let user = fetch_user(store, user_id).await?;
    Ok(Recipient {
        user_id: user_id.to_string(),
        fcm_token: user.fcm_token,
    })
}

/// Resolve the actor's display name with the `displayName` → `username` →
/// `"Someone"` fallback chain.
pub async fn resolve_actor_name(store: &dyn DocumentStore, actor_id: &str) -> Result<String> {
    let user = fetch_user(store, actor_id).await?;
    Ok(user.display_name_or_fallback())
}

async fn fetch_user(store: &dyn DocumentStore, user_id: &str) -> Result<User> {
    Ok(store
        .get(USERS, user_id)
        .await?
        .and_then(|doc| doc.decode().ok())
        .unwrap_or_default())
}

/// Fetch a user's device token, if any.
pub async fn fetch_token(store: &dyn DocumentStore, user_id: &str) -> Result<Option<String>> {
    Ok(fetch_user(store, user_id).await?.fcm_token)
}
