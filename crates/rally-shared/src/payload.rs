//! Push payload construction.
//!
//! Pure mapping from an [`Event`] to the title/body pair shown on the
//! device plus the data envelope the client app uses for deep-linking.
//! This never fails: unknown message types produce an empty body and a
//! missing actor is rendered as `"Someone"` by the caller.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::events::Event;
use crate::models::MessageType;

/// A push notification ready to hand to the dispatcher.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    /// Deep-link envelope: always a `type` discriminator and an `actionId`,
    /// plus the contextual actor id field.
    pub data: BTreeMap<String, String>,
}

/// Build the push payload for an event.
///
/// `actor_name` is the already-resolved display name of [`Event::actor_id`].
pub fn build_payload(event: &Event, actor_name: &str) -> PushPayload {
    match event {
        Event::MessageCreated {
            conversation_id,
            message,
            ..
        } => {
            let body = match message.message_type {
                MessageType::Text => message.content.clone(),
                MessageType::Image => "📷 Sent an image".to_string(),
                MessageType::Gif => "🎬 Sent a GIF".to_string(),
                MessageType::Voice => "🎤 Sent a voice note".to_string(),
                MessageType::File => "📎 Sent a file".to_string(),
                MessageType::Unknown => String::new(),
            };
            PushPayload {
                title: actor_name.to_string(),
                body,
                data: envelope("message", conversation_id, "senderId", &message.sender_id),
            }
        }
        Event::FriendRequestCreated {
            request_id,
            request,
        } => PushPayload {
            title: "New Friend Request".to_string(),
            body: format!("{actor_name} sent you a friend request"),
            data: envelope("friendRequest", request_id, "senderId", &request.sender_id),
        },
        Event::MissionAssigned {
            mission_id,
            mission,
        } => PushPayload {
            title: "New Mission Assigned".to_string(),
            body: format!("{actor_name} assigned you: {}", mission.title),
            data: envelope("mission", mission_id, "creatorId", &mission.created_by),
        },
        Event::MissionOverdue {
            mission_id,
            mission,
        } => PushPayload {
            title: "Mission Overdue!".to_string(),
            body: format!("\"{}\" is past its deadline", mission.title),
            data: envelope("mission", mission_id, "creatorId", &mission.created_by),
        },
        Event::MissionReminder {
            mission_id,
            mission,
        } => PushPayload {
            title: "⏰ Deadline Reminder".to_string(),
            body: format!("\"{}\" is due in 24 hours", mission.title),
            data: envelope("mission", mission_id, "creatorId", &mission.created_by),
        },
    }
}

fn envelope(
    kind: &str,
    action_id: &str,
    actor_field: &str,
    actor_id: &str,
) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("type".to_string(), kind.to_string()),
        ("actionId".to_string(), action_id.to_string()),
        (actor_field.to_string(), actor_id.to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FriendRequest, Message, Mission};

    fn message_event(message_type: MessageType, content: &str) -> Event {
        Event::MessageCreated {
            conversation_id: "conv-1".into(),
            message_id: "msg-1".into(),
            message: Message {
                sender_id: "alice".into(),
                message_type,
                content: content.into(),
                timestamp: 0,
            },
        }
    }

    #[test]
    fn test_text_message_body_is_content() {
        let payload = build_payload(&message_event(MessageType::Text, "hi"), "Ada");
        assert_eq!(payload.title, "Ada");
        assert_eq!(payload.body, "hi");
        assert_eq!(payload.data["type"], "message");
        assert_eq!(payload.data["actionId"], "conv-1");
        assert_eq!(payload.data["senderId"], "alice");
    }

    #[test]
    fn test_image_body_ignores_content() {
        let payload = build_payload(
            &message_event(MessageType::Image, "http://cdn/img.png"),
            "Ada",
        );
        assert_eq!(payload.body, "📷 Sent an image");
    }

    #[test]
    fn test_media_message_bodies() {
        let cases = [
            (MessageType::Gif, "🎬 Sent a GIF"),
            (MessageType::Voice, "🎤 Sent a voice note"),
            (MessageType::File, "📎 Sent a file"),
        ];
        for (kind, expected) in cases {
            assert_eq!(build_payload(&message_event(kind, "x"), "Ada").body, expected);
        }
    }

    #[test]
    fn test_unknown_message_type_yields_empty_body() {
        let payload = build_payload(&message_event(MessageType::Unknown, "x"), "Ada");
        assert_eq!(payload.body, "");
    }

    #[test]
    fn test_friend_request_payload() {
        let event = Event::FriendRequestCreated {
            request_id: "req-7".into(),
            request: FriendRequest {
                sender_id: "bob".into(),
                receiver_id: "carol".into(),
                ..Default::default()
            },
        };
        let payload = build_payload(&event, "Bob");
        assert_eq!(payload.title, "New Friend Request");
        assert_eq!(payload.body, "Bob sent you a friend request");
        assert_eq!(payload.data["type"], "friendRequest");
        assert_eq!(payload.data["actionId"], "req-7");
    }

    #[test]
    fn test_mission_payloads() {
        let mission = Mission {
            created_by: "lead".into(),
            assigned_to: Some("dev".into()),
            title: "Fix the roof".into(),
            ..Default::default()
        };

        let assigned = build_payload(
            &Event::MissionAssigned {
                mission_id: "m-1".into(),
                mission: mission.clone(),
            },
            "Lead",
        );
        assert_eq!(assigned.title, "New Mission Assigned");
        assert_eq!(assigned.body, "Lead assigned you: Fix the roof");
        assert_eq!(assigned.data["creatorId"], "lead");

        let overdue = build_payload(
            &Event::MissionOverdue {
                mission_id: "m-1".into(),
                mission: mission.clone(),
            },
            "Lead",
        );
        assert_eq!(overdue.title, "Mission Overdue!");
        assert_eq!(overdue.body, "\"Fix the roof\" is past its deadline");

        let reminder = build_payload(
            &Event::MissionReminder {
                mission_id: "m-1".into(),
                mission,
            },
            "Lead",
        );
        assert_eq!(reminder.title, "⏰ Deadline Reminder");
        assert_eq!(reminder.body, "\"Fix the roof\" is due in 24 hours");
    }
}
