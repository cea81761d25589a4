//! The closed union of domain events the engine reacts to.
//!
//! Each variant carries the already-decoded subject document plus the ids
//! needed to build the push payload, so downstream code never re-parses
//! raw JSON or guesses at which fields are present.

use crate::models::{FriendRequest, Message, Mission};

/// Something happened that may warrant notifying users.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A message was posted in a conversation.
    MessageCreated {
        conversation_id: String,
        message_id: String,
        message: Message,
    },
    /// A friend request was created.
    FriendRequestCreated {
        request_id: String,
        request: FriendRequest,
    },
    /// A mission was created with an assignee.
    MissionAssigned { mission_id: String, mission: Mission },
    /// A mission's deadline passed while it was still in progress.
    MissionOverdue { mission_id: String, mission: Mission },
    /// A mission is due within the reminder window.
    MissionReminder { mission_id: String, mission: Mission },
}

impl Event {
    /// The user who caused the event; push fan-out excludes this user.
    pub fn actor_id(&self) -> &str {
        match self {
            Event::MessageCreated { message, .. } => &message.sender_id,
            Event::FriendRequestCreated { request, .. } => &request.sender_id,
            Event::MissionAssigned { mission, .. }
            | Event::MissionOverdue { mission, .. }
            | Event::MissionReminder { mission, .. } => &mission.created_by,
        }
    }

    /// Short label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::MessageCreated { .. } => "message_created",
            Event::FriendRequestCreated { .. } => "friend_request_created",
            Event::MissionAssigned { .. } => "mission_assigned",
            Event::MissionOverdue { .. } => "mission_overdue",
            Event::MissionReminder { .. } => "mission_reminder",
        }
    }
}
