//! Collection names, retention windows, and scoring constants.

use chrono::Duration;

/// Top-level collection names.
pub const USERS: &str = "users";
pub const CONVERSATIONS: &str = "conversations";
pub const FRIEND_REQUESTS: &str = "friendRequests";
pub const MISSIONS: &str = "missions";
pub const NOTIFICATIONS: &str = "notifications";
pub const LOBBIES: &str = "lobbies";

/// Path of the messages subcollection under a conversation.
pub fn conversation_messages(conversation_id: &str) -> String {
    format!("{CONVERSATIONS}/{conversation_id}/messages")
}

/// Notifications older than this are pruned.
pub fn notification_retention() -> Duration {
    Duration::days(30)
}

/// Messages older than this are pruned.
pub fn message_retention() -> Duration {
    Duration::days(90)
}

/// Pending friend requests older than this expire.
pub fn friend_request_retention() -> Duration {
    Duration::days(30)
}

/// How far ahead of a deadline the reminder sweep looks.
pub fn reminder_window() -> Duration {
    Duration::hours(24)
}

/// Leaderboard points awarded per completed mission.
pub const POINTS_PER_COMPLETED_MISSION: i64 = 100;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_subcollection_path() {
        assert_eq!(
            conversation_messages("conv-1"),
            "conversations/conv-1/messages"
        );
    }
}
