//! Typed views of the JSON documents stored in each collection.
//!
//! Documents are written by several clients, so every model is lenient:
//! optional fields default rather than fail, and the string enums carry an
//! `Unknown` catch-all so an unrecognized value decodes instead of
//! poisoning the whole document.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A user profile. Leaderboard fields are absent until the first recompute.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub display_name: Option<String>,
    pub username: Option<String>,
    /// Device push token. Absent means the user cannot receive pushes.
    pub fcm_token: Option<String>,
    pub rank: Option<u32>,
    pub score: Option<i64>,
    pub completed_missions: Option<u32>,
}

impl User {
    /// Human-readable name shown as a push title: `displayName`, else
    /// `username`, else the literal `"Someone"`.
    pub fn display_name_or_fallback(&self) -> String {
        self.display_name
            .clone()
            .or_else(|| self.username.clone())
            .unwrap_or_else(|| "Someone".to_string())
    }
}

// ---------------------------------------------------------------------------
// Conversation & Message
// ---------------------------------------------------------------------------

/// A chat conversation; `participants` is the recipient set for fan-out.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Conversation {
    pub participants: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    #[default]
    Text,
    Image,
    Gif,
    Voice,
    File,
    #[serde(other)]
    Unknown,
}

/// A single chat message. Immutable once created; read only for
/// notification fan-out and age-based pruning.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Message {
    pub sender_id: String,
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub content: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

// ---------------------------------------------------------------------------
// FriendRequest
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Pending,
    Accepted,
    Declined,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FriendRequest {
    pub sender_id: String,
    pub receiver_id: String,
    pub status: RequestStatus,
    /// Epoch milliseconds.
    pub created_at: i64,
}

// ---------------------------------------------------------------------------
// Mission
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum MissionStatus {
    #[default]
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
    #[serde(rename = "overdue")]
    Overdue,
    #[serde(other)]
    Unknown,
}

impl MissionStatus {
    /// Wire representation, used when updating the status field in place.
    pub fn as_str(&self) -> &'static str {
        match self {
            MissionStatus::InProgress => "in-progress",
            MissionStatus::Completed => "completed",
            MissionStatus::Overdue => "overdue",
            MissionStatus::Unknown => "unknown",
        }
    }
}

/// A mission on the board. `reminder_sent` is a one-way latch: once true,
/// the reminder sweep never touches the mission again.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Mission {
    pub created_by: String,
    pub assigned_to: Option<String>,
    pub title: String,
    pub status: MissionStatus,
    /// Epoch milliseconds.
    pub deadline: i64,
    pub reminder_sent: bool,
}

// ---------------------------------------------------------------------------
// Notification
// ---------------------------------------------------------------------------

/// An in-app notification record. Write-only from this system's point of
/// view; the retention job prunes it after 30 days.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Notification {
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub message: String,
    pub actor_id: String,
    pub action_id: String,
    pub is_read: bool,
    /// Epoch milliseconds.
    pub created_at: i64,
}

// ---------------------------------------------------------------------------
// Lobby
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LobbyType {
    #[default]
    Global,
    Topic,
}

/// Static reference data seeded once and never overwritten.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Lobby {
    pub name: String,
    pub topic: String,
    pub description: String,
    pub icon_emoji: String,
    pub online_count: u32,
    pub total_members: u32,
    #[serde(rename = "type")]
    pub lobby_type: LobbyType,
    pub is_active: bool,
    /// Epoch milliseconds, assigned at seed time.
    pub created_at: i64,
}
