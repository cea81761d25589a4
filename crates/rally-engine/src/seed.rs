//! Idempotent lobby seeding.
//!
//! The five default lobbies are static reference data.  Seeding checks
//! each id first and only stages missing ones into a single batch, so
//! re-running never duplicates or overwrites anything.  The check-then-act
//! race with a concurrent seeder is accepted: set semantics make the later
//! identical write harmless.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use rally_shared::constants::LOBBIES;
use rally_shared::models::{Lobby, LobbyType};
use rally_store::{DocumentStore, WriteBatch};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedStatus {
    Created,
    AlreadyExists,
}

/// Per-lobby outcome of a seeding run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedOutcome {
    pub id: String,
    pub status: SeedStatus,
    pub name: String,
}

fn lobby_fixtures(now: DateTime<Utc>) -> Vec<(&'static str, Lobby)> {
    let lobby = |name: &str, topic: &str, description: &str, emoji: &str, kind| Lobby {
        name: name.to_string(),
        topic: topic.to_string(),
        description: description.to_string(),
        icon_emoji: emoji.to_string(),
        online_count: 0,
        total_members: 0,
        lobby_type: kind,
        is_active: true,
        created_at: now.timestamp_millis(),
    };

    vec![
        (
            "global",
            lobby(
                "Global Lobby",
                "General Discussion",
                "Main community space for everyone",
                "🌍",
                LobbyType::Global,
            ),
        ),
        (
            "gaming",
            lobby(
                "Gaming Zone",
                "Gaming & Esports",
                "Talk gaming, share clips, find teammates",
                "🎮",
                LobbyType::Topic,
            ),
        ),
        (
            "coding",
            lobby(
                "Code & Build",
                "Programming & Development",
                "Developers, projects, tech discussions",
                "💻",
                LobbyType::Topic,
            ),
        ),
        (
            "hustle",
            lobby(
                "Hustle Hub",
                "Business & Entrepreneurship",
                "Startups, side hustles, making money moves",
                "💸",
                LobbyType::Topic,
            ),
        ),
        (
            "random",
            lobby(
                "Random Chat",
                "Anything Goes",
                "Chill, vibe, talk about whatever",
                "💬",
                LobbyType::Topic,
            ),
        ),
    ]
}

/// Seed the default lobbies, skipping any that already exist.  All
/// creations commit in one atomic batch; `now` becomes the creation
/// timestamp of every lobby created in this run.
pub async fn seed_lobbies(
    store: &dyn DocumentStore,
    now: DateTime<Utc>,
) -> Result<Vec<SeedOutcome>> {
    let mut batch = WriteBatch::new();
    let mut outcomes = Vec::new();

    for (id, lobby) in lobby_fixtures(now) {
        if store.get(LOBBIES, id).await?.is_some() {
            outcomes.push(SeedOutcome {
                id: id.to_string(),
                status: SeedStatus::AlreadyExists,
                name: lobby.name,
            });
            continue;
        }

        outcomes.push(SeedOutcome {
            id: id.to_string(),
            status: SeedStatus::Created,
            name: lobby.name.clone(),
        });
        batch.set(LOBBIES, id, json!(lobby));
    }

    let created = batch.len();
    if !batch.is_empty() {
        store.commit(batch).await?;
    }

    info!(created, skipped = outcomes.len() - created, "Lobby seeding complete");
    Ok(outcomes)
}
