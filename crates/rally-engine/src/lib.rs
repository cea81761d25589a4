//! # rally-engine
//!
//! The maintenance and notification fan-out engine.
//!
//! This crate holds everything that reacts to document writes or scheduler
//! ticks:
//! - **Trigger handlers** fan out pushes for newly created messages,
//!   friend requests, and missions
//! - **Scheduled jobs** prune stale records, flag overdue missions, send
//!   deadline reminders, and recompute the leaderboard
//! - **Lobby seeder** installs the static lobby fixtures idempotently
//!
//! Handlers and jobs take the store and dispatcher capabilities as
//! explicit `Arc<dyn …>` arguments; nothing here owns a schedule or a
//! global client handle.  Every top-level invocation catches its own
//! errors: a handler or scheduled job never propagates a failure to its
//! invoker.

pub mod dispatch;
pub mod fanout;
pub mod jobs;
pub mod join;
pub mod resolve;
pub mod seed;

mod error;

pub use dispatch::{DispatchError, Dispatcher, LoggingDispatcher, RecordingDispatcher};
pub use error::{EngineError, Result};
pub use fanout::TriggerHandlers;
pub use jobs::{JobKind, JobReport, MaintenanceJobs, Schedule};
pub use seed::{seed_lobbies, SeedOutcome, SeedStatus};
