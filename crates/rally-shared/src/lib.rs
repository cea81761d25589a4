//! # rally-shared
//!
//! Domain models and pure logic shared by the Rally backend crates.
//!
//! Everything in here is I/O-free: the typed document models, the closed
//! `Event` union describing what happened, the push payload builder, and
//! the collection-name / retention-window constants.

pub mod constants;
pub mod events;
pub mod models;
pub mod payload;

pub use events::Event;
pub use payload::{build_payload, PushPayload};
