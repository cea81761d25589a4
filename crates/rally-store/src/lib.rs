//! # rally-store
//!
//! The document-store capability consumed by the Rally engine.
//!
//! The backing store is a managed document database: collections of JSON
//! documents addressed by string id, simple indexed-field predicates, and
//! atomic multi-write batches.  This crate defines that capability as the
//! [`DocumentStore`] trait plus the value types it speaks
//! ([`Document`], [`Filter`], [`WriteBatch`]), and ships [`MemoryStore`],
//! an in-process implementation with the same fail-whole batch semantics,
//! used by the server binary and by every test in the workspace.

pub mod batch;
pub mod document;
pub mod filter;
pub mod memory;
pub mod store;

mod error;

pub use batch::{WriteBatch, WriteOp};
pub use document::Document;
pub use error::{Result, StoreError};
pub use filter::Filter;
pub use memory::MemoryStore;
pub use store::DocumentStore;
