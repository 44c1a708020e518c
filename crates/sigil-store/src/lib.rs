//! # sigil-store
//!
//! In-memory reference implementation of the SIGIL `DocumentStore`.
//!
//! The production deployment talks to a managed document database; this
//! crate provides the same contract for demos and tests, including the
//! direct-write surface (`overwrite`) that makes tamper scenarios
//! reproducible in-process.

pub mod memory;

pub use memory::{InMemoryDocumentStore, StoredDocument};
