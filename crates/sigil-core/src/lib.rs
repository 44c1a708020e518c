//! # sigil-core
//!
//! The issuance pipeline and external-collaborator contracts for SIGIL.
//!
//! This crate provides:
//! - The `DocumentStore` trait (the store is an external, Firestore-like
//!   service; `sigil-store` ships the in-memory reference implementation)
//! - The `ReceiptIssuer`, which seals and persists receipts in one step
//! - `ServiceConfig`, the TOML-backed deployment configuration
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sigil_core::{ReceiptIssuer, ServiceConfig, traits::DocumentStore};
//!
//! let issuer = ReceiptIssuer::new(Box::new(store));
//! let sealed = issuer.issue(draft, "uid-from-identity-provider")?;
//! ```

pub mod config;
pub mod issuer;
pub mod traits;

pub use config::ServiceConfig;
pub use issuer::ReceiptIssuer;
