//! # sigil-contracts
//!
//! Shared types, identifiers, and error contracts for the SIGIL receipt
//! pipeline.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate — only data definitions and error types.

pub mod error;
pub mod ident;
pub mod receipt;
pub mod verify;

pub use error::{SigilError, SigilResult};
pub use ident::{DocId, ReceiptId};
pub use receipt::{Receipt, ReceiptDraft, ReceiptItem, SealedReceipt};
pub use verify::{ReceiptVerification, Verdict, VerificationOutcome};
