//! # sigil-verify
//!
//! Re-verification of stored SIGIL receipts.
//!
//! Verification fetches the record fresh from the document store,
//! validates its structure against the sealed-record JSON Schema, then
//! recomputes both digests from the fields as currently stored:
//!
//! 1. the salted hash over the canonical protected fields, compared to
//!    the stored `hash`;
//! 2. the integrity checksum binding that hash to the receipt's id, item
//!    count, and total, compared to the stored `integrityChecksum`.
//!
//! A mismatch on either comparison is a normal outcome — tampering
//! detected — reported through [`sigil_contracts::ReceiptVerification`].
//! Errors are reserved for "could not check" conditions: unknown id,
//! structurally broken record, digest failure.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use sigil_verify::VerificationService;
//!
//! let service = VerificationService::new(Box::new(store));
//! let outcome = service.verify("RCP-LX2M3-A1B2C3D4E")?;
//! if outcome.verification.is_authentic() {
//!     // safe to display outcome.record
//! }
//! ```

pub mod schema;
pub mod service;

pub use schema::validate_stored_record;
pub use service::{verify_receipt_hash, VerificationService};
