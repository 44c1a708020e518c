//! # sigil-seal
//!
//! Canonicalization and digest derivation for SIGIL receipts — the part of
//! the pipeline that makes tampering evident.
//!
//! ## Overview
//!
//! A receipt's protected fields are normalized into a deterministic
//! canonical byte form, then digested with a salted SHA-256.  A secondary
//! checksum binds the resulting hash to the receipt's id, item count, and
//! total.  Any later mutation of a protected field changes the recomputed
//! digest and is detected by comparison against the stored one.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sigil_seal::{compute_receipt_hash, compute_integrity_checksum, NumericPolicy};
//!
//! let record = serde_json::to_value(&receipt)?;
//! let hash = compute_receipt_hash(&record, NumericPolicy::Strict)?;
//! let checksum = compute_integrity_checksum(&hash, receipt.id.as_str(), receipt.items.len(), receipt.total);
//! ```

pub mod canonical;
pub mod digest;

pub use canonical::{canonicalize, coerce_numeric, CanonicalNumber, NumericPolicy};
pub use digest::{compute_integrity_checksum, compute_receipt_hash, salted_digest, TAMPER_SALT};
