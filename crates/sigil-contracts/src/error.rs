//! Error types for the SIGIL receipt pipeline.
//!
//! All fallible operations in the SIGIL crates return `SigilResult<T>`.
//! A failed hash comparison is NOT an error — it is the normal
//! `ReceiptVerification` outcome of the verifier.  The variants here cover
//! the cases where an operation could not run to completion at all.

use thiserror::Error;

/// The unified error type for the SIGIL crates.
#[derive(Debug, Error)]
pub enum SigilError {
    /// A required protected field is missing, null, or of the wrong shape.
    ///
    /// Raised at canonicalization time on the creation path (the receipt is
    /// rejected and nothing is persisted) and when a stored record fails
    /// structural validation on the read path ("could not check", distinct
    /// from a negative verdict).
    #[error("malformed receipt: {reason}")]
    MalformedReceipt { reason: String },

    /// The digest engine could not produce canonical bytes to hash.
    ///
    /// Fatal on the creation path — no receipt may be persisted without a
    /// valid hash.  On the read path this surfaces as "verification could
    /// not be completed", never as a false verdict.
    #[error("digest failure: {reason}")]
    Digest { reason: String },

    /// No stored record matches the requested receipt identifier.
    ///
    /// A user-facing lookup miss, not a tampering signal.
    #[error("receipt '{receipt_id}' not found")]
    NotFound { receipt_id: String },

    /// The document store could not complete a read or write.
    #[error("document store failure: {reason}")]
    Store { reason: String },

    /// The document store returned more than one record for one identifier.
    ///
    /// The verification contract assumes at-most-one record per id; a
    /// multi-match means the store's uniqueness guarantee has been violated.
    #[error("document store inconsistency: {reason}")]
    StoreInconsistent { reason: String },

    /// A configuration value is missing or could not be parsed.
    #[error("configuration error: {reason}")]
    Config { reason: String },
}

/// Convenience alias used throughout the SIGIL crates.
pub type SigilResult<T> = Result<T, SigilError>;
