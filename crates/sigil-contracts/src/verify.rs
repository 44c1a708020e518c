//! Verification outcome types.
//!
//! A digest mismatch is a *normal, expected outcome* — tampering detected —
//! not a failure of the system.  These types keep that distinction visible:
//! the verifier returns `Ok(VerificationOutcome)` carrying a possibly
//! negative report, and reserves `Err` for "could not check" conditions
//! (record not found, malformed stored data, digest failure).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The per-check results of verifying one stored receipt.
///
/// Both digests are recomputed from the record as currently stored and
/// compared against the stored envelope.  The two checks fail for
/// different attack shapes, so both results are reported rather than a
/// single collapsed boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptVerification {
    /// The salted digest recomputed over the protected fields equals the
    /// stored `hash`.
    pub hash_matches: bool,
    /// The checksum recomputed from the stored `hash`, id, item count,
    /// and total equals the stored `integrityChecksum`.
    pub checksum_matches: bool,
}

impl ReceiptVerification {
    /// True only when both the hash and the checksum check out.
    pub fn is_authentic(&self) -> bool {
        self.hash_matches && self.checksum_matches
    }

    /// Collapse the two checks into a single verdict.
    ///
    /// A hash mismatch dominates: it means the protected data itself no
    /// longer matches what was sealed.  A checksum-only mismatch means the
    /// data re-hashes cleanly but the envelope is inconsistent — the
    /// signature of a swapped or re-derived `hash` value.
    pub fn verdict(&self) -> Verdict {
        match (self.hash_matches, self.checksum_matches) {
            (true, true) => Verdict::Verified,
            (false, _) => Verdict::HashMismatch,
            (true, false) => Verdict::ChecksumMismatch,
        }
    }
}

/// The collapsed authenticity verdict for display surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    /// The record is byte-for-byte what was sealed.
    Verified,
    /// A protected field differs from what the stored hash commits to.
    HashMismatch,
    /// The data matches its hash, but the envelope does not bind together.
    ChecksumMismatch,
}

/// The full result handed back to the verification entry point: the
/// verdict plus the retrieved record, for display alongside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationOutcome {
    /// The receipt id the lookup resolved.
    pub receipt_id: String,
    /// The per-check verification report.
    pub verification: ReceiptVerification,
    /// The record exactly as fetched from the store.
    pub record: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_checks_passing_is_verified() {
        let v = ReceiptVerification { hash_matches: true, checksum_matches: true };
        assert!(v.is_authentic());
        assert_eq!(v.verdict(), Verdict::Verified);
    }

    #[test]
    fn hash_mismatch_dominates() {
        let v = ReceiptVerification { hash_matches: false, checksum_matches: false };
        assert!(!v.is_authentic());
        assert_eq!(v.verdict(), Verdict::HashMismatch);

        let v = ReceiptVerification { hash_matches: false, checksum_matches: true };
        assert_eq!(v.verdict(), Verdict::HashMismatch);
    }

    #[test]
    fn checksum_only_mismatch_is_distinguished() {
        let v = ReceiptVerification { hash_matches: true, checksum_matches: false };
        assert!(!v.is_authentic());
        assert_eq!(v.verdict(), Verdict::ChecksumMismatch);
    }

    #[test]
    fn verdict_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&Verdict::HashMismatch).unwrap(),
            "\"hash-mismatch\""
        );
    }
}
