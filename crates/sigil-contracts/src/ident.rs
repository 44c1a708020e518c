//! Receipt and document identifiers.
//!
//! `ReceiptId` is the human-shareable lookup key printed on receipts and
//! embedded in verification URLs.  It is NOT a security token: holding a
//! valid id proves nothing about a receipt's authenticity — only the digest
//! comparison does that.  `DocId` is the store-assigned identifier of the
//! underlying document, separate from the receipt id the same way a
//! document database keys documents independently of their payload fields.

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed prefix of every generated receipt identifier.
pub const RECEIPT_ID_PREFIX: &str = "RCP";

/// Length of the random base-36 suffix.
pub const RECEIPT_ID_SUFFIX_LEN: usize = 9;

const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A human-shareable receipt identifier.
///
/// Format: `RCP-<base36 millis>-<9 random base36 chars>`, upper-cased.
/// Uniqueness is probabilistic — negligible collision odds at expected
/// volume, but the document store is the authority if collisions must be
/// hard-enforced (e.g. via a conditional insert).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReceiptId(pub String);

impl ReceiptId {
    /// Generate a fresh identifier from the current time and a random suffix.
    pub fn generate() -> Self {
        let millis = Utc::now().timestamp_millis().max(0) as u64;
        let mut rng = rand::thread_rng();
        let suffix: String = (0..RECEIPT_ID_SUFFIX_LEN)
            .map(|_| BASE36_ALPHABET[rng.gen_range(0..36)] as char)
            .collect();

        Self(format!("{}-{}-{}", RECEIPT_ID_PREFIX, to_base36(millis), suffix).to_uppercase())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReceiptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Store-assigned identifier of a persisted document.
///
/// Every insert produces a fresh `DocId`, regardless of the receipt id
/// carried in the document's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocId(pub uuid::Uuid);

impl DocId {
    /// Create a new, unique document ID.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for DocId {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode `n` in lowercase base-36.
fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36_ALPHABET[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    // The alphabet is pure ASCII, so the bytes are always valid UTF-8.
    String::from_utf8(digits).expect("base36 digits are ASCII")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base36_round_numbers() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(36 * 36), "100");
    }

    #[test]
    fn generated_id_has_expected_shape() {
        let id = ReceiptId::generate();
        let parts: Vec<&str> = id.as_str().split('-').collect();

        assert_eq!(parts.len(), 3, "id must have three dash-separated parts: {id}");
        assert_eq!(parts[0], "RCP");
        assert_eq!(parts[2].len(), RECEIPT_ID_SUFFIX_LEN);

        // Upper-cased base-36: digits and capital letters only.
        assert!(
            id.as_str()
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase() || c == '-'),
            "unexpected character in id: {id}"
        );
    }

    #[test]
    fn generated_ids_are_unique() {
        let ids: std::collections::HashSet<String> =
            (0..100).map(|_| ReceiptId::generate().0).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn receipt_id_serializes_as_plain_string() {
        let id = ReceiptId("RCP-TEST-ABC123XYZ".to_string());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"RCP-TEST-ABC123XYZ\"");
    }

    #[test]
    fn doc_ids_are_unique() {
        let ids: std::collections::HashSet<_> = (0..100).map(|_| DocId::new().0).collect();
        assert_eq!(ids.len(), 100);
    }
}
