//! Receipt data types.
//!
//! Field names on the wire use the legacy camelCase document format — the
//! shape the stored documents have always had — so Rust fields carry serde
//! renames.  `Receipt` is the protected payload plus the display-only
//! currency code; `SealedReceipt` wraps it with the derived integrity
//! envelope.  The envelope is computed exactly once, at creation; no update
//! path exists anywhere in these crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ident::ReceiptId;

/// Fixed metadata version stamped on every receipt.
pub const RECEIPT_VERSION: &str = "1.0";

/// Fixed security-level label carried on sealed records.
pub const SECURITY_LEVEL: &str = "HIGH";

/// One line item on a receipt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptItem {
    /// Free-text item name.
    pub name: String,
    /// Quantity purchased. Expected non-negative; not enforced here.
    pub quantity: f64,
    /// Unit price. Expected non-negative; not enforced here.
    pub price: f64,
}

/// The caller-supplied portion of a receipt, before sealing.
///
/// The issuer fills in everything else: the generated id, the caller's
/// uid, the creation timestamp, and the fixed metadata fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptDraft {
    pub customer_name: String,
    pub items: Vec<ReceiptItem>,
    /// Calendar date string; no time zone semantics.
    pub date: String,
    /// Display-only currency code. Not validated against any canonical set
    /// and not part of the protected field set.
    pub currency: String,
    /// Grand total as submitted by the caller. The pipeline trusts this
    /// value — it is covered by the hash but never recomputed from items.
    pub total: f64,
}

impl ReceiptDraft {
    /// Sum of `quantity * price` over all items.
    ///
    /// A convenience for callers populating `total`; the issuer does not
    /// check the submitted total against this.
    pub fn computed_total(&self) -> f64 {
        self.items.iter().map(|item| item.quantity * item.price).sum()
    }
}

/// A complete receipt record: the protected fields plus the display-only
/// currency code.
///
/// The protected field set — everything except `currency` — is what the
/// canonicalizer feeds into the digest.  Mutating any protected field in
/// storage makes re-verification fail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Unique identifier, assigned at creation, never reassigned.
    pub id: ReceiptId,
    pub customer_name: String,
    pub items: Vec<ReceiptItem>,
    pub date: String,
    /// Display-only; excluded from canonicalization.
    pub currency: String,
    pub total: f64,
    /// Creator identity from the external identity provider. Opaque.
    pub user_id: String,
    /// Creation timestamp (UTC).
    pub created_at: DateTime<Utc>,
    /// Always `RECEIPT_VERSION`; included in canonicalization.
    pub version: String,
    /// Always `true`; included in canonicalization.
    pub tamper_proof: bool,
}

/// A receipt with its integrity envelope, as persisted in the document
/// store.
///
/// `hash` and `integrity_checksum` are derived values — computed from the
/// exact in-memory record that is written, in the same operation, so there
/// is no gap in which the data and its digest could diverge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SealedReceipt {
    #[serde(flatten)]
    pub receipt: Receipt,
    /// Lowercase 64-char hex SHA-256 of the canonical protected fields.
    pub hash: String,
    /// Lowercase hex SHA-256 binding `hash`, `id`, item count, and total.
    pub integrity_checksum: String,
    /// Always `true` after creation; signals to consumers that no update
    /// path exists for this record.
    pub locked: bool,
    /// Always `SECURITY_LEVEL`. Display-only legacy metadata.
    pub security_level: String,
}
