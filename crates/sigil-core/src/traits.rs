//! The document-store contract.
//!
//! The store is an external collaborator (a Firestore-like managed
//! service); these crates only ever see it through this trait.  The
//! reference in-memory implementation lives in `sigil-store`.

use serde_json::Value;

use sigil_contracts::{DocId, SealedReceipt, SigilResult};

/// A durable document store for sealed receipts.
///
/// Implementations are expected to be shared across threads; all methods
/// take `&self` and implementations synchronize internally.
pub trait DocumentStore: Send + Sync {
    /// Persist a sealed receipt as a new document and return its
    /// store-assigned id.
    ///
    /// Insert-only: these crates never update or delete a receipt
    /// document.  The record's digests were computed from the exact field
    /// values being written here.
    fn insert(&self, record: &SealedReceipt) -> SigilResult<DocId>;

    /// Fetch the document whose payload `id` field equals `receipt_id`.
    ///
    /// Returns the raw stored JSON so the verifier re-normalizes exactly
    /// what the store currently holds — never a cached or re-typed copy.
    ///
    /// At-most-one document per receipt id: implementations must report
    /// more than one match as `SigilError::StoreInconsistent` rather than
    /// picking one arbitrarily.
    fn find_by_receipt_id(&self, receipt_id: &str) -> SigilResult<Option<Value>>;
}
