//! In-memory implementation of `DocumentStore`.
//!
//! `InMemoryDocumentStore` is the reference store: a `Vec` of untyped JSON
//! documents behind a `Mutex`, safe to share across threads.  Documents
//! are untyped on purpose — the production collaborator is a schemaless
//! document database, and the verifier must see exactly the bytes the
//! store holds, including anything a direct writer has done to them.
//!
//! The store offers tamper-*evidence* support, not tamper-*prevention*:
//! `overwrite()` is the direct write path that exists in any real document
//! database regardless of what the application layer promises.  Sealed
//! receipts stay detectably intact, not unmodifiable.

use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::{debug, warn};

use sigil_contracts::{DocId, SealedReceipt, SigilError, SigilResult};
use sigil_core::traits::DocumentStore;

/// One persisted document: the store-assigned id plus the raw payload.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    /// Store-assigned document identifier, unrelated to the payload's
    /// receipt id.
    pub doc_id: DocId,
    /// The document payload as stored.
    pub data: Value,
}

/// An in-memory, insert-oriented document store.
///
/// # Thread safety
///
/// All methods acquire an internal `Mutex`; clones of the `Arc` handle may
/// be used from multiple threads without additional synchronization.
#[derive(Clone, Default)]
pub struct InMemoryDocumentStore {
    docs: Arc<Mutex<Vec<StoredDocument>>>,
}

impl InMemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held.
    pub fn len(&self) -> usize {
        self.docs.lock().expect("document store lock poisoned").len()
    }

    /// True when the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace the payload of the document whose receipt id matches.
    ///
    /// This is the direct write path an external actor has to the store's
    /// contents — the thing the digest comparison exists to catch.  It is
    /// not part of the `DocumentStore` contract and nothing in the
    /// issuance or verification pipelines calls it.
    ///
    /// Returns `NotFound` when no document carries the given receipt id.
    pub fn overwrite(&self, receipt_id: &str, data: Value) -> SigilResult<()> {
        let mut docs = self.lock()?;
        for doc in docs.iter_mut() {
            if doc.data.get("id").and_then(Value::as_str) == Some(receipt_id) {
                warn!(receipt_id, "document overwritten via direct write path");
                doc.data = data;
                return Ok(());
            }
        }
        Err(SigilError::NotFound { receipt_id: receipt_id.to_string() })
    }

    fn lock(&self) -> SigilResult<std::sync::MutexGuard<'_, Vec<StoredDocument>>> {
        self.docs.lock().map_err(|e| SigilError::Store {
            reason: format!("document store lock poisoned: {e}"),
        })
    }
}

impl DocumentStore for InMemoryDocumentStore {
    /// Append the sealed receipt as a new document.
    fn insert(&self, record: &SealedReceipt) -> SigilResult<DocId> {
        let data = serde_json::to_value(record).map_err(|e| SigilError::Store {
            reason: format!("failed to serialize sealed receipt: {e}"),
        })?;

        let doc_id = DocId::new();
        let mut docs = self.lock()?;
        docs.push(StoredDocument { doc_id, data });

        debug!(
            receipt_id = %record.receipt.id,
            doc_id = %doc_id.0,
            total_docs = docs.len(),
            "document inserted"
        );

        Ok(doc_id)
    }

    /// Scan for the document whose payload `id` equals `receipt_id`.
    ///
    /// More than one match violates the at-most-one contract and is
    /// reported as `StoreInconsistent` instead of silently picking one.
    fn find_by_receipt_id(&self, receipt_id: &str) -> SigilResult<Option<Value>> {
        let docs = self.lock()?;
        let mut matches = docs
            .iter()
            .filter(|doc| doc.data.get("id").and_then(Value::as_str) == Some(receipt_id));

        let first = matches.next().map(|doc| doc.data.clone());
        if matches.next().is_some() {
            return Err(SigilError::StoreInconsistent {
                reason: format!("multiple documents share receipt id '{receipt_id}'"),
            });
        }
        Ok(first)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use sigil_contracts::{Receipt, ReceiptId, ReceiptItem, SealedReceipt, SigilError};
    use sigil_core::traits::DocumentStore;

    use super::InMemoryDocumentStore;

    fn sealed(id: &str) -> SealedReceipt {
        SealedReceipt {
            receipt: Receipt {
                id: ReceiptId(id.to_string()),
                customer_name: "Alice".to_string(),
                items: vec![ReceiptItem {
                    name: "Widget".to_string(),
                    quantity: 2.0,
                    price: 9.99,
                }],
                date: "2024-01-01".to_string(),
                currency: "USD".to_string(),
                total: 19.98,
                user_id: "user-1".to_string(),
                created_at: "2024-01-01T00:00:00Z".parse().unwrap(),
                version: "1.0".to_string(),
                tamper_proof: true,
            },
            hash: "a".repeat(64),
            integrity_checksum: "b".repeat(64),
            locked: true,
            security_level: "HIGH".to_string(),
        }
    }

    #[test]
    fn insert_then_find_returns_the_stored_payload() {
        let store = InMemoryDocumentStore::new();
        store.insert(&sealed("RCP-ONE")).unwrap();

        let found = store.find_by_receipt_id("RCP-ONE").unwrap().expect("document present");
        assert_eq!(found["id"], "RCP-ONE");
        assert_eq!(found["hash"], "a".repeat(64));
        assert_eq!(found["customerName"], "Alice");
    }

    #[test]
    fn find_of_unknown_id_returns_none() {
        let store = InMemoryDocumentStore::new();
        store.insert(&sealed("RCP-ONE")).unwrap();
        assert!(store.find_by_receipt_id("RCP-MISSING").unwrap().is_none());
    }

    #[test]
    fn duplicate_receipt_ids_are_a_store_inconsistency() {
        let store = InMemoryDocumentStore::new();
        store.insert(&sealed("RCP-DUP")).unwrap();
        store.insert(&sealed("RCP-DUP")).unwrap();

        match store.find_by_receipt_id("RCP-DUP") {
            Err(SigilError::StoreInconsistent { reason }) => {
                assert!(reason.contains("RCP-DUP"));
            }
            other => panic!("expected StoreInconsistent, got {other:?}"),
        }
    }

    #[test]
    fn inserts_assign_distinct_doc_ids() {
        let store = InMemoryDocumentStore::new();
        let a = store.insert(&sealed("RCP-A")).unwrap();
        let b = store.insert(&sealed("RCP-B")).unwrap();
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn overwrite_replaces_the_visible_payload() {
        let store = InMemoryDocumentStore::new();
        store.insert(&sealed("RCP-ONE")).unwrap();

        let mut tampered = store.find_by_receipt_id("RCP-ONE").unwrap().unwrap();
        tampered["items"][0]["price"] = json!(19.99);
        store.overwrite("RCP-ONE", tampered).unwrap();

        let found = store.find_by_receipt_id("RCP-ONE").unwrap().unwrap();
        assert_eq!(found["items"][0]["price"], 19.99);
    }

    #[test]
    fn overwrite_of_unknown_id_is_not_found() {
        let store = InMemoryDocumentStore::new();
        assert!(matches!(
            store.overwrite("RCP-MISSING", json!({})),
            Err(SigilError::NotFound { .. })
        ));
    }

    #[test]
    fn clones_share_the_same_backing_documents() {
        let store = InMemoryDocumentStore::new();
        let handle = store.clone();
        store.insert(&sealed("RCP-SHARED")).unwrap();
        assert!(handle.find_by_receipt_id("RCP-SHARED").unwrap().is_some());
    }
}
