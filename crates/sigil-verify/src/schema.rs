//! Structural validation of stored receipt records.
//!
//! Before the verifier recomputes any digest, the fetched document is
//! checked against a JSON Schema describing the sealed-record shape.  A
//! record that fails here could not have been produced by the issuance
//! pipeline at all — that is a "could not check" error, kept strictly
//! separate from a digest mismatch.  All violations are collected before
//! returning so operators see the full failure set in one pass.

use serde_json::{json, Value};
use tracing::warn;

use sigil_contracts::{SigilError, SigilResult};

/// The JSON Schema every stored sealed-receipt document must satisfy.
///
/// Deliberately tolerant where legacy documents are tolerant: `quantity`,
/// `price`, and `total` may be numbers or numeric strings (the lenient
/// coercion handles both), and unknown extra fields are allowed.  The
/// envelope fields are strict — a `hash` that is not 64 lowercase hex
/// characters cannot have come from the digest engine.
fn stored_receipt_schema() -> Value {
    json!({
        "type": "object",
        "required": [
            "id", "customerName", "items", "date", "total", "userId",
            "createdAt", "version", "tamperProof", "hash", "integrityChecksum"
        ],
        "properties": {
            "id": { "type": "string" },
            "customerName": { "type": "string" },
            "items": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["name"],
                    "properties": {
                        "name": { "type": "string" },
                        "quantity": { "type": ["number", "string"] },
                        "price": { "type": ["number", "string"] }
                    }
                }
            },
            "date": { "type": "string" },
            "total": { "type": ["number", "string"] },
            "userId": { "type": "string" },
            "createdAt": { "type": "string" },
            "version": { "type": "string" },
            "tamperProof": { "type": "boolean" },
            "hash": { "type": "string", "pattern": "^[0-9a-f]{64}$" },
            "integrityChecksum": { "type": "string", "pattern": "^[0-9a-f]{64}$" }
        }
    })
}

/// Validate a fetched document against the sealed-record schema.
///
/// # Errors
///
/// `MalformedReceipt` listing every schema violation found.
pub fn validate_stored_record(record: &Value) -> SigilResult<()> {
    let schema = stored_receipt_schema();
    let validator = jsonschema::validator_for(&schema).map_err(|e| {
        // The schema is a compile-time constant; failing to build a
        // validator from it is a programming error, but it is still
        // surfaced as an error rather than a panic on the read path.
        SigilError::MalformedReceipt {
            reason: format!("invalid stored-record schema document: {e}"),
        }
    })?;

    let violations: Vec<String> = validator
        .iter_errors(record)
        .map(|error| format!("schema violation at {}: {}", error.instance_path, error))
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        warn!(
            violation_count = violations.len(),
            "stored record failed structural validation"
        );
        Err(SigilError::MalformedReceipt {
            reason: violations.join("; "),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use sigil_contracts::SigilError;

    use super::validate_stored_record;

    fn sample_stored_record() -> serde_json::Value {
        json!({
            "id": "RCP-X",
            "customerName": "Alice",
            "items": [
                { "name": "Widget", "quantity": 2, "price": 9.99 }
            ],
            "date": "2024-01-01",
            "currency": "USD",
            "total": 19.98,
            "userId": "user-1",
            "createdAt": "2024-01-01T00:00:00Z",
            "version": "1.0",
            "tamperProof": true,
            "hash": "a".repeat(64),
            "integrityChecksum": "b".repeat(64),
            "locked": true,
            "securityLevel": "HIGH"
        })
    }

    #[test]
    fn well_formed_record_passes() {
        assert!(validate_stored_record(&sample_stored_record()).is_ok());
    }

    #[test]
    fn legacy_string_numerics_pass() {
        let mut record = sample_stored_record();
        record["total"] = json!("19.98");
        record["items"][0]["quantity"] = json!("2");
        assert!(validate_stored_record(&record).is_ok());
    }

    #[test]
    fn missing_hash_is_reported() {
        let mut record = sample_stored_record();
        record.as_object_mut().unwrap().remove("hash");

        match validate_stored_record(&record) {
            Err(SigilError::MalformedReceipt { reason }) => {
                assert!(reason.contains("hash"), "reason should name the field: {reason}");
            }
            other => panic!("expected MalformedReceipt, got {other:?}"),
        }
    }

    #[test]
    fn uppercase_hash_is_rejected() {
        let mut record = sample_stored_record();
        record["hash"] = json!("A".repeat(64));
        assert!(validate_stored_record(&record).is_err());
    }

    #[test]
    fn non_array_items_are_rejected() {
        let mut record = sample_stored_record();
        record["items"] = json!("not-an-array");
        assert!(validate_stored_record(&record).is_err());
    }

    #[test]
    fn all_violations_are_collected() {
        let mut record = sample_stored_record();
        record.as_object_mut().unwrap().remove("hash");
        record.as_object_mut().unwrap().remove("customerName");

        match validate_stored_record(&record) {
            Err(SigilError::MalformedReceipt { reason }) => {
                assert!(reason.contains("hash"));
                assert!(reason.contains("customerName"));
            }
            other => panic!("expected MalformedReceipt, got {other:?}"),
        }
    }
}
