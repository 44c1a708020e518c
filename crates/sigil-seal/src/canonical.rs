//! Canonicalization of receipt records for hashing.
//!
//! The canonical form is a deterministic byte encoding of the protected
//! field set.  Two records with the same logical content produce identical
//! bytes regardless of how the caller ordered items or object keys, how
//! much whitespace surrounds names, or whether numerics arrived as numbers
//! or numeric strings.
//!
//! Canonical encoding rules:
//!
//!   1. Protected fields only: `id, customerName, items, date, total,
//!      userId, createdAt, version, tamperProof`.  The display-only
//!      `currency` and the integrity envelope (`hash`, `integrityChecksum`,
//!      `locked`, `securityLevel`) never participate.
//!   2. `customerName` and each item `name` are trimmed of leading and
//!      trailing whitespace.
//!   3. `quantity`, `price`, and `total` are coerced to `f64` under the
//!      active [`NumericPolicy`].
//!   4. Items are ordered by `(name, price, quantity)` — code point string
//!      order, total float order — so duplicate names cannot reintroduce
//!      order sensitivity.
//!   5. Object keys serialize alphabetically at every level; integral
//!      numbers print without a decimal point, everything else in shortest
//!      round-trip form.

use serde::{Serialize, Serializer};
use serde_json::Value;

use sigil_contracts::{SigilError, SigilResult};

/// Largest magnitude at which every integer is exactly representable in an
/// f64 (2^53 - 1).  Integral values beyond this fall back to float form.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// How non-numeric `quantity`/`price`/`total` input is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericPolicy {
    /// Non-numeric or non-finite input is a `MalformedReceipt` error.
    ///
    /// The creation-path default: newly issued receipts have no excuse for
    /// malformed numerics.
    Strict,

    /// Non-numeric or non-finite input coerces to zero.
    ///
    /// Preserves the historical "never throw, default to 0" behavior that
    /// legacy stored receipts were hashed under.  Known weakness: silent
    /// coercion masks malformed input, so a record with a garbage price
    /// still verifies if it was *created* with that garbage price.
    Lenient,
}

/// A numeric value with the canonical text form.
///
/// Integral values serialize as integers (`2`, not `2.0`); everything else
/// uses the shortest round-trip float form (`9.99`).  This matches the
/// number-to-string behavior the legacy documents were hashed under and
/// removes trailing-zero ambiguity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanonicalNumber(pub f64);

impl Serialize for CanonicalNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let v = self.0;
        if v.fract() == 0.0 && v.abs() <= MAX_SAFE_INTEGER {
            serializer.serialize_i64(v as i64)
        } else {
            serializer.serialize_f64(v)
        }
    }
}

// Field declaration order IS the serialized key order, and it is kept
// alphabetical (in the camelCase wire spelling) to match the canonical
// encoding contract.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CanonicalReceipt<'a> {
    created_at: &'a str,
    customer_name: &'a str,
    date: &'a str,
    id: &'a str,
    items: Vec<CanonicalItem>,
    tamper_proof: bool,
    total: CanonicalNumber,
    user_id: &'a str,
    version: &'a str,
}

#[derive(Serialize)]
struct CanonicalItem {
    name: String,
    price: CanonicalNumber,
    quantity: CanonicalNumber,
}

/// Produce the canonical byte encoding of `record`'s protected fields.
///
/// `record` is the JSON document form of a receipt — either freshly
/// serialized from a typed [`sigil_contracts::Receipt`] on the creation
/// path, or fetched from the document store on the read path.  Both paths
/// run through this one function, so a receipt always re-canonicalizes to
/// the bytes it was sealed with.
///
/// # Errors
///
/// `MalformedReceipt` when the record is not a JSON object, a required
/// protected field is missing/null/mistyped, or (under
/// `NumericPolicy::Strict`) a numeric field does not parse.
pub fn canonicalize(record: &Value, policy: NumericPolicy) -> SigilResult<Vec<u8>> {
    if !record.is_object() {
        return Err(SigilError::MalformedReceipt {
            reason: "receipt record is not a JSON object".to_string(),
        });
    }

    let raw_items = record
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| missing("items"))?;

    let mut items = Vec::with_capacity(raw_items.len());
    for (index, raw) in raw_items.iter().enumerate() {
        let name = raw
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| SigilError::MalformedReceipt {
                reason: format!("item {index} has no string 'name'"),
            })?;
        items.push(CanonicalItem {
            name: name.trim().to_string(),
            price: CanonicalNumber(coerce_numeric(
                raw.get("price").unwrap_or(&Value::Null),
                "price",
                policy,
            )?),
            quantity: CanonicalNumber(coerce_numeric(
                raw.get("quantity").unwrap_or(&Value::Null),
                "quantity",
                policy,
            )?),
        });
    }

    // (name, price, quantity) ordering: duplicate names stay deterministic.
    items.sort_by(|a, b| {
        a.name
            .cmp(&b.name)
            .then(a.price.0.total_cmp(&b.price.0))
            .then(a.quantity.0.total_cmp(&b.quantity.0))
    });

    let canonical = CanonicalReceipt {
        created_at: require_str(record, "createdAt")?,
        customer_name: require_str(record, "customerName")?.trim(),
        date: require_str(record, "date")?,
        id: require_str(record, "id")?,
        items,
        tamper_proof: record
            .get("tamperProof")
            .and_then(Value::as_bool)
            .ok_or_else(|| missing("tamperProof"))?,
        total: CanonicalNumber(coerce_numeric(require_present(record, "total")?, "total", policy)?),
        user_id: require_str(record, "userId")?,
        version: require_str(record, "version")?,
    };

    serde_json::to_vec(&canonical).map_err(|e| SigilError::Digest {
        reason: format!("canonical serialization failed: {e}"),
    })
}

/// Coerce a JSON value to a finite `f64` under the given policy.
///
/// Numbers pass through.  Numeric strings parse (`"9.99"` → `9.99`) in both
/// policies.  Anything else — and any non-finite parse result — is zero
/// under `Lenient` and a `MalformedReceipt` error under `Strict`.
pub fn coerce_numeric(value: &Value, field: &str, policy: NumericPolicy) -> SigilResult<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        _ => match policy {
            NumericPolicy::Lenient => Ok(0.0),
            NumericPolicy::Strict => Err(SigilError::MalformedReceipt {
                reason: format!("field '{field}' is not a finite number: {value}"),
            }),
        },
    }
}

fn require_str<'a>(record: &'a Value, key: &str) -> SigilResult<&'a str> {
    record.get(key).and_then(Value::as_str).ok_or_else(|| missing(key))
}

/// Presence check only: the field must exist and not be JSON null.  Value
/// coercion is the caller's concern.
fn require_present<'a>(record: &'a Value, key: &str) -> SigilResult<&'a Value> {
    record.get(key).filter(|v| !v.is_null()).ok_or_else(|| missing(key))
}

fn missing(key: &str) -> SigilError {
    SigilError::MalformedReceipt {
        reason: format!("required field '{key}' is missing or not of the expected type"),
    }
}
