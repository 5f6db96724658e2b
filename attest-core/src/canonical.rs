//! Canonical serialization and content hashing
//!
//! Deterministic byte representation for every supported value shape:
//! JSON with sorted keys and compact separators, decimals as normalized
//! strings (exact zero always `"0"`), timestamps as fixed-width UTC
//! RFC 3339, composites tagged with a type discriminator. Two
//! semantically-equal values serialize to identical bytes regardless of
//! construction order, process, or platform.

use crate::error::{Error, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

/// Discriminator key injected into record encodings
pub const TYPE_FIELD: &str = "_type";

/// Closed union of canonically-serializable shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CanonicalValue {
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Exact decimal
    Decimal(Decimal),
    /// UTF-8 text
    Text(String),
    /// UTC timestamp (naive/local time is unrepresentable here)
    Timestamp(DateTime<Utc>),
    /// Raw bytes, hex-encoded on the wire
    Bytes(Vec<u8>),
    /// Order-preserving sequence
    Sequence(Vec<CanonicalValue>),
    /// Key-sorted map
    Map(BTreeMap<String, CanonicalValue>),
    /// Tagged composite
    Record {
        /// Type discriminator
        tag: String,
        /// Named fields, encoded in sorted-key order
        fields: BTreeMap<String, CanonicalValue>,
    },
}

impl CanonicalValue {
    /// Build a tagged record from (name, value) pairs
    pub fn record(
        tag: impl Into<String>,
        fields: impl IntoIterator<Item = (&'static str, CanonicalValue)>,
    ) -> Self {
        CanonicalValue::Record {
            tag: tag.into(),
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        match self {
            CanonicalValue::Bool(b) => serde_json::Value::Bool(*b),
            CanonicalValue::Int(n) => serde_json::Value::from(*n),
            CanonicalValue::Decimal(d) => serde_json::Value::String(normalized_decimal(d)),
            CanonicalValue::Text(s) => serde_json::Value::String(s.clone()),
            CanonicalValue::Timestamp(ts) => serde_json::Value::String(format_timestamp(ts)),
            CanonicalValue::Bytes(b) => serde_json::Value::String(hex::encode(b)),
            CanonicalValue::Sequence(items) => {
                serde_json::Value::Array(items.iter().map(CanonicalValue::to_json).collect())
            }
            CanonicalValue::Map(entries) => sorted_object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            CanonicalValue::Record { tag, fields } => {
                let mut entries: BTreeMap<String, serde_json::Value> = fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect();
                entries.insert(
                    TYPE_FIELD.to_string(),
                    serde_json::Value::String(tag.clone()),
                );
                sorted_object(entries)
            }
        }
    }
}

// Built from a BTreeMap so keys land in sorted order no matter how the
// underlying serde_json map is configured.
fn sorted_object(entries: BTreeMap<String, serde_json::Value>) -> serde_json::Value {
    serde_json::Value::Object(entries.into_iter().collect())
}

/// Normalized decimal rendering; every representation of zero is `"0"`
fn normalized_decimal(d: &Decimal) -> String {
    if d.is_zero() {
        "0".to_string()
    } else {
        d.normalize().to_string()
    }
}

/// Fixed-width UTC rendering with nanosecond precision
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Parse a timestamp, rejecting anything without an explicit offset
///
/// Naive and local timestamps fail validation rather than being silently
/// assumed UTC.
pub fn parse_utc_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            Error::validation(
                "timestamp",
                format!("{s:?} is not an offset-qualified RFC 3339 timestamp: {e}"),
            )
        })
}

/// Deterministic canonical bytes for a value
pub fn canonical_bytes(value: &CanonicalValue) -> Result<Vec<u8>> {
    serde_json::to_vec(&value.to_json()).map_err(|e| Error::Canonical(e.to_string()))
}

/// SHA-256 hash of a value's canonical form
///
/// Two attestations of the same value share this hash; it backs
/// dedup-by-value queries. An accidental collision between semantically
/// different values is treated as fatal corruption, not recovered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Wrap a raw digest
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw digest bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex rendering
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Hash a value's canonical form
pub fn content_hash(value: &CanonicalValue) -> Result<ContentHash> {
    Ok(ContentHash(sha256(&canonical_bytes(value)?)))
}

pub(crate) fn sha256(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher.finalize().into()
}

/// Conversion into the canonical shape union
pub trait Canonicalize {
    /// Discriminator recorded alongside the value
    fn type_tag(&self) -> &'static str;

    /// Canonical representation of the value
    fn to_canonical(&self) -> Result<CanonicalValue>;
}

impl Canonicalize for Decimal {
    fn type_tag(&self) -> &'static str {
        "decimal"
    }

    fn to_canonical(&self) -> Result<CanonicalValue> {
        Ok(CanonicalValue::Decimal(*self))
    }
}

impl Canonicalize for String {
    fn type_tag(&self) -> &'static str {
        "text"
    }

    fn to_canonical(&self) -> Result<CanonicalValue> {
        Ok(CanonicalValue::Text(self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_zero_representations_share_bytes() {
        let plain = CanonicalValue::Decimal(Decimal::ZERO);
        let scaled = CanonicalValue::Decimal(Decimal::from_scientific("0e2").unwrap());
        let negative = CanonicalValue::Decimal(Decimal::from_str("-0.00").unwrap());

        let expected = canonical_bytes(&plain).unwrap();
        assert_eq!(canonical_bytes(&scaled).unwrap(), expected);
        assert_eq!(canonical_bytes(&negative).unwrap(), expected);
        assert_eq!(expected, b"\"0\"");
    }

    #[test]
    fn test_trailing_zeros_normalized() {
        let a = CanonicalValue::Decimal(dec!(1.50));
        let b = CanonicalValue::Decimal(dec!(1.5000));
        assert_eq!(canonical_bytes(&a).unwrap(), canonical_bytes(&b).unwrap());
    }

    #[test]
    fn test_map_insertion_order_is_irrelevant() {
        let mut forward = BTreeMap::new();
        forward.insert("r2".to_string(), CanonicalValue::Decimal(dec!(0.98)));
        forward.insert("rmse".to_string(), CanonicalValue::Decimal(dec!(0.02)));

        let mut reverse = BTreeMap::new();
        reverse.insert("rmse".to_string(), CanonicalValue::Decimal(dec!(0.02)));
        reverse.insert("r2".to_string(), CanonicalValue::Decimal(dec!(0.98)));

        assert_eq!(
            canonical_bytes(&CanonicalValue::Map(forward)).unwrap(),
            canonical_bytes(&CanonicalValue::Map(reverse)).unwrap()
        );
    }

    #[test]
    fn test_record_is_tagged_and_key_sorted() {
        let record = CanonicalValue::record(
            "money",
            [
                ("currency", CanonicalValue::Text("USD".to_string())),
                ("amount", CanonicalValue::Decimal(dec!(100.00))),
            ],
        );
        let bytes = canonical_bytes(&record).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"_type":"money","amount":"100","currency":"USD"}"#
        );
    }

    #[test]
    fn test_sequences_preserve_order() {
        let ab = CanonicalValue::Sequence(vec![
            CanonicalValue::Int(1),
            CanonicalValue::Int(2),
        ]);
        let ba = CanonicalValue::Sequence(vec![
            CanonicalValue::Int(2),
            CanonicalValue::Int(1),
        ]);
        assert_ne!(canonical_bytes(&ab).unwrap(), canonical_bytes(&ba).unwrap());
    }

    #[test]
    fn test_parse_utc_timestamp_rejects_naive() {
        assert!(parse_utc_timestamp("2026-03-01T12:00:00").is_err());
        assert!(parse_utc_timestamp("2026-03-01").is_err());

        let utc = parse_utc_timestamp("2026-03-01T12:00:00Z").unwrap();
        let offset = parse_utc_timestamp("2026-03-01T14:00:00+02:00").unwrap();
        assert_eq!(utc, offset);
    }

    #[test]
    fn test_timestamp_encoding_is_fixed_width() {
        let ts = parse_utc_timestamp("2026-03-01T12:00:00Z").unwrap();
        let bytes = canonical_bytes(&CanonicalValue::Timestamp(ts)).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "\"2026-03-01T12:00:00.000000000Z\""
        );
    }

    #[test]
    fn test_content_hash_is_deterministic() {
        let value = CanonicalValue::record(
            "quote",
            [
                ("bid", CanonicalValue::Decimal(dec!(99.5))),
                ("ask", CanonicalValue::Decimal(dec!(100.5))),
            ],
        );
        assert_eq!(content_hash(&value).unwrap(), content_hash(&value).unwrap());
    }
}
