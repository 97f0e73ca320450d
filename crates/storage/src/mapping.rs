use std::collections::BTreeMap;

use drill_core::model::{BlockId, BlockProgress, ProgressBook};
use drill_core::time::{format_date, parse_date};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Persisted shape of the whole state blob.
#[derive(Debug, Default, Serialize)]
struct StateBlob {
    sequences: BTreeMap<String, ProgressRecord>,
}

/// Blob as read back. Records stay raw so one bad record cannot sink the rest.
#[derive(Debug, Deserialize)]
struct StoredBlob {
    #[serde(default)]
    sequences: BTreeMap<String, Value>,
}

/// Persisted shape of one block's progress.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProgressRecord {
    seen: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_seen: Option<String>,
    validated: bool,
    no_help: bool,
}

impl ProgressRecord {
    fn from_progress(progress: &BlockProgress) -> Self {
        Self {
            seen: progress.seen,
            last_seen: progress.last_seen.map(format_date),
            validated: progress.validated,
            no_help: progress.no_help,
        }
    }

    /// Lenient read of one stored record: only an object yields a record, the
    /// flags accept any truthy value and a non-boolean `noHelp` reads as true.
    fn from_value(value: &Value) -> Option<Self> {
        let fields = value.as_object()?;
        Some(Self {
            seen: fields.get("seen").is_some_and(truthy),
            last_seen: fields
                .get("lastSeen")
                .and_then(Value::as_str)
                .map(str::to_owned),
            validated: fields.get("validated").is_some_and(truthy),
            no_help: fields.get("noHelp").and_then(Value::as_bool).unwrap_or(true),
        })
    }

    fn into_progress(self) -> BlockProgress {
        let last_seen = self.last_seen.as_deref().and_then(|raw| {
            let parsed = parse_date(raw);
            if parsed.is_none() {
                tracing::debug!(raw = %raw, "ignoring unparseable lastSeen");
            }
            parsed
        });
        BlockProgress {
            seen: self.seen,
            last_seen,
            validated: self.validated,
            no_help: self.no_help,
        }
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Block id written under `key`, only when `key` is its canonical decimal form.
fn parse_key(key: &str) -> Option<BlockId> {
    key.parse::<BlockId>()
        .ok()
        .filter(|id| id.to_string() == key)
}

/// Decode a stored blob.
///
/// Fails only when the root is not an object or `sequences` is not a map.
/// Entries whose key is not a canonical block id, or whose value is not an
/// object, are skipped.
pub(crate) fn decode_blob(raw: &str) -> Result<ProgressBook, StorageError> {
    let blob: StoredBlob = serde_json::from_str(raw).map_err(ser)?;
    let book = blob
        .sequences
        .into_iter()
        .filter_map(|(key, value)| {
            let Some(id) = parse_key(&key) else {
                tracing::debug!(key = %key, "skipping progress entry with invalid key");
                return None;
            };
            let record = ProgressRecord::from_value(&value);
            if record.is_none() && !value.is_null() {
                tracing::debug!(key = %key, "skipping malformed progress entry");
            }
            record.map(|record| (id, record.into_progress()))
        })
        .collect();
    Ok(book)
}

/// Encode the whole book for storage.
pub(crate) fn encode_blob(book: &ProgressBook) -> Result<String, StorageError> {
    let sequences = book
        .iter()
        .map(|(id, progress)| (id.to_string(), ProgressRecord::from_progress(progress)))
        .collect();
    serde_json::to_string(&StateBlob { sequences }).map_err(ser)
}

#[cfg(test)]
mod tests {
    use super::*;
    use drill_core::time::fixed_today;

    #[test]
    fn decodes_camel_case_records() {
        let raw = r#"{"sequences":{"4":{"seen":true,"lastSeen":"2024-01-01","validated":false,"noHelp":false}}}"#;
        let book = decode_blob(raw).unwrap();

        let progress = book.get(BlockId::new(4)).unwrap();
        assert!(progress.seen);
        assert_eq!(progress.last_seen, Some(fixed_today()));
        assert!(!progress.validated);
        assert!(!progress.no_help);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let book = decode_blob(r#"{"sequences":{"0":{}}}"#).unwrap();
        assert_eq!(book.get(BlockId::new(0)), Some(&BlockProgress::default()));
    }

    #[test]
    fn missing_sequences_is_an_empty_book() {
        assert!(decode_blob("{}").unwrap().is_empty());
        assert!(decode_blob(r#"{"version":1}"#).unwrap().is_empty());
    }

    #[test]
    fn structural_errors_are_reported() {
        for raw in ["", "not json", "42", "null", r#"{"sequences":[]}"#, r#"{"sequences":null}"#] {
            assert!(decode_blob(raw).is_err(), "input {raw:?}");
        }
    }

    #[test]
    fn bad_keys_null_records_and_bad_dates_are_skipped() {
        let raw = r#"{"sequences":{"x":{"seen":true},"1":null,"2":{"seen":true,"lastSeen":"soon"}}}"#;
        let book = decode_blob(raw).unwrap();

        assert_eq!(book.len(), 1);
        let progress = book.get(BlockId::new(2)).unwrap();
        assert!(progress.seen);
        assert_eq!(progress.last_seen, None);
    }

    #[test]
    fn malformed_record_keeps_its_siblings() {
        let raw = r#"{"sequences":{
            "0":{"seen":true,"lastSeen":"2024-01-01","validated":true,"noHelp":true},
            "1":{"seen":true,"validated":null},
            "2":42,
            "3":"oops"
        }}"#;
        let book = decode_blob(raw).unwrap();

        assert_eq!(book.len(), 2);
        assert!(book.get(BlockId::new(0)).unwrap().validated);
        let one = book.get(BlockId::new(1)).unwrap();
        assert!(one.seen);
        assert!(!one.validated);
        assert!(one.no_help);
    }

    #[test]
    fn flags_read_as_truthy() {
        let raw = r#"{"sequences":{
            "0":{"seen":1,"validated":"yes","noHelp":0,"lastSeen":20240101},
            "1":{"seen":0,"validated":"","noHelp":false}
        }}"#;
        let book = decode_blob(raw).unwrap();

        let zero = book.get(BlockId::new(0)).unwrap();
        assert!(zero.seen);
        assert!(zero.validated);
        assert!(zero.no_help);
        assert_eq!(zero.last_seen, None);

        let one = book.get(BlockId::new(1)).unwrap();
        assert!(!one.seen);
        assert!(!one.validated);
        assert!(!one.no_help);
    }

    #[test]
    fn only_canonical_keys_are_read() {
        let raw = r#"{"sequences":{"01":{"validated":true},"+1":{"validated":true},"1":{"seen":true}}}"#;
        let book = decode_blob(raw).unwrap();

        assert_eq!(book.len(), 1);
        let one = book.get(BlockId::new(1)).unwrap();
        assert!(one.seen);
        assert!(!one.validated);
    }

    #[test]
    fn encode_writes_the_persisted_shape() {
        let mut book = ProgressBook::new();
        book.entry(BlockId::new(7)).mark_presented(fixed_today());
        book.entry(BlockId::new(8));

        let value: serde_json::Value = serde_json::from_str(&encode_blob(&book).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "sequences": {
                    "7": { "seen": true, "lastSeen": "2024-01-01", "validated": false, "noHelp": true },
                    "8": { "seen": false, "validated": false, "noHelp": true }
                }
            })
        );
        assert_eq!(decode_blob(&encode_blob(&book).unwrap()).unwrap(), book);
    }
}
