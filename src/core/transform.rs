use crate::domain::model::Record;
use crate::utils::error::{EtlError, Result};

/// Field normalized by [`lowercase_type`].
pub const TYPE_FIELD: &str = "type";

/// Lowercases the record's `type` value and passes every other field through.
///
/// `index` only labels the error for a record whose `type` is missing or not
/// a string.
pub fn lowercase_type(index: usize, mut record: Record) -> Result<Record> {
    match record.data.get_mut(TYPE_FIELD) {
        Some(serde_json::Value::String(value)) => {
            *value = value.to_lowercase();
            Ok(record)
        }
        Some(other) => Err(EtlError::RecordError {
            index,
            message: format!("field `{}` is not a string: {}", TYPE_FIELD, other),
        }),
        None => Err(EtlError::RecordError {
            index,
            message: format!("missing field `{}`", TYPE_FIELD),
        }),
    }
}

/// Applies [`lowercase_type`] to every record, keeping order. Stops at the
/// first bad record.
pub fn lowercase_all(records: &[Record]) -> Result<Vec<Record>> {
    records
        .iter()
        .cloned()
        .enumerate()
        .map(|(index, record)| lowercase_type(index, record))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn record(value: serde_json::Value) -> Record {
        let data: HashMap<String, serde_json::Value> = serde_json::from_value(value).unwrap();
        Record::new(data)
    }

    #[test]
    fn test_lowercases_only_type() {
        let raw = record(json!({"type": "Apartment", "city": "Austin", "rank": 3}));
        let transformed = lowercase_type(0, raw.clone()).unwrap();

        assert_eq!(transformed.get("type"), Some(&json!("apartment")));
        assert_eq!(transformed.get("city"), Some(&json!("Austin")));
        assert_eq!(transformed.get("rank"), Some(&json!(3)));
        assert_eq!(transformed.data.len(), raw.data.len());
    }

    #[test]
    fn test_missing_type_is_record_error() {
        let err = lowercase_type(7, record(json!({"city": "Austin"}))).unwrap_err();
        match err {
            EtlError::RecordError { index, message } => {
                assert_eq!(index, 7);
                assert!(message.contains("missing field"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_string_type_is_record_error() {
        assert!(lowercase_type(0, record(json!({"type": 5}))).is_err());
        assert!(lowercase_type(0, record(json!({"type": null}))).is_err());
    }

    #[test]
    fn test_lowercase_all_keeps_count_and_order() {
        let raw = vec![
            record(json!({"type": "Apartment"})),
            record(json!({"type": "HOUSE"})),
            record(json!({"type": "condo"})),
        ];
        let transformed = lowercase_all(&raw).unwrap();
        let types: Vec<&str> = transformed
            .iter()
            .map(|r| r.get("type").and_then(|v| v.as_str()).unwrap())
            .collect();
        assert_eq!(types, vec!["apartment", "house", "condo"]);
    }

    #[test]
    fn test_lowercase_all_reports_first_bad_index() {
        let raw = vec![
            record(json!({"type": "Apartment"})),
            record(json!({"city": "Dallas"})),
        ];
        let err = lowercase_all(&raw).unwrap_err();
        assert!(matches!(err, EtlError::RecordError { index: 1, .. }));
    }
}
