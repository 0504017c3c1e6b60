//! JSON encoding of order records.

use thiserror::Error;

use crate::domain::errors::DomainError;
use crate::domain::order::Order;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode order: {0}")]
    Encode(serde_json::Error),
    #[error("failed to decode order: {0}")]
    Decode(serde_json::Error),
}

impl From<CodecError> for DomainError {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::Encode(_) => DomainError::Internal(e.to_string()),
            CodecError::Decode(_) => DomainError::MalformedRecord(e.to_string()),
        }
    }
}

pub fn encode(order: &Order) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(order).map_err(CodecError::Encode)
}

pub fn decode(bytes: &[u8]) -> Result<Order, CodecError> {
    serde_json::from_slice(bytes).map_err(CodecError::Decode)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::domain::order::LineItem;

    fn full_order() -> Order {
        Order {
            order_id: u64::MAX,
            customer_id: Uuid::new_v4(),
            line_items: vec![
                LineItem {
                    item_id: Uuid::new_v4(),
                    price: 100,
                    quantity: 2,
                },
                LineItem {
                    item_id: Uuid::new_v4(),
                    price: 0,
                    quantity: 0,
                },
            ],
            created_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()),
            shipped_at: Some(Utc::now()),
            completed_at: None,
        }
    }

    #[test]
    fn round_trip_preserves_every_field() {
        let order = full_order();
        let decoded = decode(&encode(&order).unwrap()).unwrap();
        assert_eq!(decoded, order);
    }

    #[test]
    fn round_trip_keeps_null_timestamps_null() {
        let order = Order {
            created_at: None,
            shipped_at: None,
            completed_at: None,
            ..full_order()
        };
        let decoded = decode(&encode(&order).unwrap()).unwrap();
        assert_eq!(decoded.created_at, None);
        assert_eq!(decoded.shipped_at, None);
        assert_eq!(decoded.completed_at, None);
    }

    #[test]
    fn encoding_uses_stored_field_names() {
        let order = Order {
            completed_at: None,
            ..full_order()
        };
        let value: serde_json::Value = serde_json::from_slice(&encode(&order).unwrap()).unwrap();

        assert_eq!(value["order_id"], serde_json::json!(u64::MAX));
        assert!(value["customer_id"].is_string());
        assert_eq!(value["line_items"][0]["price"], 100);
        assert_eq!(value["line_items"][0]["quantity"], 2);
        assert!(value["line_items"][0]["item_id"].is_string());
        assert!(value["created_at"].is_string());
        assert!(value["completed_at"].is_null());
    }

    #[test]
    fn decodes_legacy_record_with_null_line_items() {
        let raw = br#"{
            "order_id": 42,
            "customer_id": "6f1c1d0e-3f0b-4a8e-9a53-6a0b8f8a1c2d",
            "line_items": null,
            "created_at": "2024-05-01T10:00:00.123456789Z",
            "shipped_at": null,
            "completed_at": null
        }"#;
        let order = decode(raw).expect("legacy record decodes");
        assert_eq!(order.order_id, 42);
        assert!(order.line_items.is_empty());
        assert!(order.created_at.is_some());
        assert!(order.shipped_at.is_none());
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = decode(b"not json").unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
        assert!(matches!(DomainError::from(err), DomainError::MalformedRecord(_)));
    }

    #[test]
    fn decode_error_reports_serde_cause_once() {
        let err = decode(b"not json").unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("failed to decode order: expected"));
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn wrong_shape_is_a_decode_error() {
        assert!(decode(br#"{"order_id": "forty-two"}"#).is_err());
        assert!(decode(br#"{"order_id": 1}"#).is_err());
    }
}
