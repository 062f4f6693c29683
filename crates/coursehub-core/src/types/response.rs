//! The uniform response envelope returned by every service operation.

use serde::{Deserialize, Serialize};

/// Page size reported in every list envelope.
const ENVELOPE_PAGE_SIZE: u64 = 10;
/// Page number reported in every list envelope.
const ENVELOPE_PAGE: u64 = 1;

/// Pagination summary attached to list payloads.
///
/// `total` is the length of the returned page, not the size of the full
/// result set; `pagesize` and `page` are fixed. Consumers rely on this
/// exact shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Number of items in `data`.
    pub total: u64,
    /// Always 10.
    pub pagesize: u64,
    /// Always 1.
    pub page: u64,
}

impl Pagination {
    fn for_len(len: usize) -> Self {
        Self {
            total: len as u64,
            pagesize: ENVELOPE_PAGE_SIZE,
            page: ENVELOPE_PAGE,
        }
    }
}

/// A value that can travel in [`ResponseEnvelope::data`].
///
/// Ordered sequences report their length so the envelope can attach a
/// pagination summary; everything else keeps the default of `None`.
pub trait Payload: Serialize {
    /// Length of the payload when it is an ordered sequence.
    fn sequence_len(&self) -> Option<usize> {
        None
    }
}

impl<T: Serialize> Payload for Vec<T> {
    fn sequence_len(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl<T: Payload> Payload for Option<T> {
    fn sequence_len(&self) -> Option<usize> {
        self.as_ref().and_then(Payload::sequence_len)
    }
}

impl Payload for serde_json::Value {
    fn sequence_len(&self) -> Option<usize> {
        self.as_array().map(Vec::len)
    }
}

impl Payload for () {}

impl Payload for super::ack::DeleteAck {}

impl Payload for super::ack::CountResult {}

/// Uniform wrapper carrying success flag, message, payload, and an
/// optional pagination summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Human-readable message.
    pub message: Option<String>,
    /// The payload; `null` on failure.
    pub data: T,
    /// Present only when `data` is an array.
    pub pagination: Option<Pagination>,
}

impl<T: Payload> ResponseEnvelope<T> {
    /// Wrap `data`, attaching pagination when it is a sequence.
    pub fn wrap(success: bool, message: Option<String>, data: T) -> Self {
        let pagination = data.sequence_len().map(Pagination::for_len);
        Self {
            success,
            message,
            data,
            pagination,
        }
    }

    /// Successful envelope with a message.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::wrap(true, Some(message.into()), data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Course {
        name: &'static str,
    }

    impl Payload for Course {}

    #[test]
    fn test_list_gets_fixed_pagination() {
        let env = ResponseEnvelope::wrap(true, Some("ok".into()), vec!["a", "b", "c"]);
        assert_eq!(
            env.pagination,
            Some(Pagination {
                total: 3,
                pagesize: 10,
                page: 1
            })
        );
    }

    #[test]
    fn test_total_is_page_length_even_for_large_pages() {
        let items: Vec<u32> = (0..25).collect();
        let env = ResponseEnvelope::ok("ok", items);
        let pagination = env.pagination.expect("list has pagination");
        assert_eq!(pagination.total, 25);
        assert_eq!(pagination.pagesize, 10);
        assert_eq!(pagination.page, 1);
    }

    #[test]
    fn test_single_entity_has_no_pagination() {
        let env = ResponseEnvelope::ok("ok", Course { name: "Chemistry" });
        assert!(env.pagination.is_none());
    }

    #[test]
    fn test_null_payload_has_no_pagination() {
        let env: ResponseEnvelope<Option<Vec<u8>>> = ResponseEnvelope::ok("ok", None);
        assert!(env.pagination.is_none());
    }

    #[test]
    fn test_json_array_value_gets_pagination() {
        let env = ResponseEnvelope::ok("ok", json!([{"a": 1}, {"a": 2}]));
        assert_eq!(env.pagination.map(|p| p.total), Some(2));
        let env = ResponseEnvelope::ok("ok", json!({"a": 1}));
        assert!(env.pagination.is_none());
    }

    #[test]
    fn test_serialized_shape_keeps_all_keys() {
        let env = ResponseEnvelope::wrap(false, Some("nope".into()), ());
        let value = serde_json::to_value(&env).unwrap();
        assert_eq!(
            value,
            json!({"success": false, "message": "nope", "data": null, "pagination": null})
        );
    }
}
