//! # Response Envelope
//!
//! Every JSON response is wrapped as `{code, message, data}`; `code` is 0 on
//! success and the HTTP status on failure.

use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};

/// Uniform response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    /// 0 on success, otherwise the HTTP status code.
    pub code: i32,
    /// Human-readable outcome.
    pub message: String,
    /// Payload, when the operation returns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    /// A success envelope carrying `data`.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            code: 0,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Renders the envelope as a `200 OK` JSON response.
    pub fn into_response(self) -> HttpResponse {
        HttpResponse::Ok().json(self)
    }
}

impl Envelope<()> {
    /// A success envelope without payload.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            code: 0,
            message: message.into(),
            data: None,
        }
    }

    /// A failure envelope.
    pub fn failure(code: u16, message: impl Into<String>) -> Self {
        Self {
            code: i32::from(code),
            message: message.into(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_shapes() {
        let ok = serde_json::to_value(Envelope::ok("done", vec![1, 2])).unwrap();
        assert_eq!(ok, json!({"code": 0, "message": "done", "data": [1, 2]}));

        let failed = serde_json::to_value(Envelope::<()>::failure(404, "missing")).unwrap();
        assert_eq!(failed, json!({"code": 404, "message": "missing"}));
    }
}
