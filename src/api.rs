//! Demo JSON endpoints served next to the site.
//!
//! Handlers are transport-free: the hosting server passes the raw request
//! body in and writes `status` and `body` back out.

use serde_json::{json, Value};

#[derive(Clone, Debug, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    fn bad_request(error: &str) -> Self {
        Self {
            status: 400,
            body: json!({ "ok": false, "error": error }),
        }
    }

    pub fn to_json(&self) -> String {
        self.body.to_string()
    }
}

pub fn health() -> ApiResponse {
    ApiResponse::ok(json!({ "ok": true }))
}

pub fn demo() -> ApiResponse {
    ApiResponse::ok(json!({ "message": "Hello from API" }))
}

fn filled(form: &Value, field: &str) -> bool {
    matches!(form.get(field), Some(Value::String(s)) if !s.is_empty())
}

/// Validate a contact submission. Nothing is stored or sent.
pub fn contact(body: &[u8]) -> ApiResponse {
    let form: Value = match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("[api] contact body rejected: {e}");
            return ApiResponse::bad_request("Invalid request");
        }
    };
    if form.is_null() {
        return ApiResponse::bad_request("Invalid request");
    }
    if !["name", "email", "message"].iter().all(|f| filled(&form, f)) {
        return ApiResponse::bad_request("Missing required fields");
    }
    ApiResponse::ok(json!({ "ok": true, "received": true }))
}
