//! Response envelope helpers.
//!
//! The T-Express API wraps every payload in a JSON object keyed by the
//! resource name: `{ "panier": {...} }`, `{ "produits": [...] }`, optionally
//! with a human-readable `message` on mutations.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::ApiError;

/// Take the value under `key` out of an envelope and decode it.
///
/// # Errors
///
/// Returns `ApiError::Decode` if the body is not an object, the key is
/// missing or null, or the value does not decode as `T`.
pub fn field<T: DeserializeOwned>(body: &mut Value, key: &str) -> Result<T, ApiError> {
    let value = take(body, key)?;
    if value.is_null() {
        return Err(ApiError::Decode(format!(
            "field `{key}` is null in response envelope"
        )));
    }
    serde_json::from_value(value)
        .map_err(|e| ApiError::Decode(format!("field `{key}`: {e}")))
}

/// Like [`field`], but a missing or null key yields `None`.
///
/// # Errors
///
/// Returns `ApiError::Decode` if the body is not an object or the value does
/// not decode as `T`.
pub fn optional_field<T: DeserializeOwned>(
    body: &mut Value,
    key: &str,
) -> Result<Option<T>, ApiError> {
    let Some(object) = body.as_object_mut() else {
        return Err(not_an_object(body));
    };
    match object.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| ApiError::Decode(format!("field `{key}`: {e}"))),
    }
}

/// Decode a collection under `key`.
///
/// Laravel paginators nest the rows one level deeper
/// (`{ "produits": { "data": [...] } }`); both shapes are accepted.
///
/// # Errors
///
/// Returns `ApiError::Decode` if the key is missing or the rows do not decode.
pub fn list<T: DeserializeOwned>(body: &mut Value, key: &str) -> Result<Vec<T>, ApiError> {
    let mut value = take(body, key)?;
    if let Some(rows) = value.as_object_mut().and_then(|o| o.remove("data")) {
        debug!(key, "Unwrapping paginated collection");
        value = rows;
    }
    if value.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(value).map_err(|e| ApiError::Decode(format!("field `{key}`: {e}")))
}

/// The optional `message` accompanying a mutation.
#[must_use]
pub fn message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .map(ToString::to_string)
}

fn take(body: &mut Value, key: &str) -> Result<Value, ApiError> {
    let Some(object) = body.as_object_mut() else {
        return Err(not_an_object(body));
    };
    object
        .remove(key)
        .ok_or_else(|| ApiError::Decode(format!("missing field `{key}` in response envelope")))
}

fn not_an_object(body: &Value) -> ApiError {
    let kind = match body {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    };
    ApiError::Decode(format!("expected a JSON object envelope, got {kind}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_field_unwraps_singular_envelope() {
        let mut body = json!({ "stock": 12, "message": "ok" });
        let stock: i64 = field(&mut body, "stock").unwrap();
        assert_eq!(stock, 12);
        assert_eq!(message(&body).as_deref(), Some("ok"));
    }

    #[test]
    fn test_field_missing_key_is_decode_error() {
        let mut body = json!({ "message": "ok" });
        let err = field::<i64>(&mut body, "panier").unwrap_err();
        assert!(matches!(err, ApiError::Decode(ref m) if m.contains("panier")));
    }

    #[test]
    fn test_field_rejects_non_object_body() {
        let mut body = json!([1, 2, 3]);
        let err = field::<i64>(&mut body, "panier").unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_list_accepts_plain_and_paginated_shapes() {
        let mut plain = json!({ "ids": [1, 2] });
        let mut paginated = json!({ "ids": { "data": [3], "current_page": 1 } });
        assert_eq!(list::<i64>(&mut plain, "ids").unwrap(), vec![1, 2]);
        assert_eq!(list::<i64>(&mut paginated, "ids").unwrap(), vec![3]);
    }

    #[test]
    fn test_optional_field_null_is_none() {
        let mut body = json!({ "favori": null });
        assert_eq!(optional_field::<i64>(&mut body, "favori").unwrap(), None);
    }
}
