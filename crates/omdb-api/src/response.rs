//! Success payloads and the shared response normalization.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{OmdbError, OmdbResult};
use crate::transport::RawResponse;

/// Message for a status other than 200.
pub const UNEXPECTED_HTTP_CODE: &str = "Unexpected HTTP code.";

/// Message for a body that is not JSON.
pub const INVALID_JSON: &str = "Invalid JSON returned from server.";

/// Message for a failure payload without an `Error` field.
pub const UNKNOWN_SERVER_ERROR: &str = "Unknown server error.";

/// Title details, exactly as returned by the service.
///
/// Fields such as `Title`, `Year`, `Ratings`, `imdbID` or `BoxOffice` are
/// not validated; read them with [`DetailResult::get`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetailResult(Value);

impl DetailResult {
    /// Returns a field of the payload.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns `Title` if it is a string.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.get("Title").and_then(Value::as_str)
    }

    /// Returns `imdbID` if it is a string.
    #[must_use]
    pub fn imdb_id(&self) -> Option<&str> {
        self.get("imdbID").and_then(Value::as_str)
    }

    /// Borrows the raw payload.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    /// Returns the raw payload.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for DetailResult {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// One page of search results, exactly as returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchResult(Value);

impl SearchResult {
    /// Returns a field of the payload.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Iterates the `Search` summaries (`Title`, `Year`, `imdbID`, `Type`, `Poster`).
    pub fn titles(&self) -> impl Iterator<Item = &Value> {
        self.get("Search")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
    }

    /// Returns `totalResults`, which the service sends as a numeric string.
    #[must_use]
    pub fn total_results(&self) -> Option<u64> {
        match self.get("totalResults")? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Borrows the raw payload.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    /// Returns the raw payload.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for SearchResult {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Maps a finished exchange to a payload or an `OmdbError`.
///
/// Precedence: transport failure, non-200 status, unparsable body, then the
/// service's own `"Response": "False"` signal.
pub(crate) fn normalize(outcome: Result<RawResponse>) -> OmdbResult<Value> {
    let response = match outcome {
        Ok(response) => response,
        Err(e) => {
            let message = format!("{e:#}");
            tracing::warn!(error = %message, "OMDb request failed");
            return Err(OmdbError::transport(message));
        }
    };

    if response.status != 200 {
        tracing::warn!(code = response.status, "OMDb returned unexpected HTTP code");
        return Err(OmdbError::transport(UNEXPECTED_HTTP_CODE).with_extra(response.status));
    }

    let payload: Value = match serde_json::from_slice(&response.body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(error = %e, body_len = response.body.len(), "OMDb returned invalid JSON");
            return Err(OmdbError::server(INVALID_JSON).with_extra(e.to_string()));
        }
    };

    if reports_failure(&payload) {
        let message = match payload.get("Error") {
            None | Some(Value::Null) => String::from(UNKNOWN_SERVER_ERROR),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };
        tracing::debug!(%message, "OMDb reported failure");
        return Err(OmdbError::server(message).with_extra(payload));
    }

    Ok(payload)
}

/// `Response` is `"False"` or `false`.
fn reports_failure(payload: &Value) -> bool {
    match payload.get("Response") {
        Some(Value::String(s)) => s == "False",
        Some(Value::Bool(b)) => !b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;
    use tracing::subscriber::with_default;
    use tracing_mock::{expect, subscriber};

    use super::*;
    use crate::error::ErrorKind;

    fn ok(status: u16, body: &str) -> Result<RawResponse> {
        raw(status, body.as_bytes())
    }

    fn raw(status: u16, body: &[u8]) -> Result<RawResponse> {
        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }

    #[test]
    fn test_transport_failure_keeps_error_text() {
        // Arrange
        let outcome = Err(anyhow::anyhow!("connection refused"));

        // Act
        let err = normalize(outcome).unwrap_err();

        // Assert
        assert_eq!(err.kind, ErrorKind::Transport);
        assert_eq!(err.message, "connection refused");
        assert_eq!(err.extra, None);
    }

    #[test]
    fn test_non_200_is_transport_error_with_code() {
        // Arrange & Act
        let err = normalize(ok(404, "not json at all")).unwrap_err();

        // Assert
        assert_eq!(err.kind, ErrorKind::Transport);
        assert_eq!(err.message, UNEXPECTED_HTTP_CODE);
        assert_eq!(err.extra, Some(json!(404)));
    }

    #[test]
    fn test_status_checked_before_failure_payload() {
        // Arrange
        let body = r#"{"Response":"False","Error":"Invalid API key!"}"#;

        // Act
        let err = normalize(ok(401, body)).unwrap_err();

        // Assert
        assert_eq!(err.kind, ErrorKind::Transport);
        assert_eq!(err.extra, Some(json!(401)));
    }

    #[test]
    fn test_invalid_json_is_server_error() {
        // Arrange & Act
        let err = normalize(ok(200, "{\"Title\": ")).unwrap_err();

        // Assert
        assert_eq!(err.kind, ErrorKind::Server);
        assert_eq!(err.message, INVALID_JSON);
        let extra = err.extra.unwrap();
        assert!(!extra.as_str().unwrap().is_empty());
    }

    #[test]
    fn test_jsonp_body_is_invalid_json() {
        // Arrange & Act
        let err = normalize(ok(200, r#"cb({"Response":"True"})"#)).unwrap_err();

        // Assert
        assert_eq!(err.kind, ErrorKind::Server);
        assert_eq!(err.message, INVALID_JSON);
    }

    #[test]
    fn test_failure_payload_uses_error_field() {
        // Arrange
        let body = include_str!("../../../fixtures/omdb/not_found.json");

        // Act
        let err = normalize(ok(200, body)).unwrap_err();

        // Assert
        assert_eq!(err.kind, ErrorKind::Server);
        assert_eq!(err.message, "Movie not found!");
        assert_eq!(
            err.extra,
            Some(json!({"Response": "False", "Error": "Movie not found!"}))
        );
    }

    #[test]
    fn test_failure_payload_without_error_field() {
        // Arrange & Act
        let err = normalize(ok(200, r#"{"Response":"False"}"#)).unwrap_err();

        // Assert
        assert_eq!(err.kind, ErrorKind::Server);
        assert_eq!(err.message, UNKNOWN_SERVER_ERROR);
    }

    #[test]
    fn test_boolean_false_response_is_failure() {
        // Arrange & Act
        let err = normalize(ok(200, r#"{"Response":false,"Error":"Too many results."}"#))
            .unwrap_err();

        // Assert
        assert_eq!(err.message, "Too many results.");
    }

    #[test]
    fn test_success_payload_passes_through() {
        // Arrange
        let body = include_str!("../../../fixtures/omdb/title_avatar.json");
        let expected: Value = serde_json::from_str(body).unwrap();

        // Act
        let payload = normalize(ok(200, body)).unwrap();

        // Assert
        assert_eq!(payload, expected);
    }

    #[test]
    fn test_invalid_utf8_body_is_invalid_json() {
        // Arrange
        let body = b"{\"Response\":\"True\",\"Title\":\"Av\xfftar\"}";

        // Act
        let err = normalize(raw(200, body)).unwrap_err();

        // Assert
        assert_eq!(err.kind, ErrorKind::Server);
        assert_eq!(err.message, INVALID_JSON);
        assert!(err.extra.is_some());
    }

    #[test]
    fn test_non_ascii_payload_passes_through_unchanged() {
        // Arrange
        let body = r#"{"Response":"True","Title":"Amélie","Country":"日本","Plot":"\u00e9"}"#;

        // Act
        let payload = normalize(ok(200, body)).unwrap();

        // Assert
        assert_eq!(
            payload,
            json!({"Response": "True", "Title": "Amélie", "Country": "日本", "Plot": "é"})
        );
    }

    #[test]
    fn test_payload_without_response_field_passes_through() {
        // Arrange & Act
        let payload = normalize(ok(200, "[1, 2, 3]")).unwrap();

        // Assert
        assert_eq!(payload, json!([1, 2, 3]));
    }

    #[test]
    fn test_unexpected_code_logs_warning() {
        // Arrange
        let (subscriber, handle) = subscriber::mock()
            .event(expect::event().at_level(tracing::Level::WARN))
            .only()
            .run_with_handle();

        // Act
        with_default(subscriber, || {
            let _ = normalize(ok(500, ""));
        });

        // Assert
        handle.assert_finished();
    }

    #[test]
    fn test_reported_failure_logs_debug() {
        // Arrange
        let (subscriber, handle) = subscriber::mock()
            .event(expect::event().at_level(tracing::Level::DEBUG))
            .only()
            .run_with_handle();

        // Act
        with_default(subscriber, || {
            let _ = normalize(ok(200, r#"{"Response":"False","Error":"x"}"#));
        });

        // Assert
        handle.assert_finished();
    }

    #[test]
    fn test_search_result_helpers() {
        // Arrange
        let body = include_str!("../../../fixtures/omdb/search_avatar.json");
        let result = SearchResult::from(serde_json::from_str::<Value>(body).unwrap());

        // Act
        let ids: Vec<&str> = result
            .titles()
            .filter_map(|t| t.get("imdbID").and_then(Value::as_str))
            .collect();

        // Assert
        assert_eq!(ids.first().copied(), Some("tt0499549"));
        assert_eq!(ids.len(), 3);
        assert_eq!(result.total_results(), Some(104));
        assert_eq!(result.as_value().get("Response"), Some(&json!("True")));
    }

    #[test]
    fn test_total_results_accepts_number() {
        // Arrange
        let result = SearchResult::from(json!({"Search": [], "totalResults": 7}));

        // Act & Assert
        assert_eq!(result.total_results(), Some(7));
        assert_eq!(result.titles().count(), 0);
    }

    #[test]
    fn test_detail_result_helpers() {
        // Arrange
        let detail = DetailResult::from(json!({"Title": "Avatar", "imdbID": "tt0499549"}));

        // Act & Assert
        assert_eq!(detail.title(), Some("Avatar"));
        assert_eq!(detail.imdb_id(), Some("tt0499549"));
        assert_eq!(detail.get("Year"), None);
        assert_eq!(detail.as_value(), &json!({"Title": "Avatar", "imdbID": "tt0499549"}));
        assert_eq!(
            detail.into_value(),
            json!({"Title": "Avatar", "imdbID": "tt0499549"})
        );
    }
}
