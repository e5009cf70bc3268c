use std::fmt;

use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;

use crate::{Result, VerifyError};

/// Observed outcome of one attempt: status, headers and raw body.
#[derive(Clone, Debug)]
pub struct Response {
    status: u16,
    headers: HeaderMap,
    body: String,
}

impl Response {
    pub fn new(status: u16, headers: HeaderMap, body: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Raw response body.
    pub fn text(&self) -> &str {
        &self.body
    }

    /// Parses the body as untyped JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        self.json_as()
    }

    /// Parses the body into `T`.
    pub fn json_as<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|err| {
            VerifyError::Decode(format!(
                "invalid response JSON: {err}; body: {}",
                self.body
            ))
        })
    }
}

/// Why an attempt did not count as a match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttemptFailure {
    /// The service answered with a different status code.
    Status(u16),
    /// The request never produced a response.
    Transport(String),
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => write!(f, "status {status}"),
            Self::Transport(message) => write!(f, "transport failure: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
    use serde::Deserialize;

    use crate::{Response, VerifyError};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Envelope {
        code: i64,
        #[serde(rename = "type")]
        kind: String,
        message: String,
    }

    #[test]
    fn json_as_decodes_typed_body() {
        let response = Response::new(
            200,
            HeaderMap::new(),
            r#"{"code":200,"type":"unknown","message":"ok"}"#,
        );
        let envelope: Envelope = response.json_as().expect("body must decode");
        assert_eq!(
            envelope,
            Envelope {
                code: 200,
                kind: "unknown".to_owned(),
                message: "ok".to_owned(),
            }
        );
    }

    #[test]
    fn invalid_json_is_a_decode_error() {
        let response = Response::new(200, HeaderMap::new(), "<html>oops</html>");
        let err = response.json().expect_err("html is not json");
        match err {
            VerifyError::Decode(message) => assert!(message.contains("<html>oops</html>")),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let response = Response::new(200, headers, "{}");
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.header("x-missing"), None);
    }
}
