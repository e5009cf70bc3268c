use std::fmt;

use serde::Serialize;

use crate::{QueryValue, Result, VerifyError};

/// Attempt bound used when the caller does not pick one.
pub const DEFAULT_MAX_ATTEMPTS: usize = 5;

/// HTTP method supported by verified calls.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Whether a request body is sent for this method.
    pub fn accepts_body(self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to issue and verify one call.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Absolute target URL.
    pub url: String,
    pub query: Vec<(String, QueryValue)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    /// Status code that stops retrying, compared by exact equality.
    pub expected_status: u16,
    pub max_attempts: usize,
}

impl RequestDescriptor {
    /// Builds a descriptor expecting `200 OK` with the default attempt bound.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
            expected_status: 200,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::Put, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::Delete, url)
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Attaches a JSON body.
    ///
    /// The body is kept on the descriptor for every method but only sent
    /// for POST and PUT; see [`RequestDescriptor::body_for_send`].
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let value = serde_json::to_value(body)
            .map_err(|err| VerifyError::Config(format!("request body is not valid JSON: {err}")))?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn expect_status(mut self, status: u16) -> Self {
        self.expected_status = status;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Returns the body only when the method carries one.
    pub fn body_for_send(&self) -> Option<&serde_json::Value> {
        if self.method.accepts_body() {
            self.body.as_ref()
        } else {
            None
        }
    }

    pub(crate) fn ensure_valid(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(VerifyError::Config(
                "max_attempts must be at least 1".to_owned(),
            ));
        }
        if self.url.trim().is_empty() {
            return Err(VerifyError::Config("request URL is empty".to_owned()));
        }
        Ok(())
    }
}
