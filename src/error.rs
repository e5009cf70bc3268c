use crate::{AttemptFailure, SchemaViolation};

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// No attempt produced the expected status code.
    #[error("max retries reached: {attempts} attempts to {url} failed, last: {last}")]
    Exhausted {
        /// Target URL of the call.
        url: String,
        /// Number of requests issued.
        attempts: usize,
        /// Outcome of the final attempt.
        last: AttemptFailure,
    },
    /// Status matched but the body broke the response contract.
    #[error("schema violation for {url}: {violation}")]
    Schema {
        url: String,
        violation: SchemaViolation,
    },
    /// Response body could not be parsed as JSON.
    #[error("decode error: {0}")]
    Decode(String),
    /// Invalid configuration or call parameters.
    #[error("config error: {0}")]
    Config(String),
}

impl VerifyError {
    /// Returns `true` for transport failures worth another attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(err) => {
                err.is_timeout() || err.is_connect() || err.is_request() || err.is_body()
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{AttemptFailure, SchemaViolation, VerifyError};

    #[test]
    fn exhausted_message_names_url_and_last_status() {
        let err = VerifyError::Exhausted {
            url: "http://petstore/v2/user".to_owned(),
            attempts: 5,
            last: AttemptFailure::Status(404),
        };
        let message = err.to_string();
        assert!(message.starts_with("max retries reached"));
        assert!(message.contains("http://petstore/v2/user"));
        assert!(message.contains("404"));
    }

    #[test]
    fn non_transport_errors_are_not_transient() {
        let schema = VerifyError::Schema {
            url: "u".to_owned(),
            violation: SchemaViolation::new("/code", "expected integer"),
        };
        assert!(!schema.is_transient());
        assert!(!VerifyError::Decode("bad".to_owned()).is_transient());
        assert!(!VerifyError::Config("bad".to_owned()).is_transient());
    }
}
