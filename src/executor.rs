use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::{ExecutorOptions, Method, RequestDescriptor, Response, Result, VerifyError};

/// Issues exactly one HTTP request per call.
///
/// The verified call loop drives retries; implementations must not retry
/// on their own.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(&self, request: &RequestDescriptor) -> Result<Response>;
}

/// [`Executor`] backed by `reqwest`.
#[derive(Clone)]
pub struct ReqwestExecutor {
    http: reqwest::Client,
    options: ExecutorOptions,
}

impl fmt::Debug for ReqwestExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestExecutor")
            .field("options", &self.options)
            .finish()
    }
}

impl Default for ReqwestExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestExecutor {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Wraps an existing client, e.g. one with custom TLS or proxy setup.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self {
            http,
            options: ExecutorOptions::default(),
        }
    }

    pub fn with_options(mut self, opts: ExecutorOptions) -> Self {
        self.options = opts;
        self
    }

    fn method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

#[async_trait]
impl Executor for ReqwestExecutor {
    async fn execute(&self, request: &RequestDescriptor) -> Result<Response> {
        let mut builder = self
            .http
            .request(Self::method(request.method), &request.url)
            .timeout(Duration::from_millis(self.options.timeout_ms));

        if !request.query.is_empty() {
            let query: Vec<(&str, String)> = request
                .query
                .iter()
                .map(|(name, value)| (name.as_str(), value.to_string()))
                .collect();
            builder = builder.query(&query);
        }

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = request.body_for_send() {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(VerifyError::Transport)?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(VerifyError::Transport)?;

        Ok(Response::new(status, headers, body))
    }
}
