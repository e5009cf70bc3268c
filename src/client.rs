use std::fmt;

use serde::Serialize;

use crate::{
    AttemptFailure, Executor, ExecutorOptions, Method, ReqwestExecutor, RequestDescriptor,
    Response, Result, Schema, VerifyError,
};

/// Issues HTTP calls that only succeed once both the status code and the
/// body contract match.
#[derive(Clone)]
pub struct VerifiedClient<E = ReqwestExecutor> {
    executor: E,
}

impl<E: fmt::Debug> fmt::Debug for VerifiedClient<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerifiedClient")
            .field("executor", &self.executor)
            .finish()
    }
}

impl Default for VerifiedClient<ReqwestExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl VerifiedClient<ReqwestExecutor> {
    /// Creates a client backed by a fresh `reqwest` executor.
    pub fn new() -> Self {
        Self::with_executor(ReqwestExecutor::new())
    }

    /// Applies executor options such as the per-attempt timeout.
    pub fn with_options(self, opts: ExecutorOptions) -> Self {
        Self::with_executor(self.executor.with_options(opts))
    }
}

impl<E: Executor> VerifiedClient<E> {
    /// Creates a client around any request executor.
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Runs a verified call.
    ///
    /// Attempts are issued back to back, up to `request.max_attempts`. An
    /// attempt whose status differs from `request.expected_status` (or that
    /// fails with a transient transport error) is logged and retried without
    /// looking at its body. The first attempt with the expected status has
    /// its body parsed and validated against `schema`; a decode or schema
    /// failure there is returned immediately and never retried.
    pub async fn call<S>(&self, request: &RequestDescriptor, schema: &S) -> Result<Response>
    where
        S: Schema + ?Sized,
    {
        request.ensure_valid()?;

        let mut attempt = 0;
        loop {
            attempt += 1;
            tracing::debug!(
                attempt,
                max_attempts = request.max_attempts,
                method = %request.method,
                url = %request.url,
                "issuing request"
            );

            let failure = match self.executor.execute(request).await {
                Ok(response) if response.status() == request.expected_status => {
                    verify_body(&response, schema, &request.url)?;
                    tracing::debug!(attempt, url = %request.url, "response verified");
                    return Ok(response);
                }
                Ok(response) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = request.max_attempts,
                        url = %request.url,
                        status = response.status(),
                        expected = request.expected_status,
                        "attempt {attempt} to {} returned unexpected status",
                        request.url
                    );
                    AttemptFailure::Status(response.status())
                }
                Err(err) if err.is_transient() => {
                    tracing::warn!(
                        attempt,
                        max_attempts = request.max_attempts,
                        url = %request.url,
                        error = %err,
                        "attempt {attempt} to {} failed",
                        request.url
                    );
                    AttemptFailure::Transport(err.to_string())
                }
                Err(err) => return Err(err),
            };

            if attempt >= request.max_attempts {
                return Err(VerifyError::Exhausted {
                    url: request.url.clone(),
                    attempts: attempt,
                    last: failure,
                });
            }
        }
    }

    /// Verified GET with the default attempt bound.
    pub async fn get<S>(
        &self,
        url: impl Into<String>,
        expected_status: u16,
        schema: &S,
    ) -> Result<Response>
    where
        S: Schema + ?Sized,
    {
        let request = RequestDescriptor::new(Method::Get, url).expect_status(expected_status);
        self.call(&request, schema).await
    }

    /// Verified POST of a JSON body with the default attempt bound.
    pub async fn post<T, S>(
        &self,
        url: impl Into<String>,
        body: &T,
        expected_status: u16,
        schema: &S,
    ) -> Result<Response>
    where
        T: Serialize + ?Sized,
        S: Schema + ?Sized,
    {
        let request = RequestDescriptor::new(Method::Post, url)
            .with_json(body)?
            .expect_status(expected_status);
        self.call(&request, schema).await
    }

    /// Verified PUT of a JSON body with the default attempt bound.
    pub async fn put<T, S>(
        &self,
        url: impl Into<String>,
        body: &T,
        expected_status: u16,
        schema: &S,
    ) -> Result<Response>
    where
        T: Serialize + ?Sized,
        S: Schema + ?Sized,
    {
        let request = RequestDescriptor::new(Method::Put, url)
            .with_json(body)?
            .expect_status(expected_status);
        self.call(&request, schema).await
    }

    /// Verified DELETE with the default attempt bound.
    pub async fn delete<S>(
        &self,
        url: impl Into<String>,
        expected_status: u16,
        schema: &S,
    ) -> Result<Response>
    where
        S: Schema + ?Sized,
    {
        let request = RequestDescriptor::new(Method::Delete, url).expect_status(expected_status);
        self.call(&request, schema).await
    }
}

fn verify_body<S>(response: &Response, schema: &S, url: &str) -> Result<()>
where
    S: Schema + ?Sized,
{
    let body = response.json()?;
    schema
        .validate(&body)
        .map_err(|violation| VerifyError::Schema {
            url: url.to_owned(),
            violation,
        })
}
