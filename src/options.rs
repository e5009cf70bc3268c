/// Configures the per-attempt HTTP timeout of [`crate::ReqwestExecutor`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExecutorOptions {
    /// Per-attempt timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self { timeout_ms: 10_000 }
    }
}
