//! `petstore-verify` issues HTTP calls that only succeed once both the
//! status code and the response body contract match.
//!
//! The core is [`VerifiedClient::call`]: it retries status mismatches up to
//! a bound (5 by default) and fails immediately when a body with the
//! expected status breaks its [`Schema`]. [`PetStoreApi`] builds typed
//! Petstore v2 operations on top of it.

mod client;
mod config;
mod error;
mod executor;
mod fixtures;
mod options;
pub mod petstore;
mod request;
mod schema;
mod types;
mod value;

pub use client::VerifiedClient;
pub use config::{ApiConfig, API_VERSION_VAR, BASE_URL_VAR};
pub use error::VerifyError;
pub use executor::{Executor, ReqwestExecutor};
pub use fixtures::{FakeFixtures, FixtureSource};
pub use options::ExecutorOptions;
pub use petstore::PetStoreApi;
pub use request::{Method, RequestDescriptor, DEFAULT_MAX_ATTEMPTS};
pub use schema::{JsonSchema, Schema, SchemaViolation};
pub use types::{AttemptFailure, Response};
pub use value::QueryValue;

pub type Result<T> = std::result::Result<T, VerifyError>;
