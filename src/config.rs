use crate::{Result, VerifyError};

/// Environment variable holding the service host, e.g. `https://petstore.swagger.io`.
pub const BASE_URL_VAR: &str = "PETSTORE_BASE_URL";
/// Environment variable holding the API version suffix, e.g. `v2`.
pub const API_VERSION_VAR: &str = "PETSTORE_API_VERSION";

/// Location of the pet-store service under test.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_version: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new("https://petstore.swagger.io", "v2")
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, api_version: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_version: api_version.into(),
        }
    }

    /// Reads the configuration from the environment.
    ///
    /// Reads:
    /// - `PETSTORE_BASE_URL`: service host
    /// - `PETSTORE_API_VERSION`: API version path segment
    ///
    /// A `.env` file in the working directory (or a parent) is loaded first
    /// if one exists; variables already set in the process win.
    pub fn from_env() -> Result<Self> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                return Err(VerifyError::Config(format!("could not load .env: {err}")));
            }
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = required(&lookup, BASE_URL_VAR)?;
        let api_version = required(&lookup, API_VERSION_VAR)?;
        Ok(Self::new(base_url, api_version))
    }

    /// Base URL of the versioned API, e.g. `https://petstore.swagger.io/v2`.
    pub fn api_url(&self) -> String {
        let base = self.base_url.trim().trim_end_matches('/');
        let version = self.api_version.trim().trim_matches('/');
        if version.is_empty() {
            base.to_owned()
        } else {
            format!("{base}/{version}")
        }
    }

    /// Absolute URL of a resource path below the versioned API.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url(), path.trim_start_matches('/'))
    }

    /// URL of one item below a collection path, e.g. `user/{username}`.
    ///
    /// `item` becomes exactly one path segment: `/`, `?`, `#` and other
    /// reserved characters are percent-encoded.
    pub fn item_url(&self, path: &str, item: &str) -> Result<String> {
        let endpoint = self.endpoint(path);
        let mut url = reqwest::Url::parse(&endpoint)
            .map_err(|err| VerifyError::Config(format!("invalid API URL {endpoint}: {err}")))?;
        url.path_segments_mut()
            .map_err(|()| VerifyError::Config(format!("API URL {endpoint} cannot have a path")))?
            .pop_if_empty()
            .push(item);
        Ok(url.to_string())
    }
}

fn required<F>(lookup: &F, name: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(name)
        .ok_or_else(|| VerifyError::Config(format!("missing {name} environment variable")))?;
    if value.trim().is_empty() {
        return Err(VerifyError::Config(format!("{name} is set but empty")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{ApiConfig, API_VERSION_VAR, BASE_URL_VAR};
    use crate::VerifyError;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn composes_base_and_version() {
        let config = ApiConfig::from_lookup(lookup(&[
            (BASE_URL_VAR, "https://petstore.swagger.io/"),
            (API_VERSION_VAR, "/v2/"),
        ]))
        .expect("config must load");
        assert_eq!(config.api_url(), "https://petstore.swagger.io/v2");
        assert_eq!(
            config.endpoint("/user/login"),
            "https://petstore.swagger.io/v2/user/login"
        );
        assert_eq!(config.endpoint("pet"), "https://petstore.swagger.io/v2/pet");
    }

    #[test]
    fn missing_variable_is_config_error() {
        let err = ApiConfig::from_lookup(lookup(&[(BASE_URL_VAR, "http://localhost")]))
            .expect_err("version missing");
        match err {
            VerifyError::Config(message) => assert!(message.contains(API_VERSION_VAR)),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn blank_variable_is_config_error() {
        let err = ApiConfig::from_lookup(lookup(&[
            (BASE_URL_VAR, "   "),
            (API_VERSION_VAR, "v2"),
        ]))
        .expect_err("blank base");
        assert!(matches!(err, VerifyError::Config(message) if message.contains("empty")));
    }

    #[test]
    fn item_url_encodes_one_segment() {
        let config = ApiConfig::new("http://localhost:8080/", "v2");
        assert_eq!(
            config.item_url("user", "kit").expect("valid url"),
            "http://localhost:8080/v2/user/kit"
        );
        assert_eq!(
            config.item_url("/store/order", "3").expect("valid url"),
            "http://localhost:8080/v2/store/order/3"
        );
        assert_eq!(
            config.item_url("user", "kit#frag").expect("valid url"),
            "http://localhost:8080/v2/user/kit%23frag"
        );
        assert_eq!(
            config.item_url("user", "kit?x=1").expect("valid url"),
            "http://localhost:8080/v2/user/kit%3Fx=1"
        );
        assert_eq!(
            config.item_url("user", "a/b").expect("valid url"),
            "http://localhost:8080/v2/user/a%2Fb"
        );
    }

    #[test]
    fn item_url_rejects_unparseable_base() {
        let err = ApiConfig::new("not a url", "v2")
            .item_url("user", "kit")
            .expect_err("base must parse");
        assert!(matches!(err, VerifyError::Config(message) if message.contains("invalid API URL")));
    }

    #[test]
    fn default_targets_public_service() {
        assert_eq!(ApiConfig::default().api_url(), "https://petstore.swagger.io/v2");
    }
}
