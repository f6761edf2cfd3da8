use serde::{Deserialize, Serialize};
use url::Url;

use super::ConfigError;

/// Platform backend this service sits next to.
///
/// Accepted and validated so deployments can share one config file with the
/// backend, but none of the current reports call it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamConfig {
    /// Base URL of the backend API, e.g. `http://backend:8000`.
    pub base_url: String,
}

impl UpstreamConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            ConfigError::Validation(format!(
                "upstream.base_url '{}' is not a valid URL: {e}",
                self.base_url
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "upstream.base_url must use http or https, got '{}'",
                url.scheme()
            )));
        }
        Ok(())
    }
}
