//! Comtrade client configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Annual HS commodity endpoint of the Comtrade v1 API.
pub const DEFAULT_BASE_URL: &str = "https://comtradeapi.un.org/data/v1/get/C/A/HS";

/// Where and how to reach the trade API.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComtradeConfig {
    /// Endpoint URL, without query string.
    pub base_url: String,
    /// Subscription key. Requests go out unauthenticated when unset.
    pub api_key: Option<String>,
}

impl Default for ComtradeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
        }
    }
}

// Keeps the subscription key out of logs.
impl fmt::Debug for ComtradeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComtradeConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
