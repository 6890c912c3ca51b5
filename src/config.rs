use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::Result;

/// Configuration for the Kameleoon client, handed as-is to the
/// [`ClientFactory`](crate::ClientFactory).
///
/// # Examples
/// ```
/// # use std::time::Duration;
/// # use kameleoon_openfeature::ClientConfig;
/// let config = ClientConfig::new("client-id", "client-secret")
///     .environment("production")
///     .refresh_interval(Duration::from_secs(5 * 60));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub(crate) client_id: String,
    pub(crate) client_secret: String,
    #[serde(default)]
    pub(crate) environment: Option<String>,
    #[serde(
        default = "default_refresh_interval",
        rename = "refreshIntervalMinutes",
        with = "minutes"
    )]
    pub(crate) refresh_interval: Duration,
    #[serde(
        default = "default_timeout",
        rename = "defaultTimeoutMillisecond",
        with = "milliseconds"
    )]
    pub(crate) default_timeout: Duration,
    #[serde(default)]
    pub(crate) top_level_domain: Option<String>,
}

fn default_refresh_interval() -> Duration {
    ClientConfig::DEFAULT_REFRESH_INTERVAL
}

fn default_timeout() -> Duration {
    ClientConfig::DEFAULT_TIMEOUT
}

impl ClientConfig {
    /// How often the client refreshes its configuration by default.
    pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60 * 60);

    /// Default timeout for network requests made by the client.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Create a default configuration using the specified API credentials.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        ClientConfig {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            environment: None,
            refresh_interval: ClientConfig::DEFAULT_REFRESH_INTERVAL,
            default_timeout: ClientConfig::DEFAULT_TIMEOUT,
            top_level_domain: None,
        }
    }

    /// Read configuration from a JSON file.
    ///
    /// ```json
    /// {
    ///   "clientId": "client-id",
    ///   "clientSecret": "client-secret",
    ///   "environment": "staging",
    ///   "refreshIntervalMinutes": 5
    /// }
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read(path)?;
        let config = serde_json::from_slice(&contents)?;
        log::debug!(target: "kameleoon", path:display = path.display(); "loaded client configuration");
        Ok(config)
    }

    /// Set the environment flags are evaluated in.
    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Override how often the client refreshes its configuration.
    pub fn refresh_interval(mut self, refresh_interval: Duration) -> Self {
        self.refresh_interval = refresh_interval;
        self
    }

    /// Override the timeout for network requests.
    pub fn default_timeout(mut self, default_timeout: Duration) -> Self {
        self.default_timeout = default_timeout;
        self
    }

    /// Set the top-level domain used for the visitor code cookie.
    pub fn top_level_domain(mut self, top_level_domain: impl Into<String>) -> Self {
        self.top_level_domain = Some(top_level_domain.into());
        self
    }

    #[allow(missing_docs)]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    #[allow(missing_docs)]
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    #[allow(missing_docs)]
    pub fn get_environment(&self) -> Option<&str> {
        self.environment.as_deref()
    }

    #[allow(missing_docs)]
    pub fn get_refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    #[allow(missing_docs)]
    pub fn get_default_timeout(&self) -> Duration {
        self.default_timeout
    }

    #[allow(missing_docs)]
    pub fn get_top_level_domain(&self) -> Option<&str> {
        self.top_level_domain.as_deref()
    }
}

mod minutes {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs() / 60)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let minutes = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(minutes * 60))
    }
}

mod milliseconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
