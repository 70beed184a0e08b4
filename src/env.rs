use std::{sync::LazyLock, time::Duration};

use reqwest::Url;
use serde::{de::DeserializeOwned, de::Error, Deserialize, Deserializer};
use serde_with::{serde_as, DurationMilliSeconds};
use tracing::error;

const ENV_PREFIX: &str = "BLOCKCHAIR_";

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Sent as `key=` on every request when present.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_url", deserialize_with = "deserialize_base_url")]
    pub api_url: Url,
    /// Number of transaction hashes joined into one dashboard request.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Pause before the single resend of a failed batch.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(default = "default_retry_delay", rename = "retry_delay_ms")]
    pub retry_delay: Duration,
    #[serde(default = "default_address_limit")]
    pub address_limit: u32,
}

fn default_api_url() -> Url {
    Url::parse("https://api.blockchair.com/").expect("default api url is valid")
}

fn default_batch_size() -> usize {
    10
}

fn default_retry_delay() -> Duration {
    Duration::from_millis(1500)
}

fn default_address_limit() -> u32 {
    10_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            batch_size: default_batch_size(),
            retry_delay: default_retry_delay(),
            address_limit: default_address_limit(),
        }
    }
}

/// Parses a url and makes sure it ends in a slash so `Url::join` appends instead of replacing
/// the last path segment.
pub fn deserialize_base_url<'de, D>(deserializer: D) -> Result<Url, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    let s = if s.ends_with('/') { s } else { format!("{}/", s) };
    Url::parse(&s).map_err(Error::custom)
}

pub fn get_app_config<T: DeserializeOwned>() -> T {
    match envy::prefixed(ENV_PREFIX).from_env::<T>() {
        Ok(config) => config,
        Err(err) => {
            error!("failed to parse config: {}", err);
            std::process::exit(1);
        }
    }
}

pub static APP_CONFIG: LazyLock<AppConfig> = LazyLock::new(get_app_config);

#[cfg(test)]
mod tests {
    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> envy::Result<AppConfig> {
        envy::prefixed(ENV_PREFIX).from_iter(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn uses_defaults_when_unset() {
        let config = from_pairs(&[]).unwrap();

        assert_eq!(config.api_key, None);
        assert_eq!(config.api_url.as_str(), "https://api.blockchair.com/");
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.retry_delay, Duration::from_millis(1500));
        assert_eq!(config.address_limit, 10_000);
    }

    #[test]
    fn reads_prefixed_vars() {
        let config = from_pairs(&[
            ("BLOCKCHAIR_API_KEY", "secret"),
            ("BLOCKCHAIR_API_URL", "http://localhost:8080/proxy"),
            ("BLOCKCHAIR_BATCH_SIZE", "25"),
            ("BLOCKCHAIR_RETRY_DELAY_MS", "200"),
            ("BLOCKCHAIR_ADDRESS_LIMIT", "100"),
        ])
        .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.api_url.as_str(), "http://localhost:8080/proxy/");
        assert_eq!(config.batch_size, 25);
        assert_eq!(config.retry_delay, Duration::from_millis(200));
        assert_eq!(config.address_limit, 100);
    }

    #[test]
    fn rejects_bad_url() {
        assert!(from_pairs(&[("BLOCKCHAIR_API_URL", "not a url")]).is_err());
    }
}
