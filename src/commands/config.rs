use anyhow::Result;
use log::debug;
use std::path::PathBuf;
use std::time::Duration;

use crate::{
    cache::{Cache, now_millis},
    client::{ClientConfig, DEFAULT_BASE_URL, OpenCurrencyX},
    http::{HttpTransport, Transport},
    runtime::Runtime,
};

/// Environment variable holding the API base URL.
pub const API_URL_ENV: &str = "OCX_API";

/// Connection overrides taken from the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientOptions {
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub retries: Option<usize>,
}

pub struct Config<R: Runtime, T: Transport> {
    pub runtime: R,
    pub client: OpenCurrencyX<T>,
    pub cache_path: Option<PathBuf>,
}

impl<R: Runtime> Config<R, HttpTransport> {
    pub fn new(runtime: R, options: ClientOptions) -> Result<Self> {
        let client_config = client_config(&runtime, &options);
        debug!("Using API at {}", client_config.base_url());

        let client = OpenCurrencyX::new(client_config)?;
        Ok(Self::with_client(runtime, client))
    }
}

impl<R: Runtime, T: Transport> Config<R, T> {
    pub fn with_client(runtime: R, client: OpenCurrencyX<T>) -> Self {
        let cache_path = Cache::default_path(&runtime);
        Self {
            runtime,
            client,
            cache_path,
        }
    }

    /// The current cache, or an empty one when there is no home directory.
    pub fn load_cache(&self) -> Cache {
        match &self.cache_path {
            Some(path) => Cache::load(&self.runtime, path, now_millis()),
            None => Cache::default(),
        }
    }

    /// Applies `update` to the current cache and writes it back. Failures are
    /// only logged: the cache never fails a command.
    pub fn update_cache(&self, update: impl FnOnce(&mut Cache)) {
        let Some(path) = &self.cache_path else {
            debug!("No home directory, not caching response");
            return;
        };

        let now = now_millis();
        let mut cache = Cache::load(&self.runtime, path, now);
        update(&mut cache);
        if let Err(e) = cache.save(&self.runtime, path, now) {
            debug!("Failed to write cache {:?}: {:#}", path, e);
        }
    }
}

/// Builds the client configuration: `--api`, then `OCX_API`, then the
/// default base URL; timeout and retries fall back to the client defaults.
pub fn client_config<R: Runtime>(runtime: &R, options: &ClientOptions) -> ClientConfig {
    let mut config = ClientConfig::new(resolve_api_url(runtime, options.api_url.clone()));
    if let Some(secs) = options.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    if let Some(retries) = options.retries {
        config = config.with_retries(retries);
    }
    config
}

pub fn resolve_api_url<R: Runtime>(runtime: &R, api_url: Option<String>) -> String {
    api_url
        .or_else(|| runtime.env_var(API_URL_ENV).ok())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CACHE_FILE_NAME;
    use crate::http::MockTransport;
    use crate::runtime::MockRuntime;
    use mockall::predicate::eq;

    fn runtime_with_env(value: Option<&'static str>) -> MockRuntime {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_env_var()
            .with(eq(API_URL_ENV))
            .returning(move |_| {
                value
                    .map(str::to_string)
                    .ok_or(std::env::VarError::NotPresent)
            });
        runtime
    }

    #[test]
    fn test_resolve_api_url_prefers_flag() {
        let runtime = runtime_with_env(Some("http://env.test/api/v1"));
        assert_eq!(
            resolve_api_url(&runtime, Some("http://flag.test".to_string())),
            "http://flag.test"
        );
    }

    #[test]
    fn test_resolve_api_url_from_env() {
        let runtime = runtime_with_env(Some("http://env.test/api/v1"));
        assert_eq!(resolve_api_url(&runtime, None), "http://env.test/api/v1");
    }

    #[test]
    fn test_resolve_api_url_default() {
        let runtime = runtime_with_env(None);
        assert_eq!(resolve_api_url(&runtime, None), DEFAULT_BASE_URL);

        let runtime = runtime_with_env(Some(""));
        assert_eq!(resolve_api_url(&runtime, None), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_client_config_applies_overrides() {
        let runtime = runtime_with_env(None);
        let options = ClientOptions {
            api_url: None,
            timeout_secs: Some(30),
            retries: Some(0),
        };

        let config = client_config(&runtime, &options);
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.retries(), 0);
    }

    #[test]
    fn test_client_config_defaults() {
        let runtime = runtime_with_env(None);
        assert_eq!(
            client_config(&runtime, &ClientOptions::default()),
            ClientConfig::default()
        );
    }

    #[test]
    fn test_update_cache_without_home_does_nothing() {
        let mut runtime = MockRuntime::new();
        runtime.expect_home_dir().returning(|| None);
        runtime.expect_write().never();

        let client = OpenCurrencyX::with_transport(ClientConfig::default(), MockTransport::new());
        let config = Config::with_client(runtime, client);
        assert!(config.cache_path.is_none());

        config.update_cache(|cache| cache.currencies = Some(serde_json::json!({})));
        assert_eq!(config.load_cache(), Cache::default());
    }

    #[test]
    fn test_update_cache_swallows_write_errors() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_home_dir()
            .returning(|| Some(PathBuf::from("/home/user")));
        runtime.expect_exists().returning(|_| false);
        runtime
            .expect_write()
            .with(eq(PathBuf::from("/home/user").join(CACHE_FILE_NAME)), mockall::predicate::always())
            .times(1)
            .returning(|_, _| Err(anyhow::anyhow!("read-only file system")));

        let client = OpenCurrencyX::with_transport(ClientConfig::default(), MockTransport::new());
        let config = Config::with_client(runtime, client);

        config.update_cache(|cache| cache.currencies = Some(serde_json::json!({"USD": {}})));
    }
}
