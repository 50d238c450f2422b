//! Client configuration.
//! `Configuration` is the live record; `ConfigPatch` is a partial override
//! merged shallowly on every `initialize` call.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::warn;

/// Default snapshot lifetime: 1 hour.
pub const DEFAULT_CACHE_EXPIRATION_SECS: i64 = 60 * 60;

/// Default request timeout for the remote fetch.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Receives every reported condition, synchronously.
pub type ErrorCallback = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Clone, Serialize)]
pub struct Configuration {
    pub translation_api_url: Option<String>,
    #[serde(skip_serializing)]
    pub token: String,
    pub storage_key: String,
    pub use_cache: bool,
    pub cache_expiration_secs: Option<i64>,
    pub locale: Option<String>,
    #[serde(skip)]
    pub error_callback: Option<ErrorCallback>,
    pub request_timeout: Option<Duration>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            translation_api_url: None,
            token: String::new(),
            storage_key: String::new(),
            use_cache: true,
            cache_expiration_secs: Some(DEFAULT_CACHE_EXPIRATION_SECS),
            locale: None,
            error_callback: None,
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
        }
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("translation_api_url", &self.translation_api_url)
            .field("token", &"<redacted>")
            .field("storage_key", &self.storage_key)
            .field("use_cache", &self.use_cache)
            .field("cache_expiration_secs", &self.cache_expiration_secs)
            .field("locale", &self.locale)
            .field("error_callback", &self.error_callback.is_some())
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl Configuration {
    /// Shallow merge: every field set in `patch` replaces the current value.
    pub fn merge(&mut self, patch: ConfigPatch) {
        let ConfigPatch {
            translation_api_url,
            token,
            storage_key,
            use_cache,
            cache_expiration_secs,
            locale,
            error_callback,
            request_timeout,
        } = patch;
        if let Some(url) = translation_api_url {
            self.translation_api_url = Some(url);
        }
        if let Some(token) = token {
            self.token = token;
        }
        if let Some(key) = storage_key {
            self.storage_key = key;
        }
        if let Some(use_cache) = use_cache {
            self.use_cache = use_cache;
        }
        if let Some(expiration) = cache_expiration_secs {
            self.cache_expiration_secs = Some(expiration);
        }
        if let Some(locale) = locale {
            self.locale = Some(locale);
        }
        if let Some(callback) = error_callback {
            self.error_callback = Some(callback);
        }
        if let Some(timeout) = request_timeout {
            self.request_timeout = Some(timeout);
        }
    }

    /// The endpoint, if configured and non-empty.
    pub fn endpoint(&self) -> Option<&str> {
        self.translation_api_url
            .as_deref()
            .filter(|url| !url.is_empty())
    }
}

/// Partial configuration. Unset fields leave the current value alone.
#[derive(Clone, Default)]
pub struct ConfigPatch {
    pub translation_api_url: Option<String>,
    pub token: Option<String>,
    pub storage_key: Option<String>,
    pub use_cache: Option<bool>,
    pub cache_expiration_secs: Option<i64>,
    pub locale: Option<String>,
    pub error_callback: Option<ErrorCallback>,
    pub request_timeout: Option<Duration>,
}

impl fmt::Debug for ConfigPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigPatch")
            .field("translation_api_url", &self.translation_api_url)
            .field("storage_key", &self.storage_key)
            .field("use_cache", &self.use_cache)
            .field("cache_expiration_secs", &self.cache_expiration_secs)
            .field("locale", &self.locale)
            .field("error_callback", &self.error_callback.is_some())
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl ConfigPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translation_api_url(mut self, url: impl Into<String>) -> Self {
        self.translation_api_url = Some(url.into());
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = Some(key.into());
        self
    }

    pub fn use_cache(mut self, enabled: bool) -> Self {
        self.use_cache = Some(enabled);
        self
    }

    pub fn cache_expiration_secs(mut self, secs: i64) -> Self {
        self.cache_expiration_secs = Some(secs);
        self
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn error_callback(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.error_callback = Some(Arc::new(callback));
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Read overrides from `PHRASEBOOK_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Same as `from_env`, with an injectable variable lookup.
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            translation_api_url: lookup("PHRASEBOOK_API_URL"),
            token: lookup("PHRASEBOOK_TOKEN"),
            storage_key: lookup("PHRASEBOOK_STORAGE_KEY"),
            use_cache: parse_var(&lookup, "PHRASEBOOK_USE_CACHE"),
            cache_expiration_secs: parse_var(&lookup, "PHRASEBOOK_CACHE_EXPIRATION"),
            locale: lookup("PHRASEBOOK_LOCALE"),
            error_callback: None,
            request_timeout: parse_var::<u64>(&lookup, "PHRASEBOOK_REQUEST_TIMEOUT_SECS")
                .map(Duration::from_secs),
        }
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Option<T> {
    let raw = lookup(name)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(var = name, value = %raw, "ignoring unparseable environment override");
            None
        }
    }
}
