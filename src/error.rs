//! Fault types and reported conditions.
//! Internal faults (`FetchError`, `StorageError`) never cross the public API;
//! they are turned into fallbacks and, where applicable, a `Report`.

/// A condition passed to the error callback and recorded in the reported set.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    MissingEndpoint,
    FetchFailed { url: String, reason: String },
    NoLocales { locale: String },
    UnknownLocale { locale: String },
    NoLocaleForKey { key: String },
    MissingKey { locale: String, key: String },
    MissingKeyWithContext { locale: String, key: String, context: String },
    ContextFallback { locale: String, key: String, context: String },
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Report::MissingEndpoint => {
                write!(f, "unable to fetch translations: no translation endpoint configured")
            }
            Report::FetchFailed { url, reason } => {
                write!(f, "unable to fetch translations from url: {url}. error: {reason}")
            }
            Report::NoLocales { locale } => {
                write!(f, "unable to set locale `{locale}`: no locales available")
            }
            Report::UnknownLocale { locale } => {
                write!(f, "unable to set locale `{locale}`: locale not available")
            }
            Report::NoLocaleForKey { key } => {
                write!(f, "no locale specified when looking up key `{key}`")
            }
            Report::MissingKey { locale, key } => {
                write!(f, "missing translation for locale `{locale}` key `{key}`")
            }
            Report::MissingKeyWithContext { locale, key, context } => write!(
                f,
                "missing translation for locale `{locale}` key `{key}` context `{context}`"
            ),
            Report::ContextFallback { locale, key, context } => write!(
                f,
                "missing translation for locale `{locale}` context `{context}`, \
                 falling back to plain key `{key}`"
            ),
        }
    }
}

/// Failure while retrieving the dictionary from the remote endpoint.
#[derive(Debug)]
pub enum FetchError {
    Client(reqwest::Error),
    Http(reqwest::Error),
    Status(reqwest::StatusCode),
    Decode(serde_json::Error),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Client(e) => write!(f, "HTTP client setup failed: {e}"),
            FetchError::Http(e) => write!(f, "request failed: {e}"),
            FetchError::Status(status) => write!(f, "unexpected status {status}"),
            FetchError::Decode(e) => write!(f, "invalid dictionary body: {e}"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Client(e) | FetchError::Http(e) => Some(e),
            FetchError::Decode(e) => Some(e),
            FetchError::Status(_) => None,
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e)
    }
}

/// Failure of the durable key/value backend behind the dictionary cache.
#[derive(Debug)]
pub enum StorageError {
    Sqlite(rusqlite::Error),
    Serialize(serde_json::Error),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Sqlite(e) => write!(f, "storage error: {e}"),
            StorageError::Serialize(e) => write!(f, "serialization error: {e}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Sqlite(e) => Some(e),
            StorageError::Serialize(e) => Some(e),
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Sqlite(e)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialize(e)
    }
}
