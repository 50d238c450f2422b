//! Translation context: configuration, the loaded dictionary and the
//! reported-conditions set, shared by every lookup.
//! Loading is cache-first; lookups are synchronous reads of a snapshot.

pub mod cache;
pub mod dictionary;
pub mod fetch;
pub mod interpolate;
pub mod resolve;

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::config::{ConfigPatch, Configuration};
use crate::error::{FetchError, Report, StorageError};
use crate::storage::{MemoryStorage, SqliteStorage, Storage};
use cache::DictionaryCache;
use dictionary::{Dictionary, TranslationMap};
use fetch::RemoteFetcher;
use interpolate::Replacements;
use resolve::{resolve, Lookup};

/// What `Translations::dictionary` hands out for inspection.
#[derive(Debug, Clone, PartialEq)]
pub enum DictionaryView {
    All(Arc<Dictionary>),
    Locale(TranslationMap),
}

/// The translation context. Cheap to share behind an `Arc`; every method
/// takes `&self`.
pub struct Translations {
    config: RwLock<Configuration>,
    /// Swapped whole on every load; lookups clone the `Arc`.
    dictionary: RwLock<Option<Arc<Dictionary>>>,
    reported: Mutex<HashSet<String>>,
    cache: DictionaryCache,
    fetcher: Mutex<Option<(Option<Duration>, Arc<RemoteFetcher>)>>,
}

impl Translations {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            config: RwLock::new(Configuration::default()),
            dictionary: RwLock::new(None),
            reported: Mutex::new(HashSet::new()),
            cache: DictionaryCache::new(storage),
            fetcher: Mutex::new(None),
        }
    }

    /// Context whose cache lives only as long as the process.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Context with a SQLite-backed cache at `db_path`.
    pub fn open_sqlite(db_path: &Path) -> Result<Self, StorageError> {
        Ok(Self::new(Arc::new(SqliteStorage::open(db_path)?)))
    }

    /// Merge `patch` into the configuration and load the dictionary.
    ///
    /// Without an endpoint nothing is loaded and the dictionary is left as is.
    /// When no locale is configured, a successful load selects the first
    /// locale of the dictionary.
    pub async fn initialize(&self, patch: ConfigPatch) -> bool {
        let locale_configured = {
            let mut config = self.config.write();
            config.merge(patch);
            if config.endpoint().is_none() {
                None
            } else {
                Some(config.locale.is_some())
            }
        };
        let Some(locale_configured) = locale_configured else {
            self.report(Report::MissingEndpoint);
            return false;
        };

        let loaded = self.refresh().await;
        if loaded && !locale_configured {
            let first = self
                .dictionary
                .read()
                .as_ref()
                .and_then(|d| d.first_locale().map(str::to_string));
            if let Some(first) = first {
                info!(locale = %first, "defaulting to first loaded locale");
                self.config.write().locale = Some(first);
            }
        }
        loaded
    }

    /// Reload the dictionary: a valid cached snapshot if caching is on,
    /// otherwise the remote endpoint. The result replaces the active
    /// dictionary, so a failed fetch leaves none loaded.
    pub async fn refresh(&self) -> bool {
        let config = self.config.read().clone();
        let Some(url) = config.endpoint() else {
            self.report(Report::MissingEndpoint);
            return false;
        };

        if config.use_cache {
            if let Some(cached) = self
                .cache
                .read(&config.storage_key, config.cache_expiration_secs)
            {
                info!(locales = cached.len(), "dictionary loaded from cache");
                self.install(Some(cached));
                return true;
            }
        }

        match self.fetch(url, &config).await {
            Ok(fetched) => {
                if config.use_cache && !self.cache.write(&fetched, &config.storage_key) {
                    debug!(storage_key = %config.storage_key, "fetched dictionary not cached");
                }
                self.install(Some(fetched));
                true
            }
            Err(e) => {
                self.report(Report::FetchFailed {
                    url: url.to_string(),
                    reason: e.to_string(),
                });
                self.install(None);
                false
            }
        }
    }

    async fn fetch(&self, url: &str, config: &Configuration) -> Result<Dictionary, FetchError> {
        let fetcher = self.fetcher_for(config.request_timeout)?;
        fetcher.fetch_dictionary(url, &config.token).await
    }

    /// Reuse the pooled client unless the configured timeout changed.
    fn fetcher_for(&self, timeout: Option<Duration>) -> Result<Arc<RemoteFetcher>, FetchError> {
        let mut slot = self.fetcher.lock();
        if let Some((built_for, fetcher)) = slot.as_ref() {
            if *built_for == timeout {
                return Ok(Arc::clone(fetcher));
            }
        }
        let fetcher = Arc::new(RemoteFetcher::new(timeout)?);
        *slot = Some((timeout, Arc::clone(&fetcher)));
        Ok(fetcher)
    }

    fn install(&self, dictionary: Option<Dictionary>) {
        *self.dictionary.write() = dictionary.map(Arc::new);
    }

    /// Resolve `key` to a display string. Never fails: unresolved keys come
    /// back as the key itself with `replacements` applied.
    pub fn translate(
        &self,
        key: &str,
        replacements: Option<&Replacements>,
        context: Option<&str>,
        locale: Option<&str>,
    ) -> String {
        self.lookup(Lookup {
            key,
            replacements,
            context,
            locale,
        })
    }

    /// Shorthand for a plain lookup in the active locale.
    pub fn t(&self, key: &str) -> String {
        self.lookup(Lookup::new(key))
    }

    pub fn lookup(&self, lookup: Lookup<'_>) -> String {
        let dictionary = self.dictionary.read().clone();
        let active_locale = self.config.read().locale.clone();
        let resolution = resolve(dictionary.as_deref(), active_locale.as_deref(), lookup);
        if let Some(report) = resolution.report {
            self.report(report);
        }
        resolution.text
    }

    /// The loaded dictionary, or one locale of it when `locale` names a
    /// loaded locale. `None` only when nothing is loaded.
    pub fn dictionary(&self, locale: Option<&str>) -> Option<DictionaryView> {
        let dictionary = self.dictionary.read().clone()?;
        match locale.and_then(|l| dictionary.get(l)) {
            Some(phrases) => Some(DictionaryView::Locale(phrases.clone())),
            None => Some(DictionaryView::All(dictionary)),
        }
    }

    pub fn locales(&self) -> Option<Vec<String>> {
        let dictionary = self.dictionary.read();
        dictionary
            .as_ref()
            .map(|d| d.locales().map(str::to_string).collect())
    }

    /// Set the active locale. Fails only when no dictionary is loaded.
    /// An unknown locale is reported unless it starts with `en`, and is set
    /// either way.
    pub fn set_locale(&self, locale: &str) -> bool {
        let known = self
            .dictionary
            .read()
            .as_ref()
            .map(|d| d.contains_locale(locale));
        let Some(known) = known else {
            self.report(Report::NoLocales {
                locale: locale.to_string(),
            });
            return false;
        };
        if !known && !locale.starts_with("en") {
            self.report(Report::UnknownLocale {
                locale: locale.to_string(),
            });
        }
        self.config.write().locale = Some(locale.to_string());
        true
    }

    pub fn configuration(&self) -> Configuration {
        self.config.read().clone()
    }

    pub fn locale(&self) -> Option<String> {
        self.config.read().locale.clone()
    }

    /// Every distinct message reported so far, sorted.
    pub fn reported_errors(&self) -> Vec<String> {
        let mut messages: Vec<String> = self.reported.lock().iter().cloned().collect();
        messages.sort();
        messages
    }

    /// Hand a condition to the callback and record it. The callback runs
    /// with no lock held.
    fn report(&self, report: Report) {
        let message = report.to_string();
        match report {
            Report::ContextFallback { .. } => info!(%message, "translation reported"),
            _ => warn!(%message, "translation reported"),
        }
        let callback = self.config.read().error_callback.clone();
        if let Some(callback) = callback {
            callback(&message);
        }
        self.reported.lock().insert(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    /// Context with `dictionary` installed directly, bypassing any load.
    fn loaded(dictionary: Dictionary, locale: Option<&str>) -> (Translations, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let translations = Translations::in_memory();
        {
            let mut config = translations.config.write();
            config.merge(ConfigPatch::new().error_callback(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
            config.locale = locale.map(str::to_string);
        }
        translations.install(Some(dictionary));
        (translations, calls)
    }

    fn danish() -> Dictionary {
        Dictionary::new()
            .with_phrase("da-DK", "Contract template", "Kontrakt type")
            .with_phrase("da-DK", "Contract state", "")
    }

    #[test]
    fn translate_without_dictionary_is_interpolated_key() {
        let translations = Translations::in_memory();
        let replacements = Replacements::new().with("n", 3);
        assert_eq!(
            translations.translate("%n files", Some(&replacements), None, None),
            "3 files"
        );
        assert!(translations.reported_errors().is_empty());
    }

    #[test]
    fn missing_phrase_reports_once_per_call() {
        let (translations, calls) = loaded(danish(), Some("da-DK"));
        assert_eq!(translations.t("missing phrase"), "missing phrase");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(translations.t("missing phrase"), "missing phrase");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(translations.reported_errors().len(), 1);
    }

    #[test]
    fn set_locale_without_dictionary_fails_and_keeps_locale() {
        let translations = Translations::in_memory();
        assert!(!translations.set_locale("da-DK"));
        assert_eq!(translations.locale(), None);
        assert_eq!(translations.reported_errors().len(), 1);
    }

    #[test]
    fn set_locale_is_permissive_after_warning() {
        let (translations, calls) = loaded(danish(), Some("da-DK"));
        assert!(translations.set_locale("nk-NO"));
        assert_eq!(translations.locale().as_deref(), Some("nk-NO"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn set_locale_english_prefix_is_not_reported() {
        let (translations, calls) = loaded(danish(), Some("da-DK"));
        assert!(translations.set_locale("en"));
        assert!(translations.set_locale("en-US"));
        assert!(translations.set_locale("da-DK"));
        assert_eq!(translations.locale().as_deref(), Some("da-DK"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn dictionary_view_falls_back_to_everything() {
        let (translations, _) = loaded(danish(), Some("da-DK"));
        match translations.dictionary(Some("da-DK")) {
            Some(DictionaryView::Locale(phrases)) => {
                assert_eq!(phrases["Contract template"], "Kontrakt type");
            }
            other => panic!("expected locale view, got {other:?}"),
        }
        assert!(matches!(
            translations.dictionary(Some("sv-SE")),
            Some(DictionaryView::All(_))
        ));
        assert!(Translations::in_memory().dictionary(None).is_none());
        assert_eq!(translations.locales(), Some(vec!["da-DK".to_string()]));
    }

    #[test]
    fn callback_may_reenter_the_context() {
        let translations = Arc::new(Translations::in_memory());
        translations.install(Some(danish()));
        let inner = Arc::clone(&translations);
        translations.config.write().error_callback = Some(Arc::new(move |_: &str| {
            let _ = inner.locale();
            let _ = inner.reported_errors();
        }));
        translations.config.write().locale = Some("da-DK".into());
        assert_eq!(translations.t("nope"), "nope");
    }

    #[test]
    fn concurrent_lookups_see_whole_snapshots() {
        let (translations, _) = loaded(danish(), Some("da-DK"));
        let translations = Arc::new(translations);
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let translations = Arc::clone(&translations);
                thread::spawn(move || {
                    for _ in 0..200 {
                        let text = translations.t("Contract template");
                        assert!(text == "Kontrakt type" || text == "Kontraktskabelon");
                    }
                })
            })
            .collect();
        for _ in 0..50 {
            translations.install(Some(
                Dictionary::new().with_phrase("da-DK", "Contract template", "Kontraktskabelon"),
            ));
            translations.install(Some(danish()));
        }
        for reader in readers {
            reader.join().unwrap();
        }
    }

    #[tokio::test]
    async fn initialize_without_endpoint_reports_and_keeps_dictionary() {
        let (translations, calls) = loaded(danish(), Some("da-DK"));
        assert!(!translations.initialize(ConfigPatch::new().token("x")).await);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(translations.locales(), Some(vec!["da-DK".to_string()]));
        assert_eq!(translations.configuration().token, "x");
    }

    #[tokio::test]
    async fn refresh_without_endpoint_reports() {
        let translations = Translations::in_memory();
        assert!(!translations.refresh().await);
        assert_eq!(translations.reported_errors().len(), 1);
    }
}
