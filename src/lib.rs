//! Phrasebook: remote phrase dictionary client.
//! Loads a locale-keyed dictionary (cache first, then the remote endpoint),
//! resolves phrase keys with optional disambiguation context, and fills in
//! `%name` placeholders. Lookups never fail; problems go to an error callback.

pub mod config;
pub mod error;
pub mod storage;
pub mod telemetry;
pub mod translate;

pub use config::{ConfigPatch, Configuration, ErrorCallback};
pub use error::Report;
pub use storage::{MemoryStorage, SqliteStorage, Storage};
pub use translate::dictionary::{Dictionary, TranslationMap};
pub use translate::interpolate::{interpolate, Replacement, Replacements};
pub use translate::resolve::Lookup;
pub use translate::{DictionaryView, Translations};
