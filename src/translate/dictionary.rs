//! Locale-keyed phrase dictionary.
//! Locales keep the order of the JSON body they were parsed from, so the
//! first locale of a remote response is well defined.

use std::collections::HashMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One locale's phrase key -> translation mapping.
pub type TranslationMap = HashMap<String, String>;

/// Full locale -> `TranslationMap` mapping.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    order: Vec<String>,
    locales: HashMap<String, TranslationMap>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a locale. A replaced locale keeps its position.
    pub fn insert(&mut self, locale: impl Into<String>, map: TranslationMap) {
        let locale = locale.into();
        if !self.locales.contains_key(&locale) {
            self.order.push(locale.clone());
        }
        self.locales.insert(locale, map);
    }

    pub fn get(&self, locale: &str) -> Option<&TranslationMap> {
        self.locales.get(locale)
    }

    pub fn contains_locale(&self, locale: &str) -> bool {
        self.locales.contains_key(locale)
    }

    /// Locales in load order.
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn first_locale(&self) -> Option<&str> {
        self.order.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Builder helper: add one phrase to a locale, creating the locale if needed.
    pub fn with_phrase(
        mut self,
        locale: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let locale = locale.into();
        if !self.locales.contains_key(&locale) {
            self.order.push(locale.clone());
        }
        self.locales
            .entry(locale)
            .or_default()
            .insert(key.into(), value.into());
        self
    }
}

impl PartialEq for Dictionary {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order && self.locales == other.locales
    }
}

impl Eq for Dictionary {}

impl Serialize for Dictionary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.order.len()))?;
        for locale in &self.order {
            if let Some(phrases) = self.locales.get(locale) {
                map.serialize_entry(locale, phrases)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Dictionary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DictionaryVisitor)
    }
}

struct DictionaryVisitor;

impl<'de> Visitor<'de> for DictionaryVisitor {
    type Value = Dictionary;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of locale to a map of phrase key to translation")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut dictionary = Dictionary::new();
        while let Some((locale, phrases)) = access.next_entry::<String, TranslationMap>()? {
            dictionary.insert(locale, phrases);
        }
        Ok(dictionary)
    }
}
