//! Named placeholder substitution (`%name`).

use std::fmt;

/// A value substituted for a `%name` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Replacement {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl fmt::Display for Replacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Replacement::Text(s) => f.write_str(s),
            Replacement::Integer(n) => write!(f, "{n}"),
            Replacement::Float(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for Replacement {
    fn from(s: &str) -> Self {
        Replacement::Text(s.to_string())
    }
}

impl From<String> for Replacement {
    fn from(s: String) -> Self {
        Replacement::Text(s)
    }
}

impl From<i32> for Replacement {
    fn from(n: i32) -> Self {
        Replacement::Integer(n.into())
    }
}

impl From<u32> for Replacement {
    fn from(n: u32) -> Self {
        Replacement::Integer(n.into())
    }
}

impl From<i64> for Replacement {
    fn from(n: i64) -> Self {
        Replacement::Integer(n)
    }
}

impl From<f64> for Replacement {
    fn from(n: f64) -> Self {
        Replacement::Float(n)
    }
}

/// Ordered placeholder name -> value pairs. Names are unique; setting an
/// existing name replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Replacements {
    entries: Vec<(String, Replacement)>,
}

impl Replacements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Replacement>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Replacement>) -> Self {
        self.set(name, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Replacement)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Replacements
where
    K: Into<String>,
    V: Into<Replacement>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut replacements = Replacements::new();
        for (name, value) in iter {
            replacements.set(name, value);
        }
        replacements
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Replacements
where
    K: Into<String>,
    V: Into<Replacement>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

/// Substitute placeholders in `phrase`.
///
/// For each replacement, in order, only the FIRST `%name` occurrence in the
/// running result is replaced. Repeated placeholders keep their later
/// occurrences, and placeholders without a replacement are left intact.
pub fn interpolate(phrase: &str, replacements: Option<&Replacements>) -> String {
    let Some(replacements) = replacements else {
        return phrase.to_string();
    };
    let mut result = phrase.to_string();
    for (name, value) in replacements.iter() {
        let token = format!("%{name}");
        result = result.replacen(&token, &value.to_string(), 1);
    }
    result
}
