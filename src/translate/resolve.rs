//! Phrase lookup with context fallback.
//! Pure over a dictionary snapshot; the caller reports the returned condition.

use super::dictionary::Dictionary;
use super::interpolate::{interpolate, Replacements};
use crate::error::Report;

/// Outcome of a lookup: the string to show and, if any, the condition to report.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub text: String,
    pub report: Option<Report>,
}

impl Resolution {
    fn quiet(text: String) -> Self {
        Self { text, report: None }
    }

    fn reported(text: String, report: Report) -> Self {
        Self {
            text,
            report: Some(report),
        }
    }
}

/// Composite key for a context-qualified phrase: `key<context>`.
pub fn context_key(key: &str, context: &str) -> String {
    format!("{key}<{context}>")
}

/// Lookup parameters for one `resolve` call.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lookup<'a> {
    pub key: &'a str,
    pub replacements: Option<&'a Replacements>,
    pub context: Option<&'a str>,
    pub locale: Option<&'a str>,
}

impl<'a> Lookup<'a> {
    pub fn new(key: &'a str) -> Self {
        Self {
            key,
            ..Self::default()
        }
    }

    pub fn replacements(mut self, replacements: &'a Replacements) -> Self {
        self.replacements = Some(replacements);
        self
    }

    pub fn context(mut self, context: &'a str) -> Self {
        self.context = Some(context);
        self
    }

    pub fn locale(mut self, locale: &'a str) -> Self {
        self.locale = Some(locale);
        self
    }
}

/// Resolve `lookup` against `dictionary`, using `active_locale` when the
/// lookup carries no locale of its own. Unresolved keys fall back to the
/// interpolated key itself.
pub fn resolve(
    dictionary: Option<&Dictionary>,
    active_locale: Option<&str>,
    lookup: Lookup<'_>,
) -> Resolution {
    let Lookup {
        key,
        replacements,
        context,
        locale,
    } = lookup;
    let fallback = || interpolate(key, replacements);
    // Empty context or locale strings count as not given.
    let context = context.filter(|c| !c.is_empty());
    let locale = locale
        .filter(|l| !l.is_empty())
        .or(active_locale.filter(|l| !l.is_empty()));

    if key.is_empty() {
        return Resolution::quiet(String::new());
    }
    let Some(dictionary) = dictionary else {
        return Resolution::quiet(fallback());
    };
    let Some(locale) = locale else {
        return Resolution::reported(
            fallback(),
            Report::NoLocaleForKey {
                key: key.to_string(),
            },
        );
    };
    // A locale without loaded entries is not a miss.
    let Some(phrases) = dictionary.get(locale) else {
        return Resolution::quiet(fallback());
    };

    let Some(context) = context else {
        return match phrases.get(key) {
            Some(value) => Resolution::quiet(interpolate(value, replacements)),
            None => Resolution::reported(
                fallback(),
                Report::MissingKey {
                    locale: locale.to_string(),
                    key: key.to_string(),
                },
            ),
        };
    };

    if let Some(value) = phrases.get(&context_key(key, context)) {
        return Resolution::quiet(interpolate(value, replacements));
    }
    match phrases.get(key) {
        Some(value) => Resolution::reported(
            interpolate(value, replacements),
            Report::ContextFallback {
                locale: locale.to_string(),
                key: key.to_string(),
                context: context.to_string(),
            },
        ),
        None => Resolution::reported(
            fallback(),
            Report::MissingKeyWithContext {
                locale: locale.to_string(),
                key: key.to_string(),
                context: context.to_string(),
            },
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn danish() -> Dictionary {
        Dictionary::new()
            .with_phrase("da-DK", "Contract template", "Kontrakt type")
            .with_phrase("da-DK", "Contract state", "")
            .with_phrase("da-DK", "Open", "Åben")
            .with_phrase("da-DK", "Open<verb>", "Åbn")
            .with_phrase("da-DK", "Close<verb>", "Luk")
            .with_phrase(
                "da-DK",
                "You have %num1 unread messages and %num2 notifications",
                "Du har %num1 ulæste beskeder og %num2 notifikationer",
            )
    }

    fn run(dictionary: Option<&Dictionary>, lookup: Lookup<'_>) -> Resolution {
        resolve(dictionary, Some("da-DK"), lookup)
    }

    #[test]
    fn empty_key_returns_empty_without_report() {
        let dictionary = danish();
        assert_eq!(run(Some(&dictionary), Lookup::new("")), Resolution::quiet(String::new()));
        assert_eq!(resolve(None, None, Lookup::new("")).report, None);
    }

    #[test]
    fn no_dictionary_degrades_to_interpolated_key() {
        let replacements = Replacements::new().with("n", 2);
        let resolution = resolve(None, None, Lookup::new("%n items").replacements(&replacements));
        assert_eq!(resolution, Resolution::quiet("2 items".into()));
    }

    #[test]
    fn translates_known_key() {
        let dictionary = danish();
        let resolution = run(Some(&dictionary), Lookup::new("Contract template"));
        assert_eq!(resolution, Resolution::quiet("Kontrakt type".into()));
    }

    #[test]
    fn empty_value_is_a_hit() {
        let dictionary = danish();
        let resolution = run(Some(&dictionary), Lookup::new("Contract state"));
        assert_eq!(resolution, Resolution::quiet(String::new()));
    }

    #[test]
    fn missing_key_reports_and_falls_back() {
        let dictionary = danish();
        let replacements = Replacements::new().with("num1", 4).with("num2", "3");
        let resolution = run(
            Some(&dictionary),
            Lookup::new("You have %num1 new contracts with %num2 missing options")
                .replacements(&replacements),
        );
        assert_eq!(resolution.text, "You have 4 new contracts with 3 missing options");
        assert_eq!(
            resolution.report,
            Some(Report::MissingKey {
                locale: "da-DK".into(),
                key: "You have %num1 new contracts with %num2 missing options".into(),
            })
        );
    }

    #[test]
    fn no_locale_anywhere_is_reported() {
        let dictionary = danish();
        let resolution = resolve(Some(&dictionary), None, Lookup::new("Open"));
        assert_eq!(resolution.text, "Open");
        assert_eq!(
            resolution.report,
            Some(Report::NoLocaleForKey { key: "Open".into() })
        );
    }

    #[test]
    fn unloaded_locale_is_silent() {
        let dictionary = danish();
        let resolution = run(Some(&dictionary), Lookup::new("Open").locale("sv-SE"));
        assert_eq!(resolution, Resolution::quiet("Open".into()));
    }

    #[test]
    fn locale_override_beats_active_locale() {
        let dictionary = danish().with_phrase("sv-SE", "Open", "Öppen");
        let resolution = run(Some(&dictionary), Lookup::new("Open").locale("sv-SE"));
        assert_eq!(resolution.text, "Öppen");
    }

    #[test]
    fn context_qualified_hit() {
        let dictionary = danish();
        let resolution = run(Some(&dictionary), Lookup::new("Open").context("verb"));
        assert_eq!(resolution, Resolution::quiet("Åbn".into()));
    }

    #[test]
    fn context_miss_falls_back_to_plain_key_with_report() {
        let dictionary = danish();
        let resolution = run(Some(&dictionary), Lookup::new("Open").context("noun"));
        assert_eq!(resolution.text, "Åben");
        assert!(matches!(resolution.report, Some(Report::ContextFallback { .. })));
    }

    #[test]
    fn context_and_plain_miss_reports_context() {
        let dictionary = danish();
        let resolution = run(Some(&dictionary), Lookup::new("Save").context("verb"));
        assert_eq!(resolution.text, "Save");
        assert_eq!(
            resolution.report,
            Some(Report::MissingKeyWithContext {
                locale: "da-DK".into(),
                key: "Save".into(),
                context: "verb".into(),
            })
        );
    }

    #[test]
    fn context_only_entry_is_missing_without_context() {
        let dictionary = danish();
        let resolution = run(Some(&dictionary), Lookup::new("Close"));
        assert_eq!(resolution.text, "Close");
        assert!(matches!(resolution.report, Some(Report::MissingKey { .. })));
    }

    #[test]
    fn resolved_value_is_interpolated() {
        let dictionary = danish();
        let replacements = Replacements::new().with("num1", 4).with("num2", "3");
        let resolution = run(
            Some(&dictionary),
            Lookup::new("You have %num1 unread messages and %num2 notifications")
                .replacements(&replacements),
        );
        assert_eq!(resolution.text, "Du har 4 ulæste beskeder og 3 notifikationer");
    }

    #[test]
    fn empty_context_is_a_plain_lookup() {
        let dictionary = danish();
        let resolution = run(Some(&dictionary), Lookup::new("Open").context(""));
        assert_eq!(resolution, Resolution::quiet("Åben".into()));
    }

    #[test]
    fn empty_locale_override_uses_active_locale() {
        let dictionary = danish();
        let resolution = run(Some(&dictionary), Lookup::new("Open").locale(""));
        assert_eq!(resolution, Resolution::quiet("Åben".into()));
    }

    #[test]
    fn empty_active_locale_counts_as_unset() {
        let dictionary = danish();
        let resolution = resolve(Some(&dictionary), Some(""), Lookup::new("Open").locale(""));
        assert_eq!(resolution.text, "Open");
        assert_eq!(
            resolution.report,
            Some(Report::NoLocaleForKey { key: "Open".into() })
        );
    }

    #[test]
    fn context_key_uses_angle_brackets() {
        assert_eq!(context_key("Open", "verb"), "Open<verb>");
    }
}
