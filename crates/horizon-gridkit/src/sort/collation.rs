//! Locale-aware string comparison.

use std::cmp::Ordering;
use std::fmt;

use horizon_gridkit_core::logging::targets;
use icu::collator::options::CollatorOptions;
use icu::collator::{Collator, CollatorBorrowed};
use icu::locale::Locale;

/// Locale used when a requested tag cannot be parsed.
const FALLBACK_LOCALE: &str = "en";

/// String ordering used by string sort rules.
pub enum Collation {
    /// ICU collation for a locale.
    Icu {
        locale: Locale,
        collator: CollatorBorrowed<'static>,
    },
    /// Plain code point order.
    Codepoint,
}

impl Collation {
    /// Collation for a BCP 47 tag such as `"de-DE"`.
    ///
    /// An unparsable tag falls back to English; if no collation data is
    /// available the result compares by code point.
    pub fn for_locale(tag: &str) -> Self {
        let locale: Locale = match tag.parse() {
            Ok(locale) => locale,
            Err(err) => {
                tracing::warn!(target: targets::SORT, tag, %err, "invalid locale tag, using {FALLBACK_LOCALE}");
                icu::locale::locale!("en")
            }
        };

        match Collator::try_new(locale.clone().into(), CollatorOptions::default()) {
            Ok(collator) => Collation::Icu { locale, collator },
            Err(err) => {
                tracing::warn!(target: targets::SORT, %locale, %err, "no collation data, comparing by code point");
                Collation::Codepoint
            }
        }
    }

    /// Code point order, independent of locale.
    pub fn codepoint() -> Self {
        Collation::Codepoint
    }

    /// The collation locale, if locale-aware.
    pub fn locale(&self) -> Option<&Locale> {
        match self {
            Collation::Icu { locale, .. } => Some(locale),
            Collation::Codepoint => None,
        }
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match self {
            Collation::Icu { collator, .. } => collator.compare(a, b),
            Collation::Codepoint => a.cmp(b),
        }
    }
}

impl Default for Collation {
    fn default() -> Self {
        Self::for_locale(FALLBACK_LOCALE)
    }
}

impl fmt::Debug for Collation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collation::Icu { locale, .. } => f.debug_tuple("Icu").field(&locale.to_string()).finish(),
            Collation::Codepoint => f.write_str("Codepoint"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_aware_case() {
        let c = Collation::for_locale("en-US");
        assert!(c.locale().is_some());
        // Code point order puts every capital first.
        assert_eq!(Collation::codepoint().compare("apple", "Banana"), Ordering::Greater);
        assert_eq!(c.compare("apple", "Banana"), Ordering::Less);
    }

    #[test]
    fn test_accents_sort_with_base_letter() {
        let c = Collation::default();
        assert_eq!(c.compare("école", "fromage"), Ordering::Less);
        assert_eq!(Collation::codepoint().compare("école", "fromage"), Ordering::Greater);
    }

    #[test]
    fn test_invalid_tag_falls_back() {
        let c = Collation::for_locale("not a locale!!");
        assert_eq!(c.locale().map(|l| l.to_string()), Some("en".to_string()));
        assert_eq!(c.compare("a", "a"), Ordering::Equal);
    }
}
