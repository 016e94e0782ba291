//! Locale-aware name comparison backed by ICU4X.

use std::cmp::Ordering;
use std::fmt;

use icu_collator::{Collator, CollatorOptions, Strength};
use icu_locid::Locale;

/// Locale used when none is configured: the CLDR root collation.
pub const DEFAULT_COLLATION_LOCALE: &str = "und";

/// Compares display names the way people expect them alphabetized.
///
/// Root collation orders Latin before Hangul, ignores case and accents at the
/// primary level and only uses them to separate otherwise equal names.
/// The service builds one at startup and shares it between requests.
pub struct NameCollator {
    locale: String,
    collator: Option<Collator>,
}

impl NameCollator {
    /// Build a collator for a BCP-47 locale string.
    pub fn new(locale: &str) -> Self {
        let parsed: Locale = match locale.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(
                    "Invalid collation locale {:?} ({:?}), using root collation",
                    locale,
                    e
                );
                Locale::UND
            }
        };

        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Tertiary);

        let collator = match Collator::try_new(&(&parsed).into(), options) {
            Ok(collator) => Some(collator),
            Err(e) => {
                tracing::warn!(
                    "No collation data for {}: {:?}; comparing names by code point",
                    parsed,
                    e
                );
                None
            }
        };

        Self {
            locale: parsed.to_string(),
            collator,
        }
    }

    /// The locale this collator resolved to.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn compare(&self, left: &str, right: &str) -> Ordering {
        match &self.collator {
            Some(collator) => collator.compare(left, right),
            None => left.cmp(right),
        }
    }
}

impl Default for NameCollator {
    fn default() -> Self {
        Self::new(DEFAULT_COLLATION_LOCALE)
    }
}

impl fmt::Debug for NameCollator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameCollator")
            .field("locale", &self.locale)
            .field("icu", &self.collator.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collator_is_shareable_across_tasks() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NameCollator>();
    }

    #[test]
    fn test_case_does_not_dominate() {
        let collator = NameCollator::default();
        // Code point order would put "Banana" first.
        assert_eq!(collator.compare("apple", "Banana"), Ordering::Less);
        assert_eq!(collator.compare("Banana", "cherry"), Ordering::Less);
    }

    #[test]
    fn test_accented_letters_sort_with_base_letter() {
        let collator = NameCollator::default();
        // U+00E9 is above 'z' by code point.
        assert_eq!(collator.compare("émile", "zoe"), Ordering::Less);
        assert_eq!(collator.compare("emile", "émile"), Ordering::Less);
    }

    #[test]
    fn test_hangul_and_latin() {
        let collator = NameCollator::default();
        assert_eq!(collator.compare("Ann", "김철수"), Ordering::Less);
        assert_eq!(collator.compare("가나다", "김철수"), Ordering::Less);
        assert_eq!(collator.compare("김철수", "하늘"), Ordering::Less);
    }

    #[test]
    fn test_identical_names_are_equal() {
        let collator = NameCollator::new("ko");
        assert_eq!(collator.compare("김철수", "김철수"), Ordering::Equal);
        assert_eq!(collator.compare("Ann", "Ann"), Ordering::Equal);
    }

    #[test]
    fn test_invalid_locale_falls_back_to_root() {
        let collator = NameCollator::new("not a locale!!");
        assert_eq!(collator.locale(), "und");
        assert_eq!(collator.compare("apple", "Banana"), Ordering::Less);
    }
}
