//! Identity labels and generated bundle ids
//!
//! Both counters are process-wide and only ever increase, so labels stay
//! unique across every registry in the process.

use crate::config::EngineConfig;
use crate::identifiers::BundleId;
use std::sync::atomic::{AtomicU64, Ordering};

static TYPE_COUNT: AtomicU64 = AtomicU64::new(0);
static BUNDLE_SEED: AtomicU64 = AtomicU64::new(0);

/// Next debug label for a metadata record: `<name><sep><n>`
pub fn next_type_label(name: &str, config: &EngineConfig) -> String {
    let n = TYPE_COUNT.fetch_add(1, Ordering::Relaxed) + 1;
    format!("{name}{}{n}", config.label_separator)
}

/// Generate a bundle id for a type that declared none
///
/// Uses the fallback bundle name for anonymous types. The first character is
/// lower-cased when `decapitalize_bundle_ids` is set.
pub fn next_bundle_id(name: &str, config: &EngineConfig) -> BundleId {
    let base = if name.is_empty() {
        config.fallback_bundle_name.as_str()
    } else {
        name
    };
    let n = BUNDLE_SEED.fetch_add(1, Ordering::Relaxed) + 1;
    let id = format!("{base}{}{n}", config.label_separator);
    if config.decapitalize_bundle_ids {
        BundleId::new(decapitalize(&id))
    } else {
        BundleId::new(id)
    }
}

/// Lower-case the first character of `text`
pub fn decapitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Forward chain entry point name for `method`
pub fn chain_entry_name(method: &str, config: &EngineConfig) -> String {
    format!("{method}{}", config.chain_suffix)
}

/// Reverse chain entry point name for `method`
pub fn reverse_chain_entry_name(method: &str, config: &EngineConfig) -> String {
    format!("{method}{}{}", config.chain_suffix, config.reverse_suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_decapitalize_only_first_char() {
        assert_eq!(decapitalize("MixUm$4"), "mixUm$4");
        assert_eq!(decapitalize(""), "");
        assert_eq!(decapitalize("already"), "already");
    }

    #[test]
    fn test_generated_bundle_ids_are_unique() {
        let config = EngineConfig::default();
        let a = next_bundle_id("Logger", &config);
        let b = next_bundle_id("Logger", &config);
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("logger$"));
    }

    #[test]
    fn test_anonymous_bundle_uses_fallback_name() {
        let config = EngineConfig::default();
        let id = next_bundle_id("", &config);
        assert!(id.as_str().starts_with("mixin$"));
    }

    #[test]
    fn test_entry_point_names() {
        let config = EngineConfig::default();
        assert_eq!(chain_entry_name("init", &config), "initChain");
        assert_eq!(reverse_chain_entry_name("init", &config), "initChainRev");
    }

    #[test]
    fn test_type_labels_increase() {
        let config = EngineConfig::default();
        let a = next_type_label("Widget", &config);
        let b = next_type_label("Widget", &config);
        let n = |label: &str| -> u64 {
            label
                .rsplit('$')
                .next()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default()
        };
        assert!(n(&b) > n(&a));
    }

    proptest! {
        #[test]
        fn prop_decapitalize_keeps_tail(s in "[A-Za-z][A-Za-z0-9$]{0,12}") {
            let out = decapitalize(&s);
            prop_assert_eq!(&out[1..], &s[1..]);
            prop_assert!(out.chars().next().map(|c| !c.is_uppercase()).unwrap_or(true));
        }
    }
}
