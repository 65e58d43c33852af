//! Static locale lookup tables.
//!
//! Translates iOS-style language codes into Android resource folder
//! suffixes and manifest locale names, and provides display names for
//! synthesized `.strings` headers. Codes absent from a table pass through
//! unchanged.

use std::collections::BTreeMap;

use lazy_static::lazy_static;

lazy_static! {
    /// iOS language code → Android resource folder suffix.
    ///
    /// Region variants use the `-r` region notation; script and UN-region
    /// variants need the BCP 47 compatibility notation (`b+…`). Hebrew and
    /// Yiddish map to the legacy codes Android resources still use.
    static ref ANDROID_FOLDER_SUFFIXES: BTreeMap<&'static str, &'static str> = {
        let mut m = BTreeMap::new();
        m.insert("zh-Hans", "zh-rCN");
        m.insert("zh-Hant", "zh-rTW");
        m.insert("pt-BR", "pt-rBR");
        m.insert("pt-PT", "pt-rPT");
        m.insert("es-419", "b+es+419");
        m.insert("es-MX", "es-rMX");
        m.insert("en-GB", "en-rGB");
        m.insert("en-AU", "en-rAU");
        m.insert("fr-CA", "fr-rCA");
        m.insert("sr-Latn", "b+sr+Latn");
        m.insert("he", "iw");
        m.insert("yi", "ji");
        m
    };

    /// Language code → English display name, used for synthesized headers.
    static ref DISPLAY_NAMES: BTreeMap<&'static str, &'static str> = {
        let mut m = BTreeMap::new();
        m.insert("en", "English");
        m.insert("ru", "Russian");
        m.insert("de", "German");
        m.insert("es", "Spanish");
        m.insert("fr", "French");
        m.insert("it", "Italian");
        m.insert("ja", "Japanese");
        m.insert("ko", "Korean");
        m.insert("pt-BR", "Portuguese (Brazil)");
        m.insert("tr", "Turkish");
        m.insert("uk", "Ukrainian");
        m.insert("zh-Hans", "Chinese Simplified");
        m
    };
}

/// Android folder suffix for a language code; unmapped codes pass through.
pub fn android_folder_suffix(language: &str) -> String {
    ANDROID_FOLDER_SUFFIXES
        .get(language)
        .map(|s| s.to_string())
        .unwrap_or_else(|| language.to_string())
}

/// Name of the Android `values` folder for a language. The default
/// language maps to the plain `values` folder.
pub fn android_values_folder(language: &str, default_language: &str) -> String {
    if language == default_language {
        "values".to_string()
    } else {
        format!("values-{}", android_folder_suffix(language))
    }
}

/// Locale name for `locales_config.xml`, derived from the folder suffix:
/// the `-r` region notation becomes a plain dash, and the `b+…`
/// compatibility notation becomes dash-joined parts without the tag marker.
pub fn android_locale(language: &str) -> String {
    let suffix = android_folder_suffix(language);
    if let Some(parts) = suffix.strip_prefix("b+") {
        parts.split('+').collect::<Vec<_>>().join("-")
    } else {
        suffix.replace("-r", "-")
    }
}

/// English display name of a language code; unknown codes fall back to the
/// raw code.
pub fn display_name(language: &str) -> &str {
    DISPLAY_NAMES.get(language).copied().unwrap_or(language)
}
