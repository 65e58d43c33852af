//! Core, format-agnostic types for locsync.
//! Parsers populate these; every writer consumes them read-only.

use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The designated base language. It sorts first in every serialization.
pub const PRIMARY_LANGUAGE: &str = "en";

/// A single translation key with all its per-language values.
///
/// Language codes are unique within a key by construction; ordering of the
/// backing map is not significant, serialization applies its own order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TranslationKey {
    #[serde(default)]
    pub translations: BTreeMap<String, String>,
}

impl TranslationKey {
    pub fn insert(&mut self, language: impl Into<String>, value: impl Into<String>) {
        self.translations.insert(language.into(), value.into());
    }

    pub fn get(&self, language: &str) -> Option<&str> {
        self.translations.get(language).map(String::as_str)
    }

    pub fn languages(&self) -> impl Iterator<Item = &String> {
        self.translations.keys()
    }
}

/// A named group of translation keys corresponding to one string table
/// (e.g. `Localizable` vs. `InfoPlist`). Sections are independent
/// namespaces: the same key name may exist in two sections with
/// unrelated values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Section {
    pub name: String,

    /// Key name → translations. The map keeps keys in alphabetical order,
    /// which is the order every writer emits them in.
    #[serde(default)]
    pub keys: BTreeMap<String, TranslationKey>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Section {
            name: name.into(),
            keys: BTreeMap::new(),
        }
    }

    /// Records one value for `key` in `language`, creating the key if needed.
    pub fn add(&mut self, key: &str, language: &str, value: impl Into<String>) {
        self.keys
            .entry(key.to_string())
            .or_default()
            .insert(language, value.into());
    }

    /// All languages used by at least one key in this section.
    pub fn languages(&self) -> BTreeSet<String> {
        self.keys
            .values()
            .flat_map(|key| key.languages().cloned())
            .collect()
    }
}

/// The root aggregate: every section of the project, in insertion order.
///
/// Constructed empty, populated by exactly one parser pass (or YAML
/// deserialization), then handed read-only to every writer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct TranslationsData {
    pub sections: Vec<Section>,
}

impl TranslationsData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Returns the section with the given name, appending an empty one first
    /// if it does not exist yet.
    pub fn section_mut(&mut self, name: &str) -> &mut Section {
        if let Some(index) = self.sections.iter().position(|s| s.name == name) {
            &mut self.sections[index]
        } else {
            self.sections.push(Section::new(name));
            self.sections.last_mut().unwrap()
        }
    }

    /// Total number of keys across all sections.
    pub fn key_count(&self) -> usize {
        self.sections.iter().map(|s| s.keys.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|s| s.keys.is_empty())
    }

    /// All languages across all sections, computed on demand.
    pub fn all_languages(&self) -> BTreeSet<String> {
        self.sections
            .iter()
            .flat_map(|section| section.languages())
            .collect()
    }
}

/// Standard plural categories. The declaration order is the fixed order
/// plural items are emitted in.
#[derive(Ord, PartialOrd, Eq, PartialEq, Debug, Clone, Copy, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    /// All categories, in emission order.
    pub const ALL: [PluralCategory; 6] = [
        PluralCategory::Zero,
        PluralCategory::One,
        PluralCategory::Two,
        PluralCategory::Few,
        PluralCategory::Many,
        PluralCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PluralCategory::Zero => "zero",
            PluralCategory::One => "one",
            PluralCategory::Two => "two",
            PluralCategory::Few => "few",
            PluralCategory::Many => "many",
            PluralCategory::Other => "other",
        }
    }
}

impl FromStr for PluralCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zero" => Ok(PluralCategory::Zero),
            "one" => Ok(PluralCategory::One),
            "two" => Ok(PluralCategory::Two),
            "few" => Ok(PluralCategory::Few),
            "many" => Ok(PluralCategory::Many),
            "other" => Ok(PluralCategory::Other),
            _ => Err(format!("Unknown plural category: {}", s)),
        }
    }
}

/// All plural forms for one language: category → value. Only the categories
/// the language actually declares are present.
pub type PluralForms = BTreeMap<PluralCategory, String>;

/// Plural groups keyed by name, each holding per-language form sets.
///
/// Stored as a sibling of [`TranslationsData`], never inside a section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PluralTable {
    pub groups: BTreeMap<String, BTreeMap<String, PluralForms>>,
}

impl PluralTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the plural forms of `group` for `language`.
    pub fn insert(&mut self, group: impl Into<String>, language: impl Into<String>, forms: PluralForms) {
        self.groups
            .entry(group.into())
            .or_default()
            .insert(language.into(), forms);
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Plural groups that have forms for `language`, in group-name order.
    pub fn groups_for<'a>(&'a self, language: &'a str) -> impl Iterator<Item = (&'a String, &'a PluralForms)> {
        self.groups
            .iter()
            .filter_map(move |(name, languages)| languages.get(language).map(|forms| (name, forms)))
    }

    pub fn all_languages(&self) -> BTreeSet<String> {
        self.groups
            .values()
            .flat_map(|languages| languages.keys().cloned())
            .collect()
    }
}

/// The full translation state of one run: sections plus the plural table.
/// This is the unit the YAML projection reads and writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub data: TranslationsData,
    pub plurals: PluralTable,
}

impl Document {
    pub fn new(data: TranslationsData, plurals: PluralTable) -> Self {
        Document { data, plurals }
    }

    /// Union of every language in the sections and the plural table.
    pub fn all_languages(&self) -> BTreeSet<String> {
        let mut languages = self.data.all_languages();
        languages.extend(self.plurals.all_languages());
        languages
    }
}
