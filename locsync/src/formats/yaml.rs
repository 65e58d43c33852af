//! YAML projection of the translation model.
//!
//! The document is a nested mapping: section → key → {language: value},
//! with the plural table injected under the reserved `_plurals` key as a
//! sibling of the sections. Ordering is deterministic so diffs stay
//! stable: sections in insertion order, keys alphabetical, the primary
//! language first and the remaining languages alphabetical.

use serde_yaml::{Mapping, Value};

use crate::{
    error::Error,
    traits::Parser,
    types::{Document, PRIMARY_LANGUAGE, PluralCategory, PluralForms, PluralTable, TranslationsData},
};

/// Reserved top-level key holding the plural table. Extracted and removed
/// before the remaining top-level keys are interpreted as sections.
pub const PLURALS_KEY: &str = "_plurals";

/// Puts the primary language first, keeping the (already alphabetical)
/// order of the rest.
fn primary_first<'a, I>(languages: I) -> Vec<&'a String>
where
    I: Iterator<Item = &'a String>,
{
    let mut primary = None;
    let mut rest = Vec::new();
    for language in languages {
        if language == PRIMARY_LANGUAGE {
            primary = Some(language);
        } else {
            rest.push(language);
        }
    }

    let mut out = Vec::with_capacity(rest.len() + 1);
    if let Some(primary) = primary {
        out.push(primary);
    }
    out.extend(rest);
    out
}

/// Projects a document into an ordered YAML value.
pub fn to_value(document: &Document) -> Value {
    let mut root = Mapping::new();

    for section in &document.data.sections {
        let mut section_map = Mapping::new();
        for (key, translations) in &section.keys {
            let mut key_map = Mapping::new();
            for language in primary_first(translations.languages()) {
                key_map.insert(
                    Value::String(language.clone()),
                    Value::String(translations.get(language).unwrap_or_default().to_string()),
                );
            }
            section_map.insert(Value::String(key.clone()), Value::Mapping(key_map));
        }
        root.insert(Value::String(section.name.clone()), Value::Mapping(section_map));
    }

    if !document.plurals.is_empty() {
        let mut plurals_map = Mapping::new();
        for (group, languages) in &document.plurals.groups {
            let mut group_map = Mapping::new();
            for language in primary_first(languages.keys()) {
                let mut forms_map = Mapping::new();
                for (category, value) in &languages[language] {
                    forms_map.insert(
                        Value::String(category.as_str().to_string()),
                        Value::String(value.clone()),
                    );
                }
                group_map.insert(Value::String(language.clone()), Value::Mapping(forms_map));
            }
            plurals_map.insert(Value::String(group.clone()), Value::Mapping(group_map));
        }
        root.insert(Value::String(PLURALS_KEY.to_string()), Value::Mapping(plurals_map));
    }

    Value::Mapping(root)
}

/// Interprets a YAML value as a document. A null document (empty file) is
/// an empty document; anything else must match the projected shape.
pub fn from_value(value: Value) -> Result<Document, Error> {
    let mut root = match value {
        Value::Mapping(root) => root,
        Value::Null => return Ok(Document::default()),
        _ => return Err(Error::data_mismatch("top-level YAML node must be a mapping")),
    };

    let mut plurals = PluralTable::new();
    if let Some(plurals_value) = root.remove(PLURALS_KEY) {
        parse_plurals(plurals_value, &mut plurals)?;
    }

    let mut data = TranslationsData::new();
    for (section_value, keys_value) in root {
        let section_name = expect_string(&section_value, "section name")?;
        let section = data.section_mut(&section_name);
        for (key_value, languages_value) in expect_mapping(keys_value, "section body")? {
            let key = expect_string(&key_value, "key name")?;
            for (language_value, text_value) in expect_mapping(languages_value, "key body")? {
                let language = expect_string(&language_value, "language code")?;
                let text = expect_string(&text_value, "translation value")?;
                section.add(&key, &language, text);
            }
        }
    }

    Ok(Document::new(data, plurals))
}

fn parse_plurals(value: Value, table: &mut PluralTable) -> Result<(), Error> {
    for (group_value, languages_value) in expect_mapping(value, "plural table")? {
        let group = expect_string(&group_value, "plural group name")?;
        for (language_value, forms_value) in expect_mapping(languages_value, "plural group body")? {
            let language = expect_string(&language_value, "language code")?;
            let mut forms = PluralForms::new();
            for (category_value, text_value) in expect_mapping(forms_value, "plural forms")? {
                let category_name = expect_string(&category_value, "plural category")?;
                let category: PluralCategory = category_name
                    .parse()
                    .map_err(Error::DataMismatch)?;
                forms.insert(category, expect_string(&text_value, "plural value")?);
            }
            table.insert(group.as_str(), language.as_str(), forms);
        }
    }
    Ok(())
}

fn expect_string(value: &Value, what: &str) -> Result<String, Error> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::data_mismatch(format!("{} must be a string", what)))
}

fn expect_mapping(value: Value, what: &str) -> Result<Mapping, Error> {
    match value {
        Value::Mapping(mapping) => Ok(mapping),
        // An empty section serializes as `{}` but hand-edited documents may
        // leave the body blank, which YAML reads as null.
        Value::Null => Ok(Mapping::new()),
        _ => Err(Error::data_mismatch(format!("{} must be a mapping", what))),
    }
}

impl Parser for Document {
    fn from_reader<R: std::io::BufRead>(reader: R) -> Result<Self, Error> {
        let value: Value = serde_yaml::from_reader(reader)?;
        from_value(value)
    }

    fn to_writer<W: std::io::Write>(&self, writer: W) -> Result<(), Error> {
        serde_yaml::to_writer(writer, &to_value(self)).map_err(Error::Yaml)
    }
}
