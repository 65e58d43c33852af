//! Android string-resource emission.
//!
//! Serializes the merged translation model into one `strings.xml` per
//! language plus the shared `locales_config.xml` manifest. Values go
//! through placeholder conversion first and Android escaping second;
//! Android needs `\'` and `\"` escapes that a generic XML writer would
//! never produce, so text is escaped here and written pre-escaped.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::{
    error::Error,
    locale,
    placeholder::convert_placeholders,
    types::{Document, PluralCategory},
};

/// One `strings.xml` document: the flat key namespace of one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    pub language: String,
    pub strings: Vec<StringResource>,
    pub plurals: Vec<PluralsResource>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringResource {
    pub name: String,
    pub value: String,
}

/// A `<plurals>` block: only the categories the language declares, in
/// fixed category order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralsResource {
    pub name: String,
    pub items: Vec<(PluralCategory, String)>,
}

/// Escapes a value for Android resources. The order is fixed: ampersand
/// must go first so the entities introduced by the later steps are not
/// escaped twice.
pub fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\'', "\\'")
        .replace('"', "\\\"")
}

fn android_value(value: &str) -> String {
    escape(&convert_placeholders(value))
}

impl Format {
    /// Collects every key with a value for `language`, merging all sections
    /// into one flat, alphabetical namespace, plus the language's plural
    /// groups. Keys without a value for this language are simply omitted.
    pub fn from_document(document: &Document, language: &str) -> Self {
        let mut merged = BTreeMap::new();
        for section in &document.data.sections {
            for (key, translations) in &section.keys {
                if let Some(value) = translations.get(language) {
                    merged.insert(key.clone(), value.to_string());
                }
            }
        }

        let strings = merged
            .into_iter()
            .map(|(name, value)| StringResource { name, value })
            .collect();

        let plurals = document
            .plurals
            .groups_for(language)
            .map(|(name, forms)| PluralsResource {
                name: name.clone(),
                items: forms
                    .iter()
                    .map(|(category, value)| (*category, value.clone()))
                    .collect(),
            })
            .collect();

        Format {
            language: language.to_string(),
            strings,
            plurals,
        }
    }

    /// Write to any writer (file, memory, etc.).
    pub fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml = Writer::new(&mut writer);

        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml.write_event(Event::Text(BytesText::new("\n")))?;

        xml.write_event(Event::Start(BytesStart::new("resources")))?;
        xml.write_event(Event::Text(BytesText::new("\n")))?;

        for string in &self.strings {
            let mut elem = BytesStart::new("string");
            elem.push_attribute(("name", string.name.as_str()));

            xml.write_event(Event::Start(elem))?;
            xml.write_event(Event::Text(BytesText::from_escaped(android_value(
                &string.value,
            ))))?;
            xml.write_event(Event::End(BytesEnd::new("string")))?;
            xml.write_event(Event::Text(BytesText::new("\n")))?;
        }

        for plurals in &self.plurals {
            let mut elem = BytesStart::new("plurals");
            elem.push_attribute(("name", plurals.name.as_str()));

            xml.write_event(Event::Start(elem))?;
            xml.write_event(Event::Text(BytesText::new("\n")))?;
            for (category, value) in &plurals.items {
                let mut item = BytesStart::new("item");
                item.push_attribute(("quantity", category.as_str()));

                xml.write_event(Event::Start(item))?;
                xml.write_event(Event::Text(BytesText::from_escaped(android_value(value))))?;
                xml.write_event(Event::End(BytesEnd::new("item")))?;
                xml.write_event(Event::Text(BytesText::new("\n")))?;
            }
            xml.write_event(Event::End(BytesEnd::new("plurals")))?;
            xml.write_event(Event::Text(BytesText::new("\n")))?;
        }

        xml.write_event(Event::End(BytesEnd::new("resources")))?;
        xml.write_event(Event::Text(BytesText::new("\n")))?;
        Ok(())
    }

    /// Write to file path.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let file = File::create(path)?;
        self.to_writer(BufWriter::new(file))
    }
}

/// The `locales_config.xml` manifest listing every target locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalesConfig {
    pub locales: Vec<String>,
}

impl LocalesConfig {
    /// Derives the deduplicated, alphabetical locale list for a set of
    /// languages.
    pub fn from_languages<'a, I>(languages: I) -> Self
    where
        I: IntoIterator<Item = &'a String>,
    {
        let locales: BTreeSet<String> = languages
            .into_iter()
            .map(|language| locale::android_locale(language))
            .collect();
        LocalesConfig {
            locales: locales.into_iter().collect(),
        }
    }

    /// Write to any writer (file, memory, etc.).
    pub fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml = Writer::new(&mut writer);

        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml.write_event(Event::Text(BytesText::new("\n")))?;

        let mut root = BytesStart::new("locale-config");
        root.push_attribute(("xmlns:android", "http://schemas.android.com/apk/res/android"));
        xml.write_event(Event::Start(root))?;
        xml.write_event(Event::Text(BytesText::new("\n")))?;

        for locale_name in &self.locales {
            let mut elem = BytesStart::new("locale");
            elem.push_attribute(("android:name", locale_name.as_str()));
            xml.write_event(Event::Empty(elem))?;
            xml.write_event(Event::Text(BytesText::new("\n")))?;
        }

        xml.write_event(Event::End(BytesEnd::new("locale-config")))?;
        xml.write_event(Event::Text(BytesText::new("\n")))?;
        Ok(())
    }

    /// Write to file path.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let file = File::create(path)?;
        self.to_writer(BufWriter::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PluralForms, PluralTable, TranslationsData};

    fn sample_document() -> Document {
        let mut data = TranslationsData::new();
        let localizable = data.section_mut("Localizable");
        localizable.add("cancel", "en", "Cancel");
        localizable.add("cancel", "ru", "Отмена");
        localizable.add("delete", "en", "Delete");
        data.section_mut("InfoPlist").add("CFBundleName", "en", "My App");

        let mut plurals = PluralTable::new();
        let mut en = PluralForms::new();
        en.insert(PluralCategory::One, "%d file".to_string());
        en.insert(PluralCategory::Other, "%d files".to_string());
        plurals.insert("files_count", "en", en);

        Document::new(data, plurals)
    }

    #[test]
    fn test_escape_order() {
        assert_eq!(
            escape(r#"It's "fun" & <cool>"#),
            r#"It\'s \"fun\" &amp; &lt;cool&gt;"#
        );
    }

    #[test]
    fn test_escape_does_not_double_escape_entities() {
        assert_eq!(escape("a < b & b > c"), "a &lt; b &amp; b &gt; c");
    }

    #[test]
    fn test_from_document_merges_sections_flat() {
        let format = Format::from_document(&sample_document(), "en");
        let names: Vec<&str> = format.strings.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["CFBundleName", "cancel", "delete"]);
    }

    #[test]
    fn test_from_document_omits_missing_keys() {
        let format = Format::from_document(&sample_document(), "ru");
        let names: Vec<&str> = format.strings.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["cancel"]);
        assert!(format.plurals.is_empty());
    }

    #[test]
    fn test_writer_emits_string_elements() {
        let format = Format::from_document(&sample_document(), "en");
        let mut out = Vec::new();
        format.to_writer(&mut out).unwrap();
        let xml = String::from_utf8(out).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<resources>\n"));
        assert!(xml.contains("<string name=\"cancel\">Cancel</string>"));
        assert!(xml.ends_with("</resources>\n"));
    }

    #[test]
    fn test_writer_applies_placeholder_conversion() {
        let mut data = TranslationsData::new();
        data.section_mut("Localizable")
            .add("progress", "en", "%d of %d (%.1f%%)");
        let document = Document::new(data, PluralTable::new());

        let format = Format::from_document(&document, "en");
        let mut out = Vec::new();
        format.to_writer(&mut out).unwrap();
        let xml = String::from_utf8(out).unwrap();

        assert!(xml.contains("<string name=\"progress\">%1$d of %2$d (%3$.1f%%)</string>"));
    }

    #[test]
    fn test_writer_escapes_values() {
        let mut data = TranslationsData::new();
        data.section_mut("Localizable")
            .add("teaser", "en", "It's \"fun\" & <cool>");
        let document = Document::new(data, PluralTable::new());

        let format = Format::from_document(&document, "en");
        let mut out = Vec::new();
        format.to_writer(&mut out).unwrap();
        let xml = String::from_utf8(out).unwrap();

        assert!(xml.contains(r#"<string name="teaser">It\'s \"fun\" &amp; &lt;cool&gt;</string>"#));
    }

    #[test]
    fn test_plural_block_subset_in_fixed_order() {
        let format = Format::from_document(&sample_document(), "en");
        assert_eq!(format.plurals.len(), 1);
        let categories: Vec<PluralCategory> =
            format.plurals[0].items.iter().map(|(c, _)| *c).collect();
        assert_eq!(categories, vec![PluralCategory::One, PluralCategory::Other]);

        let mut out = Vec::new();
        format.to_writer(&mut out).unwrap();
        let xml = String::from_utf8(out).unwrap();
        assert!(xml.contains("<plurals name=\"files_count\">"));
        let one = xml.find("<item quantity=\"one\">%d file</item>").unwrap();
        let other = xml.find("<item quantity=\"other\">%d files</item>").unwrap();
        assert!(one < other);
    }

    #[test]
    fn test_plural_values_go_through_conversion_and_escaping() {
        let mut plurals = PluralTable::new();
        let mut ru = PluralForms::new();
        ru.insert(PluralCategory::One, "%d файл из %d".to_string());
        plurals.insert("files_count", "ru", ru);
        let document = Document::new(TranslationsData::new(), plurals);

        let format = Format::from_document(&document, "ru");
        let mut out = Vec::new();
        format.to_writer(&mut out).unwrap();
        let xml = String::from_utf8(out).unwrap();

        assert!(xml.contains("<item quantity=\"one\">%1$d файл из %2$d</item>"));
    }

    #[test]
    fn test_locales_config_dedupes_and_sorts() {
        let languages: Vec<String> = ["zh-Hans", "en", "sr-Latn", "en"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let config = LocalesConfig::from_languages(&languages);
        assert_eq!(config.locales, vec!["en", "sr-Latn", "zh-CN"]);
    }

    #[test]
    fn test_locales_config_writer() {
        let languages: Vec<String> = ["zh-Hans", "en"].iter().map(|s| s.to_string()).collect();
        let config = LocalesConfig::from_languages(&languages);

        let mut out = Vec::new();
        config.to_writer(&mut out).unwrap();
        let xml = String::from_utf8(out).unwrap();

        assert!(xml.contains(
            "<locale-config xmlns:android=\"http://schemas.android.com/apk/res/android\">"
        ));
        assert!(xml.contains("<locale android:name=\"en\"/>"));
        assert!(xml.contains("<locale android:name=\"zh-CN\"/>"));
    }
}
