//! Support for Apple `.stringsdict` plural dictionaries.
//!
//! A stringsdict is a property list: a top-level dict mapping each plural
//! group name to a dict holding a format key (`%#@variable@`) and one
//! sub-dict per variable with the plural rule declaration and the category
//! values. Only the plural-rule subset matters here; entries without a
//! matching format key or without the plural rule type are not plurals
//! and are skipped silently.

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;

use lazy_static::lazy_static;
use quick_xml::{Reader, events::Event};
use regex::Regex;

use crate::{
    error::Error,
    types::{PluralCategory, PluralForms},
};

const FORMAT_KEY: &str = "NSStringLocalizedFormatKey";
const SPEC_TYPE_KEY: &str = "NSStringFormatSpecTypeKey";
const PLURAL_RULE_TYPE: &str = "NSStringPluralRuleType";

lazy_static! {
    // The %#@variable@ reference inside a localized format key.
    static ref VARIABLE_PATTERN: Regex = Regex::new(r"%#@([A-Za-z0-9_]+)@").unwrap();
}

/// One plural group parsed out of a stringsdict file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    pub forms: PluralForms,
}

/// Minimal plist value model: only strings and dicts carry meaning for
/// plural extraction, everything else is opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PlistValue {
    String(String),
    Dict(Vec<(String, PlistValue)>),
    Other,
}

/// Parses the plural groups of a stringsdict document.
pub fn from_reader<R: BufRead>(reader: R) -> Result<Vec<Group>, Error> {
    let mut xml_reader = Reader::from_reader(reader);
    xml_reader.config_mut().trim_text(true);

    let entries = parse_document(&mut xml_reader)?;
    Ok(entries.into_iter().filter_map(group_from_entry).collect())
}

/// Parses the plural groups of a stringsdict string.
pub fn from_str(content: &str) -> Result<Vec<Group>, Error> {
    from_reader(Cursor::new(content))
}

/// Parses the plural groups of a stringsdict file.
pub fn read_from<P: AsRef<Path>>(path: P) -> Result<Vec<Group>, Error> {
    let file = File::open(path).map_err(Error::Io)?;
    from_reader(BufReader::new(file))
}

/// Scans forward to the top-level dict and parses it. A document without
/// one (e.g. an empty plist) yields no entries.
fn parse_document<R: BufRead>(reader: &mut Reader<R>) -> Result<Vec<(String, PlistValue)>, Error> {
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"dict" => {
                return parse_dict(reader);
            }
            Ok(Event::Start(_)) => {} // descend through <plist>
            Ok(Event::Eof) => return Ok(Vec::new()),
            Ok(_) => {}
            Err(e) => return Err(Error::XmlParse(e)),
        }
        buf.clear();
    }
}

/// Parses dict entries after the opening `<dict>` has been consumed.
/// A value with no preceding `<key>` is dropped.
fn parse_dict<R: BufRead>(reader: &mut Reader<R>) -> Result<Vec<(String, PlistValue)>, Error> {
    let mut entries = Vec::new();
    let mut pending_key: Option<String> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"key" => pending_key = Some(read_text(reader)?),
                b"string" => {
                    let value = PlistValue::String(read_text(reader)?);
                    push_entry(&mut entries, &mut pending_key, value);
                }
                b"dict" => {
                    let value = PlistValue::Dict(parse_dict(reader)?);
                    push_entry(&mut entries, &mut pending_key, value);
                }
                _ => {
                    // Arrays, numbers, dates: opaque for plural extraction
                    let end = e.to_end().into_owned();
                    let mut skip_buf = Vec::new();
                    reader
                        .read_to_end_into(end.name(), &mut skip_buf)
                        .map_err(Error::XmlParse)?;
                    push_entry(&mut entries, &mut pending_key, PlistValue::Other);
                }
            },
            Ok(Event::Empty(e)) => {
                let value = if e.name().as_ref() == b"string" {
                    PlistValue::String(String::new())
                } else {
                    PlistValue::Other
                };
                push_entry(&mut entries, &mut pending_key, value);
            }
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => {
                return Err(Error::data_mismatch("unexpected end of plural dictionary"));
            }
            Ok(_) => {}
            Err(e) => return Err(Error::XmlParse(e)),
        }
        buf.clear();
    }

    Ok(entries)
}

fn push_entry(
    entries: &mut Vec<(String, PlistValue)>,
    pending_key: &mut Option<String>,
    value: PlistValue,
) {
    if let Some(key) = pending_key.take() {
        entries.push((key, value));
    }
}

fn read_text<R: BufRead>(reader: &mut Reader<R>) -> Result<String, Error> {
    let mut buf = Vec::new();
    let mut text = String::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Text(e)) => text.push_str(&e.unescape().map_err(Error::XmlParse)?),
            Ok(Event::End(_)) => break,
            Ok(Event::Eof) => {
                return Err(Error::data_mismatch("unexpected end of plural dictionary"));
            }
            Ok(_) => {}
            Err(e) => return Err(Error::XmlParse(e)),
        }
        buf.clear();
    }
    Ok(text)
}

/// Interprets one top-level dict entry as a plural group, or skips it.
fn group_from_entry((name, value): (String, PlistValue)) -> Option<Group> {
    let PlistValue::Dict(entries) = value else {
        return None;
    };

    let format_key = entries.iter().find_map(|(key, value)| match value {
        PlistValue::String(s) if key == FORMAT_KEY => Some(s.as_str()),
        _ => None,
    })?;
    let variable = VARIABLE_PATTERN.captures(format_key)?.get(1)?.as_str();

    let rule = entries.iter().find_map(|(key, value)| match value {
        PlistValue::Dict(d) if key == variable => Some(d),
        _ => None,
    })?;

    let is_plural_rule = rule.iter().any(|(key, value)| {
        key == SPEC_TYPE_KEY && matches!(value, PlistValue::String(s) if s == PLURAL_RULE_TYPE)
    });
    if !is_plural_rule {
        return None;
    }

    let mut forms = PluralForms::new();
    for (key, value) in rule {
        if let (Ok(category), PlistValue::String(text)) = (key.parse::<PluralCategory>(), value) {
            forms.insert(category, text.clone());
        }
    }

    if forms.is_empty() {
        None
    } else {
        Some(Group { name, forms })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>files_count</key>
    <dict>
        <key>NSStringLocalizedFormatKey</key>
        <string>%#@files@</string>
        <key>files</key>
        <dict>
            <key>NSStringFormatSpecTypeKey</key>
            <string>NSStringPluralRuleType</string>
            <key>NSStringFormatValueTypeKey</key>
            <string>d</string>
            <key>one</key>
            <string>%d file</string>
            <key>other</key>
            <string>%d files</string>
        </dict>
    </dict>
</dict>
</plist>
"#;

    #[test]
    fn test_parse_basic_plural_group() {
        let groups = from_str(SAMPLE).unwrap();
        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.name, "files_count");
        assert_eq!(group.forms.len(), 2);
        assert_eq!(group.forms[&PluralCategory::One], "%d file");
        assert_eq!(group.forms[&PluralCategory::Other], "%d files");
    }

    #[test]
    fn test_category_subset_only() {
        let groups = from_str(SAMPLE).unwrap();
        let order: Vec<PluralCategory> = groups[0].forms.keys().copied().collect();
        assert_eq!(order, vec![PluralCategory::One, PluralCategory::Other]);
    }

    #[test]
    fn test_entry_without_format_key_is_skipped() {
        let content = r#"<plist version="1.0"><dict>
            <key>not_a_plural</key>
            <dict>
                <key>SomeOtherKey</key>
                <string>whatever</string>
            </dict>
        </dict></plist>"#;
        assert!(from_str(content).unwrap().is_empty());
    }

    #[test]
    fn test_entry_without_plural_rule_type_is_skipped() {
        let content = r#"<plist version="1.0"><dict>
            <key>widths</key>
            <dict>
                <key>NSStringLocalizedFormatKey</key>
                <string>%#@width@</string>
                <key>width</key>
                <dict>
                    <key>NSStringFormatSpecTypeKey</key>
                    <string>NSStringVariableWidthRuleType</string>
                    <key>other</key>
                    <string>wide</string>
                </dict>
            </dict>
        </dict></plist>"#;
        assert!(from_str(content).unwrap().is_empty());
    }

    #[test]
    fn test_entry_with_mismatched_variable_is_skipped() {
        let content = r#"<plist version="1.0"><dict>
            <key>orphan</key>
            <dict>
                <key>NSStringLocalizedFormatKey</key>
                <string>%#@missing@</string>
                <key>present</key>
                <dict>
                    <key>NSStringFormatSpecTypeKey</key>
                    <string>NSStringPluralRuleType</string>
                    <key>other</key>
                    <string>%d things</string>
                </dict>
            </dict>
        </dict></plist>"#;
        assert!(from_str(content).unwrap().is_empty());
    }

    #[test]
    fn test_non_dict_top_level_value_is_skipped() {
        let content = r#"<plist version="1.0"><dict>
            <key>stray</key>
            <string>just a string</string>
        </dict></plist>"#;
        assert!(from_str(content).unwrap().is_empty());
    }

    #[test]
    fn test_multiple_groups_parse_together() {
        let content = r#"<plist version="1.0"><dict>
            <key>files_count</key>
            <dict>
                <key>NSStringLocalizedFormatKey</key>
                <string>%#@files@</string>
                <key>files</key>
                <dict>
                    <key>NSStringFormatSpecTypeKey</key>
                    <string>NSStringPluralRuleType</string>
                    <key>other</key>
                    <string>%d files</string>
                </dict>
            </dict>
            <key>items_count</key>
            <dict>
                <key>NSStringLocalizedFormatKey</key>
                <string>%#@items@</string>
                <key>items</key>
                <dict>
                    <key>NSStringFormatSpecTypeKey</key>
                    <string>NSStringPluralRuleType</string>
                    <key>one</key>
                    <string>%d item</string>
                    <key>other</key>
                    <string>%d items</string>
                </dict>
            </dict>
        </dict></plist>"#;
        let groups = from_str(content).unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "files_count");
        assert_eq!(groups[1].name, "items_count");
    }

    #[test]
    fn test_empty_plist_yields_no_groups() {
        assert!(from_str(r#"<plist version="1.0"></plist>"#).unwrap().is_empty());
    }
}
