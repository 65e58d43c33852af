//! Support for Apple `.strings` string tables.
//!
//! The format is a set of `"key" = "value";` pairs with optional comments.
//! Parsing is a scan-for-pattern extraction: anything that is not a quoted
//! pair (headers, comments, blank lines) is ignored. Writing re-serializes
//! one section for one language, re-using or synthesizing the leading
//! header comment block.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use indoc::formatdoc;
use lazy_static::lazy_static;
use regex::Regex;

use crate::{error::Error, locale, traits::Parser, types::Section};

lazy_static! {
    // "KEY" = "VALUE"; with escape-aware quoted atoms and an optional
    // trailing line comment.
    static ref PAIR_PATTERN: Regex = Regex::new(
        r#""((?:\\.|[^"\\])*)"\s*=\s*"((?:\\.|[^"\\])*)"\s*;[ \t]*(?://[^\n]*)?"#
    )
    .unwrap();
    // First line that starts a quoted pair; everything before it is header.
    static ref FIRST_PAIR_LINE: Regex =
        Regex::new(r#"(?m)^[ \t]*"(?:\\.|[^"\\])*"[ \t]*="#).unwrap();
}

/// Represents one `.strings` file: a section rendered for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    /// Language code for this file. The format itself carries no language
    /// metadata, so this is set by the caller from the `.lproj` path.
    pub language: String,
    /// Section name, used for the synthesized header.
    pub section: String,
    /// Leading comment block re-used from an existing file, trimmed.
    /// When `None`, writing synthesizes a default header.
    pub header: Option<String>,
    /// All key-value pairs, in emission order.
    pub pairs: Vec<Pair>,
}

/// A single key-value pair. Keys and values are stored unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    pub key: String,
    pub value: String,
}

/// Escapes a value for emission: backslash first, then double quote.
pub fn escape(value: &str) -> String {
    value.replace('\\', r"\\").replace('"', "\\\"")
}

/// Unescapes a quoted atom: exactly `\"` → `"` and `\\` → `\`.
/// Any other backslash sequence passes through untouched.
pub fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some('"') => {
                    out.push('"');
                    chars.next();
                }
                Some('\\') => {
                    out.push('\\');
                    chars.next();
                }
                _ => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Reads a `.strings` file into a UTF-8 string, decoding UTF-16 variants
/// by their BOM.
pub fn read_decoded<P: AsRef<Path>>(path: P) -> Result<String, Error> {
    let file = File::open(path).map_err(Error::Io)?;
    let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
        .bom_override(true)
        .build(file);

    let mut decoded = String::new();
    decoder.read_to_string(&mut decoded).map_err(Error::Io)?;
    Ok(decoded)
}

/// Extracts the leading comment block of an existing file: everything
/// before the first quoted-pair line, trimmed. Returns `None` when the
/// file starts with a pair or contains no pairs at all.
pub fn existing_header(content: &str) -> Option<String> {
    let first_pair = FIRST_PAIR_LINE.find(content)?;
    let header = content[..first_pair.start()].trim();
    if header.is_empty() {
        None
    } else {
        Some(header.to_string())
    }
}

fn default_header(section: &str, language: &str) -> String {
    formatdoc! {"
        /*
          {section}.strings

          {name}
        */",
        section = section,
        name = locale::display_name(language),
    }
}

impl Format {
    /// Scans text content for quoted pairs. Language and section are left
    /// empty; the caller fills them in from the file path.
    pub fn from_content(content: &str) -> Self {
        let pairs = PAIR_PATTERN
            .captures_iter(content)
            .map(|captures| Pair {
                key: unescape(&captures[1]),
                value: unescape(&captures[2]),
            })
            .collect();

        Format {
            language: String::new(),
            section: String::new(),
            header: existing_header(content),
            pairs,
        }
    }

    /// Renders one section for one language. Keys come out in the section's
    /// alphabetical order; a key with no value for `language` becomes an
    /// empty-string pair and is returned in the missing-key list.
    pub fn from_section(
        section: &Section,
        language: &str,
        header: Option<String>,
    ) -> (Self, Vec<String>) {
        let mut missing = Vec::new();
        let pairs = section
            .keys
            .iter()
            .map(|(key, translations)| {
                let value = match translations.get(language) {
                    Some(value) => value.to_string(),
                    None => {
                        missing.push(key.clone());
                        String::new()
                    }
                };
                Pair {
                    key: key.clone(),
                    value,
                }
            })
            .collect();

        let format = Format {
            language: language.to_string(),
            section: section.name.clone(),
            header,
            pairs,
        };
        (format, missing)
    }
}

impl Parser for Format {
    fn from_reader<R: std::io::BufRead>(mut reader: R) -> Result<Self, Error> {
        let mut content = String::new();
        reader.read_to_string(&mut content).map_err(Error::Io)?;
        Ok(Format::from_content(&content))
    }

    fn to_writer<W: std::io::Write>(&self, mut writer: W) -> Result<(), Error> {
        let header = self
            .header
            .clone()
            .unwrap_or_else(|| default_header(&self.section, &self.language));

        let mut content = header;
        if !self.pairs.is_empty() {
            content.push_str("\n\n");
            for pair in &self.pairs {
                content.push_str(&format!(
                    "\"{}\" = \"{}\";\n",
                    escape(&pair.key),
                    escape(&pair.value)
                ));
            }
        } else {
            content.push('\n');
        }

        writer.write_all(content.as_bytes()).map_err(Error::Io)
    }

    /// Override default file reading to support BOM-aware decoding
    /// (e.g. UTF-16 Apple .strings).
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let decoded = read_decoded(path)?;
        Self::from_str(&decoded)
    }
}
