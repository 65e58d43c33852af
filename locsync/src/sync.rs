//! Directory-tree synchronization between `.lproj` trees, the YAML
//! document, and Android resource trees.
//!
//! The model is fully materialized before any write begins, so read and
//! write phases never interleave; re-running with the same inputs produces
//! byte-identical output.

use std::collections::BTreeSet;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{
    error::Error,
    formats::{android, strings, stringsdict},
    locale,
    traits::Parser,
    types::{Document, PluralTable, TranslationsData},
};

/// A key that has no value for one language. Non-fatal: the run continues
/// and reports these to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingTranslation {
    pub section: String,
    pub key: String,
    pub language: String,
}

impl Display for MissingTranslation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "missing translation for key '{}' in language '{}' ({})",
            self.key, self.language, self.section
        )
    }
}

/// Summary of one extract run.
#[derive(Debug, Clone)]
pub struct ExtractReport {
    pub languages: BTreeSet<String>,
    pub key_count: usize,
    pub plural_group_count: usize,
    pub missing: Vec<MissingTranslation>,
}

/// Summary of one apply run (iOS or Android direction).
#[derive(Debug, Clone)]
pub struct ApplyReport {
    pub languages: BTreeSet<String>,
    pub key_count: usize,
    pub files_written: Vec<PathBuf>,
    pub missing: Vec<MissingTranslation>,
}

/// Synchronizes an iOS resources tree with the YAML document.
pub struct Syncer {
    pub resources_root: PathBuf,
    pub yaml_path: PathBuf,
}

impl Syncer {
    pub fn new(resources_root: impl Into<PathBuf>, yaml_path: impl Into<PathBuf>) -> Self {
        Syncer {
            resources_root: resources_root.into(),
            yaml_path: yaml_path.into(),
        }
    }

    /// Reads every `<lang>.lproj/<Section>.strings` (and optional
    /// `.stringsdict`) under the resources root and writes the YAML
    /// document. Languages and files are visited in sorted order so the
    /// section insertion order is stable across runs.
    pub fn extract(&self) -> Result<ExtractReport, Error> {
        let lproj_dirs = self.lproj_dirs()?;

        let mut data = TranslationsData::new();
        let mut plurals = PluralTable::new();
        let mut languages = BTreeSet::new();

        for (language, dir) in &lproj_dirs {
            languages.insert(language.clone());

            for path in sorted_files(dir, "strings")? {
                let section_name = file_stem(&path);
                let content = strings::read_decoded(&path)?;
                let format = strings::Format::from_content(&content);

                let section = data.section_mut(&section_name);
                for pair in format.pairs {
                    section.add(&pair.key, language, pair.value);
                }
            }

            for path in sorted_files(dir, "stringsdict")? {
                for group in stringsdict::read_from(&path)? {
                    plurals.insert(group.name, language.clone(), group.forms);
                }
            }
        }

        let document = Document::new(data, plurals);
        let missing = collect_missing(&document.data, &languages);

        if let Some(parent) = self.yaml_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        document.write_to(&self.yaml_path)?;

        Ok(ExtractReport {
            languages,
            key_count: document.data.key_count(),
            plural_group_count: document.plurals.groups.len(),
            missing,
        })
    }

    /// Reads the YAML document. Fatal if the file does not exist.
    pub fn load_document(&self) -> Result<Document, Error> {
        if !self.yaml_path.exists() {
            return Err(Error::missing_input(format!(
                "YAML file not found: {}",
                self.yaml_path.display()
            )));
        }
        Document::read_from(&self.yaml_path)
    }

    /// Writes the YAML document back onto the `.strings` tree: one file per
    /// section per language. Existing file headers are preserved; missing
    /// values become empty-string entries and are reported.
    pub fn apply(&self) -> Result<ApplyReport, Error> {
        let document = self.load_document()?;
        let languages = document.all_languages();

        let mut missing = Vec::new();
        let mut files_written = Vec::new();

        for language in &languages {
            let lproj_dir = self.resources_root.join(format!("{}.lproj", language));
            fs::create_dir_all(&lproj_dir)?;

            for section in &document.data.sections {
                let path = lproj_dir.join(format!("{}.strings", section.name));
                let header = if path.exists() {
                    strings::existing_header(&strings::read_decoded(&path)?)
                } else {
                    None
                };

                let (format, missing_keys) =
                    strings::Format::from_section(section, language, header);
                format.write_to(&path)?;

                missing.extend(missing_keys.into_iter().map(|key| MissingTranslation {
                    section: section.name.clone(),
                    key,
                    language: language.clone(),
                }));
                files_written.push(path);
            }
        }

        Ok(ApplyReport {
            key_count: document.data.key_count(),
            languages,
            files_written,
            missing,
        })
    }

    /// Writes the YAML document into an Android resource tree: one
    /// `values[-suffix]/strings.xml` per language plus the shared
    /// `xml/locales_config.xml` manifest. Keys without a value for a
    /// language are omitted from that language's document, without warning.
    pub fn apply_android<P: AsRef<Path>>(
        &self,
        res_root: P,
        default_language: &str,
    ) -> Result<ApplyReport, Error> {
        let document = self.load_document()?;
        let languages = document.all_languages();
        let res_root = res_root.as_ref();

        let mut files_written = Vec::new();

        for language in &languages {
            let dir = res_root.join(locale::android_values_folder(language, default_language));
            fs::create_dir_all(&dir)?;

            let format = android::Format::from_document(&document, language);
            let path = dir.join("strings.xml");
            format.write_to(&path)?;
            files_written.push(path);
        }

        let xml_dir = res_root.join("xml");
        fs::create_dir_all(&xml_dir)?;
        let config = android::LocalesConfig::from_languages(&languages);
        let path = xml_dir.join("locales_config.xml");
        config.write_to(&path)?;
        files_written.push(path);

        Ok(ApplyReport {
            key_count: document.data.key_count(),
            languages,
            files_written,
            missing: Vec::new(),
        })
    }

    /// All `<lang>.lproj` directories under the resources root, sorted by
    /// language. Fatal if the root is missing or holds none.
    fn lproj_dirs(&self) -> Result<Vec<(String, PathBuf)>, Error> {
        let not_found = || {
            Error::missing_input(format!(
                "no *.lproj directories found in {}",
                self.resources_root.display()
            ))
        };

        let entries = fs::read_dir(&self.resources_root).map_err(|_| not_found())?;

        let mut dirs = Vec::new();
        for entry in entries {
            let path = entry.map_err(Error::Io)?.path();
            if path.is_dir() && path.extension().is_some_and(|ext| ext == "lproj") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    dirs.push((stem.to_string(), path));
                }
            }
        }
        dirs.sort();

        if dirs.is_empty() {
            return Err(not_found());
        }
        Ok(dirs)
    }
}

fn sorted_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, Error> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default()
        .to_string()
}

/// Every (section, key, language) triple with no value, in section
/// insertion order, then key order, then language order.
fn collect_missing(
    data: &TranslationsData,
    languages: &BTreeSet<String>,
) -> Vec<MissingTranslation> {
    let mut missing = Vec::new();
    for section in &data.sections {
        for (key, translations) in &section.keys {
            for language in languages {
                if translations.get(language).is_none() {
                    missing.push(MissingTranslation {
                        section: section.name.clone(),
                        key: key.clone(),
                        language: language.clone(),
                    });
                }
            }
        }
    }
    missing
}
