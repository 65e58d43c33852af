#![forbid(unsafe_code)]
//! Localization sync toolkit for iOS string tables, YAML, and Android
//! resources.
//!
//! Parses `.strings` string tables and `.stringsdict` plural dictionaries
//! into a shared translation model, projects that model to a reviewable
//! YAML document, and re-serializes it back to `.strings` trees or into
//! Android `strings.xml` resources with locale-folder naming, placeholder
//! conversion, and a supported-locales manifest.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use locsync::Syncer;
//!
//! let syncer = Syncer::new("Resources", "translations.yaml");
//!
//! // .strings tree -> translations.yaml
//! let report = syncer.extract()?;
//! eprintln!("{} keys, {} languages", report.key_count, report.languages.len());
//!
//! // translations.yaml -> .strings tree
//! syncer.apply()?;
//!
//! // translations.yaml -> Android res/ tree
//! syncer.apply_android("res", "en")?;
//! # Ok::<(), locsync::Error>(())
//! ```
//!
//! # Model
//!
//! - [`TranslationsData`] holds named [`Section`]s, each an independent
//!   key namespace; every key maps language codes to values.
//! - [`PluralTable`] holds plural groups as a sibling of the sections.
//! - Both are built once per run and then handed read-only to the writers.

pub mod error;
pub mod formats;
pub mod locale;
pub mod placeholder;
pub mod sync;
pub mod traits;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    error::Error,
    sync::{ApplyReport, ExtractReport, MissingTranslation, Syncer},
    types::{
        Document, PRIMARY_LANGUAGE, PluralCategory, PluralTable, Section, TranslationKey,
        TranslationsData,
    },
};
