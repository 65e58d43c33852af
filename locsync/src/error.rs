//! All error types for the locsync crate.
//!
//! These are returned from all fallible operations (parsing, serialization, tree sync, etc.).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("missing input: {0}")]
    MissingInput(String),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid data: {0}")]
    DataMismatch(String),
}

impl Error {
    /// Creates a missing-input error (fatal: absent directories or documents).
    pub fn missing_input(message: impl Into<String>) -> Self {
        Error::MissingInput(message.into())
    }

    /// Creates a data-mismatch error for shape-invalid documents.
    pub fn data_mismatch(message: impl Into<String>) -> Self {
        Error::DataMismatch(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_missing_input_error() {
        let error = Error::missing_input("no *.lproj directories found in Resources");
        assert_eq!(
            error.to_string(),
            "missing input: no *.lproj directories found in Resources"
        );
    }

    #[test]
    fn test_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = Error::Io(io_error);
        assert!(error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_yaml_error() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("{ invalid: [ yaml").unwrap_err();
        let error = Error::Yaml(yaml_error);
        assert!(error.to_string().contains("YAML parse error"));
    }

    #[test]
    fn test_data_mismatch_error() {
        let error = Error::data_mismatch("top-level YAML node must be a mapping");
        assert_eq!(
            error.to_string(),
            "invalid data: top-level YAML node must be a mapping"
        );
    }

    #[test]
    fn test_error_debug() {
        let error = Error::MissingInput("test".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("MissingInput"));
        assert!(debug.contains("test"));
    }
}
