//! Configuration loading
//!
//! `defaults/codeparser.default.toml` is embedded into the library so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top of
//! those defaults via [`Loader`] before deserializing into [`ExtractorConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/codeparser.default.toml");

/// Top-level configuration consumed by [`CodeParser`](crate::CodeParser).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct ExtractorConfig {
    pub headings: HeadingConfig,
    pub matching: MatchingConfig,
    pub code: CodeConfig,
}

/// Which lines open a section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HeadingConfig {
    pub min_level: usize,
    pub numbered_titles: bool,
}

impl Default for HeadingConfig {
    fn default() -> Self {
        Self {
            min_level: 2,
            numbered_titles: false,
        }
    }
}

/// How a requested heading is matched against the document's headings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MatchingConfig {
    pub substring_fallback: bool,
    pub ignore_case: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            substring_fallback: true,
            ignore_case: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CodeConfig {
    pub fallback_to_body: bool,
}

impl Default for CodeConfig {
    fn default() -> Self {
        Self {
            fallback_to_body: true,
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<ExtractorConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<ExtractorConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn embedded_defaults_match_default_impl() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config, ExtractorConfig::default());
        assert_eq!(config.headings.min_level, 2);
        assert!(config.matching.substring_fallback);
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("headings.numbered_titles", true)
            .expect("override to apply")
            .set_override("code.fallback_to_body", false)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert!(config.headings.numbered_titles);
        assert!(!config.code.fallback_to_body);
    }

    #[test]
    fn layers_user_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "[matching]\nignore_case = false").expect("write config");

        let config = Loader::new()
            .with_file(file.path())
            .build()
            .expect("config to build");
        assert!(!config.matching.ignore_case);
        assert!(config.matching.substring_fallback);
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/codeparser.toml")
            .build()
            .expect("config to build");
        assert_eq!(config, ExtractorConfig::default());
    }
}
