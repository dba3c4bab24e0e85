//! Shared configuration loader for the unnest toolchain.
//!
//! `defaults/unnest.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`UnnestConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;
use unnest_parser::unnest::formats::Format;
use unnest_parser::unnest::Markers;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/unnest.default.toml");

/// Top-level configuration consumed by unnest applications.
#[derive(Debug, Clone, Deserialize)]
pub struct UnnestConfig {
    pub markers: MarkersConfig,
    pub output: OutputConfig,
}

/// The literal markers the parser recognises.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MarkersConfig {
    pub declaration: String,
    pub nested: String,
    pub open: String,
    pub close: String,
    pub continuation: String,
}

impl From<MarkersConfig> for Markers {
    fn from(config: MarkersConfig) -> Self {
        Markers {
            declaration: config.declaration,
            nested: config.nested,
            open: config.open,
            close: config.close,
            continuation: config.continuation,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    Text,
    Json,
    Names,
    Tree,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => Format::Text,
            OutputFormat::Json => Format::Json,
            OutputFormat::Names => Format::Names,
            OutputFormat::Tree => Format::Tree,
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
    pub fn build(self) -> Result<UnnestConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<UnnestConfig, ConfigError> {
    Loader::new().build()
}
