//! Layered settings for the token pipeline.
//!
//! `defaults/hvitt.default.toml` is embedded into the crate so that docs and runtime
//! behavior stay in sync. Callers layer their own files and single-key overrides on top
//! via [`Loader`] before deserializing into [`LexerSettings`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

use crate::lexing::ReservedKinds;

const DEFAULT_TOML: &str = include_str!("../defaults/hvitt.default.toml");

/// Top-level settings consumed by [`Pipeline`](crate::pipeline::Pipeline).
#[derive(Debug, Clone, Deserialize)]
pub struct LexerSettings {
    pub reserved: ReservedSettings,
    pub collapse: CollapseSettings,
    pub structure: StructureSettings,
}

/// Names of the structural kinds, plus the optional ignore kind.
#[derive(Debug, Clone, Deserialize)]
pub struct ReservedSettings {
    pub indent: String,
    pub deindent: String,
    pub newline: String,
    pub eof: String,
    #[serde(default)]
    pub ignore: Option<String>,
}

impl ReservedSettings {
    pub fn kinds(&self) -> ReservedKinds {
        ReservedKinds {
            indent: self.indent.clone(),
            deindent: self.deindent.clone(),
            newline: self.newline.clone(),
            eof: self.eof.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollapseSettings {
    pub enabled: bool,
    pub trim: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StructureSettings {
    pub enabled: bool,
    pub indent_unit: String,
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

    /// Layer a settings file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional settings file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer settings given as TOML text.
    pub fn with_toml(mut self, text: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(text, FileFormat::Toml));
        self
    }

    /// Apply a single key/value override (useful for CLI flags).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting settings.
    pub fn build(self) -> Result<LexerSettings, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<LexerSettings, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_settings() {
        let settings = load_defaults().expect("defaults to deserialize");
        assert_eq!(settings.reserved.kinds(), ReservedKinds::default());
        assert_eq!(settings.reserved.ignore, None);
        assert!(settings.collapse.enabled);
        assert!(settings.collapse.trim);
        assert!(settings.structure.enabled);
        assert_eq!(settings.structure.indent_unit, "    ");
    }

    #[test]
    fn supports_overrides() {
        let settings = Loader::new()
            .set_override("structure.indent_unit", "  ")
            .expect("override to apply")
            .set_override("collapse.trim", false)
            .expect("override to apply")
            .build()
            .expect("settings to build");
        assert_eq!(settings.structure.indent_unit, "  ");
        assert!(!settings.collapse.trim);
    }

    #[test]
    fn layers_toml_text() {
        let settings = Loader::new()
            .with_toml("[reserved]\nindent = \"BEGIN\"\nignore = \"COMMENT\"\n")
            .build()
            .expect("settings to build");
        assert_eq!(settings.reserved.indent, "BEGIN");
        assert_eq!(settings.reserved.deindent, "DEINDENT");
        assert_eq!(settings.reserved.ignore.as_deref(), Some("COMMENT"));
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let result = Loader::new()
            .with_file("/definitely/not/here/hvitt.toml")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let settings = Loader::new()
            .with_optional_file("/definitely/not/here/hvitt.toml")
            .build()
            .expect("settings to build");
        assert!(settings.structure.enabled);
    }
}
