//! Configuration loader for the `hamlp` tool.
//!
//! `defaults/hamlp.default.toml` is embedded into the binary, so the documented defaults and
//! the runtime behavior cannot drift apart. User files and command line overrides are layered
//! on top through [`Loader`] before deserializing into [`HamlpConfig`].

use crate::haml::formats::{Format, RenderOptions};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/hamlp.default.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct HamlpConfig {
    pub output: OutputConfig,
}

/// How parsed templates are printed
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: Format,
    pub pretty: bool,
    pub show_line_numbers: bool,
}

impl OutputConfig {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            pretty: self.pretty,
            show_line_numbers: self.show_line_numbers,
        }
    }
}

/// Layers user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. A missing file is an error at build time.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer a configuration file that may be absent.
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<HamlpConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn load_defaults() -> Result<HamlpConfig, ConfigError> {
    Loader::new().build()
}
