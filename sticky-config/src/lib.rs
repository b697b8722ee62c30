//! Configuration for the sticky tools.
//!
//! Every setting has a value in `defaults/sticky.default.toml`, which is compiled
//! in. A [`Loader`] stacks sources on top of it, later sources winning:
//! the defaults, then TOML files in the order added, then `STICKY_*`
//! environment variables, then explicit overrides.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat, ValueKind};
use serde::Deserialize;
use sticky_babel::formats::markdown::FormattingRules;
use std::path::Path;
use std::time::Duration;

const DEFAULT_TOML: &str = include_str!("../defaults/sticky.default.toml");

const ENV_PREFIX: &str = "STICKY";

#[derive(Debug, Clone, Deserialize)]
pub struct StickyConfig {
    pub formatting: FormattingConfig,
    pub bridge: BridgeConfig,
    pub convert: ConvertConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormattingConfig {
    pub rules: FormattingRulesConfig,
}

/// `[formatting.rules]`, one field per markdown normalization knob.
#[derive(Debug, Clone, Deserialize)]
pub struct FormattingRulesConfig {
    pub indent_width: usize,
    pub tab_width: usize,
    pub bullet_marker: char,
    pub max_blank_lines: usize,
}

impl From<&FormattingRulesConfig> for FormattingRules {
    fn from(rules: &FormattingRulesConfig) -> Self {
        FormattingRules {
            indent_width: rules.indent_width,
            tab_width: rules.tab_width,
            bullet_marker: rules.bullet_marker,
            max_blank_lines: rules.max_blank_lines,
        }
    }
}

impl From<FormattingRulesConfig> for FormattingRules {
    fn from(rules: FormattingRulesConfig) -> Self {
        (&rules).into()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    /// Delay before the bridge re-validates what the editor holds after a load
    pub debounce_ms: u64,
}

impl BridgeConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    /// Target used by `sticky convert` when `--to` is not given
    pub default_format: String,
}

/// Builds a [`StickyConfig`] from the defaults plus any layered sources.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        Loader {
            builder: Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml)),
        }
    }

    /// Adds a TOML file that must exist.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer_file(path.as_ref(), true)
    }

    /// Adds a TOML file, skipped when absent.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer_file(path.as_ref(), false)
    }

    /// Adds `STICKY_*` environment variables, `__` separating nested keys:
    /// `STICKY_BRIDGE__DEBOUNCE_MS=50` sets `bridge.debounce_ms`.
    pub fn with_env(mut self) -> Self {
        let env = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true);
        self.builder = self.builder.add_source(env);
        self
    }

    pub fn set_override<V: Into<ValueKind>>(mut self, key: &str, value: V) -> Result<Self, ConfigError> {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<StickyConfig, ConfigError> {
        let merged = self.builder.build()?;
        merged.try_deserialize()
    }

    fn layer_file(mut self, path: &Path, required: bool) -> Self {
        let file = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(file);
        self
    }
}

impl Default for Loader {
    fn default() -> Self {
        Loader::new()
    }
}

pub fn load_defaults() -> Result<StickyConfig, ConfigError> {
    Loader::new().build()
}
