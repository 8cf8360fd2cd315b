//! Formatter configuration.
//!
//! Resolved once at startup and handed to every formatter call; nothing in
//! this crate reads process state on its own after [`FormatConfig::resolve`].

use std::path::Path;

use serde::Deserialize;

use crate::error::Error;

/// Magnitude base for byte quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteBase {
    /// Powers of 1000: `kB`, `MB`, `GB`, ...
    Decimal,
    /// Powers of 1024: `KiB`, `MiB`, `GiB`, ...
    #[default]
    Binary,
}

impl ByteBase {
    pub fn multiplier(self) -> u64 {
        match self {
            ByteBase::Decimal => 1000,
            ByteBase::Binary => 1024,
        }
    }
}

/// Settings shared by all human-readable renderings.
///
/// ```toml
/// home_dir = "/home/alice"
/// byte_base = "decimal"
/// verbose_bytes = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Prefix collapsed to `~` in path renderings.
    pub home_dir: Option<String>,
    pub byte_base: ByteBase,
    /// Spell out units (`kibibytes`) instead of symbols (`KiB`).
    pub verbose_bytes: bool,
}

impl FormatConfig {
    /// Defaults with the current user's home directory filled in.
    pub fn detect() -> Self {
        Self::default().resolve()
    }

    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, Error> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Fill in the home directory from the environment if none was given.
    pub fn resolve(mut self) -> Self {
        if self.home_dir.is_none() {
            self.home_dir = dirs::home_dir().map(|h| h.to_string_lossy().into_owned());
        }
        self
    }

    pub fn with_home_dir(mut self, home: impl Into<String>) -> Self {
        self.home_dir = Some(home.into());
        self
    }

    pub fn with_byte_base(mut self, base: ByteBase) -> Self {
        self.byte_base = base;
        self
    }
}
