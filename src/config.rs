//! Decoder and output configuration, loadable from TOML
//!
//! ```toml
//! [decoder]
//! float_mode = "amos"          # or "ieee"
//! unknown_opcode = "bracketed" # or "permissive"
//!
//! [output]
//! source_only = false
//! image_folder = "images"
//! data_folder = "banks"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::detokenizer::FallbackStyle;
use crate::error::{DecodeError, Result};
use crate::float::FloatMode;

/// Options that change how bytes are interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    pub float_mode: FloatMode,
    pub unknown_opcode: FallbackStyle,
}

/// Where the exporter puts things
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Stop after the listing; banks are not read
    pub source_only: bool,
    pub image_folder: PathBuf,
    pub data_folder: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub decoder: DecodeOptions,
    pub output: OutputOptions,
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Config> {
        toml::from_str(text).map_err(|e| DecodeError::InvalidConfig(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Config> {
        let text = fs::read_to_string(path)
            .map_err(|e| DecodeError::Io(format!("{}: {}", path.display(), e)))?;
        Config::from_toml_str(&text)
    }
}
