/// Configuration types for aggexpr
///
/// Settings are plain serde structs parsed from JSON. Codecs for foreign
/// values are registered in code on the [`Encoder`](crate::Encoder).

mod encoder;

use std::io;
use std::path::Path;

use thiserror::Error;

pub use encoder::EncoderConfig;

/// Failure to load a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read configuration file '{path}': {message}")]
    Read { path: String, message: String },

    #[error("invalid encoder configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    pub fn read(path: &Path, err: io::Error) -> Self {
        ConfigError::Read {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}
