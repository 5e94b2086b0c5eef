//! Configuration types for `hdr-patch.toml`.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Header cbindgen writes for the release build.
pub const DEFAULT_HEADER: &str = "target/release/FirmNetter.h";

/// Root configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub header: HeaderConfig,
}

/// Which header to patch and where the result goes.
#[derive(Debug, Deserialize)]
pub struct HeaderConfig {
    /// Generated header to read.
    #[serde(default = "default_input_file")]
    pub input: PathBuf,
    /// Where to write the patched header. Defaults to `input` (in place).
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            input: default_input_file(),
            output: None,
        }
    }
}

fn default_input_file() -> PathBuf {
    PathBuf::from(DEFAULT_HEADER)
}

impl HeaderConfig {
    /// Input path resolved against `base_dir`.
    pub fn input_path(&self, base_dir: &Path) -> PathBuf {
        resolve(&self.input, base_dir)
    }

    /// Output path resolved against `base_dir`, falling back to the input.
    pub fn output_path(&self, base_dir: &Path) -> PathBuf {
        match &self.output {
            Some(output) => resolve(output, base_dir),
            None => self.input_path(base_dir),
        }
    }
}

/// Relative paths are taken relative to the TOML file's directory.
/// Absolute paths are returned as-is.
fn resolve(path: &Path, base_dir: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Load and parse a `hdr-patch.toml` configuration file.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let config: Config = toml::from_str(&content)
        .map_err(|e| anyhow::anyhow!("failed to parse config file {}: {}", path.display(), e))?;
    Ok(config)
}
