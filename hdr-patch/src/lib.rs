//! hdr-patch — post-process the cbindgen header of the FirmNetter library.
//!
//! cbindgen emits the `Database` handle's connection member as
//! `struct Arc_Mutex_PgConnection conn;`, a type C never sees declared.
//! This crate rewrites that member to `void* conn;` inside every
//! `typedef struct Database { ... } Database;` block and replaces the header
//! atomically. Everything else in the file is left byte-for-byte intact.
//!
//! # Quick start
//!
//! Patch the release header in place:
//!
//! ```no_run
//! use std::path::Path;
//!
//! let path = Path::new("target/release/FirmNetter.h");
//! hdr_patch::patch(path, path).unwrap();
//! ```
//!
//! Or drive it from a config file (suitable for `build.rs`):
//!
//! ```no_run
//! use std::path::Path;
//!
//! let written = hdr_patch::run(Path::new("hdr-patch.toml"), None).unwrap();
//! println!("Modified file saved to {}", written.display());
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

pub mod config;
pub mod rewrite;
pub mod write;

pub use rewrite::PatchReport;

/// Load `config_path`, then patch the header it names.
///
/// `output` optionally overrides `header.output` from the config.
/// Relative paths in the config resolve against the config file's directory.
///
/// Returns the path the patched header was written to.
pub fn run(config_path: &Path, output: Option<&Path>) -> Result<PathBuf> {
    let cfg = config::load_config(config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;

    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));

    let input_path = cfg.header.input_path(base_dir);
    let output_path = match output {
        Some(p) => p.to_path_buf(),
        None => cfg.header.output_path(base_dir),
    };

    patch(&input_path, &output_path)?;
    Ok(output_path)
}

/// Read `input`, rewrite the `Database.conn` member and atomically replace
/// `output` with the result.
///
/// `input` and `output` may be the same file: the whole header is read into
/// memory before anything is written. A header without the struct or the
/// member is still written back unchanged and is not an error.
///
/// Errors carry the underlying [`std::io::Error`] for filesystem failures and
/// [`std::string::FromUtf8Error`] for headers that are not UTF-8.
pub fn patch(input: &Path, output: &Path) -> Result<PatchReport> {
    let content = read_header(input)?;

    let (patched, report) = rewrite::rewrite_header(&content);

    write::write_atomic(output, patched.as_bytes())
        .with_context(|| format!("writing output to {}", output.display()))?;

    info!(
        path = %output.display(),
        structs = report.structs_matched,
        fields = report.fields_rewritten,
        "wrote patched header"
    );

    Ok(report)
}

/// [`patch`] with the header as both input and output.
pub fn patch_in_place(path: &Path) -> Result<PatchReport> {
    patch(path, path)
}

fn read_header(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("reading header {}", path.display()))?;
    info!(path = %path.display(), size = bytes.len(), "read header");
    String::from_utf8(bytes)
        .with_context(|| format!("header {} is not valid UTF-8", path.display()))
}
