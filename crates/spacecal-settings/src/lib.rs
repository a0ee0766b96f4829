use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

pub const VENDOR_SECTION: &str = "steamvr";
pub const MULTI_DRIVER_KEY: &str = "activateMultipleDrivers";

#[derive(Error, Debug)]
pub enum PatchError {
    #[error("failed to read settings {path}: {source}")]
    ReadFailed { path: PathBuf, source: io::Error },

    #[error("settings document is malformed: {0}")]
    MalformedDocument(String),

    #[error("settings document is missing the '{0}' section")]
    MissingSection(&'static str),

    #[error("failed to write settings {path}: {source}")]
    WriteFailed { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, PatchError>;

/// Sets `steamvr.activateMultipleDrivers` to `true` in the vendor
/// settings document and rewrites it in place.
///
/// The document is externally owned and only partially understood, so
/// it is patched as an opaque JSON tree rather than deserialized into
/// a typed struct: every key outside the one flag passes through
/// structurally unchanged. The flag is created if absent and
/// overwritten whatever its prior value or type, which also makes the
/// patch idempotent. The file on disk is not touched unless the patch
/// succeeds end to end.
pub fn enable_multiple_drivers(path: &Path) -> Result<()> {
    let raw = fs::read_to_string(path).map_err(|source| PatchError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;
    let mut document: Value = serde_json::from_str(&raw)
        .map_err(|err| PatchError::MalformedDocument(err.to_string()))?;
    let root = document.as_object_mut().ok_or_else(|| {
        PatchError::MalformedDocument("top level is not an object".to_string())
    })?;
    let section = root
        .get_mut(VENDOR_SECTION)
        .and_then(Value::as_object_mut)
        .ok_or(PatchError::MissingSection(VENDOR_SECTION))?;
    section.insert(MULTI_DRIVER_KEY.to_string(), Value::Bool(true));

    let rendered = serde_json::to_string_pretty(&document)
        .expect("serializing a parsed JSON value cannot fail");
    write_atomic(path, &rendered)?;
    tracing::info!(path = %path.display(), "enabled steamvr.activateMultipleDrivers");
    Ok(())
}

// Temp-file-then-rename so a crash mid-write cannot truncate the
// vendor's file.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents)
        .and_then(|_| fs::rename(&tmp, path))
        .map_err(|source| PatchError::WriteFailed {
            path: path.to_path_buf(),
            source,
        })
}
