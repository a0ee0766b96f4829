use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use spacecal_paths::CalibrationPaths;

use crate::codec;
use crate::migrate;
use crate::profile::CalibrationProfile;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to open profile {path}: {source}")]
    OpenFailed { path: PathBuf, source: io::Error },

    #[error("failed to write profile {path}: {source}")]
    WriteFailed { path: PathBuf, source: io::Error },
}

/// Loads the persisted profile into `profile`.
///
/// Never fails: a missing or corrupt profile leaves `profile.valid`
/// false and the calibration unset, which the caller treats as a
/// normal state. Locations are probed in strict order: the config-root
/// path, the old working-directory path, then v1 migration. A corrupt
/// document at one location is logged and probing falls through to the
/// next; the first structurally valid document wins and nothing is
/// merged across locations.
pub fn load_profile(paths: &CalibrationPaths, profile: &mut CalibrationProfile) {
    profile.valid = false;

    for location in [&paths.profile_path, &paths.fallback_profile_path] {
        if !location.exists() {
            tracing::debug!(path = %location.display(), "profile missing, trying next location");
            continue;
        }
        let raw = match fs::read_to_string(location) {
            Ok(raw) => raw,
            Err(source) => {
                let err = StoreError::OpenFailed {
                    path: location.clone(),
                    source,
                };
                tracing::warn!("ignoring unreadable profile: {err}");
                continue;
            }
        };
        match codec::decode(&raw) {
            Ok(loaded) => {
                *profile = loaded;
                tracing::info!(path = %location.display(), "loaded profile");
                return;
            }
            Err(err) => {
                tracing::warn!(path = %location.display(), "ignoring corrupt profile: {err}");
            }
        }
    }

    match migrate::upgrade_legacy(paths) {
        Ok(Some(migrated)) => *profile = migrated,
        Ok(None) => tracing::info!("no profile found at any known location"),
        Err(err) => tracing::warn!("legacy profile migration failed: {err}"),
    }
}

/// Writes the profile in the current format to the config-root path,
/// never the fallback or legacy paths. Marks the in-memory profile
/// valid on success regardless of its prior state; saving is what
/// makes a profile valid going forward.
pub fn save_profile(
    paths: &CalibrationPaths,
    profile: &mut CalibrationProfile,
) -> Result<(), StoreError> {
    let path = &paths.profile_path;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StoreError::WriteFailed {
            path: path.clone(),
            source,
        })?;
    }
    write_atomic(path, &codec::encode(profile))?;
    profile.valid = true;
    tracing::info!(path = %path.display(), "saved profile");
    Ok(())
}

// Temp-file-then-rename so a crash mid-write cannot truncate the
// destination.
fn write_atomic(path: &Path, contents: &str) -> Result<(), StoreError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents)
        .and_then(|_| fs::rename(&tmp, path))
        .map_err(|source| StoreError::WriteFailed {
            path: path.to_path_buf(),
            source,
        })
}
