use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use spacecal_paths::CalibrationPaths;

use crate::profile::CalibrationProfile;
use crate::store::{self, StoreError};

#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("legacy profile {path} is malformed: {reason}")]
    MalformedLegacyFile { path: PathBuf, reason: String },

    #[error("failed to read legacy profile: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to persist migrated profile: {0}")]
    Persist(#[from] StoreError),
}

/// Upgrades the v1 flat-text profile, if one exists.
///
/// `Ok(None)` means no legacy file is present, the normal terminal
/// case when nothing has ever been saved. On success the profile is
/// persisted in the current format and the legacy file is deleted; on
/// any failure the legacy file is left untouched and nothing is
/// written.
///
/// The v1 token order is `target yaw pitch roll x y z`, while the
/// current format stores rotation as `[roll, yaw, pitch]`. The
/// reorder below is the entire point of this migration.
pub fn upgrade_legacy(
    paths: &CalibrationPaths,
) -> Result<Option<CalibrationProfile>, MigrationError> {
    let legacy = &paths.legacy_profile_path;
    if !legacy.exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(legacy)?;
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    if tokens.len() != 7 {
        return Err(MigrationError::MalformedLegacyFile {
            path: legacy.clone(),
            reason: format!("expected 7 fields, found {}", tokens.len()),
        });
    }

    let mut numbers = [0f64; 6];
    for (slot, token) in numbers.iter_mut().zip(&tokens[1..]) {
        *slot = token
            .parse()
            .map_err(|_| MigrationError::MalformedLegacyFile {
                path: legacy.clone(),
                reason: format!("'{token}' is not a number"),
            })?;
    }
    let [yaw, pitch, roll, x, y, z] = numbers;

    let mut profile = CalibrationProfile {
        // V1 predates multi-reference-system support; the reference
        // system stays at its empty default.
        target_tracking_system: tokens[0].to_string(),
        rotation: [roll, yaw, pitch],
        translation: [x, y, z],
        ..Default::default()
    };

    // Persist in the current format before touching the legacy file.
    store::save_profile(paths, &mut profile)?;
    if let Err(err) = fs::remove_file(legacy) {
        tracing::warn!(path = %legacy.display(), "failed to remove migrated legacy profile: {err}");
    }
    tracing::info!(path = %paths.profile_path.display(), "migrated v1 profile to current format");
    Ok(Some(profile))
}
