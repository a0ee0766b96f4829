use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const PROFILE_DIR: &str = "01spacecalibrator";
pub const PROFILE_FILE: &str = "calibration.json";
pub const FALLBACK_PROFILE_FILE: &str = "openvr_space_calibration.json";
pub const LEGACY_PROFILE_FILE: &str = "openvr_space_calibration.txt";
pub const VR_SETTINGS_FILE: &str = "steamvr.vrsettings";

/// Absolute paths for every on-disk artifact the calibration store
/// touches. Resolved once and passed around by reference; the store
/// itself never derives paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationPaths {
    pub config_root: PathBuf,
    /// Current-format profile under the vendor config root.
    pub profile_path: PathBuf,
    /// Current-format profile in the working directory, the default
    /// location for a long time before the config-root move.
    pub fallback_profile_path: PathBuf,
    /// V1 flat-text profile, pending one-shot migration.
    pub legacy_profile_path: PathBuf,
    pub vr_settings_path: PathBuf,
}

impl CalibrationPaths {
    pub fn from_config_root(
        config_root: impl AsRef<Path>,
        working_dir: impl AsRef<Path>,
    ) -> Self {
        let config_root = config_root.as_ref().to_path_buf();
        let working_dir = working_dir.as_ref();
        Self {
            profile_path: config_root.join(PROFILE_DIR).join(PROFILE_FILE),
            vr_settings_path: config_root.join(VR_SETTINGS_FILE),
            fallback_profile_path: working_dir.join(FALLBACK_PROFILE_FILE),
            legacy_profile_path: working_dir.join(LEGACY_PROFILE_FILE),
            config_root,
        }
    }

    /// Derives the vendor config root from the VR runtime directory.
    /// The runtime lives at `<install>/bin/<platform>`, so the config
    /// directory sits three levels up next to it.
    pub fn from_runtime_root(runtime_root: impl AsRef<Path>) -> Self {
        let config_root = runtime_root
            .as_ref()
            .join("..")
            .join("..")
            .join("..")
            .join("config");
        let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::from_config_root(config_root, working_dir)
    }
}

/// Resolves paths without a running VR runtime: `SPACECAL_CONFIG_DIR`
/// wins if set, otherwise the platform config dir, otherwise a dotdir
/// under the working directory.
pub fn resolve_calibration_paths() -> CalibrationPaths {
    let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    if let Ok(dir) = std::env::var("SPACECAL_CONFIG_DIR") {
        if !dir.trim().is_empty() {
            return CalibrationPaths::from_config_root(PathBuf::from(dir), working_dir);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        return CalibrationPaths::from_config_root(config_dir.join("spacecal"), working_dir);
    }
    CalibrationPaths::from_config_root(working_dir.join(".spacecal"), working_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_hangs_off_config_root() {
        let paths = CalibrationPaths::from_config_root("/vr/config", "/work");
        assert_eq!(
            paths.profile_path,
            PathBuf::from("/vr/config/01spacecalibrator/calibration.json")
        );
        assert_eq!(
            paths.vr_settings_path,
            PathBuf::from("/vr/config/steamvr.vrsettings")
        );
        assert_eq!(
            paths.fallback_profile_path,
            PathBuf::from("/work/openvr_space_calibration.json")
        );
        assert_eq!(
            paths.legacy_profile_path,
            PathBuf::from("/work/openvr_space_calibration.txt")
        );
    }

    #[test]
    fn runtime_root_walks_up_to_config() {
        let paths = CalibrationPaths::from_runtime_root("/steam/steamvr/bin/linux64");
        assert!(paths
            .profile_path
            .ends_with("config/01spacecalibrator/calibration.json"));
        assert!(paths.config_root.starts_with("/steam/steamvr/bin/linux64"));
    }

    #[test]
    fn env_override_wins() {
        std::env::set_var("SPACECAL_CONFIG_DIR", "/tmp/spacecal-test-config");
        let paths = resolve_calibration_paths();
        assert_eq!(
            paths.profile_path,
            PathBuf::from("/tmp/spacecal-test-config/01spacecalibrator/calibration.json")
        );
        std::env::remove_var("SPACECAL_CONFIG_DIR");
    }
}
