/// Device-to-device spatial calibration between two tracked coordinate
/// systems. Owned by the caller for the process lifetime and mutated
/// in place by [`crate::store::load_profile`] and
/// [`crate::store::save_profile`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalibrationProfile {
    /// Coordinate system the calibration is relative to. Empty for
    /// profiles migrated from the v1 format, which predates
    /// multi-reference-system support.
    pub reference_tracking_system: String,
    /// Coordinate system being aligned.
    pub target_tracking_system: String,
    /// Euler angles, fixed order: `[roll, yaw, pitch]`. The v1 format
    /// stored these in a different order; the index assignment here is
    /// load-bearing and must not change.
    pub rotation: [f64; 3],
    /// `[x, y, z]`.
    pub translation: [f64; 3],
    /// True only after a successful load or save. There is no
    /// partially-valid state: either all fields above came from one
    /// successful decode or migration, or this is false.
    pub valid: bool,
}
