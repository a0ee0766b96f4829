use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::profile::CalibrationProfile;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("malformed profile document: {0}")]
    MalformedDocument(String),

    #[error("profile document contains no profiles")]
    EmptySequence,

    #[error("profile is missing required key '{0}'")]
    MissingField(&'static str),

    #[error("profile key '{0}' has the wrong type")]
    InvalidField(&'static str),
}

/// Decodes the current on-disk format: a top-level array of profile
/// objects, of which only element 0 is consulted (multi-profile
/// support is reserved but unused).
pub fn decode(raw: &str) -> Result<CalibrationProfile, DecodeError> {
    let document: Value = serde_json::from_str(raw)
        .map_err(|err| DecodeError::MalformedDocument(err.to_string()))?;
    let profiles = document
        .as_array()
        .ok_or_else(|| DecodeError::MalformedDocument("top level is not an array".to_string()))?;
    let entry = profiles.first().ok_or(DecodeError::EmptySequence)?;
    let fields = entry.as_object().ok_or_else(|| {
        DecodeError::MalformedDocument("profile entry is not an object".to_string())
    })?;

    Ok(CalibrationProfile {
        reference_tracking_system: string_field(fields, "reference_tracking_system")?,
        target_tracking_system: string_field(fields, "target_tracking_system")?,
        rotation: [
            number_field(fields, "roll")?,
            number_field(fields, "yaw")?,
            number_field(fields, "pitch")?,
        ],
        translation: [
            number_field(fields, "x")?,
            number_field(fields, "y")?,
            number_field(fields, "z")?,
        ],
        valid: true,
    })
}

/// Encodes a profile as a pretty-printed single-element array. Total:
/// has no failure mode for any profile value.
pub fn encode(profile: &CalibrationProfile) -> String {
    let entry = json!({
        "reference_tracking_system": profile.reference_tracking_system,
        "target_tracking_system": profile.target_tracking_system,
        "roll": profile.rotation[0],
        "yaw": profile.rotation[1],
        "pitch": profile.rotation[2],
        "x": profile.translation[0],
        "y": profile.translation[1],
        "z": profile.translation[2],
    });
    serde_json::to_string_pretty(&Value::Array(vec![entry]))
        .expect("serializing a built JSON value cannot fail")
}

fn string_field(fields: &Map<String, Value>, key: &'static str) -> Result<String, DecodeError> {
    let value = fields.get(key).ok_or(DecodeError::MissingField(key))?;
    value
        .as_str()
        .map(str::to_string)
        .ok_or(DecodeError::InvalidField(key))
}

fn number_field(fields: &Map<String, Value>, key: &'static str) -> Result<f64, DecodeError> {
    let value = fields.get(key).ok_or(DecodeError::MissingField(key))?;
    value.as_f64().ok_or(DecodeError::InvalidField(key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> CalibrationProfile {
        CalibrationProfile {
            reference_tracking_system: "lighthouse".to_string(),
            target_tracking_system: "oculus".to_string(),
            rotation: [0.5, -1.25, 3.0],
            translation: [0.01, 1.6, -0.4],
            valid: true,
        }
    }

    #[test]
    fn round_trip_preserves_all_fields() {
        let original = sample_profile();
        let decoded = decode(&encode(&original)).expect("decode");
        assert_eq!(decoded, original);
    }

    #[test]
    fn decode_keeps_fixed_axis_order() {
        let raw = r#"[{
            "reference_tracking_system": "a",
            "target_tracking_system": "b",
            "roll": 1.0, "yaw": 2.0, "pitch": 3.0,
            "x": 4.0, "y": 5.0, "z": 6.0
        }]"#;
        let profile = decode(raw).expect("decode");
        assert_eq!(profile.rotation, [1.0, 2.0, 3.0]);
        assert_eq!(profile.translation, [4.0, 5.0, 6.0]);
        assert!(profile.valid);
    }

    #[test]
    fn decode_consults_first_profile_only() {
        let raw = r#"[
            {"reference_tracking_system": "a", "target_tracking_system": "b",
             "roll": 1.0, "yaw": 2.0, "pitch": 3.0, "x": 0.0, "y": 0.0, "z": 0.0},
            {"reference_tracking_system": "other", "target_tracking_system": "other",
             "roll": 9.0, "yaw": 9.0, "pitch": 9.0, "x": 9.0, "y": 9.0, "z": 9.0}
        ]"#;
        let profile = decode(raw).expect("decode");
        assert_eq!(profile.target_tracking_system, "b");
        assert_eq!(profile.rotation, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn decode_rejects_unparseable_document() {
        assert!(matches!(
            decode("not json at all"),
            Err(DecodeError::MalformedDocument(_))
        ));
        assert!(matches!(
            decode(r#"{"not": "an array"}"#),
            Err(DecodeError::MalformedDocument(_))
        ));
    }

    #[test]
    fn decode_rejects_empty_sequence() {
        assert!(matches!(decode("[]"), Err(DecodeError::EmptySequence)));
    }

    #[test]
    fn decode_reports_missing_key_by_name() {
        let raw = r#"[{
            "reference_tracking_system": "a",
            "target_tracking_system": "b",
            "roll": 1.0, "yaw": 2.0,
            "x": 4.0, "y": 5.0, "z": 6.0
        }]"#;
        assert!(matches!(
            decode(raw),
            Err(DecodeError::MissingField("pitch"))
        ));
    }

    #[test]
    fn decode_reports_wrong_type_distinctly() {
        let raw = r#"[{
            "reference_tracking_system": "a",
            "target_tracking_system": "b",
            "roll": "one", "yaw": 2.0, "pitch": 3.0,
            "x": 4.0, "y": 5.0, "z": 6.0
        }]"#;
        assert!(matches!(decode(raw), Err(DecodeError::InvalidField("roll"))));
    }
}
