//! Parses and shape-checks the model's JSON text.
//!
//! Non-JSON text and JSON of the wrong shape both surface as
//! `AppError::GenerationFormat`; nothing malformed is relayed to the caller.

use std::collections::HashSet;

use serde_json::Value;
use tracing::warn;

use crate::errors::AppError;
use crate::generation::limits::over_limit_fields;
use crate::generation::models::{GeneratedActivities, Variation};
use crate::llm_client::strip_json_fences;

/// Each format carries exactly one variation per voice.
pub const VARIATIONS_PER_FORMAT: usize = 3;

/// Parses `text` and checks it against the expected shape for
/// `expected_activities` input activities.
pub fn parse_generated(
    text: &str,
    expected_activities: usize,
) -> Result<GeneratedActivities, AppError> {
    let text = strip_json_fences(text);

    let value: Value = serde_json::from_str(text)
        .map_err(|e| AppError::GenerationFormat(format!("response is not valid JSON ({e})")))?;

    let parsed: GeneratedActivities = serde_json::from_value(value).map_err(|e| {
        AppError::GenerationFormat(format!("response does not match the expected schema ({e})"))
    })?;

    validate_shape(&parsed, expected_activities)?;

    for (index, content) in parsed.activities.iter().enumerate() {
        for field in over_limit_fields(content) {
            warn!(
                "Activity {} field {} is over its limit by {} chars ({}/{})",
                index + 1,
                field.field,
                field.check.over_by(),
                field.check.len,
                field.check.limit
            );
        }
    }

    Ok(parsed)
}

fn validate_shape(parsed: &GeneratedActivities, expected_activities: usize) -> Result<(), AppError> {
    if parsed.activities.len() != expected_activities {
        return Err(AppError::GenerationFormat(format!(
            "expected {} activities, got {}",
            expected_activities,
            parsed.activities.len()
        )));
    }

    for (index, content) in parsed.activities.iter().enumerate() {
        check_variations(index, "commonApp", &content.common_app.variations)?;
        check_variations(index, "uc", &content.uc.variations)?;
    }

    Ok(())
}

fn check_variations(index: usize, format: &str, variations: &[Variation]) -> Result<(), AppError> {
    let position = index + 1;

    if variations.len() != VARIATIONS_PER_FORMAT {
        return Err(AppError::GenerationFormat(format!(
            "activity {position} {format} has {} variations, expected {VARIATIONS_PER_FORMAT}",
            variations.len()
        )));
    }

    let mut voices = HashSet::new();
    for variation in variations {
        let voice = variation.voice.trim();
        if voice.is_empty() || variation.text.trim().is_empty() {
            return Err(AppError::GenerationFormat(format!(
                "activity {position} {format} has a variation with an empty voice or text"
            )));
        }
        if !voices.insert(voice.to_lowercase()) {
            return Err(AppError::GenerationFormat(format!(
                "activity {position} {format} repeats the voice '{voice}'"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn variations(limit_text: &str) -> Value {
        json!([
            {"voice": "Professional", "text": limit_text},
            {"voice": "Banger 1", "text": "Built robots, broke robots, rebuilt better robots."},
            {"voice": "Banger 2", "text": "Twelve teammates, one wobbly drivetrain, a regional title."}
        ])
    }

    fn activity_json() -> Value {
        json!({
            "commonApp": {
                "organizationName": "Robotics Club",
                "position": "Captain",
                "variations": variations("Captained 12-member team; led design of award-winning robot.")
            },
            "uc": {
                "activityName": "Robotics Club Captain",
                "variations": variations("As captain, I led 12 students through design and build cycles.")
            }
        })
    }

    #[test]
    fn test_parses_well_formed_output() {
        let text = json!({"activities": [activity_json()]}).to_string();
        let parsed = parse_generated(&text, 1).unwrap();
        assert_eq!(parsed.activities.len(), 1);
        assert_eq!(parsed.activities[0].common_app.variations.len(), 3);
    }

    #[test]
    fn test_accepts_fenced_output() {
        let text = format!("```json\n{}\n```", json!({"activities": [activity_json()]}));
        assert!(parse_generated(&text, 1).is_ok());
    }

    #[test]
    fn test_non_json_is_format_error() {
        let err = parse_generated("Sure! Here are your variations:", 1).unwrap_err();
        assert!(matches!(err, AppError::GenerationFormat(_)));
        assert!(err.to_string().contains("invalid format"));
    }

    #[test]
    fn test_missing_field_is_format_error() {
        let mut activity = activity_json();
        activity["commonApp"]
            .as_object_mut()
            .unwrap()
            .remove("position");
        let text = json!({"activities": [activity]}).to_string();
        assert!(matches!(
            parse_generated(&text, 1),
            Err(AppError::GenerationFormat(_))
        ));
    }

    #[test]
    fn test_activity_count_mismatch_is_format_error() {
        let text = json!({"activities": [activity_json()]}).to_string();
        let err = parse_generated(&text, 2).unwrap_err();
        assert!(err.to_string().contains("expected 2 activities, got 1"));
    }

    #[test]
    fn test_wrong_variation_count_is_format_error() {
        let mut activity = activity_json();
        activity["uc"]["variations"].as_array_mut().unwrap().pop();
        let text = json!({"activities": [activity]}).to_string();
        let err = parse_generated(&text, 1).unwrap_err();
        assert!(err.to_string().contains("uc has 2 variations"));
    }

    #[test]
    fn test_duplicate_voice_is_format_error() {
        let mut activity = activity_json();
        activity["commonApp"]["variations"][2]["voice"] = json!("professional");
        let text = json!({"activities": [activity]}).to_string();
        let err = parse_generated(&text, 1).unwrap_err();
        assert!(err.to_string().contains("repeats the voice"));
    }

    #[test]
    fn test_empty_text_is_format_error() {
        let mut activity = activity_json();
        activity["uc"]["variations"][0]["text"] = json!("  ");
        let text = json!({"activities": [activity]}).to_string();
        assert!(parse_generated(&text, 1).is_err());
    }

    #[test]
    fn test_over_limit_text_is_not_rejected() {
        let mut activity = activity_json();
        activity["commonApp"]["variations"][0]["text"] = json!("x".repeat(200));
        let text = json!({"activities": [activity]}).to_string();
        assert!(parse_generated(&text, 1).is_ok());
    }

    #[test]
    fn test_top_level_array_is_format_error() {
        let text = json!([activity_json()]).to_string();
        assert!(matches!(
            parse_generated(&text, 1),
            Err(AppError::GenerationFormat(_))
        ));
    }
}
