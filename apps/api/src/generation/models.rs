use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Default target character limit selected in the activity form.
pub const DEFAULT_CHAR_LIMIT: u32 = 150;

fn default_char_limit() -> u32 {
    DEFAULT_CHAR_LIMIT
}

// ────────────────────────────────────────────────────────────────────────────
// Request
// ────────────────────────────────────────────────────────────────────────────

/// One extracurricular activity as entered by the student.
///
/// Optional fields arrive as empty strings from the form; a missing field is
/// treated the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub participation_level: String,
    /// Number inputs sometimes serialize as JSON numbers; both forms are accepted.
    #[serde(default, deserialize_with = "string_or_number")]
    pub hours_per_week: String,
    #[serde(default)]
    pub description: String,
    /// Carried for the client's display only; never enforced here.
    #[serde(default = "default_char_limit")]
    pub char_limit: u32,
}

/// Request body for `POST /api/generate`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub activities: Option<Vec<Activity>>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Generated content
// ────────────────────────────────────────────────────────────────────────────

/// A single rewrite of the description in one voice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variation {
    pub voice: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonAppContent {
    pub organization_name: String,
    pub position: String,
    pub variations: Vec<Variation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UcContent {
    pub activity_name: String,
    pub variations: Vec<Variation>,
}

/// Both application formats for one input activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub common_app: CommonAppContent,
    pub uc: UcContent,
}

/// Top-level object the model is instructed to return.
/// `activities[i]` belongs to input activity `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedActivities {
    pub activities: Vec<GeneratedContent>,
}

// ────────────────────────────────────────────────────────────────────────────
// Response
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationMetadata {
    pub tokens_used: u32,
    pub model: String,
}

/// Success envelope for `POST /api/generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub data: GeneratedActivities,
    pub metadata: GenerationMetadata,
}
