//! Activity generation: builds the prompt pair, makes the one upstream call,
//! and normalizes the answer into the response envelope.
//!
//! Flow: build prompt → TextGenerator::complete_json → parse + schema check → respond.

use tracing::{debug, info};

use crate::errors::AppError;
use crate::generation::models::{Activity, GenerateResponse, GenerationMetadata};
use crate::generation::prompts::{
    DEFAULT_HOURS, DEFAULT_ROLE, GENERATION_PROMPT_TEMPLATE, GENERATION_SYSTEM,
};
use crate::generation::schema::parse_generated;
use crate::llm_client::TextGenerator;

/// Runs one generation for an ordered list of activities. The handler has
/// already rejected an empty list.
///
/// The returned `data.activities` is index-aligned with `activities`.
pub async fn generate_variations(
    generator: &dyn TextGenerator,
    activities: &[Activity],
) -> Result<GenerateResponse, AppError> {
    let prompt = build_generation_prompt(activities);

    let completion = generator.complete_json(GENERATION_SYSTEM, &prompt).await?;
    debug!("LLM response: {}", completion.text);

    let data = parse_generated(&completion.text, activities.len())?;

    info!(
        "Generated variations for {} activities (model={}, tokens={})",
        data.activities.len(),
        completion.model,
        completion.tokens_used
    );

    Ok(GenerateResponse {
        success: true,
        data,
        metadata: GenerationMetadata {
            tokens_used: completion.tokens_used,
            model: completion.model,
        },
    })
}

/// Builds the user prompt enumerating every activity in order.
pub fn build_generation_prompt(activities: &[Activity]) -> String {
    let blocks = activities
        .iter()
        .enumerate()
        .map(|(index, activity)| format_activity(index + 1, activity))
        .collect::<Vec<_>>()
        .join("\n");

    GENERATION_PROMPT_TEMPLATE.replace("{activities}", &blocks)
}

fn format_activity(position: usize, activity: &Activity) -> String {
    format!(
        "\nActivity {position}:\nName: {}\nRole: {}\nHours/Week: {}\nDescription: {}\n---",
        activity.name,
        or_default(&activity.participation_level, DEFAULT_ROLE),
        or_default(&activity.hours_per_week, DEFAULT_HOURS),
        activity.description,
    )
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(name: &str, role: &str, hours: &str) -> Activity {
        Activity {
            id: 1,
            name: name.to_string(),
            participation_level: role.to_string(),
            hours_per_week: hours.to_string(),
            description: "Designed and programmed competition robots with a team of twelve."
                .to_string(),
            char_limit: 150,
        }
    }

    #[test]
    fn test_prompt_enumerates_activities_in_order() {
        let prompt = build_generation_prompt(&[
            activity("Robotics Club", "captain", "10"),
            activity("Debate Team", "member", "4"),
        ]);

        let first = prompt.find("Activity 1:\nName: Robotics Club").unwrap();
        let second = prompt.find("Activity 2:\nName: Debate Team").unwrap();
        assert!(first < second);
        assert!(prompt.contains("Role: captain"));
        assert!(prompt.contains("Hours/Week: 10"));
    }

    #[test]
    fn test_prompt_fills_defaults_for_blank_fields() {
        let prompt = build_generation_prompt(&[activity("Chess", "", " ")]);
        assert!(prompt.contains("Role: Member"));
        assert!(prompt.contains("Hours/Week: N/A"));
    }

    #[test]
    fn test_prompt_keeps_schema_and_user_braces_intact() {
        let prompt = build_generation_prompt(&[activity("Club {activities}", "officer", "2")]);
        assert!(prompt.contains("Name: Club {activities}"));
        assert!(prompt.contains("\"commonApp\""));
        assert!(!prompt.starts_with("{activities}"));
    }
}
