// All LLM prompt constants for the Generation module.

/// System prompt for activity rewriting. Enforces JSON-only output.
pub const GENERATION_SYSTEM: &str = r#"You are an expert college admissions essay coach. Your task is to rewrite student activity descriptions for college applications in three distinct voices:

1. Professional: Clear, achievement-focused, emphasizes measurable results. Uses strong action verbs. Formal tone.
2. Banger 1: Fun, quirky and engaging. Makes admissions officers take note. Shows passion and personality. Slightly informal but appropriate.
3. Banger 2: Another great alternative with strong narrative and storytelling. Personal and memorable.

CRITICAL REQUIREMENTS:
- Common App descriptions must be ≤150 characters
- UC Application descriptions must be ≤350 characters
- Common App Organization Name must be ≤100 characters
- Common App Position/Leadership must be ≤50 characters
- UC Activity Name must be ≤60 characters
- Stay truthful to the original description
- Use varied vocabulary across all three variations
- Each variation must be distinctly different in style

You must respond with valid JSON only, no other text."#;

/// User prompt for activity rewriting. Replace `{activities}` before sending.
pub const GENERATION_PROMPT_TEMPLATE: &str = r#"Generate variations for these activities:

{activities}

Return a JSON object with this exact structure, one entry per activity, in the same order:
{
  "activities": [
    {
      "commonApp": {
        "organizationName": "string (≤100 chars)",
        "position": "string (≤50 chars)",
        "variations": [
          { "voice": "Professional", "text": "string (≤150 chars)" },
          { "voice": "Banger 1", "text": "string (≤150 chars)" },
          { "voice": "Banger 2", "text": "string (≤150 chars)" }
        ]
      },
      "uc": {
        "activityName": "string (≤60 chars)",
        "variations": [
          { "voice": "Professional", "text": "string (≤350 chars)" },
          { "voice": "Banger 1", "text": "string (≤350 chars)" },
          { "voice": "Banger 2", "text": "string (≤350 chars)" }
        ]
      }
    }
  ]
}"#;

/// Shown as the role when the student left participation level blank.
pub const DEFAULT_ROLE: &str = "Member";
/// Shown as hours when the student left hours per week blank.
pub const DEFAULT_HOURS: &str = "N/A";
