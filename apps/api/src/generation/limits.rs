//! Character limits for the two application formats.
//!
//! Limits are advisory: the endpoint logs overruns and the session store
//! reports them for display, but nothing is rejected for being too long.
//! Lengths count Unicode scalar values, not bytes.

use serde::Serialize;

use crate::generation::models::GeneratedContent;

pub const COMMON_APP_ORGANIZATION_LIMIT: usize = 100;
pub const COMMON_APP_POSITION_LIMIT: usize = 50;
pub const COMMON_APP_DESCRIPTION_LIMIT: usize = 150;
pub const UC_ACTIVITY_NAME_LIMIT: usize = 60;
pub const UC_DESCRIPTION_LIMIT: usize = 350;

/// Minimum description length accepted by the activity form.
pub const MIN_DESCRIPTION_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LengthCheck {
    pub len: usize,
    pub limit: usize,
}

impl LengthCheck {
    pub fn of(text: &str, limit: usize) -> Self {
        Self {
            len: text.chars().count(),
            limit,
        }
    }

    pub fn over_by(&self) -> usize {
        self.len.saturating_sub(self.limit)
    }

    pub fn is_within(&self) -> bool {
        self.len <= self.limit
    }
}

/// A length check tied to the field it was computed for,
/// e.g. `commonApp.variations[1].text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldCheck {
    pub field: String,
    pub check: LengthCheck,
}

/// Checks every length-limited field of one activity's generated content.
pub fn length_report(content: &GeneratedContent) -> Vec<FieldCheck> {
    let common = &content.common_app;
    let uc = &content.uc;

    let mut report = vec![
        FieldCheck {
            field: "commonApp.organizationName".to_string(),
            check: LengthCheck::of(&common.organization_name, COMMON_APP_ORGANIZATION_LIMIT),
        },
        FieldCheck {
            field: "commonApp.position".to_string(),
            check: LengthCheck::of(&common.position, COMMON_APP_POSITION_LIMIT),
        },
    ];

    report.extend(common.variations.iter().enumerate().map(|(i, v)| FieldCheck {
        field: format!("commonApp.variations[{i}].text"),
        check: LengthCheck::of(&v.text, COMMON_APP_DESCRIPTION_LIMIT),
    }));

    report.push(FieldCheck {
        field: "uc.activityName".to_string(),
        check: LengthCheck::of(&uc.activity_name, UC_ACTIVITY_NAME_LIMIT),
    });

    report.extend(uc.variations.iter().enumerate().map(|(i, v)| FieldCheck {
        field: format!("uc.variations[{i}].text"),
        check: LengthCheck::of(&v.text, UC_DESCRIPTION_LIMIT),
    }));

    report
}

/// Only the fields that exceed their limit.
pub fn over_limit_fields(content: &GeneratedContent) -> Vec<FieldCheck> {
    length_report(content)
        .into_iter()
        .filter(|f| !f.check.is_within())
        .collect()
}
