use uuid::Uuid;

use crate::generation::limits::{length_report, FieldCheck, MIN_DESCRIPTION_CHARS};
use crate::generation::models::{
    Activity, GenerateRequest, GenerateResponse, GeneratedContent, DEFAULT_CHAR_LIMIT,
};
use crate::session::SessionError;

/// Unvalidated contents of the add-activity form.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityDraft {
    pub name: String,
    pub participation_level: String,
    pub hours_per_week: String,
    pub description: String,
    pub char_limit: u32,
}

impl Default for ActivityDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            participation_level: String::new(),
            hours_per_week: String::new(),
            description: String::new(),
            char_limit: DEFAULT_CHAR_LIMIT,
        }
    }
}

impl ActivityDraft {
    /// Characters still missing before the description is long enough.
    pub fn description_shortfall(&self) -> usize {
        MIN_DESCRIPTION_CHARS.saturating_sub(self.description.chars().count())
    }

    pub fn is_submittable(&self) -> bool {
        !self.name.trim().is_empty() && self.description_shortfall() == 0
    }
}

/// An activity plus whatever the last successful generation produced for it.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredActivity {
    pub activity: Activity,
    pub generated: Option<GeneratedContent>,
}

/// Identifies one outstanding generate request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GenerationTicket(Uuid);

impl GenerationTicket {
    pub fn id(&self) -> Uuid {
        self.0
    }
}

/// Immutable activity list with selection and the generate in-flight guard.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityStore {
    activities: Vec<StoredActivity>,
    selected: Option<usize>,
    next_id: i64,
    in_flight: Option<GenerationTicket>,
}

impl Default for ActivityStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityStore {
    pub fn new() -> Self {
        Self {
            activities: Vec::new(),
            selected: None,
            next_id: 1,
            in_flight: None,
        }
    }

    pub fn activities(&self) -> &[StoredActivity] {
        &self.activities
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_activity(&self) -> Option<&StoredActivity> {
        self.selected.and_then(|i| self.activities.get(i))
    }

    pub fn is_generating(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Validates the draft and appends it. The form is locked while generating.
    pub fn add(&self, draft: ActivityDraft) -> Result<Self, SessionError> {
        if self.is_generating() {
            return Err(SessionError::GenerationInFlight);
        }
        if !draft.is_submittable() {
            return Err(SessionError::InvalidDraft {
                min_chars: MIN_DESCRIPTION_CHARS,
            });
        }

        let mut next = self.clone();
        next.activities.push(StoredActivity {
            activity: Activity {
                id: self.next_id,
                name: draft.name,
                participation_level: draft.participation_level,
                hours_per_week: draft.hours_per_week,
                description: draft.description,
                char_limit: draft.char_limit,
            },
            generated: None,
        });
        next.next_id += 1;
        Ok(next)
    }

    /// Removes the activity at `index`, keeping the selection on the same item
    /// when it survives. Rejected while generating: results are matched by index.
    pub fn remove(&self, index: usize) -> Result<Self, SessionError> {
        if self.is_generating() {
            return Err(SessionError::GenerationInFlight);
        }
        if index >= self.activities.len() {
            return Err(SessionError::IndexOutOfRange(index));
        }

        let mut next = self.clone();
        next.activities.remove(index);
        next.selected = match self.selected {
            Some(s) if s == index => None,
            Some(s) if s > index => Some(s - 1),
            other => other,
        };
        Ok(next)
    }

    pub fn select(&self, index: usize) -> Result<Self, SessionError> {
        if index >= self.activities.len() {
            return Err(SessionError::IndexOutOfRange(index));
        }
        Ok(Self {
            selected: Some(index),
            ..self.clone()
        })
    }

    /// Clears everything. An outstanding generation becomes stale.
    pub fn reset(&self) -> Self {
        Self {
            next_id: self.next_id,
            ..Self::new()
        }
    }

    /// Marks a generation as outstanding and hands back its ticket.
    pub fn begin_generation(&self) -> Result<(Self, GenerationTicket), SessionError> {
        if self.is_generating() {
            return Err(SessionError::GenerationInFlight);
        }
        if self.activities.is_empty() {
            return Err(SessionError::NoActivities);
        }

        let ticket = GenerationTicket(Uuid::new_v4());
        let next = Self {
            in_flight: Some(ticket),
            ..self.clone()
        };
        Ok((next, ticket))
    }

    /// Attaches results by index and selects the first activity.
    ///
    /// On error the store is left untouched; follow up with `fail_generation`.
    pub fn complete_generation(
        &self,
        ticket: GenerationTicket,
        results: Vec<GeneratedContent>,
    ) -> Result<Self, SessionError> {
        if self.in_flight != Some(ticket) {
            return Err(SessionError::StaleTicket);
        }
        if results.len() != self.activities.len() {
            return Err(SessionError::ResultCountMismatch {
                expected: self.activities.len(),
                actual: results.len(),
            });
        }

        let activities = self
            .activities
            .iter()
            .zip(results)
            .map(|(stored, generated)| StoredActivity {
                activity: stored.activity.clone(),
                generated: Some(generated),
            })
            .collect();

        Ok(Self {
            activities,
            selected: Some(0),
            next_id: self.next_id,
            in_flight: None,
        })
    }

    /// Convenience over `complete_generation` for a decoded endpoint response.
    pub fn apply_response(
        &self,
        ticket: GenerationTicket,
        response: GenerateResponse,
    ) -> Result<Self, SessionError> {
        self.complete_generation(ticket, response.data.activities)
    }

    /// Clears the in-flight flag; prior results are kept. Stale tickets are ignored.
    pub fn fail_generation(&self, ticket: GenerationTicket) -> Self {
        if self.in_flight != Some(ticket) {
            return self.clone();
        }
        Self {
            in_flight: None,
            ..self.clone()
        }
    }

    /// Body for `POST /api/generate` carrying the whole list.
    pub fn request_body(&self) -> GenerateRequest {
        GenerateRequest {
            activities: Some(
                self.activities
                    .iter()
                    .map(|stored| stored.activity.clone())
                    .collect(),
            ),
        }
    }

    /// Character-count checks for the selected activity's generated content.
    pub fn selected_length_report(&self) -> Option<Vec<FieldCheck>> {
        self.selected_activity()
            .and_then(|stored| stored.generated.as_ref())
            .map(length_report)
    }
}
