#![allow(dead_code)]

//! Client-side session state for the activity form, kept as plain data so any
//! front end can drive it.
//!
//! Every operation takes `&self` and returns a new `ActivityStore`; nothing is
//! mutated in place. A second generate while one is outstanding is rejected.

use thiserror::Error;

pub mod store;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Please fill in both activity name and description (minimum {min_chars} characters)")]
    InvalidDraft { min_chars: usize },

    #[error("Please add at least one activity first")]
    NoActivities,

    #[error("A generation is already in progress")]
    GenerationInFlight,

    #[error("Generation result belongs to a request that is no longer current")]
    StaleTicket,

    #[error("Expected {expected} generated activities, got {actual}")]
    ResultCountMismatch { expected: usize, actual: usize },

    #[error("No activity at index {0}")]
    IndexOutOfRange(usize),
}
