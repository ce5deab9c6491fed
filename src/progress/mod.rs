//! Progress Tracker boundary and resume reconciliation.
//!
//! The tracker owns the incomplete-attempt records; the funnel only reads
//! them and decides which prompt to show. Discarding or reopening a record
//! belongs to the quiz-taking flow, never to this module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::errors::Result;

/// One saved in-progress attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncompleteAttempt {
    pub quiz_id: String,
    /// Zero-based index of the next unanswered question.
    pub current_index: usize,
    pub total_questions: usize,
    /// Remaining time budget in seconds at the moment of save.
    pub time_remaining_secs: u64,
    pub last_saved_at: DateTime<Utc>,
}

/// Local record of in-progress attempts.
pub trait ProgressTracker {
    /// All incomplete attempts for the current student.
    fn list_incomplete(&self) -> Result<Vec<IncompleteAttempt>>;
}

/// Outcome of activating a quiz from the bundle list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// No saved attempt: start at question zero.
    Fresh,
    /// A saved attempt exists: offer continue / start fresh.
    ResumePrompt(IncompleteAttempt),
}

/// Decide whether activating `quiz_id` opens a resume prompt.
///
/// Pure: never mutates the tracker. A quiz resumes iff an incomplete record
/// with a matching id exists; the most recently saved one wins if the
/// tracker ever holds duplicates.
#[must_use]
pub fn reconcile(quiz_id: &str, records: &[IncompleteAttempt]) -> Activation {
    records
        .iter()
        .filter(|r| r.quiz_id == quiz_id)
        .max_by_key(|r| r.last_saved_at)
        .map_or(Activation::Fresh, |r| Activation::ResumePrompt(r.clone()))
}
