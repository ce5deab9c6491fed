//! Launch context handed to the quiz-taking flow.
//!
//! The funnel does not await the flow it hands off to; this record is the
//! whole contract. Discarding or reopening a saved attempt happens on the
//! receiving side, keyed off `resume`.

use serde::Serialize;

use crate::funnel::model::{Category, PaperType, SelectionState};

/// Fully-resolved selection context for the quiz-taking flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub paper_type: PaperType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// Absent for the quick-quiz configuration handoff.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz_id: Option<String>,
    /// Reopen the saved attempt instead of starting at question zero.
    pub resume: bool,
}

impl LaunchContext {
    /// Context for launching a specific quiz from the bundle list.
    #[must_use]
    pub fn for_quiz(
        selection: &SelectionState,
        paper_type: PaperType,
        quiz_id: String,
        resume: bool,
    ) -> Self {
        Self {
            category: selection.category,
            grade: selection.grade.clone(),
            medium: selection.medium.clone(),
            language: selection.language.clone(),
            subject: selection.subject.clone(),
            paper_type,
            term: selection.term.clone(),
            topic: selection.topic.clone(),
            quiz_id: Some(quiz_id),
            resume,
        }
    }

    /// Context for the quick-quiz configuration escape: no quiz chosen yet.
    #[must_use]
    pub fn for_quick_quiz(selection: &SelectionState) -> Self {
        Self {
            category: selection.category,
            grade: selection.grade.clone(),
            medium: selection.medium.clone(),
            language: selection.language.clone(),
            subject: selection.subject.clone(),
            paper_type: PaperType::QuickQuiz,
            term: None,
            topic: None,
            quiz_id: None,
            resume: false,
        }
    }
}
