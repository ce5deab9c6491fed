//! Bundle Resolver boundary: wire types and the resolution trait.
//!
//! The resolver API is stringly typed (slugs on the wire); the typed state
//! machine maps into [`BundleRequest`] at this boundary. Two warts of the
//! remote contract are preserved rather than papered over: the request
//! always requires a subject (Scholarship substitutes `"scholarship"`), and
//! lessonwise requests carry no topic slot, so topic scoping of the response
//! does not happen here.

use serde::{Deserialize, Serialize};

use crate::core::errors::Result;

/// Fully-specified resolution request.
///
/// On the category path the `grade` slot carries the category slug
/// (`"al"`, `"ol"`, `"scholarship"`) and `medium` carries the chosen
/// language; Scholarship has no language axis and omits `medium`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleRequest {
    pub grade: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    pub subject: String,
    pub paper_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
}

/// A resolver-returned group of quizzes sharing year/difficulty metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    pub quizzes: Vec<Quiz>,
}

/// One playable quiz, reduced to what the funnel needs for gating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub title: String,
    /// Locked quizzes require purchase before activation.
    pub is_locked: bool,
    pub is_free: bool,
}

impl Bundle {
    /// Find a quiz by id across this bundle.
    #[must_use]
    pub fn quiz(&self, quiz_id: &str) -> Option<&Quiz> {
        self.quizzes.iter().find(|q| q.id == quiz_id)
    }
}

/// Remote service that maps a fully-specified selection to quiz bundles and
/// supports free-text search independent of the funnel scope.
pub trait BundleResolver {
    /// Bundles matching the request. Failure is retryable.
    fn resolve(&self, request: &BundleRequest) -> Result<Vec<Bundle>>;

    /// Free-text quiz search, bypassing bundle and paper-type scoping.
    fn search(&self, query: &str) -> Result<Vec<Quiz>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_omits_empty_optional_slots() {
        let request = BundleRequest {
            grade: "scholarship".to_string(),
            medium: None,
            subject: "scholarship".to_string(),
            paper_type: "past-papers".to_string(),
            term: None,
        };
        let json = serde_json::to_string(&request).expect("serialize");
        assert!(!json.contains("medium"));
        assert!(!json.contains("term"));
        assert!(json.contains("\"paperType\":\"past-papers\""));
    }

    #[test]
    fn request_round_trips_with_term() {
        let request = BundleRequest {
            grade: "grade-8".to_string(),
            medium: Some("english".to_string()),
            subject: "mathematics".to_string(),
            paper_type: "model-papers".to_string(),
            term: Some("2nd-term".to_string()),
        };
        let json = serde_json::to_string(&request).expect("serialize");
        let parsed: BundleRequest = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, request);
    }

    #[test]
    fn bundle_quiz_lookup() {
        let bundle = Bundle {
            id: "b1".to_string(),
            title: "2023 Past Papers".to_string(),
            year: Some("2023".to_string()),
            difficulty: None,
            quizzes: vec![Quiz {
                id: "q1".to_string(),
                title: "Paper I".to_string(),
                is_locked: false,
                is_free: true,
            }],
        };
        assert!(bundle.quiz("q1").is_some());
        assert!(bundle.quiz("q2").is_none());
    }
}
