//! Shared scripted boundaries for integration tests.

use std::cell::RefCell;

use chrono::{TimeZone, Utc};
use quiz_funnel::prelude::*;

/// Catalog with a fixed flag snapshot and subject list.
pub struct FakeCatalog {
    pub flags: FeatureFlags,
    pub subjects: Vec<SubjectEntry>,
    pub down: bool,
}

impl FakeCatalog {
    pub fn all_open() -> Self {
        Self {
            flags: FeatureFlags::all_enabled(),
            subjects: Vec::new(),
            down: false,
        }
    }

    pub fn unreachable_catalog() -> Self {
        Self {
            flags: FeatureFlags::all_enabled(),
            subjects: Vec::new(),
            down: true,
        }
    }
}

impl CatalogProvider for FakeCatalog {
    fn subjects(&self) -> Result<Vec<SubjectEntry>> {
        if self.down {
            return Err(FunnelError::CatalogUnavailable {
                details: "connect refused".to_string(),
            });
        }
        Ok(self.subjects.clone())
    }

    fn feature_flags(&self) -> Result<FeatureFlags> {
        if self.down {
            return Err(FunnelError::CatalogUnavailable {
                details: "connect refused".to_string(),
            });
        }
        Ok(self.flags)
    }
}

/// Resolver that replays a fixed bundle page and records every request.
pub struct FakeResolver {
    pub bundles: Vec<Bundle>,
    pub search_hits: Vec<Quiz>,
    /// Fail this many resolve calls before succeeding.
    pub fail_first: RefCell<u32>,
    pub requests: RefCell<Vec<BundleRequest>>,
    pub queries: RefCell<Vec<String>>,
}

impl FakeResolver {
    pub fn with_bundles(bundles: Vec<Bundle>) -> Self {
        Self {
            bundles,
            search_hits: Vec::new(),
            fail_first: RefCell::new(0),
            requests: RefCell::new(Vec::new()),
            queries: RefCell::new(Vec::new()),
        }
    }

    pub fn failing_then_ok(bundles: Vec<Bundle>, failures: u32) -> Self {
        let resolver = Self::with_bundles(bundles);
        *resolver.fail_first.borrow_mut() = failures;
        resolver
    }
}

impl BundleResolver for FakeResolver {
    fn resolve(&self, request: &BundleRequest) -> Result<Vec<Bundle>> {
        self.requests.borrow_mut().push(request.clone());
        let mut remaining = self.fail_first.borrow_mut();
        if *remaining > 0 {
            *remaining -= 1;
            return Err(FunnelError::resolve("upstream timeout"));
        }
        Ok(self.bundles.clone())
    }

    fn search(&self, query: &str) -> Result<Vec<Quiz>> {
        self.queries.borrow_mut().push(query.to_string());
        Ok(self.search_hits.clone())
    }
}

/// Tracker with a fixed incomplete-attempt list.
pub struct FakeTracker {
    pub attempts: Vec<IncompleteAttempt>,
    pub broken: bool,
}

impl FakeTracker {
    pub fn empty() -> Self {
        Self {
            attempts: Vec::new(),
            broken: false,
        }
    }

    pub fn with_attempt(attempt: IncompleteAttempt) -> Self {
        Self {
            attempts: vec![attempt],
            broken: false,
        }
    }
}

impl ProgressTracker for FakeTracker {
    fn list_incomplete(&self) -> Result<Vec<IncompleteAttempt>> {
        if self.broken {
            return Err(FunnelError::ProgressUnavailable {
                details: "store corrupt".to_string(),
            });
        }
        Ok(self.attempts.clone())
    }
}

// ──────────────────── fixtures ────────────────────

pub fn quiz(id: &str, locked: bool) -> Quiz {
    Quiz {
        id: id.to_string(),
        title: format!("Paper {id}"),
        is_locked: locked,
        is_free: !locked,
    }
}

pub fn one_bundle(quizzes: Vec<Quiz>) -> Vec<Bundle> {
    vec![Bundle {
        id: "bundle-2023".to_string(),
        title: "2023".to_string(),
        year: Some("2023".to_string()),
        difficulty: None,
        quizzes,
    }]
}

pub fn saved_attempt(quiz_id: &str) -> IncompleteAttempt {
    IncompleteAttempt {
        quiz_id: quiz_id.to_string(),
        current_index: 3,
        total_questions: 10,
        time_remaining_secs: 540,
        last_saved_at: Utc.timestamp_opt(1_718_000_000, 0).unwrap(),
    }
}
