//! Elm-style state model for the quiz-selection funnel.
//!
//! All funnel state lives in [`FunnelModel`]. User input and resolver
//! responses arrive as messages; side-effects are represented as command
//! values returned from the update function (see `update`).
//!
//! **Design invariant:** the model is deterministic and testable — no I/O
//! happens here. The screen is never stored: it is derived from the
//! selection axes by [`FunnelModel::screen`], so state and presentation can
//! never disagree.

use serde::{Deserialize, Serialize};

use crate::progress::IncompleteAttempt;
use crate::resolver::{Bundle, BundleRequest, Quiz};

// ──────────────────── closed variants ────────────────────

/// Top-level exam track. `None` in [`SelectionState::category`] means the
/// select-by-grade path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    /// Grade 5 scholarship exam. Has no subject axis.
    #[serde(rename = "scholarship")]
    Scholarship,
    /// Advanced Level.
    #[serde(rename = "al")]
    AdvancedLevel,
    /// Ordinary Level.
    #[serde(rename = "ol")]
    OrdinaryLevel,
}

impl Category {
    /// Wire slug used in resolver requests and the launch context.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Scholarship => "scholarship",
            Self::AdvancedLevel => "al",
            Self::OrdinaryLevel => "ol",
        }
    }

    /// Resolve a wire slug back to a category.
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "scholarship" => Some(Self::Scholarship),
            "al" => Some(Self::AdvancedLevel),
            "ol" => Some(Self::OrdinaryLevel),
            _ => None,
        }
    }
}

/// Kind of quiz content the student is after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperType {
    #[serde(rename = "past-papers")]
    PastPapers,
    #[serde(rename = "model-papers")]
    ModelPapers,
    #[serde(rename = "school-papers")]
    SchoolPapers,
    /// Topic-scoped practice; only reachable with a subject on the A/L–O/L path.
    #[serde(rename = "lessonwise")]
    Lessonwise,
    /// Terminal escape into the external quiz-configuration flow.
    #[serde(rename = "quick-quiz")]
    QuickQuiz,
}

impl PaperType {
    /// Wire slug used in resolver requests.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::PastPapers => "past-papers",
            Self::ModelPapers => "model-papers",
            Self::SchoolPapers => "school-papers",
            Self::Lessonwise => "lessonwise",
            Self::QuickQuiz => "quick-quiz",
        }
    }

    /// Resolve a wire slug back to a paper type.
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "past-papers" => Some(Self::PastPapers),
            "model-papers" => Some(Self::ModelPapers),
            "school-papers" => Some(Self::SchoolPapers),
            "lessonwise" => Some(Self::Lessonwise),
            "quick-quiz" => Some(Self::QuickQuiz),
            _ => None,
        }
    }
}

// ──────────────────── screens ────────────────────

/// Render modes of the funnel, derived from state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    /// Entry chooser: category tiles plus the grade/medium/subject axes.
    #[default]
    Entry,
    /// Language of instruction, category path only.
    Language,
    /// Subject chooser, A/L–O/L only.
    Subject,
    /// Paper-type chooser; the offered set is derived, not stored.
    PaperType,
    /// Term chooser, grade path with numeric grade 6–13 only.
    Term,
    /// Topic chooser, A/L–O/L lessonwise only.
    Topic,
    /// Terminal: resolved bundle list with search and activation.
    Bundles,
}

// ──────────────────── selection state ────────────────────

/// The single source of truth for "where the user is" in the funnel.
///
/// Exactly one of `category = None` / `category = Some(_)` governs which of
/// (`grade`, `medium`) vs. `language` is authoritative; the resolver never
/// reads the inactive pair. `term` and `topic` belong to different branches
/// and are never simultaneously set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    /// Exam track; `None` selects the grade path.
    pub category: Option<Category>,
    /// Grade slug, grade path only (e.g. `"grade-8"`).
    pub grade: Option<String>,
    /// Language of instruction, grade path only.
    pub medium: Option<String>,
    /// Language of instruction, category path only.
    pub language: Option<String>,
    /// Subject slug; domain depends on category/grade.
    pub subject: Option<String>,
    /// Chosen paper type.
    pub paper_type: Option<PaperType>,
    /// Term slug; grade path, model/school papers, grade 6–13 only.
    pub term: Option<String>,
    /// Topic slug; A/L–O/L lessonwise only.
    pub topic: Option<String>,
    /// Free-text search; orthogonal, only effective on the bundle list.
    pub search_query: String,
}

impl SelectionState {
    /// Set or clear the category, clearing every dependent axis.
    pub fn set_category(&mut self, category: Option<Category>) {
        self.category = category;
        self.subject = None;
        self.language = None;
        self.paper_type = None;
        self.term = None;
        self.topic = None;
    }

    /// Set the grade axis (grade path). Clears the dependent subject.
    pub fn set_grade(&mut self, grade: String) {
        self.grade = Some(grade);
        self.subject = None;
    }

    /// Set the subject, clearing the dependent topic.
    pub fn set_subject(&mut self, subject: String) {
        self.subject = Some(subject);
        self.topic = None;
    }

    /// Set the term. Never legal while a topic is set.
    pub fn set_term(&mut self, term: String) {
        debug_assert!(self.topic.is_none(), "term and topic are exclusive");
        self.term = Some(term);
    }

    /// Set the topic. Never legal while a term is set.
    pub fn set_topic(&mut self, topic: String) {
        debug_assert!(self.term.is_none(), "term and topic are exclusive");
        self.topic = Some(topic);
    }

    /// Numeric grade parsed from the grade slug (`"grade-8"` → 8).
    #[must_use]
    pub fn grade_number(&self) -> Option<u8> {
        let grade = self.grade.as_deref()?;
        let digits = grade.strip_prefix("grade-").unwrap_or(grade);
        digits.parse().ok()
    }

    /// Whether the numeric grade falls in the term band (6–13).
    #[must_use]
    pub fn in_term_band(&self) -> bool {
        self.grade_number().is_some_and(|n| (6..=13).contains(&n))
    }

    /// All three grade-path axes are set, enabling the Go action.
    #[must_use]
    pub const fn grade_path_complete(&self) -> bool {
        self.category.is_none()
            && self.grade.is_some()
            && self.medium.is_some()
            && self.subject.is_some()
    }

    /// Map this selection into the resolver's wire request.
    ///
    /// Category-path mapping: the grade slot carries the category slug and
    /// the medium slot the chosen language. Scholarship has no subject axis,
    /// so the request substitutes `subject = "scholarship"` — a wart of the
    /// resolver contract, preserved deliberately.
    #[must_use]
    pub fn bundle_request(&self, paper_type: PaperType) -> BundleRequest {
        match self.category {
            Some(Category::Scholarship) => BundleRequest {
                grade: Category::Scholarship.slug().to_string(),
                medium: None,
                subject: "scholarship".to_string(),
                paper_type: paper_type.slug().to_string(),
                term: None,
            },
            Some(category) => BundleRequest {
                grade: category.slug().to_string(),
                medium: self.language.clone(),
                subject: self.subject.clone().unwrap_or_default(),
                paper_type: paper_type.slug().to_string(),
                term: None,
            },
            None => BundleRequest {
                grade: self.grade.clone().unwrap_or_default(),
                medium: self.medium.clone(),
                subject: self.subject.clone().unwrap_or_default(),
                paper_type: paper_type.slug().to_string(),
                term: self.term.clone(),
            },
        }
    }
}

// ──────────────────── notices and prompts ────────────────────

/// Entry paths a feature flag can close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPath {
    Scholarship,
    AdvancedLevel,
    OrdinaryLevel,
    GradeSelection,
}

impl From<Category> for EntryPath {
    fn from(category: Category) -> Self {
        match category {
            Category::Scholarship => Self::Scholarship,
            Category::AdvancedLevel => Self::AdvancedLevel,
            Category::OrdinaryLevel => Self::OrdinaryLevel,
        }
    }
}

/// User-visible notices surfaced through the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A flag-disabled path was chosen; no state changed.
    ComingSoon(EntryPath),
    /// A locked quiz was activated; purchase is required first.
    LockedQuiz { quiz_id: String },
}

/// Modal offering continue / start-fresh for a saved attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumePrompt {
    /// The quiz being activated.
    pub quiz: Quiz,
    /// The saved attempt backing the prompt.
    pub attempt: IncompleteAttempt,
}

// ──────────────────── in-flight requests ────────────────────

/// What an outstanding resolver call was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPurpose {
    /// Grade-path Go probe; content is discarded, only success matters.
    Discovery,
    /// Funnel-scoped bundle resolution.
    Bundles,
    /// Free-text search.
    Search,
}

/// The single outstanding request, if any.
///
/// Responses are applied only when their token matches; every
/// navigation-changing transition clears this record, which is what makes
/// stale responses from abandoned screens silently discardable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRequest {
    pub token: u64,
    pub purpose: RequestPurpose,
}

// ──────────────────── model ────────────────────

/// Complete funnel state: selection axes plus result caches and overlays.
#[derive(Debug, Default)]
pub struct FunnelModel {
    /// The selection axes.
    pub selection: SelectionState,
    /// Grade path confirmed by a successful discovery probe.
    pub grade_path_ready: bool,
    /// Funnel-scoped bundle list (valid on the bundle screen).
    pub bundles: Vec<Bundle>,
    /// Incomplete-attempt snapshot fetched alongside the bundles.
    pub incomplete: Vec<IncompleteAttempt>,
    /// Search-mode results; `Some` while a search result set is displayed.
    pub search_results: Option<Vec<Quiz>>,
    /// Outstanding resolver request, if any.
    pub pending: Option<PendingRequest>,
    /// Monotonic token source for request staleness checks.
    pub next_token: u64,
    /// Inline error on the bundle list; retryable without re-traversal.
    pub results_error: Option<String>,
    /// Inline error on the entry chooser (failed discovery probe).
    pub entry_error: Option<String>,
    /// Active notice, if any.
    pub notice: Option<Notice>,
    /// Open resume prompt, if any.
    pub resume_prompt: Option<ResumePrompt>,
    /// Last funnel-scoped request; used by retry and search-clear restore.
    pub last_request: Option<BundleRequest>,
    /// Count of resolver failures this session.
    pub resolver_errors: u64,
    /// Count of stale responses discarded this session.
    pub stale_discards: u64,
}

impl FunnelModel {
    /// Fresh model at the entry chooser.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive the screen to render. Pure and exhaustive over the axes.
    #[must_use]
    pub fn screen(&self) -> Screen {
        let s = &self.selection;
        match s.category {
            Some(Category::Scholarship) => {
                if s.paper_type.is_none() {
                    Screen::PaperType
                } else {
                    Screen::Bundles
                }
            }
            Some(Category::AdvancedLevel | Category::OrdinaryLevel) => {
                if s.language.is_none() {
                    Screen::Language
                } else if s.subject.is_none() {
                    Screen::Subject
                } else {
                    match s.paper_type {
                        None => Screen::PaperType,
                        Some(PaperType::Lessonwise) if s.topic.is_none() => Screen::Topic,
                        Some(_) => Screen::Bundles,
                    }
                }
            }
            None => {
                if !self.grade_path_ready {
                    Screen::Entry
                } else {
                    match s.paper_type {
                        None => Screen::PaperType,
                        Some(PaperType::ModelPapers | PaperType::SchoolPapers)
                            if s.term.is_none() && s.in_term_band() =>
                        {
                            Screen::Term
                        }
                        Some(_) => Screen::Bundles,
                    }
                }
            }
        }
    }

    /// Reverse the forward transition that produced the current screen,
    /// restoring the exact prior selection. Returns `false` at the entry
    /// chooser (nothing to reverse).
    pub fn back(&mut self) -> bool {
        self.pending = None;
        match self.screen() {
            Screen::Entry => {
                self.entry_error = None;
                false
            }
            Screen::Language => {
                // Entered via chooseCategory.
                self.selection.set_category(None);
                true
            }
            Screen::Subject => {
                // Entered via chooseLanguage.
                self.selection.language = None;
                true
            }
            Screen::PaperType => {
                match self.selection.category {
                    // Scholarship skips the language/subject axes entirely.
                    Some(Category::Scholarship) => self.selection.set_category(None),
                    // A/L–O/L entered via chooseSubject.
                    Some(_) => self.selection.subject = None,
                    // Grade path entered via a confirmed Go.
                    None => {
                        self.grade_path_ready = false;
                        self.entry_error = None;
                    }
                }
                true
            }
            Screen::Term | Screen::Topic => {
                // Entered via choosePaperType; term/topic are still unset here.
                self.selection.paper_type = None;
                true
            }
            Screen::Bundles => {
                self.drop_results();
                if self.selection.term.is_some() {
                    self.selection.term = None;
                } else if self.selection.topic.is_some() {
                    self.selection.topic = None;
                } else {
                    self.selection.paper_type = None;
                }
                true
            }
        }
    }

    /// Hand out the next request token and record it as pending.
    pub fn issue_token(&mut self, purpose: RequestPurpose) -> u64 {
        self.next_token += 1;
        self.pending = Some(PendingRequest {
            token: self.next_token,
            purpose,
        });
        self.next_token
    }

    /// Whether a response with this token/purpose is still current.
    #[must_use]
    pub fn accepts_response(&self, token: u64, purpose: RequestPurpose) -> bool {
        self.pending == Some(PendingRequest { token, purpose })
    }

    /// Drop every bundle-screen cache: results, search state, errors,
    /// prompts, and the pending request.
    pub fn drop_results(&mut self) {
        self.bundles.clear();
        self.incomplete.clear();
        self.search_results = None;
        self.results_error = None;
        self.resume_prompt = None;
        self.selection.search_query.clear();
        self.last_request = None;
        self.pending = None;
    }

    /// Find a quiz by id in the currently displayed result set.
    ///
    /// Search results take precedence over the funnel-scoped bundles while
    /// search mode is active.
    #[must_use]
    pub fn find_quiz(&self, quiz_id: &str) -> Option<&Quiz> {
        if let Some(results) = &self.search_results {
            return results.iter().find(|q| q.id == quiz_id);
        }
        self.bundles.iter().find_map(|b| b.quiz(quiz_id))
    }
}

// ──────────────────── tests ────────────────────
