//! Pure update function for the quiz-selection funnel.
//!
//! `update()` takes the current model, the immutable feature-flag snapshot,
//! and a message; it mutates the model and returns a command describing any
//! side-effect the driver should execute.
//!
//! **Design invariant:** this module performs zero I/O. All effects are
//! described as [`FunnelCmd`] values, and the flag snapshot arrives as a
//! parameter — transitions never read ambient state.

use crate::catalog::flags::FeatureFlags;
use crate::funnel::handoff::LaunchContext;
use crate::funnel::model::{
    Category, EntryPath, FunnelModel, Notice, PaperType, RequestPurpose, ResumePrompt, Screen,
};
use crate::funnel::options;
use crate::progress::{self, Activation, IncompleteAttempt};
use crate::resolver::{Bundle, BundleRequest, Quiz};

// ──────────────────── messages ────────────────────

/// One of the three grade-path axes on the entry chooser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradeAxis {
    Grade(String),
    Medium(String),
    Subject(String),
}

/// Payload of a successful funnel-scoped resolution: the bundles plus the
/// incomplete-attempt snapshot they are cross-referenced with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBundles {
    pub bundles: Vec<Bundle>,
    pub incomplete: Vec<IncompleteAttempt>,
}

/// Events that drive state transitions in the funnel.
///
/// Response messages carry the token of the request they answer; the reducer
/// discards any response whose token no longer matches the pending record.
#[derive(Debug, Clone, PartialEq)]
pub enum FunnelMsg {
    /// A category tile on the entry chooser.
    ChooseCategory(Category),
    /// Language of instruction (category path).
    ChooseLanguage(String),
    /// Subject chooser selection (A/L–O/L path).
    ChooseSubject(String),
    /// One grade-path axis on the entry chooser.
    GradeAxis(GradeAxis),
    /// Grade-path Go action: probe the resolver before revealing paper types.
    Go,
    /// Paper-type chooser selection.
    ChoosePaperType(PaperType),
    /// Term chooser selection.
    ChooseTerm(String),
    /// Topic chooser selection.
    ChooseTopic(String),
    /// Screen-specific inverse of the forward transition.
    Back,
    /// Search input changed (only effective on the bundle list).
    Search(String),
    /// Retry the failed resolution without re-traversing the funnel.
    Retry,
    /// Dismiss the active notice.
    DismissNotice,
    /// A quiz on the bundle list was activated.
    ActivateQuiz(String),
    /// Resume prompt: reopen the saved attempt.
    ResumeContinue,
    /// Resume prompt: discard and start at question zero.
    ResumeFresh,
    /// Resume prompt: close without launching.
    ResumeDismiss,
    /// Grade-path discovery probe finished.
    DiscoveryComplete {
        token: u64,
        outcome: Result<(), String>,
    },
    /// Funnel-scoped resolution finished.
    BundlesResolved {
        token: u64,
        outcome: Result<ResolvedBundles, String>,
    },
    /// Free-text search finished.
    SearchResolved {
        token: u64,
        outcome: Result<Vec<Quiz>, String>,
    },
}

// ──────────────────── commands ────────────────────

/// Side-effects returned by the update function for the driver to execute.
///
/// All network work is represented as a command — the update function never
/// performs I/O, keeping the state machine deterministic and testable.
#[derive(Debug, Clone, PartialEq)]
pub enum FunnelCmd {
    /// No side-effect.
    None,
    /// Grade-path discovery probe; only success/failure matters.
    Discover { token: u64, request: BundleRequest },
    /// Funnel-scoped bundle resolution.
    Resolve { token: u64, request: BundleRequest },
    /// Free-text quiz search, bypassing funnel scope.
    SearchQuizzes { token: u64, query: String },
    /// Hand a chosen quiz to the quiz-taking flow.
    Launch(LaunchContext),
    /// Hand the resolved context to the quiz-configuration flow.
    QuickQuiz(LaunchContext),
}

// ──────────────────── update ────────────────────

/// Apply a message to the model and return the next command for the driver.
///
/// This is the core state machine of the funnel. Every transition goes
/// through this function.
#[allow(clippy::too_many_lines)]
pub fn update(model: &mut FunnelModel, flags: &FeatureFlags, msg: FunnelMsg) -> FunnelCmd {
    match msg {
        FunnelMsg::ChooseCategory(category) => {
            if model.screen() != Screen::Entry {
                return derivation_bug("chooseCategory outside the entry chooser");
            }
            if !category_enabled(flags, category) {
                // Rejected: no state change, surface the closed-path signal.
                model.notice = Some(Notice::ComingSoon(category.into()));
                return FunnelCmd::None;
            }
            // Navigation invalidates any in-flight request.
            model.pending = None;
            model.notice = None;
            model.entry_error = None;
            model.selection.set_category(Some(category));
            FunnelCmd::None
        }

        FunnelMsg::ChooseLanguage(language) => {
            if model.screen() != Screen::Language {
                return derivation_bug("chooseLanguage outside the language chooser");
            }
            model.pending = None;
            model.selection.language = Some(language);
            FunnelCmd::None
        }

        FunnelMsg::ChooseSubject(subject) => {
            if model.screen() != Screen::Subject {
                return derivation_bug("chooseSubject outside the subject chooser");
            }
            model.pending = None;
            model.selection.set_subject(subject);
            FunnelCmd::None
        }

        FunnelMsg::GradeAxis(axis) => {
            if model.screen() != Screen::Entry {
                return derivation_bug("grade axis outside the entry chooser");
            }
            if !flags.grade_selection_enabled {
                model.notice = Some(Notice::ComingSoon(EntryPath::GradeSelection));
                return FunnelCmd::None;
            }
            // An axis change invalidates an outstanding probe for the old axes.
            model.pending = None;
            model.notice = None;
            model.entry_error = None;
            match axis {
                GradeAxis::Grade(grade) => model.selection.set_grade(grade),
                GradeAxis::Medium(medium) => model.selection.medium = Some(medium),
                GradeAxis::Subject(subject) => model.selection.set_subject(subject),
            }
            FunnelCmd::None
        }

        FunnelMsg::Go => {
            if model.screen() != Screen::Entry || !flags.grade_selection_enabled {
                return derivation_bug("Go outside an open entry chooser");
            }
            if !model.selection.grade_path_complete() {
                return derivation_bug("Go with incomplete grade axes");
            }
            // Probe with model papers: available in every band, content discarded.
            let request = model.selection.bundle_request(PaperType::ModelPapers);
            let token = model.issue_token(RequestPurpose::Discovery);
            FunnelCmd::Discover { token, request }
        }

        FunnelMsg::ChoosePaperType(paper) => {
            if model.screen() != Screen::PaperType {
                return derivation_bug("choosePaperType outside the paper-type chooser");
            }
            if !options::paper_type_is_legal(&model.selection, paper) {
                return derivation_bug("paper type outside the derived offer set");
            }
            match paper {
                // Terminal escape: hand off, no state change.
                PaperType::QuickQuiz => {
                    FunnelCmd::QuickQuiz(LaunchContext::for_quick_quiz(&model.selection))
                }
                PaperType::Lessonwise if model.selection.category.is_some() => {
                    model.pending = None;
                    model.selection.paper_type = Some(paper);
                    FunnelCmd::None // screen derives to the topic chooser
                }
                PaperType::ModelPapers | PaperType::SchoolPapers
                    if model.selection.category.is_none() && model.selection.in_term_band() =>
                {
                    model.pending = None;
                    model.selection.paper_type = Some(paper);
                    FunnelCmd::None // screen derives to the term chooser
                }
                _ => {
                    model.selection.paper_type = Some(paper);
                    begin_resolve(model)
                }
            }
        }

        FunnelMsg::ChooseTerm(term) => {
            if model.screen() != Screen::Term {
                return derivation_bug("chooseTerm outside the term chooser");
            }
            if !options::term_is_legal(&term) {
                return derivation_bug("term outside the offered list");
            }
            model.selection.set_term(term);
            begin_resolve(model)
        }

        FunnelMsg::ChooseTopic(topic) => {
            if model.screen() != Screen::Topic {
                return derivation_bug("chooseTopic outside the topic chooser");
            }
            if !options::topic_options(&model.selection).contains(&topic.as_str()) {
                return derivation_bug("topic outside the offered list");
            }
            model.selection.set_topic(topic);
            // The request is scoped to the paper type only; the topic rides
            // along in state and the launch context but is not sent — the
            // resolver contract has no topic slot.
            begin_resolve(model)
        }

        FunnelMsg::Back => {
            // Prompt has input precedence over screen-level back.
            if model.resume_prompt.take().is_some() {
                return FunnelCmd::None;
            }
            model.notice = None;
            model.back();
            FunnelCmd::None
        }

        FunnelMsg::Search(query) => {
            model.selection.search_query = query;
            if model.screen() != Screen::Bundles {
                return FunnelCmd::None; // inert until bundles are resolved
            }
            let trimmed = model.selection.search_query.trim().to_string();
            if trimmed.is_empty() {
                // Cleared: restore the funnel-scoped result set.
                model.search_results = None;
                model.results_error = None;
                model.last_request.clone().map_or(FunnelCmd::None, |request| {
                    let token = model.issue_token(RequestPurpose::Bundles);
                    FunnelCmd::Resolve { token, request }
                })
            } else {
                let token = model.issue_token(RequestPurpose::Search);
                FunnelCmd::SearchQuizzes {
                    token,
                    query: trimmed,
                }
            }
        }

        FunnelMsg::Retry => {
            if model.screen() != Screen::Bundles || model.results_error.is_none() {
                return FunnelCmd::None;
            }
            model.results_error = None;
            let query = model.selection.search_query.trim().to_string();
            if query.is_empty() {
                model.last_request.clone().map_or(FunnelCmd::None, |request| {
                    let token = model.issue_token(RequestPurpose::Bundles);
                    FunnelCmd::Resolve { token, request }
                })
            } else {
                let token = model.issue_token(RequestPurpose::Search);
                FunnelCmd::SearchQuizzes { token, query }
            }
        }

        FunnelMsg::DismissNotice => {
            model.notice = None;
            FunnelCmd::None
        }

        FunnelMsg::ActivateQuiz(quiz_id) => {
            if model.screen() != Screen::Bundles {
                return derivation_bug("activateQuiz outside the bundle list");
            }
            let Some(quiz) = model.find_quiz(&quiz_id).cloned() else {
                return derivation_bug("activated quiz missing from the result set");
            };
            if quiz.is_locked {
                model.notice = Some(Notice::LockedQuiz { quiz_id });
                return FunnelCmd::None;
            }
            let Some(paper) = model.selection.paper_type else {
                return derivation_bug("bundle list without a paper type");
            };
            match progress::reconcile(&quiz.id, &model.incomplete) {
                Activation::Fresh => FunnelCmd::Launch(LaunchContext::for_quiz(
                    &model.selection,
                    paper,
                    quiz.id,
                    false,
                )),
                Activation::ResumePrompt(attempt) => {
                    model.resume_prompt = Some(ResumePrompt { quiz, attempt });
                    FunnelCmd::None
                }
            }
        }

        FunnelMsg::ResumeContinue => resolve_prompt(model, true),
        FunnelMsg::ResumeFresh => resolve_prompt(model, false),

        FunnelMsg::ResumeDismiss => {
            model.resume_prompt = None;
            FunnelCmd::None
        }

        FunnelMsg::DiscoveryComplete { token, outcome } => {
            if !model.accepts_response(token, RequestPurpose::Discovery) {
                model.stale_discards += 1;
                return FunnelCmd::None;
            }
            model.pending = None;
            match outcome {
                Ok(()) => {
                    model.grade_path_ready = true;
                    model.entry_error = None;
                }
                Err(details) => {
                    // Stay on the chooser; the axes survive for a retry.
                    model.entry_error = Some(details);
                    model.resolver_errors += 1;
                }
            }
            FunnelCmd::None
        }

        FunnelMsg::BundlesResolved { token, outcome } => {
            if !model.accepts_response(token, RequestPurpose::Bundles) {
                model.stale_discards += 1;
                return FunnelCmd::None;
            }
            model.pending = None;
            match outcome {
                Ok(resolved) => {
                    model.bundles = resolved.bundles;
                    model.incomplete = resolved.incomplete;
                    model.search_results = None;
                    model.results_error = None;
                }
                Err(details) => {
                    model.results_error = Some(details);
                    model.resolver_errors += 1;
                }
            }
            FunnelCmd::None
        }

        FunnelMsg::SearchResolved { token, outcome } => {
            if !model.accepts_response(token, RequestPurpose::Search) {
                model.stale_discards += 1;
                return FunnelCmd::None;
            }
            model.pending = None;
            match outcome {
                Ok(quizzes) => {
                    model.search_results = Some(quizzes);
                    model.results_error = None;
                }
                Err(details) => {
                    model.results_error = Some(details);
                    model.resolver_errors += 1;
                }
            }
            FunnelCmd::None
        }
    }
}

// ──────────────────── helpers ────────────────────

/// Whether the flag snapshot allows the given category.
const fn category_enabled(flags: &FeatureFlags, category: Category) -> bool {
    match category {
        Category::Scholarship => flags.scholarship_enabled,
        Category::AdvancedLevel => flags.advanced_level_enabled,
        Category::OrdinaryLevel => flags.ordinary_level_enabled,
    }
}

/// Kick off a funnel-scoped resolution for the now-terminal selection.
fn begin_resolve(model: &mut FunnelModel) -> FunnelCmd {
    let Some(paper) = model.selection.paper_type else {
        return derivation_bug("resolution without a paper type");
    };
    let request = model.selection.bundle_request(paper);
    model.last_request = Some(request.clone());
    model.results_error = None;
    model.search_results = None;
    // A query typed before the bundle list existed never went anywhere;
    // dropping it keeps retry scoped to the funnel request.
    model.selection.search_query.clear();
    let token = model.issue_token(RequestPurpose::Bundles);
    FunnelCmd::Resolve { token, request }
}

/// Close the resume prompt and launch with the chosen resume semantics.
fn resolve_prompt(model: &mut FunnelModel, resume: bool) -> FunnelCmd {
    let Some(prompt) = model.resume_prompt.take() else {
        return FunnelCmd::None;
    };
    let Some(paper) = model.selection.paper_type else {
        return derivation_bug("resume prompt without a paper type");
    };
    FunnelCmd::Launch(LaunchContext::for_quiz(
        &model.selection,
        paper,
        prompt.quiz.id,
        resume,
    ))
}

/// An input that option derivation should have made impossible.
///
/// Fails loudly in development builds; release builds ignore the input.
fn derivation_bug(context: &'static str) -> FunnelCmd {
    debug_assert!(false, "derivation bug: {context}");
    FunnelCmd::None
}

// ──────────────────── tests ────────────────────
