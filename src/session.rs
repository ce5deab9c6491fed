//! Session driver: the only place funnel commands touch the boundaries.
//!
//! [`FunnelSession`] owns the model, the snapshots loaded on entry, and the
//! boundary handles. `dispatch()` runs the pure update function, executes
//! the returned command against the resolver and tracker, and feeds the
//! outcome back in as a response message — so staleness is decided by the
//! same reducer that issued the request.

use std::path::Path;

use crate::catalog::flags::FeatureFlags;
use crate::catalog::subjects::{SubjectEntry, SubjectOption};
use crate::catalog::{self, CatalogProvider};
use crate::core::config::FunnelConfig;
use crate::core::errors::FunnelError;
use crate::funnel::handoff::LaunchContext;
use crate::funnel::model::{FunnelModel, PaperType, Screen};
use crate::funnel::options;
use crate::funnel::update::{self, FunnelCmd, FunnelMsg, ResolvedBundles};
use crate::logger::{EventType, TransitionLog, TransitionRecord};
use crate::progress::ProgressTracker;
use crate::resolver::{BundleRequest, BundleResolver};

/// One student's pass through the funnel.
///
/// Flags and subjects are snapshots taken at construction; the session never
/// re-fetches them. A resolver is consulted per command, a tracker per
/// resolution.
pub struct FunnelSession<R, P> {
    model: FunnelModel,
    flags: FeatureFlags,
    subjects: Vec<SubjectEntry>,
    config: FunnelConfig,
    resolver: R,
    progress: P,
    log: TransitionLog,
}

impl<R: BundleResolver, P: ProgressTracker> FunnelSession<R, P> {
    /// Start a session: snapshot flags and subjects from the catalog.
    ///
    /// Both snapshot fetches degrade rather than fail — flags fall back to
    /// the configured degraded-mode set, subjects to the built-in tables.
    pub fn start<C: CatalogProvider>(
        catalog: &C,
        resolver: R,
        progress: P,
        config: FunnelConfig,
        log_path: Option<&Path>,
    ) -> Self {
        let flags = catalog::load_flag_snapshot(catalog, config.flags.to_flags());
        let subjects = catalog::load_subject_snapshot(catalog);
        let log = log_path.map_or_else(
            || TransitionLog::discard(&config.log),
            |path| TransitionLog::open(path, &config.log),
        );
        Self {
            model: FunnelModel::new(),
            flags,
            subjects,
            config,
            resolver,
            progress,
            log,
        }
    }

    /// Apply one message, execute any resulting command, and report a
    /// handoff if the funnel reached one.
    pub fn dispatch(&mut self, msg: FunnelMsg) -> Option<LaunchContext> {
        let from = self.model.screen();
        let cmd = update::update(&mut self.model, &self.flags, msg);
        self.log_transition(from);

        match cmd {
            FunnelCmd::None => None,
            FunnelCmd::Discover { token, request } => {
                self.run_discovery(token, &request);
                None
            }
            FunnelCmd::Resolve { token, request } => {
                self.run_resolve(token, &request);
                None
            }
            FunnelCmd::SearchQuizzes { token, query } => {
                self.run_search(token, &query);
                None
            }
            FunnelCmd::Launch(context) | FunnelCmd::QuickQuiz(context) => {
                self.log.record(
                    TransitionRecord::new(EventType::Handoff)
                        .details(context.paper_type.slug()),
                );
                self.log.flush();
                Some(context)
            }
        }
    }

    // ──────────────────── views ────────────────────

    /// The current model, read-only.
    #[must_use]
    pub const fn model(&self) -> &FunnelModel {
        &self.model
    }

    /// The flag snapshot this session runs under.
    #[must_use]
    pub const fn flags(&self) -> &FeatureFlags {
        &self.flags
    }

    /// The screen the funnel is currently on.
    #[must_use]
    pub fn screen(&self) -> Screen {
        self.model.screen()
    }

    /// Subjects offered on the current path.
    #[must_use]
    pub fn subject_options(&self) -> Vec<SubjectOption> {
        options::subject_options(&self.subjects, &self.model.selection)
    }

    /// Paper types offered for the current axes.
    #[must_use]
    pub fn paper_type_options(&self) -> Vec<PaperType> {
        options::paper_type_options(&self.model.selection)
    }

    /// Topics offered for the selected subject.
    #[must_use]
    pub fn topic_options(&self) -> &'static [&'static str] {
        options::topic_options(&self.model.selection)
    }

    /// Recent transition records, oldest first.
    pub fn recent_activity(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.log.recent()
    }

    /// The resolver this session talks to.
    #[must_use]
    pub const fn resolver(&self) -> &R {
        &self.resolver
    }

    // ──────────────────── command execution ────────────────────

    fn run_discovery(&mut self, token: u64, request: &BundleRequest) {
        self.log
            .record(TransitionRecord::new(EventType::RequestIssued).token(token));
        let outcome = match self.resolver.resolve(request) {
            Ok(_) => Ok(()),
            Err(e) => Err(self.log_boundary_error(token, &e)),
        };
        self.feed(FunnelMsg::DiscoveryComplete { token, outcome });
    }

    fn run_resolve(&mut self, token: u64, request: &BundleRequest) {
        self.log
            .record(TransitionRecord::new(EventType::RequestIssued).token(token));
        let outcome = match self.resolver.resolve(request) {
            Ok(bundles) => {
                // A tracker failure must never block the bundle list.
                let incomplete = self.progress.list_incomplete().unwrap_or_default();
                Ok(ResolvedBundles {
                    bundles,
                    incomplete,
                })
            }
            Err(e) => Err(self.log_boundary_error(token, &e)),
        };
        self.feed(FunnelMsg::BundlesResolved { token, outcome });
    }

    fn run_search(&mut self, token: u64, query: &str) {
        // Below the minimum length the query is treated as still being
        // typed: deliver an empty page rather than hitting the resolver.
        let outcome = if query.chars().count() < self.config.search.min_query_len {
            Ok(Vec::new())
        } else {
            self.log
                .record(TransitionRecord::new(EventType::RequestIssued).token(token));
            self.resolver
                .search(query)
                .map_err(|e| self.log_boundary_error(token, &e))
        };
        self.feed(FunnelMsg::SearchResolved { token, outcome });
    }

    /// Record a boundary failure and return its message for the reducer.
    fn log_boundary_error(&mut self, token: u64, error: &FunnelError) -> String {
        let message = error.to_string();
        self.log.record(
            TransitionRecord::new(EventType::Error)
                .token(token)
                .ok(false)
                .error_code(error.code())
                .details(message.clone()),
        );
        message
    }

    /// Feed a response message back through the reducer and log the verdict.
    fn feed(&mut self, msg: FunnelMsg) {
        let from = self.model.screen();
        let discards_before = self.model.stale_discards;
        let errors_before = self.model.resolver_errors;
        let cmd = update::update(&mut self.model, &self.flags, msg);
        debug_assert_eq!(cmd, FunnelCmd::None, "responses never issue commands");

        if self.model.stale_discards > discards_before {
            self.log
                .record(TransitionRecord::new(EventType::ResponseDiscarded));
        } else {
            self.log.record(
                TransitionRecord::new(EventType::ResponseApplied)
                    .ok(self.model.resolver_errors == errors_before),
            );
        }
        self.log_transition(from);
    }

    fn log_transition(&mut self, from: Screen) {
        let to = self.model.screen();
        if from != to {
            self.log
                .record(TransitionRecord::new(EventType::ScreenChange).screens(from, to));
        }
        if let Some(notice) = &self.model.notice {
            self.log.record(
                TransitionRecord::new(EventType::Notice).details(format!("{notice:?}")),
            );
        }
    }
}
