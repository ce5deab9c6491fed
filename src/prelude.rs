//! Convenience re-exports for library consumers.
//!
//! ```rust,no_run
//! use quiz_funnel::prelude::*;
//! ```

// Core
pub use crate::core::config::FunnelConfig;
pub use crate::core::errors::{FunnelError, Result};

// Catalog
pub use crate::catalog::CatalogProvider;
pub use crate::catalog::flags::FeatureFlags;
pub use crate::catalog::subjects::{SubjectEntry, SubjectOption};

// Funnel
pub use crate::funnel::handoff::LaunchContext;
pub use crate::funnel::model::{Category, FunnelModel, Notice, PaperType, Screen, SelectionState};
pub use crate::funnel::update::{FunnelCmd, FunnelMsg, GradeAxis, ResolvedBundles, update};

// Boundaries
pub use crate::progress::{Activation, IncompleteAttempt, ProgressTracker};
pub use crate::resolver::{Bundle, BundleRequest, BundleResolver, Quiz};

// Session
pub use crate::session::FunnelSession;
