//! Catalog Provider boundary: subject lists and feature flags.
//!
//! The funnel never talks to the remote catalog directly — it consumes a
//! snapshot loaded once on entry. Both fetches degrade instead of failing:
//! a flag fetch error falls back to a conservative snapshot and a subject
//! fetch error yields an empty list, which the derivation layer covers with
//! the built-in fallback tables.

pub mod flags;
pub mod subjects;

use crate::core::errors::Result;

use self::flags::FeatureFlags;
use self::subjects::SubjectEntry;

/// Read-only view of the remote content catalog.
pub trait CatalogProvider {
    /// Full subject list, across all catalog categories.
    fn subjects(&self) -> Result<Vec<SubjectEntry>>;

    /// Admin-configured feature flags gating funnel paths.
    fn feature_flags(&self) -> Result<FeatureFlags>;
}

/// Fetch the flag snapshot, degrading to `fallback` on error.
///
/// Configuration-unavailable is never allowed to block funnel entry.
pub fn load_flag_snapshot<C: CatalogProvider>(provider: &C, fallback: FeatureFlags) -> FeatureFlags {
    provider.feature_flags().unwrap_or(fallback)
}

/// Fetch the subject snapshot, degrading to an empty list on error.
pub fn load_subject_snapshot<C: CatalogProvider>(provider: &C) -> Vec<SubjectEntry> {
    provider.subjects().unwrap_or_default()
}
