//! Feature flags gating funnel paths.

use serde::{Deserialize, Serialize};

/// Admin-configured booleans controlling which funnel entries are offered.
///
/// Fetched once on funnel entry and treated as an immutable snapshot for the
/// session: transition rules receive it as a parameter, never read it from
/// ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlags {
    /// Scholarship exam track is open.
    pub scholarship_enabled: bool,
    /// Advanced Level track is open.
    pub advanced_level_enabled: bool,
    /// Ordinary Level track is open.
    pub ordinary_level_enabled: bool,
    /// Select-by-grade path is open.
    pub grade_selection_enabled: bool,
}

impl FeatureFlags {
    /// Snapshot used when the live fetch fails: the narrowest set that keeps
    /// the funnel navigable (A/L only).
    #[must_use]
    pub const fn conservative_default() -> Self {
        Self {
            scholarship_enabled: false,
            advanced_level_enabled: true,
            ordinary_level_enabled: false,
            grade_selection_enabled: false,
        }
    }

    /// Snapshot with every path open (fixtures and tests).
    #[must_use]
    pub const fn all_enabled() -> Self {
        Self {
            scholarship_enabled: true,
            advanced_level_enabled: true,
            ordinary_level_enabled: true,
            grade_selection_enabled: true,
        }
    }
}
