//! Deployment configuration: TOML file + smart defaults.
//!
//! The funnel itself is purely in-memory; this config only carries the knobs
//! an admin deployment can pin before the session starts — degraded-mode
//! feature-flag defaults, the catalog schema version the built-in fallback
//! tables are written against, and search/log tuning.

#![allow(missing_docs)]

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::flags::FeatureFlags;
use crate::catalog::subjects::FALLBACK_SCHEMA_VERSION;
use crate::core::errors::{FunnelError, Result};

/// Full funnel configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
#[derive(Default)]
pub struct FunnelConfig {
    pub flags: FlagsConfig,
    pub catalog: CatalogConfig,
    pub search: SearchConfig,
    pub log: LogConfig,
}

/// Feature-flag snapshot used when the live flag fetch fails.
///
/// Defaults to the conservative snapshot (A/L only); deployments widen it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FlagsConfig {
    pub scholarship: bool,
    pub advanced_level: bool,
    pub ordinary_level: bool,
    pub grade_selection: bool,
}

impl Default for FlagsConfig {
    fn default() -> Self {
        Self::from(FeatureFlags::conservative_default())
    }
}

impl From<FeatureFlags> for FlagsConfig {
    fn from(flags: FeatureFlags) -> Self {
        Self {
            scholarship: flags.scholarship_enabled,
            advanced_level: flags.advanced_level_enabled,
            ordinary_level: flags.ordinary_level_enabled,
            grade_selection: flags.grade_selection_enabled,
        }
    }
}

impl FlagsConfig {
    /// Project into the snapshot type the state machine consumes.
    #[must_use]
    pub const fn to_flags(&self) -> FeatureFlags {
        FeatureFlags {
            scholarship_enabled: self.scholarship,
            advanced_level_enabled: self.advanced_level,
            ordinary_level_enabled: self.ordinary_level,
            grade_selection_enabled: self.grade_selection,
        }
    }
}

/// Catalog fallback settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CatalogConfig {
    /// Schema version the built-in fallback subject tables must match.
    ///
    /// The tables ship pinned to one version; a deployment that expects a
    /// different catalog schema must ship updated tables, not silently run
    /// with divergent fallbacks.
    pub expected_schema_version: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            expected_schema_version: FALLBACK_SCHEMA_VERSION.to_string(),
        }
    }
}

/// Search behavior knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SearchConfig {
    /// Queries shorter than this are treated as cleared.
    pub min_query_len: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { min_query_len: 2 }
    }
}

/// Transition-log knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    /// Number of recent transition records retained in memory.
    pub recent_capacity: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            recent_capacity: 64,
        }
    }
}

impl FunnelConfig {
    /// Parse a config from TOML text and validate it.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file from disk. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path).map_err(|e| FunnelError::ConfigParse {
            context: "config file",
            details: format!("{}: {e}", path.display()),
        })?;
        Self::from_toml_str(&text)
    }

    /// Reject configs that cannot be honored.
    pub fn validate(&self) -> Result<()> {
        if self.catalog.expected_schema_version != FALLBACK_SCHEMA_VERSION {
            return Err(FunnelError::InvalidConfig {
                details: format!(
                    "catalog.expected_schema_version {:?} does not match the built-in \
                     fallback tables ({FALLBACK_SCHEMA_VERSION:?})",
                    self.catalog.expected_schema_version
                ),
            });
        }
        if self.search.min_query_len == 0 {
            return Err(FunnelError::InvalidConfig {
                details: "search.min_query_len must be at least 1".to_string(),
            });
        }
        if self.log.recent_capacity == 0 {
            return Err(FunnelError::InvalidConfig {
                details: "log.recent_capacity must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(FunnelConfig::default().validate().is_ok());
    }

    #[test]
    fn default_flags_match_conservative_snapshot() {
        let flags = FlagsConfig::default().to_flags();
        assert_eq!(flags, FeatureFlags::conservative_default());
    }

    #[test]
    fn toml_round_trip() {
        let config = FunnelConfig {
            flags: FlagsConfig {
                scholarship: true,
                advanced_level: true,
                ordinary_level: true,
                grade_selection: true,
            },
            ..FunnelConfig::default()
        };
        let text = toml::to_string(&config).expect("serialize config");
        let parsed = FunnelConfig::from_toml_str(&text).expect("parse config");
        assert_eq!(parsed, config);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let parsed = FunnelConfig::from_toml_str("[flags]\ngrade_selection = true\n")
            .expect("parse partial config");
        assert!(parsed.flags.grade_selection);
        assert!(parsed.flags.advanced_level);
        assert!(!parsed.flags.scholarship);
        assert_eq!(parsed.search.min_query_len, 2);
    }

    #[test]
    fn schema_version_mismatch_is_rejected() {
        let err = FunnelConfig::from_toml_str(
            "[catalog]\nexpected_schema_version = \"1999-01\"\n",
        )
        .unwrap_err();
        assert_eq!(err.code(), "QF-1001");
    }

    #[test]
    fn zero_query_len_is_rejected() {
        let err = FunnelConfig::from_toml_str("[search]\nmin_query_len = 0\n").unwrap_err();
        assert_eq!(err.code(), "QF-1001");
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = FunnelConfig::from_toml_str("= nope").unwrap_err();
        assert_eq!(err.code(), "QF-1002");
    }

    #[test]
    fn load_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = FunnelConfig::load(&dir.path().join("absent.toml")).expect("load");
        assert_eq!(config, FunnelConfig::default());
    }

    #[test]
    fn load_reads_file_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("funnel.toml");
        std::fs::write(&path, "[flags]\nscholarship = true\n").expect("write config");
        let config = FunnelConfig::load(&path).expect("load");
        assert!(config.flags.scholarship);
    }
}
