//! Subject and topic derivation from the catalog snapshot.
//!
//! Subject lists are a pure function of `(catalog category, entries)`: filter
//! by `is_active`, sort by `display_order`. When the catalog returns no
//! active entries for a category, a built-in fallback table takes over. The
//! tables are pinned to [`FALLBACK_SCHEMA_VERSION`] and validated against the
//! deployment config, so they cannot silently diverge from the live schema.

use serde::{Deserialize, Serialize};

/// Catalog schema version the built-in fallback tables are written against.
pub const FALLBACK_SCHEMA_VERSION: &str = "2025-06";

/// Catalog category label for the Advanced Level track.
pub const AL_CATEGORY: &str = "A/L";

/// Catalog category label for the Ordinary Level track.
pub const OL_CATEGORY: &str = "O/L";

/// One subject row as served by the Catalog Provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectEntry {
    /// Stable slug used in resolver requests (e.g. `"mathematics"`).
    pub value: String,
    /// Display name (e.g. `"Mathematics"`).
    pub name: String,
    /// Catalog category this subject belongs to (e.g. `"Grade 6-9"`, `"A/L"`).
    pub category: String,
    /// Inactive subjects are hidden from every chooser.
    pub is_active: bool,
    /// Ascending sort key within the category.
    pub display_order: i32,
}

/// A selectable subject as offered by a chooser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectOption {
    /// Slug used in state and resolver requests.
    pub value: String,
    /// Display name.
    pub name: String,
}

// ──────────────────── grade bands ────────────────────

/// Grade bands the catalog groups subjects under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeBand {
    /// Grades 6–9.
    Grade6To9,
    /// Grades 10–11.
    Grade10To11,
    /// Grades 12–13.
    Grade12To13,
}

impl GradeBand {
    /// Band containing the given numeric grade, if any.
    #[must_use]
    pub const fn for_grade(grade: u8) -> Option<Self> {
        match grade {
            6..=9 => Some(Self::Grade6To9),
            10 | 11 => Some(Self::Grade10To11),
            12 | 13 => Some(Self::Grade12To13),
            _ => None,
        }
    }

    /// Catalog category label for this band.
    #[must_use]
    pub const fn catalog_category(self) -> &'static str {
        match self {
            Self::Grade6To9 => "Grade 6-9",
            Self::Grade10To11 => "Grade 10-11",
            Self::Grade12To13 => "Grade 12-13",
        }
    }

    /// Built-in subject table for this band, used when the catalog has no
    /// active entries. Pinned to [`FALLBACK_SCHEMA_VERSION`].
    #[must_use]
    pub const fn fallback_subjects(self) -> &'static [&'static str] {
        match self {
            Self::Grade6To9 => &[
                "mathematics",
                "science",
                "english",
                "history",
                "geography",
            ],
            Self::Grade10To11 => &[
                "mathematics",
                "science",
                "english",
                "history",
                "commerce",
                "ict",
            ],
            Self::Grade12To13 => &[
                "combined-mathematics",
                "physics",
                "chemistry",
                "biology",
                "economics",
                "ict",
            ],
        }
    }
}

/// Built-in A/L subject table (fallback).
const AL_FALLBACK: &[&str] = &[
    "physics",
    "chemistry",
    "combined-mathematics",
    "biology",
    "economics",
    "ict",
];

/// Built-in O/L subject table (fallback).
const OL_FALLBACK: &[&str] = &[
    "mathematics",
    "science",
    "english",
    "history",
    "commerce",
    "ict",
];

// ──────────────────── derivation ────────────────────

/// Subjects offered for a numeric-grade band.
#[must_use]
pub fn subjects_for_band(entries: &[SubjectEntry], band: GradeBand) -> Vec<SubjectOption> {
    active_subjects(entries, band.catalog_category(), band.fallback_subjects())
}

/// Subjects offered for the Advanced Level track.
#[must_use]
pub fn advanced_level_subjects(entries: &[SubjectEntry]) -> Vec<SubjectOption> {
    active_subjects(entries, AL_CATEGORY, AL_FALLBACK)
}

/// Subjects offered for the Ordinary Level track.
#[must_use]
pub fn ordinary_level_subjects(entries: &[SubjectEntry]) -> Vec<SubjectOption> {
    active_subjects(entries, OL_CATEGORY, OL_FALLBACK)
}

/// Filter by category and `is_active`, sort by `display_order`; fall back to
/// the built-in table when nothing remains.
fn active_subjects(
    entries: &[SubjectEntry],
    category: &str,
    fallback: &'static [&'static str],
) -> Vec<SubjectOption> {
    let mut active: Vec<&SubjectEntry> = entries
        .iter()
        .filter(|e| e.category == category && e.is_active)
        .collect();
    active.sort_by(|a, b| {
        a.display_order
            .cmp(&b.display_order)
            .then_with(|| a.value.cmp(&b.value))
    });

    if active.is_empty() {
        return fallback
            .iter()
            .map(|slug| SubjectOption {
                value: (*slug).to_string(),
                name: humanize(slug),
            })
            .collect();
    }

    active
        .into_iter()
        .map(|e| SubjectOption {
            value: e.value.clone(),
            name: e.name.clone(),
        })
        .collect()
}

/// Title-case a slug for display: `"combined-mathematics"` → `"Combined Mathematics"`.
fn humanize(slug: &str) -> String {
    slug.split('-')
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().collect::<String>() + chars.as_str()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ──────────────────── topics ────────────────────

/// Per-subject topic tables for the lessonwise path.
///
/// Subjects without an entry offer no topic chooser content; the funnel still
/// resolves lessonwise bundles unscoped in that case.
const TOPICS: &[(&str, &[&str])] = &[
    (
        "physics",
        &[
            "waves",
            "mechanics",
            "thermodynamics",
            "optics",
            "electricity",
            "modern-physics",
        ],
    ),
    (
        "chemistry",
        &[
            "atomic-structure",
            "chemical-bonding",
            "energetics",
            "kinetics",
            "organic-chemistry",
            "industrial-chemistry",
        ],
    ),
    (
        "biology",
        &[
            "cell-biology",
            "genetics",
            "plant-physiology",
            "animal-physiology",
            "ecology",
        ],
    ),
    (
        "combined-mathematics",
        &[
            "algebra",
            "calculus",
            "trigonometry",
            "vectors",
            "statics",
            "dynamics",
        ],
    ),
    (
        "mathematics",
        &[
            "numbers",
            "algebra",
            "geometry",
            "trigonometry",
            "statistics",
        ],
    ),
    (
        "economics",
        &["microeconomics", "macroeconomics", "international-trade"],
    ),
    (
        "ict",
        &[
            "information-systems",
            "programming",
            "databases",
            "networking",
        ],
    ),
    (
        "science",
        &["physics-basics", "chemistry-basics", "biology-basics"],
    ),
];

/// Topics offered for a subject on the lessonwise path.
#[must_use]
pub fn topics_for_subject(subject: &str) -> &'static [&'static str] {
    TOPICS
        .iter()
        .find(|(s, _)| *s == subject)
        .map_or(&[], |(_, topics)| topics)
}
