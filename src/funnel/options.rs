//! Option derivation: which choices each chooser offers.
//!
//! Derivation is the structural defense against illegal transitions — a
//! paper type that would be rejected is simply never offered. The update
//! function treats an out-of-set choice as a derivation bug.

use crate::catalog::subjects::{
    self, GradeBand, SubjectEntry, SubjectOption,
};
use crate::funnel::model::{Category, PaperType, SelectionState};

/// The fixed term list for the grade path.
pub const TERMS: &[&str] = &["1st-term", "2nd-term", "3rd-term"];

/// Every paper type, in display order.
const ALL_PAPER_TYPES: &[PaperType] = &[
    PaperType::PastPapers,
    PaperType::ModelPapers,
    PaperType::SchoolPapers,
    PaperType::Lessonwise,
    PaperType::QuickQuiz,
];

/// Paper types offered for the current axes.
///
/// Exhaustive over the category variant:
/// - Scholarship: past and model papers only.
/// - A/L–O/L: everything, with lessonwise present iff a subject is set.
/// - Grade path: model/school papers exactly when the numeric grade is in
///   6–13, the full set otherwise.
#[must_use]
pub fn paper_type_options(selection: &SelectionState) -> Vec<PaperType> {
    match selection.category {
        Some(Category::Scholarship) => vec![PaperType::PastPapers, PaperType::ModelPapers],
        Some(Category::AdvancedLevel | Category::OrdinaryLevel) => ALL_PAPER_TYPES
            .iter()
            .copied()
            .filter(|p| *p != PaperType::Lessonwise || selection.subject.is_some())
            .collect(),
        None => {
            if selection.in_term_band() {
                vec![PaperType::ModelPapers, PaperType::SchoolPapers]
            } else {
                ALL_PAPER_TYPES.to_vec()
            }
        }
    }
}

/// Whether choosing `paper` is legal for the current axes.
#[must_use]
pub fn paper_type_is_legal(selection: &SelectionState, paper: PaperType) -> bool {
    paper_type_options(selection).contains(&paper)
}

/// Terms offered on the term chooser.
#[must_use]
pub const fn term_options() -> &'static [&'static str] {
    TERMS
}

/// Whether `term` is one of the offered terms.
#[must_use]
pub fn term_is_legal(term: &str) -> bool {
    TERMS.contains(&term)
}

/// Subjects offered for the current axes.
///
/// Grade path: the band's catalog category with built-in fallback.
/// A/L–O/L: the track's catalog category with built-in fallback.
/// Scholarship: no subject axis, nothing offered.
#[must_use]
pub fn subject_options(entries: &[SubjectEntry], selection: &SelectionState) -> Vec<SubjectOption> {
    match selection.category {
        Some(Category::Scholarship) => Vec::new(),
        Some(Category::AdvancedLevel) => subjects::advanced_level_subjects(entries),
        Some(Category::OrdinaryLevel) => subjects::ordinary_level_subjects(entries),
        None => selection
            .grade_number()
            .and_then(GradeBand::for_grade)
            .map_or_else(Vec::new, |band| subjects::subjects_for_band(entries, band)),
    }
}

/// Topics offered on the topic chooser for the selected subject.
#[must_use]
pub fn topic_options(selection: &SelectionState) -> &'static [&'static str] {
    selection
        .subject
        .as_deref()
        .map_or(&[], subjects::topics_for_subject)
}
