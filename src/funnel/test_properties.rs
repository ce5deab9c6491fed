//! Property-based tests for funnel reducer invariants.
//!
//! Uses `proptest` to drive arbitrary legal walks through the funnel and
//! check the structural invariants: term/topic exclusivity, scholarship
//! axis absence, offered-set legality of every stored paper type, and
//! back-navigation restoring the exact prior selection.

use proptest::prelude::*;

use super::model::{Category, FunnelModel, PaperType, Screen, SelectionState};
use super::options;
use super::update::{FunnelCmd, FunnelMsg, GradeAxis, ResolvedBundles, update};
use crate::catalog::flags::FeatureFlags;

// ──────────────────── strategies ────────────────────

/// Which entry the episode commits to; walks never mix paths, since a
/// category choice deliberately clears axes the grade path owns.
#[derive(Debug, Clone, Copy)]
enum Path {
    Category(Category),
    Grade(&'static str),
}

#[derive(Debug, Clone, Copy)]
enum Step {
    /// Take a legal forward choice, selected by the seed.
    Forward(u8),
    /// Reverse one step.
    Back,
}

fn arb_path() -> impl Strategy<Value = Path> {
    prop_oneof![
        Just(Path::Category(Category::Scholarship)),
        Just(Path::Category(Category::AdvancedLevel)),
        Just(Path::Category(Category::OrdinaryLevel)),
        Just(Path::Grade("grade-5")),
        Just(Path::Grade("grade-8")),
        Just(Path::Grade("grade-13")),
    ]
}

fn arb_steps() -> impl Strategy<Value = Vec<Step>> {
    prop::collection::vec(
        prop_oneof![
            3 => any::<u8>().prop_map(Step::Forward),
            1 => Just(Step::Back),
        ],
        0..40,
    )
}

// ──────────────────── walk driver ────────────────────

/// Apply one forward choice that is legal on the current screen. Responses
/// to issued requests are delivered immediately and successfully, so the
/// walk exercises the navigation skeleton rather than failure handling.
fn forward(model: &mut FunnelModel, flags: &FeatureFlags, path: Path, seed: u8) {
    let msg = match model.screen() {
        Screen::Entry => match path {
            Path::Category(category) => FunnelMsg::ChooseCategory(category),
            Path::Grade(grade) => {
                if model.selection.grade.is_none() {
                    FunnelMsg::GradeAxis(GradeAxis::Grade(grade.to_string()))
                } else if model.selection.medium.is_none() {
                    FunnelMsg::GradeAxis(GradeAxis::Medium("english".to_string()))
                } else if model.selection.subject.is_none() {
                    FunnelMsg::GradeAxis(GradeAxis::Subject("mathematics".to_string()))
                } else {
                    FunnelMsg::Go
                }
            }
        },
        Screen::Language => FunnelMsg::ChooseLanguage(
            if seed % 2 == 0 { "english" } else { "sinhala" }.to_string(),
        ),
        Screen::Subject => FunnelMsg::ChooseSubject(
            if seed % 2 == 0 { "physics" } else { "chemistry" }.to_string(),
        ),
        Screen::PaperType => {
            let offered: Vec<PaperType> = options::paper_type_options(&model.selection)
                .into_iter()
                .filter(|p| *p != PaperType::QuickQuiz)
                .collect();
            FunnelMsg::ChoosePaperType(offered[usize::from(seed) % offered.len()])
        }
        Screen::Term => {
            let terms = options::term_options();
            FunnelMsg::ChooseTerm(terms[usize::from(seed) % terms.len()].to_string())
        }
        Screen::Topic => {
            let topics = options::topic_options(&model.selection);
            FunnelMsg::ChooseTopic(topics[usize::from(seed) % topics.len()].to_string())
        }
        Screen::Bundles => return,
    };

    match update(model, flags, msg) {
        FunnelCmd::None => {}
        FunnelCmd::Discover { token, .. } => {
            update(
                model,
                flags,
                FunnelMsg::DiscoveryComplete {
                    token,
                    outcome: Ok(()),
                },
            );
        }
        FunnelCmd::Resolve { token, .. } => {
            update(
                model,
                flags,
                FunnelMsg::BundlesResolved {
                    token,
                    outcome: Ok(ResolvedBundles {
                        bundles: Vec::new(),
                        incomplete: Vec::new(),
                    }),
                },
            );
        }
        cmd => panic!("walk issued an unexpected command: {cmd:?}"),
    }
}

fn check_invariants(model: &FunnelModel) {
    let s = &model.selection;
    assert!(
        s.term.is_none() || s.topic.is_none(),
        "term and topic simultaneously set: {s:?}"
    );
    if s.category == Some(Category::Scholarship) {
        assert!(s.subject.is_none(), "scholarship grew a subject axis");
        assert!(s.language.is_none(), "scholarship grew a language axis");
    }
    if let Some(paper) = s.paper_type {
        assert!(
            options::paper_type_is_legal(s, paper),
            "stored paper type {paper:?} is not offered for {s:?}"
        );
    }
}

// ──────────────────── properties ────────────────────

proptest! {
    /// Any legal walk keeps the structural invariants at every step, and
    /// every back-step restores the exact selection the forward step saw.
    #[test]
    fn walks_hold_invariants_and_back_is_an_inverse(
        path in arb_path(),
        steps in arb_steps(),
    ) {
        let flags = FeatureFlags::all_enabled();
        let mut model = FunnelModel::new();
        // Selection snapshots taken before each screen-changing step.
        let mut trail: Vec<SelectionState> = Vec::new();

        for step in steps {
            match step {
                Step::Forward(seed) => {
                    let before_screen = model.screen();
                    let before = model.selection.clone();
                    forward(&mut model, &flags, path, seed);
                    if model.screen() != before_screen {
                        trail.push(before);
                    }
                }
                Step::Back => {
                    let at_entry = model.screen() == Screen::Entry;
                    let before = model.selection.clone();
                    update(&mut model, &flags, FunnelMsg::Back);
                    if at_entry {
                        prop_assert_eq!(&model.selection, &before, "back at entry must be inert");
                    } else {
                        let expected = trail.pop().expect("non-entry screen implies a trail");
                        prop_assert_eq!(&model.selection, &expected);
                    }
                }
            }
            check_invariants(&model);
            prop_assert!(model.pending.is_none(), "walks never leave a request in flight");
        }
    }

    /// The wire request derived from any reachable terminal selection is
    /// well-formed: slugs populated, term only on the in-band grade path.
    #[test]
    fn reachable_requests_are_well_formed(
        path in arb_path(),
        seeds in prop::collection::vec(any::<u8>(), 12),
    ) {
        let flags = FeatureFlags::all_enabled();
        let mut model = FunnelModel::new();
        for seed in seeds {
            forward(&mut model, &flags, path, seed);
        }
        if let Some(request) = model.last_request.clone() {
            prop_assert!(!request.grade.is_empty());
            prop_assert!(!request.subject.is_empty());
            prop_assert!(PaperType::from_slug(&request.paper_type).is_some());
            if request.term.is_some() {
                prop_assert!(Category::from_slug(&request.grade).is_none());
            }
            if request.grade == "scholarship" {
                prop_assert_eq!(request.medium, None);
            }
        }
    }

    /// Walking all the way back always lands on the entry chooser with a
    /// default selection, whatever happened in between.
    #[test]
    fn exhaustive_back_returns_to_a_clean_entry(
        path in arb_path(),
        seeds in prop::collection::vec(any::<u8>(), 0..12),
    ) {
        let flags = FeatureFlags::all_enabled();
        let mut model = FunnelModel::new();
        for seed in seeds {
            forward(&mut model, &flags, path, seed);
        }
        while model.screen() != Screen::Entry {
            update(&mut model, &flags, FunnelMsg::Back);
        }
        // Grade axes legitimately survive at the entry chooser.
        prop_assert_eq!(model.selection.category, None);
        prop_assert_eq!(model.selection.paper_type, None);
        prop_assert_eq!(&model.selection.term, &None);
        prop_assert_eq!(&model.selection.topic, &None);
        prop_assert!(model.bundles.is_empty());
    }
}
