//! The selection funnel: model, option derivation, update, and handoff.
//!
//! The funnel follows a strict model/update split: [`model`] holds the
//! selection axes and derives the active screen, [`options`] derives what
//! each chooser offers, [`update`] applies messages and emits commands, and
//! [`handoff`] shapes the terminal context for the quiz-taking flow.

pub mod handoff;
pub mod model;
pub mod options;
pub mod update;

#[cfg(test)]
mod test_properties;
