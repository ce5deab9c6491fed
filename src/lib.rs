#![forbid(unsafe_code)]

//! Quiz Funnel — selection state machine for an exam-practice platform.
//!
//! The funnel walks a student from "which exam am I preparing for" to a
//! launched quiz, one axis per screen: category or grade, medium, subject,
//! paper type, then term or topic where the path calls for one. Three ideas
//! organize the crate:
//!
//! 1. **Derived screens** — the active screen is computed from the selection
//!    axes, never stored, so state and presentation cannot disagree.
//! 2. **Pure update** — every transition runs through one reducer that
//!    returns commands; all I/O happens in the session driver.
//! 3. **Degrading boundaries** — catalog, resolver, and progress tracker sit
//!    behind traits, and every boundary failure degrades instead of
//!    blocking the funnel.
//!
//! # Library usage
//!
//! Use the [`prelude`] for convenient access to the most common types:
//!
//! ```rust,no_run
//! use quiz_funnel::prelude::*;
//! ```
//!
//! Individual modules can also be imported directly:
//!
//! ```rust,no_run
//! use quiz_funnel::core::config::FunnelConfig;
//! use quiz_funnel::funnel::update::{FunnelMsg, update};
//! ```

pub mod prelude;

pub mod catalog;
pub mod core;
pub mod funnel;
pub mod logger;
pub mod progress;
pub mod resolver;
pub mod session;
