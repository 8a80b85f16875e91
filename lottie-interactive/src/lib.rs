//! Interactive state machines for Lottie animations.
//!
//! An interactivity definition describes named states (a segment of the animation plus playback
//! rules) and the events that move between them. This crate evaluates such definitions: it keeps
//! the playback clock, blends transitions, evaluates per-state formulas against pointer and user
//! variables, and reports what time (and which morphs) a renderer should display.
//!
//! This crate is renderer-agnostic. A renderer plugs in through [`FrameSink`].

#![forbid(unsafe_code)]

pub mod bezier;
mod diagnostics;
mod dispatch;
mod emitter;
mod error;
mod event;
pub mod expression;
mod interactivity;
mod model;
mod morphing;
mod player;
mod runtime;

#[cfg(feature = "json")]
pub mod json;

pub use bezier::{BezierEasing, CubicBezier, Point};
pub use diagnostics::*;
pub use dispatch::*;
pub use emitter::*;
pub use error::*;
pub use event::*;
pub use interactivity::*;
pub use model::*;
pub use morphing::*;
pub use player::*;
pub use runtime::*;

#[cfg(feature = "json")]
pub use json::is_interactive;

#[cfg(test)]
mod model_tests;

#[cfg(test)]
mod event_tests;


#[cfg(test)]
mod morphing_tests;


#[cfg(test)]
mod interactivity_tests;
