//! Trip-planning agents.
//!
//! - `specialists`: flight, hotel and sightseeing LLM agents, plus the
//!   summary and reviewer agents that consume their output through state.
//! - `validator`: the custom step that turns the reviewer's verdict into the
//!   final pass/fail message.

pub mod specialists;
pub mod validator;

pub use specialists::*;
pub use validator::{ReviewOutcome, ValidateTripSummary, evaluate_review};
