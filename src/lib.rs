//! Weekly chore rotation.
//!
//! A [`RotationState`] holds who is in the household, which chores exist and
//! how far the rotation has progressed. Each call to
//! [`RotationState::assign_week`] hands out one chore per person, seeded so
//! the same settings always produce the same weeks. Any past or future week
//! can be rebuilt with [`RotationState::jump_to`], and the whole rotation
//! round-trips through a short text format (see [`parser`] and
//! [`RotationState::export_text`]).

pub mod display;
pub mod error;
pub mod parser;
pub mod rotation;
pub mod store;
pub mod web;

pub use error::RotaError;
pub use rotation::{Assignment, ChoreStatus, RotationState};
