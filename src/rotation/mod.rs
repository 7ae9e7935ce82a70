pub mod types;
pub mod random;
pub mod roster;
pub mod engine;
pub mod navigator;

pub use types::{Assignment, ChoreStatus, RotationState, SHARED_SUFFIX};
pub use random::{seeded_random, shuffle};
pub use navigator::{date_to_position, default_start_date, normalize_position};
