pub mod base;
pub mod random;

pub use base::{DecisionPolicy, build_candidates};
pub use random::{RandomPolicy, SAVE_PROBABILITY};
