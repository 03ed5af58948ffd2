//! statig state machines for the demo panels that have more than two states.

pub mod generation_sm;
pub mod high_five_sm;
pub mod loading_sm;
