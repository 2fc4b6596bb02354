// Interview wizard
// Step state, pure transitions, the in-process session registry and its HTTP handlers.

pub mod handlers;
pub mod sessions;
pub mod steps;
