pub mod action;
pub mod config;
pub mod index;
pub mod platform;
pub mod sources;
pub mod usage;

// Exposed for benchmarks - not part of stable API
#[doc(hidden)]
pub mod search;

pub(crate) mod utils;

mod engine;
mod error;

#[cfg(test)]
mod tests;

pub use action::{Action, ActionId, Builtin, Invocation, Runner, SourceKind};
pub use engine::{DisplayState, Launcher, RankedEntry};
pub use error::{Error, Result};
pub use utils::first_word;
