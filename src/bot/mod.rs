//! Bot opponent: move selection strategies per difficulty tier.

pub mod eval;
pub mod selector;

pub use selector::{selector_for, BotSelector, MinimaxBot, RandomBot};
