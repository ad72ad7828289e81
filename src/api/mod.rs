//! HTTP surface: routes, handlers, wire models, shared state.

pub mod handlers;
pub mod models;
pub mod router;
pub mod state;
