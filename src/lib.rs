//! Chess server: move validation engine, bot opponent, and HTTP API.

pub mod api;
pub mod bot;
pub mod config;
pub mod engine;
pub mod session;
