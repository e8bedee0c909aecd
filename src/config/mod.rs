//! Configuration module
//!
//! Tuning knobs for the line server. Nothing is loaded from disk or the
//! environment; the types derive serde so callers can embed them in their own
//! test configuration.

mod settings;

pub use settings::ServerConfig;
