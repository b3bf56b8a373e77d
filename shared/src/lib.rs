//! Shared library for the Gy image bot
//!
//! Holds the pieces every part of the bot agrees on: environment
//! configuration and the common error type.

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::BotConfig;
pub use error::{AppError, Result};
