//! Exam Clock - A multi-timer countdown server for supervising timed examinations
//! 
//! This library provides the exam timer set (perusal, planning, working and
//! warning phases, started and reset as a batch) and a standalone countdown,
//! each driven by an owned one-second ticker, behind a small HTTP API.

pub mod config;
pub mod engine;
pub mod error;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
