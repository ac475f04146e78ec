//! Utility functions module
//! 
//! Signal handling and display formatting shared by the engines and the API.

pub mod format;
pub mod signals;

// Re-export main functions
pub use format::{format_countdown, format_uptime};
pub use signals::shutdown_signal;
