//! Background tasks module
//! 
//! This module contains background tasks that run alongside the HTTP server.

pub mod wall_clock;

// Re-export main functions
pub use wall_clock::wall_clock_task;
