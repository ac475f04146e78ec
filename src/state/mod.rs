//! State management module
//! 
//! Timer data and the pure transitions over it, plus the shared application state.

pub mod app_state;
pub mod exam_set;
pub mod exam_timer;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use exam_set::ExamTimerSet;
pub use exam_timer::{
    ExamConfig, ExamConfigUpdate, ExamId, ExamPhase, ExamTimer, PhaseBanner, DEFAULT_WARNING_SECONDS,
};
pub use timer_state::{SingleTimer, TimerState, Urgency};
