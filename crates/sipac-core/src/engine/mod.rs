mod core;

pub use core::{Progress, RetryState, SessionEngine, SessionState};
