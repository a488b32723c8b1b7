//! Errores específicos del core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum CoreError {
    #[error("session already finished")]
    SessionFinished,
    #[error("answer source disconnected")]
    SourceDisconnected,
    #[error("empty flow definition")]
    EmptyFlow,
    #[error("internal: {0}")]
    Internal(String),
}
