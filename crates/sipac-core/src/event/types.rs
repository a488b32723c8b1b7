//! Tipos de evento de la sesión y estructura `SessionEvent`.
//!
//! Rol en el flujo:
//! - Cada ejecución del `SessionEngine` emite eventos a un `EventStore`
//!   append-only.
//! - La secuencia completa es el historial de la conversación: qué se pidió,
//!   qué se aceptó, qué se rechazó y cómo terminó la sesión.
//! - El enum `SessionEventKind` define el contrato observable del motor.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionEventKind {
    /// Emisión inicial de una sesión: fija la `definition_hash` y cantidad de
    /// pasos. Invariante: debe ser el primer evento de un `session_id`.
    SessionInitialized {
        definition_hash: String,
        step_count: usize,
    },
    /// Se solicitó una respuesta a la fuente para un paso. `attempt` es
    /// 1-indexado dentro del paso.
    AnswerRequested {
        step_index: usize,
        step_key: String,
        attempt: u32,
    },
    /// El validador del paso aceptó la entrada; `value` es la forma
    /// normalizada registrada en el conjunto de respuestas.
    AnswerAccepted {
        step_index: usize,
        step_key: String,
        value: serde_json::Value,
    },
    /// El validador rechazó la entrada (o la fuente falló de forma
    /// transitoria). Consume un reintento.
    AnswerRejected {
        step_index: usize,
        step_key: String,
        reason: String,
        retry_count: u32,
    },
    /// Se agotó el presupuesto de reintentos del paso. La sesión no continúa.
    RetryBudgetExhausted {
        step_index: usize,
        step_key: String,
        last_reason: String,
        attempts: u32,
    },
    /// Evento de cierre: todos los pasos aceptados y análisis generado.
    SessionCompleted,
    /// Interrupción externa o desconexión permanente de la fuente. No se
    /// produce análisis ni escritura parcial.
    SessionAborted { reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEvent {
    pub seq: u64, // asignado por el EventStore (orden append)
    pub session_id: Uuid,
    pub kind: SessionEventKind,
    pub ts: DateTime<Utc>, // metadato
}
