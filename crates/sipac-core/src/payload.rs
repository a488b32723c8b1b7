//! Cargas estructuradas que el motor entrega a sus colaboradores.

use serde::Serialize;
use uuid::Uuid;

use crate::analysis::AssetAnalysis;

/// Contexto de un paso listo para renderizar o para construir el prompt de
/// un agente. `current_answers` refleja el conjunto de respuestas en orden
/// de inserción; `last_error` lleva el motivo del rechazo anterior, si lo
/// hubo, para que la fuente pueda autocorregirse.
#[derive(Debug, Clone, Serialize)]
pub struct StepPayload {
    pub step_index: usize,
    pub total_steps: usize,
    pub step_key: String,
    pub title: String,
    pub description: String,
    pub examples: String,
    pub prompt: String,
    pub current_answers: serde_json::Value,
    pub last_error: Option<String>,
}

/// Registro final autocontenido: inputs en orden de recolección + análisis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalReport {
    pub session_id: Uuid,
    pub definition_hash: String,
    pub inputs: serde_json::Value,
    pub analisis: AssetAnalysis,
}

/// Detalle de una sesión terminada por agotamiento de reintentos. Nombra el
/// paso y el último motivo para permitir el diagnóstico de reanudación.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureDetail {
    pub error: String,
    pub step_key: String,
    pub step_index: usize,
    pub last_error: String,
    pub retry_count: u32,
}

/// Desenlace terminal de una sesión. La interrupción externa no llega aquí:
/// se propaga como error sin emitir desenlace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SessionOutcome {
    Completed(FinalReport),
    Failed(FailureDetail),
}

impl SessionOutcome {
    pub fn success(&self) -> bool {
        matches!(self, SessionOutcome::Completed(_))
    }
}
