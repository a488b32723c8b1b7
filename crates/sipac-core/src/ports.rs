//! Puertos hacia los colaboradores externos del motor.
//!
//! La fuente de respuestas (humano en terminal o agente automático) y el
//! destino de presentación son opacos para el core: reciben datos
//! estructurados y devuelven texto crudo. Las implementaciones concretas
//! viven en `sipac-adapters`.

use crate::payload::{SessionOutcome, StepPayload};

/// Fallo al obtener una respuesta de la fuente.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Fallo transitorio: cuenta como un rechazo y consume un reintento.
    Transient(String),
    /// Desconexión permanente o interrupción externa: aborta la sesión de
    /// inmediato, sin consumir el presupuesto de reintentos.
    Disconnected,
}

/// Colaborador que entrega la respuesta cruda de cada paso. La llamada puede
/// bloquear (espera de un humano o de un agente externo); el motor se
/// suspende ahí y reanuda de forma síncrona.
pub trait AnswerSource {
    fn request_answer(&mut self, payload: &StepPayload) -> Result<String, SourceError>;
}

/// Colaborador que presenta cada paso y el desenlace final. Recibe datos
/// estructurados, nunca texto preformateado, de modo que tanto un renderer
/// humano como uno de máquina puedan consumirlos.
pub trait PresentationSink {
    fn show_step(&mut self, payload: &StepPayload);
    fn show_outcome(&mut self, outcome: &SessionOutcome);
}
