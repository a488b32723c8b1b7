//! Máquina de control de la sesión de recolección.
//!
//! Responsable de recorrer los pasos en orden, pedir cada respuesta a la
//! fuente, invocar la validación y decidir entre avanzar, reintentar o
//! terminar en fallo. Un solo hilo lógico: cada paso se resuelve por completo
//! antes de pasar al siguiente, y la única operación que puede bloquear es la
//! llamada a la fuente de respuestas.

use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use sipac_domain::{AnswerSet, Catalogs};

use crate::analysis::analyze_assets;
use crate::constants::MAX_RETRIES;
use crate::errors::CoreError;
use crate::event::{EventStore, InMemoryEventStore, SessionEvent, SessionEventKind};
use crate::payload::{FailureDetail, FinalReport, SessionOutcome, StepPayload};
use crate::ports::{AnswerSource, PresentationSink, SourceError};
use crate::step::FlowDefinition;

/// Estado de control de la sesión.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Pidiendo la respuesta del paso a la fuente.
    Requesting { step: usize },
    /// Respuesta cruda obtenida, pendiente de validar.
    Validating { step: usize, raw: String },
    /// Respuesta aceptada y registrada; el cursor avanza.
    Advancing { step: usize },
    /// Rechazo registrado; el motivo se arrastra al siguiente intento.
    WaitingRetry { step: usize, reason: String },
    /// Terminal: presupuesto de reintentos agotado en `step`.
    Failed { step: usize, reason: String },
    /// Terminal: todos los pasos aceptados y análisis emitido.
    Completed,
}

/// Contabilidad de reintentos del paso en curso.
///
/// Invariantes: `retry_count` vuelve a 0 cada vez que `current_step` avanza;
/// se incrementa exactamente en 1 por intento rechazado en el mismo paso.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryState {
    pub current_step: usize,
    pub retry_count: u32,
    pub last_error: Option<String>,
}

impl RetryState {
    fn start() -> Self {
        Self {
            current_step: 0,
            retry_count: 0,
            last_error: None,
        }
    }
}

/// Resultado de una transición del motor.
#[derive(Debug, Clone)]
pub enum Progress {
    Continue,
    Finished(SessionOutcome),
}

/// Motor de la sesión. Posee en exclusiva el conjunto de respuestas y la
/// contabilidad de reintentos; los catálogos llegan inyectados y son de solo
/// lectura. Ejecuciones concurrentes independientes usan instancias
/// independientes.
pub struct SessionEngine<E: EventStore> {
    session_id: Uuid,
    flow: FlowDefinition,
    catalogs: Catalogs,
    event_store: E,
    answers: AnswerSet,
    state: SessionState,
    retry: RetryState,
    initialized: bool,
}

impl SessionEngine<InMemoryEventStore> {
    /// Crea un motor con el almacén de eventos en memoria.
    pub fn new(flow: FlowDefinition, catalogs: Catalogs) -> Self {
        Self::new_with_store(flow, catalogs, InMemoryEventStore::default())
    }
}

impl<E: EventStore> SessionEngine<E> {
    pub fn new_with_store(flow: FlowDefinition, catalogs: Catalogs, event_store: E) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            flow,
            catalogs,
            event_store,
            answers: AnswerSet::new(),
            state: SessionState::Requesting { step: 0 },
            retry: RetryState::start(),
            initialized: false,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn retry(&self) -> &RetryState {
        &self.retry
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn definition_hash(&self) -> &str {
        self.flow.definition_hash()
    }

    /// Eventos emitidos hasta el momento (orden de emisión).
    pub fn events(&self) -> Vec<SessionEvent> {
        self.event_store.list(self.session_id)
    }

    /// Ejecuta la sesión completa: itera transiciones hasta un desenlace
    /// terminal y lo entrega al sink. Una desconexión permanente de la fuente
    /// aborta con error, sin desenlace ni escritura parcial.
    pub fn run(
        &mut self,
        source: &mut dyn AnswerSource,
        sink: &mut dyn PresentationSink,
    ) -> Result<SessionOutcome, CoreError> {
        loop {
            match self.next(source, sink)? {
                Progress::Continue => {}
                Progress::Finished(outcome) => {
                    sink.show_outcome(&outcome);
                    return Ok(outcome);
                }
            }
        }
    }

    /// Avanza exactamente una transición de la máquina.
    pub fn next(
        &mut self,
        source: &mut dyn AnswerSource,
        sink: &mut dyn PresentationSink,
    ) -> Result<Progress, CoreError> {
        self.initialize()?;
        let state = self.state.clone();
        match state {
            SessionState::Requesting { step } => self.on_requesting(step, source, sink),
            SessionState::Validating { step, raw } => Ok(self.on_validating(step, &raw)),
            SessionState::Advancing { step } => Ok(self.on_advancing(step)),
            SessionState::WaitingRetry { step, reason } => {
                self.retry.last_error = Some(reason);
                self.state = SessionState::Requesting { step };
                Ok(Progress::Continue)
            }
            SessionState::Failed { .. } | SessionState::Completed => {
                Err(CoreError::SessionFinished)
            }
        }
    }

    fn initialize(&mut self) -> Result<(), CoreError> {
        if self.flow.is_empty() {
            return Err(CoreError::EmptyFlow);
        }
        if !self.initialized {
            self.initialized = true;
            self.event_store.append_kind(
                self.session_id,
                SessionEventKind::SessionInitialized {
                    definition_hash: self.flow.definition_hash().to_string(),
                    step_count: self.flow.len(),
                },
            );
            debug!(session = %self.session_id, steps = self.flow.len(), "sesión inicializada");
        }
        Ok(())
    }

    fn on_requesting(
        &mut self,
        step: usize,
        source: &mut dyn AnswerSource,
        sink: &mut dyn PresentationSink,
    ) -> Result<Progress, CoreError> {
        let step_key = self
            .flow
            .step(step)
            .map(|d| d.key.to_string())
            .ok_or_else(|| CoreError::Internal(format!("índice de paso {step} fuera de rango")))?;
        let payload = self.step_payload(step);

        self.event_store.append_kind(
            self.session_id,
            SessionEventKind::AnswerRequested {
                step_index: step,
                step_key: step_key.clone(),
                attempt: self.retry.retry_count + 1,
            },
        );
        sink.show_step(&payload);

        match source.request_answer(&payload) {
            Ok(raw) => {
                self.state = SessionState::Validating { step, raw };
                Ok(Progress::Continue)
            }
            Err(SourceError::Transient(msg)) => Ok(self.handle_rejection(
                step,
                format!("Fuente de respuestas no disponible: {msg}"),
            )),
            Err(SourceError::Disconnected) => {
                warn!(session = %self.session_id, step = %step_key, "fuente desconectada, abortando");
                self.event_store.append_kind(
                    self.session_id,
                    SessionEventKind::SessionAborted {
                        reason: "desconexión permanente de la fuente de respuestas".to_string(),
                    },
                );
                Err(CoreError::SourceDisconnected)
            }
        }
    }

    fn on_validating(&mut self, step: usize, raw: &str) -> Progress {
        let (rule, key) = match self.flow.step(step) {
            Some(def) => (def.rule, def.key),
            None => {
                return self.handle_rejection(
                    step,
                    format!("Fallo al procesar el dato: paso {step} desconocido"),
                );
            }
        };
        match rule.apply(raw, &self.answers, &self.catalogs) {
            Ok(value) => {
                let value_json = serde_json::to_value(&value).unwrap_or(Value::Null);
                self.answers.register(key, value);
                self.retry.retry_count = 0;
                self.retry.last_error = None;
                self.event_store.append_kind(
                    self.session_id,
                    SessionEventKind::AnswerAccepted {
                        step_index: step,
                        step_key: key.to_string(),
                        value: value_json,
                    },
                );
                debug!(step = key, "respuesta aceptada");
                self.state = SessionState::Advancing { step };
                Progress::Continue
            }
            Err(rejection) => self.handle_rejection(step, rejection.0),
        }
    }

    fn on_advancing(&mut self, step: usize) -> Progress {
        let next = step + 1;
        self.retry = RetryState {
            current_step: next,
            retry_count: 0,
            last_error: None,
        };
        if next == self.flow.len() {
            self.event_store
                .append_kind(self.session_id, SessionEventKind::SessionCompleted);
            self.state = SessionState::Completed;
            debug!(session = %self.session_id, "sesión completada, generando análisis");
            Progress::Finished(SessionOutcome::Completed(self.final_report()))
        } else {
            self.state = SessionState::Requesting { step: next };
            Progress::Continue
        }
    }

    /// Un rechazo de validación y un fallo transitorio de la fuente se tratan
    /// igual: consumen un reintento y pueden agotar el presupuesto.
    fn handle_rejection(&mut self, step: usize, reason: String) -> Progress {
        let step_key = self
            .flow
            .step(step)
            .map(|d| d.key.to_string())
            .unwrap_or_default();
        self.retry.retry_count += 1;
        let retry_count = self.retry.retry_count;
        self.event_store.append_kind(
            self.session_id,
            SessionEventKind::AnswerRejected {
                step_index: step,
                step_key: step_key.clone(),
                reason: reason.clone(),
                retry_count,
            },
        );
        warn!(step = %step_key, retry = retry_count, motivo = %reason, "respuesta rechazada");

        if retry_count > MAX_RETRIES {
            self.event_store.append_kind(
                self.session_id,
                SessionEventKind::RetryBudgetExhausted {
                    step_index: step,
                    step_key: step_key.clone(),
                    last_reason: reason.clone(),
                    attempts: retry_count,
                },
            );
            self.state = SessionState::Failed {
                step,
                reason: reason.clone(),
            };
            Progress::Finished(SessionOutcome::Failed(FailureDetail {
                error: "MAX_RETRIES_EXCEEDED".to_string(),
                step_key,
                step_index: step,
                last_error: reason,
                retry_count,
            }))
        } else {
            self.state = SessionState::WaitingRetry { step, reason };
            Progress::Continue
        }
    }

    fn step_payload(&self, index: usize) -> StepPayload {
        let def = &self.flow.steps()[index];
        StepPayload {
            step_index: index,
            total_steps: self.flow.len(),
            step_key: def.key.to_string(),
            title: def.title.to_string(),
            description: def
                .documentation
                .resolve(&self.answers, &self.catalogs)
                .trim()
                .to_string(),
            examples: def.examples.to_string(),
            prompt: def.prompt.resolve(&self.answers, &self.catalogs),
            current_answers: serde_json::to_value(&self.answers).unwrap_or(Value::Null),
            last_error: self.retry.last_error.clone(),
        }
    }

    fn final_report(&self) -> FinalReport {
        FinalReport {
            session_id: self.session_id,
            definition_hash: self.flow.definition_hash().to_string(),
            inputs: serde_json::to_value(&self.answers).unwrap_or(Value::Null),
            analisis: analyze_assets(&self.answers, &self.catalogs),
        }
    }
}
