//! Sinks de presentación: renderizado humano y mensajes estructurados.

use std::io::{self, Write};

use serde_json::json;
use sipac_core::{PresentationSink, SessionOutcome, StepPayload};

const SEPARATOR: &str =
    "======================================================================";

/// Renderizado de consola para un operador humano: banner por paso con
/// contexto, ejemplos y prompt, y volcado JSON legible del desenlace.
pub struct ConsoleSink<W: Write> {
    out: W,
}

impl ConsoleSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> PresentationSink for ConsoleSink<W> {
    fn show_step(&mut self, payload: &StepPayload) {
        let _ = writeln!(self.out, "\n{SEPARATOR}");
        if let Some(error) = &payload.last_error {
            let _ = writeln!(self.out, " [!] ERROR PREVIO: {error}");
        }
        let _ = writeln!(
            self.out,
            " PASO {} de {}: {}",
            payload.step_index + 1,
            payload.total_steps,
            payload.title
        );
        let _ = writeln!(self.out, "{SEPARATOR}");
        let _ = writeln!(self.out, "\n<<<< CONTEXTO >>>>");
        let _ = writeln!(self.out, "{}", payload.description);
        let _ = writeln!(self.out, "\n<<<< EJEMPLOS >>>>");
        let _ = writeln!(self.out, "{}", payload.examples);
        let _ = writeln!(self.out, "\n<<<< PROMPT >>>>");
        let _ = writeln!(self.out, "{}:", payload.prompt);
        let _ = self.out.flush();
    }

    fn show_outcome(&mut self, outcome: &SessionOutcome) {
        let _ = writeln!(self.out, "\n{SEPARATOR}");
        match outcome {
            SessionOutcome::Completed(report) => {
                let _ = writeln!(self.out, " RECOLECCIÓN COMPLETADA - GENERANDO RESULTADOS");
                let _ = writeln!(self.out, "{SEPARATOR}\n");
                let _ = writeln!(
                    self.out,
                    "{}",
                    serde_json::to_string_pretty(report).unwrap_or_default()
                );
            }
            SessionOutcome::Failed(detail) => {
                let _ = writeln!(self.out, " PROCESO TERMINADO CON ERRORES");
                let _ = writeln!(self.out, "{SEPARATOR}\n");
                let _ = writeln!(
                    self.out,
                    "{}",
                    serde_json::to_string_pretty(detail).unwrap_or_default()
                );
            }
        }
        let _ = self.out.flush();
    }
}

/// Salida estructurada para agentes: un objeto JSON por línea, con `type`
/// discriminando paso y resultado.
pub struct JsonLineSink<W: Write> {
    out: W,
}

impl JsonLineSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> JsonLineSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> PresentationSink for JsonLineSink<W> {
    fn show_step(&mut self, payload: &StepPayload) {
        let mut message = serde_json::to_value(payload).unwrap_or_else(|_| json!({}));
        if let Some(obj) = message.as_object_mut() {
            obj.insert("type".to_string(), json!("step"));
        }
        let _ = writeln!(self.out, "{message}");
        let _ = self.out.flush();
    }

    fn show_outcome(&mut self, outcome: &SessionOutcome) {
        let data = match outcome {
            SessionOutcome::Completed(report) => serde_json::to_value(report),
            SessionOutcome::Failed(detail) => serde_json::to_value(detail),
        }
        .unwrap_or_else(|_| json!({}));
        let message = json!({
            "type": "result",
            "success": outcome.success(),
            "data": data,
        });
        let _ = writeln!(self.out, "{message}");
        let _ = self.out.flush();
    }
}

/// Sink de pruebas: retiene los payloads para inspección posterior.
#[derive(Debug, Default)]
pub struct RecordingSink {
    steps: Vec<StepPayload>,
    outcomes: Vec<SessionOutcome>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn steps(&self) -> &[StepPayload] {
        &self.steps
    }

    pub fn outcomes(&self) -> &[SessionOutcome] {
        &self.outcomes
    }
}

impl PresentationSink for RecordingSink {
    fn show_step(&mut self, payload: &StepPayload) {
        self.steps.push(payload.clone());
    }

    fn show_outcome(&mut self, outcome: &SessionOutcome) {
        self.outcomes.push(outcome.clone());
    }
}
