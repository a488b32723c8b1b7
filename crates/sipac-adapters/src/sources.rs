//! Fuentes de respuesta: de dónde sale la entrada cruda de cada paso.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use sipac_core::{AnswerSource, SourceError, StepPayload};

/// Fuente interactiva: lee una línea de la entrada estándar por paso.
/// Compatible tanto con un teclado humano como con un agente conectado por
/// tubería. Fin de entrada (EOF) equivale a desconexión permanente.
pub struct StdinSource;

impl AnswerSource for StdinSource {
    fn request_answer(&mut self, _payload: &StepPayload) -> Result<String, SourceError> {
        let mut out = io::stdout();
        let _ = write!(out, ">> ");
        let _ = out.flush();

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => Err(SourceError::Disconnected),
            Ok(_) => Ok(line.trim_end_matches(['\n', '\r']).to_string()),
            Err(e) => Err(SourceError::Transient(e.to_string())),
        }
    }
}

/// Fuente pregrabada: entrega respuestas en orden desde una cola en memoria.
/// Al agotarse se comporta como una desconexión permanente, lo que permite
/// ensayar tanto sesiones completas como interrupciones.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    answers: VecDeque<String>,
}

impl ScriptedSource {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn push(&mut self, answer: impl Into<String>) {
        self.answers.push_back(answer.into());
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl AnswerSource for ScriptedSource {
    fn request_answer(&mut self, _payload: &StepPayload) -> Result<String, SourceError> {
        self.answers.pop_front().ok_or(SourceError::Disconnected)
    }
}
