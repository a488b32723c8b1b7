use sipac_domain::{AnswerSet, AnswerValue, Catalogs};

use crate::validate::{self, Rejection};

/// Texto de un paso: fijo, o generado a partir de las respuestas ya
/// recolectadas (permite listar datos previos dentro de la documentación).
#[derive(Debug, Clone, Copy)]
pub enum StepText {
    Static(&'static str),
    Dynamic(fn(&AnswerSet, &Catalogs) -> String),
}

impl StepText {
    pub fn resolve(&self, answers: &AnswerSet, catalogs: &Catalogs) -> String {
        match self {
            StepText::Static(text) => (*text).to_string(),
            StepText::Dynamic(f) => f(answers, catalogs),
        }
    }
}

/// Regla de validación de un paso. Las reglas cruzadas nombran la clave de la
/// respuesta previa contra la que se comparan; todas se resuelven con la
/// firma uniforme `(crudo, respuestas) -> Result`, ignorando las respuestas
/// cuando no las necesitan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationRule {
    /// Texto con longitud mínima tras recorte.
    Text { min_len: usize },
    /// Lista separada por comas o saltos de línea, con mínimo de elementos.
    DelimitedList { min_items: usize },
    /// Lista de códigos numéricos pertenecientes al catálogo GIA.
    GiaCodes,
    /// Lista cuyo recuento debe igualar el de una lista previa.
    CrossCountItems { source_key: &'static str },
    /// Como `CrossCountItems`, con cada token numérico acotado.
    CrossCountScores {
        source_key: &'static str,
        min: u8,
        max: u8,
    },
    /// Lista de etiquetas CI validadas contra el GIA alineado por índice.
    CrossCountCi { source_key: &'static str },
    /// Lote JSON de activos intangibles (despliegue en cuatro listas al
    /// aceptarse).
    AssetBatch,
}

impl ValidationRule {
    /// Aplica la regla. Puro: nunca muta `answers`; todo detalle de rechazo
    /// vuelve como dato.
    pub fn apply(
        &self,
        raw: &str,
        answers: &AnswerSet,
        catalogs: &Catalogs,
    ) -> Result<AnswerValue, Rejection> {
        match self {
            ValidationRule::Text { min_len } => {
                validate::validate_text(raw, *min_len).map(AnswerValue::Text)
            }
            ValidationRule::DelimitedList { min_items } => {
                validate::validate_delimited_list(raw, *min_items).map(AnswerValue::Items)
            }
            ValidationRule::GiaCodes => {
                validate::validate_gia_codes(raw, &catalogs.gia).map(AnswerValue::Codes)
            }
            ValidationRule::CrossCountItems { source_key } => {
                let expected = prior_len(answers, source_key)?;
                validate::validate_cross_items(raw, expected).map(AnswerValue::Items)
            }
            ValidationRule::CrossCountScores {
                source_key,
                min,
                max,
            } => {
                let expected = prior_len(answers, source_key)?;
                validate::validate_cross_scores(raw, expected, *min, *max).map(AnswerValue::Codes)
            }
            ValidationRule::CrossCountCi { source_key } => {
                let gias = answers
                    .codes(source_key)
                    .ok_or_else(|| missing_prior(source_key))?;
                validate::validate_cross_ci(raw, gias, catalogs).map(AnswerValue::Items)
            }
            ValidationRule::AssetBatch => {
                validate::validate_asset_batch(raw, catalogs).map(AnswerValue::Assets)
            }
        }
    }
}

fn prior_len(answers: &AnswerSet, key: &str) -> Result<usize, Rejection> {
    answers
        .codes(key)
        .map(|v| v.len())
        .or_else(|| answers.items(key).map(|v| v.len()))
        .ok_or_else(|| missing_prior(key))
}

fn missing_prior(key: &str) -> Rejection {
    // Superficie de fallo uniforme: un fallo interno de procesamiento se
    // reporta como rechazo, nunca como pánico.
    Rejection(format!(
        "Fallo al procesar el dato: respuesta previa '{key}' no disponible"
    ))
}

/// Definición estática de un paso de recolección. Se crea al inicio del
/// proceso y no se muta después.
#[derive(Debug, Clone)]
pub struct StepDefinition {
    pub key: &'static str,
    pub title: &'static str,
    pub documentation: StepText,
    pub prompt: StepText,
    pub examples: &'static str,
    pub rule: ValidationRule,
}
