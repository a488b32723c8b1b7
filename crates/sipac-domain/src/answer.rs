//! Conjunto de respuestas normalizadas del proceso de recolección.
//!
//! Invariantes:
//! - Una clave existe solo después de que el validador de su paso aceptó la
//!   entrada; el orden de inserción sigue el orden de los pasos.
//! - Las cuatro listas derivadas de un lote de activos comparten longitud y
//!   están alineadas por índice.

use indexmap::IndexMap;
use serde::Serialize;

use crate::asset::AssetRecord;

/// Claves bajo las que se despliega un lote de activos aceptado.
pub const KEY_TIPO_GENERICO: &str = "tipo_generico";
pub const KEY_ACTIVO_ESPECIFICO: &str = "activo_especifico";
pub const KEY_IMPORTANCIA: &str = "importancia_activo";
pub const KEY_TIPO_CI: &str = "tipo_CI_Intellectus";

/// Valor normalizado producido por un validador.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    Items(Vec<String>),
    Codes(Vec<u8>),
    /// Lote de activos; al registrarse se despliega en cuatro listas paralelas
    /// y nunca se almacena como tal.
    Assets(Vec<AssetRecord>),
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AnswerSet {
    #[serde(flatten)]
    values: IndexMap<String, AnswerValue>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un valor aceptado. Un `Assets` se despliega en las cuatro
    /// listas paralelas alineadas por índice; cualquier otro valor se guarda
    /// bajo la clave del paso (sobrescribiendo pasadas previas por el mismo
    /// paso).
    pub fn register(&mut self, key: &str, value: AnswerValue) {
        match value {
            AnswerValue::Assets(records) => {
                let mut gias = Vec::with_capacity(records.len());
                let mut especificos = Vec::with_capacity(records.len());
                let mut importancias = Vec::with_capacity(records.len());
                let mut tipos_ci = Vec::with_capacity(records.len());
                for r in records {
                    gias.push(r.tipo_generico());
                    especificos.push(r.activo_especifico().to_string());
                    importancias.push(r.importancia());
                    tipos_ci.push(r.tipo_ci().to_string());
                }
                self.values
                    .insert(KEY_TIPO_GENERICO.to_string(), AnswerValue::Codes(gias));
                self.values.insert(
                    KEY_ACTIVO_ESPECIFICO.to_string(),
                    AnswerValue::Items(especificos),
                );
                self.values
                    .insert(KEY_IMPORTANCIA.to_string(), AnswerValue::Codes(importancias));
                self.values
                    .insert(KEY_TIPO_CI.to_string(), AnswerValue::Items(tipos_ci));
            }
            other => {
                self.values.insert(key.to_string(), other);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&AnswerValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(AnswerValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn items(&self, key: &str) -> Option<&[String]> {
        match self.values.get(key) {
            Some(AnswerValue::Items(v)) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn codes(&self, key: &str) -> Option<&[u8]> {
        match self.values.get(key) {
            Some(AnswerValue::Codes(v)) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
