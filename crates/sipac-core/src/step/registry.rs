//! Definición inmutable del flujo: lista ordenada de pasos más su hash
//! canónico. El hash identifica la versión del flujo en el informe final y
//! en el evento de inicialización.

use serde_json::json;

use super::StepDefinition;
use crate::hashing::{hash_str, to_canonical_json};

pub struct FlowDefinition {
    steps: Vec<StepDefinition>,
    definition_hash: String,
}

impl FlowDefinition {
    pub fn new(steps: Vec<StepDefinition>, definition_hash: String) -> Self {
        Self {
            steps,
            definition_hash,
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, index: usize) -> Option<&StepDefinition> {
        self.steps.get(index)
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    pub fn definition_hash(&self) -> &str {
        &self.definition_hash
    }
}

/// Construye la definición extrayendo las claves de los pasos en orden; el
/// hash cubre las claves y la versión del motor.
pub fn build_flow_definition(steps: Vec<StepDefinition>) -> FlowDefinition {
    let keys: Vec<&str> = steps.iter().map(|s| s.key).collect();
    let canonical = to_canonical_json(&json!({
        "engine_version": crate::constants::ENGINE_VERSION,
        "step_keys": keys,
    }));
    let definition_hash = hash_str(&canonical);
    FlowDefinition::new(steps, definition_hash)
}
