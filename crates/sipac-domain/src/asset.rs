use serde::{Deserialize, Serialize};

use crate::catalog::Catalogs;
use crate::DomainError;
use std::fmt;

/// Activo intangible identificado durante la recolección.
///
/// Solo puede construirse a través de [`AssetRecord::new`], que valida cada
/// campo contra los catálogos y restaura la forma canónica de la etiqueta CI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    tipo_generico: u8,
    activo_especifico: String,
    importancia: u8,
    tipo_ci: String,
}

impl AssetRecord {
    pub fn new(
        catalogs: &Catalogs,
        tipo_generico: u8,
        activo_especifico: &str,
        importancia: u8,
        tipo_ci: &str,
    ) -> Result<Self, DomainError> {
        if !catalogs.gia.contains(tipo_generico) {
            return Err(DomainError::Validation(format!(
                "tipo_generico {tipo_generico} no válido. Debe ser uno de: {:?}",
                catalogs.gia.keys()
            )));
        }
        let descripcion = activo_especifico.trim();
        if descripcion.chars().count() < 5 {
            return Err(DomainError::Validation(
                "activo_especifico debe ser texto de al menos 5 caracteres".to_string(),
            ));
        }
        if !(1..=5).contains(&importancia) {
            return Err(DomainError::Validation(
                "importancia debe ser un número entre 1 y 5".to_string(),
            ));
        }
        let canonico = catalogs.ci.canonical(tipo_generico, tipo_ci).ok_or_else(|| {
            DomainError::Validation(format!(
                "tipo_ci '{}' no válido para GIA {tipo_generico}. Debe ser uno de: {:?}",
                tipo_ci.trim(),
                catalogs.ci.allowed(tipo_generico)
            ))
        })?;
        Ok(AssetRecord {
            tipo_generico,
            activo_especifico: descripcion.to_string(),
            importancia,
            tipo_ci: canonico,
        })
    }

    pub fn tipo_generico(&self) -> u8 {
        self.tipo_generico
    }
    pub fn activo_especifico(&self) -> &str {
        &self.activo_especifico
    }
    pub fn importancia(&self) -> u8 {
        self.importancia
    }
    pub fn tipo_ci(&self) -> &str {
        &self.tipo_ci
    }
}

impl fmt::Display for AssetRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[GIA {}] {} (importancia {}/5, {})",
            self.tipo_generico, self.activo_especifico, self.importancia, self.tipo_ci
        )
    }
}
