//! Validadores puros, uno por tipo de dato de paso.
//!
//! Contrato común: reciben la entrada cruda (y, para las reglas cruzadas, el
//! recuento o los códigos de una respuesta previa) y devuelven el valor
//! normalizado o el motivo de rechazo como dato. Nunca mutan el conjunto de
//! respuestas; registrar el valor aceptado es responsabilidad del motor.

use serde_json::Value;
use sipac_domain::{AssetRecord, Catalogs, GiaCatalog};
use std::fmt;

/// Motivo de rechazo de una entrada. Siempre específico — la fuente debe
/// poder autocorregirse a partir de él.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection(pub String);

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Texto no vacío con longitud mínima tras recorte.
pub fn validate_text(raw: &str, min_len: usize) -> Result<String, Rejection> {
    let trimmed = raw.trim();
    if trimmed.chars().count() < min_len {
        return Err(Rejection(format!(
            "Debe tener al menos {min_len} caracteres"
        )));
    }
    Ok(trimmed.to_string())
}

/// Lista separada por comas o saltos de línea; recorta cada elemento y
/// descarta los vacíos.
pub fn validate_delimited_list(raw: &str, min_items: usize) -> Result<Vec<String>, Rejection> {
    let items: Vec<String> = raw
        .replace('\n', ",")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if items.len() < min_items {
        return Err(Rejection(format!(
            "Debe contener al menos {min_items} elemento(s)"
        )));
    }
    Ok(items)
}

/// Lista de códigos numéricos; cada token debe parsear como entero y
/// pertenecer al catálogo GIA.
pub fn validate_gia_codes(raw: &str, gia: &GiaCatalog) -> Result<Vec<u8>, Rejection> {
    let mut codes = Vec::new();
    for token in raw.split(',') {
        let t = token.trim();
        let code = t.parse::<u8>().ok().filter(|c| gia.contains(*c)).ok_or_else(|| {
            Rejection(format!(
                "GIA '{t}' no válido. Debe ser uno de: {:?}",
                gia.keys()
            ))
        })?;
        codes.push(code);
    }
    Ok(codes)
}

/// Lista cuyo recuento debe coincidir con una lista previa (p. ej. un activo
/// específico por cada GIA seleccionado).
pub fn validate_cross_items(raw: &str, expected: usize) -> Result<Vec<String>, Rejection> {
    let items: Vec<String> = raw.split(',').map(|s| s.trim().to_string()).collect();
    if items.len() != expected {
        return Err(Rejection(format!(
            "Se esperaban {expected} elementos y se recibieron {}",
            items.len()
        )));
    }
    Ok(items)
}

/// Como `validate_cross_items`, con cada token numérico y acotado.
pub fn validate_cross_scores(
    raw: &str,
    expected: usize,
    min: u8,
    max: u8,
) -> Result<Vec<u8>, Rejection> {
    let tokens: Vec<&str> = raw.split(',').map(str::trim).collect();
    if tokens.len() != expected {
        return Err(Rejection(format!(
            "Se esperaban {expected} valores y se recibieron {}",
            tokens.len()
        )));
    }
    let mut scores = Vec::with_capacity(tokens.len());
    for t in tokens {
        let score = t
            .parse::<u8>()
            .ok()
            .filter(|s| (min..=max).contains(s))
            .ok_or_else(|| {
                Rejection(format!(
                    "'{t}' no es un número entre {min} y {max}"
                ))
            })?;
        scores.push(score);
    }
    Ok(scores)
}

/// Etiquetas CI alineadas por índice con los GIA previamente seleccionados;
/// la comparación ignora mayúsculas y se registra la forma canónica.
pub fn validate_cross_ci(
    raw: &str,
    gias: &[u8],
    catalogs: &Catalogs,
) -> Result<Vec<String>, Rejection> {
    let labels: Vec<&str> = raw.split(',').map(str::trim).collect();
    if labels.len() != gias.len() {
        return Err(Rejection(format!(
            "Se esperaban {} tipos de CI (uno por GIA seleccionado) y se recibieron {}",
            gias.len(),
            labels.len()
        )));
    }
    let mut canonical = Vec::with_capacity(labels.len());
    for (label, gia) in labels.iter().zip(gias) {
        let resolved = catalogs.ci.canonical(*gia, label).ok_or_else(|| {
            Rejection(format!(
                "tipo_ci '{label}' no válido para GIA {gia}. Debe ser uno de: {:?}",
                catalogs.ci.allowed(*gia)
            ))
        })?;
        canonical.push(resolved);
    }
    Ok(canonical)
}

/// Lote JSON de activos. Valida elemento a elemento y corta en el primer
/// fallo, identificándolo con índice 1-indexado y campo.
pub fn validate_asset_batch(raw: &str, catalogs: &Catalogs) -> Result<Vec<AssetRecord>, Rejection> {
    let parsed: Value = serde_json::from_str(raw.trim())
        .map_err(|e| Rejection(format!("JSON inválido: {e}")))?;
    let elements = parsed
        .as_array()
        .ok_or_else(|| Rejection("Debe ser una lista de objetos JSON".to_string()))?;
    if elements.is_empty() {
        return Err(Rejection("Debe contener al menos un activo".to_string()));
    }

    let mut records = Vec::with_capacity(elements.len());
    for (i, element) in elements.iter().enumerate() {
        let n = i + 1;
        let obj = element
            .as_object()
            .ok_or_else(|| Rejection(format!("El elemento {n} debe ser un objeto JSON")))?;

        let gia = require_int(obj, "tipo_generico", n)?;
        let especifico = require_str(obj, "activo_especifico", n)?;
        let importancia = require_int(obj, "importancia", n)?;
        let tipo_ci = require_str(obj, "tipo_ci", n)?;

        let gia = u8::try_from(gia).map_err(|_| {
            Rejection(format!(
                "En el activo {n}: tipo_generico {gia} no válido. Debe ser uno de: {:?}",
                catalogs.gia.keys()
            ))
        })?;
        let importancia = u8::try_from(importancia).map_err(|_| {
            Rejection(format!(
                "En el activo {n}: importancia debe ser un número entre 1 y 5"
            ))
        })?;

        let record = AssetRecord::new(catalogs, gia, especifico, importancia, tipo_ci)
            .map_err(|e| Rejection(format!("En el activo {n}: {e}")))?;
        records.push(record);
    }
    Ok(records)
}

fn require_int(
    obj: &serde_json::Map<String, Value>,
    field: &str,
    n: usize,
) -> Result<i64, Rejection> {
    let value = obj
        .get(field)
        .ok_or_else(|| Rejection(format!("El activo {n} debe tener '{field}'")))?;
    value
        .as_i64()
        .ok_or_else(|| Rejection(format!("En el activo {n}: {field} debe ser un número entero")))
}

fn require_str<'a>(
    obj: &'a serde_json::Map<String, Value>,
    field: &str,
    n: usize,
) -> Result<&'a str, Rejection> {
    let value = obj
        .get(field)
        .ok_or_else(|| Rejection(format!("El activo {n} debe tener '{field}'")))?;
    value
        .as_str()
        .ok_or_else(|| Rejection(format!("En el activo {n}: {field} debe ser texto")))
}
