//! Exportación del registro final a disco.
//!
//! El core entrega un registro autocontenido (inputs en orden + análisis +
//! historial de eventos); aquí solo se serializa. Si `sipac_results.json` ya
//! existe se añade un sufijo numérico en lugar de sobrescribir.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub fn export_report(dir: &Path, report: &serde_json::Value) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;

    let mut path = dir.join("sipac_results.json");
    if path.exists() {
        let mut counter = 1u32;
        loop {
            let candidate = dir.join(format!("sipac_results_{counter}.json"));
            if !candidate.exists() {
                path = candidate;
                break;
            }
            counter += 1;
        }
    }

    let body = serde_json::to_vec_pretty(report)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&path, body)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn export_avoids_overwriting_previous_results() {
        let dir = tempfile::tempdir().expect("tempdir");
        let report = json!({"inputs": {}, "analisis": {}});

        let first = export_report(dir.path(), &report).expect("primera exportación");
        let second = export_report(dir.path(), &report).expect("segunda exportación");
        let third = export_report(dir.path(), &report).expect("tercera exportación");

        assert_eq!(first.file_name().unwrap(), "sipac_results.json");
        assert_eq!(second.file_name().unwrap(), "sipac_results_1.json");
        assert_eq!(third.file_name().unwrap(), "sipac_results_2.json");
        assert!(first.exists() && second.exists() && third.exists());
    }
}
