//! Configuración central de la aplicación.
//! Carga variables de entorno (.env) y expone una estructura inmutable
//! (`CONFIG`). Ninguna variable es obligatoria: hay valores por defecto
//! razonables para uso interactivo.
use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;

/// Configuración global de la aplicación.
pub struct AppConfig {
    /// Directorio donde se exportan los resultados (`SIPAC_EXPORT_DIR`).
    pub export_dir: PathBuf,
    /// Nivel de log por defecto si no hay `RUST_LOG` (`SIPAC_LOG`).
    pub log_level: String,
}

/// Instancia global perezosa de configuración, evaluada una sola vez.
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    let export_dir = env::var("SIPAC_EXPORT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("results"));
    let log_level = env::var("SIPAC_LOG").unwrap_or_else(|_| "info".to_string());
    AppConfig {
        export_dir,
        log_level,
    }
});
