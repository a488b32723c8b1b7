//! Inicialización de `tracing-subscriber` para logging estructurado.
//!
//! Prioridad: `RUST_LOG` > nivel de configuración > "info". Los logs salen
//! por stderr: stdout queda reservado para los sinks de presentación (en
//! particular el modo JSON por líneas).

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init(log_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .ok();
}
