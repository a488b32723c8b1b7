//! sipac-adapters: colaboradores concretos del motor de sesiones.
//!
//! Implementaciones de los puertos de `sipac-core`: fuentes de respuesta
//! (teclado, guion pregrabado), sinks de presentación (consola humana,
//! mensajes JSON por línea) y exportación del informe final a disco.
pub mod export;
pub mod sinks;
pub mod sources;

pub use export::export_report;
pub use sinks::{ConsoleSink, JsonLineSink, RecordingSink};
pub use sources::{ScriptedSource, StdinSource};
