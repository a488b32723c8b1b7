//! Motores de análisis sobre los datos recolectados.
//!
//! Dos conjuntos de fórmulas independientes, cada uno como función pura:
//! - `analyze_assets`: categorización, métricas y recomendaciones sobre el
//!   esquema de activos intangibles.
//! - `analyze_budget`: amortización y coste de mantenimiento sobre el esquema
//!   presupuesto/criticidad.
//! No comparten estado; se elige según el esquema realmente recolectado.

mod assets;
mod budget;

pub use assets::{analyze_assets, AnalyzedAsset, AssetAnalysis, GiaRef, InputSummary, Metrics};
pub use budget::{analyze_budget, AssetKind, BudgetAnalysis, BudgetInput};

/// Redondeo a 2 decimales, común a ambas fórmulas.
pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
