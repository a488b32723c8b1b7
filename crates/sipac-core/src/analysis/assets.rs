use indexmap::IndexMap;
use serde::Serialize;
use sipac_domain::{answer, AnswerSet, Catalogs};

use super::round2;

/// Resumen de los inputs recolectados.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputSummary {
    pub objetivo: String,
    pub num_requisitos: usize,
    pub num_procesos: usize,
    pub num_activos: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GiaRef {
    pub id: u8,
    pub nombre: String,
}

/// Activo con su categoría GIA resuelta contra el catálogo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyzedAsset {
    pub id: usize,
    pub categoria_gia: GiaRef,
    pub descripcion: String,
    pub importancia: u8,
    pub tipo_capital_intelectual: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub importancia_promedio: f64,
    pub activos_criticos: usize,
    pub activos_alta_prioridad: usize,
    pub distribucion_capital_intelectual: IndexMap<String, usize>,
    pub distribucion_gia: IndexMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetAnalysis {
    pub resumen_inputs: InputSummary,
    pub activos_identificados: Vec<AnalyzedAsset>,
    pub metricas: Metrics,
    pub recomendaciones: Vec<String>,
}

/// Etiqueta canónica usada por la regla de concentración tecnológica.
const CAPITAL_TECNOLOGICO: &str = "Capital tecnológico";

/// Análisis determinista del conjunto de respuestas completo. Puro: dos
/// invocaciones sobre el mismo conjunto producen el mismo resultado.
pub fn analyze_assets(answers: &AnswerSet, catalogs: &Catalogs) -> AssetAnalysis {
    let gias = answers.codes(answer::KEY_TIPO_GENERICO).unwrap_or(&[]);
    let especificos = answers.items(answer::KEY_ACTIVO_ESPECIFICO).unwrap_or(&[]);
    let importancias = answers.codes(answer::KEY_IMPORTANCIA).unwrap_or(&[]);
    let tipos_ci = answers.items(answer::KEY_TIPO_CI).unwrap_or(&[]);

    let total = gias.len();
    let resumen_inputs = InputSummary {
        objetivo: answers.text("objetivo_negocio").unwrap_or("").to_string(),
        num_requisitos: answers.items("requisitos_de_negocio").map_or(0, |v| v.len()),
        num_procesos: answers.items("procesos").map_or(0, |v| v.len()),
        num_activos: total,
    };

    let mut activos = Vec::with_capacity(total);
    for i in 0..total {
        activos.push(AnalyzedAsset {
            id: i + 1,
            categoria_gia: GiaRef {
                id: gias[i],
                nombre: catalogs
                    .gia
                    .name(gias[i])
                    .unwrap_or("Desconocido")
                    .to_string(),
            },
            descripcion: especificos.get(i).cloned().unwrap_or_default(),
            importancia: importancias.get(i).copied().unwrap_or(0),
            tipo_capital_intelectual: tipos_ci.get(i).cloned().unwrap_or_default(),
        });
    }

    let importancia_promedio = if importancias.is_empty() {
        0.0
    } else {
        round2(importancias.iter().map(|i| *i as f64).sum::<f64>() / importancias.len() as f64)
    };
    let activos_criticos = importancias.iter().filter(|i| **i >= 4).count();
    let activos_alta_prioridad = importancias.iter().filter(|i| **i == 5).count();

    let mut distribucion_capital_intelectual: IndexMap<String, usize> = IndexMap::new();
    for ci in tipos_ci {
        *distribucion_capital_intelectual.entry(ci.clone()).or_insert(0) += 1;
    }
    let mut distribucion_gia: IndexMap<String, usize> = IndexMap::new();
    for gia in gias {
        let nombre = catalogs.gia.name(*gia).unwrap_or("Desconocido").to_string();
        *distribucion_gia.entry(nombre).or_insert(0) += 1;
    }

    // Reglas independientes: todas se evalúan siempre, sin salida temprana, y
    // cada una aporta su recomendación solo si su condición (estricta) se da.
    let mut recomendaciones = Vec::new();
    if activos_criticos as f64 > total as f64 * 0.5 {
        recomendaciones.push(
            "Más del 50% de tus activos son críticos. Considera priorizar inversiones en \
             protección y gestión de riesgos."
                .to_string(),
        );
    }
    let tecnologico = distribucion_capital_intelectual
        .get(CAPITAL_TECNOLOGICO)
        .copied()
        .unwrap_or(0);
    if tecnologico as f64 > total as f64 * 0.6 {
        recomendaciones.push(
            "Alta concentración en capital tecnológico. Evalúa balancear con capital humano \
             y organizativo."
                .to_string(),
        );
    }
    if resumen_inputs.num_requisitos > total {
        recomendaciones.push(
            "Tienes más requisitos que activos identificados. Considera si faltan activos \
             intangibles por identificar."
                .to_string(),
        );
    }

    AssetAnalysis {
        resumen_inputs,
        activos_identificados: activos,
        metricas: Metrics {
            importancia_promedio,
            activos_criticos,
            activos_alta_prioridad,
            distribucion_capital_intelectual,
            distribucion_gia,
        },
        recomendaciones,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sipac_domain::AnswerValue;

    fn answers_with_importances(importances: &[u8]) -> AnswerSet {
        let mut answers = AnswerSet::new();
        answers.register("objetivo_negocio", AnswerValue::Text("Crecer en clientes".into()));
        answers.register(
            "requisitos_de_negocio",
            AnswerValue::Items(vec!["req 1".into()]),
        );
        answers.register("procesos", AnswerValue::Items(vec!["proceso 1".into()]));
        let n = importances.len();
        answers.register(
            answer::KEY_TIPO_GENERICO,
            AnswerValue::Codes(vec![3; n]),
        );
        answers.register(
            answer::KEY_ACTIVO_ESPECIFICO,
            AnswerValue::Items((0..n).map(|i| format!("Activo {i}")).collect()),
        );
        answers.register(
            answer::KEY_IMPORTANCIA,
            AnswerValue::Codes(importances.to_vec()),
        );
        answers.register(
            answer::KEY_TIPO_CI,
            AnswerValue::Items(vec!["Capital de negocio".into(); n]),
        );
        answers
    }

    #[test]
    fn metrics_for_known_importances() {
        let answers = answers_with_importances(&[5, 5, 2]);
        let analysis = analyze_assets(&answers, Catalogs::builtin());
        assert_eq!(analysis.metricas.importancia_promedio, 4.0);
        assert_eq!(analysis.metricas.activos_criticos, 2);
        assert_eq!(analysis.metricas.activos_alta_prioridad, 2);
        assert_eq!(analysis.resumen_inputs.num_activos, 3);
        assert_eq!(analysis.activos_identificados.len(), 3);
        assert_eq!(
            analysis.activos_identificados[0].categoria_gia.nombre,
            "Modelo de Oferta y Diversificación de Servicios / Innovación"
        );
    }

    #[test]
    fn critical_rule_uses_strict_boundary() {
        // 2 de 4 críticos = exactamente 0.5: la regla NO dispara.
        let answers = answers_with_importances(&[5, 4, 1, 1]);
        let analysis = analyze_assets(&answers, Catalogs::builtin());
        assert!(!analysis
            .recomendaciones
            .iter()
            .any(|r| r.contains("críticos")));

        // 3 de 4 críticos > 0.5: dispara.
        let answers = answers_with_importances(&[5, 4, 4, 1]);
        let analysis = analyze_assets(&answers, Catalogs::builtin());
        assert!(analysis
            .recomendaciones
            .iter()
            .any(|r| r.contains("críticos")));
    }

    #[test]
    fn technological_concentration_counts_canonical_label() {
        let mut answers = answers_with_importances(&[3, 3, 3]);
        answers.register(
            answer::KEY_TIPO_CI,
            AnswerValue::Items(vec!["Capital tecnológico".into(); 3]),
        );
        let analysis = analyze_assets(&answers, Catalogs::builtin());
        assert!(analysis
            .recomendaciones
            .iter()
            .any(|r| r.contains("concentración en capital tecnológico")));
    }

    #[test]
    fn more_requirements_than_assets_recommends_identifying_more() {
        let mut answers = answers_with_importances(&[3]);
        answers.register(
            "requisitos_de_negocio",
            AnswerValue::Items(vec!["r1".into(), "r2".into()]),
        );
        let analysis = analyze_assets(&answers, Catalogs::builtin());
        assert!(analysis
            .recomendaciones
            .iter()
            .any(|r| r.contains("más requisitos que activos")));
    }

    #[test]
    fn analysis_is_idempotent() {
        let answers = answers_with_importances(&[5, 2, 4]);
        let a = analyze_assets(&answers, Catalogs::builtin());
        let b = analyze_assets(&answers, Catalogs::builtin());
        assert_eq!(a, b);
    }
}
