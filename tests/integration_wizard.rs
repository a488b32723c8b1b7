//! Integración extremo a extremo: sesión completa, informe y exportación.

use sipac_adapters::{export_report, RecordingSink, ScriptedSource};
use sipac_core::{flow_desglosado, SessionEngine, SessionOutcome};
use sipac_domain::Catalogs;

#[test]
fn full_desglosado_session_exports_self_contained_record() {
    let mut engine = SessionEngine::new(flow_desglosado(), Catalogs::builtin().clone());
    let mut source = ScriptedSource::new([
        "Ampliar el alcance de la empresa para llegar a más clientes",
        "Tienda online, Ser distribuidor, Catas en tienda",
        "Diversificación de servicios, Gestión del conocimiento",
        "3, 3, 11",
        "Tienda online, Formulario de ventas, Repositorio de conocimiento",
        "5, 4, 3",
        "capital tecnológico, capital de negocio, capital organizativo",
    ]);
    let mut sink = RecordingSink::new();

    let outcome = engine.run(&mut source, &mut sink).expect("sesión completa");
    let SessionOutcome::Completed(report) = outcome else {
        panic!("se esperaba sesión completada");
    };

    // tipo_generico "3, 3, 11" normaliza a [3, 3, 11]
    assert_eq!(engine.answers().codes("tipo_generico").unwrap(), [3, 3, 11]);
    assert_eq!(report.analisis.resumen_inputs.num_activos, 3);
    assert_eq!(report.analisis.metricas.importancia_promedio, 4.0);

    // Exportar informe + historial y verificar que el registro es autocontenido
    let mut record = serde_json::to_value(&report).expect("informe serializable");
    record["eventos"] = serde_json::to_value(engine.events()).expect("eventos serializables");

    let dir = tempfile::tempdir().expect("tempdir");
    let path = export_report(dir.path(), &record).expect("exportación");
    let raw = std::fs::read_to_string(&path).expect("leer resultados");
    let parsed: serde_json::Value = serde_json::from_str(&raw).expect("JSON válido");

    assert_eq!(parsed["inputs"]["tipo_generico"], serde_json::json!([3, 3, 11]));
    assert_eq!(
        parsed["inputs"]["tipo_CI_Intellectus"][0],
        "Capital tecnológico"
    );
    assert_eq!(parsed["definition_hash"], report.definition_hash);
    assert!(parsed["eventos"].as_array().unwrap().len() >= 9);
}

#[test]
fn failed_session_payload_names_step_and_reason() {
    let mut engine = SessionEngine::new(flow_desglosado(), Catalogs::builtin().clone());
    // El paso de GIA rechaza seis veces seguidas: código 99 fuera de catálogo
    let mut source = ScriptedSource::new([
        "Ampliar el alcance de la empresa",
        "Tienda online",
        "Diversificación de servicios",
        "1, 99",
        "1, 99",
        "1, 99",
        "1, 99",
        "1, 99",
        "1, 99",
    ]);
    let mut sink = RecordingSink::new();

    let outcome = engine.run(&mut source, &mut sink).expect("termina en fallo");
    let SessionOutcome::Failed(detail) = outcome else {
        panic!("se esperaba fallo por reintentos");
    };
    assert_eq!(detail.step_key, "tipo_generico");
    assert!(detail.last_error.contains("'99'"));
    assert_eq!(detail.retry_count, 6);

    // El sink recibió el mismo desenlace que devolvió run()
    assert_eq!(sink.outcomes().len(), 1);
}
