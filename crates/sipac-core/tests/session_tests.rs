//! Pruebas de la máquina de control: progresión, reintentos, terminaciones.

use sipac_adapters::{RecordingSink, ScriptedSource};
use sipac_core::{
    flow_conjunto, flow_desglosado, AnswerSource, CoreError, SessionEngine, SessionEventKind,
    SessionOutcome, SessionState, SourceError, StepPayload,
};
use sipac_domain::Catalogs;

fn engine_conjunto() -> SessionEngine<sipac_core::InMemoryEventStore> {
    SessionEngine::new(flow_conjunto(), Catalogs::builtin().clone())
}

const BATCH: &str = r#"[
    {"tipo_generico":3,"activo_especifico":"Tienda online","importancia":5,"tipo_ci":"capital tecnológico"},
    {"tipo_generico":11,"activo_especifico":"Base de datos de conocimiento","importancia":4,"tipo_ci":"capital organizativo"},
    {"tipo_generico":3,"activo_especifico":"Formulario de ventas","importancia":2,"tipo_ci":"capital de negocio"}
]"#;

#[test]
fn happy_path_collects_fans_out_and_analyzes() {
    let mut engine = engine_conjunto();
    let mut source = ScriptedSource::new([
        "Ampliar el alcance de la empresa para llegar a más clientes",
        "Tienda online, Distribución propia, Catas en tienda, Club de socios",
        "Diversificación de servicios, Gestión del conocimiento",
        BATCH,
    ]);
    let mut sink = RecordingSink::new();

    let outcome = engine.run(&mut source, &mut sink).expect("sesión completa");
    let SessionOutcome::Completed(report) = outcome else {
        panic!("se esperaba sesión completada");
    };

    // Despliegue alineado por índice
    let answers = engine.answers();
    let gias = answers.codes("tipo_generico").unwrap();
    let especificos = answers.items("activo_especifico").unwrap();
    let importancias = answers.codes("importancia_activo").unwrap();
    let tipos = answers.items("tipo_CI_Intellectus").unwrap();
    assert_eq!(gias.len(), 3);
    assert_eq!(gias.len(), especificos.len());
    assert_eq!(especificos.len(), importancias.len());
    assert_eq!(importancias.len(), tipos.len());
    assert_eq!(tipos[0], "Capital tecnológico");

    // Métricas sobre importancias [5, 4, 2]
    assert_eq!(report.analisis.metricas.importancia_promedio, 3.67);
    assert_eq!(report.analisis.metricas.activos_criticos, 2);
    assert_eq!(report.analisis.metricas.activos_alta_prioridad, 1);
    assert_eq!(report.analisis.resumen_inputs.num_requisitos, 4);

    // Registro autocontenido: inputs en orden + hash de definición
    assert_eq!(report.definition_hash, engine.definition_hash());
    assert_eq!(report.inputs["objetivo_negocio"],
               "Ampliar el alcance de la empresa para llegar a más clientes");

    // Historial: inicialización primero, cierre al final
    let events = engine.events();
    assert!(matches!(events.first().unwrap().kind, SessionEventKind::SessionInitialized { step_count: 4, .. }));
    assert!(matches!(events.last().unwrap().kind, SessionEventKind::SessionCompleted));
    let accepted = events
        .iter()
        .filter(|e| matches!(e.kind, SessionEventKind::AnswerAccepted { .. }))
        .count();
    assert_eq!(accepted, 4);

    // El sink vio los cuatro pasos y un desenlace
    assert_eq!(sink.steps().len(), 4);
    assert_eq!(sink.outcomes().len(), 1);
}

#[test]
fn states_progress_one_transition_at_a_time() {
    let mut engine = engine_conjunto();
    let mut source = ScriptedSource::new(["corto", "Objetivo suficientemente largo"]);
    let mut sink = RecordingSink::new();

    assert_eq!(*engine.state(), SessionState::Requesting { step: 0 });
    engine.next(&mut source, &mut sink).expect("solicitar");
    assert!(matches!(engine.state(), SessionState::Validating { step: 0, .. }));

    engine.next(&mut source, &mut sink).expect("validar");
    assert!(matches!(engine.state(), SessionState::WaitingRetry { step: 0, .. }));
    assert_eq!(engine.retry().retry_count, 1);
    // Sin aceptación no hay clave escrita
    assert!(!engine.answers().contains("objetivo_negocio"));

    engine.next(&mut source, &mut sink).expect("reintentar");
    assert_eq!(*engine.state(), SessionState::Requesting { step: 0 });
    assert_eq!(engine.retry().last_error.as_deref(), Some("Debe tener al menos 10 caracteres"));

    engine.next(&mut source, &mut sink).expect("solicitar de nuevo");
    engine.next(&mut source, &mut sink).expect("validar de nuevo");
    assert!(matches!(engine.state(), SessionState::Advancing { step: 0 }));
    assert!(engine.answers().contains("objetivo_negocio"));
    assert_eq!(engine.retry().retry_count, 0);

    engine.next(&mut source, &mut sink).expect("avanzar");
    assert_eq!(*engine.state(), SessionState::Requesting { step: 1 });

    // El segundo payload del paso 0 llevaba el motivo del rechazo previo
    assert_eq!(sink.steps().len(), 2);
    assert!(sink.steps()[0].last_error.is_none());
    assert!(sink.steps()[1]
        .last_error
        .as_deref()
        .unwrap()
        .contains("al menos 10 caracteres"));
}

#[test]
fn retry_budget_fails_on_sixth_rejection() {
    let mut engine = engine_conjunto();
    let mut source = ScriptedSource::new(["x", "x", "x", "x", "x", "x"]);
    let mut sink = RecordingSink::new();

    let outcome = engine.run(&mut source, &mut sink).expect("termina en fallo");
    let SessionOutcome::Failed(detail) = outcome else {
        panic!("se esperaba fallo por reintentos");
    };
    assert_eq!(detail.error, "MAX_RETRIES_EXCEEDED");
    assert_eq!(detail.step_key, "objetivo_negocio");
    assert_eq!(detail.step_index, 0);
    assert_eq!(detail.retry_count, 6);
    assert!(detail.last_error.contains("al menos 10 caracteres"));

    let events = engine.events();
    let rejected: Vec<u32> = events
        .iter()
        .filter_map(|e| match &e.kind {
            SessionEventKind::AnswerRejected { retry_count, .. } => Some(*retry_count),
            _ => None,
        })
        .collect();
    assert_eq!(rejected, [1, 2, 3, 4, 5, 6]);
    assert!(matches!(
        events.last().unwrap().kind,
        SessionEventKind::RetryBudgetExhausted { attempts: 6, .. }
    ));
    assert!(matches!(engine.state(), SessionState::Failed { step: 0, .. }));
}

#[test]
fn five_rejections_then_acceptance_still_completes_the_step() {
    let mut engine = engine_conjunto();
    let mut source = ScriptedSource::new([
        "x",
        "x",
        "x",
        "x",
        "x",
        "Ampliar el alcance de la empresa",
        "req 1",
        "proceso 1",
        BATCH,
    ]);
    let mut sink = RecordingSink::new();

    let outcome = engine.run(&mut source, &mut sink).expect("sesión completa");
    assert!(outcome.success());
    assert_eq!(engine.retry().retry_count, 0);
}

#[test]
fn disconnection_aborts_without_outcome() {
    let mut engine = engine_conjunto();
    let mut source = ScriptedSource::new(["Ampliar el alcance de la empresa"]);
    let mut sink = RecordingSink::new();

    let err = engine.run(&mut source, &mut sink).expect_err("abortada");
    assert_eq!(err, CoreError::SourceDisconnected);
    assert!(sink.outcomes().is_empty(), "no se emite desenlace al abortar");
    let events = engine.events();
    assert!(matches!(
        events.last().unwrap().kind,
        SessionEventKind::SessionAborted { .. }
    ));
}

#[test]
fn transient_source_failure_consumes_one_retry() {
    struct FlakySource {
        failed_once: bool,
        inner: ScriptedSource,
    }
    impl AnswerSource for FlakySource {
        fn request_answer(&mut self, payload: &StepPayload) -> Result<String, SourceError> {
            if !self.failed_once {
                self.failed_once = true;
                return Err(SourceError::Transient("timeout".to_string()));
            }
            self.inner.request_answer(payload)
        }
    }

    let mut engine = engine_conjunto();
    let mut source = FlakySource {
        failed_once: false,
        inner: ScriptedSource::new([
            "Ampliar el alcance de la empresa",
            "req 1",
            "proceso 1",
            BATCH,
        ]),
    };
    let mut sink = RecordingSink::new();

    let outcome = engine.run(&mut source, &mut sink).expect("sesión completa");
    assert!(outcome.success());

    let rejections: Vec<String> = engine
        .events()
        .iter()
        .filter_map(|e| match &e.kind {
            SessionEventKind::AnswerRejected { reason, .. } => Some(reason.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(rejections.len(), 1);
    assert!(rejections[0].contains("Fuente de respuestas no disponible"));
}

#[test]
fn desglosado_flow_rejects_count_mismatch_and_completes() {
    let mut engine = SessionEngine::new(flow_desglosado(), Catalogs::builtin().clone());
    let mut source = ScriptedSource::new([
        "Ampliar el alcance de la empresa",
        "Tienda online, Distribución propia",
        "Diversificación de servicios",
        "3, 11",
        // 2 GIA elegidos pero 3 activos específicos: rechazo
        "Tienda online, Base de conocimiento, Formulario",
        "Tienda online, Base de conocimiento",
        "5, 4",
        "capital tecnológico, capital organizativo",
    ]);
    let mut sink = RecordingSink::new();

    let outcome = engine.run(&mut source, &mut sink).expect("sesión completa");
    let SessionOutcome::Completed(report) = outcome else {
        panic!("se esperaba sesión completada");
    };

    let rejections = engine
        .events()
        .iter()
        .filter(|e| matches!(e.kind, SessionEventKind::AnswerRejected { .. }))
        .count();
    assert_eq!(rejections, 1);

    // Canonización de etiquetas CI en el flujo desglosado
    let tipos = engine.answers().items("tipo_CI_Intellectus").unwrap();
    assert_eq!(tipos, ["Capital tecnológico", "Capital organizativo"]);
    assert_eq!(report.analisis.resumen_inputs.num_activos, 2);
    assert_eq!(
        report.analisis.metricas.distribucion_gia.get(
            "Modelo de Gestión del Conocimiento Organizativo"
        ),
        Some(&1)
    );
}

#[test]
fn terminal_states_refuse_further_transitions() {
    let mut engine = engine_conjunto();
    let mut source = ScriptedSource::new([
        "Ampliar el alcance de la empresa",
        "req 1",
        "proceso 1",
        BATCH,
    ]);
    let mut sink = RecordingSink::new();
    engine.run(&mut source, &mut sink).expect("sesión completa");

    let err = engine
        .next(&mut source, &mut sink)
        .expect_err("sesión terminada");
    assert_eq!(err, CoreError::SessionFinished);
}

#[test]
fn identical_inputs_produce_identical_analysis_across_flows() {
    // Conjunto
    let mut engine_a = engine_conjunto();
    let mut source_a = ScriptedSource::new([
        "Ampliar el alcance de la empresa",
        "req 1, req 2",
        "proceso 1",
        r#"[{"tipo_generico":3,"activo_especifico":"Tienda online","importancia":5,"tipo_ci":"capital tecnológico"}]"#,
    ]);
    let mut sink_a = RecordingSink::new();
    let outcome_a = engine_a.run(&mut source_a, &mut sink_a).expect("conjunto");

    // Desglosado con los mismos datos
    let mut engine_b = SessionEngine::new(flow_desglosado(), Catalogs::builtin().clone());
    let mut source_b = ScriptedSource::new([
        "Ampliar el alcance de la empresa",
        "req 1, req 2",
        "proceso 1",
        "3",
        "Tienda online",
        "5",
        "capital tecnológico",
    ]);
    let mut sink_b = RecordingSink::new();
    let outcome_b = engine_b.run(&mut source_b, &mut sink_b).expect("desglosado");

    let (SessionOutcome::Completed(a), SessionOutcome::Completed(b)) = (outcome_a, outcome_b)
    else {
        panic!("ambas sesiones debían completarse");
    };
    assert_eq!(a.analisis, b.analisis);
}
