mod config;
mod telemetry;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use serde_json::json;

use config::CONFIG;
use sipac_adapters::{export_report, ConsoleSink, JsonLineSink, StdinSource};
use sipac_core::{
    analyze_budget, flow_conjunto, flow_desglosado, AssetKind, BudgetInput, CoreError,
    FinalReport, InMemoryEventStore, PresentationSink, SessionEngine, SessionOutcome,
};
use sipac_domain::Catalogs;

fn main() {
    // Cargar .env si existe
    let _ = dotenvy::dotenv();
    telemetry::init(&CONFIG.log_level);

    let args: Vec<String> = std::env::args().collect();
    if args.len() >= 2 && args[1] == "presupuesto" {
        run_presupuesto(&args[2..]);
        return;
    }
    run_wizard(&args[1..]);
}

fn usage() {
    eprintln!(
        "uso: sipac [--json] [--flow conjunto|desglosado] [--catalogos <fichero.json>] \
         [--export <dir>] [--no-export]"
    );
    eprintln!("     sipac presupuesto --tipo HW|SW|SRV --base <importe> --criticidad 1|2|3");
}

/// Sesión interactiva de recolección y análisis.
/// `--json` emite mensajes estructurados por línea para agentes; sin él, la
/// salida es el renderizado de consola para un operador humano.
fn run_wizard(args: &[String]) {
    let mut json_mode = false;
    let mut flow_name = "conjunto".to_string();
    let mut export_dir = CONFIG.export_dir.clone();
    let mut export = true;
    let mut catalog_path: Option<PathBuf> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--json" => json_mode = true,
            "--flow" => {
                i += 1;
                if i < args.len() {
                    flow_name = args[i].clone();
                }
            }
            "--catalogos" => {
                i += 1;
                if i < args.len() {
                    catalog_path = Some(PathBuf::from(&args[i]));
                }
            }
            "--export" => {
                i += 1;
                if i < args.len() {
                    export_dir = PathBuf::from(&args[i]);
                }
            }
            "--no-export" => export = false,
            other => {
                eprintln!("[sipac] argumento desconocido: {other}");
                usage();
                process::exit(2);
            }
        }
        i += 1;
    }

    let flow = match flow_name.as_str() {
        "conjunto" => flow_conjunto(),
        "desglosado" => flow_desglosado(),
        other => {
            eprintln!("[sipac] flujo desconocido: {other} (usa conjunto | desglosado)");
            process::exit(2);
        }
    };

    // Los catálogos son fatales antes de ejecutar cualquier paso: sin datos
    // de referencia válidos no arranca la sesión.
    let catalogs = match &catalog_path {
        Some(path) => match load_catalogs(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("[sipac] catálogos de referencia inválidos: {e:#}");
                process::exit(5);
            }
        },
        None => Catalogs::builtin().clone(),
    };

    let mut engine = SessionEngine::new(flow, catalogs);
    let mut source = StdinSource;
    let mut sink: Box<dyn PresentationSink> = if json_mode {
        Box::new(JsonLineSink::stdout())
    } else {
        Box::new(ConsoleSink::stdout())
    };

    if !json_mode {
        println!("=== SIPAC: MOTOR DE GENERACIÓN DE LÓGICA DE NEGOCIO ===");
    }

    match engine.run(&mut source, sink.as_mut()) {
        Ok(SessionOutcome::Completed(report)) => {
            if export {
                match build_and_export(&engine, &report, &export_dir) {
                    Ok(path) => tracing::info!("resultados exportados a {}", path.display()),
                    Err(e) => {
                        eprintln!("[sipac] no se pudieron exportar los resultados: {e:#}");
                        process::exit(4);
                    }
                }
            }
        }
        Ok(SessionOutcome::Failed(_)) => process::exit(1),
        Err(CoreError::SourceDisconnected) => {
            eprintln!("[ABORT] Operación cancelada.");
            process::exit(3);
        }
        Err(e) => {
            eprintln!("[sipac] error: {e}");
            process::exit(4);
        }
    }
}

/// Carga catálogos versionados desde un documento JSON externo.
fn load_catalogs(path: &Path) -> anyhow::Result<Catalogs> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("leer {}", path.display()))?;
    let doc: serde_json::Value = serde_json::from_str(&raw).context("parsear el documento")?;
    Ok(Catalogs::from_json(&doc)?)
}

/// Registro exportado: informe final más el historial de eventos de la
/// sesión, de modo que cualquier consumidor pueda reconstruir la conversación
/// sin rederivar nada.
fn build_and_export(
    engine: &SessionEngine<InMemoryEventStore>,
    report: &FinalReport,
    dir: &Path,
) -> anyhow::Result<PathBuf> {
    let mut record = serde_json::to_value(report).context("serializar el informe final")?;
    record["eventos"] =
        serde_json::to_value(engine.events()).context("serializar el historial de eventos")?;
    let path = export_report(dir, &record).context("escribir los resultados a disco")?;
    Ok(path)
}

/// Modo presupuesto: fórmulas de amortización y mantenimiento sobre el par
/// presupuesto/criticidad, sin sesión interactiva.
fn run_presupuesto(args: &[String]) {
    let mut tipo: Option<AssetKind> = None;
    let mut base: Option<f64> = None;
    let mut criticidad: Option<u8> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--tipo" => {
                i += 1;
                if i < args.len() {
                    tipo = args[i].parse::<AssetKind>().ok();
                }
            }
            "--base" => {
                i += 1;
                if i < args.len() {
                    base = args[i].parse::<f64>().ok();
                }
            }
            "--criticidad" => {
                i += 1;
                if i < args.len() {
                    criticidad = args[i].parse::<u8>().ok();
                }
            }
            other => {
                eprintln!("[sipac presupuesto] argumento desconocido: {other}");
                usage();
                process::exit(2);
            }
        }
        i += 1;
    }

    let (Some(tipo), Some(base), Some(criticidad)) = (tipo, base, criticidad) else {
        usage();
        process::exit(2);
    };

    match BudgetInput::new(tipo, base, criticidad) {
        Ok(input) => {
            let analisis = analyze_budget(&input);
            let out = json!({ "inputs": input, "analisis": analisis });
            println!(
                "{}",
                serde_json::to_string_pretty(&out).unwrap_or_default()
            );
        }
        Err(e) => {
            eprintln!("[sipac presupuesto] {e}");
            process::exit(2);
        }
    }
}
