//! Flujos de recolección incorporados.
//!
//! Dos variantes fijadas en compilación sobre el mismo registro neutro:
//! - `flow_conjunto`: cuatro pasos; los activos llegan como un único lote
//!   JSON que se despliega al aceptarse.
//! - `flow_desglosado`: siete pasos; los activos se recolectan campo a campo
//!   con validación cruzada contra las respuestas previas.
//!
//! Ambos terminan con el conjunto de respuestas en la misma forma, por lo que
//! el análisis final es común.

use std::fmt::Write as _;

use sipac_domain::{answer, AnswerSet, Catalogs};

use crate::step::{build_flow_definition, FlowDefinition, StepDefinition, StepText, ValidationRule};

/// Flujo por defecto: objetivo → requisitos → procesos → lote de activos.
pub fn flow_conjunto() -> FlowDefinition {
    build_flow_definition(vec![
        StepDefinition {
            key: "objetivo_negocio",
            title: "OBJETIVO DEL NEGOCIO",
            documentation: StepText::Static(
                "El objetivo de negocio es la meta principal que la organización desea \
                 alcanzar. Debe ser específico, medible y orientado a resultados.",
            ),
            prompt: StepText::Static("¿Cuál es el objetivo principal de negocio que deseas alcanzar?"),
            examples: "Ampliar el alcance de la empresa para poder llegar a más clientes",
            rule: ValidationRule::Text { min_len: 10 },
        },
        StepDefinition {
            key: "requisitos_de_negocio",
            title: "REQUISITOS DEL NEGOCIO",
            documentation: StepText::Static(
                "Los requisitos de negocio son las condiciones o capacidades específicas \
                 necesarias para lograr el objetivo planteado. Deben ser concretos y \
                 accionables. Formato: lista separada por comas o saltos de línea.",
            ),
            prompt: StepText::Static(
                "¿Qué requisitos de negocio necesitas cumplir? (separa múltiples requisitos por comas)",
            ),
            examples: "Ampliar modelo de negocio (de tienda física a tienda online), requisito 2, requisito 3",
            rule: ValidationRule::DelimitedList { min_items: 1 },
        },
        StepDefinition {
            key: "procesos",
            title: "PROCESOS",
            documentation: StepText::Static(
                "Los procesos son las actividades o flujos de trabajo que se verán \
                 afectados o que necesitan implementarse para cumplir los requisitos. \
                 Formato: lista separada por comas o saltos de línea.",
            ),
            prompt: StepText::Static(
                "¿Qué procesos están involucrados o necesitan modificarse? (separa múltiples procesos por comas)",
            ),
            examples: "Diversificación de servicios, Mejora del almacenamiento del conocimiento, Proceso 3",
            rule: ValidationRule::DelimitedList { min_items: 1 },
        },
        StepDefinition {
            key: "activos_conjunto",
            title: "IDENTIFICACIÓN DE ACTIVOS INTANGIBLES",
            documentation: StepText::Dynamic(doc_activos_conjunto),
            prompt: StepText::Static(
                "Describe los activos intangibles necesarios en formato JSON (lista de objetos \
                 con tipo_generico, activo_especifico, importancia, tipo_ci)",
            ),
            examples: r#"[{"tipo_generico": 3, "activo_especifico": "Creación de tienda online", "importancia": 5, "tipo_ci": "capital tecnológico"}]"#,
            rule: ValidationRule::AssetBatch,
        },
    ])
}

/// Flujo alternativo: los activos se recolectan desglosados en cuatro pasos
/// con validación cruzada (recuento y pertenencia por índice).
pub fn flow_desglosado() -> FlowDefinition {
    build_flow_definition(vec![
        StepDefinition {
            key: "objetivo_negocio",
            title: "OBJETIVO DEL NEGOCIO",
            documentation: StepText::Static(
                "Especifica el objetivo de negocio de la empresa cliente. Sé conciso y \
                 claro, no más de 10 palabras en la medida de lo posible.",
            ),
            prompt: StepText::Static("Introduce el objetivo del negocio"),
            examples: "Ampliar el alcance de la empresa para poder llegar a más clientes",
            rule: ValidationRule::Text { min_len: 1 },
        },
        StepDefinition {
            key: "requisitos_de_negocio",
            title: "REQUISITOS DEL NEGOCIO",
            documentation: StepText::Static(
                "Especifica los requisitos de negocio clave relacionados con el objetivo \
                 del paso 1. Un objetivo puede estar relacionado con varios requisitos. \
                 Proporciona una lista separada por comas.",
            ),
            prompt: StepText::Static("Introduce los requisitos del negocio, separados por comas"),
            examples: "Ampliar modelo de negocio (de tienda física a tienda online), requisito 2, requisito 3",
            rule: ValidationRule::DelimitedList { min_items: 1 },
        },
        StepDefinition {
            key: "procesos",
            title: "PROCESOS",
            documentation: StepText::Static(
                "Identifica los procesos de la empresa que pueden ayudar a obtener el \
                 objetivo de negocio fijado en el paso 1.",
            ),
            prompt: StepText::Static(
                "Introduce los procesos de la empresa relacionados con el objetivo de negocio, separados por comas",
            ),
            examples: "Diversificación de servicios, Mejora del almacenamiento del conocimiento, Proceso 3",
            rule: ValidationRule::DelimitedList { min_items: 1 },
        },
        StepDefinition {
            key: "tipo_generico",
            title: "TIPO DE ACTIVO GENÉRICO INTANGIBLE (GIA)",
            documentation: StepText::Dynamic(doc_tabla_gia),
            prompt: StepText::Static(
                "Introduce los números de los GIA seleccionados, separados por comas (ej: 1, 3)",
            ),
            examples: "3, 3, 11",
            rule: ValidationRule::GiaCodes,
        },
        StepDefinition {
            key: "activo_especifico",
            title: "ACTIVO ESPECÍFICO INTANGIBLE",
            documentation: StepText::Dynamic(doc_activos_especificos),
            prompt: StepText::Static(
                "Introduce los activos específicos intangibles, separados por comas, en el \
                 mismo orden que los GIA listados arriba",
            ),
            examples: "Creación de tienda online, Formulario para las ventas online, Creación de un repositorio para almacenar el conocimiento",
            rule: ValidationRule::CrossCountItems {
                source_key: answer::KEY_TIPO_GENERICO,
            },
        },
        StepDefinition {
            key: "importancia_activo",
            title: "IMPORTANCIA DEL ACTIVO ESPECÍFICO INTANGIBLE",
            documentation: StepText::Dynamic(doc_importancia),
            prompt: StepText::Static(
                "Introduce la importancia (1-5) de cada activo, en orden, separados por comas",
            ),
            examples: "5, 4, 3",
            rule: ValidationRule::CrossCountScores {
                source_key: answer::KEY_ACTIVO_ESPECIFICO,
                min: 1,
                max: 5,
            },
        },
        StepDefinition {
            key: "tipo_CI_Intellectus",
            title: "TIPO DE CI INTELLECTUS",
            documentation: StepText::Dynamic(doc_tipos_ci),
            prompt: StepText::Static(
                "Introduce los tipos de CI Intellectus para cada GIA, separados por comas",
            ),
            examples: "Capital humano, Capital tecnológico, Capital de negocio",
            rule: ValidationRule::CrossCountCi {
                source_key: answer::KEY_TIPO_GENERICO,
            },
        },
    ])
}

/// Tabla Markdown del catálogo GIA.
fn tabla_gia(catalogs: &Catalogs) -> String {
    let mut table = String::from("| GIA | Descripción |\n|-----|-------------|\n");
    for (id, name) in catalogs.gia.iter() {
        let _ = writeln!(table, "| {id:<3} | {name} |");
    }
    table
}

fn doc_tabla_gia(_answers: &AnswerSet, catalogs: &Catalogs) -> String {
    format!(
        "Identifica los tipos de activos genéricos intangibles (GIA) que hacen \
         cuello de botella y que harían palanca para obtener el objetivo de \
         negocio fijado en el paso 1. Si se han detectado varios activos \
         intangibles del mismo tipo, el tipo debe repetirse en el listado según \
         el número de apariciones.\nLos tipos deben seleccionarse de la \
         siguiente lista:\n\n{}",
        tabla_gia(catalogs)
    )
}

/// Listado de los GIA elegidos con su activo específico (si ya se conoce) y,
/// opcionalmente, su importancia.
fn listado_activos(answers: &AnswerSet, catalogs: &Catalogs, con_importancia: bool) -> String {
    let gias = answers.codes(answer::KEY_TIPO_GENERICO).unwrap_or(&[]);
    let especificos = answers.items(answer::KEY_ACTIVO_ESPECIFICO).unwrap_or(&[]);
    let importancias = answers.codes(answer::KEY_IMPORTANCIA).unwrap_or(&[]);

    if gias.is_empty() {
        return "No se seleccionaron GIAs en el paso anterior.".to_string();
    }

    let mut doc = String::new();
    for (i, gia) in gias.iter().enumerate() {
        let nombre = catalogs.gia.name(*gia).unwrap_or("Desconocido");
        let especifico = especificos
            .get(i)
            .map(String::as_str)
            .unwrap_or("No especificado");
        let _ = writeln!(doc, "{}. [GIA {gia}] {nombre}", i + 1);
        let _ = writeln!(doc, "   Activo específico: {especifico}");
        if con_importancia {
            if let Some(imp) = importancias.get(i) {
                let _ = writeln!(doc, "   Importancia: {imp}/5");
            }
        }
        doc.push('\n');
    }
    doc
}

fn doc_activos_especificos(answers: &AnswerSet, catalogs: &Catalogs) -> String {
    let gias = answers.codes(answer::KEY_TIPO_GENERICO).unwrap_or(&[]);
    if gias.is_empty() {
        return "No se seleccionaron GIAs en el paso anterior.".to_string();
    }
    let mut listado = String::new();
    for (i, gia) in gias.iter().enumerate() {
        let nombre = catalogs.gia.name(*gia).unwrap_or("Desconocido");
        let _ = writeln!(listado, "{}. [GIA {gia}] {nombre}", i + 1);
    }
    format!(
        "Para cada tipo de activo genérico intangible (GIA) seleccionado en el \
         paso 4, identifica el activo específico intangible de la empresa.\n\n\
         LISTA DE GIA SELECCIONADOS (en orden):\n\
         =======================================\n{listado}"
    )
}

fn doc_importancia(answers: &AnswerSet, catalogs: &Catalogs) -> String {
    format!(
        "Especifica la importancia de cada activo específico intangible, en un \
         rango del 1 al 5 (1 = poca importancia, 5 = mucha importancia), según \
         su impacto en la consecución del objetivo de negocio.\n\n\
         ACTIVOS ESPECÍFICOS A EVALUAR:\n\
         ================================\n\n{}",
        listado_activos(answers, catalogs, false)
    )
}

fn doc_tipos_ci(answers: &AnswerSet, catalogs: &Catalogs) -> String {
    let gias = answers.codes(answer::KEY_TIPO_GENERICO).unwrap_or(&[]);
    let header = "Para cada activo específico intangible, identifica el tipo de Capital \
                  Intelectual (CI) según el modelo Intellectus que mejor lo representa.\n\n";
    if gias.is_empty() {
        return format!("{header}No se seleccionaron GIAs en el paso anterior.");
    }

    let mut mapping = String::from("\nMAPEO GIA → CAPITAL INTELECTUAL:\n==================================\n\n");
    let mut seen: Vec<u8> = Vec::new();
    for gia in gias {
        if seen.contains(gia) {
            continue;
        }
        seen.push(*gia);
        let nombre = catalogs.gia.name(*gia).unwrap_or("Desconocido");
        let _ = writeln!(mapping, "GIA {gia}: {nombre}");
        mapping.push_str("  → Tipos de CI aplicables:\n");
        for ci in catalogs.ci.allowed(*gia) {
            let _ = writeln!(mapping, "     • {ci}");
        }
        mapping.push('\n');
    }

    format!(
        "{header}ACTIVOS ESPECÍFICOS Y CI APLICABLES:\n\
         ======================================\n\n{}{mapping}",
        listado_activos(answers, catalogs, true)
    )
}

fn doc_activos_conjunto(_answers: &AnswerSet, catalogs: &Catalogs) -> String {
    let mut ci_lines = String::new();
    for (id, types) in catalogs.ci.iter() {
        let _ = writeln!(ci_lines, "  {id}: {}", types.join(", "));
    }
    let mut gia_lines = String::new();
    for (id, name) in catalogs.gia.iter() {
        let _ = writeln!(gia_lines, "  {id}: {name}");
    }
    format!(
        "Para cada activo intangible necesario debes proporcionar cuatro datos:\n\n\
         1. tipo_generico: categoría del activo según el catálogo GIA\n\
         2. activo_especifico: descripción concreta del activo (mínimo 5 caracteres)\n\
         3. importancia: escala 1-5 (1 = baja, 5 = crítica)\n\
         4. tipo_ci: tipo de Capital Intelectual admitido por esa categoría\n\n\
         Catálogo GIA disponible:\n{gia_lines}\n\
         Tipos de Capital Intelectual por GIA:\n{ci_lines}"
    )
}
