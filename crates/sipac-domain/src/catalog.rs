//! Catálogos de referencia: categorías GIA y tipos de Capital Intelectual.
//!
//! Se cargan una sola vez al inicio del proceso y son inmutables durante toda
//! la vida del mismo. El resto del sistema los recibe por inyección explícita
//! (nunca como estado global mutable), de modo que pueden versionarse o
//! sustituirse vía `Catalogs::from_json` sin tocar la lógica de validación.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::DomainError;

/// Catálogo de Activos Genéricos Intangibles (GIA): id → descripción.
#[derive(Debug, Clone)]
pub struct GiaCatalog {
    entries: IndexMap<u8, String>,
}

impl GiaCatalog {
    fn new(entries: IndexMap<u8, String>) -> Result<Self, DomainError> {
        if entries.is_empty() {
            return Err(DomainError::ReferenceData("catálogo GIA vacío".to_string()));
        }
        Ok(Self { entries })
    }

    pub fn contains(&self, id: u8) -> bool {
        self.entries.contains_key(&id)
    }

    /// Descripción de la categoría, si existe.
    pub fn name(&self, id: u8) -> Option<&str> {
        self.entries.get(&id).map(|s| s.as_str())
    }

    /// Claves válidas en orden de catálogo.
    pub fn keys(&self) -> Vec<u8> {
        self.entries.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &str)> {
        self.entries.iter().map(|(id, name)| (*id, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Tipos de Capital Intelectual admitidos por cada categoría GIA.
#[derive(Debug, Clone)]
pub struct CiCatalog {
    entries: IndexMap<u8, Vec<String>>,
}

impl CiCatalog {
    fn new(entries: IndexMap<u8, Vec<String>>) -> Self {
        Self { entries }
    }

    /// Etiquetas admitidas para una categoría GIA (vacío si no hay entrada).
    pub fn allowed(&self, gia: u8) -> &[String] {
        self.entries.get(&gia).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Busca la etiqueta sin distinguir mayúsculas y devuelve su forma
    /// canónica de catálogo.
    pub fn canonical(&self, gia: u8, label: &str) -> Option<String> {
        let wanted = label.trim().to_lowercase();
        self.allowed(gia)
            .iter()
            .find(|t| t.to_lowercase() == wanted)
            .cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &[String])> {
        self.entries.iter().map(|(id, types)| (*id, types.as_slice()))
    }
}

/// Par inmutable de catálogos de referencia.
#[derive(Debug, Clone)]
pub struct Catalogs {
    pub gia: GiaCatalog,
    pub ci: CiCatalog,
}

impl Catalogs {
    fn build(gia: GiaCatalog, ci: CiCatalog) -> Result<Self, DomainError> {
        // Invariante: toda entrada CI debe referirse a una categoría GIA conocida.
        for (id, _) in ci.iter() {
            if !gia.contains(id) {
                return Err(DomainError::ReferenceData(format!(
                    "el mapeo CI referencia la categoría GIA {id}, ausente del catálogo"
                )));
            }
        }
        Ok(Self { gia, ci })
    }

    /// Catálogos incorporados, construidos una única vez.
    pub fn builtin() -> &'static Catalogs {
        static BUILTIN: Lazy<Catalogs> = Lazy::new(|| {
            Catalogs::build(
                GiaCatalog::new(builtin_gia()).expect("catálogo GIA incorporado"),
                CiCatalog::new(builtin_ci()),
            )
            .expect("catálogos incorporados consistentes")
        });
        &BUILTIN
    }

    /// Construye catálogos desde un documento JSON inyectado:
    /// `{ "gia": { "1": "…" }, "ci": { "1": ["…"] } }`.
    pub fn from_json(doc: &Value) -> Result<Catalogs, DomainError> {
        let gia_obj = doc
            .get("gia")
            .and_then(Value::as_object)
            .ok_or_else(|| DomainError::ReferenceData("falta la sección 'gia'".to_string()))?;
        let mut gia = IndexMap::new();
        for (k, v) in gia_obj {
            let id = parse_catalog_key(k)?;
            let name = v.as_str().ok_or_else(|| {
                DomainError::ReferenceData(format!("descripción GIA {k} no es texto"))
            })?;
            gia.insert(id, name.to_string());
        }

        let ci_obj = doc
            .get("ci")
            .and_then(Value::as_object)
            .ok_or_else(|| DomainError::ReferenceData("falta la sección 'ci'".to_string()))?;
        let mut ci = IndexMap::new();
        for (k, v) in ci_obj {
            let id = parse_catalog_key(k)?;
            let types = v.as_array().ok_or_else(|| {
                DomainError::ReferenceData(format!("tipos CI de GIA {k} no son una lista"))
            })?;
            let mut labels = Vec::with_capacity(types.len());
            for t in types {
                let label = t.as_str().ok_or_else(|| {
                    DomainError::ReferenceData(format!("tipo CI de GIA {k} no es texto"))
                })?;
                labels.push(label.to_string());
            }
            ci.insert(id, labels);
        }

        Catalogs::build(GiaCatalog::new(gia)?, CiCatalog::new(ci))
    }
}

fn parse_catalog_key(raw: &str) -> Result<u8, DomainError> {
    raw.parse::<u8>()
        .map_err(|_| DomainError::ReferenceData(format!("clave de catálogo inválida: '{raw}'")))
}

fn builtin_gia() -> IndexMap<u8, String> {
    [
        (1, "Modelo Productivo / Ejecución del Servicio"),
        (2, "Modelo Comercial o de Clientes"),
        (3, "Modelo de Oferta y Diversificación de Servicios / Innovación"),
        (4, "Modelo de Expansión Geográfica Internacional"),
        (5, "Modelo de RRHH / Desarrollo Profesional / Principios y Valores"),
        (6, "Modelo Retributivo y de Propiedad"),
        (7, "Modelo de Marca"),
        (8, "Modelo de Relaciones Institucionales y Networking de Alto Nivel/Stakeholders"),
        (9, "Modelo de Organización y Procesos"),
        (10, "Modelo de Estrategia de la Compañía"),
        (11, "Modelo de Gestión del Conocimiento Organizativo"),
    ]
    .into_iter()
    .map(|(id, name)| (id, name.to_string()))
    .collect()
}

fn builtin_ci() -> IndexMap<u8, Vec<String>> {
    const HUMANO: &str = "Capital humano";
    const ORGANIZATIVO: &str = "Capital organizativo";
    const TECNOLOGICO: &str = "Capital tecnológico";
    const NEGOCIO: &str = "Capital de negocio";
    const SOCIAL: &str = "Capital social";
    const EMPRENDIMIENTO: &str = "Capital de emprendimiento e innovación";

    let table: [(u8, &[&str]); 11] = [
        (1, &[HUMANO, ORGANIZATIVO, TECNOLOGICO, NEGOCIO, SOCIAL]),
        (2, &[HUMANO, ORGANIZATIVO, NEGOCIO, SOCIAL, EMPRENDIMIENTO]),
        (3, &[HUMANO, ORGANIZATIVO, TECNOLOGICO, NEGOCIO, EMPRENDIMIENTO]),
        (4, &[ORGANIZATIVO, NEGOCIO, EMPRENDIMIENTO]),
        (5, &[HUMANO, ORGANIZATIVO, TECNOLOGICO, NEGOCIO, SOCIAL, EMPRENDIMIENTO]),
        (6, &[HUMANO, ORGANIZATIVO, TECNOLOGICO, NEGOCIO, EMPRENDIMIENTO]),
        (7, &[HUMANO, NEGOCIO, SOCIAL]),
        (8, &[ORGANIZATIVO, NEGOCIO, SOCIAL]),
        (9, &[ORGANIZATIVO, SOCIAL, EMPRENDIMIENTO]),
        (10, &[NEGOCIO, SOCIAL, EMPRENDIMIENTO]),
        (11, &[HUMANO, ORGANIZATIVO, TECNOLOGICO, EMPRENDIMIENTO]),
    ];

    table
        .into_iter()
        .map(|(id, types)| (id, types.iter().map(|t| t.to_string()).collect()))
        .collect()
}
