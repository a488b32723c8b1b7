use serde::{Deserialize, Serialize};
use sipac_domain::DomainError;

use super::round2;

/// Naturaleza del activo presupuestado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetKind {
    Hw,
    Sw,
    /// Servicio: gasto corriente, sin amortización.
    Srv,
}

impl std::str::FromStr for AssetKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "HW" => Ok(AssetKind::Hw),
            "SW" => Ok(AssetKind::Sw),
            "SRV" => Ok(AssetKind::Srv),
            other => Err(DomainError::Validation(format!(
                "tipo_activo '{other}' no válido. Debe ser HW, SW o SRV"
            ))),
        }
    }
}

/// Par presupuesto/criticidad validado.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetInput {
    tipo_activo: AssetKind,
    presupuesto_base: f64,
    criticidad: u8,
}

impl BudgetInput {
    pub fn new(
        tipo_activo: AssetKind,
        presupuesto_base: f64,
        criticidad: u8,
    ) -> Result<Self, DomainError> {
        if !presupuesto_base.is_finite() || presupuesto_base < 0.0 {
            return Err(DomainError::Validation(
                "presupuesto_base debe ser un importe no negativo".to_string(),
            ));
        }
        if !(1..=3).contains(&criticidad) {
            return Err(DomainError::Validation(
                "criticidad debe ser un número entre 1 y 3".to_string(),
            ));
        }
        Ok(Self {
            tipo_activo,
            presupuesto_base,
            criticidad,
        })
    }

    pub fn tipo_activo(&self) -> AssetKind {
        self.tipo_activo
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetAnalysis {
    pub amortizacion_anos: u32,
    pub coste_mantenimiento_anual: f64,
}

/// Fórmulas presupuestarias, independientes del análisis de activos:
/// amortización por tipo y mantenimiento anual como 10% del presupuesto base
/// ponderado por criticidad (1→1.00, 2→1.15, 3→1.30).
pub fn analyze_budget(input: &BudgetInput) -> BudgetAnalysis {
    let amortizacion_anos = match input.tipo_activo {
        AssetKind::Hw => 5,
        AssetKind::Sw => 3,
        AssetKind::Srv => 0,
    };
    let base = input.presupuesto_base * 0.10;
    let factor = 1.0 + f64::from(input.criticidad - 1) * 0.15;
    BudgetAnalysis {
        amortizacion_anos,
        coste_mantenimiento_anual: round2(base * factor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amortization_by_kind() {
        let hw = BudgetInput::new(AssetKind::Hw, 0.0, 1).unwrap();
        let sw = BudgetInput::new(AssetKind::Sw, 0.0, 1).unwrap();
        let srv = BudgetInput::new(AssetKind::Srv, 0.0, 1).unwrap();
        assert_eq!(analyze_budget(&hw).amortizacion_anos, 5);
        assert_eq!(analyze_budget(&sw).amortizacion_anos, 3);
        assert_eq!(analyze_budget(&srv).amortizacion_anos, 0);
    }

    #[test]
    fn maintenance_is_weighted_by_criticality() {
        let low = BudgetInput::new(AssetKind::Hw, 10_000.0, 1).unwrap();
        let mid = BudgetInput::new(AssetKind::Hw, 10_000.0, 2).unwrap();
        let high = BudgetInput::new(AssetKind::Hw, 10_000.0, 3).unwrap();
        assert_eq!(analyze_budget(&low).coste_mantenimiento_anual, 1000.0);
        assert_eq!(analyze_budget(&mid).coste_mantenimiento_anual, 1150.0);
        assert_eq!(analyze_budget(&high).coste_mantenimiento_anual, 1300.0);
    }

    #[test]
    fn input_validation() {
        assert!(BudgetInput::new(AssetKind::Hw, -1.0, 1).is_err());
        assert!(BudgetInput::new(AssetKind::Hw, 100.0, 0).is_err());
        assert!(BudgetInput::new(AssetKind::Hw, 100.0, 4).is_err());
        assert!("hw".parse::<AssetKind>().is_ok());
        assert!("XX".parse::<AssetKind>().is_err());
    }
}
