// src/common/fechas.rs

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::common::error::AppError;

// El formato textual que usa todo el negocio: formularios, mensajes de
// WhatsApp, el archivo de caja. Adentro siempre viaja un NaiveDate;
// el texto DD/MM/AAAA existe solo en los bordes.
const FORMATO: &str = "%d/%m/%Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FechaCorta(pub NaiveDate);

impl FechaCorta {
    pub fn parsear(texto: &str) -> Result<Self, AppError> {
        NaiveDate::parse_from_str(texto.trim(), FORMATO)
            .map(FechaCorta)
            .map_err(|_| AppError::FechaInvalida(texto.to_string()))
    }

    /// La fecha de hoy en la zona horaria del negocio.
    pub fn hoy(offset: FixedOffset) -> Self {
        FechaCorta(Utc::now().with_timezone(&offset).date_naive())
    }

    pub fn mas_dias(self, dias: i64) -> Self {
        FechaCorta(self.0 + Duration::days(dias))
    }
}

impl fmt::Display for FechaCorta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(FORMATO))
    }
}

impl FromStr for FechaCorta {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FechaCorta::parsear(s)
    }
}

// En JSONB (las cuotas) y en los payloads la fecha viaja como texto corto.
impl Serialize for FechaCorta {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for FechaCorta {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let texto = String::deserialize(deserializer)?;
        FechaCorta::parsear(&texto).map_err(|_| {
            de::Error::custom(format!("fecha inválida '{}', se espera DD/MM/AAAA", texto))
        })
    }
}

/// Convierte las horas de desfase configuradas (ej: -5 para Lima) en un
/// FixedOffset de chrono.
pub fn offset_horario(horas: i32) -> FixedOffset {
    if horas >= 0 {
        FixedOffset::east_opt(horas * 3600).unwrap_or_else(|| FixedOffset::east_opt(0).unwrap())
    } else {
        FixedOffset::west_opt(-horas * 3600).unwrap_or_else(|| FixedOffset::east_opt(0).unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsear_y_formatear_es_ida_y_vuelta() {
        for texto in ["01/01/2025", "31/01/2025", "02/03/2025", "29/02/2024"] {
            let fecha = FechaCorta::parsear(texto).unwrap();
            assert_eq!(fecha.to_string(), texto);
        }
    }

    #[test]
    fn rechaza_formatos_ajenos() {
        assert!(FechaCorta::parsear("2025-01-01").is_err());
        assert!(FechaCorta::parsear("32/01/2025").is_err());
        assert!(FechaCorta::parsear("").is_err());
    }

    #[test]
    fn sumar_dias_cruza_meses() {
        let inicio = FechaCorta::parsear("01/01/2025").unwrap();
        assert_eq!(inicio.mas_dias(30).to_string(), "31/01/2025");
        assert_eq!(inicio.mas_dias(60).to_string(), "02/03/2025");
    }

    #[test]
    fn serde_usa_el_texto_corto() {
        let fecha = FechaCorta::parsear("15/08/2025").unwrap();
        let json = serde_json::to_string(&fecha).unwrap();
        assert_eq!(json, "\"15/08/2025\"");
        let de_vuelta: FechaCorta = serde_json::from_str(&json).unwrap();
        assert_eq!(de_vuelta, fecha);
    }
}
