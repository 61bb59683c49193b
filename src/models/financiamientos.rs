// src/models/financiamientos.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::fechas::FechaCorta;

// Una cuota del plan. Lleva un id generado además del número de orden:
// marcar como pagada se resuelve contra el número pero se persiste por id,
// así dos pantallas abiertas no pisan cuotas distintas por posición.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cuota {
    pub id: Uuid,

    // 1-based, estable desde la creación del plan.
    pub numero: u32,

    pub monto: Decimal,
    pub vence: FechaCorta,
    pub pagada: bool,
}

// El plan de financiamiento completo. Las cuotas viven como lista JSONB
// dentro de la fila, así que este struct no deriva FromRow: el repositorio
// arma la conversión.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Financiamiento {
    pub id: Uuid,

    pub nombre: String,
    pub telefono: String,
    pub documento: String,
    pub placa: Option<String>,

    pub total: Decimal,
    pub inicial: Decimal,

    pub cuotas: Vec<Cuota>,

    pub fecha_inicio: NaiveDate,

    // Siempre coincide con el vencimiento de la última cuota.
    pub fecha_fin: NaiveDate,

    pub creado_en: DateTime<Utc>,
}
