// src/models/garantias.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Garantia {
    pub id: Uuid,
    pub telefono: String,

    pub producto: String,

    // La placa es opcional: no toda instalación va sobre un vehículo propio.
    pub placa: Option<String>,

    pub fecha_instalacion: NaiveDate,
    pub fecha_vencimiento: NaiveDate,

    pub creado_en: DateTime<Utc>,
}
