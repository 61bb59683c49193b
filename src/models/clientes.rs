// src/models/clientes.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// El cliente es mínimo a propósito: el teléfono es la llave que lo une
// con garantías, financiamientos e interacciones.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Cliente {
    pub telefono: String,
    pub creado_en: DateTime<Utc>,
    pub ultima_interaccion: DateTime<Utc>,
}

// Bitácora de interacciones: solo se agregan filas.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Interaccion {
    pub id: Uuid,
    pub telefono: String,

    // Etiqueta libre: "difusion", "oferta", "recordatorio_cuota", etc.
    pub tipo: String,
    pub mensaje: String,
    pub oferta: Option<String>,

    pub creado_en: DateTime<Utc>,
}
