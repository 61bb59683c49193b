// src/handlers/webhook.rs

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::{common::error::AppError, config::AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MensajeEntrante {
    pub telefono: String,
    pub mensaje: String,
}

/// POST /webhook/mensaje: el gateway nos avisa de cada mensaje entrante.
/// Alta implícita del cliente + upsert del interés de marketing.
pub async fn mensaje(
    State(estado): State<AppState>,
    Json(datos): Json<MensajeEntrante>,
) -> Result<&'static str, AppError> {
    let telefono = datos.telefono.trim();
    if telefono.is_empty() {
        return Err(AppError::CampoFaltante("telefono".to_string()));
    }

    estado
        .clientes
        .mensaje_entrante(telefono, datos.mensaje.trim())
        .await?;

    Ok("ok")
}
