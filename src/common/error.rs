// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

// Nuestro tipo de error, con `thiserror` para mejor ergonomía.
// Las respuestas al navegador son texto plano: los formularios de la tienda
// no esperan JSON estructurado.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de validación")]
    Validacion(#[from] validator::ValidationErrors),

    #[error("Falta el campo '{0}'")]
    CampoFaltante(String),

    #[error("Fecha inválida: '{0}' (se espera DD/MM/AAAA)")]
    FechaInvalida(String),

    #[error("Monto inválido: '{0}'")]
    MontoInvalido(String),

    #[error("{0}")]
    NoEncontrado(String),

    #[error("La cuota {numero} no existe: el plan tiene {total} cuotas")]
    CuotaFueraDeRango { numero: u32, total: usize },

    // Variante para errores de base de datos
    #[error("Error de base de datos")]
    Database(#[from] sqlx::Error),

    #[error("Error del gateway de WhatsApp")]
    Gateway(#[from] reqwest::Error),

    #[error("Error de serialización")]
    Serde(#[from] serde_json::Error),

    #[error("Fuente no encontrada: {0}")]
    FuenteNoEncontrada(String),

    #[error("Error generando el PDF: {0}")]
    Pdf(String),

    // La caja es un archivo plano; cualquier problema de disco cae aquí.
    #[error("Error de E/S en la caja")]
    Io(#[from] std::io::Error),

    // Variante genérica para cualquier otro error inesperado.
    // `anyhow::Error` es ideal para capturar el contexto del error.
    #[error("Error interno del servidor")]
    Interno(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, mensaje) = match &self {
            AppError::Validacion(errores) => {
                // Juntamos todos los mensajes de los campos en una sola línea.
                let detalles: Vec<String> = errores
                    .field_errors()
                    .iter()
                    .map(|(campo, lista)| {
                        let textos: Vec<String> = lista
                            .iter()
                            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                            .collect();
                        format!("{}: {}", campo, textos.join(", "))
                    })
                    .collect();
                let cuerpo = format!("Datos inválidos. {}", detalles.join(" | "));
                return (StatusCode::BAD_REQUEST, cuerpo).into_response();
            }
            AppError::CampoFaltante(_)
            | AppError::FechaInvalida(_)
            | AppError::MontoInvalido(_)
            | AppError::CuotaFueraDeRango { .. } => (StatusCode::BAD_REQUEST, self.to_string()),

            AppError::NoEncontrado(_) => (StatusCode::NOT_FOUND, self.to_string()),

            // Todo lo demás (Database, Gateway, Pdf, Io...) se vuelve un 500.
            // El `tracing` deja registrado el detalle que `thiserror` nos dio.
            otro => {
                tracing::error!("Error interno del servidor: {otro:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocurrió un error inesperado.".to_string(),
                )
            }
        };

        (status, mensaje).into_response()
    }
}
