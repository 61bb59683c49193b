// src/handlers/mod.rs

pub mod caja;
pub mod difusion;
pub mod financiamientos;
pub mod garantias;
pub mod panel;
pub mod sesion;
pub mod webhook;

use rust_decimal::Decimal;

use crate::common::error::AppError;

/// Los formularios mandan todo como texto; los montos se parsean acá,
/// en el borde, y de ahí para adentro viajan como `Decimal`.
pub(crate) fn parsear_monto(texto: &str) -> Result<Decimal, AppError> {
    texto
        .trim()
        .parse()
        .map_err(|_| AppError::MontoInvalido(texto.trim().to_string()))
}

/// Un campo opcional vacío del formulario cuenta como ausente.
pub(crate) fn limpiar_opcional(valor: Option<String>) -> Option<String> {
    valor
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
