// src/handlers/panel.rs

use axum::{extract::State, response::Html};

use crate::{common::error::AppError, config::AppState};

/// GET /: el panel de la tienda. Conteos rápidos y el estado de la sesión,
/// con enlaces a los formularios.
pub async fn panel(State(estado): State<AppState>) -> Result<Html<String>, AppError> {
    let clientes = estado.clientes_repo.contar().await?;
    let garantias = estado.garantias_repo.contar().await?;
    let financiamientos = estado.financiamientos_repo.contar().await?;

    // Si el gateway está caído el panel igual carga.
    let sesion = match estado.chat.estado().await {
        Ok(estado_sesion) => estado_sesion.como_texto().to_string(),
        Err(e) => {
            tracing::warn!("No se pudo consultar la sesión: {}", e);
            "sin conexión con el gateway".to_string()
        }
    };

    Ok(Html(format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head><meta charset="utf-8"><title>Panel</title></head>
<body>
  <h1>Panel de la tienda</h1>
  <ul>
    <li>Clientes: {clientes}</li>
    <li>Garantías: {garantias}</li>
    <li>Financiamientos: {financiamientos}</li>
    <li>Sesión de WhatsApp: {sesion}</li>
  </ul>
  <ul>
    <li><a href="/financiamientos">Nuevo financiamiento</a></li>
    <li><a href="/garantias">Nueva garantía</a></li>
    <li><a href="/caja">Caja</a></li>
    <li><a href="/sesion/qr">QR de emparejamiento</a></li>
  </ul>
</body>
</html>"#
    )))
}
