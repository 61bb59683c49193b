// src/handlers/garantias.rs

use axum::{Form, extract::State, response::Html};
use serde::Deserialize;
use validator::Validate;

use crate::{
    common::{error::AppError, fechas::FechaCorta},
    config::AppState,
    handlers::limpiar_opcional,
    services::garantias_service::NuevaGarantia,
};

const FORMULARIO: &str = r#"<!DOCTYPE html>
<html lang="es">
<head><meta charset="utf-8"><title>Nueva garantía</title></head>
<body>
  <h1>Nueva garantía</h1>
  <form method="post" action="/garantias">
    <p><label>Teléfono: <input name="telefono" required></label></p>
    <p><label>Producto: <input name="producto" required></label></p>
    <p><label>Placa (opcional): <input name="placa"></label></p>
    <p><label>Fecha de instalación (DD/MM/AAAA): <input name="fecha_instalacion" required></label></p>
    <p><label>Fecha de vencimiento (DD/MM/AAAA): <input name="fecha_vencimiento" required></label></p>
    <p><button type="submit">Registrar</button></p>
  </form>
  <p><a href="/">Volver al panel</a></p>
</body>
</html>"#;

pub async fn formulario() -> Html<&'static str> {
    Html(FORMULARIO)
}

#[derive(Debug, Deserialize, Validate)]
pub struct CrearGarantiaForm {
    #[validate(length(min = 1, message = "el teléfono es obligatorio"))]
    pub telefono: String,
    #[validate(length(min = 1, message = "el producto es obligatorio"))]
    pub producto: String,
    pub placa: Option<String>,
    pub fecha_instalacion: String,
    pub fecha_vencimiento: String,
}

/// POST /garantias: alta de la garantía y envío del certificado PDF.
pub async fn crear(
    State(estado): State<AppState>,
    Form(datos): Form<CrearGarantiaForm>,
) -> Result<Html<String>, AppError> {
    datos.validate()?;

    let instalacion = FechaCorta::parsear(&datos.fecha_instalacion)?;
    let vencimiento = FechaCorta::parsear(&datos.fecha_vencimiento)?;

    let garantia = estado
        .garantias
        .crear(NuevaGarantia {
            telefono: datos.telefono.trim().to_string(),
            producto: datos.producto.trim().to_string(),
            placa: limpiar_opcional(datos.placa),
            instalacion,
            vencimiento,
        })
        .await?;

    Ok(Html(format!(
        "<p>✅ Garantía de {} registrada para {}. Vence el {}.</p>\
         <p><a href=\"/garantias\">Registrar otra</a></p>",
        garantia.producto,
        garantia.telefono,
        FechaCorta(garantia.fecha_vencimiento)
    )))
}
