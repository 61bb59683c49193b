// src/handlers/caja.rs

use axum::{
    Form,
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse},
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    common::{error::AppError, fechas::FechaCorta},
    config::AppState,
    handlers::parsear_monto,
    models::caja::{Movimiento, Periodo, TipoMovimiento},
};

const FORMULARIO: &str = r#"<!DOCTYPE html>
<html lang="es">
<head><meta charset="utf-8"><title>Caja</title></head>
<body>
  <h1>Registrar movimiento de caja</h1>
  <form method="post" action="/caja">
    <p><label>Fecha (DD/MM/AAAA, vacío = hoy): <input name="fecha"></label></p>
    <p><label>Tipo:
      <select name="tipo">
        <option value="Venta">Venta</option>
        <option value="Gasto">Gasto</option>
      </select>
    </label></p>
    <p><label>Descripción: <input name="descripcion" required></label></p>
    <p><label>Monto: <input name="monto" required></label></p>
    <p><label>Moneda (vacío = PEN): <input name="moneda"></label></p>
    <p><button type="submit">Anotar</button></p>
  </form>
  <p>
    <a href="/caja/reporte?periodo=dia">Reporte del día</a> |
    <a href="/caja/reporte?periodo=semana">semana</a> |
    <a href="/caja/reporte?periodo=mes">mes</a> |
    <a href="/caja/export">Descargar CSV</a>
  </p>
  <p><a href="/">Volver al panel</a></p>
</body>
</html>"#;

pub async fn formulario() -> Html<&'static str> {
    Html(FORMULARIO)
}

#[derive(Debug, Deserialize, Validate)]
pub struct MovimientoForm {
    pub fecha: Option<String>,
    pub tipo: String,
    #[validate(length(min = 1, message = "la descripción es obligatoria"))]
    pub descripcion: String,
    pub monto: String,
    pub moneda: Option<String>,
}

/// POST /caja: anota una fila al final del archivo.
pub async fn registrar(
    State(estado): State<AppState>,
    Form(datos): Form<MovimientoForm>,
) -> Result<Html<String>, AppError> {
    datos.validate()?;

    let fecha = match datos.fecha.as_deref().map(str::trim) {
        Some(texto) if !texto.is_empty() => FechaCorta::parsear(texto)?,
        _ => FechaCorta::hoy(estado.ajustes.offset),
    };
    let tipo = TipoMovimiento::parsear(&datos.tipo)
        .ok_or_else(|| AppError::CampoFaltante("tipo (Venta o Gasto)".to_string()))?;
    let monto = parsear_monto(&datos.monto)?;
    let moneda = datos
        .moneda
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| "PEN".to_string());

    let movimiento = Movimiento {
        fecha,
        tipo,
        descripcion: datos.descripcion.trim().to_string(),
        monto,
        moneda,
    };
    estado.caja.registrar(&movimiento)?;

    Ok(Html(format!(
        "<p>✅ {} de {:.2} anotado con fecha {}.</p><p><a href=\"/caja\">Volver a la caja</a></p>",
        movimiento.tipo.como_texto(),
        movimiento.monto,
        movimiento.fecha
    )))
}

#[derive(Debug, Deserialize)]
pub struct ReporteQuery {
    pub periodo: Option<String>,
}

/// GET /caja/reporte?periodo=dia|semana|mes
pub async fn reporte(
    State(estado): State<AppState>,
    Query(consulta): Query<ReporteQuery>,
) -> Result<Html<String>, AppError> {
    let texto = consulta.periodo.unwrap_or_else(|| "dia".to_string());
    let periodo = Periodo::parsear(&texto)
        .ok_or_else(|| AppError::CampoFaltante("periodo (dia, semana o mes)".to_string()))?;

    let hoy = FechaCorta::hoy(estado.ajustes.offset);
    let reporte = estado.caja.reporte(periodo, hoy)?;

    Ok(Html(format!(
        "<h1>Reporte de caja ({})</h1>\
         <ul>\
           <li>Ventas: {:.2}</li>\
           <li>Gastos: {:.2}</li>\
           <li>Balance: {:.2}</li>\
           <li>Movimientos: {}</li>\
         </ul>\
         <p><a href=\"/caja\">Volver a la caja</a></p>",
        texto.trim(),
        reporte.ventas,
        reporte.gastos,
        reporte.balance,
        reporte.cantidad
    )))
}

/// GET /caja/export: descarga la caja completa como CSV.
pub async fn exportar(State(estado): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let csv = estado.caja.exportar_csv()?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"caja.csv\"",
            ),
        ],
        csv,
    ))
}
