// src/handlers/financiamientos.rs

use axum::{
    Form,
    extract::{Query, State},
    response::Html,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::{
    common::{error::AppError, fechas::FechaCorta},
    config::AppState,
    handlers::{limpiar_opcional, parsear_monto},
    services::financiamientos_service::{NuevoPlan, inicial_por_defecto},
};

// Formulario mínimo para usar desde el celular de la tienda.
const FORMULARIO: &str = r#"<!DOCTYPE html>
<html lang="es">
<head><meta charset="utf-8"><title>Nuevo financiamiento</title></head>
<body>
  <h1>Nuevo financiamiento</h1>
  <form method="post" action="/financiamientos">
    <p><label>Nombre: <input name="nombre" required></label></p>
    <p><label>Teléfono: <input name="telefono" required></label></p>
    <p><label>Documento: <input name="documento" required></label></p>
    <p><label>Placa (opcional): <input name="placa"></label></p>
    <p><label>Total: <input name="total" required></label></p>
    <p><label>Inicial (vacío = 350): <input name="inicial"></label></p>
    <p><label>Cuotas: <input name="cuotas" type="number" min="1" required></label></p>
    <p><label>Fecha de inicio (DD/MM/AAAA): <input name="fecha_inicio" required></label></p>
    <p><button type="submit">Registrar</button></p>
  </form>
  <p><a href="/">Volver al panel</a></p>
</body>
</html>"#;

pub async fn formulario() -> Html<&'static str> {
    Html(FORMULARIO)
}

#[derive(Debug, Deserialize, Validate)]
pub struct CrearFinanciamientoForm {
    #[validate(length(min = 1, message = "el nombre es obligatorio"))]
    pub nombre: String,
    #[validate(length(min = 1, message = "el teléfono es obligatorio"))]
    pub telefono: String,
    #[validate(length(min = 1, message = "el documento es obligatorio"))]
    pub documento: String,
    pub placa: Option<String>,
    pub total: String,
    pub inicial: Option<String>,
    pub cuotas: u32,
    pub fecha_inicio: String,
}

/// POST /financiamientos: valida, parsea los montos y la fecha en el borde
/// y delega el alta (insert + contrato PDF) al servicio.
pub async fn crear(
    State(estado): State<AppState>,
    Form(datos): Form<CrearFinanciamientoForm>,
) -> Result<Html<String>, AppError> {
    datos.validate()?;

    let total = parsear_monto(&datos.total)?;
    let inicial = match limpiar_opcional(datos.inicial.clone()) {
        Some(texto) => parsear_monto(&texto)?,
        None => inicial_por_defecto(),
    };
    let inicio = FechaCorta::parsear(&datos.fecha_inicio)?;

    let plan = estado
        .financiamientos
        .crear_plan(NuevoPlan {
            nombre: datos.nombre.trim().to_string(),
            telefono: datos.telefono.trim().to_string(),
            documento: datos.documento.trim().to_string(),
            placa: limpiar_opcional(datos.placa),
            total,
            inicial,
            cantidad_cuotas: datos.cuotas,
            inicio,
        })
        .await?;

    let monto_cuota = plan.cuotas.first().map(|c| c.monto).unwrap_or(Decimal::ZERO);
    Ok(Html(format!(
        "<p>✅ Financiamiento creado para {}: {} cuotas de {:.2}, última el {}.</p>\
         <p><a href=\"/financiamientos\">Registrar otro</a></p>",
        plan.nombre,
        plan.cuotas.len(),
        monto_cuota,
        FechaCorta(plan.fecha_fin)
    )))
}

#[derive(Debug, Deserialize, Validate)]
pub struct PagarCuotaForm {
    #[validate(length(min = 1, message = "el teléfono es obligatorio"))]
    pub telefono: String,
    pub cuota: u32,
}

/// POST /financiamientos/pagar: marca una cuota del plan más reciente del
/// teléfono como pagada. Idempotente del lado del servicio.
pub async fn pagar(
    State(estado): State<AppState>,
    Form(datos): Form<PagarCuotaForm>,
) -> Result<Html<String>, AppError> {
    datos.validate()?;

    let (plan, cuota) = estado
        .financiamientos
        .marcar_cuota(datos.telefono.trim(), datos.cuota)
        .await?;

    let pendientes = plan.cuotas.iter().filter(|c| !c.pagada).count();
    Ok(Html(format!(
        "<p>✅ Cuota N° {} de {} marcada como pagada ({:.2}). Quedan {} pendientes.</p>",
        cuota.numero, plan.nombre, cuota.monto, pendientes
    )))
}

#[derive(Debug, Deserialize)]
pub struct BusquedaQuery {
    pub q: String,
}

/// GET /financiamientos/buscar?q=: búsqueda exacta por teléfono o documento.
pub async fn buscar(
    State(estado): State<AppState>,
    Query(consulta): Query<BusquedaQuery>,
) -> Result<Html<String>, AppError> {
    let q = consulta.q.trim();
    if q.is_empty() {
        return Err(AppError::CampoFaltante("q".to_string()));
    }

    let planes = estado.financiamientos.buscar(q).await?;

    let mut cuerpo = format!("<h1>Financiamientos de '{}'</h1>", q);
    for plan in &planes {
        cuerpo.push_str(&format!(
            "<h2>{} — total {:.2}, inicial {:.2}</h2><ul>",
            plan.nombre, plan.total, plan.inicial
        ));
        for cuota in &plan.cuotas {
            let estado_cuota = if cuota.pagada { "pagada" } else { "pendiente" };
            cuerpo.push_str(&format!(
                "<li>Cuota N° {}: {:.2}, vence {} ({})</li>",
                cuota.numero, cuota.monto, cuota.vence, estado_cuota
            ));
        }
        cuerpo.push_str("</ul>");
    }

    Ok(Html(cuerpo))
}
