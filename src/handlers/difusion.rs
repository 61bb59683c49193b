// src/handlers/difusion.rs

use axum::{Form, extract::State};
use serde::Deserialize;
use validator::Validate;

use crate::{common::error::AppError, config::AppState, services::difusion::Despachador};

// Texto fijo de la oferta de bienvenida. Cada cliente la recibe una sola
// vez en la vida; la tabla 'ofertas' lleva la cuenta.
const OFERTA_INICIAL: &str = "Hola! Somos tu tienda de autoradios de confianza. \
    Este mes tenemos instalación gratis con la compra de cualquier radio, \
    y financiamiento en cuotas sin tarjeta. Escríbenos si te interesa!";

#[derive(Debug, Deserialize, Validate)]
pub struct DifusionForm {
    #[validate(length(min = 1, message = "el mensaje es obligatorio"))]
    pub mensaje: String,
}

/// POST /difusion: manda el mismo texto a toda la base de clientes.
/// Responde de inmediato; el recorrido corre de fondo porque con la pausa
/// anti-bloqueo una base grande puede tardar horas.
pub async fn difundir(
    State(estado): State<AppState>,
    Form(datos): Form<DifusionForm>,
) -> Result<String, AppError> {
    datos.validate()?;

    let clientes = estado.clientes_repo.listar().await?;
    let telefonos: Vec<String> = clientes.into_iter().map(|c| c.telefono).collect();
    let cantidad = telefonos.len();

    let despachador = estado.despachador.clone();
    let repo = estado.clientes_repo.clone();
    let pausa = estado.ajustes.pausa_difusion;
    let mensaje = datos.mensaje.trim().to_string();

    tokio::spawn(async move {
        let resultados = despachador.difundir(&telefonos, &mensaje, pausa).await;

        let mut exitosos = 0;
        for resultado in &resultados {
            if !resultado.exitoso() {
                continue;
            }
            exitosos += 1;
            if let Err(e) = repo
                .registrar_interaccion(&resultado.telefono, "difusion", &mensaje, None)
                .await
            {
                tracing::warn!("No se pudo registrar la interacción: {}", e);
            }
        }

        tracing::info!("📣 Difusión terminada: {}/{} enviados", exitosos, resultados.len());
    });

    Ok(format!("Difusión iniciada a {} clientes.", cantidad))
}

/// POST /ofertas: manda la oferta de bienvenida a los clientes que todavía
/// no la recibieron, repartiendo la ventana de campaña entre todos.
pub async fn ofertas(State(estado): State<AppState>) -> Result<String, AppError> {
    let pendientes = estado.clientes_repo.sin_oferta().await?;
    let telefonos: Vec<String> = pendientes.into_iter().map(|c| c.telefono).collect();
    let cantidad = telefonos.len();

    if cantidad == 0 {
        return Ok("No hay clientes pendientes de oferta.".to_string());
    }

    let pausa = Despachador::pausa_repartida(estado.ajustes.ventana_ofertas, cantidad);

    let despachador = estado.despachador.clone();
    let repo = estado.clientes_repo.clone();

    tokio::spawn(async move {
        let resultados = despachador.difundir(&telefonos, OFERTA_INICIAL, pausa).await;

        let mut exitosos = 0;
        for resultado in &resultados {
            if !resultado.exitoso() {
                continue;
            }
            exitosos += 1;
            if let Err(e) = repo.marcar_oferta(&resultado.telefono).await {
                tracing::warn!("No se pudo marcar la oferta: {}", e);
            }
            if let Err(e) = repo
                .registrar_interaccion(
                    &resultado.telefono,
                    "oferta",
                    OFERTA_INICIAL,
                    Some("oferta_inicial"),
                )
                .await
            {
                tracing::warn!("No se pudo registrar la interacción: {}", e);
            }
        }

        tracing::info!("🎁 Ofertas terminadas: {}/{} enviadas", exitosos, resultados.len());
    });

    Ok(format!(
        "Ofertas en camino a {} clientes (una cada {} segundos).",
        cantidad,
        pausa.as_secs()
    ))
}
