// src/handlers/sesion.rs

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use image::Luma;
use qrcode::QrCode;

use crate::{common::error::AppError, config::AppState};

/// GET /sesion/qr: el QR de emparejamiento como PNG, para escanearlo desde
/// el navegador. El gateway entrega el texto; acá solo lo dibujamos.
pub async fn qr(State(estado): State<AppState>) -> Result<Response, AppError> {
    let codigo = estado.chat.codigo_qr().await?;

    let Some(codigo) = codigo else {
        return Err(AppError::NoEncontrado(
            "La sesión no está esperando emparejamiento.".to_string(),
        ));
    };

    let qr = QrCode::new(codigo.as_bytes())
        .map_err(|e| AppError::Interno(anyhow::anyhow!("no se pudo generar el QR: {}", e)))?;
    let imagen = qr.render::<Luma<u8>>().min_dimensions(300, 300).build();

    let mut png: Vec<u8> = Vec::new();
    image::DynamicImage::ImageLuma8(imagen)
        .write_to(&mut png, image::ImageOutputFormat::Png)
        .map_err(|e| AppError::Interno(anyhow::anyhow!("no se pudo codificar el PNG: {}", e)))?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}

/// POST /sesion/reiniciar: tumba la sesión del gateway. Después hay que
/// escanear un QR nuevo en /sesion/qr.
pub async fn reiniciar(State(estado): State<AppState>) -> Result<String, AppError> {
    estado.chat.reiniciar().await?;
    tracing::info!("🔄 Sesión de WhatsApp reiniciada a pedido");
    Ok("Sesión reiniciada. Escanea el QR nuevo en /sesion/qr.".to_string())
}
