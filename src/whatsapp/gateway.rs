// src/whatsapp/gateway.rs

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

use super::{ChatClient, EstadoSesion};

/// Implementación de `ChatClient` contra el gateway HTTP que mantiene la
/// sesión real de WhatsApp. Una sola sesión viva a la vez; el gateway se
/// encarga del emparejamiento y de reconectar.
#[derive(Clone)]
pub struct GatewayWhatsApp {
    http: reqwest::Client,
    base: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct RespuestaContacto {
    #[serde(rename = "chatId")]
    chat_id: String,
}

#[derive(Deserialize)]
struct RespuestaEstado {
    estado: String,
}

#[derive(Deserialize)]
struct RespuestaQr {
    qr: Option<String>,
}

impl GatewayWhatsApp {
    pub fn new(base: String, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: base.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn url(&self, camino: &str) -> String {
        format!("{}{}", self.base, camino)
    }

    fn con_clave(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(clave) => req.header("X-Api-Key", clave),
            None => req,
        }
    }
}

#[async_trait]
impl ChatClient for GatewayWhatsApp {
    async fn resolver_chat_id(&self, telefono: &str) -> anyhow::Result<Option<String>> {
        let respuesta = self
            .con_clave(self.http.get(self.url(&format!("/api/contactos/{}", telefono))))
            .send()
            .await?;

        // 404 significa "ese número no está en WhatsApp", no es un error.
        if respuesta.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let contacto: RespuestaContacto = respuesta.error_for_status()?.json().await?;
        Ok(Some(contacto.chat_id))
    }

    async fn enviar_texto(&self, chat_id: &str, texto: &str) -> anyhow::Result<()> {
        self.con_clave(self.http.post(self.url("/api/mensajes/texto")))
            .json(&json!({ "chatId": chat_id, "texto": texto }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn enviar_archivo(
        &self,
        chat_id: &str,
        nombre: &str,
        contenido: &[u8],
        mime: &str,
        leyenda: Option<&str>,
    ) -> anyhow::Result<()> {
        let parte = reqwest::multipart::Part::bytes(contenido.to_vec())
            .file_name(nombre.to_string())
            .mime_str(mime)?;

        let mut formulario = reqwest::multipart::Form::new()
            .text("chatId", chat_id.to_string())
            .part("archivo", parte);

        if let Some(texto) = leyenda {
            formulario = formulario.text("leyenda", texto.to_string());
        }

        self.con_clave(self.http.post(self.url("/api/mensajes/archivo")))
            .multipart(formulario)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn estado(&self) -> anyhow::Result<EstadoSesion> {
        let respuesta: RespuestaEstado = self
            .con_clave(self.http.get(self.url("/api/sesion/estado")))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let estado = match respuesta.estado.as_str() {
            "conectada" => EstadoSesion::Conectada,
            "esperando_qr" => EstadoSesion::EsperandoQr,
            _ => EstadoSesion::Desconectada,
        };
        Ok(estado)
    }

    async fn codigo_qr(&self) -> anyhow::Result<Option<String>> {
        let respuesta: RespuestaQr = self
            .con_clave(self.http.get(self.url("/api/sesion/qr")))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(respuesta.qr)
    }

    async fn reiniciar(&self) -> anyhow::Result<()> {
        self.con_clave(self.http.post(self.url("/api/sesion/reiniciar")))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
