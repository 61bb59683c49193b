// src/whatsapp/mod.rs

pub mod gateway;

pub use gateway::GatewayWhatsApp;

use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EstadoSesion {
    Conectada,
    EsperandoQr,
    Desconectada,
}

impl EstadoSesion {
    pub fn como_texto(&self) -> &'static str {
        match self {
            EstadoSesion::Conectada => "conectada",
            EstadoSesion::EsperandoQr => "esperando QR",
            EstadoSesion::Desconectada => "desconectada",
        }
    }
}

/// El contrato angosto contra la sesión de WhatsApp. El protocolo de la
/// plataforma y el manejo de la sesión viven del otro lado del gateway;
/// acá solo consumimos operaciones puntuales.
///
/// La sesión se inyecta como `Arc<dyn ChatClient>` a través del AppState:
/// nada de globales mutables.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Resuelve un número crudo al identificador de chat de la plataforma.
    /// Devuelve None cuando el número no existe en WhatsApp.
    async fn resolver_chat_id(&self, telefono: &str) -> anyhow::Result<Option<String>>;

    async fn enviar_texto(&self, chat_id: &str, texto: &str) -> anyhow::Result<()>;

    async fn enviar_archivo(
        &self,
        chat_id: &str,
        nombre: &str,
        contenido: &[u8],
        mime: &str,
        leyenda: Option<&str>,
    ) -> anyhow::Result<()>;

    async fn estado(&self) -> anyhow::Result<EstadoSesion>;

    /// Texto del QR de emparejamiento, si la sesión lo está esperando.
    async fn codigo_qr(&self) -> anyhow::Result<Option<String>>;

    /// Tumba la sesión y borra las credenciales guardadas en el gateway.
    /// Después de esto hace falta escanear un QR nuevo.
    async fn reiniciar(&self) -> anyhow::Result<()>;
}
