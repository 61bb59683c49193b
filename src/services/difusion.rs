// src/services/difusion.rs

use std::sync::Arc;
use std::time::Duration;

use crate::whatsapp::ChatClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EstadoEnvio {
    Enviado,
    Fallido(String),
}

#[derive(Debug, Clone)]
pub struct ResultadoEnvio {
    pub telefono: String,
    pub estado: EstadoEnvio,
}

impl ResultadoEnvio {
    pub fn exitoso(&self) -> bool {
        matches!(self.estado, EstadoEnvio::Enviado)
    }
}

/// El despachador de mensajes salientes. Todo envío masivo pasa por acá:
/// estrictamente secuencial, nunca en paralelo, con una pausa forzada entre
/// mensajes. La pausa existe solo para no gatillar el anti-spam de la
/// plataforma; es una constante de política, no un algoritmo.
#[derive(Clone)]
pub struct Despachador {
    chat: Arc<dyn ChatClient>,
}

impl Despachador {
    pub fn new(chat: Arc<dyn ChatClient>) -> Self {
        Self { chat }
    }

    /// Reparte una ventana fija de campaña entre todos los destinatarios
    /// (ej: dos horas divididas entre 80 clientes).
    pub fn pausa_repartida(ventana: Duration, cantidad: usize) -> Duration {
        if cantidad == 0 {
            return Duration::ZERO;
        }
        ventana / cantidad as u32
    }

    /// Envía el mismo texto a toda la lista. El fallo de un destinatario
    /// queda registrado en el resultado y no corta el resto del lote.
    /// No hay reintentos: lo que falló, falló.
    ///
    /// La pausa viene inyectada para que los tests corran con Duration::ZERO.
    pub async fn difundir(
        &self,
        telefonos: &[String],
        texto: &str,
        pausa: Duration,
    ) -> Vec<ResultadoEnvio> {
        let mut resultados = Vec::with_capacity(telefonos.len());

        for (indice, telefono) in telefonos.iter().enumerate() {
            let estado = match self.enviar_texto_a(telefono, texto).await {
                Ok(()) => EstadoEnvio::Enviado,
                Err(motivo) => {
                    tracing::warn!("Envío fallido a {}: {}", telefono, motivo);
                    EstadoEnvio::Fallido(motivo)
                }
            };
            resultados.push(ResultadoEnvio {
                telefono: telefono.clone(),
                estado,
            });

            if indice + 1 < telefonos.len() && !pausa.is_zero() {
                tokio::time::sleep(pausa).await;
            }
        }

        resultados
    }

    /// Envío individual: resuelve el chat id y manda el texto.
    pub async fn enviar_texto_a(&self, telefono: &str, texto: &str) -> Result<(), String> {
        let chat_id = self
            .chat
            .resolver_chat_id(telefono)
            .await
            .map_err(|e| e.to_string())?
            .ok_or_else(|| format!("el número {} no está en WhatsApp", telefono))?;

        self.chat
            .enviar_texto(&chat_id, texto)
            .await
            .map_err(|e| e.to_string())
    }

    /// Envío individual de un documento (el PDF de contrato o garantía).
    pub async fn enviar_documento_a(
        &self,
        telefono: &str,
        nombre: &str,
        contenido: &[u8],
        leyenda: &str,
    ) -> Result<(), String> {
        let chat_id = self
            .chat
            .resolver_chat_id(telefono)
            .await
            .map_err(|e| e.to_string())?
            .ok_or_else(|| format!("el número {} no está en WhatsApp", telefono))?;

        self.chat
            .enviar_archivo(&chat_id, nombre, contenido, "application/pdf", Some(leyenda))
            .await
            .map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::whatsapp::EstadoSesion;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    // Doble de prueba del gateway: registra lo enviado y simula números
    // que no existen en WhatsApp.
    struct ChatDePrueba {
        enviados: Mutex<Vec<(String, String)>>,
        sin_whatsapp: Vec<String>,
    }

    impl ChatDePrueba {
        fn nuevo(sin_whatsapp: &[&str]) -> Self {
            Self {
                enviados: Mutex::new(Vec::new()),
                sin_whatsapp: sin_whatsapp.iter().map(|s| s.to_string()).collect(),
            }
        }
    }

    #[async_trait]
    impl ChatClient for ChatDePrueba {
        async fn resolver_chat_id(&self, telefono: &str) -> anyhow::Result<Option<String>> {
            if self.sin_whatsapp.iter().any(|t| t == telefono) {
                return Ok(None);
            }
            Ok(Some(format!("{}@c.us", telefono)))
        }

        async fn enviar_texto(&self, chat_id: &str, texto: &str) -> anyhow::Result<()> {
            self.enviados
                .lock()
                .await
                .push((chat_id.to_string(), texto.to_string()));
            Ok(())
        }

        async fn enviar_archivo(
            &self,
            chat_id: &str,
            nombre: &str,
            _contenido: &[u8],
            _mime: &str,
            _leyenda: Option<&str>,
        ) -> anyhow::Result<()> {
            self.enviados
                .lock()
                .await
                .push((chat_id.to_string(), format!("[archivo] {}", nombre)));
            Ok(())
        }

        async fn estado(&self) -> anyhow::Result<EstadoSesion> {
            Ok(EstadoSesion::Conectada)
        }

        async fn codigo_qr(&self) -> anyhow::Result<Option<String>> {
            Ok(None)
        }

        async fn reiniciar(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn lote_con_un_fallo_conserva_orden_y_largo() {
        let chat = Arc::new(ChatDePrueba::nuevo(&["999111222"]));
        let despachador = Despachador::new(chat.clone());

        let telefonos: Vec<String> = ["111", "999111222", "333", "444"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let resultados = despachador
            .difundir(&telefonos, "Hola!", Duration::ZERO)
            .await;

        assert_eq!(resultados.len(), 4);
        let fallidos: Vec<&ResultadoEnvio> =
            resultados.iter().filter(|r| !r.exitoso()).collect();
        assert_eq!(fallidos.len(), 1);
        assert_eq!(fallidos[0].telefono, "999111222");

        // el orden de entrada se conserva
        let orden: Vec<&str> = resultados.iter().map(|r| r.telefono.as_str()).collect();
        assert_eq!(orden, vec!["111", "999111222", "333", "444"]);

        // los otros tres sí salieron
        assert_eq!(chat.enviados.lock().await.len(), 3);
    }

    #[tokio::test]
    async fn lote_vacio_no_envia_nada() {
        let chat = Arc::new(ChatDePrueba::nuevo(&[]));
        let despachador = Despachador::new(chat.clone());
        let resultados = despachador.difundir(&[], "Hola!", Duration::ZERO).await;
        assert!(resultados.is_empty());
        assert!(chat.enviados.lock().await.is_empty());
    }

    #[test]
    fn pausa_repartida_divide_la_ventana() {
        let dos_horas = Duration::from_secs(2 * 60 * 60);
        assert_eq!(
            Despachador::pausa_repartida(dos_horas, 80),
            Duration::from_secs(90)
        );
        assert_eq!(Despachador::pausa_repartida(dos_horas, 0), Duration::ZERO);
    }
}
