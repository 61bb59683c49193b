// src/scheduler.rs

use std::future::Future;
use std::time::Duration;

use chrono::{FixedOffset, Utc};
use croner::Cron;

use crate::config::AppState;

// Horarios fijos del negocio, en la zona horaria configurada:
// cuotas a las 08:00 y garantías a las 09:00, todos los días.
const CRON_CUOTAS: &str = "0 8 * * *";
const CRON_GARANTIAS: &str = "0 9 * * *";

/// Lanza los dos trabajos diarios como tareas de fondo.
pub fn lanzar(estado: AppState) {
    let offset = estado.ajustes.offset;

    {
        let estado = estado.clone();
        tokio::spawn(async move {
            correr_diario("recordatorio de cuotas", CRON_CUOTAS, offset, move || {
                let recordatorios = estado.recordatorios.clone();
                async move {
                    match recordatorios.recordar_cuotas().await {
                        Ok(enviados) => {
                            tracing::info!("Recordatorio de cuotas: {} avisos enviados", enviados)
                        }
                        Err(e) => tracing::error!("Recordatorio de cuotas falló: {}", e),
                    }
                }
            })
            .await;
        });
    }

    {
        let estado = estado.clone();
        tokio::spawn(async move {
            correr_diario("recordatorio de garantías", CRON_GARANTIAS, offset, move || {
                let recordatorios = estado.recordatorios.clone();
                async move {
                    match recordatorios.recordar_garantias().await {
                        Ok(enviados) => {
                            tracing::info!("Recordatorio de garantías: {} avisos enviados", enviados)
                        }
                        Err(e) => tracing::error!("Recordatorio de garantías falló: {}", e),
                    }
                }
            })
            .await;
        });
    }

    tracing::info!("⏰ Trabajos diarios programados ({} y {})", CRON_CUOTAS, CRON_GARANTIAS);
}

/// Duerme hasta la próxima ocurrencia de la expresión cron y corre la tarea,
/// para siempre. El cálculo se hace en la zona horaria del negocio.
async fn correr_diario<F, Fut>(nombre: &str, expresion: &str, offset: FixedOffset, tarea: F)
where
    F: Fn() -> Fut,
    Fut: Future<Output = ()>,
{
    let cron: Cron = match expresion.parse() {
        Ok(cron) => cron,
        Err(e) => {
            tracing::error!("Expresión cron inválida '{}': {}", expresion, e);
            return;
        }
    };

    loop {
        let ahora = Utc::now().with_timezone(&offset);
        let proxima = match cron.find_next_occurrence(&ahora, false) {
            Ok(proxima) => proxima,
            Err(e) => {
                tracing::error!("Sin próxima ocurrencia para '{}': {}", expresion, e);
                return;
            }
        };

        let espera = (proxima - ahora).to_std().unwrap_or(Duration::ZERO);
        tracing::info!("⏰ {} programado para {}", nombre, proxima);
        tokio::time::sleep(espera).await;

        tarea().await;
    }
}
