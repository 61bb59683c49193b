// src/services/recordatorios.rs

use std::time::Duration;

use chrono::FixedOffset;
use rust_decimal::Decimal;

use crate::{
    common::{error::AppError, fechas::FechaCorta},
    db::{ClientesRepository, FinanciamientosRepository, GarantiasRepository},
    models::{financiamientos::Financiamiento, garantias::Garantia},
    services::difusion::Despachador,
};

/// Los dos trabajos diarios: avisar garantías que vencen en una semana y
/// cuotas que vencen hoy. Los dos son de mejor esfuerzo: el fallo con un
/// destinatario se loguea y el recorrido sigue.
#[derive(Clone)]
pub struct RecordatoriosService {
    garantias: GarantiasRepository,
    financiamientos: FinanciamientosRepository,
    clientes: ClientesRepository,
    despachador: Despachador,
    offset: FixedOffset,
    pausa: Duration,
}

/// Una cuota que hay que avisar hoy, con lo justo para armar el mensaje.
#[derive(Debug, Clone, PartialEq)]
pub struct AvisoCuota {
    pub telefono: String,
    pub nombre: String,
    pub numero: u32,
    pub monto: Decimal,
    pub vence: FechaCorta,
}

/// Garantías cuyo vencimiento cae exactamente en la fecha objetivo.
/// Igualdad exacta: ni un día antes, ni un día después.
pub fn garantias_que_vencen(garantias: &[Garantia], objetivo: FechaCorta) -> Vec<&Garantia> {
    garantias
        .iter()
        .filter(|g| g.fecha_vencimiento == objetivo.0)
        .collect()
}

/// Recorre planes × cuotas y junta las cuotas impagas que vencen hoy.
/// Es O(planes × cuotas) sin índice por fecha; con el volumen del negocio
/// alcanza de sobra.
pub fn cuotas_que_vencen(planes: &[Financiamiento], hoy: FechaCorta) -> Vec<AvisoCuota> {
    let mut avisos = Vec::new();
    for plan in planes {
        for cuota in &plan.cuotas {
            if !cuota.pagada && cuota.vence == hoy {
                avisos.push(AvisoCuota {
                    telefono: plan.telefono.clone(),
                    nombre: plan.nombre.clone(),
                    numero: cuota.numero,
                    monto: cuota.monto,
                    vence: cuota.vence,
                });
            }
        }
    }
    avisos
}

impl RecordatoriosService {
    pub fn new(
        garantias: GarantiasRepository,
        financiamientos: FinanciamientosRepository,
        clientes: ClientesRepository,
        despachador: Despachador,
        offset: FixedOffset,
        pausa: Duration,
    ) -> Self {
        Self {
            garantias,
            financiamientos,
            clientes,
            despachador,
            offset,
            pausa,
        }
    }

    /// Aviso de garantías: hoy + 7 días, igualdad exacta de fecha.
    pub async fn recordar_garantias(&self) -> Result<usize, AppError> {
        let hoy = FechaCorta::hoy(self.offset);
        let objetivo = hoy.mas_dias(7);

        let todas = self.garantias.listar().await?;
        let por_avisar = garantias_que_vencen(&todas, objetivo);
        tracing::info!(
            "Recordatorio de garantías: {} por avisar (vencen el {})",
            por_avisar.len(),
            objetivo
        );

        let mut enviados = 0;
        for (indice, garantia) in por_avisar.iter().enumerate() {
            let texto = format!(
                "Hola! Tu garantía de {} vence el {}. Si notas alguna falla, \
                 escríbenos antes de esa fecha para revisarla sin costo.",
                garantia.producto,
                FechaCorta(garantia.fecha_vencimiento)
            );

            match self.despachador.enviar_texto_a(&garantia.telefono, &texto).await {
                Ok(()) => {
                    enviados += 1;
                    if let Err(e) = self
                        .clientes
                        .registrar_interaccion(&garantia.telefono, "recordatorio_garantia", &texto, None)
                        .await
                    {
                        tracing::warn!("No se pudo registrar la interacción: {}", e);
                    }
                }
                Err(motivo) => {
                    tracing::warn!("Aviso de garantía fallido a {}: {}", garantia.telefono, motivo)
                }
            }

            if indice + 1 < por_avisar.len() && !self.pausa.is_zero() {
                tokio::time::sleep(self.pausa).await;
            }
        }

        Ok(enviados)
    }

    /// Aviso de cuotas que vencen hoy.
    pub async fn recordar_cuotas(&self) -> Result<usize, AppError> {
        let hoy = FechaCorta::hoy(self.offset);

        let planes = self.financiamientos.listar_todos().await?;
        let avisos = cuotas_que_vencen(&planes, hoy);
        tracing::info!("Recordatorio de cuotas: {} vencen hoy {}", avisos.len(), hoy);

        let mut enviados = 0;
        for (indice, aviso) in avisos.iter().enumerate() {
            let texto = format!(
                "Hola {}! Te recordamos que hoy {} vence tu cuota N° {} de {:.2}. \
                 Puedes acercarte a la tienda o hacer el pago por transferencia.",
                aviso.nombre, aviso.vence, aviso.numero, aviso.monto
            );

            match self.despachador.enviar_texto_a(&aviso.telefono, &texto).await {
                Ok(()) => {
                    enviados += 1;
                    if let Err(e) = self
                        .clientes
                        .registrar_interaccion(&aviso.telefono, "recordatorio_cuota", &texto, None)
                        .await
                    {
                        tracing::warn!("No se pudo registrar la interacción: {}", e);
                    }
                }
                Err(motivo) => {
                    tracing::warn!("Aviso de cuota fallido a {}: {}", aviso.telefono, motivo)
                }
            }

            if indice + 1 < avisos.len() && !self.pausa.is_zero() {
                tokio::time::sleep(self.pausa).await;
            }
        }

        Ok(enviados)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    use crate::models::financiamientos::Cuota;

    fn fecha(texto: &str) -> FechaCorta {
        FechaCorta::parsear(texto).unwrap()
    }

    fn garantia(telefono: &str, vencimiento: &str) -> Garantia {
        Garantia {
            id: Uuid::new_v4(),
            telefono: telefono.to_string(),
            producto: "Radio Pioneer".to_string(),
            placa: None,
            fecha_instalacion: fecha("01/01/2025").0,
            fecha_vencimiento: fecha(vencimiento).0,
            creado_en: Utc::now(),
        }
    }

    fn cuota(numero: u32, vence: &str, pagada: bool) -> Cuota {
        Cuota {
            id: Uuid::new_v4(),
            numero,
            monto: "325.00".parse().unwrap(),
            vence: fecha(vence),
            pagada,
        }
    }

    fn plan(telefono: &str, cuotas: Vec<Cuota>) -> Financiamiento {
        Financiamiento {
            id: Uuid::new_v4(),
            nombre: "Juan Pérez".to_string(),
            telefono: telefono.to_string(),
            documento: "12345678".to_string(),
            placa: None,
            total: "1000".parse().unwrap(),
            inicial: "350".parse().unwrap(),
            cuotas,
            fecha_inicio: fecha("01/01/2025").0,
            fecha_fin: fecha("02/03/2025").0,
            creado_en: Utc::now(),
        }
    }

    #[test]
    fn garantia_a_siete_dias_dispara_exactamente_una_vez() {
        let hoy = fecha("10/08/2025");
        let objetivo = hoy.mas_dias(7); // 17/08/2025

        let garantias = vec![
            garantia("111", "16/08/2025"), // un día antes: no
            garantia("222", "17/08/2025"), // exacto: sí
            garantia("333", "18/08/2025"), // un día después: no
        ];

        let avisos = garantias_que_vencen(&garantias, objetivo);
        assert_eq!(avisos.len(), 1);
        assert_eq!(avisos[0].telefono, "222");
    }

    #[test]
    fn cuotas_solo_las_impagas_que_vencen_hoy() {
        let hoy = fecha("31/01/2025");

        let planes = vec![
            plan(
                "111",
                vec![
                    cuota(1, "31/01/2025", false), // vence hoy, impaga: sí
                    cuota(2, "02/03/2025", false), // otro día: no
                ],
            ),
            plan(
                "222",
                vec![
                    cuota(1, "31/01/2025", true), // vence hoy pero ya pagada: no
                ],
            ),
        ];

        let avisos = cuotas_que_vencen(&planes, hoy);
        assert_eq!(avisos.len(), 1);
        assert_eq!(avisos[0].telefono, "111");
        assert_eq!(avisos[0].numero, 1);
    }

    #[test]
    fn sin_vencimientos_no_hay_avisos() {
        let hoy = fecha("15/06/2025");
        assert!(cuotas_que_vencen(&[], hoy).is_empty());
        assert!(garantias_que_vencen(&[], hoy.mas_dias(7)).is_empty());
    }
}
