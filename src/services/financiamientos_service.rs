// src/services/financiamientos_service.rs

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::{error::AppError, fechas::FechaCorta},
    db::{ClientesRepository, FinanciamientosRepository},
    models::financiamientos::{Cuota, Financiamiento},
    services::{difusion::Despachador, documentos::DocumentosService},
};

/// La inicial de costumbre del negocio cuando el formulario no manda otra.
pub fn inicial_por_defecto() -> Decimal {
    Decimal::new(350, 0)
}

/// Arma la lista de cuotas: el saldo financiado se reparte en partes iguales
/// (redondeo a 2 decimales) y cada cuota vence 30 días después de la
/// anterior. Intervalo fijo de 30 días, no meses calendario.
pub fn generar_cuotas(
    total: Decimal,
    inicial: Decimal,
    cantidad: u32,
    inicio: FechaCorta,
) -> Result<Vec<Cuota>, AppError> {
    if cantidad == 0 {
        return Err(AppError::CampoFaltante("cuotas".to_string()));
    }
    let financiado = total - inicial;
    if financiado <= Decimal::ZERO {
        return Err(AppError::MontoInvalido(format!(
            "el saldo a financiar ({}) debe ser mayor a cero",
            financiado
        )));
    }

    let monto = (financiado / Decimal::from(cantidad)).round_dp(2);

    let cuotas = (1..=cantidad)
        .map(|numero| Cuota {
            id: Uuid::new_v4(),
            numero,
            monto,
            vence: inicio.mas_dias(30 * i64::from(numero)),
            pagada: false,
        })
        .collect();

    Ok(cuotas)
}

/// Marca la cuota `numero` como pagada. Idempotente: pagarla dos veces la
/// deja pagada. Un número que no existe en el plan se rechaza, no se ignora.
pub fn marcar_pagada(cuotas: &mut [Cuota], numero: u32) -> Result<Cuota, AppError> {
    let total = cuotas.len();
    let cuota = cuotas
        .iter_mut()
        .find(|c| c.numero == numero)
        .ok_or(AppError::CuotaFueraDeRango { numero, total })?;
    cuota.pagada = true;
    Ok(cuota.clone())
}

/// Datos ya parseados del formulario de alta.
#[derive(Debug, Clone)]
pub struct NuevoPlan {
    pub nombre: String,
    pub telefono: String,
    pub documento: String,
    pub placa: Option<String>,
    pub total: Decimal,
    pub inicial: Decimal,
    pub cantidad_cuotas: u32,
    pub inicio: FechaCorta,
}

#[derive(Clone)]
pub struct FinanciamientosService {
    repo: FinanciamientosRepository,
    clientes: ClientesRepository,
    documentos: DocumentosService,
    despachador: Despachador,
}

impl FinanciamientosService {
    pub fn new(
        repo: FinanciamientosRepository,
        clientes: ClientesRepository,
        documentos: DocumentosService,
        despachador: Despachador,
    ) -> Self {
        Self {
            repo,
            clientes,
            documentos,
            despachador,
        }
    }

    /// Alta del plan: un solo insert y después el envío del contrato como
    /// mejor esfuerzo. Si el PDF o el envío fallan, el registro ya quedó
    /// en la base y no se revierte; solo se deja constancia en el log.
    pub async fn crear_plan(&self, datos: NuevoPlan) -> Result<Financiamiento, AppError> {
        let cuotas = generar_cuotas(datos.total, datos.inicial, datos.cantidad_cuotas, datos.inicio)?;

        // El fin del plan es el vencimiento de la última cuota.
        let fecha_fin = cuotas
            .last()
            .map(|c| c.vence.0)
            .unwrap_or(datos.inicio.0);

        let plan = self
            .repo
            .crear(
                &datos.nombre,
                &datos.telefono,
                &datos.documento,
                datos.placa.as_deref(),
                datos.total,
                datos.inicial,
                &cuotas,
                datos.inicio.0,
                fecha_fin,
            )
            .await?;

        self.clientes.crear_si_no_existe(&plan.telefono).await?;

        match self.documentos.contrato_pdf(&plan) {
            Ok(pdf) => {
                let leyenda = format!(
                    "Hola {}! Te enviamos tu contrato de financiamiento. Gracias por confiar en nosotros.",
                    plan.nombre
                );
                if let Err(motivo) = self
                    .despachador
                    .enviar_documento_a(&plan.telefono, "contrato.pdf", &pdf, &leyenda)
                    .await
                {
                    tracing::warn!(
                        "No se pudo enviar el contrato a {}: {}",
                        plan.telefono,
                        motivo
                    );
                }
            }
            Err(e) => tracing::warn!("No se pudo generar el contrato PDF: {}", e),
        }

        Ok(plan)
    }

    /// Marca una cuota del plan más reciente del teléfono y persiste la
    /// lista completa. Última escritura gana si dos personas marcan a la vez.
    pub async fn marcar_cuota(
        &self,
        telefono: &str,
        numero: u32,
    ) -> Result<(Financiamiento, Cuota), AppError> {
        let mut plan = self
            .repo
            .ultimo_por_telefono(telefono)
            .await?
            .ok_or_else(|| {
                AppError::NoEncontrado(format!(
                    "No hay financiamiento registrado para el teléfono {}",
                    telefono
                ))
            })?;

        let cuota = marcar_pagada(&mut plan.cuotas, numero)?;
        self.repo.actualizar_cuotas(plan.id, &plan.cuotas).await?;

        Ok((plan, cuota))
    }

    pub async fn buscar(&self, consulta: &str) -> Result<Vec<Financiamiento>, AppError> {
        let planes = self.repo.buscar(consulta).await?;
        if planes.is_empty() {
            return Err(AppError::NoEncontrado(format!(
                "No se encontró ningún financiamiento para '{}'",
                consulta
            )));
        }
        Ok(planes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decimal(texto: &str) -> Decimal {
        texto.parse().unwrap()
    }

    #[test]
    fn escenario_de_alta_tipico() {
        // total 1000, inicial 350, 2 cuotas desde el 01/01/2025
        let inicio = FechaCorta::parsear("01/01/2025").unwrap();
        let cuotas = generar_cuotas(decimal("1000"), decimal("350"), 2, inicio).unwrap();

        assert_eq!(cuotas.len(), 2);
        assert_eq!(cuotas[0].monto, decimal("325.00"));
        assert_eq!(cuotas[1].monto, decimal("325.00"));
        assert_eq!(cuotas[0].vence.to_string(), "31/01/2025");
        assert_eq!(cuotas[1].vence.to_string(), "02/03/2025");
        assert_eq!(cuotas[0].numero, 1);
        assert_eq!(cuotas[1].numero, 2);
        assert!(cuotas.iter().all(|c| !c.pagada));
    }

    #[test]
    fn reparto_con_redondeo_a_dos_decimales() {
        let inicio = FechaCorta::parsear("01/01/2025").unwrap();
        let cuotas = generar_cuotas(decimal("1000"), decimal("350"), 3, inicio).unwrap();
        assert_eq!(cuotas[0].monto, decimal("216.67"));
        // todas las cuotas llevan el mismo monto
        assert!(cuotas.iter().all(|c| c.monto == cuotas[0].monto));
    }

    #[test]
    fn rechaza_planes_sin_saldo_o_sin_cuotas() {
        let inicio = FechaCorta::parsear("01/01/2025").unwrap();
        assert!(generar_cuotas(decimal("300"), decimal("350"), 2, inicio).is_err());
        assert!(generar_cuotas(decimal("1000"), decimal("350"), 0, inicio).is_err());
    }

    #[test]
    fn marcar_pagada_no_toca_las_demas_y_es_idempotente() {
        let inicio = FechaCorta::parsear("01/01/2025").unwrap();
        let mut cuotas = generar_cuotas(decimal("1000"), decimal("350"), 3, inicio).unwrap();
        let copia = cuotas.clone();

        marcar_pagada(&mut cuotas, 2).unwrap();
        assert!(cuotas[1].pagada);

        // las demás quedan intactas: mismo monto, misma fecha, sin pagar
        assert_eq!(cuotas[0].monto, copia[0].monto);
        assert_eq!(cuotas[0].vence, copia[0].vence);
        assert!(!cuotas[0].pagada);
        assert_eq!(cuotas[2].monto, copia[2].monto);
        assert_eq!(cuotas[2].vence, copia[2].vence);
        assert!(!cuotas[2].pagada);

        // marcarla de nuevo la deja pagada, sin drama
        marcar_pagada(&mut cuotas, 2).unwrap();
        assert!(cuotas[1].pagada);
    }

    #[test]
    fn numero_fuera_de_rango_se_rechaza() {
        let inicio = FechaCorta::parsear("01/01/2025").unwrap();
        let mut cuotas = generar_cuotas(decimal("1000"), decimal("350"), 2, inicio).unwrap();

        let error = marcar_pagada(&mut cuotas, 5).unwrap_err();
        match error {
            AppError::CuotaFueraDeRango { numero, total } => {
                assert_eq!(numero, 5);
                assert_eq!(total, 2);
            }
            otro => panic!("se esperaba CuotaFueraDeRango, vino {:?}", otro),
        }
        // y nada quedó marcado
        assert!(cuotas.iter().all(|c| !c.pagada));
    }

    #[test]
    fn la_inicial_por_defecto_es_350() {
        assert_eq!(inicial_por_defecto(), decimal("350"));
    }
}
