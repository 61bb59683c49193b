// src/services/garantias_service.rs

use crate::{
    common::{error::AppError, fechas::FechaCorta},
    db::{ClientesRepository, GarantiasRepository},
    models::garantias::Garantia,
    services::{difusion::Despachador, documentos::DocumentosService},
};

/// Datos ya parseados del formulario de garantía.
#[derive(Debug, Clone)]
pub struct NuevaGarantia {
    pub telefono: String,
    pub producto: String,
    pub placa: Option<String>,
    pub instalacion: FechaCorta,
    pub vencimiento: FechaCorta,
}

#[derive(Clone)]
pub struct GarantiasService {
    repo: GarantiasRepository,
    clientes: ClientesRepository,
    documentos: DocumentosService,
    despachador: Despachador,
}

impl GarantiasService {
    pub fn new(
        repo: GarantiasRepository,
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

    /// Alta de la garantía y envío del certificado como mejor esfuerzo,
    /// igual que con los contratos: el registro queda aunque el envío falle.
    pub async fn crear(&self, datos: NuevaGarantia) -> Result<Garantia, AppError> {
        let garantia = self
            .repo
            .crear(
                &datos.telefono,
                &datos.producto,
                datos.placa.as_deref(),
                datos.instalacion.0,
                datos.vencimiento.0,
            )
            .await?;

        self.clientes.crear_si_no_existe(&garantia.telefono).await?;

        match self.documentos.garantia_pdf(&garantia) {
            Ok(pdf) => {
                let leyenda = format!(
                    "Tu garantía de {} quedó registrada. Válida hasta el {}.",
                    garantia.producto,
                    FechaCorta(garantia.fecha_vencimiento)
                );
                if let Err(motivo) = self
                    .despachador
                    .enviar_documento_a(&garantia.telefono, "garantia.pdf", &pdf, &leyenda)
                    .await
                {
                    tracing::warn!(
                        "No se pudo enviar el certificado a {}: {}",
                        garantia.telefono,
                        motivo
                    );
                }
            }
            Err(e) => tracing::warn!("No se pudo generar el certificado PDF: {}", e),
        }

        Ok(garantia)
    }
}
