// src/services/clientes_service.rs

use crate::{common::error::AppError, db::ClientesRepository};

#[derive(Clone)]
pub struct ClientesService {
    repo: ClientesRepository,
}

impl ClientesService {
    pub fn new(repo: ClientesRepository) -> Self {
        Self { repo }
    }

    /// Webhook de mensaje entrante del gateway: da de alta al cliente si es
    /// nuevo, le refresca la última interacción y hace upsert del interés
    /// de marketing con el último texto recibido.
    pub async fn mensaje_entrante(&self, telefono: &str, mensaje: &str) -> Result<(), AppError> {
        self.repo.crear_si_no_existe(telefono).await?;
        self.repo.tocar_interaccion(telefono).await?;
        self.repo.actualizar_interes(telefono, mensaje).await?;
        self.repo
            .registrar_interaccion(telefono, "entrante", mensaje, None)
            .await?;
        Ok(())
    }
}
