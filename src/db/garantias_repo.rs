// src/db/garantias_repo.rs

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::{common::error::AppError, models::garantias::Garantia};

#[derive(Clone)]
pub struct GarantiasRepository {
    pool: PgPool,
}

impl GarantiasRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn crear(
        &self,
        telefono: &str,
        producto: &str,
        placa: Option<&str>,
        fecha_instalacion: NaiveDate,
        fecha_vencimiento: NaiveDate,
    ) -> Result<Garantia, AppError> {
        let garantia = sqlx::query_as::<_, Garantia>(
            r#"
            INSERT INTO garantias (telefono, producto, placa, fecha_instalacion, fecha_vencimiento)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(telefono)
        .bind(producto)
        .bind(placa)
        .bind(fecha_instalacion)
        .bind(fecha_vencimiento)
        .fetch_one(&self.pool)
        .await?;

        Ok(garantia)
    }

    /// Todas las garantías. El recordatorio de vencimientos las recorre
    /// comparando fechas por igualdad exacta; el volumen es chico.
    pub async fn listar(&self) -> Result<Vec<Garantia>, AppError> {
        let garantias =
            sqlx::query_as::<_, Garantia>("SELECT * FROM garantias ORDER BY creado_en ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(garantias)
    }

    pub async fn contar(&self) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM garantias")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}
