// src/db/financiamientos_repo.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::financiamientos::{Cuota, Financiamiento},
};

// Las cuotas viven como JSONB dentro de la fila, así que el modelo no puede
// derivar FromRow directo: esta fila intermedia hace la conversión.
#[derive(Debug, FromRow)]
struct FilaFinanciamiento {
    id: Uuid,
    nombre: String,
    telefono: String,
    documento: String,
    placa: Option<String>,
    total: Decimal,
    inicial: Decimal,
    cuotas: Value,
    fecha_inicio: NaiveDate,
    fecha_fin: NaiveDate,
    creado_en: DateTime<Utc>,
}

impl FilaFinanciamiento {
    fn al_modelo(self) -> Result<Financiamiento, AppError> {
        let cuotas: Vec<Cuota> = serde_json::from_value(self.cuotas)?;
        Ok(Financiamiento {
            id: self.id,
            nombre: self.nombre,
            telefono: self.telefono,
            documento: self.documento,
            placa: self.placa,
            total: self.total,
            inicial: self.inicial,
            cuotas,
            fecha_inicio: self.fecha_inicio,
            fecha_fin: self.fecha_fin,
            creado_en: self.creado_en,
        })
    }
}

#[derive(Clone)]
pub struct FinanciamientosRepository {
    pool: PgPool,
}

impl FinanciamientosRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn crear(
        &self,
        nombre: &str,
        telefono: &str,
        documento: &str,
        placa: Option<&str>,
        total: Decimal,
        inicial: Decimal,
        cuotas: &[Cuota],
        fecha_inicio: NaiveDate,
        fecha_fin: NaiveDate,
    ) -> Result<Financiamiento, AppError> {
        let cuotas_json = serde_json::to_value(cuotas)?;

        let fila = sqlx::query_as::<_, FilaFinanciamiento>(
            r#"
            INSERT INTO financiamientos (
                nombre, telefono, documento, placa,
                total, inicial, cuotas, fecha_inicio, fecha_fin
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(nombre)
        .bind(telefono)
        .bind(documento)
        .bind(placa)
        .bind(total)
        .bind(inicial)
        .bind(cuotas_json)
        .bind(fecha_inicio)
        .bind(fecha_fin)
        .fetch_one(&self.pool)
        .await?;

        fila.al_modelo()
    }

    /// Búsqueda por teléfono o por documento de identidad.
    pub async fn buscar(&self, consulta: &str) -> Result<Vec<Financiamiento>, AppError> {
        let filas = sqlx::query_as::<_, FilaFinanciamiento>(
            r#"
            SELECT * FROM financiamientos
            WHERE telefono = $1 OR documento = $1
            ORDER BY creado_en DESC
            "#,
        )
        .bind(consulta)
        .fetch_all(&self.pool)
        .await?;

        filas.into_iter().map(FilaFinanciamiento::al_modelo).collect()
    }

    /// El plan más reciente de un teléfono (para marcar cuotas desde el
    /// formulario, que identifica al cliente por su número).
    pub async fn ultimo_por_telefono(
        &self,
        telefono: &str,
    ) -> Result<Option<Financiamiento>, AppError> {
        let fila = sqlx::query_as::<_, FilaFinanciamiento>(
            r#"
            SELECT * FROM financiamientos
            WHERE telefono = $1
            ORDER BY creado_en DESC
            LIMIT 1
            "#,
        )
        .bind(telefono)
        .fetch_optional(&self.pool)
        .await?;

        fila.map(FilaFinanciamiento::al_modelo).transpose()
    }

    /// Todos los planes. El recordatorio de cuotas recorre planes × cuotas;
    /// no hay índice por fecha y no hace falta con este volumen.
    pub async fn listar_todos(&self) -> Result<Vec<Financiamiento>, AppError> {
        let filas = sqlx::query_as::<_, FilaFinanciamiento>(
            "SELECT * FROM financiamientos ORDER BY creado_en ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        filas.into_iter().map(FilaFinanciamiento::al_modelo).collect()
    }

    /// Reescribe la lista completa de cuotas del plan. Última escritura gana:
    /// no hay chequeo optimista.
    pub async fn actualizar_cuotas(&self, id: Uuid, cuotas: &[Cuota]) -> Result<(), AppError> {
        let cuotas_json = serde_json::to_value(cuotas)?;
        sqlx::query("UPDATE financiamientos SET cuotas = $2 WHERE id = $1")
            .bind(id)
            .bind(cuotas_json)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn contar(&self) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM financiamientos")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }
}
