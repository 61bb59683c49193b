// src/db/clientes_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::clientes::{Cliente, Interaccion},
};

// El repositorio de clientes, responsable de todas las interacciones con las
// tablas 'clientes', 'interacciones', 'interes_marketing' y 'ofertas'.
#[derive(Clone)]
pub struct ClientesRepository {
    pool: PgPool,
}

impl ClientesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Alta idempotente: si el teléfono ya existe no pasa nada.
    pub async fn crear_si_no_existe(&self, telefono: &str) -> Result<(), AppError> {
        sqlx::query("INSERT INTO clientes (telefono) VALUES ($1) ON CONFLICT (telefono) DO NOTHING")
            .bind(telefono)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn listar(&self) -> Result<Vec<Cliente>, AppError> {
        let clientes =
            sqlx::query_as::<_, Cliente>("SELECT * FROM clientes ORDER BY creado_en ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(clientes)
    }

    pub async fn contar(&self) -> Result<i64, AppError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM clientes")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    pub async fn tocar_interaccion(&self, telefono: &str) -> Result<(), AppError> {
        sqlx::query("UPDATE clientes SET ultima_interaccion = NOW() WHERE telefono = $1")
            .bind(telefono)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // =========================================================================
    //  BITÁCORA DE INTERACCIONES (solo-agregar)
    // =========================================================================

    pub async fn registrar_interaccion(
        &self,
        telefono: &str,
        tipo: &str,
        mensaje: &str,
        oferta: Option<&str>,
    ) -> Result<Interaccion, AppError> {
        let interaccion = sqlx::query_as::<_, Interaccion>(
            r#"
            INSERT INTO interacciones (telefono, tipo, mensaje, oferta)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(telefono)
        .bind(tipo)
        .bind(mensaje)
        .bind(oferta)
        .fetch_one(&self.pool)
        .await?;

        Ok(interaccion)
    }

    // =========================================================================
    //  INTERÉS DE MARKETING (upsert, no se acumula)
    // =========================================================================

    pub async fn actualizar_interes(&self, telefono: &str, mensaje: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO interes_marketing (telefono, ultimo_mensaje)
            VALUES ($1, $2)
            ON CONFLICT (telefono) DO UPDATE
              SET ultimo_mensaje = EXCLUDED.ultimo_mensaje,
                  actualizado_en = NOW()
            "#,
        )
        .bind(telefono)
        .bind(mensaje)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // =========================================================================
    //  OFERTAS (membresía: ya recibió la oferta inicial)
    // =========================================================================

    /// Clientes que todavía no recibieron la oferta inicial.
    pub async fn sin_oferta(&self) -> Result<Vec<Cliente>, AppError> {
        let clientes = sqlx::query_as::<_, Cliente>(
            r#"
            SELECT c.*
            FROM clientes c
            LEFT JOIN ofertas o ON o.telefono = c.telefono
            WHERE o.telefono IS NULL
            ORDER BY c.creado_en ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(clientes)
    }

    pub async fn marcar_oferta(&self, telefono: &str) -> Result<(), AppError> {
        sqlx::query("INSERT INTO ofertas (telefono) VALUES ($1) ON CONFLICT (telefono) DO NOTHING")
            .bind(telefono)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
