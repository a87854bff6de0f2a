// src/db/clientes_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::clientes::{Cliente, ClientePayload},
};

#[derive(Clone)]
pub struct ClientesRepository {
    pool: PgPool,
}

impl ClientesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lista ordenada por nombre, con búsqueda opcional por subcadena
    /// sobre nombre, razón social o RFC.
    pub async fn listar(&self, busqueda: Option<&str>) -> Result<Vec<Cliente>, AppError> {
        let clientes = match busqueda {
            Some(q) if !q.is_empty() => {
                let termino = format!("%{}%", q);
                sqlx::query_as::<_, Cliente>(
                    r#"
                    SELECT * FROM clientes
                    WHERE nombre ILIKE $1
                       OR razon_social ILIKE $1
                       OR rfc ILIKE $1
                    ORDER BY nombre ASC
                    "#,
                )
                .bind(termino)
                .fetch_all(&self.pool)
                .await?
            }
            _ => {
                sqlx::query_as::<_, Cliente>("SELECT * FROM clientes ORDER BY nombre ASC")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(clientes)
    }

    pub async fn obtener(&self, id: Uuid) -> Result<Option<Cliente>, AppError> {
        let cliente = sqlx::query_as::<_, Cliente>("SELECT * FROM clientes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(cliente)
    }

    pub async fn crear(
        &self,
        datos: &ClientePayload,
        rfc: Option<&str>,
        created_by: Uuid,
    ) -> Result<Cliente, AppError> {
        let cliente = sqlx::query_as::<_, Cliente>(
            r#"
            INSERT INTO clientes (
                nombre, razon_social, rfc, domicilio_fiscal,
                email, telefono, regimen_fiscal, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&datos.nombre)
        .bind(datos.razon_social.as_deref())
        .bind(rfc)
        .bind(datos.domicilio_fiscal.as_deref())
        .bind(datos.email.as_deref())
        .bind(datos.telefono.as_deref())
        .bind(datos.regimen_fiscal.as_deref())
        .bind(created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Self::mapear_rfc_duplicado(e, rfc))?;

        Ok(cliente)
    }

    pub async fn actualizar(
        &self,
        id: Uuid,
        datos: &ClientePayload,
        rfc: Option<&str>,
    ) -> Result<Cliente, AppError> {
        let cliente = sqlx::query_as::<_, Cliente>(
            r#"
            UPDATE clientes
            SET nombre = $1, razon_social = $2, rfc = $3, domicilio_fiscal = $4,
                email = $5, telefono = $6, regimen_fiscal = $7, updated_at = NOW()
            WHERE id = $8
            RETURNING *
            "#,
        )
        .bind(&datos.nombre)
        .bind(datos.razon_social.as_deref())
        .bind(rfc)
        .bind(datos.domicilio_fiscal.as_deref())
        .bind(datos.email.as_deref())
        .bind(datos.telefono.as_deref())
        .bind(datos.regimen_fiscal.as_deref())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::mapear_rfc_duplicado(e, rfc))?
        .ok_or(AppError::NoEncontrado("Cliente"))?;

        Ok(cliente)
    }

    /// Borra un cliente. Si alguna cotización lo referencia, el FK
    /// RESTRICT lo impide y regresamos el error específico; la fila
    /// queda intacta.
    pub async fn eliminar(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM clientes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let Some(db_err) = e.as_database_error() {
                    if db_err.is_foreign_key_violation() {
                        return AppError::ClienteConCotizaciones;
                    }
                }
                e.into()
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NoEncontrado("Cliente"));
        }
        Ok(())
    }

    fn mapear_rfc_duplicado(e: sqlx::Error, rfc: Option<&str>) -> AppError {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                return AppError::UniqueConstraintViolation(format!(
                    "El RFC '{}' ya está registrado.",
                    rfc.unwrap_or("?")
                ));
            }
        }
        e.into()
    }
}
