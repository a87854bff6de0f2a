// src/db/productos_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::productos::{Producto, ProductoPayload},
};

#[derive(Clone)]
pub struct ProductosRepository {
    pool: PgPool,
}

impl ProductosRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn listar(&self) -> Result<Vec<Producto>, AppError> {
        let productos = sqlx::query_as::<_, Producto>(
            "SELECT * FROM productos ORDER BY nombre ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(productos)
    }

    /// Búsqueda del combobox de partidas: solo productos activos,
    /// subcadena sin distinguir mayúsculas sobre nombre, código y
    /// descripción, máximo 10 resultados. El texto libre siempre es
    /// válido en la partida; esto solo alimenta la lista de sugerencias.
    pub async fn buscar(&self, termino: &str) -> Result<Vec<Producto>, AppError> {
        let patron = format!("%{}%", termino);
        let productos = sqlx::query_as::<_, Producto>(
            r#"
            SELECT * FROM productos
            WHERE activo = TRUE
              AND (nombre ILIKE $1 OR codigo ILIKE $1 OR descripcion ILIKE $1)
            ORDER BY nombre ASC
            LIMIT 10
            "#,
        )
        .bind(patron)
        .fetch_all(&self.pool)
        .await?;
        Ok(productos)
    }

    pub async fn obtener(&self, id: Uuid) -> Result<Option<Producto>, AppError> {
        let producto = sqlx::query_as::<_, Producto>("SELECT * FROM productos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(producto)
    }

    pub async fn crear(
        &self,
        datos: &ProductoPayload,
        codigo: Option<&str>,
    ) -> Result<Producto, AppError> {
        let producto = sqlx::query_as::<_, Producto>(
            r#"
            INSERT INTO productos (codigo, nombre, descripcion, precio, categoria, activo)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(codigo)
        .bind(&datos.nombre)
        .bind(datos.descripcion.as_deref())
        .bind(datos.precio)
        .bind(datos.categoria.as_deref())
        .bind(datos.activo)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Self::mapear_codigo_duplicado(e, codigo))?;

        Ok(producto)
    }

    pub async fn actualizar(
        &self,
        id: Uuid,
        datos: &ProductoPayload,
        codigo: Option<&str>,
    ) -> Result<Producto, AppError> {
        let producto = sqlx::query_as::<_, Producto>(
            r#"
            UPDATE productos
            SET codigo = $1, nombre = $2, descripcion = $3, precio = $4,
                categoria = $5, activo = $6, updated_at = NOW()
            WHERE id = $7
            RETURNING *
            "#,
        )
        .bind(codigo)
        .bind(&datos.nombre)
        .bind(datos.descripcion.as_deref())
        .bind(datos.precio)
        .bind(datos.categoria.as_deref())
        .bind(datos.activo)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| Self::mapear_codigo_duplicado(e, codigo))?
        .ok_or(AppError::NoEncontrado("Producto"))?;

        Ok(producto)
    }

    // La desactivación es estado suave: el producto sale de la búsqueda
    // del combobox pero conserva su fila.
    pub async fn desactivar(&self, id: Uuid) -> Result<Producto, AppError> {
        let producto = sqlx::query_as::<_, Producto>(
            r#"
            UPDATE productos
            SET activo = FALSE, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NoEncontrado("Producto"))?;

        Ok(producto)
    }

    pub async fn eliminar(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM productos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NoEncontrado("Producto"));
        }
        Ok(())
    }

    fn mapear_codigo_duplicado(e: sqlx::Error, codigo: Option<&str>) -> AppError {
        if let Some(db_err) = e.as_database_error() {
            if db_err.is_unique_violation() {
                return AppError::UniqueConstraintViolation(format!(
                    "El código '{}' ya existe.",
                    codigo.unwrap_or("?")
                ));
            }
        }
        e.into()
    }
}
