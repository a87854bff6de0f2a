// src/db/cotizaciones_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::cotizaciones::{
        Cotizacion, CotizacionPayload, CotizacionResumen, CotizacionStatus, Partida,
        PartidaBorrador, Totales,
    },
};

#[derive(Clone)]
pub struct CotizacionesRepository {
    pool: PgPool,
}

impl CotizacionesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  COTIZACIONES (encabezado)
    // =========================================================================

    /// Listado con nombres resueltos por JOIN, más reciente primero.
    /// `dias` acota por fecha de emisión del lado del servidor;
    /// None trae todo el historial.
    pub async fn listar(&self, dias: Option<i32>) -> Result<Vec<CotizacionResumen>, AppError> {
        const BASE: &str = r#"
            SELECT
                c.id, c.numero_cotizacion, c.titulo, c.cliente_id,
                c.fecha_emision, c.fecha_vigencia, c.status,
                c.subtotal, c.iva, c.total, c.created_at,
                cl.nombre AS cliente_nombre,
                cl.razon_social AS cliente_razon_social,
                u.nombre AS creado_por_nombre
            FROM cotizaciones c
            JOIN clientes cl ON cl.id = c.cliente_id
            LEFT JOIN usuarios u ON u.id = c.created_by
        "#;

        let resumenes = match dias {
            Some(n) => {
                let sql = format!(
                    "{BASE} WHERE c.fecha_emision >= CURRENT_DATE - ($1::int) ORDER BY c.created_at DESC"
                );
                sqlx::query_as::<_, CotizacionResumen>(&sql)
                    .bind(n)
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!("{BASE} ORDER BY c.created_at DESC");
                sqlx::query_as::<_, CotizacionResumen>(&sql)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(resumenes)
    }

    pub async fn obtener(&self, id: Uuid) -> Result<Option<Cotizacion>, AppError> {
        let cotizacion = sqlx::query_as::<_, Cotizacion>(
            "SELECT * FROM cotizaciones WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(cotizacion)
    }

    /// Inserta el encabezado. El folio (numero_cotizacion) y la fecha de
    /// emisión los asigna la base; los totales llegan ya calculados de
    /// las partidas.
    pub async fn crear(
        &self,
        datos: &CotizacionPayload,
        created_by: Uuid,
        totales: Totales,
    ) -> Result<Cotizacion, AppError> {
        let cotizacion = sqlx::query_as::<_, Cotizacion>(
            r#"
            INSERT INTO cotizaciones (
                titulo, cliente_id, created_by, realizado_por, fecha_vigencia,
                alcance_trabajo, exclusiones, observaciones, condiciones_pago,
                capacitacion, status, subtotal, iva, total
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(&datos.titulo)
        .bind(datos.cliente_id)
        .bind(created_by)
        .bind(datos.realizado_por.as_deref())
        .bind(datos.fecha_vigencia)
        .bind(datos.alcance_trabajo.as_deref())
        .bind(datos.exclusiones.as_deref())
        .bind(datos.observaciones.as_deref())
        .bind(datos.condiciones_pago.as_deref())
        .bind(datos.capacitacion.as_deref())
        .bind(datos.status.unwrap_or(CotizacionStatus::Borrador))
        .bind(totales.subtotal)
        .bind(totales.iva)
        .bind(totales.total)
        .fetch_one(&self.pool)
        .await?;

        Ok(cotizacion)
    }

    /// Actualiza el encabezado y la fotografía de totales. La fecha de
    /// emisión es inmutable y no aparece en el SET.
    pub async fn actualizar_encabezado(
        &self,
        id: Uuid,
        datos: &CotizacionPayload,
        totales: Totales,
    ) -> Result<Cotizacion, AppError> {
        let cotizacion = sqlx::query_as::<_, Cotizacion>(
            r#"
            UPDATE cotizaciones
            SET titulo = $1, cliente_id = $2, realizado_por = $3,
                fecha_vigencia = $4, alcance_trabajo = $5, exclusiones = $6,
                observaciones = $7, condiciones_pago = $8, capacitacion = $9,
                status = $10, subtotal = $11, iva = $12, total = $13,
                updated_at = NOW()
            WHERE id = $14
            RETURNING *
            "#,
        )
        .bind(&datos.titulo)
        .bind(datos.cliente_id)
        .bind(datos.realizado_por.as_deref())
        .bind(datos.fecha_vigencia)
        .bind(datos.alcance_trabajo.as_deref())
        .bind(datos.exclusiones.as_deref())
        .bind(datos.observaciones.as_deref())
        .bind(datos.condiciones_pago.as_deref())
        .bind(datos.capacitacion.as_deref())
        .bind(datos.status.unwrap_or(CotizacionStatus::Borrador))
        .bind(totales.subtotal)
        .bind(totales.iva)
        .bind(totales.total)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NoEncontrado("Cotización"))?;

        Ok(cotizacion)
    }

    pub async fn eliminar(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM cotizaciones WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NoEncontrado("Cotización"));
        }
        Ok(())
    }

    // =========================================================================
    //  PARTIDAS
    // =========================================================================

    pub async fn listar_partidas(&self, cotizacion_id: Uuid) -> Result<Vec<Partida>, AppError> {
        let partidas = sqlx::query_as::<_, Partida>(
            "SELECT * FROM cotizacion_partidas WHERE cotizacion_id = $1 ORDER BY orden ASC",
        )
        .bind(cotizacion_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(partidas)
    }

    pub async fn eliminar_partidas(&self, cotizacion_id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM cotizacion_partidas WHERE cotizacion_id = $1")
            .bind(cotizacion_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Inserta la lista completa de partidas ya normalizada (posiciones
    /// densas 1..N). El guardado siempre reemplaza todo: no hay diff
    /// incremental de renglones.
    pub async fn insertar_partidas(
        &self,
        cotizacion_id: Uuid,
        partidas: &[PartidaBorrador],
    ) -> Result<(), AppError> {
        for (i, partida) in partidas.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO cotizacion_partidas (
                    cotizacion_id, numero_partida, modelo, descripcion,
                    precio_unitario, cantidad, orden
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(cotizacion_id)
            .bind(partida.numero_partida)
            .bind(partida.modelo.as_deref())
            .bind(partida.descripcion.as_deref())
            .bind(partida.precio_unitario)
            .bind(partida.cantidad)
            .bind(i as i32)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }
}
