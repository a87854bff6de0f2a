// src/services/cotizacion_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ClientesRepository, CotizacionesRepository},
    models::cotizaciones::{
        CotizacionDetalle, CotizacionPayload, CotizacionResumen, PartidaBorrador,
    },
    services::partidas::{calcular_totales, EditorPartidas},
};

#[derive(Clone)]
pub struct CotizacionService {
    cotizaciones_repo: CotizacionesRepository,
    clientes_repo: ClientesRepository,
}

impl CotizacionService {
    pub fn new(
        cotizaciones_repo: CotizacionesRepository,
        clientes_repo: ClientesRepository,
    ) -> Self {
        Self { cotizaciones_repo, clientes_repo }
    }

    /// Listado para la pantalla principal. El recorte por fecha lo hace
    /// la base; la búsqueda por texto se aplica sobre el resultado ya
    /// traído, que a esta escala son cientos de renglones.
    pub async fn listar(
        &self,
        dias: Option<i32>,
        busqueda: Option<&str>,
    ) -> Result<Vec<CotizacionResumen>, AppError> {
        let resumenes = self.cotizaciones_repo.listar(dias).await?;
        Ok(match busqueda {
            Some(q) if !q.trim().is_empty() => filtrar_resumenes(resumenes, q),
            _ => resumenes,
        })
    }

    pub async fn crear(
        &self,
        datos: CotizacionPayload,
        created_by: Uuid,
    ) -> Result<CotizacionDetalle, AppError> {
        // El cliente se verifica antes para regresar 404 y no un error de FK
        self.clientes_repo
            .obtener(datos.cliente_id)
            .await?
            .ok_or(AppError::NoEncontrado("Cliente"))?;

        let partidas = normalizar_partidas(&datos);
        let totales = calcular_totales(&partidas).redondeado();

        let cotizacion = self.cotizaciones_repo.crear(&datos, created_by, totales).await?;
        self.cotizaciones_repo.insertar_partidas(cotizacion.id, &partidas).await?;

        self.detalle(cotizacion.id).await
    }

    pub async fn detalle(&self, id: Uuid) -> Result<CotizacionDetalle, AppError> {
        let cotizacion = self
            .cotizaciones_repo
            .obtener(id)
            .await?
            .ok_or(AppError::NoEncontrado("Cotización"))?;

        let cliente = self
            .clientes_repo
            .obtener(cotizacion.cliente_id)
            .await?
            .ok_or(AppError::NoEncontrado("Cliente"))?;

        let partidas = self.cotizaciones_repo.listar_partidas(id).await?;

        Ok(CotizacionDetalle { cotizacion, cliente, partidas })
    }

    /// Guardado completo: encabezado con totales recalculados, después
    /// se borran todas las partidas y se reinsertan renumeradas. Son
    /// tres pasos secuenciales sin transacción; si el proceso muere
    /// entre el borrado y la reinserción, la cotización queda sin
    /// renglones hasta el siguiente guardado.
    pub async fn guardar(
        &self,
        id: Uuid,
        datos: CotizacionPayload,
    ) -> Result<CotizacionDetalle, AppError> {
        self.clientes_repo
            .obtener(datos.cliente_id)
            .await?
            .ok_or(AppError::NoEncontrado("Cliente"))?;

        let partidas = normalizar_partidas(&datos);
        let totales = calcular_totales(&partidas).redondeado();

        self.cotizaciones_repo.actualizar_encabezado(id, &datos, totales).await?;
        self.cotizaciones_repo.eliminar_partidas(id).await?;
        self.cotizaciones_repo.insertar_partidas(id, &partidas).await?;

        self.detalle(id).await
    }

    pub async fn eliminar(&self, id: Uuid) -> Result<(), AppError> {
        self.cotizaciones_repo.eliminar(id).await
    }
}

fn normalizar_partidas(datos: &CotizacionPayload) -> Vec<PartidaBorrador> {
    let borradores = datos.partidas.iter().cloned().map(PartidaBorrador::from).collect();
    EditorPartidas::desde_borradores(borradores).en_partidas()
}

/// Búsqueda por subcadena, sin distinguir mayúsculas, sobre folio,
/// título y nombre o razón social del cliente.
fn filtrar_resumenes(resumenes: Vec<CotizacionResumen>, q: &str) -> Vec<CotizacionResumen> {
    let termino = q.trim().to_lowercase();
    resumenes
        .into_iter()
        .filter(|r| {
            r.titulo.to_lowercase().contains(&termino)
                || r.cliente_nombre.to_lowercase().contains(&termino)
                || r.cliente_razon_social
                    .as_deref()
                    .is_some_and(|rs| rs.to_lowercase().contains(&termino))
                || r.numero_cotizacion.to_string().contains(&termino)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;
    use crate::models::cotizaciones::CotizacionStatus;

    fn resumen(numero: i32, titulo: &str, cliente: &str) -> CotizacionResumen {
        CotizacionResumen {
            id: Uuid::new_v4(),
            numero_cotizacion: numero,
            titulo: titulo.to_string(),
            cliente_id: Uuid::new_v4(),
            fecha_emision: NaiveDate::from_ymd_opt(2026, 1, 12).unwrap(),
            fecha_vigencia: None,
            status: CotizacionStatus::Borrador,
            subtotal: dec!(2250.50),
            iva: dec!(360.08),
            total: dec!(2610.58),
            created_at: Utc::now(),
            cliente_nombre: cliente.to_string(),
            cliente_razon_social: None,
            creado_por_nombre: None,
        }
    }

    #[test]
    fn filtra_por_titulo_sin_mayusculas() {
        let lista = vec![
            resumen(1, "Instalación CCTV Sucursal Centro", "Ferretería La Tuerca"),
            resumen(2, "Mantenimiento alarmas", "Gasolinera El Faro"),
        ];
        let filtrada = filtrar_resumenes(lista, "cctv");
        assert_eq!(filtrada.len(), 1);
        assert_eq!(filtrada[0].numero_cotizacion, 1);
    }

    #[test]
    fn filtra_por_nombre_de_cliente() {
        let lista = vec![
            resumen(1, "Instalación CCTV", "Ferretería La Tuerca"),
            resumen(2, "Mantenimiento alarmas", "Gasolinera El Faro"),
        ];
        let filtrada = filtrar_resumenes(lista, "faro");
        assert_eq!(filtrada.len(), 1);
        assert_eq!(filtrada[0].numero_cotizacion, 2);
    }

    #[test]
    fn filtra_por_folio() {
        let lista = vec![resumen(1024, "A", "X"), resumen(7, "B", "Y")];
        let filtrada = filtrar_resumenes(lista, "1024");
        assert_eq!(filtrada.len(), 1);
        assert_eq!(filtrada[0].titulo, "A");
    }

    #[test]
    fn termino_vacio_no_descarta_nada() {
        let lista = vec![resumen(1, "A", "X"), resumen(2, "B", "Y")];
        assert_eq!(filtrar_resumenes(lista, "  ").len(), 2);
    }
}
