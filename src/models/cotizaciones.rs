// src/models/cotizaciones.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// --- Enums ---

// Mapea el CREATE TYPE cotizacion_status de la base.
// El ciclo de vida (borrador → enviada → aprobada/rechazada) es una
// convención: ninguna transición se rechaza, cualquier editor puede
// fijar cualquier estado. 'vencida' es una etiqueta, no una política
// automática de fechas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "cotizacion_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CotizacionStatus {
    Borrador,
    Enviada,
    Aprobada,
    Rechazada,
    Vencida,
}

impl CotizacionStatus {
    pub fn etiqueta(&self) -> &'static str {
        match self {
            CotizacionStatus::Borrador => "Borrador",
            CotizacionStatus::Enviada => "Enviada",
            CotizacionStatus::Aprobada => "Aprobada",
            CotizacionStatus::Rechazada => "Rechazada",
            CotizacionStatus::Vencida => "Vencida",
        }
    }
}

// --- Agregado ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Cotizacion {
    pub id: Uuid,
    // Folio consecutivo asignado por la base al insertar
    #[schema(example = 1024)]
    pub numero_cotizacion: i32,
    #[schema(example = "Instalación CCTV Sucursal Centro")]
    pub titulo: String,
    pub cliente_id: Uuid,
    pub created_by: Option<Uuid>,
    #[schema(example = "Ing. Ana Torres")]
    pub realizado_por: Option<String>,
    pub fecha_emision: NaiveDate,
    pub fecha_vigencia: Option<NaiveDate>,
    pub alcance_trabajo: Option<String>,
    pub exclusiones: Option<String>,
    pub observaciones: Option<String>,
    pub condiciones_pago: Option<String>,
    pub capacitacion: Option<String>,
    pub status: CotizacionStatus,
    // Campos derivados: se recalculan de las partidas en cada guardado
    // y se persisten como fotografía, nunca se les trata como verdad.
    #[schema(example = "2250.50")]
    pub subtotal: Decimal,
    #[schema(example = "360.08")]
    pub iva: Decimal,
    #[schema(example = "2610.58")]
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Renglón del listado: cotización + nombres resueltos por JOIN
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CotizacionResumen {
    pub id: Uuid,
    pub numero_cotizacion: i32,
    pub titulo: String,
    pub cliente_id: Uuid,
    pub fecha_emision: NaiveDate,
    pub fecha_vigencia: Option<NaiveDate>,
    pub status: CotizacionStatus,
    pub subtotal: Decimal,
    pub iva: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    pub cliente_nombre: String,
    pub cliente_razon_social: Option<String>,
    pub creado_por_nombre: Option<String>,
}

// --- Partidas ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Partida {
    pub id: Uuid,
    pub cotizacion_id: Uuid,
    // Posición 1..N, densa y reasignada en cada guardado
    #[schema(example = 1)]
    pub numero_partida: i32,
    #[schema(example = "CAM-DOMO-4MP")]
    pub modelo: Option<String>,
    pub descripcion: Option<String>,
    #[schema(example = "1850.00")]
    pub precio_unitario: Decimal,
    #[schema(example = 2)]
    pub cantidad: i32,
    pub orden: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Partida {
    /// Subtotal de la línea, siempre derivado (nunca almacenado como fuente)
    pub fn subtotal(&self) -> Decimal {
        self.precio_unitario * Decimal::from(self.cantidad)
    }
}

fn precio_no_negativo(precio: &Decimal) -> Result<(), ValidationError> {
    if precio.is_sign_negative() {
        let mut err = ValidationError::new("precio_negativo");
        err.message = Some("El precio unitario no puede ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PartidaInput {
    #[schema(example = "CAM-DOMO-4MP")]
    pub modelo: Option<String>,
    pub descripcion: Option<String>,
    #[validate(custom(function = "precio_no_negativo"))]
    #[serde(default)]
    #[schema(example = "1850.00")]
    pub precio_unitario: Decimal,
    #[validate(range(min = 1, message = "La cantidad mínima es 1."))]
    #[serde(default = "cantidad_default")]
    #[schema(example = 2)]
    pub cantidad: i32,
}

fn cantidad_default() -> i32 {
    1
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CotizacionPayload {
    #[validate(length(min = 1, message = "El título es requerido."))]
    #[schema(example = "Instalación CCTV Sucursal Centro")]
    pub titulo: String,
    pub cliente_id: Uuid,
    pub realizado_por: Option<String>,
    pub fecha_vigencia: Option<NaiveDate>,
    pub alcance_trabajo: Option<String>,
    pub exclusiones: Option<String>,
    pub observaciones: Option<String>,
    pub condiciones_pago: Option<String>,
    pub capacitacion: Option<String>,
    pub status: Option<CotizacionStatus>,
    #[validate(nested)]
    #[serde(default)]
    pub partidas: Vec<PartidaInput>,
}

// Línea en edición: todavía no persistida, vive en el editor de partidas.
// El id es local (se genera al agregar) y sirve solo para dirigir las
// mutaciones; al guardar, las filas se reemplazan por completo.
#[derive(Debug, Clone, PartialEq)]
pub struct PartidaBorrador {
    pub id: Uuid,
    pub numero_partida: i32,
    pub modelo: Option<String>,
    pub descripcion: Option<String>,
    pub precio_unitario: Decimal,
    pub cantidad: i32,
}

impl From<PartidaInput> for PartidaBorrador {
    fn from(input: PartidaInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            numero_partida: 0, // se reasigna al normalizar
            modelo: input.modelo,
            descripcion: input.descripcion,
            precio_unitario: input.precio_unitario,
            cantidad: input.cantidad,
        }
    }
}

// --- Totales derivados ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Totales {
    #[schema(example = "2250.50")]
    pub subtotal: Decimal,
    #[schema(example = "360.08")]
    pub iva: Decimal,
    #[schema(example = "2610.58")]
    pub total: Decimal,
}

impl Totales {
    pub fn cero() -> Self {
        Self { subtotal: Decimal::ZERO, iva: Decimal::ZERO, total: Decimal::ZERO }
    }

    /// Fotografía a dos decimales para persistir en el agregado.
    pub fn redondeado(&self) -> Self {
        let r = |d: Decimal| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        Self { subtotal: r(self.subtotal), iva: r(self.iva), total: r(self.total) }
    }
}

// Detalle completo: agregado + cliente resuelto + partidas ordenadas
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CotizacionDetalle {
    #[serde(flatten)]
    pub cotizacion: Cotizacion,
    pub cliente: crate::models::clientes::Cliente,
    pub partidas: Vec<Partida>,
}
