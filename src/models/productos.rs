// src/models/productos.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Producto {
    pub id: Uuid,
    #[schema(example = "CAM-DOMO-4MP")]
    pub codigo: Option<String>,
    #[schema(example = "Cámara domo 4MP")]
    pub nombre: String,
    pub descripcion: Option<String>,
    #[schema(example = "1850.00")]
    pub precio: Decimal,
    #[schema(example = "Cámaras")]
    pub categoria: Option<String>,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn precio_no_negativo(precio: &Decimal) -> Result<(), ValidationError> {
    if precio.is_sign_negative() {
        let mut err = ValidationError::new("precio_negativo");
        err.message = Some("El precio no puede ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductoPayload {
    #[schema(example = "CAM-DOMO-4MP")]
    pub codigo: Option<String>,
    #[validate(length(min = 1, message = "El nombre es requerido."))]
    #[schema(example = "Cámara domo 4MP")]
    pub nombre: String,
    pub descripcion: Option<String>,
    #[validate(custom(function = "precio_no_negativo"))]
    #[schema(example = "1850.00")]
    pub precio: Decimal,
    pub categoria: Option<String>,
    #[serde(default = "activo_default")]
    pub activo: bool,
}

fn activo_default() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn precio_negativo_se_rechaza() {
        assert!(precio_no_negativo(&Decimal::from_str("-0.01").unwrap()).is_err());
        assert!(precio_no_negativo(&Decimal::ZERO).is_ok());
        assert!(precio_no_negativo(&Decimal::from_str("1850.00").unwrap()).is_ok());
    }
}
