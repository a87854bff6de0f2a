// src/models/clientes.rs

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::formato::formatear_rfc;

lazy_static! {
    // Patrón del RFC: 3-4 letras (incluye Ñ y &), 6 dígitos de fecha, 3 de homoclave
    static ref RFC_REGEX: Regex = Regex::new(r"^[A-ZÑ&]{3,4}\d{6}[A-Z0-9]{3}$").unwrap();
}

/// Valida un RFC ya capturado. El RFC vacío es válido (campo opcional);
/// se normaliza (mayúsculas, sin espacios) antes de comparar el patrón.
pub fn validar_rfc(rfc: &str) -> Result<(), ValidationError> {
    if rfc.is_empty() {
        return Ok(());
    }
    let normalizado = formatear_rfc(rfc);
    if RFC_REGEX.is_match(&normalizado) {
        Ok(())
    } else {
        let mut err = ValidationError::new("rfc_invalido");
        err.message = Some("RFC inválido".into());
        Err(err)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Cliente {
    pub id: Uuid,
    #[schema(example = "OXXO")]
    pub nombre: String,
    #[schema(example = "Cadena Comercial OXXO S.A. de C.V.")]
    pub razon_social: Option<String>,
    #[schema(example = "CCO8605231N4")]
    pub rfc: Option<String>,
    pub domicilio_fiscal: Option<String>,
    pub email: Option<String>,
    pub telefono: Option<String>,
    #[schema(example = "601")]
    pub regimen_fiscal: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientePayload {
    #[validate(length(min = 1, message = "El nombre es requerido."))]
    #[schema(example = "OXXO")]
    pub nombre: String,
    pub razon_social: Option<String>,
    #[validate(custom(function = "validar_rfc"))]
    #[schema(example = "CCO8605231N4")]
    pub rfc: Option<String>,
    pub domicilio_fiscal: Option<String>,
    #[validate(email(message = "Email inválido"))]
    pub email: Option<String>,
    pub telefono: Option<String>,
    pub regimen_fiscal: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc_valido_persona_moral() {
        assert!(validar_rfc("CCO8605231N4").is_ok());
    }

    #[test]
    fn rfc_valido_persona_fisica() {
        // 4 letras iniciales
        assert!(validar_rfc("GOMC850101AB1").is_ok());
    }

    #[test]
    fn rfc_se_acepta_tras_normalizar() {
        assert!(validar_rfc(" cco 860523 1n4 ").is_ok());
    }

    #[test]
    fn rfc_con_enie_y_ampersand() {
        assert!(validar_rfc("ÑA&8601011A0").is_ok());
    }

    #[test]
    fn rfc_vacio_es_valido() {
        assert!(validar_rfc("").is_ok());
    }

    #[test]
    fn rfc_invalido_se_rechaza() {
        assert!(validar_rfc("123456").is_err());
        assert!(validar_rfc("ABCD12345XYZ").is_err()); // fecha incompleta
        assert!(validar_rfc("AB860101AAA").is_err()); // solo dos letras
    }
}
