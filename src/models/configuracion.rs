// src/models/configuracion.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

// Renglón crudo de la tabla clave-valor
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ConfigItem {
    pub clave: String,
    pub valor: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Vista armada de la configuración que consume el frontend y el PDF.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Configuracion {
    #[schema(example = "CVA Systems")]
    pub nombre_empresa: String,
    pub logo_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarConfiguracionPayload {
    #[validate(length(min = 1, message = "El nombre de la empresa es requerido."))]
    #[schema(example = "CVA Systems")]
    pub nombre_empresa: String,
}
