// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;
use utoipa::ToSchema;

/// Permisos de un módulo: la terna crear/editar/borrar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct PermisosModulo {
    pub crear: bool,
    pub editar: bool,
    pub borrar: bool,
}

impl PermisosModulo {
    pub fn todos() -> Self {
        Self { crear: true, editar: true, borrar: true }
    }

    pub fn ninguno() -> Self {
        Self { crear: false, editar: false, borrar: false }
    }
}

/// Matriz de permisos módulo × acción que se guarda como JSONB.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Permisos {
    pub cotizaciones: PermisosModulo,
    pub clientes: PermisosModulo,
    pub usuarios: PermisosModulo,
}

impl Default for Permisos {
    // Un usuario nuevo puede trabajar cotizaciones y clientes;
    // la gestión de usuarios queda reservada al administrador.
    fn default() -> Self {
        Self {
            cotizaciones: PermisosModulo::todos(),
            clientes: PermisosModulo::todos(),
            usuarios: PermisosModulo::ninguno(),
        }
    }
}

impl Permisos {
    /// Resuelve un slug "modulo:accion" contra la matriz.
    pub fn permite(&self, slug: &str) -> bool {
        let Some((modulo, accion)) = slug.split_once(':') else {
            return false;
        };
        let permisos = match modulo {
            "cotizaciones" => &self.cotizaciones,
            "clientes" => &self.clientes,
            "usuarios" => &self.usuarios,
            _ => return false,
        };
        match accion {
            "crear" => permisos.crear,
            "editar" => permisos.editar,
            "borrar" => permisos.borrar,
            _ => false,
        }
    }
}

// Representa un usuario que viene de la base de datos
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Usuario {
    pub id: Uuid,
    #[schema(example = "ana@cvasystems.mx")]
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para seguridad
    #[schema(ignore)]
    pub password_hash: String,

    #[schema(example = "Ana Torres")]
    pub nombre: String,
    pub telefono: Option<String>,
    pub is_admin: bool,
    pub activo: bool,

    #[schema(value_type = Permisos)]
    pub permisos: sqlx::types::Json<Permisos>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Datos para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(email(message = "El e-mail proporcionado es inválido."))]
    #[schema(example = "ana@cvasystems.mx")]
    pub email: String,
    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres."))]
    pub password: String,
}

// Alta de usuario con credenciales (solo administrador)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CrearUsuarioPayload {
    #[validate(length(min = 1, message = "El nombre es requerido."))]
    #[schema(example = "Ana Torres")]
    pub nombre: String,
    #[validate(email(message = "El e-mail proporcionado es inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres."))]
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
    pub permisos: Option<Permisos>,
}

// Edición del propio perfil (el e-mail es inmutable)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ActualizarPerfilPayload {
    #[validate(length(min = 1, message = "El nombre es requerido."))]
    pub nombre: String,
    pub telefono: Option<String>,
}

// Edición de otro usuario (solo administrador)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActualizarUsuarioPayload {
    #[validate(length(min = 1, message = "El nombre es requerido."))]
    pub nombre: String,
    pub telefono: Option<String>,
    pub is_admin: bool,
    pub activo: bool,
    pub permisos: Permisos,
}

// Restablecimiento de contraseña de otro usuario (solo administrador)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordPayload {
    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres."))]
    pub new_password: String,
}

// Respuesta de autenticación con el token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Estructura de datos ("claims") dentro del JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID del usuario)
    pub exp: usize, // Expiration time
    pub iat: usize, // Issued At
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matriz_resuelve_slugs() {
        let permisos = Permisos::default();
        assert!(permisos.permite("cotizaciones:crear"));
        assert!(permisos.permite("clientes:borrar"));
        assert!(!permisos.permite("usuarios:crear"));
        assert!(!permisos.permite("inventario:crear"));
        assert!(!permisos.permite("cotizaciones"));
    }
}
