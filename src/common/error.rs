use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nuestro tipo de error, con `thiserror` para mejor ergonomía.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de validación")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("El e-mail ya existe")]
    EmailAlreadyExists,

    #[error("Credenciales inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuario no encontrado")]
    UserNotFound,

    #[error("Usuario inactivo")]
    UsuarioInactivo,

    #[error("{0} no encontrado")]
    NoEncontrado(&'static str),

    #[error("Se requiere rol de administrador")]
    RequiereAdmin,

    #[error("Permiso denegado: {0}")]
    PermisoDenegado(&'static str),

    // Violaciones de unicidad (RFC o código duplicado). El mensaje ya
    // viene listo para el usuario.
    #[error("Conflicto de unicidad: {0}")]
    UniqueConstraintViolation(String),

    // Integridad referencial: el cliente tiene cotizaciones que lo referencian.
    #[error("El cliente tiene cotizaciones asociadas")]
    ClienteConCotizaciones,

    #[error("Archivo inválido: {0}")]
    ArchivoInvalido(String),

    #[error("Fuente no encontrada: {0}")]
    FontNotFound(String),

    // Variante para errores de base de datos
    #[error("Error de base de datos")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para cualquier otro error inesperado.
    // `anyhow::Error` captura el contexto del error.
    #[error("Error interno del servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Error de E/S")]
    IoError(#[from] std::io::Error),

    #[error("Error de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Error de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Regresamos todos los detalles de la validación, campo por campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Uno o más campos son inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::EmailAlreadyExists => {
                (StatusCode::CONFLICT, "Este e-mail ya está en uso.".to_string())
            }
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "E-mail o contraseña inválidos.".to_string())
            }
            AppError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, "Token de autenticación inválido o ausente.".to_string())
            }
            AppError::UsuarioInactivo => {
                (StatusCode::UNAUTHORIZED, "El usuario está desactivado.".to_string())
            }
            AppError::UserNotFound => {
                (StatusCode::NOT_FOUND, "Usuario no encontrado.".to_string())
            }
            AppError::NoEncontrado(recurso) => {
                (StatusCode::NOT_FOUND, format!("{} no encontrado.", recurso))
            }
            AppError::RequiereAdmin => {
                (StatusCode::FORBIDDEN, "No tienes permisos para esta acción.".to_string())
            }
            AppError::PermisoDenegado(permiso) => {
                (StatusCode::FORBIDDEN, format!("Necesitas el permiso '{}' para realizar esta acción.", permiso))
            }
            AppError::UniqueConstraintViolation(msg) => (StatusCode::CONFLICT, msg),
            AppError::ClienteConCotizaciones => {
                (StatusCode::CONFLICT, "El cliente tiene cotizaciones asociadas.".to_string())
            }
            AppError::ArchivoInvalido(msg) => (StatusCode::BAD_REQUEST, msg),

            // Todo lo demás (DatabaseError, InternalServerError, etc.) se vuelve 500.
            // El `tracing` deja registrado el detalle que `thiserror` nos dio.
            ref e => {
                tracing::error!("Error interno del servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocurrió un error inesperado.".to_string())
            }
        };

        // Respuesta estándar para errores simples que solo llevan un mensaje.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
