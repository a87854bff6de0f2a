// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::{common::error::AppError, config::AppState, models::auth::Usuario};

// Guardia de autenticación. Valida el Bearer token y resuelve al
// usuario UNA sola vez por petición; handlers y extractores leen el
// usuario ya resuelto de las extensions, nunca vuelven a la base.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let headers = request.headers();
    let auth_header = headers.get("Authorization").and_then(|value| value.to_str().ok());

    if let Some(auth_header) = auth_header {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            let usuario = app_state.auth_service.validate_token(token).await?;

            request.extensions_mut().insert(usuario);
            return Ok(next.run(request).await);
        }
    }

    Err(AppError::InvalidToken)
}

// Extractor para obtener el usuario autenticado directamente en los handlers
pub struct UsuarioActual(pub Usuario);

impl<S> FromRequestParts<S> for UsuarioActual
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Usuario>()
            .cloned()
            .map(UsuarioActual)
            .ok_or(AppError::InvalidToken)
    }
}

// Extractor que solo deja pasar administradores
pub struct RequiereAdmin(pub Usuario);

impl<S> FromRequestParts<S> for RequiereAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let usuario = parts
            .extensions
            .get::<Usuario>()
            .cloned()
            .ok_or(AppError::InvalidToken)?;

        if !usuario.is_admin {
            return Err(AppError::RequiereAdmin);
        }

        Ok(RequiereAdmin(usuario))
    }
}
