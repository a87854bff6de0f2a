// src/handlers/auth.rs

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::UsuarioActual,
    models::auth::{ActualizarPerfilPayload, AuthResponse, LoginPayload, Usuario},
};

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginPayload,
    responses(
        (status = 200, description = "Sesión iniciada", body = AuthResponse),
        (status = 401, description = "Credenciales inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let token = app_state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(AuthResponse { token }))
}

// GET /api/auth/me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Usuario autenticado", body = Usuario)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(UsuarioActual(usuario): UsuarioActual) -> Json<Usuario> {
    Json(usuario)
}

// PUT /api/auth/me
#[utoipa::path(
    put,
    path = "/api/auth/me",
    tag = "Auth",
    request_body = ActualizarPerfilPayload,
    responses(
        (status = 200, description = "Perfil actualizado", body = Usuario)
    ),
    security(("api_jwt" = []))
)]
pub async fn actualizar_perfil(
    State(app_state): State<AppState>,
    UsuarioActual(usuario): UsuarioActual,
    Json(payload): Json<ActualizarPerfilPayload>,
) -> Result<Json<Usuario>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let actualizado = app_state
        .auth_service
        .actualizar_perfil(usuario.id, payload)
        .await?;

    Ok(Json(actualizado))
}
