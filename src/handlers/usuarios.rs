// src/handlers/usuarios.rs
//
// Gestión de cuentas. Todas estas rutas exigen administrador: el alta
// de usuarios y el restablecimiento de contraseñas son el canal
// administrativo, no hay autoregistro ni recuperación por correo.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::RequiereAdmin,
    models::auth::{
        ActualizarUsuarioPayload, CrearUsuarioPayload, ResetPasswordPayload, Usuario,
    },
};

// GET /api/usuarios
#[utoipa::path(
    get,
    path = "/api/usuarios",
    tag = "Usuarios",
    responses(
        (status = 200, description = "Lista de usuarios", body = Vec<Usuario>),
        (status = 403, description = "Requiere administrador")
    ),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
    _admin: RequiereAdmin,
) -> Result<Json<Vec<Usuario>>, AppError> {
    let usuarios = app_state.auth_service.listar_usuarios().await?;
    Ok(Json(usuarios))
}

// POST /api/usuarios
#[utoipa::path(
    post,
    path = "/api/usuarios",
    tag = "Usuarios",
    request_body = CrearUsuarioPayload,
    responses(
        (status = 201, description = "Usuario creado", body = Usuario),
        (status = 409, description = "El e-mail ya está registrado"),
        (status = 403, description = "Requiere administrador")
    ),
    security(("api_jwt" = []))
)]
pub async fn crear(
    State(app_state): State<AppState>,
    _admin: RequiereAdmin,
    Json(payload): Json<CrearUsuarioPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let usuario = app_state.auth_service.crear_usuario(payload).await?;

    Ok((StatusCode::CREATED, Json(usuario)))
}

// PUT /api/usuarios/{id}
#[utoipa::path(
    put,
    path = "/api/usuarios/{id}",
    tag = "Usuarios",
    request_body = ActualizarUsuarioPayload,
    params(("id" = Uuid, Path, description = "ID del usuario")),
    responses(
        (status = 200, description = "Usuario actualizado", body = Usuario),
        (status = 404, description = "Usuario no encontrado"),
        (status = 403, description = "Requiere administrador")
    ),
    security(("api_jwt" = []))
)]
pub async fn actualizar(
    State(app_state): State<AppState>,
    _admin: RequiereAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<ActualizarUsuarioPayload>,
) -> Result<Json<Usuario>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let usuario = app_state.auth_service.actualizar_usuario(id, payload).await?;

    Ok(Json(usuario))
}

// POST /api/usuarios/{id}/reset-password
#[utoipa::path(
    post,
    path = "/api/usuarios/{id}/reset-password",
    tag = "Usuarios",
    request_body = ResetPasswordPayload,
    params(("id" = Uuid, Path, description = "ID del usuario")),
    responses(
        (status = 204, description = "Contraseña restablecida"),
        (status = 404, description = "Usuario no encontrado"),
        (status = 403, description = "Requiere administrador")
    ),
    security(("api_jwt" = []))
)]
pub async fn reset_password(
    State(app_state): State<AppState>,
    _admin: RequiereAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<ResetPasswordPayload>,
) -> Result<StatusCode, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state
        .auth_service
        .reset_password(id, &payload.new_password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
