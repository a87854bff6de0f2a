// src/handlers/clientes.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, formato::formatear_rfc},
    config::AppState,
    middleware::{
        auth::UsuarioActual,
        rbac::{PermClientesBorrar, PermClientesCrear, PermClientesEditar, RequierePermiso},
    },
    models::clientes::{Cliente, ClientePayload},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct BusquedaParams {
    /// Subcadena sobre nombre, razón social o RFC
    pub q: Option<String>,
}

// El RFC se guarda normalizado; la cadena vacía se guarda como NULL
// para no chocar con el índice único.
fn rfc_normalizado(payload: &ClientePayload) -> Option<String> {
    payload
        .rfc
        .as_deref()
        .map(formatear_rfc)
        .filter(|rfc| !rfc.is_empty())
}

// GET /api/clientes
#[utoipa::path(
    get,
    path = "/api/clientes",
    tag = "Clientes",
    params(BusquedaParams),
    responses(
        (status = 200, description = "Lista de clientes", body = Vec<Cliente>)
    ),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
    Query(params): Query<BusquedaParams>,
) -> Result<Json<Vec<Cliente>>, AppError> {
    let clientes = app_state
        .clientes_repo
        .listar(params.q.as_deref())
        .await?;
    Ok(Json(clientes))
}

// GET /api/clientes/{id}
#[utoipa::path(
    get,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID del cliente")),
    responses(
        (status = 200, description = "Cliente", body = Cliente),
        (status = 404, description = "Cliente no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn obtener(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Cliente>, AppError> {
    let cliente = app_state
        .clientes_repo
        .obtener(id)
        .await?
        .ok_or(AppError::NoEncontrado("Cliente"))?;
    Ok(Json(cliente))
}

// POST /api/clientes
#[utoipa::path(
    post,
    path = "/api/clientes",
    tag = "Clientes",
    request_body = ClientePayload,
    responses(
        (status = 201, description = "Cliente creado", body = Cliente),
        (status = 400, description = "Datos inválidos"),
        (status = 409, description = "RFC duplicado")
    ),
    security(("api_jwt" = []))
)]
pub async fn crear(
    State(app_state): State<AppState>,
    _perm: RequierePermiso<PermClientesCrear>,
    UsuarioActual(usuario): UsuarioActual,
    Json(payload): Json<ClientePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let rfc = rfc_normalizado(&payload);
    let cliente = app_state
        .clientes_repo
        .crear(&payload, rfc.as_deref(), usuario.id)
        .await?;

    Ok((StatusCode::CREATED, Json(cliente)))
}

// PUT /api/clientes/{id}
#[utoipa::path(
    put,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    request_body = ClientePayload,
    params(("id" = Uuid, Path, description = "ID del cliente")),
    responses(
        (status = 200, description = "Cliente actualizado", body = Cliente),
        (status = 404, description = "Cliente no encontrado"),
        (status = 409, description = "RFC duplicado")
    ),
    security(("api_jwt" = []))
)]
pub async fn actualizar(
    State(app_state): State<AppState>,
    _perm: RequierePermiso<PermClientesEditar>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ClientePayload>,
) -> Result<Json<Cliente>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let rfc = rfc_normalizado(&payload);
    let cliente = app_state
        .clientes_repo
        .actualizar(id, &payload, rfc.as_deref())
        .await?;

    Ok(Json(cliente))
}

// DELETE /api/clientes/{id}
#[utoipa::path(
    delete,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    params(("id" = Uuid, Path, description = "ID del cliente")),
    responses(
        (status = 204, description = "Cliente eliminado"),
        (status = 404, description = "Cliente no encontrado"),
        (status = 409, description = "El cliente tiene cotizaciones asociadas")
    ),
    security(("api_jwt" = []))
)]
pub async fn eliminar(
    State(app_state): State<AppState>,
    _perm: RequierePermiso<PermClientesBorrar>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.clientes_repo.eliminar(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
