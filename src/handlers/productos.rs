// src/handlers/productos.rs
//
// El catálogo es administración central: cualquier usuario autenticado
// lo consulta, pero solo el administrador lo modifica.

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
    common::error::AppError,
    config::AppState,
    middleware::auth::RequiereAdmin,
    models::productos::{Producto, ProductoPayload},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct BusquedaParams {
    /// Subcadena sobre nombre, código o descripción
    pub q: Option<String>,
}

fn codigo_normalizado(payload: &ProductoPayload) -> Option<String> {
    payload
        .codigo
        .as_deref()
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty())
}

// GET /api/productos
#[utoipa::path(
    get,
    path = "/api/productos",
    tag = "Productos",
    responses(
        (status = 200, description = "Catálogo completo", body = Vec<Producto>)
    ),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Producto>>, AppError> {
    let productos = app_state.productos_repo.listar().await?;
    Ok(Json(productos))
}

// GET /api/productos/buscar
#[utoipa::path(
    get,
    path = "/api/productos/buscar",
    tag = "Productos",
    params(BusquedaParams),
    responses(
        (status = 200, description = "Sugerencias para el combobox (máximo 10, solo activos)", body = Vec<Producto>)
    ),
    security(("api_jwt" = []))
)]
pub async fn buscar(
    State(app_state): State<AppState>,
    Query(params): Query<BusquedaParams>,
) -> Result<Json<Vec<Producto>>, AppError> {
    let termino = params.q.unwrap_or_default();
    let productos = app_state.productos_repo.buscar(&termino).await?;
    Ok(Json(productos))
}

// GET /api/productos/{id}
#[utoipa::path(
    get,
    path = "/api/productos/{id}",
    tag = "Productos",
    params(("id" = Uuid, Path, description = "ID del producto")),
    responses(
        (status = 200, description = "Producto", body = Producto),
        (status = 404, description = "Producto no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn obtener(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Producto>, AppError> {
    let producto = app_state
        .productos_repo
        .obtener(id)
        .await?
        .ok_or(AppError::NoEncontrado("Producto"))?;
    Ok(Json(producto))
}

// POST /api/productos
#[utoipa::path(
    post,
    path = "/api/productos",
    tag = "Productos",
    request_body = ProductoPayload,
    responses(
        (status = 201, description = "Producto creado", body = Producto),
        (status = 403, description = "Requiere administrador"),
        (status = 409, description = "Código duplicado")
    ),
    security(("api_jwt" = []))
)]
pub async fn crear(
    State(app_state): State<AppState>,
    _admin: RequiereAdmin,
    Json(payload): Json<ProductoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let codigo = codigo_normalizado(&payload);
    let producto = app_state
        .productos_repo
        .crear(&payload, codigo.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(producto)))
}

// PUT /api/productos/{id}
#[utoipa::path(
    put,
    path = "/api/productos/{id}",
    tag = "Productos",
    request_body = ProductoPayload,
    params(("id" = Uuid, Path, description = "ID del producto")),
    responses(
        (status = 200, description = "Producto actualizado", body = Producto),
        (status = 404, description = "Producto no encontrado"),
        (status = 409, description = "Código duplicado")
    ),
    security(("api_jwt" = []))
)]
pub async fn actualizar(
    State(app_state): State<AppState>,
    _admin: RequiereAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProductoPayload>,
) -> Result<Json<Producto>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let codigo = codigo_normalizado(&payload);
    let producto = app_state
        .productos_repo
        .actualizar(id, &payload, codigo.as_deref())
        .await?;

    Ok(Json(producto))
}

// POST /api/productos/{id}/desactivar
#[utoipa::path(
    post,
    path = "/api/productos/{id}/desactivar",
    tag = "Productos",
    params(("id" = Uuid, Path, description = "ID del producto")),
    responses(
        (status = 200, description = "Producto desactivado", body = Producto),
        (status = 404, description = "Producto no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn desactivar(
    State(app_state): State<AppState>,
    _admin: RequiereAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<Producto>, AppError> {
    let producto = app_state.productos_repo.desactivar(id).await?;
    Ok(Json(producto))
}

// DELETE /api/productos/{id}
#[utoipa::path(
    delete,
    path = "/api/productos/{id}",
    tag = "Productos",
    params(("id" = Uuid, Path, description = "ID del producto")),
    responses(
        (status = 204, description = "Producto eliminado"),
        (status = 404, description = "Producto no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn eliminar(
    State(app_state): State<AppState>,
    _admin: RequiereAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.productos_repo.eliminar(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
