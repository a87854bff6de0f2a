// src/handlers/cotizaciones.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
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
    middleware::{
        auth::UsuarioActual,
        rbac::{
            PermCotizacionesBorrar, PermCotizacionesCrear, PermCotizacionesEditar,
            RequierePermiso,
        },
    },
    models::cotizaciones::{CotizacionDetalle, CotizacionPayload, CotizacionResumen},
    services::pdf_service,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListadoParams {
    /// Recorte por antigüedad de la fecha de emisión (ej. 30, 90, 365)
    pub dias: Option<i32>,
    /// Subcadena sobre folio, título o cliente
    pub q: Option<String>,
}

// GET /api/cotizaciones
#[utoipa::path(
    get,
    path = "/api/cotizaciones",
    tag = "Cotizaciones",
    params(ListadoParams),
    responses(
        (status = 200, description = "Listado de cotizaciones", body = Vec<CotizacionResumen>)
    ),
    security(("api_jwt" = []))
)]
pub async fn listar(
    State(app_state): State<AppState>,
    Query(params): Query<ListadoParams>,
) -> Result<Json<Vec<CotizacionResumen>>, AppError> {
    let resumenes = app_state
        .cotizacion_service
        .listar(params.dias, params.q.as_deref())
        .await?;
    Ok(Json(resumenes))
}

// GET /api/cotizaciones/{id}
#[utoipa::path(
    get,
    path = "/api/cotizaciones/{id}",
    tag = "Cotizaciones",
    params(("id" = Uuid, Path, description = "ID de la cotización")),
    responses(
        (status = 200, description = "Detalle con cliente y partidas", body = CotizacionDetalle),
        (status = 404, description = "Cotización no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn obtener(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CotizacionDetalle>, AppError> {
    let detalle = app_state.cotizacion_service.detalle(id).await?;
    Ok(Json(detalle))
}

// POST /api/cotizaciones
#[utoipa::path(
    post,
    path = "/api/cotizaciones",
    tag = "Cotizaciones",
    request_body = CotizacionPayload,
    responses(
        (status = 201, description = "Cotización creada con folio asignado", body = CotizacionDetalle),
        (status = 400, description = "Datos inválidos"),
        (status = 404, description = "Cliente no encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn crear(
    State(app_state): State<AppState>,
    _perm: RequierePermiso<PermCotizacionesCrear>,
    UsuarioActual(usuario): UsuarioActual,
    Json(payload): Json<CotizacionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let detalle = app_state
        .cotizacion_service
        .crear(payload, usuario.id)
        .await?;

    Ok((StatusCode::CREATED, Json(detalle)))
}

// PUT /api/cotizaciones/{id}
#[utoipa::path(
    put,
    path = "/api/cotizaciones/{id}",
    tag = "Cotizaciones",
    request_body = CotizacionPayload,
    params(("id" = Uuid, Path, description = "ID de la cotización")),
    responses(
        (status = 200, description = "Cotización guardada", body = CotizacionDetalle),
        (status = 404, description = "Cotización no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn actualizar(
    State(app_state): State<AppState>,
    _perm: RequierePermiso<PermCotizacionesEditar>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CotizacionPayload>,
) -> Result<Json<CotizacionDetalle>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let detalle = app_state.cotizacion_service.guardar(id, payload).await?;

    Ok(Json(detalle))
}

// DELETE /api/cotizaciones/{id}
#[utoipa::path(
    delete,
    path = "/api/cotizaciones/{id}",
    tag = "Cotizaciones",
    params(("id" = Uuid, Path, description = "ID de la cotización")),
    responses(
        (status = 204, description = "Cotización eliminada (las partidas caen en cascada)"),
        (status = 404, description = "Cotización no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn eliminar(
    State(app_state): State<AppState>,
    _perm: RequierePermiso<PermCotizacionesBorrar>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.cotizacion_service.eliminar(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/cotizaciones/{id}/pdf
#[utoipa::path(
    get,
    path = "/api/cotizaciones/{id}/pdf",
    tag = "Cotizaciones",
    params(("id" = Uuid, Path, description = "ID de la cotización")),
    responses(
        (status = 200, description = "Documento PDF", content_type = "application/pdf"),
        (status = 404, description = "Cotización no encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn descargar_pdf(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detalle = app_state.cotizacion_service.detalle(id).await?;
    let config = app_state.configuracion_repo.obtener().await?;

    let nombre = pdf_service::nombre_archivo(detalle.cotizacion.numero_cotizacion);

    // La composición del PDF es trabajo de CPU; fuera del executor
    let servicio = app_state.pdf_service.clone();
    let buffer = tokio::task::spawn_blocking(move || servicio.generar(&detalle, &config))
        .await
        .map_err(|e| anyhow::anyhow!("Falla en la task de render del PDF: {}", e))??;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", nombre),
            ),
        ],
        buffer,
    ))
}
