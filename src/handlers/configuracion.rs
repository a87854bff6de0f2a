// src/handlers/configuracion.rs

use axum::{
    extract::{Multipart, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{constantes::REGIMENES_FISCALES, error::AppError},
    config::AppState,
    middleware::auth::RequiereAdmin,
    models::configuracion::{ActualizarConfiguracionPayload, Configuracion},
};

const LOGO_MAX_BYTES: usize = 2 * 1024 * 1024;

// GET /api/configuracion
#[utoipa::path(
    get,
    path = "/api/configuracion",
    tag = "Configuración",
    responses(
        (status = 200, description = "Configuración de la empresa", body = Configuracion)
    ),
    security(("api_jwt" = []))
)]
pub async fn obtener(
    State(app_state): State<AppState>,
) -> Result<Json<Configuracion>, AppError> {
    let config = app_state.configuracion_repo.obtener().await?;
    Ok(Json(config))
}

// PUT /api/configuracion
#[utoipa::path(
    put,
    path = "/api/configuracion",
    tag = "Configuración",
    request_body = ActualizarConfiguracionPayload,
    responses(
        (status = 200, description = "Configuración actualizada", body = Configuracion),
        (status = 403, description = "Requiere administrador")
    ),
    security(("api_jwt" = []))
)]
pub async fn actualizar(
    State(app_state): State<AppState>,
    _admin: RequiereAdmin,
    Json(payload): Json<ActualizarConfiguracionPayload>,
) -> Result<Json<Configuracion>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    app_state
        .configuracion_repo
        .guardar("nombre_empresa", Some(&payload.nombre_empresa))
        .await?;

    let config = app_state.configuracion_repo.obtener().await?;
    Ok(Json(config))
}

// GET /api/configuracion/regimenes
#[utoipa::path(
    get,
    path = "/api/configuracion/regimenes",
    tag = "Configuración",
    responses(
        (status = 200, description = "Catálogo de regímenes fiscales del SAT")
    ),
    security(("api_jwt" = []))
)]
pub async fn regimenes() -> Json<serde_json::Value> {
    let catalogo: Vec<serde_json::Value> = REGIMENES_FISCALES
        .iter()
        .map(|(clave, descripcion)| {
            serde_json::json!({ "clave": clave, "descripcion": descripcion })
        })
        .collect();
    Json(serde_json::Value::Array(catalogo))
}

// POST /api/configuracion/logo
#[utoipa::path(
    post,
    path = "/api/configuracion/logo",
    tag = "Configuración",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Logo actualizado", body = Configuracion),
        (status = 400, description = "Archivo inválido (tipo o tamaño)"),
        (status = 403, description = "Requiere administrador")
    ),
    security(("api_jwt" = []))
)]
pub async fn subir_logo(
    State(app_state): State<AppState>,
    _admin: RequiereAdmin,
    mut multipart: Multipart,
) -> Result<Json<Configuracion>, AppError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::ArchivoInvalido(e.to_string()))?
        .ok_or_else(|| AppError::ArchivoInvalido("No se recibió ningún archivo.".to_string()))?;

    let content_type = field.content_type().unwrap_or_default().to_string();
    let Some(subtipo) = content_type.strip_prefix("image/") else {
        return Err(AppError::ArchivoInvalido(
            "El logo debe ser una imagen (image/*).".to_string(),
        ));
    };
    // La extensión sale del subtipo MIME, no del nombre que mandó el cliente
    let extension = match subtipo {
        "jpeg" => "jpg",
        otro => otro,
    }
    .to_string();

    let datos = field
        .bytes()
        .await
        .map_err(|e| AppError::ArchivoInvalido(e.to_string()))?;

    if datos.len() > LOGO_MAX_BYTES {
        return Err(AppError::ArchivoInvalido(
            "El logo no puede pesar más de 2 MB.".to_string(),
        ));
    }

    let config_anterior = app_state.configuracion_repo.obtener().await?;

    let nombre_archivo = format!("logo-{}.{}", Uuid::new_v4(), extension);
    let ruta = app_state.uploads_dir.join(&nombre_archivo);
    tokio::fs::write(&ruta, &datos).await?;

    app_state
        .configuracion_repo
        .guardar("logo_url", Some(&format!("/uploads/{}", nombre_archivo)))
        .await?;

    // El logo anterior ya no se referencia; si el borrado falla solo
    // queda un archivo huérfano
    if let Some(url_anterior) = config_anterior.logo_url {
        if let Some(nombre_anterior) = std::path::Path::new(&url_anterior).file_name() {
            let ruta_anterior = app_state.uploads_dir.join(nombre_anterior);
            if let Err(e) = tokio::fs::remove_file(&ruta_anterior).await {
                tracing::warn!("No se pudo borrar el logo anterior {:?}: {}", ruta_anterior, e);
            }
        }
    }

    let config = app_state.configuracion_repo.obtener().await?;
    Ok(Json(config))
}

// DELETE /api/configuracion/logo
#[utoipa::path(
    delete,
    path = "/api/configuracion/logo",
    tag = "Configuración",
    responses(
        (status = 200, description = "Logo eliminado", body = Configuracion),
        (status = 403, description = "Requiere administrador")
    ),
    security(("api_jwt" = []))
)]
pub async fn eliminar_logo(
    State(app_state): State<AppState>,
    _admin: RequiereAdmin,
) -> Result<Json<Configuracion>, AppError> {
    let config_actual = app_state.configuracion_repo.obtener().await?;

    if let Some(url) = config_actual.logo_url {
        if let Some(nombre) = std::path::Path::new(&url).file_name() {
            let ruta = app_state.uploads_dir.join(nombre);
            if let Err(e) = tokio::fs::remove_file(&ruta).await {
                tracing::warn!("No se pudo borrar el archivo del logo {:?}: {}", ruta, e);
            }
        }
    }

    app_state.configuracion_repo.guardar("logo_url", None).await?;

    let config = app_state.configuracion_repo.obtener().await?;
    Ok(Json(config))
}
