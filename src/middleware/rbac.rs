// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{common::error::AppError, models::auth::Usuario};

/// Lo que define un permiso: su slug "modulo:accion".
pub trait PermisoDef: Send + Sync + 'static {
    fn slug() -> &'static str;
}

/// Extractor guardián. La matriz de permisos ya viene en el usuario
/// resuelto por auth_guard, así que la verificación es local; el
/// administrador pasa cualquier verificación sin consultar la matriz.
pub struct RequierePermiso<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequierePermiso<T>
where
    T: PermisoDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let usuario = parts
            .extensions
            .get::<Usuario>()
            .ok_or(AppError::InvalidToken)?;

        let slug = T::slug();

        if usuario.is_admin || usuario.permisos.permite(slug) {
            return Ok(RequierePermiso(PhantomData));
        }

        Err(AppError::PermisoDenegado(slug))
    }
}

// ---
// DEFINICIÓN DE LOS PERMISOS (TIPOS)
// ---

pub struct PermCotizacionesCrear;
impl PermisoDef for PermCotizacionesCrear {
    fn slug() -> &'static str { "cotizaciones:crear" }
}

pub struct PermCotizacionesEditar;
impl PermisoDef for PermCotizacionesEditar {
    fn slug() -> &'static str { "cotizaciones:editar" }
}

pub struct PermCotizacionesBorrar;
impl PermisoDef for PermCotizacionesBorrar {
    fn slug() -> &'static str { "cotizaciones:borrar" }
}

pub struct PermClientesCrear;
impl PermisoDef for PermClientesCrear {
    fn slug() -> &'static str { "clientes:crear" }
}

pub struct PermClientesEditar;
impl PermisoDef for PermClientesEditar {
    fn slug() -> &'static str { "clientes:editar" }
}

pub struct PermClientesBorrar;
impl PermisoDef for PermClientesBorrar {
    fn slug() -> &'static str { "clientes:borrar" }
}
