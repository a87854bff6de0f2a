// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::get_me,
        handlers::auth::actualizar_perfil,

        // --- Usuarios ---
        handlers::usuarios::listar,
        handlers::usuarios::crear,
        handlers::usuarios::actualizar,
        handlers::usuarios::reset_password,

        // --- Clientes ---
        handlers::clientes::listar,
        handlers::clientes::obtener,
        handlers::clientes::crear,
        handlers::clientes::actualizar,
        handlers::clientes::eliminar,

        // --- Productos ---
        handlers::productos::listar,
        handlers::productos::buscar,
        handlers::productos::obtener,
        handlers::productos::crear,
        handlers::productos::actualizar,
        handlers::productos::desactivar,
        handlers::productos::eliminar,

        // --- Cotizaciones ---
        handlers::cotizaciones::listar,
        handlers::cotizaciones::obtener,
        handlers::cotizaciones::crear,
        handlers::cotizaciones::actualizar,
        handlers::cotizaciones::eliminar,
        handlers::cotizaciones::descargar_pdf,

        // --- Configuración ---
        handlers::configuracion::obtener,
        handlers::configuracion::actualizar,
        handlers::configuracion::regimenes,
        handlers::configuracion::subir_logo,
        handlers::configuracion::eliminar_logo,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Usuario,
            models::auth::Permisos,
            models::auth::PermisosModulo,
            models::auth::LoginPayload,
            models::auth::CrearUsuarioPayload,
            models::auth::ActualizarPerfilPayload,
            models::auth::ActualizarUsuarioPayload,
            models::auth::ResetPasswordPayload,
            models::auth::AuthResponse,

            // --- Clientes ---
            models::clientes::Cliente,
            models::clientes::ClientePayload,

            // --- Productos ---
            models::productos::Producto,
            models::productos::ProductoPayload,

            // --- Cotizaciones ---
            models::cotizaciones::CotizacionStatus,
            models::cotizaciones::Cotizacion,
            models::cotizaciones::CotizacionResumen,
            models::cotizaciones::Partida,
            models::cotizaciones::PartidaInput,
            models::cotizaciones::CotizacionPayload,
            models::cotizaciones::CotizacionDetalle,
            models::cotizaciones::Totales,

            // --- Configuración ---
            models::configuracion::Configuracion,
            models::configuracion::ActualizarConfiguracionPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticación y perfil propio"),
        (name = "Usuarios", description = "Gestión de cuentas (solo administrador)"),
        (name = "Clientes", description = "Cartera de clientes"),
        (name = "Productos", description = "Catálogo de productos"),
        (name = "Cotizaciones", description = "Cotizaciones, partidas y PDF"),
        (name = "Configuración", description = "Datos de la empresa y logo")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
