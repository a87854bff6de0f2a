//src/main.rs

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaración de nuestros módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() está bien aquí: si la configuración falla, la aplicación no debe arrancar.
    let app_state = AppState::new()
        .await
        .expect("Falla al inicializar el estado de la aplicación.");

    // Corre las migraciones de SQLx en el arranque
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falla al correr las migraciones de la base de datos.");

    tracing::info!("✅ Migraciones de la base de datos ejecutadas con éxito!");

    app_state
        .auth_service
        .bootstrap_admin()
        .await
        .expect("Falla al verificar el administrador inicial.");

    // Rutas públicas de autenticación
    let auth_publicas = Router::new().route("/login", post(handlers::auth::login));

    // Perfil propio (protegido)
    let auth_protegidas = Router::new()
        .route(
            "/me",
            get(handlers::auth::get_me).put(handlers::auth::actualizar_perfil),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Gestión de usuarios (los extractores exigen administrador)
    let usuarios_routes = Router::new()
        .route(
            "/",
            get(handlers::usuarios::listar).post(handlers::usuarios::crear),
        )
        .route("/{id}", put(handlers::usuarios::actualizar))
        .route(
            "/{id}/reset-password",
            post(handlers::usuarios::reset_password),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let clientes_routes = Router::new()
        .route(
            "/",
            get(handlers::clientes::listar).post(handlers::clientes::crear),
        )
        .route(
            "/{id}",
            get(handlers::clientes::obtener)
                .put(handlers::clientes::actualizar)
                .delete(handlers::clientes::eliminar),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let productos_routes = Router::new()
        .route(
            "/",
            get(handlers::productos::listar).post(handlers::productos::crear),
        )
        .route("/buscar", get(handlers::productos::buscar))
        .route(
            "/{id}",
            get(handlers::productos::obtener)
                .put(handlers::productos::actualizar)
                .delete(handlers::productos::eliminar),
        )
        .route("/{id}/desactivar", post(handlers::productos::desactivar))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let cotizaciones_routes = Router::new()
        .route(
            "/",
            get(handlers::cotizaciones::listar).post(handlers::cotizaciones::crear),
        )
        .route(
            "/{id}",
            get(handlers::cotizaciones::obtener)
                .put(handlers::cotizaciones::actualizar)
                .delete(handlers::cotizaciones::eliminar),
        )
        .route("/{id}/pdf", get(handlers::cotizaciones::descargar_pdf))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let configuracion_routes = Router::new()
        .route(
            "/",
            get(handlers::configuracion::obtener).put(handlers::configuracion::actualizar),
        )
        .route("/regimenes", get(handlers::configuracion::regimenes))
        .route(
            "/logo",
            post(handlers::configuracion::subir_logo)
                .delete(handlers::configuracion::eliminar_logo)
                // El logo puede pesar hasta 2 MB más el sobrecosto del multipart
                .layer(DefaultBodyLimit::max(5 * 1024 * 1024)),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina todo en el router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_publicas.merge(auth_protegidas))
        .nest("/api/usuarios", usuarios_routes)
        .nest("/api/clientes", clientes_routes)
        .nest("/api/productos", productos_routes)
        .nest("/api/cotizaciones", cotizaciones_routes)
        .nest("/api/configuracion", configuracion_routes)
        .nest_service("/uploads", ServeDir::new(app_state.uploads_dir.clone()))
        .merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Arranca el servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falla al iniciar el listener TCP");
    tracing::info!("🚀 Servidor escuchando en {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Error en el servidor Axum");
}
