// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, path::PathBuf, time::Duration};

use crate::{
    db::{
        ClientesRepository, ConfiguracionRepository, CotizacionesRepository,
        ProductosRepository, UsuariosRepository,
    },
    services::{AuthService, CotizacionService, PdfService},
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub uploads_dir: PathBuf,

    pub clientes_repo: ClientesRepository,
    pub productos_repo: ProductosRepository,
    pub configuracion_repo: ConfiguracionRepository,

    pub auth_service: AuthService,
    pub cotizacion_service: CotizacionService,
    pub pdf_service: PdfService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL debe estar definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET debe estar definido");
        let uploads_dir =
            PathBuf::from(env::var("UPLOADS_DIR").unwrap_or_else(|_| "./uploads".to_string()));

        std::fs::create_dir_all(&uploads_dir)?;

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexión con la base de datos establecida con éxito!");

        // --- Arma el grafo de dependencias ---
        let usuarios_repo = UsuariosRepository::new(db_pool.clone());
        let clientes_repo = ClientesRepository::new(db_pool.clone());
        let productos_repo = ProductosRepository::new(db_pool.clone());
        let cotizaciones_repo = CotizacionesRepository::new(db_pool.clone());
        let configuracion_repo = ConfiguracionRepository::new(db_pool.clone());

        let auth_service = AuthService::new(usuarios_repo, jwt_secret);
        let cotizacion_service =
            CotizacionService::new(cotizaciones_repo, clientes_repo.clone());
        let pdf_service = PdfService::new(uploads_dir.clone());

        Ok(Self {
            db_pool,
            uploads_dir,
            clientes_repo,
            productos_repo,
            configuracion_repo,
            auth_service,
            cotizacion_service,
            pdf_service,
        })
    }
}
