// src/db/configuracion_repo.rs

use sqlx::PgPool;

use crate::{
    common::{constantes::NOMBRE_EMPRESA_DEFAULT, error::AppError},
    models::configuracion::{ConfigItem, Configuracion},
};

#[derive(Clone)]
pub struct ConfiguracionRepository {
    pool: PgPool,
}

impl ConfiguracionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Arma la vista de configuración a partir de la tabla clave-valor.
    /// Claves ausentes caen al valor por defecto en lugar de fallar.
    pub async fn obtener(&self) -> Result<Configuracion, AppError> {
        let items = sqlx::query_as::<_, ConfigItem>("SELECT * FROM configuracion")
            .fetch_all(&self.pool)
            .await?;

        let mut config = Configuracion {
            nombre_empresa: NOMBRE_EMPRESA_DEFAULT.to_string(),
            logo_url: None,
        };

        for item in items {
            match item.clave.as_str() {
                "nombre_empresa" => {
                    if let Some(valor) = item.valor {
                        config.nombre_empresa = valor;
                    }
                }
                "logo_url" => config.logo_url = item.valor,
                _ => {}
            }
        }

        Ok(config)
    }

    pub async fn guardar(&self, clave: &str, valor: Option<&str>) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO configuracion (clave, valor)
            VALUES ($1, $2)
            ON CONFLICT (clave)
            DO UPDATE SET valor = EXCLUDED.valor, updated_at = NOW()
            "#,
        )
        .bind(clave)
        .bind(valor)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
