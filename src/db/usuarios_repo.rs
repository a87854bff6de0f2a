// src/db/usuarios_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Permisos, Usuario},
};

// El repositorio de usuarios, responsable de todas las interacciones
// con la tabla 'usuarios'.
#[derive(Clone)]
pub struct UsuariosRepository {
    pool: PgPool,
}

impl UsuariosRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca un usuario por su e-mail
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Usuario>, AppError> {
        let maybe_usuario = sqlx::query_as::<_, Usuario>(
            "SELECT * FROM usuarios WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_usuario)
    }

    // Busca un usuario por su ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Usuario>, AppError> {
        let maybe_usuario = sqlx::query_as::<_, Usuario>(
            "SELECT * FROM usuarios WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_usuario)
    }

    pub async fn listar(&self) -> Result<Vec<Usuario>, AppError> {
        let usuarios = sqlx::query_as::<_, Usuario>(
            "SELECT * FROM usuarios ORDER BY nombre ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(usuarios)
    }

    // Crea un nuevo usuario, con tratamiento específico para e-mails duplicados
    pub async fn crear(
        &self,
        email: &str,
        password_hash: &str,
        nombre: &str,
        is_admin: bool,
        permisos: &Permisos,
    ) -> Result<Usuario, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>(
            r#"
            INSERT INTO usuarios (email, password_hash, nombre, is_admin, permisos)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(nombre)
        .bind(is_admin)
        .bind(sqlx::types::Json(permisos))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            e.into()
        })?;

        Ok(usuario)
    }

    // Edición del propio perfil: solo nombre y teléfono
    pub async fn actualizar_perfil(
        &self,
        id: Uuid,
        nombre: &str,
        telefono: Option<&str>,
    ) -> Result<Usuario, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>(
            r#"
            UPDATE usuarios
            SET nombre = $1, telefono = $2, updated_at = NOW()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(nombre)
        .bind(telefono)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::UserNotFound)?;

        Ok(usuario)
    }

    // Edición administrativa: datos, bandera de admin, activo y matriz de permisos.
    // El e-mail nunca se actualiza (inmutable tras la creación).
    pub async fn actualizar(
        &self,
        id: Uuid,
        nombre: &str,
        telefono: Option<&str>,
        is_admin: bool,
        activo: bool,
        permisos: &Permisos,
    ) -> Result<Usuario, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>(
            r#"
            UPDATE usuarios
            SET nombre = $1, telefono = $2, is_admin = $3, activo = $4,
                permisos = $5, updated_at = NOW()
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(nombre)
        .bind(telefono)
        .bind(is_admin)
        .bind(activo)
        .bind(sqlx::types::Json(permisos))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::UserNotFound)?;

        Ok(usuario)
    }

    pub async fn actualizar_password(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE usuarios SET password_hash = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(password_hash)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::UserNotFound);
        }
        Ok(())
    }
}
