// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UsuariosRepository,
    models::auth::{
        ActualizarPerfilPayload, ActualizarUsuarioPayload, Claims, CrearUsuarioPayload, Permisos,
        Usuario,
    },
};

#[derive(Clone)]
pub struct AuthService {
    usuarios_repo: UsuariosRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(usuarios_repo: UsuariosRepository, jwt_secret: String) -> Self {
        Self { usuarios_repo, jwt_secret }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        let usuario = self
            .usuarios_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = usuario.password_hash.clone();

        // La verificación de bcrypt es pesada; no bloquea el runtime
        let password_valida = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falla en la task de verificación de contraseña: {}", e))?
        ?;

        if !password_valida {
            return Err(AppError::InvalidCredentials);
        }

        // Una cuenta desactivada conserva su fila pero no entra
        if !usuario.activo {
            return Err(AppError::UsuarioInactivo);
        }

        self.create_token(usuario.id)
    }

    /// Valida el JWT y regresa al usuario tal como está HOY en la base:
    /// permisos y bandera de activo se releen en cada petición, nunca
    /// se confía en lo que el token dijera de ellos.
    pub async fn validate_token(&self, token: &str) -> Result<Usuario, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        let usuario = self
            .usuarios_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)?;

        if !usuario.activo {
            return Err(AppError::UsuarioInactivo);
        }

        Ok(usuario)
    }

    /// Arranque en frío: sin autoregistro, la primera cuenta tiene que
    /// salir de algún lado. Si la tabla está vacía y ADMIN_EMAIL /
    /// ADMIN_PASSWORD están definidas, se crea un administrador.
    pub async fn bootstrap_admin(&self) -> Result<(), AppError> {
        if !self.usuarios_repo.listar().await?.is_empty() {
            return Ok(());
        }

        let (Ok(email), Ok(password)) =
            (std::env::var("ADMIN_EMAIL"), std::env::var("ADMIN_PASSWORD"))
        else {
            tracing::warn!(
                "No hay usuarios y ADMIN_EMAIL/ADMIN_PASSWORD no están definidas; nadie podrá iniciar sesión."
            );
            return Ok(());
        };

        let password_hash = tokio::task::spawn_blocking(move || {
            hash(&password, bcrypt::DEFAULT_COST)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falla en la task de hashing: {}", e))?
        ?;

        self.usuarios_repo
            .crear(&email, &password_hash, "Administrador", true, &Permisos::default())
            .await?;

        tracing::info!("✅ Administrador inicial creado: {}", email);
        Ok(())
    }

    // --- Gestión de usuarios (solo administrador) ---

    pub async fn crear_usuario(&self, datos: CrearUsuarioPayload) -> Result<Usuario, AppError> {
        let password_clone = datos.password.clone();
        let password_hash = tokio::task::spawn_blocking(move || {
            hash(&password_clone, bcrypt::DEFAULT_COST)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falla en la task de hashing: {}", e))?
        ?;

        let permisos = datos.permisos.unwrap_or_default();

        self.usuarios_repo
            .crear(&datos.email, &password_hash, &datos.nombre, datos.is_admin, &permisos)
            .await
    }

    pub async fn listar_usuarios(&self) -> Result<Vec<Usuario>, AppError> {
        self.usuarios_repo.listar().await
    }

    pub async fn actualizar_usuario(
        &self,
        id: Uuid,
        datos: ActualizarUsuarioPayload,
    ) -> Result<Usuario, AppError> {
        self.usuarios_repo
            .actualizar(
                id,
                &datos.nombre,
                datos.telefono.as_deref(),
                datos.is_admin,
                datos.activo,
                &datos.permisos,
            )
            .await
    }

    /// Restablecimiento administrativo: no pide la contraseña anterior.
    pub async fn reset_password(&self, id: Uuid, new_password: &str) -> Result<(), AppError> {
        let password_clone = new_password.to_owned();
        let password_hash = tokio::task::spawn_blocking(move || {
            hash(&password_clone, bcrypt::DEFAULT_COST)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falla en la task de hashing: {}", e))?
        ?;

        self.usuarios_repo.actualizar_password(id, &password_hash).await
    }

    // --- Perfil propio ---

    pub async fn actualizar_perfil(
        &self,
        id: Uuid,
        datos: ActualizarPerfilPayload,
    ) -> Result<Usuario, AppError> {
        self.usuarios_repo
            .actualizar_perfil(id, &datos.nombre, datos.telefono.as_deref())
            .await
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
