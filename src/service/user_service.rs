use async_trait::async_trait;
use bson::oid::ObjectId;
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::dto::user_dto::PublicUserDto;
use crate::model::user::{User, UserProfile, UserSettings};
use crate::repository::user_repo::{UserRepository, UserRepositoryImpl};
use crate::util::error::ServiceError;
use crate::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};
use crate::util::password::{PasswordUtils, PasswordUtilsImpl};

#[derive(Debug, Clone, serde::Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct UserAuthResponse {
    pub user: PublicUserDto,
    pub tokens: AuthTokens,
}

/// Fields accepted at registration; everything else starts at defaults.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub is_admin: bool,
}

#[async_trait]
pub trait UserService: Send + Sync {
    async fn register(
        &self,
        new_user: NewUser,
        password: String,
    ) -> Result<UserAuthResponse, ServiceError>;
    async fn login(&self, email: String, password: String)
        -> Result<UserAuthResponse, ServiceError>;
    async fn refresh_token(&self, refresh_token: String) -> Result<AuthTokens, ServiceError>;
    async fn get_public_profile(&self, user_id: &str) -> Result<PublicUserDto, ServiceError>;
}

pub struct UserServiceImpl {
    pub user_repo: Arc<UserRepositoryImpl>,
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
}

impl UserServiceImpl {
    pub fn new(user_repo: Arc<UserRepositoryImpl>, jwt_utils: Arc<JwtTokenUtilsImpl>) -> Self {
        Self {
            user_repo,
            jwt_utils,
        }
    }

    fn auth_response(&self, user: &User) -> Result<UserAuthResponse, ServiceError> {
        let user_id = user.id.as_ref().map(|id| id.to_hex()).unwrap_or_default();
        let tokens = self
            .jwt_utils
            .generate_token_pair(&user_id, &user.username, user.is_admin)
            .map_err(|e| ServiceError::InternalError(format!("JWT error: {}", e)))?;
        Ok(UserAuthResponse {
            user: PublicUserDto::from(user),
            tokens: AuthTokens {
                access_token: tokens.access_token,
                refresh_token: tokens.refresh_token,
                expires_in: tokens.expires_in,
                token_type: tokens.token_type,
            },
        })
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    #[instrument(skip(self, new_user, password), fields(username = %new_user.username, email = %new_user.email))]
    async fn register(
        &self,
        new_user: NewUser,
        password: String,
    ) -> Result<UserAuthResponse, ServiceError> {
        info!("Registering new user");
        let hash = PasswordUtilsImpl::hash_password(&password)
            .map_err(|e| ServiceError::InvalidInput(format!("Password hash error: {}", e)))?;

        let now = chrono::Utc::now();
        let user = User {
            id: None,
            username: new_user.username.trim().to_string(),
            email: new_user.email.trim().to_lowercase(),
            password_hash: hash,
            is_admin: new_user.is_admin,
            profile: UserProfile::default(),
            settings: UserSettings::default(),
            created_at: now,
            updated_at: now,
        };

        let inserted = self.user_repo.insert(user).await;
        match &inserted {
            Ok(_) => info!("User inserted successfully"),
            Err(e) => error!("Failed to insert user: {e}"),
        }
        let inserted = inserted?;
        self.auth_response(&inserted)
    }

    #[instrument(skip(self, password), fields(email = %email))]
    async fn login(
        &self,
        email: String,
        password: String,
    ) -> Result<UserAuthResponse, ServiceError> {
        info!("User login attempt");
        let user_opt = self.user_repo.find_by_email(&email.trim().to_lowercase()).await?;
        // Unknown email and wrong password are indistinguishable to callers
        let user = user_opt
            .ok_or_else(|| ServiceError::Unauthorized("Invalid credentials".to_string()))?;
        let valid = PasswordUtilsImpl::verify_password(&password, &user.password_hash)
            .map_err(|e| ServiceError::InternalError(format!("Password verify error: {}", e)))?;
        if !valid {
            error!("Invalid credentials for user: {}", email);
            return Err(ServiceError::Unauthorized("Invalid credentials".to_string()));
        }
        info!("User logged in successfully");
        self.auth_response(&user)
    }

    #[instrument(skip(self, refresh_token))]
    async fn refresh_token(&self, refresh_token: String) -> Result<AuthTokens, ServiceError> {
        info!("Refreshing token");
        let claims = self
            .jwt_utils
            .validate_refresh_token(&refresh_token)
            .map_err(|e| ServiceError::Unauthorized(format!("Invalid refresh token: {}", e)))?;
        let tokens = self
            .jwt_utils
            .generate_token_pair(&claims.sub, &claims.username, claims.is_admin)
            .map_err(|e| ServiceError::InternalError(format!("JWT error: {}", e)))?;
        info!("Token refreshed successfully");
        Ok(AuthTokens {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
            token_type: tokens.token_type,
        })
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn get_public_profile(&self, user_id: &str) -> Result<PublicUserDto, ServiceError> {
        let id = ObjectId::parse_str(user_id)
            .map_err(|_| ServiceError::InvalidInput("Invalid user id".to_string()))?;
        let user = self
            .user_repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;
        Ok(PublicUserDto::from(&user))
    }
}
