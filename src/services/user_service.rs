use std::sync::Arc;

use validator::Validate;

use crate::{
    auth::{
        password::{hash_password, verify_password},
        JwtService,
    },
    errors::{AppError, AppResult},
    models::{
        domain::{user::normalize_email, User},
        dto::{
            request::{LoginRequest, RegisterRequest},
            response::{AuthResponse, UserDto},
        },
    },
    repositories::UserRepository,
};

pub struct UserService {
    repository: Arc<dyn UserRepository>,
    jwt: Arc<JwtService>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, jwt: Arc<JwtService>) -> Self {
        Self { repository, jwt }
    }

    pub async fn register(&self, request: RegisterRequest) -> AppResult<UserDto> {
        request.validate()?;

        let email = normalize_email(&request.email);
        if self.repository.find_by_email(&email).await?.is_some() {
            return Err(AppError::AlreadyExists(
                "An account with this email already exists".to_string(),
            ));
        }

        let password_hash = hash_password(&request.password)?;
        let user = self
            .repository
            .create(User::new(&request.name, &email, &password_hash))
            .await?;

        log::info!("Registered user {}", user.id);
        Ok(UserDto::from(user))
    }

    /// Unknown emails and wrong passwords fail the same way.
    pub async fn login(&self, request: LoginRequest) -> AppResult<AuthResponse> {
        request.validate()?;

        let invalid = || AppError::ValidationError("Invalid credentials".to_string());

        let user = self
            .repository
            .find_by_email(&normalize_email(&request.email))
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(invalid());
        }

        let token = self.jwt.create_token(&user)?;
        log::info!("User {} logged in", user.id);

        Ok(AuthResponse {
            token,
            user: UserDto::from(user),
        })
    }

    pub async fn get_user(&self, id: &str) -> AppResult<UserDto> {
        let user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id '{}' not found", id)))?;

        Ok(UserDto::from(user))
    }
}
