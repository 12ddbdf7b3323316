use actix_web::{post, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    auth::{
        generate_token, hash_password, verify_password, AuthResponse, LoginRequest, RegisterRequest,
    },
    error::AppError,
    models::user::{User, UserCredentials},
    response::ApiResponse,
};

/// Register a new user
///
/// Creates the account with the default member role and returns the user
/// together with a bearer token.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;

    let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(&register_data.email)
        .fetch_optional(&**pool)
        .await?;

    if existing.is_some() {
        return Err(AppError::BadRequest("Email already registered".into()));
    }

    let password_hash = hash_password(&register_data.password)?;

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (name, email, password_hash) \
         VALUES ($1, $2, $3) \
         RETURNING id, name, email, role, is_active, created_at, updated_at",
    )
    .bind(&register_data.name)
    .bind(&register_data.email)
    .bind(&password_hash)
    .fetch_one(&**pool)
    .await?;

    let token = generate_token(user.id, &user.email, user.role)?;
    log::info!("User registered: {}", user.id);

    Ok(HttpResponse::Created().json(ApiResponse::with_data(
        AuthResponse { user, token },
        "Registration successful",
    )))
}

/// Login
///
/// An unknown email, an inactive account, and a wrong password all
/// produce the same response, so the endpoint does not reveal whether an
/// account exists.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let user = sqlx::query_as::<_, UserCredentials>(
        "SELECT id, name, email, password_hash, role, is_active, created_at, updated_at \
         FROM users WHERE email = $1",
    )
    .bind(&login_data.email)
    .fetch_optional(&**pool)
    .await?;

    let user = match user {
        Some(user) if user.is_active => user,
        _ => return Err(AppError::Unauthorized("Invalid email or password".into())),
    };

    if !verify_password(&login_data.password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Invalid email or password".into()));
    }

    let user = user.into_user();
    let token = generate_token(user.id, &user.email, user.role)?;

    Ok(HttpResponse::Ok().json(ApiResponse::with_data(
        AuthResponse { user, token },
        "Login successful",
    )))
}
