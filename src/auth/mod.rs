pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::user::User;

pub use extractors::AuthUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{generate_token, verify_token, Claims};

/// Payload for a new account registration.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name, 2 to 150 characters.
    #[validate(length(min = 2, max = 150))]
    pub name: String,
    /// Email address; must be valid and fit the column width.
    #[validate(email, length(max = 255))]
    pub email: String,
    /// Password, at least 6 characters.
    #[validate(length(min = 6))]
    pub password: String,
}

/// Payload for a login request. The password gets no shape check here;
/// any mismatch surfaces as the same generic credentials error.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

/// Body of a successful register/login response: the user row (without
/// the password hash) and the bearer token for subsequent requests.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}
