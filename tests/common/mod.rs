use actix_web::test;
use serde_json::{json, Value};
use sqlx::PgPool;

/// Auth details for a freshly registered user.
pub struct TestUser {
    pub id: i64,
    pub token: String,
}

/// Registers a user through the real endpoint and returns their id and
/// bearer token, both taken from the response envelope.
pub async fn register_user(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
    >,
    name: &str,
    email: &str,
    password: &str,
) -> Result<TestUser, String> {
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(&json!({
            "name": name,
            "email": email,
            "password": password
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;

    if !status.is_success() {
        return Err(format!(
            "Failed to register user. Status: {}. Body: {}",
            status,
            String::from_utf8_lossy(&body)
        ));
    }

    let envelope: Value =
        serde_json::from_slice(&body).map_err(|e| format!("Failed to parse response: {}", e))?;

    let id = envelope["data"]["user"]["id"]
        .as_i64()
        .ok_or("Missing user id in response")?;
    let token = envelope["data"]["token"]
        .as_str()
        .ok_or("Missing token in response")?
        .to_string();

    Ok(TestUser { id, token })
}

pub async fn cleanup_user(pool: &PgPool, email: &str) {
    let _ = sqlx::query("DELETE FROM users WHERE email = $1")
        .bind(email)
        .execute(pool)
        .await;
}
