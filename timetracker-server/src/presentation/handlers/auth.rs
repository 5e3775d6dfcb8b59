use actix_web::{HttpResponse, post, web};
use tracing::info;

use crate::application::AppAuthService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{LoginRequest, LoginResponse};

#[post("/auth/login")]
pub async fn login(
    service: web::Data<AppAuthService>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, DomainError> {
    let (user, token) = service.login(&payload.email, &payload.password).await?;

    info!(user_id = %user.id, "user logged in");

    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: service.keys().ttl_seconds(),
        id: user.id,
        email: user.email,
        name: user.name,
        enabled: user.enabled,
    }))
}
