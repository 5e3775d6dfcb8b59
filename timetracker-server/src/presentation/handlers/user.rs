use actix_web::{HttpResponse, get, post, web};
use tracing::info;

use crate::application::AppAuthService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{RegisterRequest, UserResponse};
use crate::presentation::utils::Principal;

#[post("/users")]
pub async fn register(
    service: web::Data<AppAuthService>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, DomainError> {
    let payload = payload.into_inner();
    let user = service
        .register(payload.email, payload.name, payload.password)
        .await?;

    info!(user_id = %user.id, email = %user.email, "user registered");

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

#[get("/users/me")]
pub async fn me(
    principal: Principal,
    service: web::Data<AppAuthService>,
) -> Result<HttpResponse, DomainError> {
    let user = service.current_user(&principal.email).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}
