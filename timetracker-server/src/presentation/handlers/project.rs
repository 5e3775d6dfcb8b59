use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use tracing::info;
use uuid::Uuid;

use crate::application::AppProjectService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{ProjectRequest, ProjectResponse};
use crate::presentation::utils::{Principal, request_id};

#[get("/projects")]
pub async fn list_projects(
    principal: Principal,
    service: web::Data<AppProjectService>,
) -> Result<HttpResponse, DomainError> {
    let projects = service.list_my_projects(&principal.email).await?;
    let response: Vec<ProjectResponse> = projects.into_iter().map(ProjectResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

#[get("/projects/{id}")]
pub async fn get_project(
    principal: Principal,
    service: web::Data<AppProjectService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let project = service
        .get_project(&principal.email, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ProjectResponse::from(project)))
}

#[post("/projects")]
pub async fn create_project(
    req: HttpRequest,
    principal: Principal,
    service: web::Data<AppProjectService>,
    payload: web::Json<ProjectRequest>,
) -> Result<HttpResponse, DomainError> {
    let project = service
        .create_project(&principal.email, payload.into_inner())
        .await?;

    info!(
        request_id = %request_id(&req),
        project_id = %project.id,
        "project created"
    );

    Ok(HttpResponse::Created().json(ProjectResponse::from(project)))
}

#[put("/projects/{id}")]
pub async fn update_project(
    req: HttpRequest,
    principal: Principal,
    service: web::Data<AppProjectService>,
    path: web::Path<Uuid>,
    payload: web::Json<ProjectRequest>,
) -> Result<HttpResponse, DomainError> {
    let project = service
        .update_project(&principal.email, path.into_inner(), payload.into_inner())
        .await?;

    info!(
        request_id = %request_id(&req),
        project_id = %project.id,
        "project updated"
    );

    Ok(HttpResponse::Ok().json(ProjectResponse::from(project)))
}

#[delete("/projects/{id}")]
pub async fn delete_project(
    req: HttpRequest,
    principal: Principal,
    service: web::Data<AppProjectService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let id = path.into_inner();
    service.delete_project(&principal.email, id).await?;

    info!(
        request_id = %request_id(&req),
        project_id = %id,
        "project deleted"
    );

    Ok(HttpResponse::NoContent().finish())
}
