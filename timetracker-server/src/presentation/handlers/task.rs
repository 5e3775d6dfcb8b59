use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use tracing::info;
use uuid::Uuid;

use crate::application::AppTaskService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{CreateTaskRequest, TaskResponse, UpdateTaskRequest};
use crate::presentation::utils::{Principal, request_id};

#[get("/tasks/project/{project_id}")]
pub async fn list_tasks(
    principal: Principal,
    service: web::Data<AppTaskService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let tasks = service
        .list_tasks(&principal.email, path.into_inner())
        .await?;
    let response: Vec<TaskResponse> = tasks.into_iter().map(TaskResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

#[get("/tasks/{id}")]
pub async fn get_task(
    principal: Principal,
    service: web::Data<AppTaskService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let task = service.get_task(&principal.email, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(TaskResponse::from(task)))
}

#[post("/tasks")]
pub async fn create_task(
    req: HttpRequest,
    principal: Principal,
    service: web::Data<AppTaskService>,
    payload: web::Json<CreateTaskRequest>,
) -> Result<HttpResponse, DomainError> {
    let payload = payload.into_inner();
    let task = service
        .create_task(&principal.email, payload.project_id, payload.name)
        .await?;

    info!(
        request_id = %request_id(&req),
        task_id = %task.id,
        "task created"
    );

    Ok(HttpResponse::Created().json(TaskResponse::from(task)))
}

#[put("/tasks/{id}")]
pub async fn update_task(
    req: HttpRequest,
    principal: Principal,
    service: web::Data<AppTaskService>,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateTaskRequest>,
) -> Result<HttpResponse, DomainError> {
    let task = service
        .update_task(&principal.email, path.into_inner(), payload.into_inner().name)
        .await?;

    info!(
        request_id = %request_id(&req),
        task_id = %task.id,
        "task updated"
    );

    Ok(HttpResponse::Ok().json(TaskResponse::from(task)))
}

#[delete("/tasks/{id}")]
pub async fn delete_task(
    req: HttpRequest,
    principal: Principal,
    service: web::Data<AppTaskService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let id = path.into_inner();
    service.delete_task(&principal.email, id).await?;

    info!(
        request_id = %request_id(&req),
        task_id = %id,
        "task deleted"
    );

    Ok(HttpResponse::NoContent().finish())
}
