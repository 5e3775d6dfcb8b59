use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, web};
use tracing::info;
use uuid::Uuid;

use crate::application::AppTimeEntryService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{
    DateRangeQuery, StartTimeEntryRequest, TimeEntryRequest, TimeEntryResponse,
};
use crate::presentation::utils::{Principal, request_id};

#[get("/time-entries")]
pub async fn my_entries(
    principal: Principal,
    service: web::Data<AppTimeEntryService>,
) -> Result<HttpResponse, DomainError> {
    let entries = service.my_entries(&principal.email).await?;
    let response: Vec<TimeEntryResponse> =
        entries.into_iter().map(TimeEntryResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

#[get("/time-entries/task/{task_id}")]
pub async fn entries_for_task(
    principal: Principal,
    service: web::Data<AppTimeEntryService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let entries = service
        .entries_for_task(&principal.email, path.into_inner())
        .await?;
    let response: Vec<TimeEntryResponse> =
        entries.into_iter().map(TimeEntryResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

#[get("/time-entries/project/{project_id}/range")]
pub async fn entries_for_project(
    principal: Principal,
    service: web::Data<AppTimeEntryService>,
    path: web::Path<Uuid>,
    query: web::Query<DateRangeQuery>,
) -> Result<HttpResponse, DomainError> {
    let entries = service
        .entries_for_project(
            &principal.email,
            path.into_inner(),
            query.start_date,
            query.end_date,
        )
        .await?;
    let response: Vec<TimeEntryResponse> =
        entries.into_iter().map(TimeEntryResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

#[post("/time-entries/start")]
pub async fn start(
    req: HttpRequest,
    principal: Principal,
    service: web::Data<AppTimeEntryService>,
    payload: web::Json<StartTimeEntryRequest>,
) -> Result<HttpResponse, DomainError> {
    let entry = service.start(&principal.email, payload.task_id).await?;

    info!(
        request_id = %request_id(&req),
        entry_id = %entry.id,
        task_id = %entry.task_id,
        "time entry started"
    );

    Ok(HttpResponse::Created().json(TimeEntryResponse::from(entry)))
}

#[post("/time-entries/stop")]
pub async fn stop(
    req: HttpRequest,
    principal: Principal,
    service: web::Data<AppTimeEntryService>,
) -> Result<HttpResponse, DomainError> {
    let entry = service.stop(&principal.email).await?;

    info!(
        request_id = %request_id(&req),
        entry_id = %entry.id,
        duration = entry.duration,
        "time entry stopped"
    );

    Ok(HttpResponse::Ok().json(TimeEntryResponse::from(entry)))
}

#[post("/time-entries")]
pub async fn create_entry(
    req: HttpRequest,
    principal: Principal,
    service: web::Data<AppTimeEntryService>,
    payload: web::Json<TimeEntryRequest>,
) -> Result<HttpResponse, DomainError> {
    let entry = service
        .create_manual(&principal.email, payload.into_inner())
        .await?;

    info!(
        request_id = %request_id(&req),
        entry_id = %entry.id,
        "time entry created"
    );

    Ok(HttpResponse::Created().json(TimeEntryResponse::from(entry)))
}

#[get("/time-entries/{id}")]
pub async fn get_entry(
    principal: Principal,
    service: web::Data<AppTimeEntryService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let entry = service
        .get_entry(&principal.email, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(TimeEntryResponse::from(entry)))
}

#[put("/time-entries/{id}")]
pub async fn update_entry(
    req: HttpRequest,
    principal: Principal,
    service: web::Data<AppTimeEntryService>,
    path: web::Path<Uuid>,
    payload: web::Json<TimeEntryRequest>,
) -> Result<HttpResponse, DomainError> {
    let entry = service
        .update_entry(&principal.email, path.into_inner(), payload.into_inner())
        .await?;

    info!(
        request_id = %request_id(&req),
        entry_id = %entry.id,
        "time entry updated"
    );

    Ok(HttpResponse::Ok().json(TimeEntryResponse::from(entry)))
}

#[delete("/time-entries/{id}")]
pub async fn delete_entry(
    req: HttpRequest,
    principal: Principal,
    service: web::Data<AppTimeEntryService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let id = path.into_inner();
    service.delete_entry(&principal.email, id).await?;

    info!(
        request_id = %request_id(&req),
        entry_id = %id,
        "time entry deleted"
    );

    Ok(HttpResponse::NoContent().finish())
}
