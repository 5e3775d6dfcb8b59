mod application;
mod data;
mod datetime;
mod domain;
mod infrastructure;
mod presentation;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{App, HttpServer, web};

use application::auth_service::AuthService;
use application::project_service::ProjectService;
use application::task_service::TaskService;
use application::time_entry_service::TimeEntryService;
use data::project_repository::PostgresProjectRepository;
use data::task_repository::PostgresTaskRepository;
use data::time_entry_repository::PostgresTimeEntryRepository;
use data::user_repository::PostgresUserRepository;
use infrastructure::config::AppConfig;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::logging::init_logging;
use infrastructure::security::JwtKeys;
use presentation::handlers;
use presentation::middleware::{JwtAuthMiddleware, RequestIdMiddleware};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    init_logging();

    let config = AppConfig::from_env().expect("invalid configuration");
    let pool = create_pool(&config.database_url)
        .await
        .expect("failed to connect to database");
    run_migrations(&pool)
        .await
        .expect("failed to run migrations");

    let user_repo = Arc::new(PostgresUserRepository::new(pool.clone()));
    let project_repo = Arc::new(PostgresProjectRepository::new(pool.clone()));
    let task_repo = Arc::new(PostgresTaskRepository::new(pool.clone()));
    let entry_repo = Arc::new(PostgresTimeEntryRepository::new(pool.clone()));

    let auth_service = AuthService::new(
        Arc::clone(&user_repo),
        JwtKeys::new(config.jwt_secret.clone(), config.jwt_ttl_hours),
    );
    let project_service = ProjectService::new(Arc::clone(&project_repo), Arc::clone(&user_repo));
    let task_service = TaskService::new(
        Arc::clone(&task_repo),
        Arc::clone(&project_repo),
        Arc::clone(&user_repo),
    );
    let entry_service = TimeEntryService::new(
        Arc::clone(&entry_repo),
        Arc::clone(&task_repo),
        Arc::clone(&project_repo),
        Arc::clone(&user_repo),
    );

    let config_data = config.clone();

    HttpServer::new(move || {
        let cors = build_cors(&config_data);
        App::new()
            .wrap(Logger::default())
            .wrap(RequestIdMiddleware)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer")),
            )
            .wrap(cors)
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(project_service.clone()))
            .app_data(web::Data::new(task_service.clone()))
            .app_data(web::Data::new(entry_service.clone()))
            .service(
                web::scope("/api")
                    .service(handlers::health::health)
                    .service(handlers::user::register)
                    .service(handlers::auth::login)
                    .service(
                        web::scope("")
                            .wrap(JwtAuthMiddleware::new(auth_service.keys().clone()))
                            .service(handlers::user::me)
                            .service(handlers::project::list_projects)
                            .service(handlers::project::create_project)
                            .service(handlers::project::get_project)
                            .service(handlers::project::update_project)
                            .service(handlers::project::delete_project)
                            .service(handlers::task::list_tasks)
                            .service(handlers::task::create_task)
                            .service(handlers::task::get_task)
                            .service(handlers::task::update_task)
                            .service(handlers::task::delete_task)
                            .service(handlers::time_entry::my_entries)
                            .service(handlers::time_entry::entries_for_task)
                            .service(handlers::time_entry::entries_for_project)
                            .service(handlers::time_entry::start)
                            .service(handlers::time_entry::stop)
                            .service(handlers::time_entry::create_entry)
                            .service(handlers::time_entry::get_entry)
                            .service(handlers::time_entry::update_entry)
                            .service(handlers::time_entry::delete_entry),
                    ),
            )
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::AUTHORIZATION,
        ])
        .supports_credentials()
        .max_age(3600);

    for origin in &config.cors_origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}
