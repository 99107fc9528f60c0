//! # ab-api
//!
//! The web routing and orchestration layer for the anonymous board.

pub mod error;
pub mod handlers;
pub mod middleware;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App};

pub use error::ApiError;
pub use handlers::AppState;

/// Assembles the full application: routes, fallback and middleware.
pub fn build_app(
    state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .configure(configure_routes)
        .default_service(web::to(handlers::not_found))
        .wrap(middleware::security_headers())
        .wrap(middleware::cors_policy())
        .wrap(middleware::standard_middleware())
}

/// Configures the JSON API routes.
///
/// # Developer Note
/// Kept separate from `build_app` so tests can mount the bare routes
/// without middleware.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Board index: list, create, report, delete threads
            .service(
                web::resource("/threads/{board}")
                    .route(web::get().to(handlers::list_threads))
                    .route(web::post().to(handlers::create_thread))
                    .route(web::put().to(handlers::report_thread))
                    .route(web::delete().to(handlers::delete_thread)),
            )
            // Thread page: view, reply, report, redact replies
            .service(
                web::resource("/replies/{board}")
                    .route(web::get().to(handlers::get_thread))
                    .route(web::post().to(handlers::create_reply))
                    .route(web::put().to(handlers::report_reply))
                    .route(web::delete().to(handlers::delete_reply)),
            ),
    );
}
