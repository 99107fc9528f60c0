//! # ab-api Handlers
//!
//! This module coordinates the flow between HTTP requests and the `BoardService`.
//! Bodies may arrive as JSON or as an urlencoded form.

use ab_core::{BoardService, Found, Outcome};
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// State shared across all Actix-web workers.
pub struct AppState {
    pub service: BoardService,
}

/// JSON or urlencoded body, whichever the client sent.
type Body<T> = web::Either<web::Json<T>, web::Form<T>>;

/// A missing or unreadable body counts as a body with every field absent.
fn body<T: Default>(payload: Option<Body<T>>) -> T {
    match payload {
        Some(web::Either::Left(json)) => json.into_inner(),
        Some(web::Either::Right(form)) => form.into_inner(),
        None => T::default(),
    }
}

fn status_text(outcome: Outcome) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(outcome.as_str())
}

fn found_json<T: Serialize>(found: Found<T>) -> HttpResponse {
    match found {
        Found::Found(value) => HttpResponse::Ok().json(value),
        Found::ThreadNotFound => status_text(Outcome::ThreadNotFound),
    }
}

// Missing fields deserialize as empty strings so that the service, not the
// extractor, decides what an absent value means.

#[derive(Debug, Default, Deserialize)]
pub struct NewThread {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub delete_password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ThreadRef {
    #[serde(default)]
    pub thread_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteThread {
    #[serde(default)]
    pub thread_id: String,
    #[serde(default)]
    pub delete_password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewReply {
    #[serde(default)]
    pub thread_id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub delete_password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReplyRef {
    #[serde(default)]
    pub thread_id: String,
    #[serde(default)]
    pub reply_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteReply {
    #[serde(default)]
    pub thread_id: String,
    #[serde(default)]
    pub reply_id: String,
    #[serde(default)]
    pub delete_password: String,
}

/// POST /api/threads/{board}
pub async fn create_thread(
    data: web::Data<AppState>,
    board: web::Path<String>,
    payload: Option<Body<NewThread>>,
) -> Result<HttpResponse, ApiError> {
    let form = body(payload);
    let thread = data
        .service
        .create_thread(&board, &form.text, &form.delete_password)
        .await
        .map_err(ApiError::context("Could not create thread"))?;

    Ok(HttpResponse::Ok().json(thread))
}

/// GET /api/threads/{board}
pub async fn list_threads(
    data: web::Data<AppState>,
    board: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let threads = data
        .service
        .list_threads(&board)
        .await
        .map_err(ApiError::context("Could not retrieve threads"))?;

    Ok(HttpResponse::Ok().json(threads))
}

/// PUT /api/threads/{board}
pub async fn report_thread(
    data: web::Data<AppState>,
    payload: Option<Body<ThreadRef>>,
) -> Result<HttpResponse, ApiError> {
    let form = body(payload);
    let outcome = data
        .service
        .report_thread(&form.thread_id)
        .await
        .map_err(ApiError::context("Could not report thread"))?;

    Ok(status_text(outcome))
}

/// DELETE /api/threads/{board}
pub async fn delete_thread(
    data: web::Data<AppState>,
    payload: Option<Body<DeleteThread>>,
) -> Result<HttpResponse, ApiError> {
    let form = body(payload);
    let outcome = data
        .service
        .delete_thread(&form.thread_id, &form.delete_password)
        .await
        .map_err(ApiError::context("Could not delete thread"))?;

    Ok(status_text(outcome))
}

/// POST /api/replies/{board}
pub async fn create_reply(
    data: web::Data<AppState>,
    board: web::Path<String>,
    payload: Option<Body<NewReply>>,
) -> Result<HttpResponse, ApiError> {
    let form = body(payload);
    let found = data
        .service
        .create_reply(&board, &form.thread_id, &form.text, &form.delete_password)
        .await
        .map_err(ApiError::context("Could not create reply"))?;

    Ok(found_json(found))
}

/// GET /api/replies/{board}?thread_id=...
pub async fn get_thread(
    data: web::Data<AppState>,
    query: web::Query<ThreadRef>,
) -> Result<HttpResponse, ApiError> {
    let found = data
        .service
        .get_thread_with_replies(&query.thread_id)
        .await
        .map_err(ApiError::context("Could not retrieve replies"))?;

    Ok(found_json(found))
}

/// PUT /api/replies/{board}
pub async fn report_reply(
    data: web::Data<AppState>,
    board: web::Path<String>,
    payload: Option<Body<ReplyRef>>,
) -> Result<HttpResponse, ApiError> {
    let form = body(payload);
    let outcome = data
        .service
        .report_reply(&board, &form.thread_id, &form.reply_id)
        .await
        .map_err(ApiError::context("Could not report reply"))?;

    Ok(status_text(outcome))
}

/// DELETE /api/replies/{board}
pub async fn delete_reply(
    data: web::Data<AppState>,
    board: web::Path<String>,
    payload: Option<Body<DeleteReply>>,
) -> Result<HttpResponse, ApiError> {
    let form = body(payload);
    let outcome = data
        .service
        .delete_reply(&board, &form.thread_id, &form.reply_id, &form.delete_password)
        .await
        .map_err(ApiError::context("Could not delete reply"))?;

    Ok(status_text(outcome))
}

/// Fallback for every unmatched route.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound()
        .content_type("text/plain; charset=utf-8")
        .body("Not Found")
}
