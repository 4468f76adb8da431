pub mod error;
pub mod handlers;
pub mod schemas;

use crate::core::service::PetService;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use std::time::Instant;

pub fn router(service: PetService) -> Router {
    let pets = get(handlers::list_pets)
        .post(handlers::create_pet)
        .patch(handlers::update_pet)
        .delete(handlers::delete_pets);

    // 有無結尾斜線都接受
    Router::new()
        .route("/pets/", pets.clone())
        .route("/pets", pets)
        .route("/healthcheck/", get(handlers::healthcheck))
        .route("/healthcheck", get(handlers::healthcheck))
        .layer(middleware::from_fn(log_requests))
        .with_state(service)
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        %method,
        %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Handled request"
    );
    response
}
