//! Readiness and liveness checks plus the `/ping` connectivity check.
//!
//! Readiness flips once, after migrations and the pool are in place.
//! Liveness answers whenever the worker can run a handler at all.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, HttpResponseBuilder, get, http::header, web};

/// Startup flag shared between `main` and the readiness handler.
#[derive(Debug, Default)]
pub struct HealthState {
    serving: AtomicBool,
}

impl HealthState {
    /// Create a state that reports not-ready.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Report ready from now on.
    pub fn mark_ready(&self) {
        self.serving.store(true, Ordering::Release);
    }

    /// Whether startup has completed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.serving.load(Ordering::Acquire)
    }
}

fn uncached(mut response: HttpResponseBuilder) -> HttpResponse {
    response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

/// Reports 503 until startup completes.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Store connected and migrated"),
        (status = 503, description = "Still starting")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    if state.is_ready() {
        uncached(HttpResponse::Ok())
    } else {
        uncached(HttpResponse::ServiceUnavailable())
    }
}

/// Reports 200 while workers run handlers.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses((status = 200, description = "Process is serving requests"))
)]
#[get("/health/live")]
pub async fn live() -> HttpResponse {
    uncached(HttpResponse::Ok())
}

/// Plain-text connectivity check.
#[utoipa::path(
    get,
    path = "/ping",
    tags = ["health"],
    responses((status = 200, description = "Always `pong`", body = String, content_type = "text/plain"))
)]
#[get("/ping")]
pub async fn ping() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain").body("pong")
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::dev::ServiceResponse;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;

    async fn get(state: web::Data<HealthState>, uri: &str) -> ServiceResponse {
        let app = actix_test::init_service(
            App::new()
                .app_data(state)
                .service(ready)
                .service(live)
                .service(ping),
        )
        .await;
        let request = actix_test::TestRequest::get().uri(uri).to_request();
        actix_test::call_service(&app, request).await
    }

    #[rstest]
    #[actix_web::test]
    async fn readiness_waits_for_startup() {
        let state = web::Data::new(HealthState::new());
        let before = get(state.clone(), "/health/ready").await;
        assert_eq!(before.status(), StatusCode::SERVICE_UNAVAILABLE);

        state.mark_ready();
        let after = get(state, "/health/ready").await;
        assert_eq!(after.status(), StatusCode::OK);
        assert_eq!(
            after.headers().get(header::CACHE_CONTROL).map(|v| v.as_bytes()),
            Some(&b"no-store"[..])
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn liveness_does_not_wait_for_startup() {
        let response = get(web::Data::new(HealthState::new()), "/health/live").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[rstest]
    #[actix_web::test]
    async fn ping_answers_pong() {
        let response = get(web::Data::new(HealthState::new()), "/ping").await;
        let body = actix_test::read_body(response).await;
        assert_eq!(body.as_ref(), b"pong");
    }
}
