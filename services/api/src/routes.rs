use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use domizil::booking::{booking_router, BookingService};
use domizil::contact::{contact_router, ContactService};
use domizil::remote::DataService;
use domizil::reviews::{review_router, ReviewBoard};
use serde_json::json;
use std::sync::Arc;

/// Services backing the public booking site, all sharing one data service.
pub(crate) struct SiteServices<D> {
    pub(crate) booking: Arc<BookingService<D>>,
    pub(crate) reviews: Arc<ReviewBoard<D>>,
    pub(crate) contact: Arc<ContactService<D>>,
}

pub(crate) fn with_site_routes<D>(services: SiteServices<D>) -> axum::Router
where
    D: DataService + 'static,
{
    booking_router(services.booking)
        .merge(review_router(services.reviews))
        .merge(contact_router(services.contact))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryDataService;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::NaiveDate;
    use domizil::reviews::Language;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn site() -> (axum::Router, Arc<AtomicBool>) {
        let remote = Arc::new(InMemoryDataService::default());
        let today = NaiveDate::from_ymd_opt(2024, 7, 1).expect("valid date");
        let services = SiteServices {
            booking: Arc::new(BookingService::new(remote.clone(), Language::De, today)),
            reviews: Arc::new(ReviewBoard::new(remote.clone(), Language::De)),
            contact: Arc::new(ContactService::new(remote, Language::De)),
        };
        let readiness = Arc::new(AtomicBool::new(false));
        let state = AppState {
            readiness: readiness.clone(),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        (with_site_routes(services).layer(Extension(state)), readiness)
    }

    async fn status_of(router: axum::Router, uri: &str) -> StatusCode {
        router
            .oneshot(
                Request::get(uri)
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes")
            .status()
    }

    #[tokio::test]
    async fn health_is_always_ok() {
        let (router, _) = site();
        assert_eq!(status_of(router, "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_follows_flag() {
        let (router, readiness) = site();
        assert_eq!(
            status_of(router.clone(), "/ready").await,
            StatusCode::SERVICE_UNAVAILABLE
        );
        readiness.store(true, std::sync::atomic::Ordering::Release);
        assert_eq!(status_of(router, "/ready").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn library_routers_are_mounted() {
        let (router, _) = site();
        assert_eq!(
            status_of(router.clone(), "/api/v1/residences").await,
            StatusCode::OK
        );
        assert_eq!(
            status_of(router, "/api/v1/residences/waldhaus-tannenhof/reviews").await,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn deleting_missing_review_is_not_found() {
        let (router, _) = site();
        let response = router
            .oneshot(
                Request::delete("/api/v1/residences/waldhaus-tannenhof/reviews/rev-404")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
