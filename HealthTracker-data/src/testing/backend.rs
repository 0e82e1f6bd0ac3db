//! In-process fake of the REST backend.
//!
//! Serves `/api/blood-pressures`, `/api/preferences`, `/api/weights` and
//! `/api/points` from [`MockEntityService`] stores, with the same status
//! codes and headers as the real backend, so the reqwest-based services can be
//! exercised end to end.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{
    HeaderMap as AxumHeaderMap, HeaderName as AxumHeaderName, HeaderValue as AxumHeaderValue,
    StatusCode as AxumStatusCode,
};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

use health_tracker_domain::{BloodPressure, Entity, Points, Preferences, RequestOptions, Weight};

use super::{alert_headers, MockEntityService, APPLICATION_NAME};
use crate::errors::ClientError;
use crate::services::EntityServiceTrait;

type Store<E> = Arc<MockEntityService<E>>;

/// In-memory backend holding one store per entity
#[derive(Default)]
pub struct FakeBackend {
    pub blood_pressures: Store<BloodPressure>,
    pub preferences: Store<Preferences>,
    pub weights: Store<Weight>,
    pub points: Store<Points>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Router serving every entity resource
    pub fn router(&self) -> Router {
        Router::new()
            .merge(entity_routes(self.blood_pressures.clone()))
            .merge(entity_routes(self.preferences.clone()))
            .merge(entity_routes(self.weights.clone()))
            .merge(entity_routes(self.points.clone()))
    }

    /// Serve on an ephemeral local port and return the base URL
    pub async fn spawn(&self) -> std::io::Result<(String, JoinHandle<()>)> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let router = self.router();

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                error!("Fake backend stopped: {}", e);
            }
        });

        info!("Fake backend listening on {}", addr);
        Ok((format!("http://{}/", addr), handle))
    }
}

fn entity_routes<E: Entity>(store: Store<E>) -> Router {
    let collection = format!("/api/{}", E::RESOURCE_PATH);
    let item = format!("{}/:id", collection);

    Router::new()
        .route(&collection, get(list::<E>).post(create::<E>).put(update::<E>))
        .route(&item, get(find::<E>).delete(remove::<E>))
        .with_state(store)
}

async fn create<E: Entity>(State(store): State<Store<E>>, Json(entity): Json<E>) -> Response {
    match store.create(&entity).await {
        Ok(created) => changed(AxumStatusCode::CREATED, "created", created),
        Err(e) => error_response(e),
    }
}

async fn update<E: Entity>(State(store): State<Store<E>>, Json(entity): Json<E>) -> Response {
    let is_new = entity.id().is_none();
    match store.update(&entity).await {
        Ok(stored) if is_new => changed(AxumStatusCode::CREATED, "created", stored),
        Ok(stored) => changed(AxumStatusCode::OK, "updated", stored),
        Err(e) => error_response(e),
    }
}

async fn find<E: Entity>(State(store): State<Store<E>>, Path(id): Path<i64>) -> Response {
    match store.find(id).await {
        Ok(entity) => Json(entity).into_response(),
        Err(e) => error_response(e),
    }
}

async fn list<E: Entity>(State(store): State<Store<E>>, Query(pairs): Query<Vec<(String, String)>>) -> Response {
    let options = options_from_pairs(pairs);
    match store.query(Some(&options)).await {
        Ok(page) => (to_axum_status(page.status), to_axum_headers(&page.headers), Json(page.items)).into_response(),
        Err(e) => error_response(e),
    }
}

async fn remove<E: Entity>(State(store): State<Store<E>>, Path(id): Path<i64>) -> Response {
    match store.delete(id).await {
        Ok(raw) => (to_axum_status(raw.status), to_axum_headers(&raw.headers)).into_response(),
        Err(e) => error_response(e),
    }
}

fn changed<E: Entity>(status: AxumStatusCode, action: &str, entity: E) -> Response {
    let param = entity.id().map(|id| id.to_string()).unwrap_or_default();
    let headers = to_axum_headers(&alert_headers(E::ENTITY_NAME, action, &param));
    (status, headers, Json(entity)).into_response()
}

fn error_response(err: ClientError) -> Response {
    match err {
        ClientError::Status { status, error_key, body } => {
            let mut headers = HeaderMap::new();
            if let Some(key) = error_key {
                if let (Ok(name), Ok(value)) = (
                    format!("X-{}-error", APPLICATION_NAME).parse::<reqwest::header::HeaderName>(),
                    key.parse::<reqwest::header::HeaderValue>(),
                ) {
                    headers.insert(name, value);
                }
            }
            (to_axum_status(status), to_axum_headers(&headers), body).into_response()
        }
        other => (AxumStatusCode::INTERNAL_SERVER_ERROR, other.to_string()).into_response(),
    }
}

fn options_from_pairs(pairs: Vec<(String, String)>) -> RequestOptions {
    pairs
        .into_iter()
        .fold(RequestOptions::new(), |options, (name, value)| match name.as_str() {
            "page" => match value.parse() {
                Ok(page) => options.page(page),
                Err(_) => options,
            },
            "size" => match value.parse() {
                Ok(size) => options.size(size),
                Err(_) => options,
            },
            "sort" => options.sort(value),
            "query" => options.query(value),
            _ => options.filter(name, value),
        })
}

fn to_axum_status(status: StatusCode) -> AxumStatusCode {
    AxumStatusCode::from_u16(status.as_u16()).unwrap_or(AxumStatusCode::INTERNAL_SERVER_ERROR)
}

fn to_axum_headers(headers: &HeaderMap) -> AxumHeaderMap {
    let mut converted = AxumHeaderMap::new();
    for (name, value) in headers {
        if let (Ok(name), Ok(value)) = (
            AxumHeaderName::from_bytes(name.as_str().as_bytes()),
            AxumHeaderValue::from_bytes(value.as_bytes()),
        ) {
            converted.append(name, value);
        }
    }
    converted
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use chrono::NaiveDate;
    use futures::TryStreamExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::ClientConfig;
    use crate::services::EntityService;
    use crate::transport::ReqwestTransport;

    // Helper function to get the JSON body of a response
    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn service_for<E: Entity>(backend: &FakeBackend) -> EntityService<E, ReqwestTransport> {
        let (url, _handle) = backend.spawn().await.unwrap();
        EntityService::from_config(&ClientConfig::new(&url).unwrap()).unwrap()
    }

    fn reading(day: u32) -> BloodPressure {
        BloodPressure::new(NaiveDate::from_ymd_opt(2024, 1, day).unwrap(), 120, 80)
    }

    #[test]
    fn test_options_from_pairs() {
        let pairs = vec![
            ("page".to_string(), "2".to_string()),
            ("sort".to_string(), "date,desc".to_string()),
            ("size".to_string(), "oops".to_string()),
            ("userLogin".to_string(), "admin".to_string()),
        ];

        let options = options_from_pairs(pairs);
        assert_eq!(options.page, Some(2));
        assert_eq!(options.size, None);
        assert_eq!(options.sort, vec!["date,desc".to_string()]);
        assert_eq!(options.filters, vec![("userLogin".to_string(), "admin".to_string())]);
    }

    #[tokio::test]
    async fn test_router_create_sets_alert_headers() {
        let backend = FakeBackend::new();

        let response = backend
            .router()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/weights")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"date": "2024-01-05", "weight": 80.5}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), AxumStatusCode::CREATED);
        assert_eq!(
            response.headers().get("x-healthtrackerapp-alert").unwrap(),
            "healthTrackerApp.weight.created"
        );

        let body = body_json(response).await;
        assert_eq!(body, json!({"id": 1, "date": "2024-01-05", "weight": 80.5}));
    }

    #[tokio::test]
    async fn test_router_unknown_id_is_not_found() {
        let backend = FakeBackend::new();

        let response = backend
            .router()
            .oneshot(Request::builder().uri("/api/points/77").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), AxumStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_then_find_preserves_date() {
        let backend = FakeBackend::new();
        let service = service_for::<BloodPressure>(&backend).await;

        for day in [1, 5, 31] {
            let submitted = reading(day);
            let created = service.create(&submitted).await.unwrap();
            let found = service.find(created.id.unwrap()).await.unwrap();

            assert_eq!(created.date, submitted.date);
            assert_eq!(found.date, submitted.date);
            assert_eq!(found, created);
        }
    }

    #[tokio::test]
    async fn test_create_with_id_is_rejected() {
        let backend = FakeBackend::new();
        let service = service_for::<BloodPressure>(&backend).await;

        let with_id = BloodPressure {
            id: Some(3),
            ..reading(2)
        };
        let err = service.create(&with_id).await.unwrap_err();

        match err {
            ClientError::Status { status, error_key, .. } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(error_key.as_deref(), Some("error.idexists"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_query_without_options_returns_everything() {
        let backend = FakeBackend::new();
        let service = service_for::<BloodPressure>(&backend).await;

        for day in 1..=3 {
            service.create(&reading(day)).await.unwrap();
        }

        let page = service.query(None).await.unwrap();
        assert_eq!(page.status, StatusCode::OK);
        assert_eq!(page.len(), 3);
        assert_eq!(page.total_count().unwrap(), Some(3));
        assert_eq!(page.items[2].date, NaiveDate::from_ymd_opt(2024, 1, 3));

        let link = page.headers.get("link").unwrap().to_str().unwrap();
        assert!(link.contains("rel=\"first\""));
    }

    #[tokio::test]
    async fn test_query_all_over_http() {
        let backend = FakeBackend::new();
        let service = service_for::<BloodPressure>(&backend).await;

        for day in 1..=7 {
            service.create(&reading(day)).await.unwrap();
        }

        let pages: Vec<_> = service
            .query_all(RequestOptions::new().size(3).sort("id,asc"))
            .try_collect()
            .await
            .unwrap();

        assert_eq!(pages.iter().map(|p| p.len()).collect::<Vec<_>>(), vec![3, 3, 1]);
    }

    #[tokio::test]
    async fn test_preferences_update_and_delete() {
        let backend = FakeBackend::new();
        let service = service_for::<Preferences>(&backend).await;

        let created = service
            .create(&Preferences {
                weekly_goal: Some(10),
                ..Preferences::default()
            })
            .await
            .unwrap();

        let updated = service
            .update(&Preferences {
                weekly_goal: Some(14),
                ..created.clone()
            })
            .await
            .unwrap();
        assert_eq!(updated.weekly_goal, Some(14));
        assert_eq!(backend.preferences.len(), 1);

        let response = service.delete(created.id.unwrap()).await.unwrap();
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.body.is_empty());
        assert_eq!(response.alert().unwrap().message, "healthTrackerApp.preferences.deleted");

        assert!(service.find(created.id.unwrap()).await.unwrap_err().is_not_found());
    }
}
