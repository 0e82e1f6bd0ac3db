// Testing utilities and in-memory implementations of the services
// This module is only available in tests or when the "mock" feature is enabled

pub mod backend;

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::StatusCode;

use health_tracker_domain::pagination::{LINK_HEADER, TOTAL_COUNT_HEADER};
use health_tracker_domain::{Entity, PageLinks, RequestOptions};

use crate::errors::{ClientError, ClientResult};
use crate::response::ResponseWrapper;
use crate::services::EntityServiceTrait;
use crate::transport::RawResponse;

/// Application name used in alert headers
pub const APPLICATION_NAME: &str = "healthTrackerApp";

/// Page size used when a query does not ask for one
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// In-memory implementation of [`EntityServiceTrait`] that behaves like the
/// backend: identifiers are assigned on create, creating an entity that
/// already has an id is a 400, missing entities are a 404, and collection
/// responses carry `X-Total-Count` and `Link` headers. Items are returned in
/// id order; search queries and filters are ignored.
pub struct MockEntityService<E> {
    entities: RwLock<BTreeMap<i64, E>>,
    next_id: AtomicI64,
}

impl<E: Entity> Default for MockEntityService<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> MockEntityService<E> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Add pre-defined entities; those without an id get one assigned
    pub fn with_entities(self, entities: Vec<E>) -> Self {
        {
            let mut store = self.write();
            for mut entity in entities {
                let id = match entity.id() {
                    Some(id) => {
                        self.next_id.fetch_max(id.saturating_add(1), Ordering::SeqCst);
                        id
                    }
                    None => self.next_id.fetch_add(1, Ordering::SeqCst),
                };
                entity.set_id(Some(id));
                store.insert(id, entity);
            }
        }
        self
    }

    /// Number of stored entities
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<i64, E>> {
        self.entities.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<i64, E>> {
        self.entities.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert_new(&self, entity: &E) -> E {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut stored = entity.clone();
        stored.set_id(Some(id));
        self.write().insert(id, stored.clone());
        stored
    }
}

/// Headers announcing a successful change, e.g. `healthTrackerApp.weight.created`
pub fn alert_headers(entity_name: &str, action: &str, param: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    insert_header(
        &mut headers,
        &format!("X-{}-alert", APPLICATION_NAME),
        &format!("{}.{}.{}", APPLICATION_NAME, entity_name, action),
    );
    insert_header(&mut headers, &format!("X-{}-params", APPLICATION_NAME), param);
    headers
}

/// Headers announcing a failure, e.g. `error.idexists`
pub fn failure_headers(entity_name: &str, error_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    insert_header(
        &mut headers,
        &format!("X-{}-error", APPLICATION_NAME),
        &format!("error.{}", error_key),
    );
    insert_header(&mut headers, &format!("X-{}-params", APPLICATION_NAME), entity_name);
    headers
}

fn insert_header(headers: &mut HeaderMap, name: &str, value: &str) {
    if let (Ok(name), Ok(value)) = (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
        headers.insert(name, value);
    }
}

fn failure(status: StatusCode, entity_name: &str, error_key: &str) -> ClientError {
    ClientError::Status {
        status,
        error_key: Some(format!("error.{}", error_key)),
        body: format!("{} {}", entity_name, error_key),
    }
}

#[async_trait]
impl<E: Entity> EntityServiceTrait<E> for MockEntityService<E> {
    async fn create(&self, entity: &E) -> ClientResult<E> {
        if entity.id().is_some() {
            return Err(failure(StatusCode::BAD_REQUEST, E::ENTITY_NAME, "idexists"));
        }
        Ok(self.insert_new(entity))
    }

    async fn update(&self, entity: &E) -> ClientResult<E> {
        match entity.id() {
            // Updating an entity without id creates it
            None => Ok(self.insert_new(entity)),
            Some(id) => {
                self.next_id.fetch_max(id.saturating_add(1), Ordering::SeqCst);
                self.write().insert(id, entity.clone());
                Ok(entity.clone())
            }
        }
    }

    async fn find(&self, id: i64) -> ClientResult<E> {
        self.read()
            .get(&id)
            .cloned()
            .ok_or_else(|| failure(StatusCode::NOT_FOUND, E::ENTITY_NAME, "notfound"))
    }

    async fn query(&self, options: Option<&RequestOptions>) -> ClientResult<ResponseWrapper<E>> {
        let store = self.read();
        let total = store.len() as u64;

        let page = options.and_then(|o| o.page).unwrap_or(0);
        let size = options.and_then(|o| o.size).unwrap_or(DEFAULT_PAGE_SIZE).max(1);

        let items: Vec<E> = store
            .values()
            .skip(page as usize * size as usize)
            .take(size as usize)
            .cloned()
            .collect();

        let mut headers = HeaderMap::new();
        insert_header(&mut headers, TOTAL_COUNT_HEADER, &total.to_string());
        insert_header(
            &mut headers,
            LINK_HEADER,
            &PageLinks::for_page(page, size, total).to_header(&format!("/api/{}", E::RESOURCE_PATH), size),
        );

        Ok(ResponseWrapper::new(headers, items, StatusCode::OK))
    }

    async fn delete(&self, id: i64) -> ClientResult<RawResponse> {
        if self.write().remove(&id).is_none() {
            return Err(failure(StatusCode::NOT_FOUND, E::ENTITY_NAME, "notfound"));
        }

        Ok(RawResponse {
            status: StatusCode::OK,
            headers: alert_headers(E::ENTITY_NAME, "deleted", &id.to_string()),
            body: Vec::new(),
        })
    }
}
