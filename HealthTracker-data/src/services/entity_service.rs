use std::collections::HashSet;
use std::marker::PhantomData;

use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use tracing::{debug, info, instrument};

use health_tracker_domain::{Entity, RequestOptions};

use crate::config::ClientConfig;
use crate::errors::{ClientError, ClientResult};
use crate::response::ResponseWrapper;
use crate::transport::{ApiRequest, HttpTransport, RawResponse, ReqwestTransport};

/// CRUD operations on one REST resource.
///
/// Each call is a lazy future: nothing is sent until it is polled, and
/// dropping it cancels the request in flight.
#[async_trait]
pub trait EntityServiceTrait<E: Entity>: Send + Sync {
    /// POST a new entity and return it as stored by the server
    async fn create(&self, entity: &E) -> ClientResult<E>;

    /// PUT an existing entity and return it as stored by the server
    async fn update(&self, entity: &E) -> ClientResult<E>;

    /// GET a single entity by identifier
    async fn find(&self, id: i64) -> ClientResult<E>;

    /// GET a page of entities
    async fn query(&self, options: Option<&RequestOptions>) -> ClientResult<ResponseWrapper<E>>;

    /// DELETE an entity; the response body is returned undecoded
    async fn delete(&self, id: i64) -> ClientResult<RawResponse>;

    /// Query page after page, following `next` links until there are none.
    ///
    /// The first request uses `options` as given; later ones only change `page`.
    /// A `next` link pointing at a page already fetched ends the stream.
    fn query_all<'a>(&'a self, options: RequestOptions) -> BoxStream<'a, ClientResult<ResponseWrapper<E>>> {
        let visited = HashSet::from([options.page.unwrap_or(0)]);

        stream::try_unfold(Some((options, visited)), move |state| async move {
            let Some((options, mut visited)) = state else {
                return Ok::<_, ClientError>(None);
            };

            let page = self.query(Some(&options)).await?;
            let following = page
                .links()?
                .next()
                .filter(|next| visited.insert(*next))
                .map(|next| (options.clone().page(next), visited));

            Ok(Some((page, following)))
        })
        .boxed()
    }
}

/// Generic REST service for an [`Entity`] over an [`HttpTransport`]
pub struct EntityService<E, T = ReqwestTransport> {
    transport: T,
    resource_url: String,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> EntityService<E, ReqwestTransport> {
    /// Create a service talking to the backend described by `config`
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self::new(ReqwestTransport::new(config)?))
    }
}

impl<E: Entity, T: HttpTransport> EntityService<E, T> {
    /// Create a service on top of an existing transport
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            resource_url: format!("api/{}", E::RESOURCE_PATH),
            _entity: PhantomData,
        }
    }

    /// Resource path relative to the base URL, e.g. `api/blood-pressures`
    pub fn resource_url(&self) -> &str {
        &self.resource_url
    }

    fn item_url(&self, id: i64) -> String {
        format!("{}/{}", self.resource_url, id)
    }

    /// Wire representation of the entity, dates in server format
    fn convert(&self, entity: &E) -> ClientResult<serde_json::Value> {
        Ok(serde_json::to_value(entity)?)
    }

    fn log_alert(&self, response: &RawResponse) {
        if let Some(alert) = response.alert() {
            info!(
                "{}: {}{}",
                E::ENTITY_NAME,
                alert.message,
                alert.param.map(|p| format!(" ({})", p)).unwrap_or_default()
            );
        }
    }
}

#[async_trait]
impl<E: Entity, T: HttpTransport> EntityServiceTrait<E> for EntityService<E, T> {
    #[instrument(skip(self, entity), fields(entity = E::ENTITY_NAME))]
    async fn create(&self, entity: &E) -> ClientResult<E> {
        let copy = self.convert(entity)?;
        let response = self
            .transport
            .execute(ApiRequest::post(self.resource_url.as_str(), copy))
            .await?;

        self.log_alert(&response);
        response.json()
    }

    #[instrument(skip(self, entity), fields(entity = E::ENTITY_NAME, id = ?entity.id()))]
    async fn update(&self, entity: &E) -> ClientResult<E> {
        let copy = self.convert(entity)?;
        let response = self
            .transport
            .execute(ApiRequest::put(self.resource_url.as_str(), copy))
            .await?;

        self.log_alert(&response);
        response.json()
    }

    #[instrument(skip(self), fields(entity = E::ENTITY_NAME))]
    async fn find(&self, id: i64) -> ClientResult<E> {
        let response = self.transport.execute(ApiRequest::get(self.item_url(id))).await?;
        response.json()
    }

    #[instrument(skip(self), fields(entity = E::ENTITY_NAME))]
    async fn query(&self, options: Option<&RequestOptions>) -> ClientResult<ResponseWrapper<E>> {
        let query = options.map(RequestOptions::to_query_pairs).unwrap_or_default();
        let request = ApiRequest::get(self.resource_url.as_str()).with_query(query);

        let wrapper = ResponseWrapper::from_raw(self.transport.execute(request).await?)?;
        debug!("Received {} {} item(s)", wrapper.len(), E::ENTITY_NAME);

        Ok(wrapper)
    }

    #[instrument(skip(self), fields(entity = E::ENTITY_NAME))]
    async fn delete(&self, id: i64) -> ClientResult<RawResponse> {
        let response = self.transport.execute(ApiRequest::delete(self.item_url(id))).await?;
        self.log_alert(&response);
        Ok(response)
    }
}
