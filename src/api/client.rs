//! Store API client
//!
//! [`StoreApi`] is the seam between the HTTP handlers and the remote REST
//! API. [`HttpStoreApi`] is the production implementation; tests plug in
//! in-memory fakes.

use super::error::{message_from_body, ApiError, ApiResult};
use super::models::{Book, CreatedOrders, Order, OrderLine, Paginated, UserProfile};
use crate::config::ApiConfig;
use crate::filters::BookFilters;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Operations the storefront needs from the remote API.
#[async_trait]
pub trait StoreApi: Send + Sync {
    /// `GET /books` with the given filters.
    async fn list_books(&self, filters: &BookFilters) -> ApiResult<Paginated<Book>>;

    /// `GET /books/{id}`.
    async fn get_book(&self, id: &str) -> ApiResult<Book>;

    /// `POST /orders`, returning the created orders.
    async fn create_orders(&self, lines: &[OrderLine]) -> ApiResult<Vec<Order>>;

    /// `GET /orders/{id}`.
    async fn get_order(&self, id: &str) -> ApiResult<Order>;

    /// `GET /users/profile`.
    async fn get_profile(&self) -> ApiResult<UserProfile>;
}

/// [`StoreApi`] over HTTP using reqwest.
#[derive(Debug, Clone)]
pub struct HttpStoreApi {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpStoreApi {
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(config.base_url.clone()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url,
            token: config.token.clone(),
        })
    }

    /// Base URL with `segments` appended, each one percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends the request and decodes a JSON body. 404 becomes
    /// [`ApiError::NotFound`] naming `resource`.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        resource: &str,
    ) -> ApiResult<T> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            debug!(resource, "remote api: not found");
            return Err(ApiError::NotFound(resource.to_string()));
        }

        if !status.is_success() {
            let message = message_from_body(&body);
            warn!(status = status.as_u16(), ?message, resource, "remote api error");
            return Err(ApiError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode(format!("{}: {}", resource, e)))
    }
}

#[async_trait]
impl StoreApi for HttpStoreApi {
    async fn list_books(&self, filters: &BookFilters) -> ApiResult<Paginated<Book>> {
        let url = self.endpoint(&["books"])?;
        let request = self.client.get(url).query(&filters.to_query_pairs());
        self.send(request, "books").await
    }

    async fn get_book(&self, id: &str) -> ApiResult<Book> {
        let url = self.endpoint(&["books", id])?;
        self.send(self.client.get(url), "book").await
    }

    async fn create_orders(&self, lines: &[OrderLine]) -> ApiResult<Vec<Order>> {
        let url = self.endpoint(&["orders"])?;
        let created: CreatedOrders = self.send(self.client.post(url).json(lines), "orders").await?;
        Ok(created.into_vec())
    }

    async fn get_order(&self, id: &str) -> ApiResult<Order> {
        let url = self.endpoint(&["orders", id])?;
        self.send(self.client.get(url), "order").await
    }

    async fn get_profile(&self) -> ApiResult<UserProfile> {
        let url = self.endpoint(&["users", "profile"])?;
        self.send(self.client.get(url), "profile").await
    }
}
