//! Commerce REST API client.
//!
//! # Architecture
//!
//! - [`CommerceApi`] is the seam between the flows and the network; tests
//!   inject doubles behind `Arc<dyn CommerceApi>`.
//! - [`HttpApi`] is the production implementation over `reqwest`. The
//!   server is the source of truth for cart and order state - no local
//!   persistence, direct API calls only.
//! - Response envelopes are normalized once, in [`envelope`]; nothing past
//!   this module touches raw JSON.

pub(crate) mod envelope;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Method;
use secrecy::ExposeSecret;
use serde_json::Value;
use tracing::{debug, instrument};

use kitae_core::{CartItemId, Currency, OrderId};

use crate::config::StorefrontConfig;
use crate::error::{Result, StorefrontError};
use crate::models::{
    AddToCartRequest, CartSnapshot, ConfirmPaymentRequest, CreateOrderRequest, Order,
};
use crate::session::Session;

/// Operations the storefront flows need from the commerce backend.
///
/// Mirrors the REST surface one-to-one; implementations must not retry,
/// cache, or reorder calls - the flows own those policies.
#[async_trait]
pub trait CommerceApi: Send + Sync {
    /// `POST /orders`. Returns the server-assigned order id.
    async fn create_order(&self, request: &CreateOrderRequest) -> Result<OrderId>;

    /// `GET /cart`. Returns the full server cart.
    async fn fetch_cart(&self) -> Result<CartSnapshot>;

    /// `POST /cart/add`.
    async fn add_to_cart(&self, request: &AddToCartRequest) -> Result<()>;

    /// `PUT /cart/update/:itemId`.
    async fn update_quantity(&self, item_id: &CartItemId, quantity: u32) -> Result<()>;

    /// `DELETE /cart/remove/:itemId`.
    async fn remove_item(&self, item_id: &CartItemId) -> Result<()>;

    /// `DELETE /cart/clear`.
    async fn clear_cart(&self) -> Result<()>;

    /// `POST /payments/confirm`.
    async fn confirm_payment(&self, request: &ConfirmPaymentRequest) -> Result<()>;

    /// `GET /orders`.
    async fn list_orders(&self) -> Result<Vec<Order>>;

    /// `GET /orders/:id`.
    async fn get_order(&self, order_id: &OrderId) -> Result<Order>;

    /// `PUT /orders/:id/cancel`.
    async fn cancel_order(&self, order_id: &OrderId) -> Result<()>;
}

// =============================================================================
// HttpApi
// =============================================================================

/// Production [`CommerceApi`] over HTTP.
///
/// Attaches the session's bearer token to every request when logged in.
#[derive(Clone)]
pub struct HttpApi {
    inner: Arc<HttpApiInner>,
}

struct HttpApiInner {
    client: reqwest::Client,
    base_url: String,
    currency: Currency,
    session: Session,
}

impl HttpApi {
    /// Create a new API client.
    #[must_use]
    pub fn new(config: &StorefrontConfig, session: Session) -> Self {
        Self {
            inner: Arc::new(HttpApiInner {
                client: reqwest::Client::new(),
                base_url: config.api_base_url.clone(),
                currency: config.checkout.currency,
                session,
            }),
        }
    }

    /// Issue one request and return the parsed JSON body.
    ///
    /// Non-success statuses become [`StorefrontError::Api`] carrying the
    /// server-provided `message` when the body has one.
    async fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        let url = format!("{}{path}", self.inner.base_url);
        debug!(%method, %url, "API request");

        let mut request = self.inner.client.request(method, &url);
        if let Some(user) = self.inner.session.current() {
            request = request.bearer_auth(user.access_token.expose_secret());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| {
                    v.get("message")
                        .or_else(|| v.get("error"))
                        .and_then(Value::as_str)
                        .map(String::from)
                })
                .unwrap_or_else(|| "request failed".to_string());
            tracing::warn!(%status, %url, %message, "API request failed");
            return Err(StorefrontError::Api {
                status: status.as_u16(),
                message,
            });
        }

        if text.is_empty() {
            Ok(Value::Null)
        } else {
            Ok(serde_json::from_str(&text)?)
        }
    }
}

#[async_trait]
impl CommerceApi for HttpApi {
    #[instrument(skip_all)]
    async fn create_order(&self, request: &CreateOrderRequest) -> Result<OrderId> {
        let body = serde_json::to_value(request)?;
        let response = self.request(Method::POST, "/orders", Some(&body)).await?;
        envelope::extract_order_id(&response).ok_or(StorefrontError::MissingOrderId)
    }

    #[instrument(skip_all)]
    async fn fetch_cart(&self) -> Result<CartSnapshot> {
        let response = self.request(Method::GET, "/cart", None).await?;
        Ok(envelope::parse_cart(&response, self.inner.currency))
    }

    #[instrument(skip_all)]
    async fn add_to_cart(&self, request: &AddToCartRequest) -> Result<()> {
        let body = serde_json::to_value(request)?;
        self.request(Method::POST, "/cart/add", Some(&body)).await?;
        Ok(())
    }

    #[instrument(skip_all, fields(item_id = %item_id))]
    async fn update_quantity(&self, item_id: &CartItemId, quantity: u32) -> Result<()> {
        let body = serde_json::json!({ "quantity": quantity });
        self.request(
            Method::PUT,
            &format!("/cart/update/{item_id}"),
            Some(&body),
        )
        .await?;
        Ok(())
    }

    #[instrument(skip_all, fields(item_id = %item_id))]
    async fn remove_item(&self, item_id: &CartItemId) -> Result<()> {
        self.request(Method::DELETE, &format!("/cart/remove/{item_id}"), None)
            .await?;
        Ok(())
    }

    #[instrument(skip_all)]
    async fn clear_cart(&self) -> Result<()> {
        self.request(Method::DELETE, "/cart/clear", None).await?;
        Ok(())
    }

    #[instrument(skip_all)]
    async fn confirm_payment(&self, request: &ConfirmPaymentRequest) -> Result<()> {
        let body = serde_json::to_value(request)?;
        let response = self
            .request(Method::POST, "/payments/confirm", Some(&body))
            .await?;
        envelope::confirmation_result(&response).map_err(StorefrontError::ConfirmationFailed)
    }

    #[instrument(skip_all)]
    async fn list_orders(&self) -> Result<Vec<Order>> {
        let response = self.request(Method::GET, "/orders", None).await?;
        Ok(envelope::parse_orders(&response)?)
    }

    #[instrument(skip_all, fields(order_id = %order_id))]
    async fn get_order(&self, order_id: &OrderId) -> Result<Order> {
        let response = self
            .request(Method::GET, &format!("/orders/{order_id}"), None)
            .await?;
        Ok(envelope::parse_order(&response)?)
    }

    #[instrument(skip_all, fields(order_id = %order_id))]
    async fn cancel_order(&self, order_id: &OrderId) -> Result<()> {
        self.request(Method::PUT, &format!("/orders/{order_id}/cancel"), None)
            .await?;
        Ok(())
    }
}
