//! Order domain types and the wire DTOs sent to the commerce API.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kitae_core::{OrderId, OrderStatus, PaymentMethod, PaymentStatus, ProductId, VariantId};

/// A line item inside an order, as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    #[serde(default)]
    pub variant_id: Option<VariantId>,
    pub quantity: u32,
    /// Unit price at order time.
    pub price: Decimal,
}

/// A server-owned order record.
///
/// The client only holds a transient copy; the server is the source of
/// truth for status transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub subtotal: Decimal,
    #[serde(default)]
    pub shipping: Decimal,
    #[serde(default)]
    pub total: Decimal,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of `POST /orders`.
///
/// Line items are deliberately absent: the server derives them from its own
/// cart state for the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub shipping_name: String,
    pub shipping_phone: String,
    pub shipping_address1: String,
    pub shipping_address2: String,
    pub shipping_city: String,
    pub shipping_zip: String,
    pub shipping_country: String,
    pub payment_method: PaymentMethod,
    pub notes: String,
}

/// The prefixed order id sent to the payment provider to correlate its
/// payment record with the internal order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ExternalOrderRef(String);

impl ExternalOrderRef {
    /// Compose the reference from the store prefix and an internal order id.
    ///
    /// The confirmation handler must use the exact same rule as the checkout
    /// orchestrator, or the provider will reject the confirmation.
    #[must_use]
    pub fn new(prefix: &str, order_id: &OrderId) -> Self {
        Self(format!("{prefix}-{order_id}"))
    }

    /// The composed reference string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExternalOrderRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Body of `POST /payments/confirm`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentRequest {
    /// Payment key issued by the provider on the redirect URL.
    pub payment_key: String,
    /// External (prefixed) order reference.
    pub order_id: ExternalOrderRef,
    /// Amount in whole currency units, as sent to the widget.
    pub amount: i64,
}
