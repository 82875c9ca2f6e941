//! Hosted payment widget seam.
//!
//! The widget is an externally hosted payment UI loaded by the page at
//! runtime. This crate never talks to the provider directly: the host wires
//! up an implementation of [`PaymentWidget`] (configured with the client key
//! from [`crate::config::StorefrontConfig`]) and attaches it to the checkout
//! flow once it has finished rendering.

use async_trait::async_trait;
use url::Url;

use kitae_core::Currency;

use crate::error::Result;
use crate::models::ExternalOrderRef;

/// Amount the widget displays and charges.
///
/// Always a whole number of currency units, rounded down from the cart
/// total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetAmount {
    pub currency: Currency,
    pub value: i64,
}

/// Parameters for opening the hosted payment page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    /// External (prefixed) order reference, correlating the provider's
    /// payment record with the internal order.
    pub order_id: ExternalOrderRef,
    /// Human-readable summary shown on the payment page.
    pub order_name: String,
    /// Where the provider redirects after a successful payment. Carries the
    /// internal order id and the amount as query parameters.
    pub success_url: Url,
    /// Where the provider redirects after a failed or abandoned payment.
    pub fail_url: Url,
    pub customer_email: String,
    pub customer_name: String,
    pub customer_mobile_phone: String,
}

/// The externally hosted payment widget.
///
/// `request_payment` performs a full-page redirect on success: control
/// leaves the application and no further client code runs until the
/// provider redirects back.
#[async_trait]
pub trait PaymentWidget: Send + Sync {
    /// Configure the amount before the widget renders its payment methods.
    async fn set_amount(&self, amount: WidgetAmount) -> Result<()>;

    /// Open the hosted payment page.
    async fn request_payment(&self, request: PaymentRequest) -> Result<()>;
}
