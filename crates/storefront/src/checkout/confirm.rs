//! Payment confirmation on redirect back from the provider.
//!
//! The success page mounts a [`ConfirmationHandler`] and feeds it the
//! redirect URL. The handler runs at most once per page load: the host UI
//! framework may mount the page twice in quick succession, and a duplicate
//! confirmation call could double-settle the payment. The one-shot flag is
//! taken synchronously, before any async work, so a second mount cannot
//! slip past an in-flight request.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, instrument, warn};
use url::Url;

use kitae_core::OrderId;

use crate::api::CommerceApi;
use crate::cart::CartCache;
use crate::error::{Result, StorefrontError};
use crate::models::{ConfirmPaymentRequest, ExternalOrderRef};

/// Parameters the provider puts on the success redirect URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentCallback {
    /// Provider-issued payment key.
    pub payment_key: String,
    /// Internal order id (the success URL carries it unprefixed).
    pub order_id: OrderId,
    /// Amount in whole currency units, echoed from the payment request.
    pub amount: i64,
}

impl PaymentCallback {
    /// Extract `paymentKey`, `orderId`, and `amount` from the redirect URL.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::InvalidPaymentInfo`] if any parameter is
    /// absent, blank, or (for the amount) not an integer.
    pub fn from_redirect_url(url: &Url) -> Result<Self> {
        let param = |name: &str| -> Option<String> {
            url.query_pairs()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned())
                .filter(|value| !value.is_empty())
        };

        let payment_key = param("paymentKey").ok_or(StorefrontError::InvalidPaymentInfo)?;
        let order_id = param("orderId").ok_or(StorefrontError::InvalidPaymentInfo)?;
        let amount = param("amount")
            .and_then(|value| value.parse::<i64>().ok())
            .ok_or(StorefrontError::InvalidPaymentInfo)?;

        Ok(Self {
            payment_key,
            order_id: OrderId::new(order_id),
            amount,
        })
    }
}

/// Result of driving the confirmation once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationStatus {
    /// The payment was confirmed and the cart cleared.
    Confirmed,
    /// A previous mount already ran (or is still running); nothing was done.
    AlreadyHandled,
}

/// One-shot payment confirmation.
///
/// Scoped to a single success-page load; construct a fresh handler per
/// page. The one-shot flag is never reset, even on failure - a failed
/// confirmation must not be retried automatically, the user restarts
/// checkout instead.
pub struct ConfirmationHandler {
    api: Arc<dyn CommerceApi>,
    cart: CartCache,
    order_prefix: String,
    processed: AtomicBool,
}

impl ConfirmationHandler {
    /// Create a handler for one success-page load.
    #[must_use]
    pub fn new(api: Arc<dyn CommerceApi>, cart: CartCache, order_prefix: impl Into<String>) -> Self {
        Self {
            api,
            cart,
            order_prefix: order_prefix.into(),
            processed: AtomicBool::new(false),
        }
    }

    /// Whether this handler has already started a confirmation attempt.
    #[must_use]
    pub fn has_processed(&self) -> bool {
        self.processed.load(Ordering::SeqCst)
    }

    /// Confirm the payment described by the redirect URL, exactly once.
    ///
    /// On success the cart cache is cleared. On failure the one-shot flag
    /// stays set and the caller surfaces the error; nothing is retried.
    #[instrument(skip_all)]
    pub async fn handle_redirect(&self, url: &Url) -> Result<ConfirmationStatus> {
        // Claim the one-shot flag before any parsing or I/O; a second mount
        // racing an in-flight request must see it already taken.
        if self.processed.swap(true, Ordering::SeqCst) {
            warn!("payment already processed, skipping");
            return Ok(ConfirmationStatus::AlreadyHandled);
        }

        let callback = PaymentCallback::from_redirect_url(url)?;

        // Same prefixing rule the checkout flow used when opening the widget
        let request = ConfirmPaymentRequest {
            payment_key: callback.payment_key,
            order_id: ExternalOrderRef::new(&self.order_prefix, &callback.order_id),
            amount: callback.amount,
        };
        info!(order_ref = %request.order_id, amount = request.amount, "confirming payment");
        self.api.confirm_payment(&request).await?;

        info!(order_ref = %request.order_id, "payment confirmed");
        self.cart.clear().await?;

        Ok(ConfirmationStatus::Confirmed)
    }
}
