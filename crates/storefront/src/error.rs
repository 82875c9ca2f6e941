//! Unified error handling for the storefront client.
//!
//! Every fallible operation returns `Result<T, StorefrontError>`. Errors are
//! never fatal: the embedding UI surfaces them and hands control back to the
//! user. Nothing in this crate retries automatically.

use thiserror::Error;

/// How an error should be surfaced by the embedding UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed user input - surfaced inline, no network call
    /// was made.
    Validation,
    /// A flow precondition failed (login required, empty cart, widget not
    /// ready, missing order id) - surfaced as a transient notification,
    /// flow aborted.
    Precondition,
    /// Network or API failure - surfaced as a transient notification with
    /// the server-provided message when available.
    Network,
    /// Payment confirmation failed - surfaced as a transient notification
    /// and never retried automatically.
    Confirmation,
}

/// Errors produced by cart, checkout, and payment-confirmation flows.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// A required form field is missing or malformed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A cart mutation was attempted without an active session.
    #[error("login required")]
    LoginRequired,

    /// Checkout was attempted with an empty cart.
    #[error("empty cart")]
    EmptyCart,

    /// A card payment was requested before the widget finished initializing.
    #[error("widget not ready")]
    WidgetNotReady,

    /// The order-creation response contained no recognizable order id.
    #[error("missing order id")]
    MissingOrderId,

    /// The payment redirect URL is missing a required parameter.
    #[error("invalid payment info")]
    InvalidPaymentInfo,

    /// An order-creation request is already in flight.
    #[error("order already in progress")]
    OrderInFlight,

    /// The API returned a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// HTTP request failed before a response was produced.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The hosted payment widget rejected the request.
    #[error("payment widget error: {0}")]
    Widget(String),

    /// The payment provider refused to confirm the payment.
    #[error("payment confirmation failed: {0}")]
    ConfirmationFailed(String),
}

impl StorefrontError {
    /// Classify the error per the UI surfacing taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::LoginRequired
            | Self::EmptyCart
            | Self::WidgetNotReady
            | Self::MissingOrderId
            | Self::InvalidPaymentInfo
            | Self::OrderInFlight => ErrorKind::Precondition,
            Self::Api { .. } | Self::Http(_) | Self::Parse(_) | Self::Widget(_) => {
                ErrorKind::Network
            }
            Self::ConfirmationFailed(_) => ErrorKind::Confirmation,
        }
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(StorefrontError::EmptyCart.to_string(), "empty cart");
        assert_eq!(
            StorefrontError::WidgetNotReady.to_string(),
            "widget not ready"
        );
        assert_eq!(
            StorefrontError::MissingOrderId.to_string(),
            "missing order id"
        );
        assert_eq!(
            StorefrontError::InvalidPaymentInfo.to_string(),
            "invalid payment info"
        );
        assert_eq!(StorefrontError::LoginRequired.to_string(), "login required");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            StorefrontError::Validation("first name".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(StorefrontError::EmptyCart.kind(), ErrorKind::Precondition);
        // Login-required aborts the flow rather than pointing at a field
        assert_eq!(
            StorefrontError::LoginRequired.kind(),
            ErrorKind::Precondition
        );
        assert_eq!(
            StorefrontError::Api {
                status: 500,
                message: "boom".into()
            }
            .kind(),
            ErrorKind::Network
        );
        assert_eq!(
            StorefrontError::ConfirmationFailed("declined".into()).kind(),
            ErrorKind::Confirmation
        );
    }
}
