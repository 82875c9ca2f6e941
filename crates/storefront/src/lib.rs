//! KITAE Storefront client library.
//!
//! Drives the stateful flows of the KITAE storefront against the commerce
//! REST API: the cart cache, the three-step checkout wizard, and the
//! payment confirmation that runs when the hosted payment widget redirects
//! back.
//!
//! # Architecture
//!
//! - The server owns cart and order state; this crate holds read replicas
//!   only and refreshes them wholesale after every mutation.
//! - [`api::CommerceApi`] is the network seam; [`api::HttpApi`] is the
//!   production implementation over `reqwest`.
//! - The hosted payment widget and page navigation are host-provided
//!   ([`checkout::PaymentWidget`], [`checkout::Navigator`]); this crate
//!   never talks to the payment provider directly.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use kitae_storefront::{CartCache, CheckoutFlow, HttpApi, Session, StorefrontConfig};
//!
//! let config = StorefrontConfig::from_env()?;
//! let session = Session::new();
//! let api = Arc::new(HttpApi::new(&config, session.clone()));
//! let cart = CartCache::new(api.clone(), session, config.checkout.currency);
//!
//! let mut flow = CheckoutFlow::new(api, cart, navigator, config.checkout.clone());
//! flow.submit_shipping(shipping)?;
//! flow.select_payment_method(kitae_core::PaymentMethod::Card)?;
//! flow.attach_widget(widget).await?;
//! let outcome = flow.place_order().await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod models;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use api::{CommerceApi, HttpApi};
pub use cart::CartCache;
pub use checkout::confirm::{ConfirmationHandler, ConfirmationStatus, PaymentCallback};
pub use checkout::{
    CheckoutFlow, CheckoutOutcome, CheckoutStep, Navigator, Page, PaymentRequest, PaymentWidget,
    ShippingInfo, WidgetAmount,
};
pub use config::{CheckoutConfig, ConfigError, StorefrontConfig};
pub use error::{ErrorKind, Result, StorefrontError};
pub use models::{CartItem, CartSnapshot, CurrentUser, ExternalOrderRef, Order};
pub use session::Session;

/// Initialize tracing with `EnvFilter`.
///
/// Defaults to info level for this crate if `RUST_LOG` is not set. Intended
/// for embedding binaries and examples; libraries should not call this.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "kitae_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
