//! Client-side cart cache.
//!
//! A read-through mirror of the server-held cart. Every mutation goes to the
//! server first and is followed by an unconditional [`CartCache::refresh`];
//! there are no optimistic local updates, so the cache never diverges from
//! server truth for more than one round trip.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, instrument};

use kitae_core::{CartItemId, Currency};

use crate::api::CommerceApi;
use crate::error::{Result, StorefrontError};
use crate::models::{AddToCartRequest, CartSnapshot};
use crate::session::Session;

/// Shared, cheaply cloneable cart handle.
///
/// Local to one browser tab; the last refresh wins, no cross-tab locking.
#[derive(Clone)]
pub struct CartCache {
    inner: Arc<CartCacheInner>,
}

struct CartCacheInner {
    api: Arc<dyn CommerceApi>,
    session: Session,
    state: RwLock<CartSnapshot>,
}

impl CartCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new(api: Arc<dyn CommerceApi>, session: Session, currency: Currency) -> Self {
        Self {
            inner: Arc::new(CartCacheInner {
                api,
                session,
                state: RwLock::new(CartSnapshot::empty(currency)),
            }),
        }
    }

    /// The current local copy of the cart.
    pub async fn snapshot(&self) -> CartSnapshot {
        self.inner.state.read().await.clone()
    }

    /// Replace local state wholesale with the server cart.
    ///
    /// Skipped silently when logged out (there is no server cart to read);
    /// the local state stays empty in that case.
    #[instrument(skip_all)]
    pub async fn refresh(&self) -> Result<CartSnapshot> {
        if !self.inner.session.is_logged_in() {
            return Ok(self.snapshot().await);
        }

        let cart = self.inner.api.fetch_cart().await?;
        debug!(lines = cart.line_count(), "cart refreshed");
        *self.inner.state.write().await = cart.clone();
        Ok(cart)
    }

    /// Add a variant to the cart, then refresh.
    pub async fn add(&self, request: &AddToCartRequest) -> Result<CartSnapshot> {
        self.require_session()?;
        self.inner.api.add_to_cart(request).await?;
        self.refresh().await
    }

    /// Change the quantity of a cart line, then refresh.
    pub async fn update_quantity(
        &self,
        item_id: &CartItemId,
        quantity: u32,
    ) -> Result<CartSnapshot> {
        self.require_session()?;
        self.inner.api.update_quantity(item_id, quantity).await?;
        self.refresh().await
    }

    /// Remove a cart line, then refresh.
    pub async fn remove(&self, item_id: &CartItemId) -> Result<CartSnapshot> {
        self.require_session()?;
        self.inner.api.remove_item(item_id).await?;
        self.refresh().await
    }

    /// Clear the server cart, then refresh.
    pub async fn clear(&self) -> Result<CartSnapshot> {
        self.require_session()?;
        self.inner.api.clear_cart().await?;
        self.refresh().await
    }

    /// Mutations require an active session; fail before touching the server.
    fn require_session(&self) -> Result<()> {
        if self.inner.session.is_logged_in() {
            Ok(())
        } else {
            Err(StorefrontError::LoginRequired)
        }
    }
}
