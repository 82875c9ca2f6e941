//! Cart domain types.
//!
//! The server owns the cart; these types are the client-side read replica
//! held by [`crate::cart::CartCache`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kitae_core::{CartItemId, Currency, Money, ProductId, VariantId};

/// A single line in the cart: one product variant at a quantity, with the
/// price snapshotted at add time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Server-assigned cart line id, used for update/remove calls.
    pub id: CartItemId,
    /// Product this line refers to.
    pub product_id: ProductId,
    /// Specific size/color SKU, when the product has variants.
    pub variant_id: Option<VariantId>,
    /// Display name captured from the product.
    pub name: String,
    /// Unit price snapshot.
    pub price: Decimal,
    /// Quantity of this variant.
    pub quantity: u32,
    /// Variant size, if any.
    pub size: Option<String>,
    /// Variant color, if any.
    pub color: Option<String>,
}

impl CartItem {
    /// Price of the whole line (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Body of `POST /cart/add`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub variant_id: VariantId,
    pub quantity: u32,
}

/// A point-in-time copy of the server cart.
///
/// Replaced wholesale on every [`crate::cart::CartCache::refresh`]; never
/// merged incrementally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// Cart lines in server order.
    pub items: Vec<CartItem>,
    /// Subtotal across all lines, before shipping.
    pub subtotal: Money,
}

impl CartSnapshot {
    /// An empty cart in the given currency.
    #[must_use]
    pub const fn empty(currency: Currency) -> Self {
        Self {
            items: Vec::new(),
            subtotal: Money::zero(currency),
        }
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Total quantity across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Subtotal recomputed from the lines.
    ///
    /// Used as a fallback when the server omits its own subtotal.
    #[must_use]
    pub fn computed_subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }
}
