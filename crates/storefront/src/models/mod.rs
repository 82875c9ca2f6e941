//! Domain models for cart, orders, and the current user.
//!
//! These are validated domain objects, separate from the raw JSON envelopes
//! the API returns (see [`crate::api::envelope`] for the normalization
//! boundary).

pub mod cart;
pub mod order;
pub mod user;

pub use cart::{AddToCartRequest, CartItem, CartSnapshot};
pub use order::{
    ConfirmPaymentRequest, CreateOrderRequest, ExternalOrderRef, Order, OrderItem,
};
pub use user::CurrentUser;
