//! Shared test doubles for the API, widget, and navigator seams.

#![allow(clippy::unwrap_used)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use rust_decimal::Decimal;
use secrecy::SecretString;
use url::Url;

use kitae_core::{
    CartItemId, Currency, Money, OrderId, ProductId, UserId, VariantId,
};

use crate::api::CommerceApi;
use crate::checkout::{Navigator, Page, PaymentRequest, PaymentWidget, WidgetAmount};
use crate::config::CheckoutConfig;
use crate::error::{Result, StorefrontError};
use crate::models::{
    AddToCartRequest, CartItem, CartSnapshot, ConfirmPaymentRequest, CreateOrderRequest,
    CurrentUser, Order,
};
use crate::session::Session;

/// Scripted in-memory [`CommerceApi`] recording every call it receives.
#[derive(Default)]
pub struct MockApi {
    calls: Mutex<Vec<String>>,
    cart_items: Mutex<Vec<CartItem>>,
    confirm_requests: Mutex<Vec<ConfirmPaymentRequest>>,
    fail_next_create_order: AtomicBool,
    fail_confirmations: AtomicBool,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the server cart served by `fetch_cart`.
    pub fn set_cart(&self, items: Vec<CartItem>) {
        *self.cart_items.lock().unwrap() = items;
    }

    /// Make the next `create_order` answer without an order id.
    pub fn fail_next_create_order(&self) {
        self.fail_next_create_order.store(true, Ordering::SeqCst);
    }

    /// Make every `confirm_payment` answer with a provider refusal.
    pub fn fail_confirmations(&self) {
        self.fail_confirmations.store(true, Ordering::SeqCst);
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| *call == name)
            .count()
    }

    /// Bodies of every `confirm_payment` call.
    pub fn confirm_requests(&self) -> Vec<ConfirmPaymentRequest> {
        self.confirm_requests.lock().unwrap().clone()
    }

    fn record(&self, name: &str) {
        self.calls.lock().unwrap().push(name.to_string());
    }

    fn snapshot(&self) -> CartSnapshot {
        let items = self.cart_items.lock().unwrap().clone();
        let subtotal = items.iter().map(CartItem::line_total).sum();
        CartSnapshot {
            items,
            subtotal: Money::new(subtotal, Currency::KRW),
        }
    }
}

#[async_trait]
impl CommerceApi for MockApi {
    async fn create_order(&self, _request: &CreateOrderRequest) -> Result<OrderId> {
        self.record("create_order");
        if self.fail_next_create_order.swap(false, Ordering::SeqCst) {
            return Err(StorefrontError::MissingOrderId);
        }
        Ok(OrderId::new("ord_1"))
    }

    async fn fetch_cart(&self) -> Result<CartSnapshot> {
        self.record("fetch_cart");
        Ok(self.snapshot())
    }

    async fn add_to_cart(&self, _request: &AddToCartRequest) -> Result<()> {
        self.record("add_to_cart");
        Ok(())
    }

    async fn update_quantity(&self, _item_id: &CartItemId, _quantity: u32) -> Result<()> {
        self.record("update_quantity");
        Ok(())
    }

    async fn remove_item(&self, _item_id: &CartItemId) -> Result<()> {
        self.record("remove_item");
        Ok(())
    }

    async fn clear_cart(&self) -> Result<()> {
        self.record("clear_cart");
        self.cart_items.lock().unwrap().clear();
        Ok(())
    }

    async fn confirm_payment(&self, request: &ConfirmPaymentRequest) -> Result<()> {
        self.record("confirm_payment");
        self.confirm_requests.lock().unwrap().push(request.clone());
        if self.fail_confirmations.load(Ordering::SeqCst) {
            return Err(StorefrontError::ConfirmationFailed("declined".to_string()));
        }
        Ok(())
    }

    async fn list_orders(&self) -> Result<Vec<Order>> {
        self.record("list_orders");
        Ok(Vec::new())
    }

    async fn get_order(&self, order_id: &OrderId) -> Result<Order> {
        self.record("get_order");
        Ok(Order {
            id: order_id.clone(),
            order_number: None,
            status: kitae_core::OrderStatus::Pending,
            payment_status: kitae_core::PaymentStatus::Pending,
            payment_method: None,
            subtotal: Decimal::ZERO,
            shipping: Decimal::ZERO,
            total: Decimal::ZERO,
            items: Vec::new(),
            created_at: None,
        })
    }

    async fn cancel_order(&self, _order_id: &OrderId) -> Result<()> {
        self.record("cancel_order");
        Ok(())
    }
}

/// Recording [`PaymentWidget`] that never redirects.
#[derive(Default)]
pub struct MockWidget {
    amounts: Mutex<Vec<WidgetAmount>>,
    requests: Mutex<Vec<PaymentRequest>>,
}

impl MockWidget {
    pub fn amounts(&self) -> Vec<WidgetAmount> {
        self.amounts.lock().unwrap().clone()
    }

    pub fn requests(&self) -> Vec<PaymentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentWidget for MockWidget {
    async fn set_amount(&self, amount: WidgetAmount) -> Result<()> {
        self.amounts.lock().unwrap().push(amount);
        Ok(())
    }

    async fn request_payment(&self, request: PaymentRequest) -> Result<()> {
        self.requests.lock().unwrap().push(request);
        Ok(())
    }
}

/// Recording [`Navigator`].
#[derive(Default)]
pub struct MockNavigator {
    visited: Mutex<Vec<Page>>,
}

impl MockNavigator {
    pub fn visited(&self) -> Vec<Page> {
        self.visited.lock().unwrap().clone()
    }
}

impl Navigator for MockNavigator {
    fn navigate(&self, page: Page) {
        self.visited.lock().unwrap().push(page);
    }
}

/// A session with a logged-in user.
pub fn logged_in_session() -> Session {
    let session = Session::new();
    session.login(CurrentUser {
        id: UserId::new("usr_1"),
        email: "jiwoo@example.com".to_string(),
        name: Some("Jiwoo".to_string()),
        access_token: SecretString::from("tok_test"),
    });
    session
}

/// Two cart lines totalling 50,000 KRW.
pub fn test_items() -> Vec<CartItem> {
    vec![
        CartItem {
            id: CartItemId::new("ci_1"),
            product_id: ProductId::new("prd_1"),
            variant_id: Some(VariantId::new("var_1")),
            name: "Wool Coat".to_string(),
            price: Decimal::from(30_000),
            quantity: 1,
            size: Some("M".to_string()),
            color: Some("Black".to_string()),
        },
        CartItem {
            id: CartItemId::new("ci_2"),
            product_id: ProductId::new("prd_2"),
            variant_id: Some(VariantId::new("var_2")),
            name: "Knit Scarf".to_string(),
            price: Decimal::from(10_000),
            quantity: 2,
            size: None,
            color: Some("Ivory".to_string()),
        },
    ]
}

/// A filled-in shipping form.
pub fn valid_shipping() -> crate::checkout::ShippingInfo {
    crate::checkout::ShippingInfo {
        first_name: "Jiwoo".to_string(),
        last_name: "Kim".to_string(),
        email: "jiwoo@example.com".to_string(),
        phone: "010-1234-5678".to_string(),
        address: "12 Seongsu-ro".to_string(),
        address2: String::new(),
        city: "Seoul".to_string(),
        postal_code: "04784".to_string(),
        country: "Korea".to_string(),
    }
}

/// Checkout configuration matching the store defaults.
pub fn test_config() -> CheckoutConfig {
    CheckoutConfig {
        base_url: Url::parse("https://kitae.shop").unwrap(),
        order_prefix: "KITAE".to_string(),
        shipping_fee: Decimal::from(3000),
        currency: Currency::KRW,
    }
}
