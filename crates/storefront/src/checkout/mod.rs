//! Checkout orchestration.
//!
//! A three-step wizard: shipping info, payment method, review & pay. Step
//! transitions are strictly sequential and user-gated. Placing an order
//! creates it server-side first; card payments then hand control to the
//! hosted payment widget (full-page redirect), while bank transfers settle
//! immediately and navigate to the order history.
//!
//! The redirect-back half of the card flow lives in [`confirm`].

pub mod confirm;
mod widget;

pub use widget::{PaymentRequest, PaymentWidget, WidgetAmount};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rust_decimal::Decimal;
use tracing::{info, instrument};
use url::Url;

use kitae_core::{Money, OrderId, PaymentMethod};

use crate::api::CommerceApi;
use crate::cart::CartCache;
use crate::config::CheckoutConfig;
use crate::error::{Result, StorefrontError};
use crate::models::{CartSnapshot, CreateOrderRequest, ExternalOrderRef};

/// Grace period before leaving the checkout page after a bank-transfer
/// order. UX only, not a correctness requirement.
const BANK_TRANSFER_GRACE: Duration = Duration::from_secs(1);

/// Pages the checkout flow can navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Shop,
    OrderHistory,
    CheckoutFail,
}

/// Host-provided navigation, the flow's only way to leave the page.
pub trait Navigator: Send + Sync {
    fn navigate(&self, page: Page);
}

/// Current wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutStep {
    #[default]
    Shipping,
    PaymentMethod,
    Review,
}

/// Shipping form fields. All except `address2` are required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub address2: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl Default for ShippingInfo {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            address2: String::new(),
            city: String::new(),
            postal_code: String::new(),
            country: "Korea".to_string(),
        }
    }
}

impl ShippingInfo {
    /// Reject blank required fields. No network call is made on failure.
    fn validate(&self) -> Result<()> {
        let required = [
            ("first name", &self.first_name),
            ("last name", &self.last_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
            ("city", &self.city),
            ("postal code", &self.postal_code),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(StorefrontError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )))
        }
    }

    fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// What happened after [`CheckoutFlow::place_order`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// The hosted payment page is opening; control leaves the application
    /// until the provider redirects back.
    RedirectingToPayment { order_id: OrderId },
    /// The order settled without the widget (bank transfer).
    Completed { order_id: OrderId },
}

/// The three-step checkout state machine.
pub struct CheckoutFlow {
    api: Arc<dyn CommerceApi>,
    cart: CartCache,
    navigator: Arc<dyn Navigator>,
    config: CheckoutConfig,
    step: CheckoutStep,
    shipping: ShippingInfo,
    payment_method: PaymentMethod,
    widget: Option<Arc<dyn PaymentWidget>>,
    /// Order creation in flight; blocks a second submission.
    placing: AtomicBool,
}

impl CheckoutFlow {
    /// Start a new checkout at the shipping step.
    #[must_use]
    pub fn new(
        api: Arc<dyn CommerceApi>,
        cart: CartCache,
        navigator: Arc<dyn Navigator>,
        config: CheckoutConfig,
    ) -> Self {
        Self {
            api,
            cart,
            navigator,
            config,
            step: CheckoutStep::Shipping,
            shipping: ShippingInfo::default(),
            payment_method: PaymentMethod::Card,
            widget: None,
            placing: AtomicBool::new(false),
        }
    }

    /// The current wizard step.
    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    /// The selected payment method.
    #[must_use]
    pub const fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Validate the shipping form and advance to payment-method selection.
    pub fn submit_shipping(&mut self, shipping: ShippingInfo) -> Result<()> {
        if self.step != CheckoutStep::Shipping {
            return Err(StorefrontError::Validation(
                "shipping is already submitted".to_string(),
            ));
        }
        shipping.validate()?;
        self.shipping = shipping;
        self.step = CheckoutStep::PaymentMethod;
        Ok(())
    }

    /// Record the payment method and advance to review. No validation
    /// beyond the selection itself.
    pub fn select_payment_method(&mut self, method: PaymentMethod) -> Result<()> {
        if self.step != CheckoutStep::PaymentMethod {
            return Err(StorefrontError::Validation(
                "payment method is not the current step".to_string(),
            ));
        }
        self.payment_method = method;
        self.step = CheckoutStep::Review;
        Ok(())
    }

    /// Step back one screen.
    pub fn back(&mut self) {
        self.step = match self.step {
            CheckoutStep::Shipping | CheckoutStep::PaymentMethod => CheckoutStep::Shipping,
            CheckoutStep::Review => CheckoutStep::PaymentMethod,
        };
    }

    /// Attach the initialized payment widget, configuring it with the
    /// current order total.
    ///
    /// The host calls this once the widget has rendered on the review step.
    /// Card orders placed before this succeeds fail with `widget not ready`.
    pub async fn attach_widget(&mut self, widget: Arc<dyn PaymentWidget>) -> Result<()> {
        let amount = self.widget_amount().await?;
        widget.set_amount(amount).await?;
        self.widget = Some(widget);
        Ok(())
    }

    /// Order total as the widget sees it: subtotal plus the flat shipping
    /// fee, rounded down to a whole currency unit.
    async fn widget_amount(&self) -> Result<WidgetAmount> {
        let snapshot = self.cart.snapshot().await;
        let shipping = if snapshot.subtotal.is_zero() {
            Decimal::ZERO
        } else {
            self.config.shipping_fee
        };
        let total = Money::new(snapshot.subtotal.amount + shipping, self.config.currency);
        let value = total
            .whole_units()
            .ok_or_else(|| StorefrontError::Validation("order total out of range".to_string()))?;
        Ok(WidgetAmount {
            currency: self.config.currency,
            value,
        })
    }

    /// Create the order and start payment.
    ///
    /// Strictly sequential: the order-creation call must complete and yield
    /// an id before the payment request is issued. A second call while one
    /// is in flight fails fast with no side effects.
    #[instrument(skip_all, fields(method = %self.payment_method))]
    pub async fn place_order(&self) -> Result<CheckoutOutcome> {
        if self.placing.swap(true, Ordering::SeqCst) {
            return Err(StorefrontError::OrderInFlight);
        }
        let result = self.place_order_inner().await;
        self.placing.store(false, Ordering::SeqCst);
        result
    }

    async fn place_order_inner(&self) -> Result<CheckoutOutcome> {
        if self.step != CheckoutStep::Review {
            return Err(StorefrontError::Validation(
                "checkout is not at the review step".to_string(),
            ));
        }

        let snapshot = self.cart.snapshot().await;
        if snapshot.is_empty() {
            return Err(StorefrontError::EmptyCart);
        }

        // Items are deliberately absent: the server derives them from its
        // own cart state for this session.
        let request = CreateOrderRequest {
            shipping_name: self.shipping.full_name(),
            shipping_phone: self.shipping.phone.clone(),
            shipping_address1: self.shipping.address.clone(),
            shipping_address2: self.shipping.address2.clone(),
            shipping_city: self.shipping.city.clone(),
            shipping_zip: self.shipping.postal_code.clone(),
            shipping_country: self.shipping.country.clone(),
            payment_method: self.payment_method,
            notes: String::new(),
        };
        let order_id = self.api.create_order(&request).await?;
        info!(%order_id, "order created");

        match self.payment_method {
            PaymentMethod::Card => self.request_card_payment(&order_id, &snapshot).await,
            PaymentMethod::BankTransfer => self.settle_bank_transfer(order_id).await,
        }
    }

    /// Hand the order to the hosted widget. On success the browser
    /// navigates to the payment page and nothing after the call runs.
    async fn request_card_payment(
        &self,
        order_id: &OrderId,
        snapshot: &CartSnapshot,
    ) -> Result<CheckoutOutcome> {
        let widget = self.widget.as_ref().ok_or(StorefrontError::WidgetNotReady)?;

        // The cart may have changed since the widget was attached; push the
        // fresh total so the charge matches the amount the success URL (and
        // the confirmation built from it) will carry.
        let amount = self.widget_amount().await?;
        widget.set_amount(amount).await?;

        let request = PaymentRequest {
            order_id: ExternalOrderRef::new(&self.config.order_prefix, order_id),
            order_name: format!(
                "{} order ({} items)",
                self.config.order_prefix,
                snapshot.line_count()
            ),
            success_url: self.success_url(order_id, amount.value)?,
            fail_url: self.page_url("/checkout/fail")?,
            customer_email: self.shipping.email.clone(),
            customer_name: self.shipping.full_name(),
            customer_mobile_phone: self.shipping.phone.clone(),
        };
        info!(order_ref = %request.order_id, amount = amount.value, "requesting widget payment");
        widget.request_payment(request).await?;

        Ok(CheckoutOutcome::RedirectingToPayment {
            order_id: order_id.clone(),
        })
    }

    /// Bank transfers settle immediately: clear the cart and move the user
    /// to their order history after a short grace period.
    async fn settle_bank_transfer(&self, order_id: OrderId) -> Result<CheckoutOutcome> {
        info!(%order_id, "bank transfer order settled");
        self.cart.clear().await?;
        tokio::time::sleep(BANK_TRANSFER_GRACE).await;
        self.navigator.navigate(Page::OrderHistory);
        Ok(CheckoutOutcome::Completed { order_id })
    }

    /// Redirect target carrying the amount and internal order id back to
    /// the confirmation handler.
    fn success_url(&self, order_id: &OrderId, amount: i64) -> Result<Url> {
        let mut url = self.page_url("/checkout/success")?;
        url.query_pairs_mut()
            .append_pair("amount", &amount.to_string())
            .append_pair("orderId", order_id.as_str());
        Ok(url)
    }

    fn page_url(&self, path: &str) -> Result<Url> {
        self.config
            .base_url
            .join(path)
            .map_err(|e| StorefrontError::Validation(format!("invalid redirect URL: {e}")))
    }
}
