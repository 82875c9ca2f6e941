//! Response-envelope normalization.
//!
//! The backend is inconsistent about how it wraps payloads: the same
//! endpoint may answer with `{ success, data: {...} }`, `{ data: {...} }`,
//! or the bare object, and ids appear as either `id` or `orderId`. All of
//! that tolerance lives here, at one boundary; the rest of the crate only
//! ever sees typed models.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde_json::Value;

use kitae_core::{CartItemId, Currency, Money, OrderId, ProductId, VariantId};

use crate::models::{CartItem, CartSnapshot, Order};

/// Peel `{ success, data }` / `{ data }` wrappers, including the doubled
/// nesting produced when a transport-level envelope wraps an API envelope.
pub(crate) fn unwrap_data(value: &Value) -> &Value {
    let mut current = value;
    while let Some(inner) = current.get("data") {
        if inner.is_object() || inner.is_array() {
            current = inner;
        } else {
            break;
        }
    }
    current
}

/// Extract the server-assigned order id from an order-creation response.
///
/// Accepts ids reachable via `data.id`, `data.orderId`, `id`, or `orderId`;
/// numeric ids are stringified. Returns `None` when no id is present, which
/// callers surface as a missing-order-id failure.
pub(crate) fn extract_order_id(value: &Value) -> Option<OrderId> {
    let payload = unwrap_data(value);
    for key in ["id", "orderId"] {
        match payload.get(key) {
            Some(Value::String(s)) if !s.is_empty() => return Some(OrderId::new(s)),
            Some(Value::Number(n)) => return Some(OrderId::new(n.to_string())),
            _ => {}
        }
    }
    None
}

/// Interpret a payment-confirmation response.
///
/// An explicit `success: false` is a provider refusal; anything else
/// (including the bare provider payload) counts as confirmed.
pub(crate) fn confirmation_result(value: &Value) -> Result<(), String> {
    if value.get("success").and_then(Value::as_bool) == Some(false) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("payment confirmation failed")
            .to_string();
        return Err(message);
    }
    Ok(())
}

/// Normalize a `GET /orders` response into order models.
///
/// The backend wraps the list as `{ success, data: { orders: [...] } }`;
/// a bare array is tolerated too.
pub(crate) fn parse_orders(value: &Value) -> serde_json::Result<Vec<Order>> {
    let payload = unwrap_data(value);
    let orders = payload.get("orders").unwrap_or(payload);
    serde_json::from_value(orders.clone())
}

/// Normalize a `GET /orders/:id` response into an order model.
pub(crate) fn parse_order(value: &Value) -> serde_json::Result<Order> {
    let payload = unwrap_data(value);
    let order = payload.get("order").unwrap_or(payload);
    serde_json::from_value(order.clone())
}

/// Normalize a `GET /cart` response into a [`CartSnapshot`].
///
/// The backend returns either a flat list of cart lines or per-product
/// groups each carrying a nested `items` array; both flatten to the same
/// snapshot. The server subtotal is trusted when present and recomputed
/// from the lines otherwise.
pub(crate) fn parse_cart(value: &Value, currency: Currency) -> CartSnapshot {
    let payload = unwrap_data(value);

    let mut items = Vec::new();
    if let Some(entries) = payload.get("items").and_then(Value::as_array) {
        for entry in entries {
            if let Some(lines) = entry.get("items").and_then(Value::as_array) {
                // Grouped shape: product info on the group, lines nested
                for line in lines {
                    if let Some(item) = parse_line(line, Some(entry)) {
                        items.push(item);
                    }
                }
            } else if let Some(item) = parse_line(entry, None) {
                items.push(item);
            }
        }
    }

    let subtotal = payload
        .get("subtotal")
        .and_then(as_decimal)
        .unwrap_or_else(|| items.iter().map(CartItem::line_total).sum());

    CartSnapshot {
        items,
        subtotal: Money::new(subtotal, currency),
    }
}

/// Normalize a single cart line, pulling product fields from the line, its
/// embedded variant, or the enclosing group - whichever the backend chose.
fn parse_line(line: &Value, group: Option<&Value>) -> Option<CartItem> {
    let id = string_field(line, "id")?;

    let variant = line.get("variant");
    let variant_product = variant.and_then(|v| v.get("product"));

    let product_id = string_field(line, "productId")
        .or_else(|| group.and_then(|g| string_field(g, "productId")))
        .or_else(|| variant_product.and_then(|p| string_field(p, "id")))?;

    let name = group
        .and_then(|g| g.get("product"))
        .and_then(|p| string_field(p, "name"))
        .or_else(|| variant_product.and_then(|p| string_field(p, "name")))
        .unwrap_or_default();

    let price = line
        .get("price")
        .and_then(as_decimal)
        .or_else(|| {
            group
                .and_then(|g| g.get("product"))
                .and_then(|p| p.get("price"))
                .and_then(as_decimal)
        })
        .or_else(|| {
            variant_product
                .and_then(|p| p.get("price"))
                .and_then(as_decimal)
        })
        .unwrap_or_default();

    let quantity = line
        .get("quantity")
        .and_then(Value::as_u64)
        .and_then(|q| u32::try_from(q).ok())
        .unwrap_or(1);

    Some(CartItem {
        id: CartItemId::new(id),
        product_id: ProductId::new(product_id),
        variant_id: string_field(line, "variantId").map(VariantId::new),
        name,
        price,
        quantity,
        size: variant.and_then(|v| string_field(v, "size")),
        color: variant.and_then(|v| string_field(v, "color")),
    })
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

/// Read a JSON number or numeric string as a decimal.
fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else {
                n.as_f64().and_then(Decimal::from_f64)
            }
        }
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}
