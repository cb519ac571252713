//! Order totals, submissions and confirmations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartItem};
use crate::checkout::{PaymentMethod, ShippingDetails};
use crate::types::{OrderNumber, Price};

/// Sales tax applied to the cart subtotal (10%).
pub const TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Delivery promise shown on product pages and the confirmation.
pub const ESTIMATED_DELIVERY: &str = "Tomorrow or Today";

/// Money breakdown of an order.
///
/// Shipping is always free; tax is [`TAX_RATE`] of the subtotal, rounded to
/// cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Price,
    pub shipping: Price,
    pub tax: Price,
    pub total: Price,
}

impl OrderTotals {
    /// Compute totals from a subtotal.
    #[must_use]
    pub fn from_subtotal(subtotal: Price) -> Self {
        let shipping = Price::ZERO;
        let tax = subtotal.scaled(TAX_RATE);
        Self {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }

    /// Compute totals for the current cart contents.
    #[must_use]
    pub fn for_cart(cart: &Cart) -> Self {
        Self::from_subtotal(cart.total())
    }

    /// Whether shipping costs nothing.
    #[must_use]
    pub fn free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }
}

/// Everything needed to place an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSubmission {
    pub items: Vec<CartItem>,
    pub shipping: ShippingDetails,
    pub payment_method: Option<PaymentMethod>,
    pub totals: OrderTotals,
}

impl OrderSubmission {
    /// Snapshot the cart and checkout details into a submission.
    #[must_use]
    pub fn new(
        cart: &Cart,
        shipping: &ShippingDetails,
        payment_method: Option<PaymentMethod>,
    ) -> Self {
        Self {
            items: cart.items().to_vec(),
            shipping: shipping.clone(),
            payment_method,
            totals: OrderTotals::for_cart(cart),
        }
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub order_number: OrderNumber,
    pub placed_at: DateTime<Utc>,
    pub items: Vec<CartItem>,
    pub shipping: ShippingDetails,
    pub payment_method: Option<PaymentMethod>,
    pub totals: OrderTotals,
    pub estimated_delivery: String,
}

impl OrderConfirmation {
    /// Confirm a submission under the given order number.
    #[must_use]
    pub fn new(order_number: OrderNumber, placed_at: DateTime<Utc>, order: OrderSubmission) -> Self {
        Self {
            order_number,
            placed_at,
            items: order.items,
            shipping: order.shipping,
            payment_method: order.payment_method,
            totals: order.totals,
            estimated_delivery: ESTIMATED_DELIVERY.to_string(),
        }
    }
}
