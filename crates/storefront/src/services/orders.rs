//! Order placement.
//!
//! Checkout hands a finished [`OrderSubmission`] to an [`OrderGateway`] and
//! only moves to the confirmation page once the gateway accepts it.

use async_trait::async_trait;
use bloom_core::{OrderConfirmation, OrderNumber, OrderSubmission};
use chrono::Utc;
use thiserror::Error;
use tracing::instrument;

/// Errors that can occur when placing an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The backing service refused the order.
    #[error("Order rejected: {0}")]
    Rejected(String),

    /// The backing service could not be reached.
    #[error("Order service unavailable: {0}")]
    Unavailable(String),
}

/// Accepts orders and returns their confirmation.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Place an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order could not be placed. The shopper stays
    /// on the review step.
    async fn submit_order(&self, order: OrderSubmission)
    -> Result<OrderConfirmation, OrderError>;
}

/// Gateway that confirms orders in-process.
///
/// No payment is taken. Every order is accepted under a freshly generated
/// order number.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalOrderGateway;

#[async_trait]
impl OrderGateway for LocalOrderGateway {
    #[instrument(skip_all, fields(items = order.items.len(), total = %order.totals.total))]
    async fn submit_order(
        &self,
        order: OrderSubmission,
    ) -> Result<OrderConfirmation, OrderError> {
        let confirmation = OrderConfirmation::new(OrderNumber::generate(), Utc::now(), order);

        tracing::info!(
            order_number = %confirmation.order_number,
            payment_method = ?confirmation.payment_method,
            "Order placed"
        );

        Ok(confirmation)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bloom_core::{Cart, CartItem, PaymentMethod, Price, ShippingDetails};

    use super::*;

    #[tokio::test]
    async fn test_local_gateway_confirms_order() {
        let mut cart = Cart::new();
        cart.add_item(CartItem::new("1", "Peony", Price::from_cents(8999), "/p.jpg", 1));
        let order = OrderSubmission::new(&cart, &ShippingDetails::default(), Some(PaymentMethod::Card));

        let confirmation = LocalOrderGateway.submit_order(order).await.unwrap();

        assert!(confirmation.order_number.as_str().starts_with(OrderNumber::PREFIX));
        assert_eq!(confirmation.items.len(), 1);
        assert_eq!(confirmation.totals.total.to_string(), "$98.99");
    }

    #[tokio::test]
    async fn test_local_gateway_assigns_unique_numbers() {
        let order = OrderSubmission::new(&Cart::new(), &ShippingDetails::default(), None);
        let first = LocalOrderGateway.submit_order(order.clone()).await.unwrap();
        let second = LocalOrderGateway.submit_order(order).await.unwrap();
        assert_ne!(first.order_number, second.order_number);
    }
}
