//! Session-related types.
//!
//! The cart, the checkout in progress and the last placed order live in the
//! shopper's session. Nothing is persisted beyond it.

use bloom_core::{Cart, CheckoutState, OrderConfirmation};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

/// The most recently placed order, shown on the confirmation page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LastOrder {
    pub confirmation: OrderConfirmation,
    /// Set when the order is placed; cleared once the confetti has been shown.
    pub celebrate_pending: bool,
}

impl LastOrder {
    /// A freshly placed order, still waiting for its celebration.
    #[must_use]
    pub const fn new(confirmation: OrderConfirmation) -> Self {
        Self {
            confirmation,
            celebrate_pending: true,
        }
    }

    /// Whether to celebrate now. Returns `true` at most once.
    pub const fn take_celebration(&mut self) -> bool {
        let pending = self.celebrate_pending;
        self.celebrate_pending = false;
        pending
    }
}

/// Session keys.
pub mod keys {
    /// Key for the shopper's cart.
    pub const CART: &str = "cart";

    /// Key for the checkout in progress.
    pub const CHECKOUT: &str = "checkout";

    /// Key for the last placed order.
    pub const LAST_ORDER: &str = "last_order";
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the cart, or an empty one.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn load_cart(session: &Session) -> Result<Cart, tower_sessions::session::Error> {
    Ok(session.get::<Cart>(keys::CART).await?.unwrap_or_default())
}

/// Store the cart.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CART, cart).await
}

/// Load the checkout in progress, or start a new one.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn load_checkout(
    session: &Session,
) -> Result<CheckoutState, tower_sessions::session::Error> {
    Ok(session
        .get::<CheckoutState>(keys::CHECKOUT)
        .await?
        .unwrap_or_default())
}

/// Store the checkout in progress.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn save_checkout(
    session: &Session,
    checkout: &CheckoutState,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CHECKOUT, checkout).await
}

/// Discard the checkout in progress.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn clear_checkout(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<CheckoutState>(keys::CHECKOUT).await?;
    Ok(())
}

/// Load the last placed order.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn load_last_order(
    session: &Session,
) -> Result<Option<LastOrder>, tower_sessions::session::Error> {
    session.get::<LastOrder>(keys::LAST_ORDER).await
}

/// Store the last placed order.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn save_last_order(
    session: &Session,
    order: &LastOrder,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::LAST_ORDER, order).await
}
