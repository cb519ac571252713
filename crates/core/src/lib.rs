//! Bloom Core - Shopping domain library.
//!
//! This crate holds the storefront's business core:
//! - [`cart`] - The session-scoped cart store and its total
//! - [`checkout`] - The checkout step machine and its form data
//! - [`order`] - Order totals, submissions and confirmations
//! - [`confetti`] - The one-shot celebration burst shown on order completion
//! - [`types`] - Newtype IDs and prices
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP, no
//! session storage. The storefront binary owns persistence and transport and
//! drives these types from its request handlers.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod confetti;
pub mod order;
pub mod types;

pub use cart::{Cart, CartItem, QuantityChange};
pub use checkout::{
    CheckoutState, CheckoutStep, FormUpdate, PaymentMethod, ShippingDetails, StepProgress,
    Transition,
};
pub use confetti::{ConfettiBurst, Particle};
pub use order::{OrderConfirmation, OrderSubmission, OrderTotals};
pub use types::*;
