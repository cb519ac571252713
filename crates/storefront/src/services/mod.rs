//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `orders` - Order placement boundary (`OrderGateway`)
//! - `celebration` - One-shot confetti when an order is placed

pub mod celebration;
pub mod orders;

pub use celebration::{Celebration, ConfettiCelebration};
pub use orders::{LocalOrderGateway, OrderError, OrderGateway};
