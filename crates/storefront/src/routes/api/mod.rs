//! JSON API routes.

pub mod arrangements;
