//! Session-scoped shopping cart.
//!
//! A [`Cart`] is an owned value: the storefront loads it from the shopper's
//! session, mutates it through the named operations below, and stores it
//! back. There is no global cart and no durable storage.
//!
//! # Invariants
//!
//! - Item ids are unique within a cart. Adding an id that is already present
//!   merges into the existing line.
//! - Every line has a quantity of at least one. Setting a quantity of zero
//!   removes the line.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// A single line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Catalog identifier; the identity of the line.
    pub id: ProductId,
    /// Display name at the time the item was added.
    pub name: String,
    /// Unit price at the time the item was added.
    pub price: Price,
    /// Image URL.
    pub image: String,
    /// Number of units, always at least one.
    pub quantity: u32,
}

impl CartItem {
    /// Create a cart line. A quantity of zero is raised to one.
    #[must_use]
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Price,
        image: impl Into<String>,
        quantity: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            image: image.into(),
            quantity: quantity.max(1),
        }
    }

    /// Price of this line (`price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Outcome of [`Cart::update_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// The line now has the given quantity.
    Updated(u32),
    /// The quantity was zero, so the line was removed.
    Removed,
    /// No line with that id exists; nothing changed.
    NotFound,
}

/// The shopper's cart, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// All lines, in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Look up a line by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines (the header badge count).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |count, item| count.saturating_add(item.quantity))
    }

    /// Add an item to the cart.
    ///
    /// If a line with the same id already exists, the incoming quantity is
    /// added to it and the existing name, price and image are kept.
    /// Otherwise the item is appended as a new line.
    pub fn add_item(&mut self, item: CartItem) {
        let quantity = item.quantity.max(1);
        match self.items.iter_mut().find(|line| line.id == item.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.items.push(CartItem { quantity, ..item }),
        }
    }

    /// Remove the line with the given id. Returns the removed line, or `None`
    /// if the id was not in the cart (in which case nothing changes).
    pub fn remove_item(&mut self, id: &ProductId) -> Option<CartItem> {
        let index = self.items.iter().position(|item| &item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Set the quantity of a line. Zero removes the line.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: u32) -> QuantityChange {
        if quantity == 0 {
            return match self.remove_item(id) {
                Some(_) => QuantityChange::Removed,
                None => QuantityChange::NotFound,
            };
        }

        match self.items.iter_mut().find(|item| &item.id == id) {
            Some(item) => {
                item.quantity = quantity;
                QuantityChange::Updated(quantity)
            }
            None => QuantityChange::NotFound,
        }
    }

    /// Sum of `price * quantity` over all lines. Recomputed on every call.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: &str, cents: u32, quantity: u32) -> CartItem {
        CartItem::new(
            id,
            format!("Arrangement {id}"),
            Price::from_cents(cents),
            format!("/static/images/{id}.jpg"),
            quantity,
        )
    }

    #[test]
    fn test_total_of_two_lines() {
        let mut cart = Cart::new();
        cart.add_item(item("a", 1000, 2));
        cart.add_item(item("b", 500, 1));

        assert_eq!(cart.total(), Price::from_cents(2500));
        assert_eq!(cart.total().to_string(), "$25.00");
    }

    #[test]
    fn test_total_matches_sum_for_distinct_ids() {
        let lines = [
            ("rose", 8999, 1),
            ("tulip", 12_999, 3),
            ("orchid", 0, 7),
            ("lily", 1, 40),
        ];

        let mut cart = Cart::new();
        for (id, cents, quantity) in lines {
            cart.add_item(item(id, cents, quantity));
        }

        let expected: u32 = lines.iter().map(|(_, cents, qty)| cents * qty).sum();
        assert_eq!(cart.total(), Price::from_cents(expected));
        assert_eq!(cart.len(), 4);
    }

    #[test]
    fn test_total_is_pure() {
        let mut cart = Cart::new();
        cart.add_item(item("a", 1234, 3));

        let first = cart.total();
        let second = cart.total();
        assert_eq!(first, second);
        assert_eq!(cart.get(&ProductId::new("a")).unwrap().quantity, 3);
    }

    #[test]
    fn test_empty_cart_total_is_zero() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_duplicate_add_merges_quantity() {
        let mut cart = Cart::new();
        cart.add_item(item("a", 1000, 2));
        cart.add_item(CartItem::new(
            "a",
            "Renamed",
            Price::from_cents(1),
            "/other.jpg",
            3,
        ));

        assert_eq!(cart.len(), 1);
        let line = cart.get(&ProductId::new("a")).unwrap();
        assert_eq!(line.quantity, 5);
        assert_eq!(line.name, "Arrangement a");
        assert_eq!(line.price, Price::from_cents(1000));
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let mut cart = Cart::new();
        cart.add_item(item("b", 100, 1));
        cart.add_item(item("a", 100, 1));
        cart.add_item(item("b", 100, 1));

        let ids: Vec<&str> = cart.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn test_zero_quantity_add_counts_as_one() {
        let mut cart = Cart::new();
        cart.add_item(CartItem {
            quantity: 0,
            ..item("a", 100, 1)
        });

        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_add_saturates_quantity() {
        let mut cart = Cart::new();
        cart.add_item(item("a", 1, u32::MAX));
        cart.add_item(item("a", 1, 5));

        assert_eq!(cart.item_count(), u32::MAX);
    }

    #[test]
    fn test_remove_missing_id_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(item("a", 1000, 2));
        let before = cart.clone();

        assert!(cart.remove_item(&ProductId::new("missing")).is_none());
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_existing_id() {
        let mut cart = Cart::new();
        cart.add_item(item("a", 1000, 2));
        cart.add_item(item("b", 500, 1));

        let removed = cart.remove_item(&ProductId::new("a")).unwrap();
        assert_eq!(removed.quantity, 2);
        assert_eq!(cart.total(), Price::from_cents(500));
    }

    #[test]
    fn test_update_quantity_sets_value() {
        let mut cart = Cart::new();
        cart.add_item(item("a", 1000, 2));

        let change = cart.update_quantity(&ProductId::new("a"), 7);
        assert_eq!(change, QuantityChange::Updated(7));
        assert_eq!(cart.item_count(), 7);
        assert_eq!(cart.total(), Price::from_cents(7000));
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let mut cart = Cart::new();
        cart.add_item(item("a", 1000, 1));

        let change = cart.update_quantity(&ProductId::new("a"), 0);
        assert_eq!(change, QuantityChange::Removed);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_missing_id() {
        let mut cart = Cart::new();
        cart.add_item(item("a", 1000, 1));
        let before = cart.clone();

        assert_eq!(
            cart.update_quantity(&ProductId::new("b"), 3),
            QuantityChange::NotFound
        );
        assert_eq!(
            cart.update_quantity(&ProductId::new("b"), 0),
            QuantityChange::NotFound
        );
        assert_eq!(cart, before);
    }

    #[test]
    fn test_clear_empties_cart() {
        let mut cart = Cart::new();
        cart.add_item(item("a", 1000, 1));
        cart.add_item(item("b", 1000, 1));

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), Price::ZERO);
    }

    #[test]
    fn test_cart_round_trips_through_session_json() {
        let mut cart = Cart::new();
        cart.add_item(item("a", 8999, 2));

        let json = serde_json::to_value(&cart).unwrap();
        let back: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(back, cart);
    }
}
