//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart itself lives in the session. Plain form posts (no JavaScript)
//! are redirected back to the cart page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use bloom_core::{Cart, CartItem, OrderTotals, ProductId, QuantityChange};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::CspNonce;
use crate::models::session::{load_cart, save_cart};
use crate::state::AppState;

/// Largest quantity a single cart line may hold.
pub const MAX_LINE_QUANTITY: u32 = 99;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    /// Quantity posted by the decrease button (0 removes the line).
    pub decrease_to: u32,
    /// Quantity posted by the increase button, capped at [`MAX_LINE_QUANTITY`].
    pub increase_to: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub tax: String,
    pub total: String,
    pub item_count: u32,
}

impl CartView {
    /// Whether there is nothing in the cart.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let totals = OrderTotals::for_cart(cart);
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            subtotal: totals.subtotal.to_string(),
            tax: totals.tax.to_string(),
            total: totals.total.to_string(),
            item_count: cart.item_count(),
        }
    }
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            image: item.image.clone(),
            quantity: item.quantity,
            decrease_to: item.quantity.saturating_sub(1),
            increase_to: item.quantity.saturating_add(1).min(MAX_LINE_QUANTITY),
            price: item.price.to_string(),
            line_price: item.line_total().to_string(),
        }
    }
}

/// Add an item, keeping the merged line within [`MAX_LINE_QUANTITY`].
fn add_capped(cart: &mut Cart, item: CartItem) {
    let id = item.id.clone();
    cart.add_item(item);
    if cart
        .get(&id)
        .is_some_and(|line| line.quantity > MAX_LINE_QUANTITY)
    {
        cart.update_quantity(&id, MAX_LINE_QUANTITY);
    }
}

/// Clamp a submitted quantity into `0..=MAX_LINE_QUANTITY`.
fn clamp_quantity(quantity: i64) -> u32 {
    u32::try_from(quantity.clamp(0, i64::from(MAX_LINE_QUANTITY))).unwrap_or(MAX_LINE_QUANTITY)
}

/// Whether the request was issued by HTMX.
pub(crate) fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("hx-request")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "true")
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub quantity: Option<u32>,
}

/// Update cart form data.
///
/// Signed so that a quantity stepped below one from the form removes the line.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub nonce: String,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Respond to a cart mutation: a fragment for HTMX, a redirect otherwise.
fn mutation_response(headers: &HeaderMap, fragment: impl IntoResponse) -> Response {
    if is_htmx(headers) {
        (AppendHeaders([("HX-Trigger", "cart-updated")]), fragment).into_response()
    } else {
        Redirect::to("/cart").into_response()
    }
}

/// Display cart page.
#[instrument(skip(session, nonce))]
pub async fn show(session: Session, CspNonce(nonce): CspNonce) -> Result<impl IntoResponse> {
    let cart = load_cart(&session).await?;

    Ok(CartShowTemplate {
        cart: CartView::from(&cart),
        nonce,
    })
}

/// Add item to cart.
///
/// Name, price and image come from the catalog. Returns the updated count
/// badge with an HTMX trigger so other cart widgets refresh.
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let arrangement = state
        .catalog()
        .get(&form.product_id)
        .ok_or_else(|| AppError::NotFound(format!("arrangement {}", form.product_id)))?;
    let quantity = form.quantity.unwrap_or(1).min(MAX_LINE_QUANTITY);

    let mut cart = load_cart(&session).await?;
    add_capped(&mut cart, arrangement.to_cart_item(quantity));
    save_cart(&session, &cart).await?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        Some(&[("product_id", form.product_id.as_str())]),
    );
    tracing::info!(product_id = %form.product_id, quantity, "Added to cart");

    Ok(mutation_response(
        &headers,
        CartCountTemplate {
            count: cart.item_count(),
        },
    ))
}

/// Update cart item quantity. Zero or less removes the item; values above
/// [`MAX_LINE_QUANTITY`] are capped.
#[instrument(skip(session, headers))]
pub async fn update(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let id = ProductId::new(form.product_id);
    let quantity = clamp_quantity(form.quantity);

    let mut cart = load_cart(&session).await?;
    let change = cart.update_quantity(&id, quantity);
    if change != QuantityChange::NotFound {
        save_cart(&session, &cart).await?;
    }
    tracing::debug!(product_id = %id, ?change, "Updated cart quantity");

    Ok(mutation_response(
        &headers,
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    ))
}

/// Remove item from cart.
#[instrument(skip(session, headers))]
pub async fn remove(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let id = ProductId::new(form.product_id);

    let mut cart = load_cart(&session).await?;
    if cart.remove_item(&id).is_some() {
        save_cart(&session, &cart).await?;
        tracing::debug!(product_id = %id, "Removed from cart");
    }

    Ok(mutation_response(
        &headers,
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    ))
}

/// Empty the cart.
#[instrument(skip(session, headers))]
pub async fn clear(session: Session, headers: HeaderMap) -> Result<Response> {
    let mut cart = load_cart(&session).await?;
    cart.clear();
    save_cart(&session, &cart).await?;

    Ok(mutation_response(
        &headers,
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    ))
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> Result<impl IntoResponse> {
    let cart = load_cart(&session).await?;

    Ok(CartCountTemplate {
        count: cart.item_count(),
    })
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use bloom_core::Price;

    use super::*;

    #[test]
    fn test_cart_view_totals() {
        let mut cart = Cart::new();
        cart.add_item(CartItem::new("a", "A", Price::from_cents(1000), "/a.jpg", 2));
        cart.add_item(CartItem::new("b", "B", Price::from_cents(500), "/b.jpg", 1));

        let view = CartView::from(&cart);

        assert_eq!(view.item_count, 3);
        assert_eq!(view.subtotal, "$25.00");
        assert_eq!(view.tax, "$2.50");
        assert_eq!(view.total, "$27.50");
        assert_eq!(view.items.first().map(|i| i.line_price.as_str()), Some("$20.00"));
    }

    #[test]
    fn test_item_view_steps_stay_in_range() {
        let item = CartItem::new("a", "A", Price::from_cents(100), "/a.jpg", u32::MAX);
        let view = CartItemView::from(&item);
        assert_eq!(view.increase_to, MAX_LINE_QUANTITY);
        assert_eq!(view.decrease_to, u32::MAX - 1);

        let item = CartItem::new("a", "A", Price::from_cents(100), "/a.jpg", 1);
        let view = CartItemView::from(&item);
        assert_eq!(view.increase_to, 2);
        assert_eq!(view.decrease_to, 0);
    }

    #[test]
    fn test_add_capped_limits_merged_line() {
        let mut cart = Cart::new();
        add_capped(&mut cart, CartItem::new("a", "A", Price::from_cents(100), "/a.jpg", 60));
        add_capped(&mut cart, CartItem::new("a", "A", Price::from_cents(100), "/a.jpg", 60));

        assert_eq!(cart.item_count(), MAX_LINE_QUANTITY);
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_clamp_quantity() {
        assert_eq!(clamp_quantity(-3), 0);
        assert_eq!(clamp_quantity(0), 0);
        assert_eq!(clamp_quantity(5), 5);
        assert_eq!(clamp_quantity(4_294_967_295), MAX_LINE_QUANTITY);
        assert_eq!(clamp_quantity(i64::MAX), MAX_LINE_QUANTITY);
    }

    #[test]
    fn test_is_htmx() {
        let mut headers = HeaderMap::new();
        assert!(!is_htmx(&headers));

        headers.insert("hx-request", HeaderValue::from_static("true"));
        assert!(is_htmx(&headers));
    }
}
