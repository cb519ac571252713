//! Checkout route handlers.
//!
//! Each step is a plain form that posts back to `/checkout`. The posted
//! fields are merged into the session's checkout state and the flow moves
//! one step forward. Submitting the review step places the order through
//! the configured gateway before the flow completes.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use bloom_core::{
    CheckoutState, CheckoutStep, FormUpdate, OrderConfirmation, OrderSubmission, PaymentMethod,
    ShippingDetails, Transition,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::CspNonce;
use crate::models::LastOrder;
use crate::models::session::{
    clear_checkout, load_cart, load_checkout, load_last_order, save_cart, save_checkout,
    save_last_order,
};
use crate::routes::cart::{CartItemView, CartView};
use crate::state::AppState;

/// Checkout form data. Every field is optional; absent fields keep their
/// stored value.
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutForm {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    pub payment_method: Option<String>,
}

impl TryFrom<CheckoutForm> for FormUpdate {
    type Error = AppError;

    fn try_from(form: CheckoutForm) -> Result<Self> {
        let payment_method = form
            .payment_method
            .filter(|m| !m.is_empty())
            .map(|m| m.parse::<PaymentMethod>())
            .transpose()
            .map_err(AppError::BadRequest)?;

        Ok(Self {
            email: form.email,
            first_name: form.first_name,
            last_name: form.last_name,
            address: form.address,
            city: form.city,
            zip: form.zip,
            country: form.country,
            payment_method,
        })
    }
}

/// Progress indicator entry.
#[derive(Clone)]
pub struct StepView {
    pub number: usize,
    pub label: &'static str,
    pub completed: bool,
    pub active: bool,
}

/// Payment choice display data.
#[derive(Clone)]
pub struct PaymentOptionView {
    pub value: String,
    pub label: &'static str,
    pub selected: bool,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    /// Current step slug (`shipping`, `payment` or `review`).
    pub step: String,
    pub step_label: &'static str,
    pub submit_label: &'static str,
    pub steps: Vec<StepView>,
    pub shipping: ShippingDetails,
    pub full_name: String,
    pub payment_options: Vec<PaymentOptionView>,
    pub payment_label: Option<&'static str>,
    pub cart: CartView,
    pub nonce: String,
}

/// Order confirmation display data.
#[derive(Clone)]
pub struct ConfirmationView {
    pub order_number: String,
    pub placed_at: String,
    pub items: Vec<CartItemView>,
    pub full_name: String,
    pub email: String,
    pub address: String,
    pub payment_label: Option<&'static str>,
    pub subtotal: String,
    pub tax: String,
    pub total: String,
    pub estimated_delivery: String,
}

impl From<&OrderConfirmation> for ConfirmationView {
    fn from(order: &OrderConfirmation) -> Self {
        let shipping = &order.shipping;
        let address = [
            shipping.address.as_str(),
            shipping.city.as_str(),
            shipping.zip.as_str(),
            shipping.country.as_str(),
        ]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

        Self {
            order_number: order.order_number.to_string(),
            placed_at: order.placed_at.format("%B %-d, %Y at %H:%M UTC").to_string(),
            items: order.items.iter().map(CartItemView::from).collect(),
            full_name: shipping.full_name(),
            email: shipping.email.clone(),
            address,
            payment_label: order.payment_method.map(PaymentMethod::label),
            subtotal: order.totals.subtotal.to_string(),
            tax: order.totals.tax.to_string(),
            total: order.totals.total.to_string(),
            estimated_delivery: order.estimated_delivery.clone(),
        }
    }
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/complete.html")]
pub struct CompleteTemplate {
    pub order: ConfirmationView,
    /// Confetti particles as JSON, present only on the first view.
    pub confetti: Option<String>,
    pub nonce: String,
}

fn checkout_template(checkout: &CheckoutState, cart: CartView, nonce: String) -> CheckoutTemplate {
    let step = checkout.step();
    let shipping = checkout.shipping().clone();

    CheckoutTemplate {
        step: step.to_string(),
        step_label: step.label(),
        submit_label: step.submit_label(),
        steps: checkout
            .progress()
            .into_iter()
            .map(|p| StepView {
                number: p.number,
                label: p.step.label(),
                completed: p.completed,
                active: p.active,
            })
            .collect(),
        full_name: shipping.full_name(),
        shipping,
        payment_options: PaymentMethod::ALL
            .into_iter()
            .map(|method| PaymentOptionView {
                value: method.to_string(),
                label: method.label(),
                selected: checkout.payment_method() == Some(method),
            })
            .collect(),
        payment_label: checkout.payment_method().map(PaymentMethod::label),
        cart,
        nonce,
    }
}

/// Display the current checkout step.
///
/// An empty cart has nothing to check out and is sent back to `/cart`.
#[instrument(skip(session, nonce))]
pub async fn show(session: Session, CspNonce(nonce): CspNonce) -> Result<Response> {
    let cart = load_cart(&session).await?;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let checkout = load_checkout(&session).await?;

    Ok(checkout_template(&checkout, CartView::from(&cart), nonce).into_response())
}

/// Submit the current checkout step.
///
/// Shipping and payment advance immediately. Review places the order; if
/// the gateway fails, the checkout stays on review and the error is shown.
#[instrument(skip(state, session))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let mut cart = load_cart(&session).await?;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let mut checkout = load_checkout(&session).await?;
    checkout.apply(FormUpdate::try_from(form)?);

    if checkout.step() != CheckoutStep::Review {
        match checkout.submit() {
            Transition::Advanced { from, to } => {
                tracing::debug!(%from, %to, "Checkout advanced");
                add_breadcrumb("checkout", "Checkout advanced", Some(&[("step", to.label())]));
            }
            Transition::Completed | Transition::Unchanged => {}
        }
        save_checkout(&session, &checkout).await?;
        return Ok(Redirect::to("/checkout").into_response());
    }

    // Keep the review form data even if placing the order fails
    save_checkout(&session, &checkout).await?;

    let submission = OrderSubmission::new(&cart, checkout.shipping(), checkout.payment_method());
    let confirmation = state.orders().submit_order(submission).await?;

    let transition = checkout.submit();
    tracing::info!(
        order_number = %confirmation.order_number,
        ?transition,
        order_complete = checkout.order_complete(),
        "Checkout complete"
    );
    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("order_number", confirmation.order_number.as_str())]),
    );

    save_last_order(&session, &LastOrder::new(confirmation)).await?;
    cart.clear();
    save_cart(&session, &cart).await?;
    clear_checkout(&session).await?;

    Ok(Redirect::to("/checkout/complete").into_response())
}

/// Display the order confirmation.
///
/// The celebration runs on the first view only; reloading shows the
/// confirmation without confetti.
#[instrument(skip(state, session, nonce))]
pub async fn complete(
    State(state): State<AppState>,
    session: Session,
    CspNonce(nonce): CspNonce,
) -> Result<Response> {
    let Some(mut last_order) = load_last_order(&session).await? else {
        return Ok(Redirect::to("/").into_response());
    };

    let confetti = if last_order.take_celebration() {
        save_last_order(&session, &last_order).await?;
        let burst = state.celebration().celebrate();
        let json = serde_json::to_string(burst.particles())
            .map_err(|e| AppError::Internal(format!("failed to encode confetti: {e}")))?;
        Some(json)
    } else {
        None
    };

    Ok(CompleteTemplate {
        order: ConfirmationView::from(&last_order.confirmation),
        confetti,
        nonce,
    }
    .into_response())
}
