//! Checkout step machine.
//!
//! Checkout is a strictly linear flow:
//!
//! ```text
//! Shipping ──submit──▶ Payment ──submit──▶ Review ──submit──▶ Complete
//! ```
//!
//! There is no backward transition and `Complete` is terminal. Submitting
//! never depends on the form contents: empty fields still advance the flow.
//! The machine only reads the cart (for totals); it never writes to it.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// One stage of the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    #[default]
    Shipping,
    Payment,
    Review,
    Complete,
}

impl CheckoutStep {
    /// The steps shown in the progress indicator, in order.
    pub const VISIBLE: [Self; 3] = [Self::Shipping, Self::Payment, Self::Review];

    /// The step a submit moves to, or `None` from the terminal step.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Shipping => Some(Self::Payment),
            Self::Payment => Some(Self::Review),
            Self::Review => Some(Self::Complete),
            Self::Complete => None,
        }
    }

    /// Whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Zero-based position in the flow.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Shipping => 0,
            Self::Payment => 1,
            Self::Review => 2,
            Self::Complete => 3,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Shipping => "Shipping",
            Self::Payment => "Payment",
            Self::Review => "Review",
            Self::Complete => "Complete",
        }
    }

    /// Label of the submit button on this step.
    #[must_use]
    pub const fn submit_label(self) -> &'static str {
        match self {
            Self::Review => "Place Order",
            Self::Shipping | Self::Payment | Self::Complete => "Continue",
        }
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shipping => write!(f, "shipping"),
            Self::Payment => write!(f, "payment"),
            Self::Review => write!(f, "review"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

impl FromStr for CheckoutStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shipping" => Ok(Self::Shipping),
            "payment" => Ok(Self::Payment),
            "review" => Ok(Self::Review),
            "complete" => Ok(Self::Complete),
            _ => Err(format!("invalid checkout step: {s}")),
        }
    }
}

/// Payment choices offered on the payment step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    Paypal,
    ApplePay,
}

impl PaymentMethod {
    /// All methods, in display order.
    pub const ALL: [Self; 3] = [Self::Card, Self::Paypal, Self::ApplePay];

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Card => "Credit Card",
            Self::Paypal => "PayPal",
            Self::ApplePay => "Apple Pay",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Card => write!(f, "card"),
            Self::Paypal => write!(f, "paypal"),
            Self::ApplePay => write!(f, "apple_pay"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(Self::Card),
            "paypal" => Ok(Self::Paypal),
            "apple_pay" => Ok(Self::ApplePay),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

/// Shipping form data. No field is validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingDetails {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub zip: String,
    pub country: String,
}

impl ShippingDetails {
    /// First and last name joined, or an empty string.
    #[must_use]
    pub fn full_name(&self) -> String {
        [self.first_name.as_str(), self.last_name.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A partial form submission. `None` fields leave the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    pub payment_method: Option<PaymentMethod>,
}

/// Result of [`CheckoutState::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Moved forward to a non-terminal step.
    Advanced {
        from: CheckoutStep,
        to: CheckoutStep,
    },
    /// Moved from review to complete; the order is now complete.
    Completed,
    /// Already complete; nothing changed.
    Unchanged,
}

/// Checkout progress for one shopper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutState {
    step: CheckoutStep,
    shipping: ShippingDetails,
    payment_method: Option<PaymentMethod>,
    order_complete: bool,
}

impl CheckoutState {
    /// Start a new checkout at the shipping step.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current step.
    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    /// The shipping form data collected so far.
    #[must_use]
    pub const fn shipping(&self) -> &ShippingDetails {
        &self.shipping
    }

    /// The selected payment method, if any.
    #[must_use]
    pub const fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    /// Whether the order has been placed. True only in [`CheckoutStep::Complete`].
    #[must_use]
    pub const fn order_complete(&self) -> bool {
        self.order_complete
    }

    /// Merge submitted form fields into the state. Values are trimmed.
    ///
    /// Ignored once the checkout is complete.
    pub fn apply(&mut self, update: FormUpdate) {
        if self.step.is_terminal() {
            return;
        }

        let fields = [
            (&mut self.shipping.email, update.email),
            (&mut self.shipping.first_name, update.first_name),
            (&mut self.shipping.last_name, update.last_name),
            (&mut self.shipping.address, update.address),
            (&mut self.shipping.city, update.city),
            (&mut self.shipping.zip, update.zip),
            (&mut self.shipping.country, update.country),
        ];
        for (slot, value) in fields {
            if let Some(value) = value {
                value.trim().clone_into(slot);
            }
        }

        if update.payment_method.is_some() {
            self.payment_method = update.payment_method;
        }
    }

    /// Advance one step.
    pub fn submit(&mut self) -> Transition {
        let from = self.step;
        match from.next() {
            Some(CheckoutStep::Complete) => {
                self.step = CheckoutStep::Complete;
                self.order_complete = true;
                Transition::Completed
            }
            Some(to) => {
                self.step = to;
                Transition::Advanced { from, to }
            }
            None => Transition::Unchanged,
        }
    }

    /// Progress indicator entries for the visible steps.
    #[must_use]
    pub fn progress(&self) -> Vec<StepProgress> {
        CheckoutStep::VISIBLE
            .into_iter()
            .map(|step| StepProgress {
                step,
                number: step.index() + 1,
                completed: self.step.index() > step.index(),
                active: self.step == step,
            })
            .collect()
    }
}

/// One entry of the progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepProgress {
    pub step: CheckoutStep,
    /// One-based number shown in the step circle.
    pub number: usize,
    pub completed: bool,
    pub active: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_shipping() {
        let state = CheckoutState::new();
        assert_eq!(state.step(), CheckoutStep::Shipping);
        assert!(!state.order_complete());
        assert!(state.payment_method().is_none());
    }

    #[test]
    fn test_three_submits_reach_complete() {
        let mut state = CheckoutState::new();

        assert_eq!(
            state.submit(),
            Transition::Advanced {
                from: CheckoutStep::Shipping,
                to: CheckoutStep::Payment
            }
        );
        assert_eq!(state.step(), CheckoutStep::Payment);
        assert!(!state.order_complete());

        assert_eq!(
            state.submit(),
            Transition::Advanced {
                from: CheckoutStep::Payment,
                to: CheckoutStep::Review
            }
        );
        assert_eq!(state.step(), CheckoutStep::Review);
        assert!(!state.order_complete());

        assert_eq!(state.submit(), Transition::Completed);
        assert_eq!(state.step(), CheckoutStep::Complete);
        assert!(state.order_complete());
    }

    #[test]
    fn test_complete_is_terminal() {
        let mut state = CheckoutState::new();
        for _ in 0..3 {
            state.submit();
        }
        let before = state.clone();

        assert_eq!(state.submit(), Transition::Unchanged);
        assert_eq!(state.submit(), Transition::Unchanged);
        assert_eq!(state, before);
    }

    #[test]
    fn test_submit_with_empty_form_still_advances() {
        let mut state = CheckoutState::new();
        state.apply(FormUpdate::default());
        state.submit();

        assert_eq!(state.step(), CheckoutStep::Payment);
        assert_eq!(state.shipping(), &ShippingDetails::default());
    }

    #[test]
    fn test_apply_merges_present_fields() {
        let mut state = CheckoutState::new();
        state.apply(FormUpdate {
            email: Some("  fern@example.com ".to_string()),
            first_name: Some("Fern".to_string()),
            city: Some("Paris".to_string()),
            ..FormUpdate::default()
        });
        state.apply(FormUpdate {
            last_name: Some("Gully".to_string()),
            ..FormUpdate::default()
        });

        let shipping = state.shipping();
        assert_eq!(shipping.email, "fern@example.com");
        assert_eq!(shipping.full_name(), "Fern Gully");
        assert_eq!(shipping.city, "Paris");
        assert!(shipping.zip.is_empty());
    }

    #[test]
    fn test_apply_keeps_payment_method_when_absent() {
        let mut state = CheckoutState::new();
        state.apply(FormUpdate {
            payment_method: Some(PaymentMethod::ApplePay),
            ..FormUpdate::default()
        });
        state.apply(FormUpdate::default());

        assert_eq!(state.payment_method(), Some(PaymentMethod::ApplePay));
    }

    #[test]
    fn test_apply_ignored_after_completion() {
        let mut state = CheckoutState::new();
        for _ in 0..3 {
            state.submit();
        }
        state.apply(FormUpdate {
            email: Some("late@example.com".to_string()),
            ..FormUpdate::default()
        });

        assert!(state.shipping().email.is_empty());
    }

    #[test]
    fn test_progress_flags() {
        let mut state = CheckoutState::new();
        state.submit();

        let progress = state.progress();
        assert_eq!(progress.len(), 3);
        assert!(progress[0].completed && !progress[0].active);
        assert!(!progress[1].completed && progress[1].active);
        assert!(!progress[2].completed && !progress[2].active);
        assert_eq!(progress[2].number, 3);
    }

    #[test]
    fn test_step_round_trips_through_str() {
        for step in [
            CheckoutStep::Shipping,
            CheckoutStep::Payment,
            CheckoutStep::Review,
            CheckoutStep::Complete,
        ] {
            assert_eq!(step.to_string().parse::<CheckoutStep>().unwrap(), step);
        }
        assert!("back".parse::<CheckoutStep>().is_err());
    }

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!("paypal".parse::<PaymentMethod>(), Ok(PaymentMethod::Paypal));
        assert_eq!(PaymentMethod::ApplePay.to_string(), "apple_pay");
        assert!("bitcoin".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_submit_label() {
        assert_eq!(CheckoutStep::Shipping.submit_label(), "Continue");
        assert_eq!(CheckoutStep::Review.submit_label(), "Place Order");
    }
}
