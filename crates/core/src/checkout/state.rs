//! Checkout State

use jiff::Timestamp;
use thiserror::Error;

use crate::{
    cart::CartItem,
    checkout::form::{CheckoutForm, FieldErrors},
    orders::{NewOrder, OrderLine, OrderNumber, OrderTotals},
    pricing::{PricingEngine, PricingError, PromoOutcome},
    products::ProductId,
    promotions::PromoError,
};

/// Why a checkout attempt failed. The form is kept and the customer may submit again.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CheckoutFailure {
    /// There is nothing to order.
    #[error("your cart is empty")]
    EmptyCart,

    /// Required fields are missing.
    #[error("please fix the highlighted fields: {0}")]
    Validation(FieldErrors),

    /// A product in the cart is no longer in the catalog.
    #[error("product {0} is no longer available")]
    ProductNotFound(ProductId),

    /// The order could not be stored.
    #[error("the order could not be placed: {0}")]
    Persistence(String),

    /// The catalog did not answer in time.
    #[error("the request timed out, please try again")]
    Timeout,
}

/// Where a checkout is in its lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CheckoutPhase {
    /// The customer is filling in the form.
    #[default]
    Editing,

    /// The form and cart are being checked.
    Validating,

    /// An order is in flight.
    Submitting,

    /// The order was placed.
    Succeeded(OrderNumber),

    /// The last attempt failed.
    Failed(CheckoutFailure),
}

/// Misuse of the checkout state machine, or a failed attempt.
#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    /// An order is already being submitted.
    #[error("an order is already being submitted")]
    SubmissionInFlight,

    /// Completion was reported without a submission in flight.
    #[error("no order is being submitted")]
    NotSubmitting,

    /// The attempt failed.
    #[error(transparent)]
    Failed(#[from] CheckoutFailure),

    /// The cart could not be priced.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// A checkout: the form plus the submission state machine.
///
/// `Editing -> Validating -> Submitting -> Succeeded | Failed`. Validation failures return
/// straight to an editable state. Network work happens outside: callers take the [`NewOrder`]
/// from [`Checkout::begin_submission`] and report back with [`Checkout::complete`] or
/// [`Checkout::fail`].
#[derive(Debug)]
pub struct Checkout {
    form: CheckoutForm,
    phase: CheckoutPhase,
    promo_rejection: Option<PromoError>,
    default_country: String,
}

impl Checkout {
    /// Fresh checkout with the brand's default country preset.
    pub fn new(default_country: impl Into<String>) -> Self {
        let default_country = default_country.into();

        Self {
            form: CheckoutForm::new(default_country.clone()),
            phase: CheckoutPhase::Editing,
            promo_rejection: None,
            default_country,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> &CheckoutPhase {
        &self.phase
    }

    /// The form.
    pub fn form(&self) -> &CheckoutForm {
        &self.form
    }

    /// Edit the form. Leaves a finished phase for `Editing`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::SubmissionInFlight`] while an order is being submitted.
    pub fn form_mut(&mut self) -> Result<&mut CheckoutForm, CheckoutError> {
        if self.is_submitting() {
            return Err(CheckoutError::SubmissionInFlight);
        }

        self.phase = CheckoutPhase::Editing;

        Ok(&mut self.form)
    }

    /// Whether an order is in flight.
    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, CheckoutPhase::Submitting)
    }

    /// Failure of the last attempt, if it failed.
    pub fn last_failure(&self) -> Option<&CheckoutFailure> {
        match &self.phase {
            CheckoutPhase::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    /// Why the promo code of the last submission was not applied. The order is still placed,
    /// without a discount.
    pub fn promo_rejection(&self) -> Option<&PromoError> {
        self.promo_rejection.as_ref()
    }

    /// Number of the placed order, once placed.
    pub fn order_number(&self) -> Option<&OrderNumber> {
        match &self.phase {
            CheckoutPhase::Succeeded(number) => Some(number),
            _ => None,
        }
    }

    /// Check the cart and form without changing phase.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutFailure::EmptyCart`] or [`CheckoutFailure::Validation`].
    pub fn validate(&self, cart: &[CartItem]) -> Result<(), CheckoutFailure> {
        if cart.is_empty() {
            return Err(CheckoutFailure::EmptyCart);
        }

        let errors = self.form.validate();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(CheckoutFailure::Validation(errors))
        }
    }

    /// Validate, then snapshot the cart into an order payload and enter `Submitting`.
    ///
    /// A rejected promo code does not stop the submission; the reason is kept for
    /// [`Checkout::promo_rejection`].
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::SubmissionInFlight`]: an order is already being submitted.
    /// - [`CheckoutError::Failed`]: empty cart or invalid form; the phase becomes `Failed`.
    /// - [`CheckoutError::Pricing`]: the cart could not be priced; the phase returns to
    ///   `Editing`.
    pub fn begin_submission(
        &mut self,
        cart: &[CartItem],
        engine: &PricingEngine,
        placed_at: Timestamp,
    ) -> Result<NewOrder, CheckoutError> {
        if self.is_submitting() {
            return Err(CheckoutError::SubmissionInFlight);
        }

        self.phase = CheckoutPhase::Validating;
        self.promo_rejection = None;

        if let Err(failure) = self.validate(cart) {
            self.phase = CheckoutPhase::Failed(failure.clone());
            return Err(failure.into());
        }

        let quote = match engine.quote(cart, Some(&self.form.promo_code)) {
            Ok(quote) => quote,
            Err(err) => {
                self.phase = CheckoutPhase::Editing;
                return Err(err.into());
            }
        };

        let Some(payment_method) = self.form.payment_method else {
            // Validation guarantees a payment method.
            self.phase = CheckoutPhase::Editing;
            return Err(CheckoutFailure::Validation(self.form.validate()).into());
        };

        let order = NewOrder {
            customer: self.form.customer(),
            lines: cart.iter().map(OrderLine::from).collect(),
            payment_method,
            totals: OrderTotals::from(&quote),
            promo_code: quote.applied_code().map(str::to_string),
            notes: self.form.notes(),
            placed_at,
        };

        if let PromoOutcome::Rejected(rejection) = quote.promo {
            self.promo_rejection = Some(rejection);
        }

        self.phase = CheckoutPhase::Submitting;

        Ok(order)
    }

    /// Record that the order was placed: resets the form and enters `Succeeded`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NotSubmitting`] unless an order is in flight.
    pub fn complete(&mut self, number: OrderNumber) -> Result<(), CheckoutError> {
        if !self.is_submitting() {
            return Err(CheckoutError::NotSubmitting);
        }

        self.form = CheckoutForm::new(self.default_country.clone());
        self.phase = CheckoutPhase::Succeeded(number);

        Ok(())
    }

    /// Record that the submission failed. The form is kept.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NotSubmitting`] unless an order is in flight.
    pub fn fail(&mut self, failure: CheckoutFailure) -> Result<(), CheckoutError> {
        if !self.is_submitting() {
            return Err(CheckoutError::NotSubmitting);
        }

        self.phase = CheckoutPhase::Failed(failure);

        Ok(())
    }
}
