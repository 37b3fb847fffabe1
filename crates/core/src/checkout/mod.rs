//! Checkout

pub mod form;
pub mod state;

pub use form::{CheckoutForm, Field, FieldError, FieldErrors};
pub use state::{Checkout, CheckoutError, CheckoutFailure, CheckoutPhase};
