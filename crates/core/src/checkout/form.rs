//! Checkout Form

use std::fmt;

use smallvec::SmallVec;

use crate::orders::{Address, Customer, PaymentMethod};

/// A checkout form field that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// First name
    FirstName,
    /// Last name
    LastName,
    /// Email
    Email,
    /// Address line 1
    AddressLine1,
    /// City
    City,
    /// Phone
    Phone,
    /// Payment method
    PaymentMethod,
    /// Terms and conditions checkbox
    Terms,
}

impl Field {
    /// Form label.
    pub fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::Email => "Email",
            Self::AddressLine1 => "Address",
            Self::City => "City",
            Self::Phone => "Phone",
            Self::PaymentMethod => "Payment method",
            Self::Terms => "Terms and conditions",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A failed field and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Failing field
    pub field: Field,

    /// Message shown next to the field
    pub message: &'static str,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every failing field of a form, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(SmallVec<[FieldError; 8]>);

impl FieldErrors {
    /// Whether the form is valid.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether `field` failed.
    pub fn contains(&self, field: Field) -> bool {
        self.0.iter().any(|error| error.field == field)
    }

    /// Failing fields.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    fn push(&mut self, field: Field, message: &'static str) {
        self.0.push(FieldError { field, message });
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, error) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }

            write!(f, "{error}")?;
        }

        Ok(())
    }
}

/// The checkout form as the customer filled it in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Email
    pub email: String,
    /// Address line 1
    pub address_line1: String,
    /// Address line 2
    pub address_line2: String,
    /// City
    pub city: String,
    /// Country
    pub country: String,
    /// Phone
    pub phone: String,
    /// Delivery notes
    pub notes: String,
    /// Newsletter opt-in
    pub subscribe: bool,
    /// Chosen payment method
    pub payment_method: Option<PaymentMethod>,
    /// Terms checkbox
    pub terms_accepted: bool,
    /// Promo code as typed
    pub promo_code: String,
}

impl CheckoutForm {
    /// Blank form with the country preset.
    pub fn new(default_country: impl Into<String>) -> Self {
        Self {
            country: default_country.into(),
            ..Self::default()
        }
    }

    /// Check every required field, reporting all failures at once.
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();

        let required = [
            (Field::FirstName, &self.first_name, "First name is required"),
            (Field::LastName, &self.last_name, "Last name is required"),
            (Field::Email, &self.email, "Email is required"),
            (Field::AddressLine1, &self.address_line1, "Address is required"),
            (Field::City, &self.city, "City is required"),
            (Field::Phone, &self.phone, "Phone number is required"),
        ];

        for (field, value, message) in required {
            if value.trim().is_empty() {
                errors.push(field, message);
            }
        }

        if self.payment_method.is_none() {
            errors.push(Field::PaymentMethod, "Choose a payment method");
        }

        if !self.terms_accepted {
            errors.push(Field::Terms, "You must accept the terms and conditions");
        }

        errors
    }

    pub(crate) fn customer(&self) -> Customer {
        Customer {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: Address {
                line1: self.address_line1.trim().to_string(),
                line2: non_blank(&self.address_line2),
                city: self.city.trim().to_string(),
                country: self.country.trim().to_string(),
            },
            subscribe: self.subscribe,
        }
    }

    pub(crate) fn notes(&self) -> Option<String> {
        non_blank(&self.notes)
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();

    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> CheckoutForm {
        CheckoutForm {
            first_name: "Sana".to_string(),
            last_name: "Malik".to_string(),
            email: "sana@example.com".to_string(),
            address_line1: "House 7, Street 3".to_string(),
            city: "Karachi".to_string(),
            phone: "03001234567".to_string(),
            payment_method: Some(PaymentMethod::CashOnDelivery),
            terms_accepted: true,
            ..CheckoutForm::new("Pakistan")
        }
    }

    #[test]
    fn filled_form_is_valid() {
        assert!(filled().validate().is_empty());
    }

    #[test]
    fn blank_form_lists_every_failing_field() {
        let errors = CheckoutForm::new("Pakistan").validate();

        assert_eq!(errors.len(), 8);
        assert!(errors.contains(Field::FirstName));
        assert!(errors.contains(Field::Terms));
        assert!(errors.contains(Field::PaymentMethod));
    }

    #[test]
    fn whitespace_only_counts_as_blank() {
        let form = CheckoutForm {
            city: "   ".to_string(),
            ..filled()
        };

        let errors = form.validate();

        assert_eq!(errors.len(), 1);
        assert!(errors.contains(Field::City));
        assert_eq!(errors.to_string(), "City: City is required");
    }

    #[test]
    fn customer_trims_and_drops_blank_line2() {
        let form = CheckoutForm {
            first_name: "  Sana ".to_string(),
            address_line2: " ".to_string(),
            ..filled()
        };

        let customer = form.customer();

        assert_eq!(customer.first_name, "Sana");
        assert_eq!(customer.address.line2, None);
        assert_eq!(customer.address.country, "Pakistan");
    }
}
