use clap::Args;
use storefront::{
    checkout::{CheckoutError, CheckoutFailure, CheckoutForm},
    orders::PaymentMethod,
};
use storefront_app::context::AppContext;

use super::report;

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    #[arg(long)]
    first_name: Option<String>,

    #[arg(long)]
    last_name: Option<String>,

    #[arg(long)]
    email: Option<String>,

    #[arg(long)]
    address_line1: Option<String>,

    #[arg(long)]
    address_line2: Option<String>,

    #[arg(long)]
    city: Option<String>,

    /// Defaults to the brand's country
    #[arg(long)]
    country: Option<String>,

    #[arg(long)]
    phone: Option<String>,

    /// Delivery notes
    #[arg(long)]
    notes: Option<String>,

    /// Subscribe to the newsletter
    #[arg(long)]
    subscribe: bool,

    /// cash-on-delivery or credit-card
    #[arg(long)]
    payment: Option<PaymentMethod>,

    /// Accept the terms and conditions
    #[arg(long)]
    accept_terms: bool,

    #[arg(long)]
    promo: Option<String>,
}

impl CheckoutArgs {
    fn fill(self, form: &mut CheckoutForm) {
        form.first_name = self.first_name.unwrap_or_default();
        form.last_name = self.last_name.unwrap_or_default();
        form.email = self.email.unwrap_or_default();
        form.address_line1 = self.address_line1.unwrap_or_default();
        form.address_line2 = self.address_line2.unwrap_or_default();
        form.city = self.city.unwrap_or_default();
        form.phone = self.phone.unwrap_or_default();
        form.notes = self.notes.unwrap_or_default();
        form.subscribe = self.subscribe;
        form.payment_method = self.payment;
        form.terms_accepted = self.accept_terms;
        form.promo_code = self.promo.unwrap_or_default();

        if let Some(country) = self.country {
            form.country = country;
        }
    }
}

pub(crate) async fn run(context: &AppContext, args: CheckoutArgs) -> Result<(), String> {
    let mut cart = context
        .cart()
        .map_err(|error| format!("failed to load cart: {}", report(&error)))?;

    let mut checkout = context.checkout();

    args.fill(checkout.form_mut().map_err(|error| error.to_string())?);

    let order = match context
        .checkout_service()
        .submit(&mut checkout, &mut cart)
        .await
    {
        Ok(order) => order,
        Err(CheckoutError::Failed(CheckoutFailure::Validation(errors))) => {
            return Err(format!("checkout incomplete: {errors}"));
        }
        Err(error) => return Err(format!("checkout failed: {}", report(&error))),
    };

    let totals = &order.totals;

    println!("order_number: {}", order.number);
    println!("items: {}", order.item_count());
    println!("subtotal: {}", totals.subtotal);
    println!("shipping: {}", totals.shipping);
    println!("discount: -{}", totals.discount);
    println!("total: {}", totals.total);
    println!("payment: {}", order.payment_method);

    if let Some(code) = &order.promo_code {
        println!("promo: {code}");
    }

    if let Some(rejection) = checkout.promo_rejection() {
        println!("promo not applied: {rejection}");
    }

    println!("export with `storefront order export {}`", order.number);

    Ok(())
}
