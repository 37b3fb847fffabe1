//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    branding::{Brand, BrandBuilder, BrandError},
    cart::{CartError, CartEvent, CartItem, CartStore, LineId, QuantityChange, SelectedOptions},
    checkout::{
        Checkout, CheckoutError, CheckoutFailure, CheckoutForm, CheckoutPhase, Field, FieldErrors,
    },
    discounts::{DiscountError, DiscountPercent},
    fixtures::FixtureError,
    money::Price,
    orders::{
        Address, Customer, NewOrder, Order, OrderLine, OrderNumber, OrderStatus, OrderTotals,
        PaymentMethod,
    },
    pricing::{PricingEngine, PricingError, PricingRules, PromoOutcome, Quote, ShippingTiers},
    products::{Availability, Product, ProductId, Review},
    promotions::{Coupon, PromoError, Rewards},
    receipt::{ReceiptError, write_order_document},
    storage::{FileStorage, MemoryStorage, Storage, StorageError},
    subscribers::SubscriptionKey,
    wishlist::{WishlistError, WishlistEvent, WishlistStore},
};
