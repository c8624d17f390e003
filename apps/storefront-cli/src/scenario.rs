//! # Demo Scenario
//!
//! A small catalog and one customer, exercising every product capability:
//!
//! | Product  | Price  | Stock | Expires  | Weight |
//! |----------|--------|-------|----------|--------|
//! | Cheese   | 100.00 | 2     | +2 days  | 400 g  |
//! | Biscuits | 150.00 | 1     | -        | 700 g  |
//! | Candy    | 2.00   | 20    | +1 day   | -      |
//!
//! Alice adds 2 cheese, 1 biscuits and 1 candy, then checks out.

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use storefront_core::{
    CheckoutOptions, CheckoutReporter, CompletedOrder, CoreResult, Customer, Money, Product,
    ProductHandle, ValidationError, Weight,
};

/// The products the scenario sells.
pub struct Catalog {
    pub cheese: ProductHandle,
    pub biscuits: ProductHandle,
    pub candy: ProductHandle,
}

impl Catalog {
    pub fn new(now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let cheese = Product::new("Cheese", Money::from_cents(10000), 2)?
            .with_expiry(now + Duration::days(2))
            .with_weight(Weight::from_grams(400.0)?);
        let biscuits = Product::new("Biscuits", Money::from_cents(15000), 1)?
            .with_weight(Weight::from_grams(700.0)?);
        let candy = Product::new("Candy", Money::from_cents(200), 20)?
            .with_expiry(now + Duration::days(1));

        for product in [&cheese, &biscuits, &candy] {
            info!(product = %product.id(), kind = ?product.kind(), "Catalog entry");
        }

        Ok(Catalog {
            cheese: cheese.into(),
            biscuits: biscuits.into(),
            candy: candy.into(),
        })
    }

    /// Catalog entries, for display.
    pub fn products(&self) -> Vec<Product> {
        [&self.cheese, &self.biscuits, &self.candy]
            .into_iter()
            .map(ProductHandle::snapshot)
            .collect()
    }
}

/// Fills the customer's cart from the catalog and checks out.
///
/// A failed add is shown and skipped; the checkout result is returned as is.
pub fn run(
    catalog: &Catalog,
    customer: &mut Customer,
    now: DateTime<Utc>,
    options: &CheckoutOptions,
    reporter: &mut dyn CheckoutReporter,
) -> CoreResult<CompletedOrder> {
    let wanted = [
        (&catalog.cheese, 2),
        (&catalog.biscuits, 1),
        (&catalog.candy, 1),
    ];

    for (product, quantity) in wanted {
        if let Err(err) = customer.cart_mut().add_product(product, quantity) {
            warn!(product = %product.id(), quantity, error = %err, "Skipping cart item");
            println!("{err}");
        }
    }

    customer.checkout_at(now, options, reporter)
}
