//! # Customer
//!
//! A named buyer with a balance and exactly one cart.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::cart::Cart;
use crate::checkout::{self, CheckoutOptions};
use crate::error::CoreResult;
use crate::money::Money;
use crate::report::{CheckoutReporter, CompletedOrder};
use crate::validation::{validate_balance_cents, validate_customer_name, ValidationResult};

/// A customer and the cart they are filling.
///
/// ## Invariants
/// - Balance is never negative
/// - Balance only goes down by the total of a settled checkout
#[derive(Debug, Clone)]
pub struct Customer {
    name: String,
    balance: Money,
    cart: Cart,
}

impl Customer {
    /// Creates a customer with an empty cart.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::{Customer, Money};
    ///
    /// let alice = Customer::new("Alice", Money::from_cents(50000)).unwrap();
    /// assert!(alice.cart().is_empty());
    /// assert!(Customer::new("Bob", Money::from_cents(-1)).is_err());
    /// ```
    pub fn new(name: impl Into<String>, balance: Money) -> ValidationResult<Self> {
        let name = name.into();
        validate_customer_name(&name)?;
        validate_balance_cents(balance.cents())?;

        Ok(Customer {
            name: name.trim().to_string(),
            balance,
            cart: Cart::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    /// Checks out the cart now, with default options.
    pub fn checkout(&mut self, reporter: &mut dyn CheckoutReporter) -> CoreResult<CompletedOrder> {
        self.checkout_at(Utc::now(), &CheckoutOptions::default(), reporter)
    }

    /// Checks out the cart as of `now`.
    ///
    /// ## Returns
    /// - `Ok(CompletedOrder)`: stock decremented, balance charged, cart empty
    /// - `Err(..)`: stock, balance and cart exactly as before the call
    pub fn checkout_at(
        &mut self,
        now: DateTime<Utc>,
        options: &CheckoutOptions,
        reporter: &mut dyn CheckoutReporter,
    ) -> CoreResult<CompletedOrder> {
        let items = self.cart.len();
        let result = checkout::run(
            &self.name,
            &mut self.balance,
            &mut self.cart,
            now,
            options,
            reporter,
        );

        match &result {
            Ok(order) => info!(
                customer = %self.name,
                order = %order.id,
                items,
                total = %order.summary.total_paid,
                balance = %self.balance,
                "Checkout settled"
            ),
            Err(error) => warn!(
                customer = %self.name,
                items,
                error = %error,
                "Checkout aborted"
            ),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::report::NoopReporter;
    use crate::types::{Product, ProductHandle, Weight};

    #[test]
    fn test_new_validates() {
        assert!(Customer::new("", Money::from_cents(100)).is_err());
        assert!(Customer::new("Alice", Money::from_cents(-100)).is_err());

        let alice = Customer::new("  Alice ", Money::zero()).unwrap();
        assert_eq!(alice.name(), "Alice");
        assert_eq!(alice.balance(), Money::zero());
    }

    #[test]
    fn test_checkout_charges_balance() {
        let cheese = ProductHandle::new(
            Product::new("Cheese", Money::from_cents(10000), 2)
                .unwrap()
                .with_weight(Weight::from_grams(400.0).unwrap()),
        );
        let mut alice = Customer::new("Alice", Money::from_cents(50000)).unwrap();
        alice.cart_mut().add_product(&cheese, 2).unwrap();

        let order = alice.checkout(&mut NoopReporter).unwrap();

        assert_eq!(order.customer, "Alice");
        assert_eq!(order.summary.total_paid, Money::from_cents(21600));
        assert_eq!(alice.balance(), Money::from_cents(28400));
        assert_eq!(cheese.stock_quantity(), 0);
        assert!(alice.cart().is_empty());
    }

    #[test]
    fn test_checkout_twice_hits_empty_cart() {
        let candy = ProductHandle::new(Product::new("Candy", Money::from_cents(200), 20).unwrap());
        let mut alice = Customer::new("Alice", Money::from_cents(50000)).unwrap();
        alice.cart_mut().add_product(&candy, 1).unwrap();

        alice.checkout(&mut NoopReporter).unwrap();
        let err = alice.checkout(&mut NoopReporter).unwrap_err();

        assert!(matches!(err, CoreError::EmptyCart));
        assert_eq!(alice.balance(), Money::from_cents(49800));
    }
}
