//! # Cart
//!
//! Line items waiting for checkout.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  add_product(handle, qty) ──► stock check ──► items.push(item)         │
//! │                                   (stock is NOT reserved)              │
//! │                                                                         │
//! │  subtotal() ──────────────► Σ unit_price × qty                         │
//! │                                                                         │
//! │  shippable_items() ───────► (name, weight, qty) for shippable items    │
//! │                                                                         │
//! │  checkout ────────────────► stock re-check, settle, clear()            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Items point at shared [`ProductHandle`]s, so the cart never owns the
//! products it lists. Stock can change between add and checkout, which is why
//! checkout checks it again.

use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{ProductHandle, Shippable, Weight};
use crate::validation::validate_quantity;

/// A product reference and a requested quantity. Immutable once created.
#[derive(Debug, Clone)]
pub struct CartItem {
    product: ProductHandle,
    quantity: i64,
}

impl CartItem {
    pub fn product(&self) -> &ProductHandle {
        &self.product
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    /// Unit price × quantity, at the product's current price.
    pub fn line_total(&self) -> CoreResult<Money> {
        self.product.with_product(|p| p.line_total(self.quantity))
    }
}

/// A shippable cart item as seen at query time.
#[derive(Debug, Clone, PartialEq)]
pub struct ShippableLine {
    pub name: String,
    pub weight: Weight,
    pub quantity: i64,
}

impl ShippableLine {
    pub fn total_grams(&self) -> f64 {
        self.weight.grams_for_quantity(self.quantity)
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - Items keep insertion order
/// - Adding the same product twice appends a second item
/// - No size limit beyond the stock check at add time
#[derive(Debug, Clone)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Appends `quantity` units of `product`.
    ///
    /// ## Returns
    /// - `Ok(())` on success
    /// - `Err(CoreError::Validation)` if quantity is not positive
    /// - `Err(CoreError::InsufficientStock)` if stock is below `quantity`
    ///
    /// Stock is only checked here, never reserved.
    pub fn add_product(&mut self, product: &ProductHandle, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        let name = product.with_product(|p| {
            if p.can_supply(quantity) {
                Ok(p.name.clone())
            } else {
                Err(CoreError::InsufficientStock {
                    product: p.name.clone(),
                    available: p.stock_quantity,
                    requested: quantity,
                })
            }
        })?;

        debug!(product = %product.id(), name = %name, quantity, "Adding product to cart");
        self.items.push(CartItem {
            product: product.clone(),
            quantity,
        });
        Ok(())
    }

    /// Σ unit_price × quantity over all items.
    ///
    /// ## Errors
    /// `CoreError::AmountOverflow` if a line or the sum leaves the i64 range.
    pub fn subtotal(&self) -> CoreResult<Money> {
        self.items.iter().try_fold(Money::zero(), |subtotal, item| {
            subtotal
                .checked_add(item.line_total()?)
                .ok_or_else(|| CoreError::AmountOverflow("cart subtotal".to_string()))
        })
    }

    /// Items whose product is shippable, in insertion order.
    ///
    /// Each call starts a fresh pass over the cart.
    pub fn shippable_items(&self) -> impl Iterator<Item = ShippableLine> + '_ {
        self.items.iter().filter_map(|item| {
            item.product.with_product(|p| {
                p.as_shippable().map(|shippable| ShippableLine {
                    name: shippable.name().to_string(),
                    weight: shippable.shipping_weight(),
                    quantity: item.quantity,
                })
            })
        })
    }

    /// Combined weight of every shippable item, in grams.
    pub fn total_weight_grams(&self) -> f64 {
        self.shippable_items().map(|line| line.total_grams()).sum()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Returns the number of items in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Only a settled checkout empties the cart.
    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}
