//! # Domain Types
//!
//! Catalog types used throughout Storefront.
//!
//! ## Capability Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Product Capabilities                            │
//! │                                                                         │
//! │  ┌─────────────────┐                                                    │
//! │  │    Product      │   expiry_date: Option ──► as_expirable()           │
//! │  │  ─────────────  │                            └─► impl Expirable      │
//! │  │  id (UUID)      │                                                    │
//! │  │  name           │   weight: Option ──────► as_shippable()            │
//! │  │  unit_price     │                            └─► impl Shippable      │
//! │  │  stock_quantity │                                                    │
//! │  └─────────────────┘   Any combination: none, one, or both             │
//! │                                                                         │
//! │  ProductHandle = shared Arc<Mutex<Product>>                            │
//! │  Many cart items, in many carts, can point at the same handle.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Capabilities are queried by existence, never by inspecting a concrete
//! type. `shipping_weight()` only exists on [`ShippableProduct`], so asking a
//! non-shippable product for its weight does not compile.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::{
    validate_price_cents, validate_product_name, validate_quantity, validate_stock,
    validate_weight_grams, ValidationResult,
};

// =============================================================================
// Weight
// =============================================================================

/// Shipping weight in grams. Always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Weight(f64);

impl Weight {
    /// Creates a weight from grams.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::types::Weight;
    ///
    /// let cheese = Weight::from_grams(400.0).unwrap();
    /// assert_eq!(cheese.kilograms(), 0.4);
    /// assert!(Weight::from_grams(0.0).is_err());
    /// ```
    pub fn from_grams(grams: f64) -> ValidationResult<Self> {
        validate_weight_grams(grams)?;
        Ok(Weight(grams))
    }

    /// Returns the weight in grams.
    #[inline]
    pub const fn grams(&self) -> f64 {
        self.0
    }

    /// Returns the weight in kilograms.
    #[inline]
    pub fn kilograms(&self) -> f64 {
        self.0 / 1000.0
    }

    /// Total grams for `qty` units of this weight.
    #[inline]
    pub fn grams_for_quantity(&self, qty: i64) -> f64 {
        self.0 * qty as f64
    }
}

impl TryFrom<f64> for Weight {
    type Error = ValidationError;

    fn try_from(grams: f64) -> Result<Self, Self::Error> {
        Weight::from_grams(grams)
    }
}

impl From<Weight> for f64 {
    fn from(weight: Weight) -> Self {
        weight.0
    }
}

// =============================================================================
// Shipping Rate
// =============================================================================

/// Shipping rate in cents per kilogram.
///
/// ## Why Cents per Kilogram?
/// Weights are fractional grams; the rate is integer money. The two meet
/// exactly once per checkout, in [`ShippingRate::cost_for_grams`], and the
/// result is rounded to the nearest cent there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingRate(i64);

impl ShippingRate {
    /// Creates a rate from cents per kilogram.
    #[inline]
    pub const fn from_cents_per_kg(cents: i64) -> Self {
        ShippingRate(cents)
    }

    /// Returns the rate in cents per kilogram.
    #[inline]
    pub const fn cents_per_kg(&self) -> i64 {
        self.0
    }

    /// Prices a package of the given total weight.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::types::ShippingRate;
    ///
    /// let rate = ShippingRate::from_cents_per_kg(2000); // 20.00 per kg
    /// // 2 × 400 g = 0.8 kg → 16.00
    /// assert_eq!(rate.cost_for_grams(800.0).cents(), 1600);
    /// ```
    pub fn cost_for_grams(&self, grams: f64) -> Money {
        let cents = (grams * self.0 as f64 / 1000.0).round();
        Money::from_cents(cents as i64)
    }
}

impl Default for ShippingRate {
    fn default() -> Self {
        ShippingRate(crate::DEFAULT_SHIPPING_RATE_CENTS_PER_KG)
    }
}

// =============================================================================
// Capabilities
// =============================================================================

/// A catalog entry that goes bad after a fixed date.
pub trait Expirable {
    /// The last instant the product may be sold.
    fn expiry_date(&self) -> DateTime<Utc>;

    /// True iff `now` is strictly after the expiry date.
    fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expiry_date()
    }
}

/// A catalog entry that has to be shipped and is charged by weight.
pub trait Shippable {
    fn name(&self) -> &str;

    fn shipping_weight(&self) -> Weight;
}

/// Borrowed view of a product that has an expiry date.
#[derive(Debug, Clone, Copy)]
pub struct ExpirableProduct<'a> {
    product: &'a Product,
    expiry_date: DateTime<Utc>,
}

impl ExpirableProduct<'_> {
    pub fn product(&self) -> &Product {
        self.product
    }
}

impl Expirable for ExpirableProduct<'_> {
    fn expiry_date(&self) -> DateTime<Utc> {
        self.expiry_date
    }
}

/// Borrowed view of a product that has a shipping weight.
#[derive(Debug, Clone, Copy)]
pub struct ShippableProduct<'a> {
    product: &'a Product,
    weight: Weight,
}

impl ShippableProduct<'_> {
    pub fn product(&self) -> &Product {
        self.product
    }
}

impl Shippable for ShippableProduct<'_> {
    fn name(&self) -> &str {
        &self.product.name
    }

    fn shipping_weight(&self) -> Weight {
        self.weight
    }
}

/// Which capabilities a product carries. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    Standard,
    Expirable,
    Shippable,
    ShippableExpirable,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (UUID v4).
    id: Uuid,

    /// Display name shown on notices and receipts.
    pub name: String,

    /// Price per unit.
    pub unit_price: Money,

    /// Units on hand. Shared by every cart that references this product.
    pub stock_quantity: i64,

    /// Set for perishable products.
    pub expiry_date: Option<DateTime<Utc>>,

    /// Set for products that have to be shipped.
    pub weight: Option<Weight>,
}

impl Product {
    /// Creates a standard product (no expiry, not shippable).
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    /// use storefront_core::types::{Product, ProductKind, Weight};
    ///
    /// let cheese = Product::new("Cheese", Money::from_cents(10000), 2)
    ///     .unwrap()
    ///     .with_weight(Weight::from_grams(400.0).unwrap());
    /// assert_eq!(cheese.kind(), ProductKind::Shippable);
    /// ```
    pub fn new(
        name: impl Into<String>,
        unit_price: Money,
        stock_quantity: i64,
    ) -> ValidationResult<Self> {
        let name = name.into();
        validate_product_name(&name)?;
        validate_price_cents(unit_price.cents())?;
        validate_stock(stock_quantity)?;

        Ok(Product {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            unit_price,
            stock_quantity,
            expiry_date: None,
            weight: None,
        })
    }

    /// Adds the expirable capability.
    pub fn with_expiry(mut self, expiry_date: DateTime<Utc>) -> Self {
        self.expiry_date = Some(expiry_date);
        self
    }

    /// Adds the shippable capability.
    pub fn with_weight(mut self, weight: Weight) -> Self {
        self.weight = Some(weight);
        self
    }

    #[inline]
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> ProductKind {
        match (self.expiry_date.is_some(), self.weight.is_some()) {
            (false, false) => ProductKind::Standard,
            (true, false) => ProductKind::Expirable,
            (false, true) => ProductKind::Shippable,
            (true, true) => ProductKind::ShippableExpirable,
        }
    }

    /// The expirable view, if this product has an expiry date.
    pub fn as_expirable(&self) -> Option<ExpirableProduct<'_>> {
        self.expiry_date.map(|expiry_date| ExpirableProduct {
            product: self,
            expiry_date,
        })
    }

    /// The shippable view, if this product has a weight.
    pub fn as_shippable(&self) -> Option<ShippableProduct<'_>> {
        self.weight.map(|weight| ShippableProduct {
            product: self,
            weight,
        })
    }

    /// True iff the product is expirable and `now` is past its expiry date.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.as_expirable()
            .is_some_and(|expirable| expirable.is_expired_at(now))
    }

    /// Checks whether `quantity` units can be taken from stock.
    pub fn can_supply(&self, quantity: i64) -> bool {
        self.stock_quantity >= quantity
    }

    /// Unit price × quantity.
    ///
    /// ## Errors
    /// `CoreError::AmountOverflow` if the product does not fit in i64 cents.
    pub fn line_total(&self, quantity: i64) -> CoreResult<Money> {
        self.unit_price
            .checked_mul_quantity(quantity)
            .ok_or_else(|| CoreError::AmountOverflow(format!("line total for {}", self.name)))
    }
}

/// One info line per product, plus the expiry date for perishables.
impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Name: {}, Price: {}, Quantity: {}",
            self.name, self.unit_price, self.stock_quantity
        )?;
        if let Some(expiry_date) = self.expiry_date {
            write!(f, "\nExpiry Date: {}", expiry_date.format("%Y-%m-%d"))?;
        }
        Ok(())
    }
}

// =============================================================================
// Product Handle
// =============================================================================

/// Shared, lockable reference to a catalog product.
///
/// ## Thread Safety
/// Stock is shared mutable state: every cart holding this handle sees the
/// same count. The product lives behind an `Arc<Mutex<_>>` so checkout can
/// hold the lock from its stock check until the decrement.
///
/// A poisoned lock is recovered rather than propagated. Product state is only
/// written after every checkout check has passed, so a panic elsewhere cannot
/// leave it half-updated.
#[derive(Debug, Clone)]
pub struct ProductHandle {
    id: Uuid,
    inner: Arc<Mutex<Product>>,
}

/// Global lock order for product handles.
pub(crate) type LockKey = (Uuid, usize);

impl ProductHandle {
    pub fn new(product: Product) -> Self {
        ProductHandle {
            id: product.id,
            inner: Arc::new(Mutex::new(product)),
        }
    }

    #[inline]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// True if both handles point at the same product instance.
    pub fn ptr_eq(&self, other: &ProductHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn lock_key(&self) -> LockKey {
        (self.id, Arc::as_ptr(&self.inner) as usize)
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Product> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Executes a function with read access to the product.
    pub fn with_product<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Product) -> R,
    {
        f(&self.lock())
    }

    /// Executes a function with write access to the product.
    ///
    /// ## Usage
    /// ```rust
    /// use storefront_core::money::Money;
    /// use storefront_core::types::{Product, ProductHandle};
    ///
    /// let candy = ProductHandle::new(Product::new("Candy", Money::from_cents(200), 20).unwrap());
    /// candy.with_product_mut(|p| p.unit_price = Money::from_cents(250));
    /// assert_eq!(candy.snapshot().unit_price.cents(), 250);
    /// ```
    pub fn with_product_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Product) -> R,
    {
        f(&mut self.lock())
    }

    /// A point-in-time copy of the product.
    pub fn snapshot(&self) -> Product {
        self.lock().clone()
    }

    pub fn name(&self) -> String {
        self.lock().name.clone()
    }

    pub fn stock_quantity(&self) -> i64 {
        self.lock().stock_quantity
    }

    /// Adds units to stock and returns the new stock level.
    pub fn restock(&self, quantity: i64) -> ValidationResult<i64> {
        validate_quantity(quantity)?;
        let mut product = self.lock();
        product.stock_quantity = product
            .stock_quantity
            .checked_add(quantity)
            .ok_or_else(|| ValidationError::OutOfRange {
                field: "stock".to_string(),
                min: 0,
                max: i64::MAX,
            })?;
        Ok(product.stock_quantity)
    }
}

impl From<Product> for ProductHandle {
    fn from(product: Product) -> Self {
        ProductHandle::new(product)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
