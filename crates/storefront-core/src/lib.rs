//! # storefront-core: Pure Business Logic for Storefront
//!
//! Products, carts, and the checkout that settles a cart against a
//! customer's balance. No I/O: reports are handed to a [`CheckoutReporter`]
//! and the caller decides where they go.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              storefront-cli (scenario driver)                   │   │
//! │  │    config ──► build catalog ──► fill cart ──► checkout          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐  │   │
//! │  │   │  types   │ │  money   │ │   cart   │ │ checkout/customer│  │   │
//! │  │   │ Product  │ │  Money   │ │   Cart   │ │ validate, price, │  │   │
//! │  │   │ Weight   │ │          │ │ CartItem │ │ settle, clear    │  │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO PRINTING • NO FILES • NO NETWORK                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product, capabilities, shared product handles
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Cart and cart items
//! - [`checkout`] - The checkout transaction and its options
//! - [`customer`] - Customer balance and cart ownership
//! - [`report`] - Shipment notice, receipt, summary, reporter trait
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::{Customer, Money, Product, ProductHandle, RecordingReporter, Weight};
//!
//! let cheese = ProductHandle::new(
//!     Product::new("Cheese", Money::from_cents(10000), 2)
//!         .unwrap()
//!         .with_weight(Weight::from_grams(400.0).unwrap()),
//! );
//!
//! let mut alice = Customer::new("Alice", Money::from_cents(50000)).unwrap();
//! alice.cart_mut().add_product(&cheese, 2).unwrap();
//!
//! let order = alice.checkout(&mut RecordingReporter::new()).unwrap();
//! // 2 × 400 g = 0.8 kg at 20.00/kg
//! assert_eq!(order.summary.shipping.cents(), 1600);
//! assert_eq!(order.summary.total_paid.cents(), 21600);
//! assert_eq!(cheese.stock_quantity(), 0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod customer;
pub mod error;
pub mod money;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use storefront_core::Money` instead of
// `use storefront_core::money::Money`

pub use cart::{Cart, CartItem, ShippableLine};
pub use checkout::{CheckoutOptions, ReportTiming};
pub use customer::Customer;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use report::{
    CheckoutReporter, CheckoutSummary, CompletedOrder, NoopReporter, Receipt, ReceiptLine,
    RecordingReporter, ReportEvent, ShipmentLine, ShipmentNotice,
};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Shipping charge per kilogram of package weight, in cents (20.00/kg).
pub const DEFAULT_SHIPPING_RATE_CENTS_PER_KG: i64 = 2000;
