//! # Checkout
//!
//! Turns a cart into a paid order, or fails without touching anything.
//!
//! ## Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Checkout                                        │
//! │                                                                         │
//! │  lock every product (ascending id, each once)                          │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  VALIDATE  empty? ─► EmptyCart                                          │
//! │            per item: expired? ─► ExpiredProduct                        │
//! │                      stock?   ─► InsufficientStock                     │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  PRICE     subtotal, shipping = package kg × rate, notice, receipt     │
//! │            overflow? ─► AmountOverflow                                 │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  SETTLE    balance < total? ─► InsufficientBalance                     │
//! │            stock -= qty, balance -= total                              │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  UNLOCK    notice + receipt reported here by default                   │
//! │     │      (a balance failure is returned after them)                  │
//! │     ▼                                                                   │
//! │  CLEAR     empty the cart, report summary                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Product locks are held from the stock check to the stock decrement, so two
//! carts sharing a product cannot both take its last unit. No reporter runs
//! while they are held, so a reporter may read any product.

use std::str::FromStr;
use std::sync::MutexGuard;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cart::{Cart, CartItem};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::report::{
    CheckoutReporter, CheckoutSummary, CompletedOrder, Receipt, ReceiptLine, ShipmentLine,
    ShipmentNotice,
};
use crate::types::{Expirable, Product, Shippable, ShippingRate};

// =============================================================================
// Options
// =============================================================================

/// When the shipment notice and receipt are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportTiming {
    /// After pricing, ahead of the balance outcome. A checkout that fails
    /// on balance still reports its notice and receipt.
    #[default]
    BeforeBalanceCheck,

    /// Only once the order has settled, right before the summary.
    AfterSettlement,
}

impl FromStr for ReportTiming {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "before-balance-check" => Ok(ReportTiming::BeforeBalanceCheck),
            "after-settlement" => Ok(ReportTiming::AfterSettlement),
            other => Err(ValidationError::InvalidFormat {
                field: "report timing".to_string(),
                reason: format!(
                    "'{other}' is not one of: before-balance-check, after-settlement"
                ),
            }),
        }
    }
}

/// Knobs for a single checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CheckoutOptions {
    pub shipping_rate: ShippingRate,
    pub report_timing: ReportTiming,
}

// =============================================================================
// Locked Products
// =============================================================================

/// Every product a cart references, locked for the whole transaction.
///
/// Locks are taken in ascending (product id, instance) order and each product
/// instance is locked once, however many items reference it.
struct LockedProducts<'a> {
    guards: Vec<MutexGuard<'a, Product>>,
    /// Item index → guard index.
    slots: Vec<usize>,
}

impl<'a> LockedProducts<'a> {
    fn acquire(items: &'a [CartItem]) -> Self {
        let mut order: Vec<_> = items
            .iter()
            .enumerate()
            .map(|(index, item)| (item.product().lock_key(), index))
            .collect();
        order.sort_unstable_by_key(|(key, _)| *key);

        let mut guards = Vec::new();
        let mut slots = vec![0; items.len()];
        let mut previous = None;
        for (key, index) in order {
            if previous != Some(key) {
                guards.push(items[index].product().lock());
                previous = Some(key);
            }
            slots[index] = guards.len() - 1;
        }

        LockedProducts { guards, slots }
    }

    fn product(&self, item_index: usize) -> &Product {
        &self.guards[self.slots[item_index]]
    }

    fn product_mut(&mut self, item_index: usize) -> &mut Product {
        &mut self.guards[self.slots[item_index]]
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// Everything pricing produces, computed under lock.
struct PricedOrder {
    subtotal: Money,
    shipping: Money,
    total: Money,
    notice: ShipmentNotice,
    receipt: Receipt,
}

/// Runs one checkout of `cart` against `balance`.
///
/// On error neither stock, balance nor cart has changed. Reports are handed
/// to `reporter` only after every product lock has been released.
pub(crate) fn run(
    customer: &str,
    balance: &mut Money,
    cart: &mut Cart,
    now: DateTime<Utc>,
    options: &CheckoutOptions,
    reporter: &mut dyn CheckoutReporter,
) -> CoreResult<CompletedOrder> {
    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }

    let (priced, settled) = {
        let items = cart.items();
        let mut locked = LockedProducts::acquire(items);

        validate(items, &locked, now)?;
        let priced = price(items, &locked, options.shipping_rate)?;
        let settled = settle(items, &mut locked, balance, priced.total);
        (priced, settled)
    };

    if options.report_timing == ReportTiming::BeforeBalanceCheck {
        reporter.shipment_notice(&priced.notice);
        reporter.receipt(&priced.receipt);
    }
    settled?;

    cart.clear();

    if options.report_timing == ReportTiming::AfterSettlement {
        reporter.shipment_notice(&priced.notice);
        reporter.receipt(&priced.receipt);
    }

    let summary = CheckoutSummary {
        subtotal: priced.subtotal,
        shipping: priced.shipping,
        total_paid: priced.total,
        remaining_balance: *balance,
    };
    reporter.summary(&summary);

    Ok(CompletedOrder {
        id: Uuid::new_v4(),
        customer: customer.to_string(),
        notice: priced.notice,
        receipt: priced.receipt,
        summary,
        completed_at: now,
    })
}

/// Per-item checks, in insertion order. The first failure wins.
///
/// Items that share a product draw on the same stock: each one is checked
/// against what earlier items have left.
fn validate(
    items: &[CartItem],
    locked: &LockedProducts<'_>,
    now: DateTime<Utc>,
) -> CoreResult<()> {
    let mut claimed = vec![0_i64; locked.guards.len()];

    for (index, item) in items.iter().enumerate() {
        let product = locked.product(index);

        if let Some(expirable) = product.as_expirable() {
            if expirable.is_expired_at(now) {
                return Err(CoreError::ExpiredProduct {
                    product: product.name.clone(),
                    expired_at: expirable.expiry_date(),
                });
            }
        }

        let slot = locked.slots[index];
        let wanted = claimed[slot].checked_add(item.quantity());
        match wanted {
            Some(wanted) if product.can_supply(wanted) => claimed[slot] = wanted,
            _ => {
                return Err(CoreError::InsufficientStock {
                    product: product.name.clone(),
                    available: product.stock_quantity - claimed[slot],
                    requested: item.quantity(),
                });
            }
        }
    }

    Ok(())
}

/// Subtotal, shipping, total, and the notice and receipt lines.
fn price(
    items: &[CartItem],
    locked: &LockedProducts<'_>,
    shipping_rate: ShippingRate,
) -> CoreResult<PricedOrder> {
    let mut subtotal = Money::zero();
    let mut notice = ShipmentNotice::default();
    let mut receipt = Receipt::default();

    for (index, item) in items.iter().enumerate() {
        let product = locked.product(index);
        let line_total = product.line_total(item.quantity())?;
        subtotal = subtotal
            .checked_add(line_total)
            .ok_or_else(|| CoreError::AmountOverflow("order subtotal".to_string()))?;

        if let Some(shippable) = product.as_shippable() {
            notice.push(ShipmentLine {
                name: shippable.name().to_string(),
                quantity: item.quantity(),
                total_grams: shippable
                    .shipping_weight()
                    .grams_for_quantity(item.quantity()),
            });
        }

        receipt.lines.push(ReceiptLine {
            name: product.name.clone(),
            quantity: item.quantity(),
            line_total,
        });
    }

    let shipping = shipping_rate.cost_for_grams(notice.total_grams);
    let total = subtotal
        .checked_add(shipping)
        .ok_or_else(|| CoreError::AmountOverflow("order total".to_string()))?;

    Ok(PricedOrder {
        subtotal,
        shipping,
        total,
        notice,
        receipt,
    })
}

/// Balance check, then the only mutations of the transaction.
///
/// Runs after `validate`, so every decrement stays within stock.
fn settle(
    items: &[CartItem],
    locked: &mut LockedProducts<'_>,
    balance: &mut Money,
    total: Money,
) -> CoreResult<()> {
    if *balance < total {
        return Err(CoreError::InsufficientBalance {
            balance: *balance,
            required: total,
        });
    }
    let remaining = balance
        .checked_sub(total)
        .ok_or_else(|| CoreError::AmountOverflow("remaining balance".to_string()))?;

    for (index, item) in items.iter().enumerate() {
        locked.product_mut(index).stock_quantity -= item.quantity();
    }
    *balance = remaining;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
