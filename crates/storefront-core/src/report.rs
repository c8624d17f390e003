//! # Checkout Reports
//!
//! The documents a checkout produces, and the sink they are handed to.
//!
//! ## Report Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  checkout                                                               │
//! │     │                                                                   │
//! │     ├──► ShipmentNotice ──┐                                             │
//! │     ├──► Receipt ─────────┼──► CheckoutReporter (console, JSON, tests)  │
//! │     └──► CheckoutSummary ─┘                                             │
//! │                                                                         │
//! │  All three are also returned in the CompletedOrder.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Display` renders the console text. The wording is for humans; nothing
//! parses it, so the serialized form is the stable one.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Money;

const RECEIPT_SEPARATOR: &str = "----------------------";

// =============================================================================
// Shipment Notice
// =============================================================================

/// One shippable line: quantity, name, and combined weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentLine {
    pub name: String,
    pub quantity: i64,
    /// Unit weight × quantity.
    pub total_grams: f64,
}

/// Everything that has to go in the package.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShipmentNotice {
    pub lines: Vec<ShipmentLine>,
    pub total_grams: f64,
}

impl ShipmentNotice {
    pub fn push(&mut self, line: ShipmentLine) {
        self.total_grams += line.total_grams;
        self.lines.push(line);
    }

    pub fn total_kilograms(&self) -> f64 {
        self.total_grams / 1000.0
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for ShipmentNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "** Shipment notice **")?;
        for line in &self.lines {
            writeln!(
                f,
                "- {}x {} ({} g)",
                line.quantity,
                line.name,
                Grams(line.total_grams)
            )?;
        }
        write!(f, "Total package weight {:.1}kg", self.total_kilograms())
    }
}

/// Grams to a tenth of a gram, without a trailing `.0` for whole amounts.
struct Grams(f64);

impl fmt::Display for Grams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tenths = (self.0 * 10.0).round() / 10.0;
        if tenths.fract() == 0.0 {
            write!(f, "{tenths:.0}")
        } else {
            write!(f, "{tenths:.1}")
        }
    }
}

// =============================================================================
// Receipt
// =============================================================================

/// One receipt line per cart item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: i64,
    pub line_total: Money,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Receipt {
    pub lines: Vec<ReceiptLine>,
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "** Checkout receipt **")?;
        for line in &self.lines {
            writeln!(f, "- {}x {} {}", line.quantity, line.name, line.line_total)?;
        }
        write!(f, "{RECEIPT_SEPARATOR}")
    }
}

// =============================================================================
// Summary
// =============================================================================

/// Final money figures of a settled checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSummary {
    pub subtotal: Money,
    pub shipping: Money,
    pub total_paid: Money,
    pub remaining_balance: Money,
}

impl fmt::Display for CheckoutSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Subtotal: {}", self.subtotal)?;
        writeln!(f, "Shipping: {}", self.shipping)?;
        writeln!(f, "Total Paid: {}", self.total_paid)?;
        write!(f, "Remaining Balance: {}", self.remaining_balance)
    }
}

// =============================================================================
// Completed Order
// =============================================================================

/// The result of a successful checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedOrder {
    pub id: Uuid,
    pub customer: String,
    pub notice: ShipmentNotice,
    pub receipt: Receipt,
    pub summary: CheckoutSummary,
    pub completed_at: DateTime<Utc>,
}

// =============================================================================
// Reporter
// =============================================================================

/// Receives checkout documents as they are produced.
///
/// When notice and receipt arrive relative to the balance check depends on
/// [`ReportTiming`](crate::checkout::ReportTiming). The summary only ever
/// arrives for a settled order.
pub trait CheckoutReporter {
    fn shipment_notice(&mut self, notice: &ShipmentNotice);

    fn receipt(&mut self, receipt: &Receipt);

    fn summary(&mut self, summary: &CheckoutSummary);
}

/// Discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl CheckoutReporter for NoopReporter {
    fn shipment_notice(&mut self, _notice: &ShipmentNotice) {}

    fn receipt(&mut self, _receipt: &Receipt) {}

    fn summary(&mut self, _summary: &CheckoutSummary) {}
}

/// A report, as seen by [`RecordingReporter`].
#[derive(Debug, Clone, PartialEq)]
pub enum ReportEvent {
    ShipmentNotice(ShipmentNotice),
    Receipt(Receipt),
    Summary(CheckoutSummary),
}

/// Keeps every report in arrival order.
#[derive(Debug, Clone, Default)]
pub struct RecordingReporter {
    pub events: Vec<ReportEvent>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders every recorded report, one block per report.
    pub fn render(&self) -> String {
        self.events
            .iter()
            .map(|event| match event {
                ReportEvent::ShipmentNotice(notice) => notice.to_string(),
                ReportEvent::Receipt(receipt) => receipt.to_string(),
                ReportEvent::Summary(summary) => summary.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl CheckoutReporter for RecordingReporter {
    fn shipment_notice(&mut self, notice: &ShipmentNotice) {
        self.events.push(ReportEvent::ShipmentNotice(notice.clone()));
    }

    fn receipt(&mut self, receipt: &Receipt) {
        self.events.push(ReportEvent::Receipt(receipt.clone()));
    }

    fn summary(&mut self, summary: &CheckoutSummary) {
        self.events.push(ReportEvent::Summary(*summary));
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn notice() -> ShipmentNotice {
        let mut notice = ShipmentNotice::default();
        notice.push(ShipmentLine {
            name: "Cheese".to_string(),
            quantity: 2,
            total_grams: 800.0,
        });
        notice.push(ShipmentLine {
            name: "Biscuits".to_string(),
            quantity: 1,
            total_grams: 700.0,
        });
        notice
    }

    #[test]
    fn test_notice_totals() {
        let notice = notice();
        assert_eq!(notice.total_grams, 1500.0);
        assert_eq!(notice.total_kilograms(), 1.5);
        assert!(!notice.is_empty());
        assert!(ShipmentNotice::default().is_empty());
    }

    #[test]
    fn test_notice_display() {
        assert_eq!(
            notice().to_string(),
            "** Shipment notice **\n\
             - 2x Cheese (800 g)\n\
             - 1x Biscuits (700 g)\n\
             Total package weight 1.5kg"
        );
        assert_eq!(
            ShipmentNotice::default().to_string(),
            "** Shipment notice **\nTotal package weight 0.0kg"
        );
    }

    #[test]
    fn test_notice_display_rounds_fractional_grams() {
        let mut notice = ShipmentNotice::default();
        notice.push(ShipmentLine {
            name: "Tea".to_string(),
            quantity: 3,
            total_grams: 333.3 * 3.0,
        });
        notice.push(ShipmentLine {
            name: "Salt".to_string(),
            quantity: 1,
            total_grams: 0.1 + 0.2,
        });

        assert_eq!(
            notice.to_string(),
            "** Shipment notice **\n\
             - 3x Tea (999.9 g)\n\
             - 1x Salt (0.3 g)\n\
             Total package weight 1.0kg"
        );
    }

    #[test]
    fn test_receipt_display() {
        let receipt = Receipt {
            lines: vec![ReceiptLine {
                name: "Cheese".to_string(),
                quantity: 2,
                line_total: Money::from_cents(20000),
            }],
        };
        assert_eq!(
            receipt.to_string(),
            "** Checkout receipt **\n- 2x Cheese $200.00\n----------------------"
        );
    }

    #[test]
    fn test_summary_display() {
        let summary = CheckoutSummary {
            subtotal: Money::from_cents(35000),
            shipping: Money::from_cents(1600),
            total_paid: Money::from_cents(36600),
            remaining_balance: Money::from_cents(13400),
        };
        assert_eq!(
            summary.to_string(),
            "Subtotal: $350.00\n\
             Shipping: $16.00\n\
             Total Paid: $366.00\n\
             Remaining Balance: $134.00"
        );
    }

    #[test]
    fn test_recording_reporter_keeps_order() {
        let mut reporter = RecordingReporter::new();
        reporter.receipt(&Receipt::default());
        reporter.shipment_notice(&ShipmentNotice::default());

        assert!(matches!(reporter.events[0], ReportEvent::Receipt(_)));
        assert!(matches!(reporter.events[1], ReportEvent::ShipmentNotice(_)));
        assert!(reporter.render().starts_with("** Checkout receipt **"));
    }

    #[test]
    fn test_summary_serializes_cents() {
        let summary = CheckoutSummary {
            subtotal: Money::from_cents(20000),
            shipping: Money::from_cents(1600),
            total_paid: Money::from_cents(21600),
            remaining_balance: Money::from_cents(0),
        };
        let json = serde_json::to_value(summary).unwrap();
        assert_eq!(json["total_paid"], 21600);
        assert_eq!(json["shipping"], 1600);
    }
}
