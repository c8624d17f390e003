//! Prints checkout reports to stdout.

use storefront_core::{CheckoutReporter, CheckoutSummary, Receipt, ShipmentNotice};

/// Writes each report as console text the moment it arrives.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl CheckoutReporter for ConsoleReporter {
    fn shipment_notice(&mut self, notice: &ShipmentNotice) {
        println!("{notice}");
    }

    fn receipt(&mut self, receipt: &Receipt) {
        println!("{receipt}");
    }

    fn summary(&mut self, summary: &CheckoutSummary) {
        println!("{summary}");
    }
}
