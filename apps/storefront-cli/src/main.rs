//! # Storefront CLI Entry Point
//!
//! Runs the demo checkout scenario against `storefront-core`.
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load configuration from the environment
//! 3. Build the catalog and the customer
//! 4. Fill the cart and check out
//! 5. Print the reports (text) or the completed order (JSON)

mod config;
mod console;
mod scenario;

use std::process::ExitCode;

use chrono::Utc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use storefront_core::{CheckoutReporter, Customer, Money, NoopReporter};

use crate::config::{OutputFormat, StorefrontConfig};
use crate::console::ConsoleReporter;
use crate::scenario::Catalog;

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    init_tracing();

    let config = StorefrontConfig::load()?;
    info!(?config, "Configuration loaded");

    let now = Utc::now();
    let catalog = Catalog::new(now)?;
    if config.output == OutputFormat::Text {
        for product in catalog.products() {
            println!("{product}");
        }
    }

    let mut customer = Customer::new("Alice", Money::from_cents(config.customer_balance_cents))?;

    let mut console = ConsoleReporter;
    let mut silent = NoopReporter;
    let reporter: &mut dyn CheckoutReporter = match config.output {
        OutputFormat::Text => &mut console,
        OutputFormat::Json => &mut silent,
    };

    match scenario::run(
        &catalog,
        &mut customer,
        now,
        &config.checkout_options(),
        reporter,
    ) {
        Ok(order) => {
            if config.output == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&order)?);
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            error!(error = %err, "Checkout failed");
            println!("{err}");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=storefront_core=trace` - Show trace for the core only
/// - Default: INFO, DEBUG for storefront crates
///
/// Logs go to stderr so stdout stays clean for receipts and JSON.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,storefront_core=debug,storefront=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
