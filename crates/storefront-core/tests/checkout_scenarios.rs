//! End-to-end checkout scenarios against the public API.

use std::sync::{Arc, Barrier};
use std::thread;

use chrono::{Duration, Utc};
use storefront_core::{
    CheckoutOptions, CoreError, Customer, Money, NoopReporter, Product, ProductHandle,
    RecordingReporter, ReportEvent, Weight,
};

fn cheese(stock: i64) -> ProductHandle {
    ProductHandle::new(
        Product::new("Cheese", Money::from_cents(10000), stock)
            .unwrap()
            .with_expiry(Utc::now() + Duration::days(2))
            .with_weight(Weight::from_grams(400.0).unwrap()),
    )
}

fn tv(stock: i64) -> ProductHandle {
    ProductHandle::new(Product::new("TV", Money::from_cents(15000), stock).unwrap())
}

fn alice(balance_cents: i64) -> Customer {
    Customer::new("Alice", Money::from_cents(balance_cents)).unwrap()
}

#[test]
fn add_product_checks_stock() {
    let mut customer = alice(50000);
    let two_left = cheese(2);
    let one_left = tv(1);

    customer.cart_mut().add_product(&two_left, 2).unwrap();
    let err = customer.cart_mut().add_product(&one_left, 3).unwrap_err();

    assert!(matches!(err, CoreError::InsufficientStock { .. }));
    assert_eq!(customer.cart().len(), 1);
}

#[test]
fn shippable_item_pricing() {
    let mut customer = alice(50000);
    customer.cart_mut().add_product(&cheese(2), 2).unwrap();

    let order = customer.checkout(&mut NoopReporter).unwrap();

    assert_eq!(order.summary.subtotal, Money::from_cents(20000));
    assert_eq!(order.summary.shipping, Money::from_cents(1600));
    assert_eq!(order.summary.total_paid, Money::from_cents(21600));
}

#[test]
fn mixed_cart_settles_balance_and_stock() {
    let cheese = cheese(2);
    let tv = tv(3);
    let mut customer = alice(50000);
    customer.cart_mut().add_product(&cheese, 2).unwrap();
    customer.cart_mut().add_product(&tv, 1).unwrap();

    let mut reporter = RecordingReporter::new();
    let order = customer.checkout(&mut reporter).unwrap();

    assert_eq!(order.summary.subtotal, Money::from_cents(35000));
    assert_eq!(order.summary.shipping, Money::from_cents(1600));
    assert_eq!(order.summary.total_paid, Money::from_cents(36600));
    assert_eq!(order.summary.remaining_balance, Money::from_cents(13400));
    assert_eq!(customer.balance(), Money::from_cents(13400));

    assert_eq!(cheese.stock_quantity(), 0);
    assert_eq!(tv.stock_quantity(), 2);
    assert!(customer.cart().is_empty());

    // Only the cheese ships
    assert_eq!(order.notice.lines.len(), 1);
    assert_eq!(order.notice.total_grams, 800.0);
    assert_eq!(order.receipt.lines.len(), 2);

    let text = reporter.render();
    assert!(text.contains("- 2x Cheese (800 g)"));
    assert!(text.contains("Total package weight 0.8kg"));
    assert!(text.contains("- 1x TV $150.00"));
    assert!(text.contains("Remaining Balance: $134.00"));
}

#[test]
fn empty_cart_changes_nothing() {
    let mut customer = alice(50000);
    let mut reporter = RecordingReporter::new();

    let err = customer.checkout(&mut reporter).unwrap_err();

    assert!(matches!(err, CoreError::EmptyCart));
    assert_eq!(customer.balance(), Money::from_cents(50000));
    assert!(reporter.events.is_empty());
}

#[test]
fn product_expiring_after_add_fails_checkout() {
    let cheese = cheese(2);
    let mut customer = alice(50000);
    customer.cart_mut().add_product(&cheese, 1).unwrap();

    cheese.with_product_mut(|p| p.expiry_date = Some(Utc::now() - Duration::hours(1)));
    let err = customer.checkout(&mut NoopReporter).unwrap_err();

    match err {
        CoreError::ExpiredProduct { product, .. } => assert_eq!(product, "Cheese"),
        other => panic!("expected ExpiredProduct, got {other}"),
    }
    assert_eq!(cheese.stock_quantity(), 2);
    assert_eq!(customer.balance(), Money::from_cents(50000));
    assert_eq!(customer.cart().len(), 1);
}

#[test]
fn stock_sold_elsewhere_fails_checkout() {
    let tv = tv(2);
    let mut customer = alice(50000);
    let mut other = Customer::new("Bob", Money::from_cents(50000)).unwrap();

    customer.cart_mut().add_product(&tv, 2).unwrap();
    other.cart_mut().add_product(&tv, 1).unwrap();
    other.checkout(&mut NoopReporter).unwrap();

    let err = customer.checkout(&mut NoopReporter).unwrap_err();

    assert!(matches!(
        err,
        CoreError::InsufficientStock {
            available: 1,
            requested: 2,
            ..
        }
    ));
    assert_eq!(tv.stock_quantity(), 1);
    assert_eq!(customer.balance(), Money::from_cents(50000));
}

#[test]
fn insufficient_balance_changes_nothing() {
    let cheese = cheese(2);
    let tv = tv(1);
    let mut customer = alice(20000);
    customer.cart_mut().add_product(&cheese, 2).unwrap();
    customer.cart_mut().add_product(&tv, 1).unwrap();

    let mut reporter = RecordingReporter::new();
    let err = customer.checkout(&mut reporter).unwrap_err();

    match err {
        CoreError::InsufficientBalance { balance, required } => {
            assert_eq!(balance, Money::from_cents(20000));
            assert_eq!(required, Money::from_cents(36600));
        }
        other => panic!("expected InsufficientBalance, got {other}"),
    }
    assert_eq!(cheese.stock_quantity(), 2);
    assert_eq!(tv.stock_quantity(), 1);
    assert_eq!(customer.balance(), Money::from_cents(20000));
    assert_eq!(customer.cart().len(), 2);
    assert!(!reporter
        .events
        .iter()
        .any(|event| matches!(event, ReportEvent::Summary(_))));
}

#[test]
fn non_shippable_cart_has_no_shipping() {
    let mut customer = alice(50000);
    customer.cart_mut().add_product(&tv(3), 3).unwrap();

    let order = customer.checkout(&mut NoopReporter).unwrap();

    assert!(order.summary.shipping.is_zero());
    assert!(order.notice.is_empty());
    assert_eq!(order.summary.total_paid, order.summary.subtotal);
}

#[test]
fn exact_balance_is_enough() {
    let mut customer = alice(21600);
    customer.cart_mut().add_product(&cheese(2), 2).unwrap();

    let order = customer.checkout(&mut NoopReporter).unwrap();

    assert!(order.summary.remaining_balance.is_zero());
    assert!(!customer.balance().is_negative());
}

#[test]
fn checkout_is_not_repeatable() {
    let mut customer = alice(50000);
    customer.cart_mut().add_product(&tv(1), 1).unwrap();

    customer.checkout(&mut NoopReporter).unwrap();
    let balance = customer.balance();

    assert!(matches!(
        customer.checkout(&mut NoopReporter),
        Err(CoreError::EmptyCart)
    ));
    assert_eq!(customer.balance(), balance);
}

#[test]
fn concurrent_checkouts_never_oversell() {
    let last_one = tv(1);
    let barrier = Arc::new(Barrier::new(2));

    let workers: Vec<_> = ["Alice", "Bob"]
        .into_iter()
        .map(|name| {
            let product = last_one.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let mut customer = Customer::new(name, Money::from_cents(50000)).unwrap();
                customer.cart_mut().add_product(&product, 1).unwrap();
                barrier.wait();
                customer
                    .checkout_at(Utc::now(), &CheckoutOptions::default(), &mut NoopReporter)
                    .is_ok()
            })
        })
        .collect();

    let settled = workers
        .into_iter()
        .map(|worker| worker.join().unwrap())
        .filter(|ok| *ok)
        .count();

    assert_eq!(settled, 1);
    assert_eq!(last_one.stock_quantity(), 0);
}

#[test]
fn carts_locking_products_in_opposite_order_both_finish() {
    let candy = ProductHandle::new(Product::new("Candy", Money::from_cents(200), 1000).unwrap());
    let gum = ProductHandle::new(Product::new("Gum", Money::from_cents(100), 1000).unwrap());

    let workers: Vec<_> = (0..2)
        .map(|n| {
            let (first, second) = if n == 0 {
                (candy.clone(), gum.clone())
            } else {
                (gum.clone(), candy.clone())
            };
            thread::spawn(move || {
                for _ in 0..100 {
                    let mut customer =
                        Customer::new("Shopper", Money::from_cents(100_000)).unwrap();
                    customer.cart_mut().add_product(&first, 1).unwrap();
                    customer.cart_mut().add_product(&second, 1).unwrap();
                    customer.checkout(&mut NoopReporter).unwrap();
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(candy.stock_quantity(), 800);
    assert_eq!(gum.stock_quantity(), 800);
}

#[test]
fn completed_order_serializes() {
    let mut customer = alice(50000);
    customer.cart_mut().add_product(&cheese(2), 2).unwrap();

    let order = customer.checkout(&mut NoopReporter).unwrap();
    let json = serde_json::to_value(&order).unwrap();

    assert_eq!(json["customer"], "Alice");
    assert_eq!(json["summary"]["total_paid"], 21600);
    assert_eq!(json["notice"]["lines"][0]["name"], "Cheese");
}
