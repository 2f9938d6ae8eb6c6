use super::*;
use std::{cell::RefCell, time::Duration};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{
    domain::Product,
    error::OrderRejection,
};

use crate::order::ORDER_PLACED_MESSAGE;

struct StaticSource(Vec<Product>);

#[async_trait]
impl CatalogSource for StaticSource {
    async fn fetch_products(&self) -> Result<Vec<Product>> {
        Ok(self.0.clone())
    }
}

struct FailingSource;

#[async_trait]
impl CatalogSource for FailingSource {
    async fn fetch_products(&self) -> Result<Vec<Product>> {
        Err(anyhow!("connection refused"))
    }
}

#[derive(Default)]
struct RecordingNotifier {
    alerts: RefCell<Vec<String>>,
}

impl RecordingNotifier {
    fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }
}

fn flower(id: i64, name: &str, color: &str, price: f64) -> Product {
    Product {
        id: ProductId::from(id),
        name: name.into(),
        color: color.into(),
        scent: "sweet".into(),
        price,
        image: format!("{}.png", name.to_ascii_lowercase()),
    }
}

fn rose() -> Product {
    flower(1, "Rose", "red", 2.5)
}

async fn loaded(products: Vec<Product>) -> Storefront {
    let mut storefront = Storefront::default();
    let redraw = storefront.load_catalog(&StaticSource(products)).await;
    assert_eq!(redraw, Redraw::All);
    storefront
}

#[tokio::test]
async fn quantity_change_updates_cart_summary() {
    let mut storefront = loaded(vec![rose()]).await;

    let redraw = storefront
        .set_quantity(&ProductId::from(1), "3")
        .expect("visible product");
    assert_eq!(redraw, Redraw::CartSummary);

    let summary = storefront.cart_summary().expect("summary");
    assert_eq!(summary.lines, vec!["Rose x 3 = $7.50".to_string()]);
    assert_eq!(summary.total, "Total: $7.50");
}

#[tokio::test]
async fn zero_quantity_leaves_no_entry() {
    let mut storefront = loaded(vec![rose()]).await;
    let id = ProductId::from(1);

    storefront.set_quantity(&id, "2").expect("set");
    storefront.set_quantity(&id, "0").expect("clear");

    assert!(storefront.cart().is_empty());
    assert!(storefront.cart_summary().expect("summary").is_empty());
}

#[tokio::test]
async fn quantity_for_hidden_or_unknown_product_is_refused() {
    let mut storefront = loaded(vec![rose(), flower(2, "Lily", "white", 3.0)]).await;
    storefront.change_filter(ColorFilter::Color("red".into()));

    assert_eq!(
        storefront.set_quantity(&ProductId::from(2), "1"),
        Err(StoreError::UnknownProduct(ProductId::from(2)))
    );
    assert_eq!(
        storefront.set_quantity(&ProductId::from(77), "1"),
        Err(StoreError::UnknownProduct(ProductId::from(77)))
    );
    assert!(storefront.cart().is_empty());
}

#[tokio::test]
async fn filter_change_always_clears_cart() {
    let mut storefront = loaded(vec![rose(), flower(2, "Lily", "white", 3.0)]).await;

    for filter in ["red", "all", "white", "all"] {
        let filter: ColorFilter = filter.parse().expect("filter");
        let visible = storefront
            .catalog()
            .filtered(&filter)
            .map(|product| product.id.clone())
            .next()
            .expect("at least one product per color");

        storefront.change_filter(ColorFilter::All);
        storefront.set_quantity(&visible, "2").expect("set");
        assert!(!storefront.cart().is_empty());

        assert_eq!(storefront.change_filter(filter.clone()), Redraw::All);
        assert!(storefront.cart().is_empty());
        assert_eq!(storefront.filter(), &filter);

        let summary = storefront.cart_summary().expect("summary");
        assert!(summary.is_empty());
        assert_eq!(summary.total, "Total: $0.00");
    }
}

#[tokio::test]
async fn filter_restricts_catalog_view() {
    let mut storefront = loaded(vec![rose(), flower(2, "Lily", "white", 3.0)]).await;
    storefront.change_filter(ColorFilter::Color("red".into()));

    let CatalogView::Cards(cards) = storefront.catalog_view() else {
        panic!("expected cards");
    };
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].name, "Rose");
}

#[tokio::test]
async fn failed_load_shows_error_view_and_stays_usable() {
    let mut storefront = Storefront::default();
    let redraw = storefront.load_catalog(&FailingSource).await;

    assert_eq!(redraw, Redraw::All);
    assert!(storefront.load_failed());
    assert!(storefront.catalog().is_empty());
    assert_eq!(
        storefront.catalog_view(),
        CatalogView::LoadError(CATALOG_LOAD_ERROR)
    );
    assert!(storefront.cart_summary().expect("summary").is_empty());

    let notifier = RecordingNotifier::default();
    let err = storefront.submit_order(&notifier).expect_err("empty cart");
    assert_eq!(err, OrderError::Rejected(OrderRejection::EmptyCart));
}

#[tokio::test]
async fn invalid_catalog_counts_as_failed_load() {
    let mut storefront = Storefront::default();
    storefront
        .load_catalog(&StaticSource(vec![rose(), rose()]))
        .await;

    assert!(storefront.load_failed());
    assert!(storefront.catalog().is_empty());
}

#[tokio::test]
async fn catalog_replace_drops_cart_and_filter() {
    let mut storefront = loaded(vec![rose()]).await;
    storefront.change_filter(ColorFilter::Color("red".into()));
    storefront.set_quantity(&ProductId::from(1), "1").expect("set");

    let catalog = Catalog::from_products(vec![flower(5, "Tulip", "yellow", 1.0)]).expect("catalog");
    assert_eq!(storefront.replace_catalog(catalog), Redraw::All);

    assert!(storefront.cart().is_empty());
    assert_eq!(storefront.filter(), &ColorFilter::All);
    assert!(!storefront.load_failed());
}

#[tokio::test]
async fn filter_options_start_with_all() {
    let storefront = loaded(vec![
        flower(1, "Rose", "red", 1.0),
        flower(2, "Lily", "white", 1.0),
        flower(3, "Poppy", "red", 1.0),
    ])
    .await;

    assert_eq!(storefront.filter_options(), vec!["all", "red", "white"]);
}

#[tokio::test]
async fn empty_cart_submission_is_rejected() {
    let mut storefront = loaded(vec![rose()]).await;
    storefront.set_customer_name("Ana");
    storefront.set_customer_location("Lagos");

    let notifier = RecordingNotifier::default();
    let err = storefront.submit_order(&notifier).expect_err("rejected");

    assert_eq!(err, OrderError::Rejected(OrderRejection::EmptyCart));
    assert_eq!(
        notifier.alerts(),
        vec!["Your cart is empty! Please add flowers before ordering.".to_string()]
    );
    assert_eq!(storefront.phase(), OrderPhase::Idle);
    assert_eq!(storefront.form().name, "Ana");
    assert!(!storefront.banner().is_visible());
}

#[tokio::test]
async fn blank_customer_fields_are_rejected_without_side_effects() {
    let mut storefront = loaded(vec![rose()]).await;
    storefront.set_quantity(&ProductId::from(1), "2").expect("set");

    for (name, location) in [("", "Lagos"), ("   ", "Lagos"), ("Ana", ""), ("Ana", " \t ")] {
        storefront.set_customer_name(name);
        storefront.set_customer_location(location);

        let notifier = RecordingNotifier::default();
        let err = storefront.submit_order(&notifier).expect_err("rejected");

        assert_eq!(
            err,
            OrderError::Rejected(OrderRejection::MissingCustomerDetails)
        );
        assert_eq!(
            notifier.alerts(),
            vec!["Please fill in your name and location.".to_string()]
        );
        assert_eq!(storefront.cart().quantity(&ProductId::from(1)), 2);
        assert_eq!(storefront.form().name, name);
        assert_eq!(storefront.form().location, location);
        assert_eq!(storefront.phase(), OrderPhase::Idle);
    }
}

#[tokio::test(start_paused = true)]
async fn successful_order_confirms_clears_and_dismisses_banner() {
    let mut storefront = loaded(vec![rose()]).await;
    storefront.set_quantity(&ProductId::from(1), "2").expect("set");
    storefront.set_customer_name("Ana");
    storefront.set_customer_location("Lagos");

    let notifier = RecordingNotifier::default();
    let confirmation = storefront.submit_order(&notifier).expect("confirmed");

    assert_eq!(confirmation.name, "Ana");
    assert_eq!(confirmation.location, "Lagos");
    let alerts = notifier.alerts();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].contains("Ana"));
    assert!(alerts[0].contains("Lagos"));
    assert!(alerts[0].contains("- Rose x 2"));
    assert_eq!(alerts[0], confirmation.summary);

    assert_eq!(storefront.phase(), OrderPhase::Confirmed);
    assert!(storefront.cart().is_empty());
    assert!(storefront.cart_summary().expect("summary").is_empty());
    assert_eq!(storefront.form(), &OrderForm::default());
    assert_eq!(storefront.banner().message(), Some(ORDER_PLACED_MESSAGE));

    tokio::time::sleep(Duration::from_secs(4)).await;
    assert!(storefront.banner().is_visible());

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(!storefront.banner().is_visible());
}

#[tokio::test(start_paused = true)]
async fn earlier_banner_timer_still_fires_after_resubmission() {
    let mut storefront = loaded(vec![rose()]).await;
    let notifier = RecordingNotifier::default();

    storefront.set_quantity(&ProductId::from(1), "1").expect("set");
    storefront.set_customer_name("Ana");
    storefront.set_customer_location("Lagos");
    storefront.submit_order(&notifier).expect("first order");

    tokio::time::sleep(Duration::from_secs(3)).await;

    storefront.set_quantity(&ProductId::from(1), "1").expect("set");
    storefront.set_customer_name("Ben");
    storefront.set_customer_location("Accra");
    storefront.submit_order(&notifier).expect("second order");
    assert!(storefront.banner().is_visible());

    // first timer fires at 5s and hides the banner the second order showed
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(!storefront.banner().is_visible());

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(!storefront.banner().is_visible());
}

#[tokio::test]
async fn customer_fields_are_trimmed_in_confirmation() {
    let mut storefront = Storefront::new(Duration::from_millis(10));
    storefront.replace_catalog(Catalog::from_products(vec![rose()]).expect("catalog"));
    storefront.set_quantity(&ProductId::from(1), "1").expect("set");
    storefront.set_customer_name("  Ana ");
    storefront.set_customer_location(" Lagos\n");

    let notifier = RecordingNotifier::default();
    let confirmation = storefront.submit_order(&notifier).expect("confirmed");
    assert!(confirmation
        .summary
        .starts_with("Thank you, Ana! Your order will be delivered to Lagos."));
}

#[tokio::test]
async fn submit_never_leaves_phase_validating() {
    let mut storefront = loaded(vec![rose()]).await;
    let notifier = RecordingNotifier::default();
    assert_eq!(storefront.phase(), OrderPhase::Idle);

    storefront.submit_order(&notifier).expect_err("empty cart");
    assert_eq!(storefront.phase(), OrderPhase::Idle);

    storefront.set_quantity(&ProductId::from(1), "1").expect("set");
    storefront.set_customer_name("Ana");
    storefront.set_customer_location("Lagos");
    storefront.submit_order(&notifier).expect("placed");
    assert_eq!(storefront.phase(), OrderPhase::Confirmed);

    storefront.submit_order(&notifier).expect_err("cart emptied by the order");
    assert_eq!(storefront.phase(), OrderPhase::Idle);
}
