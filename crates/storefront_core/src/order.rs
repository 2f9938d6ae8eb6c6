use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use shared::error::{OrderRejection, StoreError};
use tracing::{debug, warn};

use crate::{cart::Cart, catalog::Catalog};

pub const ORDER_PLACED_MESSAGE: &str = "Order placed successfully! 🌸";
pub const DEFAULT_BANNER_DISMISS: Duration = Duration::from_secs(5);

/// Blocking "show message, wait for acknowledgment" capability.
pub trait Notifier {
    fn alert(&self, message: &str);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderForm {
    pub name: String,
    pub location: String,
}

impl OrderForm {
    pub fn reset(&mut self) {
        self.name.clear();
        self.location.clear();
    }
}

/// Where the last submission ended up. `Validating` only lasts for the
/// duration of one submit call; callers see `Idle` after a rejection and
/// `Confirmed` after a placed order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderPhase {
    #[default]
    Idle,
    Validating,
    Confirmed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    pub name: String,
    pub location: String,
    pub summary: String,
}

/// Checks run in order: cart first, then customer fields.
pub fn validate_order(cart: &Cart, form: &OrderForm) -> Result<(), OrderRejection> {
    if cart.is_empty() {
        return Err(OrderRejection::EmptyCart);
    }
    if form.name.trim().is_empty() || form.location.trim().is_empty() {
        return Err(OrderRejection::MissingCustomerDetails);
    }
    Ok(())
}

pub fn compose_order_summary(
    name: &str,
    location: &str,
    cart: &Cart,
    catalog: &Catalog,
) -> Result<String, StoreError> {
    let mut summary = format!(
        "Thank you, {name}! Your order will be delivered to {location}.\n\nOrder details:\n"
    );
    for (id, quantity) in cart.iter() {
        let product = catalog
            .get(id)
            .ok_or_else(|| StoreError::UnknownProduct(id.clone()))?;
        summary.push_str(&format!("- {} x {}\n", product.name, quantity));
    }
    Ok(summary)
}

/// Transient success banner. Each `show` arms its own single-shot timer;
/// timers are never cancelled and hiding twice is harmless.
#[derive(Debug, Clone, Default)]
pub struct Banner {
    visible: Arc<AtomicBool>,
}

impl Banner {
    pub fn message(&self) -> Option<&'static str> {
        self.is_visible().then_some(ORDER_PLACED_MESSAGE)
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    pub fn hide(&self) {
        self.visible.store(false, Ordering::SeqCst);
    }

    pub fn show(&self, dismiss_after: Duration) {
        self.visible.store(true, Ordering::SeqCst);

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("banner: no async runtime available; banner stays until hidden manually");
            return;
        };
        let visible = Arc::clone(&self.visible);
        runtime.spawn(async move {
            tokio::time::sleep(dismiss_after).await;
            visible.store(false, Ordering::SeqCst);
            debug!("banner: dismissed");
        });
    }
}
