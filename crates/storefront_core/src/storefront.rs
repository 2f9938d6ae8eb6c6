//! Session controller: owns catalog, cart, filter and order form, and exposes
//! one handler per UI action. Handlers mutate state and tell the caller what
//! to redraw.

use std::time::Duration;

use shared::{
    domain::{ColorFilter, ProductId},
    error::{OrderError, StoreError},
};
use tracing::{debug, error, info, warn};

use crate::{
    cart::Cart,
    catalog::{Catalog, CatalogSource},
    order::{
        compose_order_summary, validate_order, Banner, Notifier, OrderConfirmation, OrderForm,
        OrderPhase, DEFAULT_BANNER_DISMISS,
    },
    render::{render_cart_summary, render_catalog, CartSummaryView, CatalogView, CATALOG_LOAD_ERROR},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    CartSummary,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CatalogStatus {
    NotLoaded,
    Loaded,
    Failed,
}

#[derive(Debug)]
pub struct Storefront {
    catalog: Catalog,
    status: CatalogStatus,
    filter: ColorFilter,
    cart: Cart,
    form: OrderForm,
    phase: OrderPhase,
    banner: Banner,
    banner_dismiss: Duration,
}

impl Default for Storefront {
    fn default() -> Self {
        Self::new(DEFAULT_BANNER_DISMISS)
    }
}

impl Storefront {
    pub fn new(banner_dismiss: Duration) -> Self {
        Self {
            catalog: Catalog::default(),
            status: CatalogStatus::NotLoaded,
            filter: ColorFilter::All,
            cart: Cart::new(),
            form: OrderForm::default(),
            phase: OrderPhase::Idle,
            banner: Banner::default(),
            banner_dismiss,
        }
    }

    /// Single best-effort fetch. Failures are logged and leave an empty
    /// catalog behind an error view; the session stays usable.
    pub async fn load_catalog(&mut self, source: &dyn CatalogSource) -> Redraw {
        let loaded = source.fetch_products().await.and_then(|products| {
            Catalog::from_products(products).map_err(anyhow::Error::from)
        });

        match loaded {
            Ok(catalog) => {
                info!(products = catalog.len(), "catalog: loaded");
                self.replace_catalog(catalog)
            }
            Err(err) => {
                error!("catalog: load failed: {err:#}");
                self.catalog = Catalog::default();
                self.status = CatalogStatus::Failed;
                self.filter = ColorFilter::All;
                self.cart.clear();
                Redraw::All
            }
        }
    }

    /// Full replace. The cart is dropped with the old catalog so no entry can
    /// point at a product that no longer exists.
    pub fn replace_catalog(&mut self, catalog: Catalog) -> Redraw {
        self.catalog = catalog;
        self.status = CatalogStatus::Loaded;
        self.filter = ColorFilter::All;
        self.cart.clear();
        Redraw::All
    }

    /// Quantity-change handler. Only products in the current view accept
    /// input.
    pub fn set_quantity(&mut self, id: &ProductId, raw: &str) -> Result<Redraw, StoreError> {
        let visible = self
            .catalog
            .get(id)
            .is_some_and(|product| self.filter.matches(product));
        if !visible {
            return Err(StoreError::UnknownProduct(id.clone()));
        }

        let quantity = self.cart.set_quantity(id, raw);
        debug!(product = %id, quantity, "cart: quantity changed");
        Ok(Redraw::CartSummary)
    }

    /// Filter-change handler. Always empties the cart, even when the filter
    /// goes back to `all`.
    pub fn change_filter(&mut self, filter: ColorFilter) -> Redraw {
        debug!(filter = %filter, dropped_entries = self.cart.len(), "filter: changed");
        self.filter = filter;
        self.cart.clear();
        Redraw::All
    }

    pub fn set_customer_name(&mut self, name: impl Into<String>) {
        self.form.name = name.into();
    }

    pub fn set_customer_location(&mut self, location: impl Into<String>) {
        self.form.location = location.into();
    }

    /// Submit handler. Rejections are shown through `notifier` and leave all
    /// state untouched. On success the summary is acknowledged, then cart and
    /// form reset and the banner shows until its timer fires.
    pub fn submit_order(
        &mut self,
        notifier: &dyn Notifier,
    ) -> Result<OrderConfirmation, OrderError> {
        self.phase = OrderPhase::Validating;

        if let Err(rejection) = validate_order(&self.cart, &self.form) {
            warn!(reason = ?rejection, "order: rejected");
            self.phase = OrderPhase::Idle;
            notifier.alert(&rejection.to_string());
            return Err(rejection.into());
        }

        let name = self.form.name.trim().to_string();
        let location = self.form.location.trim().to_string();
        let summary = match compose_order_summary(&name, &location, &self.cart, &self.catalog) {
            Ok(summary) => summary,
            Err(err) => {
                error!("order: {err}");
                self.phase = OrderPhase::Idle;
                return Err(err.into());
            }
        };

        notifier.alert(&summary);

        info!(items = self.cart.len(), "order: placed");
        self.cart.clear();
        self.form.reset();
        self.banner.show(self.banner_dismiss);
        self.phase = OrderPhase::Confirmed;

        Ok(OrderConfirmation {
            name,
            location,
            summary,
        })
    }

    pub fn catalog_view(&self) -> CatalogView {
        match self.status {
            CatalogStatus::Failed => CatalogView::LoadError(CATALOG_LOAD_ERROR),
            CatalogStatus::NotLoaded | CatalogStatus::Loaded => {
                render_catalog(&self.catalog, &self.filter, &self.cart)
            }
        }
    }

    pub fn cart_summary(&self) -> Result<CartSummaryView, StoreError> {
        render_cart_summary(&self.cart, &self.catalog)
    }

    /// Selector options: `all` followed by the catalog's colors.
    pub fn filter_options(&self) -> Vec<String> {
        std::iter::once(ColorFilter::All.to_string())
            .chain(self.catalog.colors())
            .collect()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn filter(&self) -> &ColorFilter {
        &self.filter
    }

    pub fn form(&self) -> &OrderForm {
        &self.form
    }

    pub fn phase(&self) -> OrderPhase {
        self.phase
    }

    pub fn banner(&self) -> &Banner {
        &self.banner
    }

    pub fn load_failed(&self) -> bool {
        self.status == CatalogStatus::Failed
    }
}

#[cfg(test)]
#[path = "tests/storefront_tests.rs"]
mod tests;
