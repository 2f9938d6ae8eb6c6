pub mod cart;
pub mod catalog;
pub mod order;
pub mod render;
pub mod storefront;

pub use cart::{parse_quantity, Cart};
pub use catalog::{Catalog, CatalogSource, HttpCatalogSource, DEFAULT_CATALOG_URL};
pub use order::{Banner, Notifier, OrderConfirmation, OrderForm, OrderPhase};
pub use render::{CartSummaryView, CatalogView, ProductCard};
pub use storefront::{Redraw, Storefront};
