//! Pure view construction. Every call rebuilds the whole view from state;
//! nothing is diffed or cached between renders.

use std::fmt;

use shared::{
    domain::{ColorFilter, ProductId},
    error::StoreError,
};

use crate::{cart::Cart, catalog::Catalog};

pub const CATALOG_LOAD_ERROR: &str = "Error loading flowers.";
pub const EMPTY_CART_MESSAGE: &str = "Cart is empty.";

/// Two-decimal currency text. `{:.2}` already rounds to nearest on the exact
/// binary value; only exact ties differ, and those go away from zero. A tie
/// at the third decimal is an odd multiple of 1/8.
pub fn format_price(amount: f64) -> String {
    let eighths = amount * 8.0;
    let amount = if eighths.fract() == 0.0 && eighths % 2.0 != 0.0 {
        (amount * 100.0).round() / 100.0
    } else {
        amount
    };
    format!("${amount:.2}")
}

pub fn format_total(amount: f64) -> String {
    format!("Total: {}", format_price(amount))
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductCard {
    pub id: ProductId,
    pub name: String,
    pub color: String,
    pub scent: String,
    pub price: String,
    pub image: String,
    pub quantity: u32,
}

impl fmt::Display for ProductCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}] {}", self.id, self.name)?;
        if !self.image.is_empty() {
            writeln!(f, "  Image: {}", self.image)?;
        }
        writeln!(f, "  Color: {}", self.color)?;
        writeln!(f, "  Scent: {}", self.scent)?;
        writeln!(f, "  Price: {}", self.price)?;
        write!(f, "  Qty: {}", self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogView {
    Cards(Vec<ProductCard>),
    LoadError(&'static str),
}

impl fmt::Display for CatalogView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cards(cards) => {
                for (index, card) in cards.iter().enumerate() {
                    if index > 0 {
                        writeln!(f)?;
                    }
                    writeln!(f, "{card}")?;
                }
                Ok(())
            }
            Self::LoadError(message) => writeln!(f, "{message}"),
        }
    }
}

/// One card per product passing `filter`, quantities taken from `cart`.
pub fn render_catalog(catalog: &Catalog, filter: &ColorFilter, cart: &Cart) -> CatalogView {
    let cards = catalog
        .filtered(filter)
        .map(|product| ProductCard {
            id: product.id.clone(),
            name: product.name.clone(),
            color: product.color.clone(),
            scent: product.scent.clone(),
            price: format_price(product.price),
            image: product.image.clone(),
            quantity: cart.quantity(&product.id),
        })
        .collect();
    CatalogView::Cards(cards)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummaryView {
    /// Either the single empty-cart message or one line per entry.
    pub lines: Vec<String>,
    pub total: String,
    empty: bool,
}

impl CartSummaryView {
    pub fn is_empty(&self) -> bool {
        self.empty
    }
}

impl fmt::Display for CartSummaryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        writeln!(f, "{}", self.total)
    }
}

pub fn render_cart_summary(cart: &Cart, catalog: &Catalog) -> Result<CartSummaryView, StoreError> {
    if cart.is_empty() {
        return Ok(CartSummaryView {
            lines: vec![EMPTY_CART_MESSAGE.to_string()],
            total: format_total(0.0),
            empty: true,
        });
    }

    let mut lines = Vec::with_capacity(cart.len());
    let mut total = 0.0;
    for (id, quantity) in cart.iter() {
        let product = catalog
            .get(id)
            .ok_or_else(|| StoreError::UnknownProduct(id.clone()))?;
        let line_total = product.price * f64::from(quantity);
        total += line_total;
        lines.push(format!(
            "{} x {} = {}",
            product.name,
            quantity,
            format_price(line_total)
        ));
    }

    Ok(CartSummaryView {
        lines,
        total: format_total(total),
        empty: false,
    })
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
