use indexmap::IndexMap;
use shared::{domain::ProductId, error::StoreError};

use crate::catalog::Catalog;

/// Browser-style integer parse: leading whitespace, optional sign, then the
/// longest digit prefix. Anything unparsable or negative is 0.
pub fn parse_quantity(raw: &str) -> u32 {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];

    if negative || digits.is_empty() {
        return 0;
    }
    digits.parse::<u32>().unwrap_or(u32::MAX)
}

/// Ids of the form `0` or `[1-9][0-9]*` below 2^32 - 1 are array indexes and
/// iterate first, in numeric order.
fn array_index(id: &ProductId) -> Option<u32> {
    let text = id.as_str();
    let canonical = text == "0"
        || (!text.starts_with('0') && !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()));
    if !canonical {
        return None;
    }
    text.parse::<u32>().ok().filter(|index| *index < u32::MAX)
}

/// Selected quantities keyed by product id. Iteration yields array-index ids
/// in ascending order, then every other id in insertion order. A stored
/// quantity is always at least 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    entries: IndexMap<ProductId, u32>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the quantity that was applied after clamping.
    pub fn set_quantity(&mut self, id: &ProductId, raw: &str) -> u32 {
        let quantity = parse_quantity(raw);
        self.set(id.clone(), quantity);
        quantity
    }

    pub fn set(&mut self, id: ProductId, quantity: u32) {
        if quantity == 0 {
            self.entries.shift_remove(&id);
        } else {
            self.entries.insert(id, quantity);
        }
    }

    pub fn quantity(&self, id: &ProductId) -> u32 {
        self.entries.get(id).copied().unwrap_or(0)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ProductId, u32)> {
        let mut indexed: Vec<_> = self
            .entries
            .iter()
            .filter_map(|(id, quantity)| array_index(id).map(|index| (index, id, *quantity)))
            .collect();
        indexed.sort_unstable_by_key(|(index, ..)| *index);

        let named = self
            .entries
            .iter()
            .filter(|(id, _)| array_index(id).is_none())
            .map(|(id, quantity)| (id, *quantity));

        indexed
            .into_iter()
            .map(|(_, id, quantity)| (id, quantity))
            .chain(named)
    }

    pub fn total(&self, catalog: &Catalog) -> Result<f64, StoreError> {
        self.iter().try_fold(0.0, |total, (id, quantity)| {
            let product = catalog
                .get(id)
                .ok_or_else(|| StoreError::UnknownProduct(id.clone()))?;
            Ok(total + product.price * f64::from(quantity))
        })
    }
}

#[cfg(test)]
#[path = "tests/cart_tests.rs"]
mod tests;
