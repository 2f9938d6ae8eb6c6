use std::collections::{BTreeSet, HashSet};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{ColorFilter, Product, ProductId},
    error::StoreError,
};
use tracing::debug;
use url::Url;

pub const DEFAULT_CATALOG_URL: &str = "http://localhost:3000/flowers";

/// Where the product list comes from. One best-effort fetch, no retry.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_products(&self) -> Result<Vec<Product>>;
}

pub struct HttpCatalogSource {
    http: Client,
    url: Url,
}

impl HttpCatalogSource {
    pub fn new(url: Url) -> Self {
        Self {
            http: Client::new(),
            url,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_products(&self) -> Result<Vec<Product>> {
        debug!(url = %self.url, "catalog: fetching products");
        let products = self
            .http
            .get(self.url.clone())
            .send()
            .await
            .with_context(|| format!("failed to reach catalog at {}", self.url))?
            .error_for_status()?
            .json::<Vec<Product>>()
            .await
            .context("catalog response is not a product list")?;
        Ok(products)
    }
}

/// Products from the last successful load. Only ever replaced wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn from_products(products: Vec<Product>) -> Result<Self, StoreError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !product.price.is_finite() || product.price < 0.0 {
                return Err(StoreError::InvalidPrice(product.id.clone()));
            }
            if !seen.insert(&product.id) {
                return Err(StoreError::DuplicateProduct(product.id.clone()));
            }
        }
        Ok(Self { products })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == *id)
    }

    pub fn filtered<'a>(&'a self, filter: &'a ColorFilter) -> impl Iterator<Item = &'a Product> {
        self.products
            .iter()
            .filter(move |product| filter.matches(product))
    }

    /// Distinct colors in the catalog, sorted. Feeds the filter selector.
    pub fn colors(&self) -> Vec<String> {
        self.products
            .iter()
            .map(|product| product.color.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
