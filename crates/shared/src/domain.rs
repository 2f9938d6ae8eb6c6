use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Catalog identifier. The endpoint may send ids as strings or numbers; both
/// normalize to the same textual key so `1` and `"1"` address one product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawProductId")]
pub struct ProductId(pub String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for ProductId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self(value.trim().to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawProductId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawProductId> for ProductId {
    fn from(raw: RawProductId) -> Self {
        match raw {
            RawProductId::Text(text) => Self(text),
            RawProductId::Number(number) => Self(number.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub color: String,
    pub scent: String,
    pub price: f64,
    #[serde(default)]
    pub image: String,
}

pub const ALL_COLORS: &str = "all";

/// Single-select color filter. `All` bypasses filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ColorFilter {
    #[default]
    All,
    Color(String),
}

impl ColorFilter {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Color(color) => product.color == *color,
        }
    }
}

impl FromStr for ColorFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == ALL_COLORS {
            Ok(Self::All)
        } else {
            Ok(Self::Color(s.to_string()))
        }
    }
}

impl fmt::Display for ColorFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_COLORS),
            Self::Color(color) => f.write_str(color),
        }
    }
}
