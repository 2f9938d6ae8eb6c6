use thiserror::Error;

use crate::domain::ProductId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("product {0} is not in the current catalog")]
    UnknownProduct(ProductId),
    #[error("catalog lists product id {0} more than once")]
    DuplicateProduct(ProductId),
    #[error("product {0} has an invalid price")]
    InvalidPrice(ProductId),
}

/// Reasons an order submission is turned away. The display text is what the
/// customer sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OrderRejection {
    #[error("Your cart is empty! Please add flowers before ordering.")]
    EmptyCart,
    #[error("Please fill in your name and location.")]
    MissingCustomerDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error(transparent)]
    Rejected(#[from] OrderRejection),
    #[error(transparent)]
    Store(#[from] StoreError),
}
