use serde::{Deserialize, Serialize};

use crate::db::{Priced, SoftDeletable};
use crate::error::AppError;

#[derive(Debug, Serialize, Clone, Deserialize, PartialEq)]
pub struct Item {
    pub id: u64,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub deleted: bool,
}

/// Body of `POST /item/` and `PUT /item/{id}`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ItemRequest {
    pub name: String,
    pub price: f64,
}

/// Body of `PATCH /item/{id}`. The `deleted` flag can't be patched.
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PatchItemRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

impl Item {
    pub fn new(id: u64, request: ItemRequest) -> Self {
        Self {
            id,
            name: request.name,
            price: request.price,
            deleted: false,
        }
    }
}

impl ItemRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_price(self.price)
    }
}

impl PatchItemRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        match self.price {
            Some(price) => validate_price(price),
            None => Ok(()),
        }
    }
}

fn validate_price(price: f64) -> Result<(), AppError> {
    if price.is_finite() && price >= 0.0 {
        Ok(())
    } else {
        Err(AppError::Unprocessable(format!(
            "price must be a non-negative number, got {price}"
        )))
    }
}

impl SoftDeletable for Item {
    fn is_deleted(&self) -> bool {
        self.deleted
    }
}

impl Priced for Item {
    fn price(&self) -> f64 {
        self.price
    }
}
