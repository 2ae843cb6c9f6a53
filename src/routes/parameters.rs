use serde::{de, Deserialize, Deserializer};

use crate::db::{CartQuery, ItemQuery, Page, PriceRange};
use crate::error::AppError;

fn default_limit() -> usize {
    Page::default().limit
}

/// Accepts `true/false`, `1/0`, `yes/no` and `on/off` in any case.
fn loose_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(de::Error::invalid_value(
            de::Unexpected::Str(&raw),
            &"a boolean such as true, false, 1, 0, yes, no, on or off",
        )),
    }
}

/// Query string of `GET /item/`.
#[derive(Debug, Deserialize)]
pub struct ItemListParams {
    #[serde(default)]
    pub offset: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    #[serde(default, deserialize_with = "loose_bool")]
    pub show_deleted: bool,
}

/// Query string of `GET /cart/`.
#[derive(Debug, Deserialize)]
pub struct CartListParams {
    #[serde(default)]
    pub offset: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_quantity: Option<usize>,
    pub max_quantity: Option<usize>,
}

impl ItemListParams {
    pub fn into_query(self) -> Result<ItemQuery, AppError> {
        Ok(ItemQuery {
            price: price_range(self.min_price, self.max_price)?,
            page: page(self.offset, self.limit)?,
            show_deleted: self.show_deleted,
        })
    }
}

impl CartListParams {
    pub fn into_query(self) -> Result<CartQuery, AppError> {
        Ok(CartQuery {
            price: price_range(self.min_price, self.max_price)?,
            page: page(self.offset, self.limit)?,
            min_quantity: self.min_quantity,
            max_quantity: self.max_quantity,
        })
    }
}

fn page(offset: usize, limit: usize) -> Result<Page, AppError> {
    if limit == 0 {
        return Err(AppError::Unprocessable(
            "limit must be greater than 0".to_string(),
        ));
    }
    Ok(Page::new(offset, limit))
}

fn price_range(min: Option<f64>, max: Option<f64>) -> Result<PriceRange, AppError> {
    for (name, bound) in [("min_price", min), ("max_price", max)] {
        if bound.is_some_and(|value| value.is_nan() || value < 0.0) {
            return Err(AppError::Unprocessable(format!(
                "{name} must be greater than or equal to 0"
            )));
        }
    }
    Ok(PriceRange::new(min, max))
}
