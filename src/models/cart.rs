use serde::{Deserialize, Serialize};

use crate::db::Priced;
use crate::models::item::Item;

/// One line of a cart, aggregated per distinct item.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CartItem {
    pub id: u64,
    pub name: String,
    pub quantity: u64,
    pub available: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Cart {
    pub id: u64,
    pub items: Vec<CartItem>,
    pub price: f64,
}

impl Cart {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            items: Vec::new(),
            price: 0.0,
        }
    }

    /// Bumps the quantity of an existing line or appends a new one, then adds
    /// the item's current price to the running total.
    pub fn add(&mut self, item: &Item) {
        match self.items.iter_mut().find(|line| line.id == item.id) {
            Some(line) => line.quantity += 1,
            None => self.items.push(CartItem {
                id: item.id,
                name: item.name.clone(),
                quantity: 1,
                available: true,
            }),
        }
        self.price += item.price;
    }
}

impl Priced for Cart {
    fn price(&self) -> f64 {
        self.price
    }
}
