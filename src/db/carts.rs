use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::db::{IdGenerator, ItemOperations, Page, PriceRange, StoreError};
use crate::models::cart::Cart;

/// `min_quantity` and `max_quantity` bound the number of carts returned,
/// not the contents of any single cart.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct CartQuery {
    pub price: PriceRange,
    pub page: Page,
    pub min_quantity: Option<usize>,
    pub max_quantity: Option<usize>,
}

#[async_trait]
pub trait CartOperations: Send + Sync {
    async fn create(&self) -> Cart;
    async fn get(&self, id: u64) -> Option<Cart>;
    async fn list(&self, query: CartQuery) -> Vec<Cart>;
    async fn add_item(
        &self,
        cart_id: u64,
        item_id: u64,
        items: &dyn ItemOperations,
    ) -> Result<Cart, StoreError>;
}

#[derive(Clone, Default)]
pub struct CartRepository {
    ids: Arc<IdGenerator>,
    carts: Arc<RwLock<BTreeMap<u64, Cart>>>,
}

impl CartRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartOperations for CartRepository {
    async fn create(&self) -> Cart {
        let mut carts = self.carts.write().await;
        let cart = Cart::new(self.ids.next_id());
        carts.insert(cart.id, cart.clone());
        debug!(id = cart.id, "cart created");
        cart
    }

    async fn get(&self, id: u64) -> Option<Cart> {
        self.carts.read().await.get(&id).cloned()
    }

    async fn list(&self, query: CartQuery) -> Vec<Cart> {
        let carts = self.carts.read().await;
        let filtered: Vec<Cart> = carts
            .values()
            .filter(|cart| query.price.contains(*cart))
            .cloned()
            .collect();

        if query.min_quantity.is_some_and(|min| filtered.len() < min) {
            return Vec::new();
        }

        let mut page = query.page.apply(filtered);
        if let Some(max) = query.max_quantity {
            page.truncate(max);
        }
        page
    }

    async fn add_item(
        &self,
        cart_id: u64,
        item_id: u64,
        items: &dyn ItemOperations,
    ) -> Result<Cart, StoreError> {
        // Lock order is always carts then items.
        let mut carts = self.carts.write().await;
        let cart = carts
            .get_mut(&cart_id)
            .ok_or(StoreError::CartNotFound(cart_id))?;
        // Soft-deleted items are still addable.
        let item = items
            .get(item_id)
            .await
            .ok_or(StoreError::ItemNotFound(item_id))?;

        cart.add(&item);
        debug!(cart_id, item_id, price = cart.price, "item added to cart");
        Ok(cart.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::items::MockItemOperations;
    use crate::db::{ItemQuery, ItemRepository};
    use crate::models::item::{Item, ItemRequest};
    use mockall::predicate::*;

    fn item(id: u64, name: &str, price: f64) -> Item {
        Item {
            id,
            name: name.to_string(),
            price,
            deleted: false,
        }
    }

    async fn carts_with_prices(prices: &[f64]) -> CartRepository {
        let repo = CartRepository::new();
        let mut items = MockItemOperations::new();
        for (index, price) in prices.iter().enumerate() {
            let price = *price;
            items
                .expect_get()
                .with(eq(index as u64))
                .returning(move |id| Some(item(id, "priced", price)));
        }
        for (index, _) in prices.iter().enumerate() {
            let cart = repo.create().await;
            repo.add_item(cart.id, index as u64, &items).await.unwrap();
        }
        repo
    }

    #[tokio::test]
    async fn test_create_then_get_is_empty() {
        let repo = CartRepository::new();
        let cart = repo.create().await;
        let fetched = repo.get(cart.id).await.unwrap();
        assert_eq!(fetched.id, 0);
        assert!(fetched.items.is_empty());
        assert_eq!(fetched.price, 0.0);
    }

    #[tokio::test]
    async fn test_cart_ids_are_independent_of_item_ids() {
        let items = ItemRepository::new();
        let carts = CartRepository::new();
        for name in ["a", "b", "c"] {
            items
                .create(ItemRequest {
                    name: name.to_string(),
                    price: 1.0,
                })
                .await;
        }
        assert_eq!(carts.create().await.id, 0);
        assert_eq!(carts.create().await.id, 1);
    }

    #[tokio::test]
    async fn test_add_same_item_twice() {
        let repo = CartRepository::new();
        let cart = repo.create().await;
        let mut items = MockItemOperations::new();
        items
            .expect_get()
            .with(eq(7))
            .times(2)
            .returning(|id| Some(item(id, "chair", 40.0)));

        repo.add_item(cart.id, 7, &items).await.unwrap();
        let cart = repo.add_item(cart.id, 7, &items).await.unwrap();

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 2);
        assert_eq!(cart.price, 80.0);
    }

    #[tokio::test]
    async fn test_add_distinct_items_in_order() {
        let items = ItemRepository::new();
        let table = items
            .create(ItemRequest {
                name: "table".to_string(),
                price: 100.0,
            })
            .await;
        let chair = items
            .create(ItemRequest {
                name: "chair".to_string(),
                price: 40.0,
            })
            .await;

        let repo = CartRepository::new();
        let cart = repo.create().await;
        repo.add_item(cart.id, chair.id, &items).await.unwrap();
        let cart = repo.add_item(cart.id, table.id, &items).await.unwrap();

        let names: Vec<&str> = cart.items.iter().map(|line| line.name.as_str()).collect();
        assert_eq!(names, vec!["chair", "table"]);
        assert_eq!(cart.price, 140.0);
        assert_eq!(repo.get(cart.id).await.unwrap(), cart);
    }

    #[tokio::test]
    async fn test_add_to_missing_cart() {
        let repo = CartRepository::new();
        let mut items = MockItemOperations::new();
        items.expect_get().never();

        let result = repo.add_item(3, 0, &items).await;
        assert_eq!(result, Err(StoreError::CartNotFound(3)));
    }

    #[tokio::test]
    async fn test_add_missing_item() {
        let repo = CartRepository::new();
        let cart = repo.create().await;
        let mut items = MockItemOperations::new();
        items.expect_get().with(eq(5)).returning(|_| None);

        let result = repo.add_item(cart.id, 5, &items).await;
        assert_eq!(result, Err(StoreError::ItemNotFound(5)));
        assert_eq!(repo.get(cart.id).await.unwrap().price, 0.0);
    }

    #[tokio::test]
    async fn test_add_soft_deleted_item() {
        let items = ItemRepository::new();
        let lamp = items
            .create(ItemRequest {
                name: "lamp".to_string(),
                price: 15.0,
            })
            .await;
        items.delete(lamp.id).await;

        let repo = CartRepository::new();
        let cart = repo.create().await;
        let cart = repo.add_item(cart.id, lamp.id, &items).await.unwrap();

        assert_eq!(cart.items.len(), 1);
        assert!(cart.items[0].available);
        assert_eq!(cart.price, 15.0);
    }

    #[tokio::test]
    async fn test_price_is_not_recomputed() {
        let items = ItemRepository::new();
        let lamp = items
            .create(ItemRequest {
                name: "lamp".to_string(),
                price: 15.0,
            })
            .await;
        let repo = CartRepository::new();
        let cart = repo.create().await;
        repo.add_item(cart.id, lamp.id, &items).await.unwrap();

        items
            .replace(
                lamp.id,
                ItemRequest {
                    name: "lamp".to_string(),
                    price: 20.0,
                },
            )
            .await;
        let cart = repo.add_item(cart.id, lamp.id, &items).await.unwrap();

        assert_eq!(cart.price, 35.0);
        assert_eq!(cart.items[0].quantity, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_create_and_add_item() {
        const TASKS: u64 = 200;
        let items = ItemRepository::new();
        let carts = CartRepository::new();
        let cart_id = carts.create().await.id;
        let mut handles = Vec::new();

        for _ in 0..TASKS {
            let items = items.clone();
            let carts = carts.clone();
            handles.push(tokio::spawn(async move {
                let created = items
                    .create(ItemRequest {
                        name: "shared".to_string(),
                        price: 1.0,
                    })
                    .await;
                carts.add_item(cart_id, 0, &items).await.unwrap();
                created.id
            }));
        }
        let mut created = Vec::new();
        for handle in handles {
            created.push(handle.await.unwrap());
        }
        created.sort_unstable();
        assert_eq!(created, (0..TASKS).collect::<Vec<_>>());

        let cart = carts.get(cart_id).await.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, TASKS);
        assert_eq!(cart.price, TASKS as f64);

        let listed = items
            .list(ItemQuery {
                page: Page::new(0, TASKS as usize),
                ..Default::default()
            })
            .await;
        let ids: Vec<u64> = listed.iter().map(|item| item.id).collect();
        assert_eq!(ids, (0..TASKS).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_list_filters_by_price() {
        let repo = carts_with_prices(&[10.0, 20.0, 30.0]).await;
        let carts = repo
            .list(CartQuery {
                price: PriceRange::new(Some(15.0), Some(30.0)),
                ..Default::default()
            })
            .await;

        let prices: Vec<f64> = carts.iter().map(|cart| cart.price).collect();
        assert_eq!(prices, vec![20.0, 30.0]);
    }

    #[tokio::test]
    async fn test_min_quantity_counts_carts() {
        let repo = carts_with_prices(&[10.0, 20.0, 30.0, 40.0]).await;

        let carts = repo
            .list(CartQuery {
                min_quantity: Some(5),
                ..Default::default()
            })
            .await;
        assert!(carts.is_empty());

        let carts = repo
            .list(CartQuery {
                min_quantity: Some(4),
                ..Default::default()
            })
            .await;
        assert_eq!(carts.len(), 4);
    }

    #[tokio::test]
    async fn test_min_quantity_applies_after_price_filter() {
        let repo = carts_with_prices(&[10.0, 20.0, 30.0]).await;
        let carts = repo
            .list(CartQuery {
                price: PriceRange::new(Some(20.0), None),
                min_quantity: Some(3),
                ..Default::default()
            })
            .await;
        assert!(carts.is_empty());
    }

    #[tokio::test]
    async fn test_max_quantity_truncates_page() {
        let repo = carts_with_prices(&[10.0, 20.0, 30.0, 40.0, 50.0]).await;
        let carts = repo
            .list(CartQuery {
                page: Page::new(1, 3),
                max_quantity: Some(2),
                ..Default::default()
            })
            .await;

        let ids: Vec<u64> = carts.iter().map(|cart| cart.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_list_offset_past_end_is_empty() {
        let repo = carts_with_prices(&[10.0, 20.0]).await;
        let carts = repo
            .list(CartQuery {
                page: Page::new(10, 10),
                ..Default::default()
            })
            .await;
        assert!(carts.is_empty());
    }
}
