use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

use crate::db::{IdGenerator, Page, PriceRange, SoftDeletable};
use crate::models::item::{Item, ItemRequest, PatchItemRequest};

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ItemQuery {
    pub price: PriceRange,
    pub page: Page,
    pub show_deleted: bool,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ItemOperations: Send + Sync {
    async fn create(&self, request: ItemRequest) -> Item;
    /// Raw lookup, soft-deleted records included.
    async fn get(&self, id: u64) -> Option<Item>;
    async fn list(&self, query: ItemQuery) -> Vec<Item>;
    async fn replace(&self, id: u64, request: ItemRequest) -> Option<Item>;
    async fn patch(&self, id: u64, request: PatchItemRequest) -> Option<Item>;
    async fn delete(&self, id: u64) -> Option<Item>;
}

/// In-memory item store. Clones share the same records.
#[derive(Clone, Default)]
pub struct ItemRepository {
    ids: Arc<IdGenerator>,
    items: Arc<RwLock<BTreeMap<u64, Item>>>,
}

impl ItemRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn active(items: &mut BTreeMap<u64, Item>, id: u64) -> Option<&mut Item> {
    items.get_mut(&id).filter(|item| !item.is_deleted())
}

#[async_trait]
impl ItemOperations for ItemRepository {
    async fn create(&self, request: ItemRequest) -> Item {
        let mut items = self.items.write().await;
        let item = Item::new(self.ids.next_id(), request);
        items.insert(item.id, item.clone());
        debug!(id = item.id, "item created");
        item
    }

    async fn get(&self, id: u64) -> Option<Item> {
        self.items.read().await.get(&id).cloned()
    }

    async fn list(&self, query: ItemQuery) -> Vec<Item> {
        let items = self.items.read().await;
        let filtered = items
            .values()
            .filter(|item| query.price.contains(*item))
            .filter(|item| query.show_deleted || !item.is_deleted())
            .cloned()
            .collect();
        query.page.apply(filtered)
    }

    async fn replace(&self, id: u64, request: ItemRequest) -> Option<Item> {
        let mut items = self.items.write().await;
        let item = active(&mut items, id)?;
        item.name = request.name;
        item.price = request.price;
        debug!(id, "item replaced");
        Some(item.clone())
    }

    async fn patch(&self, id: u64, request: PatchItemRequest) -> Option<Item> {
        let mut items = self.items.write().await;
        let item = active(&mut items, id)?;
        // Empty names and zero prices count as "not given".
        if let Some(name) = request.name.filter(|name| !name.is_empty()) {
            item.name = name;
        }
        if let Some(price) = request.price.filter(|price| *price != 0.0) {
            item.price = price;
        }
        debug!(id, "item patched");
        Some(item.clone())
    }

    async fn delete(&self, id: u64) -> Option<Item> {
        let mut items = self.items.write().await;
        let item = items.get_mut(&id)?;
        item.deleted = true;
        debug!(id, "item soft-deleted");
        Some(item.clone())
    }
}
