use crate::domain::value_objects::{ItemId, UserId};
use crate::ports::item_catalog::{ItemCatalog as ItemCatalogTrait, ItemSummary, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// ItemCatalogのモック実装
///
/// アイテムの所有者と受付状態を保存することで状態を持ったテストを
/// サポート。受付停止中のアイテムも登録可能。
#[allow(dead_code)]
pub struct ItemCatalog {
    items: Mutex<HashMap<ItemId, ItemSummary>>,
}

#[allow(dead_code)]
impl ItemCatalog {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
        }
    }

    /// テスト用に予約受付中のアイテムを登録
    pub fn add_available_item(&self, item_id: ItemId, owner_id: UserId) {
        self.items.lock().unwrap().insert(
            item_id,
            ItemSummary {
                item_id,
                owner_id,
                available: true,
            },
        );
    }

    /// テスト用に受付停止中のアイテムを登録
    pub fn add_unavailable_item(&self, item_id: ItemId, owner_id: UserId) {
        self.items.lock().unwrap().insert(
            item_id,
            ItemSummary {
                item_id,
                owner_id,
                available: false,
            },
        );
    }
}

impl Default for ItemCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemCatalogTrait for ItemCatalog {
    /// 登録されたアイテムから検索
    async fn get(&self, item_id: ItemId) -> Result<Option<ItemSummary>> {
        Ok(self.items.lock().unwrap().get(&item_id).copied())
    }

    /// 所有者でフィルタしたアイテムID一覧
    async fn items_owned_by(&self, owner_id: UserId) -> Result<Vec<ItemId>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .values()
            .filter(|item| item.owner_id == owner_id)
            .map(|item| item.item_id)
            .collect())
    }
}
