use crate::domain::value_objects::{ItemId, UserId};
use async_trait::async_trait;

#[allow(dead_code)]
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 予約エンジンが必要とするアイテムの断面
///
/// 誰が所有しているか、現在予約を受け付けているかのみを運ぶ。
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSummary {
    pub item_id: ItemId,
    pub owner_id: UserId,
    pub available: bool,
}

/// アイテムカタログポート
///
/// 予約コンテキストとカタログコンテキストの境界を維持する。
/// 予約コンテキストはItemIDと所有・受付状態のみを知り、
/// アイテム詳細は知らない。
#[allow(dead_code)]
#[async_trait]
pub trait ItemCatalog: Send + Sync {
    /// アイテムをIDで検索する
    ///
    /// 存在しない場合は`None`を返す。
    async fn get(&self, item_id: ItemId) -> Result<Option<ItemSummary>>;

    /// ユーザーが所有するアイテムのID一覧を取得する
    ///
    /// 空の結果は所有者側一覧の短絡に使用され、返されたIDは
    /// そのまま所有者側クエリのスコープになる。
    async fn items_owned_by(&self, owner_id: UserId) -> Result<Vec<ItemId>>;
}
