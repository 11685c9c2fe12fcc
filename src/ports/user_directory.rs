use crate::domain::value_objects::UserId;
use async_trait::async_trait;

#[allow(dead_code)]
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// ユーザーディレクトリポート
///
/// 予約コンテキストとユーザーコンテキストの境界を維持する。
/// 予約コンテキストはUserIDのみを知り、ユーザー詳細は知らない。
#[allow(dead_code)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// ユーザーが存在するか確認する
    ///
    /// 予約作成・承認判定・一覧取得の前の呼び出し元バリデーションに
    /// 使用される。
    async fn exists(&self, user_id: UserId) -> Result<bool>;
}
