use crate::domain::booking::{Booking, BookingStatus, NewBooking};
use crate::domain::state_filter::StateFilter;
use crate::domain::value_objects::{BookingId, BookingWindow, ItemId, Page, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[allow(dead_code)]
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
#[allow(dead_code)]
pub type Result<T> = std::result::Result<T, BoxError>;

/// 挿入の失敗
///
/// ストレージ境界で強制される排他制約の違反を、エンジンが
/// `ConflictingBooking`へ対応付けられるよう、不透明なバックエンド
/// エラーから分離している。
#[allow(dead_code)]
#[derive(Debug, Error)]
pub enum InsertError {
    /// 同一アイテムの非却下予約が交差するウィンドウを既に占有している
    ///
    /// 重複チェックと挿入の間に割り込んだ並行リクエストはここで
    /// 検出される。重複の前提条件は挿入時にストレージ境界で
    /// 再検証される。
    #[error("conflicting booking window")]
    Conflict,

    /// その他のストレージ障害（接続断、重複以外の制約違反など）
    #[error("booking store error")]
    Backend(#[source] BoxError),
}

/// 一覧クエリのスコープ
///
/// 所有者側は所有アイテムのID（呼び出し側がアイテムカタログ経由で
/// 解決したもの）を運ぶ。ストア自身は所有関係を知らない。
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingScope {
    /// このユーザーが予約者である予約
    Booker(UserId),
    /// これらのアイテムのいずれかへの予約
    Items(Vec<ItemId>),
}

/// 予約ストアポート - エンジンの背後にある唯一のストレージ能力
///
/// バックエンドごとに1実装。どの実装も同じスコープ＋状態フィルタ＋
/// ページングのクエリに答えるため、分類ロジックは一箇所にしか
/// 存在しない。
#[allow(dead_code)]
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// 新しい予約を保存し、IDを採番する
    ///
    /// IDの採番はストアの責務。実装は同一アイテム・非却下予約の
    /// 非交差不変条件を挿入と不可分に強制し、負けたレースを
    /// `InsertError::Conflict`として報告しなければならない。
    async fn insert(&self, booking: NewBooking) -> std::result::Result<Booking, InsertError>;

    /// アイテムの予約のうちウィンドウが交差するものをステータスを
    /// 問わず返す
    ///
    /// ステータスでの絞り込み（却下済みは妨げない）は呼び出し側の
    /// ルールであって、ストアのルールではない。
    async fn find_overlapping(&self, item_id: ItemId, window: BookingWindow)
        -> Result<Vec<Booking>>;

    /// IDで予約を1件取得する
    async fn find_by_id(&self, booking_id: BookingId) -> Result<Option<Booking>>;

    /// 承認判定を保存する
    ///
    /// 予約で可変なのはステータスのみ。それ以外は挿入時に一度だけ
    /// 書かれる。
    async fn update_status(
        &self,
        booking_id: BookingId,
        status: BookingStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<()>;

    /// スコープ内で`now`に対して状態フィルタを満たす予約を、
    /// ウィンドウ開始の降順でページングして返す
    async fn query(
        &self,
        scope: BookingScope,
        filter: StateFilter,
        now: DateTime<Utc>,
        page: Page,
    ) -> Result<Vec<Booking>>;
}
