use thiserror::Error;

/// 予約管理アプリケーション層のエラー
///
/// すべて呼び出し側に返す終端エラー。エンジン内での回復やリトライは
/// 行わず、最初に破られた前提条件で即座に失敗する。コラボレータ由来の
/// 不透明なエラーはドメインエラーと区別して伝搬し、呼び出し側が
/// 「リクエストが不正」と「後で再試行」を見分けられるようにする。
#[derive(Debug, Error)]
pub enum BookingApplicationError {
    /// ユーザーが存在しない
    #[error("User not found")]
    UserNotFound,

    /// アイテムが存在しない
    #[error("Item not found")]
    ItemNotFound,

    /// 予約が見つからない
    ///
    /// 所有者でも予約者でもない呼び出し元に対しては、関係のない予約の
    /// 存在を漏らさないため、このエラーに畳み込む。
    #[error("Booking not found")]
    BookingNotFound,

    /// アイテムを1つも所有していないユーザーの所有者側一覧
    ///
    /// 予約履歴が存在し得ないため、空一覧ではなくnot-foundとして扱う。
    #[error("Owner has no items")]
    NoItemsForOwner,

    /// 予約ウィンドウが不正（start >= end）
    #[error("Booking window start must be strictly before end")]
    InvalidWindow,

    /// アイテムが予約受付停止中
    #[error("Item is not available for booking")]
    ItemUnavailable,

    /// リクエストされたウィンドウが既存予約と交差している
    #[error("Requested window conflicts with an existing booking")]
    ConflictingBooking,

    /// 所有者自身による予約
    #[error("Owner cannot book their own item")]
    SelfBookingForbidden,

    /// 既に承認または却下が確定している予約への再判定
    #[error("Booking has already been decided")]
    AlreadyDecided,

    /// 未知の状態フィルタ
    #[error("Unknown state: {0}")]
    UnknownState(String),

    /// UserDirectoryのエラー
    #[error("User directory error")]
    UserDirectoryError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// ItemCatalogのエラー
    #[error("Item catalog error")]
    ItemCatalogError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// BookingStoreのエラー
    #[error("Booking store error")]
    BookingStoreError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, BookingApplicationError>;
