use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::booking::Booking;
use crate::domain::commands::RequestBooking;
use crate::domain::value_objects::{ItemId, UserId};

/// 予約作成のリクエストボディ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub item_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl CreateBookingRequest {
    /// 呼び出し元の識別子と受付時刻を合わせてコマンドへ変換する
    pub fn to_command(&self, booker_id: UserId, requested_at: DateTime<Utc>) -> RequestBooking {
        RequestBooking {
            item_id: ItemId::from_uuid(self.item_id),
            booker_id,
            start: self.start,
            end: self.end,
            requested_at,
        }
    }
}

/// 承認判定のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct DecideBookingQuery {
    pub approved: bool,
}

/// 予約一覧取得のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct ListBookingsQuery {
    /// 状態フィルタ（省略時はALL）
    pub state: Option<String>,
    /// 先頭結果の0始まりインデックス（省略時は0）
    pub from: Option<u32>,
    /// ページサイズ（省略時は10）
    pub size: Option<u32>,
}

impl ListBookingsQuery {
    pub fn state(&self) -> &str {
        self.state.as_deref().unwrap_or("ALL")
    }

    pub fn from(&self) -> u32 {
        self.from.unwrap_or(0)
    }

    pub fn size(&self) -> u32 {
        self.size.unwrap_or(10)
    }
}

/// 予約レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct BookingResponse {
    pub booking_id: Uuid,
    pub item_id: Uuid,
    pub booker_id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            booking_id: booking.booking_id.value(),
            item_id: booking.item_id.value(),
            booker_id: booking.booker_id.value(),
            start: booking.window.start(),
            end: booking.window.end(),
            status: booking.status.as_str().to_string(),
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
