use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookingId, ItemId, UserId};

/// コマンド：予約をリクエストする
///
/// `start`/`end`は未検証のまま運ぶ。ウィンドウの検証は
/// アプリケーション層が前提条件の検査順序の中で行う。
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestBooking {
    pub item_id: ItemId,
    pub booker_id: UserId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub requested_at: DateTime<Utc>,
}

/// コマンド：予約の承認判定を行う
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecideBooking {
    pub booking_id: BookingId,
    pub owner_id: UserId,
    pub approve: bool,
    pub decided_at: DateTime<Utc>,
}
