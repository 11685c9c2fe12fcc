#![allow(dead_code)]

use chrono::{DateTime, Utc};

use super::booking::{Booking, BookingStatus};

/// 予約一覧の状態フィルタ
///
/// 5つの時制フィルタと全件の計6種。どれも独立したデータではなく、
/// 不変の`(start, end, status)`をクエリ時点の`now`に対して評価する
/// 純粋な述語にすぎない。述語の定義はこの型の`matches`に一本化し、
/// 各ストレージ実装は同じ条件を自分の方言で再現する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateFilter {
    /// 全件
    All,
    /// 進行中（start < now < end）
    Current,
    /// 終了済み（end < now）
    Past,
    /// 開始前（start > now）
    Future,
    /// 判定待ち（status == Waiting）
    Waiting,
    /// 却下済み（status == Rejected）
    Rejected,
}

impl StateFilter {
    /// 述語の評価
    ///
    /// 時制フィルタは半開区間 `[start, end)` をクエリ時点の`now`で
    /// 区分する。ステータスフィルタは時刻に依存しない。
    pub fn matches(&self, booking: &Booking, now: DateTime<Utc>) -> bool {
        match self {
            StateFilter::All => true,
            StateFilter::Current => booking.window.start() < now && booking.window.end() > now,
            StateFilter::Past => booking.window.end() < now,
            StateFilter::Future => booking.window.start() > now,
            StateFilter::Waiting => booking.status == BookingStatus::Waiting,
            StateFilter::Rejected => booking.status == BookingStatus::Rejected,
        }
    }
}

impl std::str::FromStr for StateFilter {
    type Err = String;

    /// 大文字小文字を区別せずにパースする
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ALL" => Ok(StateFilter::All),
            "CURRENT" => Ok(StateFilter::Current),
            "PAST" => Ok(StateFilter::Past),
            "FUTURE" => Ok(StateFilter::Future),
            "WAITING" => Ok(StateFilter::Waiting),
            "REJECTED" => Ok(StateFilter::Rejected),
            _ => Err(format!("Unknown state: {}", s)),
        }
    }
}
