#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookingId, BookingWindow, DecideError, ItemId, UserId};

/// 予約ステータス
///
/// 遷移は一方向のみ：`Waiting → Approved` または `Waiting → Rejected`。
/// 確定後の再遷移や巻き戻しは存在しない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    /// 所有者の判定待ち
    Waiting,
    /// 承認済み
    Approved,
    /// 却下済み
    Rejected,
}

impl BookingStatus {
    /// 文字列表現を取得する
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Waiting => "waiting",
            BookingStatus::Approved => "approved",
            BookingStatus::Rejected => "rejected",
        }
    }

    pub fn is_waiting(&self) -> bool {
        matches!(self, BookingStatus::Waiting)
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, BookingStatus::Rejected)
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting" => Ok(BookingStatus::Waiting),
            "approved" => Ok(BookingStatus::Approved),
            "rejected" => Ok(BookingStatus::Rejected),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}

/// 未採番の予約
///
/// IDの採番はストレージ層の責務のため、作成直後の予約はIDを持たない。
/// `BookingStore::insert`が採番済みの`Booking`を返す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub item_id: ItemId,
    pub booker_id: UserId,
    pub window: BookingWindow,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// Booking集約 - 1つのアイテムに対する1つの予約ウィンドウ
///
/// ステータス以外は作成後に変化しない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    // 識別子
    pub booking_id: BookingId,

    // 他の集約への参照（IDのみ）
    pub item_id: ItemId,
    pub booker_id: UserId,

    // 予約ウィンドウ
    pub window: BookingWindow,

    // 承認状態
    pub status: BookingStatus,

    // 監査情報
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 純粋関数：予約をリクエストする
///
/// ビジネスルール：
/// - 初期状態はWaiting
/// - ウィンドウは`BookingWindow`の構築時点で検証済み
///
/// 副作用なし。未採番の予約を返す。存在確認・空き確認・重複確認は
/// アプリケーション層がコラボレータと照合して行う。
pub fn request_booking(
    item_id: ItemId,
    booker_id: UserId,
    window: BookingWindow,
    requested_at: DateTime<Utc>,
) -> NewBooking {
    NewBooking {
        item_id,
        booker_id,
        window,
        status: BookingStatus::Waiting,
        created_at: requested_at,
    }
}

/// 純粋関数：予約の承認判定を適用する
///
/// ビジネスルール：
/// - Waiting状態の予約のみ判定できる
/// - 判定は一度きり。確定済みの予約への再判定は常に失敗する
///
/// 副作用なし。ステータスと更新時刻だけが変わった新しいBookingを返す。
pub fn decide(
    booking: &Booking,
    approve: bool,
    decided_at: DateTime<Utc>,
) -> Result<Booking, DecideError> {
    if !booking.status.is_waiting() {
        return Err(DecideError::AlreadyDecided);
    }

    let status = if approve {
        BookingStatus::Approved
    } else {
        BookingStatus::Rejected
    };

    Ok(Booking {
        status,
        updated_at: decided_at,
        ..booking.clone()
    })
}

/// 純粋関数：重複判定
///
/// リクエストされたウィンドウが、同一アイテムの既存予約のいずれかと
/// 交差していれば真。却下済み（Rejected）の予約はアイテムを
/// 占有しないため判定から除外する。それ以外はステータスを問わない。
pub fn has_conflict(window: &BookingWindow, existing: &[Booking]) -> bool {
    existing
        .iter()
        .any(|b| !b.status.is_rejected() && b.window.overlaps(window))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::str::FromStr;

    fn window(offset_days: i64, len_days: i64) -> BookingWindow {
        let base = Utc::now();
        BookingWindow::try_new(
            base + Duration::days(offset_days),
            base + Duration::days(offset_days + len_days),
        )
        .unwrap()
    }

    fn booking_with(window: BookingWindow, status: BookingStatus) -> Booking {
        let now = Utc::now();
        Booking {
            booking_id: BookingId::new(),
            item_id: ItemId::new(),
            booker_id: UserId::new(),
            window,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    // TDD: request_booking() のテスト
    #[test]
    fn test_request_booking_starts_waiting() {
        let item_id = ItemId::new();
        let booker_id = UserId::new();
        let requested_at = Utc::now();

        let new_booking = request_booking(item_id, booker_id, window(1, 2), requested_at);

        assert_eq!(new_booking.status, BookingStatus::Waiting);
        assert_eq!(new_booking.item_id, item_id);
        assert_eq!(new_booking.booker_id, booker_id);
        assert_eq!(new_booking.created_at, requested_at);
    }

    // TDD: decide() のテスト
    #[test]
    fn test_decide_approve_from_waiting() {
        let booking = booking_with(window(1, 2), BookingStatus::Waiting);
        let decided_at = Utc::now();

        let result = decide(&booking, true, decided_at);
        assert!(result.is_ok());

        let decided = result.unwrap();
        assert_eq!(decided.status, BookingStatus::Approved);
        assert_eq!(decided.updated_at, decided_at);
        // ステータス以外は不変
        assert_eq!(decided.booking_id, booking.booking_id);
        assert_eq!(decided.window, booking.window);
        assert_eq!(decided.created_at, booking.created_at);
    }

    #[test]
    fn test_decide_reject_from_waiting() {
        let booking = booking_with(window(1, 2), BookingStatus::Waiting);

        let decided = decide(&booking, false, Utc::now()).unwrap();
        assert_eq!(decided.status, BookingStatus::Rejected);
    }

    #[test]
    fn test_decide_fails_when_already_approved() {
        let booking = booking_with(window(1, 2), BookingStatus::Approved);

        let result = decide(&booking, true, Utc::now());
        assert_eq!(result.unwrap_err(), DecideError::AlreadyDecided);

        // 引数を変えても結果は同じ
        let result = decide(&booking, false, Utc::now());
        assert_eq!(result.unwrap_err(), DecideError::AlreadyDecided);
    }

    #[test]
    fn test_decide_fails_when_already_rejected() {
        let booking = booking_with(window(1, 2), BookingStatus::Rejected);

        let result = decide(&booking, true, Utc::now());
        assert_eq!(result.unwrap_err(), DecideError::AlreadyDecided);
    }

    #[test]
    fn test_decide_is_one_shot() {
        let booking = booking_with(window(1, 2), BookingStatus::Waiting);

        let decided = decide(&booking, true, Utc::now()).unwrap();
        let second = decide(&decided, false, Utc::now());

        assert_eq!(second.unwrap_err(), DecideError::AlreadyDecided);
        // 1回目の判定結果は変わらない
        assert_eq!(decided.status, BookingStatus::Approved);
    }

    // TDD: has_conflict() のテスト
    #[test]
    fn test_has_conflict_with_overlapping_waiting_booking() {
        let existing = booking_with(window(1, 2), BookingStatus::Waiting);
        let requested = window(2, 2);

        assert!(has_conflict(&requested, &[existing]));
    }

    #[test]
    fn test_has_conflict_with_overlapping_approved_booking() {
        let existing = booking_with(window(1, 2), BookingStatus::Approved);
        let requested = window(2, 2);

        assert!(has_conflict(&requested, &[existing]));
    }

    #[test]
    fn test_rejected_booking_does_not_conflict() {
        let existing = booking_with(window(1, 2), BookingStatus::Rejected);
        let requested = window(1, 2);

        assert!(!has_conflict(&requested, &[existing]));
    }

    #[test]
    fn test_no_conflict_with_disjoint_window() {
        let existing = booking_with(window(1, 2), BookingStatus::Approved);
        let requested = window(5, 2);

        assert!(!has_conflict(&requested, &[existing]));
    }

    #[test]
    fn test_conflict_found_among_many() {
        let a = booking_with(window(0, 1), BookingStatus::Rejected);
        let b = booking_with(window(2, 1), BookingStatus::Approved);
        let c = booking_with(window(5, 1), BookingStatus::Waiting);
        let requested = window(2, 2);

        assert!(has_conflict(&requested, &[a, b, c]));
    }

    // BookingStatus のテスト
    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            BookingStatus::Waiting,
            BookingStatus::Approved,
            BookingStatus::Rejected,
        ] {
            assert_eq!(BookingStatus::from_str(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn test_status_from_str_rejects_unknown() {
        assert!(BookingStatus::from_str("cancelled").is_err());
    }
}
