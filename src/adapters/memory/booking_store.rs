use crate::domain::booking::{Booking, BookingStatus, NewBooking};
use crate::domain::state_filter::StateFilter;
use crate::domain::value_objects::{BookingId, BookingWindow, ItemId, Page, UserId};
use crate::ports::booking_store::{
    BookingScope, BookingStore as BookingStoreTrait, InsertError, Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// BookingStoreのインメモリ実装
///
/// 単一のMutexが読み取り・検査・書き込みを直列化するため、
/// 挿入時の重複検査と挿入そのものが1つのクリティカルセクションに
/// 収まる。IDの採番はこのストアが行う。
#[allow(dead_code)]
pub struct BookingStore {
    bookings: Mutex<HashMap<BookingId, Booking>>,
}

#[allow(dead_code)]
impl BookingStore {
    pub fn new() -> Self {
        Self {
            bookings: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for BookingStore {
    fn default() -> Self {
        Self::new()
    }
}

fn in_scope(booking: &Booking, scope: &BookingScope) -> bool {
    match scope {
        BookingScope::Booker(booker_id) => booking.booker_id == *booker_id,
        BookingScope::Items(item_ids) => item_ids.contains(&booking.item_id),
    }
}

#[async_trait]
impl BookingStoreTrait for BookingStore {
    /// ロック内で重複を再検査してから挿入する
    ///
    /// アプリケーション層の事前チェックと挿入の間に割り込んだ
    /// 並行リクエストはここで検出され、`InsertError::Conflict`になる。
    async fn insert(&self, booking: NewBooking) -> std::result::Result<Booking, InsertError> {
        let mut bookings = self.bookings.lock().unwrap();

        let occupied = bookings.values().any(|b| {
            b.item_id == booking.item_id
                && !b.status.is_rejected()
                && b.window.overlaps(&booking.window)
        });
        if occupied {
            return Err(InsertError::Conflict);
        }

        let stored = Booking {
            booking_id: BookingId::new(),
            item_id: booking.item_id,
            booker_id: booking.booker_id,
            window: booking.window,
            status: booking.status,
            created_at: booking.created_at,
            updated_at: booking.created_at,
        };
        bookings.insert(stored.booking_id, stored.clone());

        Ok(stored)
    }

    /// 同一アイテムで交差するウィンドウの予約をステータスを問わず返す
    async fn find_overlapping(
        &self,
        item_id: ItemId,
        window: BookingWindow,
    ) -> Result<Vec<Booking>> {
        let bookings = self.bookings.lock().unwrap();
        Ok(bookings
            .values()
            .filter(|b| b.item_id == item_id && b.window.overlaps(&window))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, booking_id: BookingId) -> Result<Option<Booking>> {
        let bookings = self.bookings.lock().unwrap();
        Ok(bookings.get(&booking_id).cloned())
    }

    async fn update_status(
        &self,
        booking_id: BookingId,
        status: BookingStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut bookings = self.bookings.lock().unwrap();
        if let Some(booking) = bookings.get_mut(&booking_id) {
            booking.status = status;
            booking.updated_at = updated_at;
        }
        Ok(())
    }

    /// スコープと状態フィルタを適用し、開始降順でページを切り出す
    ///
    /// 述語の実体はドメインの`StateFilter::matches`。このストアは
    /// それをそのまま全件に適用するだけで、独自の分類ロジックを持たない。
    async fn query(
        &self,
        scope: BookingScope,
        filter: StateFilter,
        now: DateTime<Utc>,
        page: Page,
    ) -> Result<Vec<Booking>> {
        let bookings = self.bookings.lock().unwrap();

        let mut matched: Vec<Booking> = bookings
            .values()
            .filter(|b| in_scope(b, &scope) && filter.matches(b, now))
            .cloned()
            .collect();

        matched.sort_by(|a, b| b.window.start().cmp(&a.window.start()));

        Ok(matched
            .into_iter()
            .skip(page.from() as usize)
            .take(page.size() as usize)
            .collect())
    }
}
