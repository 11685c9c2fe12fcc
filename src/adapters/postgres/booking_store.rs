use crate::domain::booking::{Booking, BookingStatus, NewBooking};
use crate::domain::state_filter::StateFilter;
use crate::domain::value_objects::{BookingId, BookingWindow, ItemId, Page, UserId};
use crate::ports::booking_store::{
    BookingScope, BookingStore as BookingStoreTrait, InsertError, Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder, Row, postgres::PgRow};
use std::str::FromStr;
use uuid::Uuid;

/// PostgreSQLの行データをBookingに変換する
///
/// データベースから取得した行を、ドメインの値オブジェクトとBookingに
/// 変換する。statusの文字列からの変換とウィンドウの再構築で
/// エラーハンドリングを行う。
fn map_row_to_booking(row: &PgRow) -> Result<Booking> {
    let status_str: &str = row.get("status");
    let status = BookingStatus::from_str(status_str).map_err(|e| {
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
            as Box<dyn std::error::Error + Send + Sync>
    })?;

    // テーブルのCHECK制約が start_at < end_at を保証しているため、
    // ここで失敗するのはデータ破損のみ
    let window = BookingWindow::try_new(row.get("start_at"), row.get("end_at")).map_err(|e| {
        Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("persisted window invalid: {:?}", e),
        )) as Box<dyn std::error::Error + Send + Sync>
    })?;

    Ok(Booking {
        booking_id: BookingId::from_uuid(row.get("booking_id")),
        item_id: ItemId::from_uuid(row.get("item_id")),
        booker_id: UserId::from_uuid(row.get("booker_id")),
        window,
        status,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// BookingStoreのPostgreSQL実装
///
/// 同一アイテム・非却下の予約ウィンドウに対するGiST排他制約が
/// 重複チェックと挿入の間のレースをデータベース境界で閉じる。
/// IDの採番もテーブルのデフォルト（gen_random_uuid）が行う。
#[allow(dead_code)]
pub struct BookingStore {
    pool: PgPool,
}

#[allow(dead_code)]
impl BookingStore {
    /// PostgreSQLコネクションプールから新しいBookingStoreを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// 排他制約違反（SQLSTATE 23P01）かどうか
fn is_exclusion_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == "23P01")
}

#[async_trait]
impl BookingStoreTrait for BookingStore {
    /// 予約を挿入し、採番済みの行を返す
    ///
    /// 排他制約に弾かれた場合は`InsertError::Conflict`として返し、
    /// それ以外のデータベースエラーは不透明なまま伝搬する。
    async fn insert(&self, booking: NewBooking) -> std::result::Result<Booking, InsertError> {
        let row = sqlx::query(
            r#"
            INSERT INTO bookings (
                item_id,
                booker_id,
                start_at,
                end_at,
                status,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING
                booking_id,
                item_id,
                booker_id,
                start_at,
                end_at,
                status,
                created_at,
                updated_at
            "#,
        )
        .bind(booking.item_id.value())
        .bind(booking.booker_id.value())
        .bind(booking.window.start())
        .bind(booking.window.end())
        .bind(booking.status.as_str())
        .bind(booking.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_exclusion_violation(&e) {
                InsertError::Conflict
            } else {
                InsertError::Backend(Box::new(e))
            }
        })?;

        map_row_to_booking(&row).map_err(InsertError::Backend)
    }

    /// 半開区間の交差条件で既存予約を検索する
    ///
    /// `existing.start < end AND existing.end > start`。
    /// ステータスでは絞らない。却下済みの除外は呼び出し側のルール。
    async fn find_overlapping(
        &self,
        item_id: ItemId,
        window: BookingWindow,
    ) -> Result<Vec<Booking>> {
        let rows = sqlx::query(
            r#"
            SELECT
                booking_id,
                item_id,
                booker_id,
                start_at,
                end_at,
                status,
                created_at,
                updated_at
            FROM bookings
            WHERE item_id = $1
              AND start_at < $3
              AND end_at > $2
            "#,
        )
        .bind(item_id.value())
        .bind(window.start())
        .bind(window.end())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_booking).collect()
    }

    async fn find_by_id(&self, booking_id: BookingId) -> Result<Option<Booking>> {
        let row = sqlx::query(
            r#"
            SELECT
                booking_id,
                item_id,
                booker_id,
                start_at,
                end_at,
                status,
                created_at,
                updated_at
            FROM bookings
            WHERE booking_id = $1
            "#,
        )
        .bind(booking_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_booking).transpose()
    }

    /// ステータスと更新時刻のみを書き換える
    async fn update_status(
        &self,
        booking_id: BookingId,
        status: BookingStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE bookings
            SET status = $2, updated_at = $3
            WHERE booking_id = $1
            "#,
        )
        .bind(booking_id.value())
        .bind(status.as_str())
        .bind(updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// スコープ＋状態フィルタのクエリ
    ///
    /// WHERE句はドメインの`StateFilter::matches`と同じ条件を
    /// SQLとして組み立てたもの。分類ロジックを二重に持たないよう、
    /// 条件は節ごとに1対1で対応させている。
    async fn query(
        &self,
        scope: BookingScope,
        filter: StateFilter,
        now: DateTime<Utc>,
        page: Page,
    ) -> Result<Vec<Booking>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            SELECT
                booking_id,
                item_id,
                booker_id,
                start_at,
                end_at,
                status,
                created_at,
                updated_at
            FROM bookings
            WHERE "#,
        );

        match scope {
            BookingScope::Booker(booker_id) => {
                qb.push("booker_id = ").push_bind(booker_id.value());
            }
            BookingScope::Items(item_ids) => {
                let uuids: Vec<Uuid> = item_ids.iter().map(|id| id.value()).collect();
                qb.push("item_id = ANY(").push_bind(uuids).push(")");
            }
        }

        match filter {
            StateFilter::All => {}
            StateFilter::Current => {
                qb.push(" AND start_at < ")
                    .push_bind(now)
                    .push(" AND end_at > ")
                    .push_bind(now);
            }
            StateFilter::Past => {
                qb.push(" AND end_at < ").push_bind(now);
            }
            StateFilter::Future => {
                qb.push(" AND start_at > ").push_bind(now);
            }
            StateFilter::Waiting => {
                qb.push(" AND status = ")
                    .push_bind(BookingStatus::Waiting.as_str());
            }
            StateFilter::Rejected => {
                qb.push(" AND status = ")
                    .push_bind(BookingStatus::Rejected.as_str());
            }
        }

        qb.push(" ORDER BY start_at DESC OFFSET ")
            .push_bind(page.from() as i64)
            .push(" LIMIT ")
            .push_bind(page.size() as i64);

        let rows = qb.build().fetch_all(&self.pool).await?;

        rows.iter().map(map_row_to_booking).collect()
    }
}
