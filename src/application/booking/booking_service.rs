use crate::domain::{self, Booking, BookingId, BookingWindow, Page, StateFilter, UserId, commands::*};
use crate::ports::*;
use chrono::Utc;
use std::str::FromStr;
use std::sync::Arc;

use super::errors::{BookingApplicationError, Result};

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// 振る舞い（メソッド）は持たず、純粋な関数に依存関係を渡す。
///
/// エンジン自体はリクエスト間で状態を持たない。状態はすべて
/// ストレージコラボレータ側にある。
#[derive(Clone)]
#[allow(dead_code)]
pub struct ServiceDependencies {
    pub user_directory: Arc<dyn UserDirectory>,
    pub item_catalog: Arc<dyn ItemCatalog>,
    pub booking_store: Arc<dyn BookingStore>,
}

/// ユーザーの存在確認ヘルパー関数
///
/// request_booking, decide_booking, get_booking, 一覧系で共通利用される。
async fn ensure_user_exists(
    user_directory: &Arc<dyn UserDirectory>,
    user_id: UserId,
) -> Result<()> {
    let exists = user_directory
        .exists(user_id)
        .await
        .map_err(BookingApplicationError::UserDirectoryError)?;

    if !exists {
        return Err(BookingApplicationError::UserNotFound);
    }
    Ok(())
}

/// 予約をリクエストする（純粋な関数）
///
/// ビジネスルール（検査順序は固定。最初に破られた条件で失敗する）：
/// - 予約者が存在すること
/// - アイテムが存在すること
/// - ウィンドウが `start < end` を満たすこと
/// - アイテムが予約受付中であること
/// - 却下済みを除く既存予約とウィンドウが交差しないこと
/// - 所有者自身の予約でないこと
///
/// すべての依存が引数として明示的に渡される（関数型の原則）。
///
/// # 一貫性保証
///
/// 重複チェックと挿入の間のレースはストレージ境界で閉じる。
/// 同一アイテム・交差ウィンドウの並行リクエストが両方ここまで到達しても、
/// ストアの挿入時検査が片方を`InsertError::Conflict`として拒否し、
/// それは`ConflictingBooking`として呼び出し側に返る。
///
/// # 引数
/// * `deps` - サービスの依存関係
/// * `cmd` - 予約リクエストコマンド
///
/// # 戻り値
/// 成功時は採番済みの予約（ステータスはWaiting）
#[allow(dead_code)]
pub async fn request_booking(deps: &ServiceDependencies, cmd: RequestBooking) -> Result<Booking> {
    // 1. 予約者の存在確認
    ensure_user_exists(&deps.user_directory, cmd.booker_id).await?;

    // 2. アイテムの存在確認
    let item = deps
        .item_catalog
        .get(cmd.item_id)
        .await
        .map_err(BookingApplicationError::ItemCatalogError)?
        .ok_or(BookingApplicationError::ItemNotFound)?;

    // 3. ウィンドウの検証（start >= end は拒否）
    let window = BookingWindow::try_new(cmd.start, cmd.end)
        .map_err(|_| BookingApplicationError::InvalidWindow)?;

    // 4. アイテムの受付状態確認
    if !item.available {
        return Err(BookingApplicationError::ItemUnavailable);
    }

    // 5. 重複確認
    //
    // リクエストウィンドウ全体を既存予約すべてと突き合わせる。
    // 却下済みの予約はアイテムを占有しないため、交差していても
    // 新しいリクエストを妨げない。
    let existing = deps
        .booking_store
        .find_overlapping(cmd.item_id, window)
        .await
        .map_err(BookingApplicationError::BookingStoreError)?;

    if domain::booking::has_conflict(&window, &existing) {
        return Err(BookingApplicationError::ConflictingBooking);
    }

    // 6. 自己予約の禁止
    if item.owner_id == cmd.booker_id {
        return Err(BookingApplicationError::SelfBookingForbidden);
    }

    // 7. ドメイン層の純粋関数を呼び出し
    let new_booking =
        domain::booking::request_booking(cmd.item_id, cmd.booker_id, window, cmd.requested_at);

    // 8. ストアに保存（IDの採番はストア側。挿入時の重複検出はレース対策）
    let booking = deps.booking_store.insert(new_booking).await.map_err(|e| match e {
        InsertError::Conflict => BookingApplicationError::ConflictingBooking,
        InsertError::Backend(source) => BookingApplicationError::BookingStoreError(source),
    })?;

    Ok(booking)
}

/// 予約の承認判定を行う（純粋な関数）
///
/// ビジネスルール：
/// - 判定者が存在すること
/// - 予約が存在し、かつ判定者がそのアイテムの所有者であること
///   （所有者以外には予約の存在自体を明かさない）
/// - 予約がWaiting状態であること（判定は一度きり）
///
/// # 引数
/// * `deps` - サービスの依存関係
/// * `cmd` - 承認判定コマンド
///
/// # 戻り値
/// 成功時は判定後の予約
#[allow(dead_code)]
pub async fn decide_booking(deps: &ServiceDependencies, cmd: DecideBooking) -> Result<Booking> {
    // 1. 判定者の存在確認
    ensure_user_exists(&deps.user_directory, cmd.owner_id).await?;

    // 2. 予約の取得と所有権の確認
    //
    // 所有権の不一致は権限エラーではなくBookingNotFoundで返す。
    // 所有者以外の呼び出し元に予約の存在を漏らさないための仕様。
    let booking = deps
        .booking_store
        .find_by_id(cmd.booking_id)
        .await
        .map_err(BookingApplicationError::BookingStoreError)?
        .ok_or(BookingApplicationError::BookingNotFound)?;

    let item = deps
        .item_catalog
        .get(booking.item_id)
        .await
        .map_err(BookingApplicationError::ItemCatalogError)?
        .ok_or(BookingApplicationError::BookingNotFound)?;

    if item.owner_id != cmd.owner_id {
        return Err(BookingApplicationError::BookingNotFound);
    }

    // 3. ドメイン層の純粋関数を呼び出し（Waiting以外はAlreadyDecided）
    let decided = domain::booking::decide(&booking, cmd.approve, cmd.decided_at)
        .map_err(|_| BookingApplicationError::AlreadyDecided)?;

    // 4. ストアに保存（ステータスだけが可変）
    deps.booking_store
        .update_status(decided.booking_id, decided.status, decided.updated_at)
        .await
        .map_err(BookingApplicationError::BookingStoreError)?;

    Ok(decided)
}

/// 予約を1件取得する（純粋な関数）
///
/// ビジネスルール：
/// - 呼び出し元が存在すること
/// - 予約が存在すること
/// - 呼び出し元が予約者またはアイテム所有者であること。
///   無関係なユーザーにはBookingNotFoundを返し、存在を漏らさない
///
/// # 引数
/// * `deps` - サービスの依存関係
/// * `booking_id` - 予約ID
/// * `caller_id` - 呼び出し元のユーザーID
#[allow(dead_code)]
pub async fn get_booking(
    deps: &ServiceDependencies,
    booking_id: BookingId,
    caller_id: UserId,
) -> Result<Booking> {
    // 1. 呼び出し元の存在確認
    ensure_user_exists(&deps.user_directory, caller_id).await?;

    // 2. 予約の取得
    let booking = deps
        .booking_store
        .find_by_id(booking_id)
        .await
        .map_err(BookingApplicationError::BookingStoreError)?
        .ok_or(BookingApplicationError::BookingNotFound)?;

    // 3. 関係者の確認（予約者または所有者のみ）
    if booking.booker_id == caller_id {
        return Ok(booking);
    }

    let item = deps
        .item_catalog
        .get(booking.item_id)
        .await
        .map_err(BookingApplicationError::ItemCatalogError)?
        .ok_or(BookingApplicationError::BookingNotFound)?;

    if item.owner_id != caller_id {
        return Err(BookingApplicationError::BookingNotFound);
    }

    Ok(booking)
}

/// 予約者側の予約一覧を取得する（純粋な関数）
///
/// ビジネスルール：
/// - 予約者が存在すること
/// - `state`は大文字小文字を区別せず
///   ALL/CURRENT/PAST/FUTURE/WAITING/REJECTEDのいずれかであること
///
/// 結果はウィンドウ開始の降順（直近のウィンドウが先頭）。
/// 空ページは正常な結果であってエラーではない。
///
/// # 引数
/// * `deps` - サービスの依存関係
/// * `booker_id` - 予約者のユーザーID
/// * `state` - 状態フィルタ文字列
/// * `page` - ページ指定（構築時点で検証済み）
#[allow(dead_code)]
pub async fn list_for_booker(
    deps: &ServiceDependencies,
    booker_id: UserId,
    state: &str,
    page: Page,
) -> Result<Vec<Booking>> {
    // 1. 予約者の存在確認
    ensure_user_exists(&deps.user_directory, booker_id).await?;

    // 2. 状態フィルタのパース
    let filter = StateFilter::from_str(state)
        .map_err(|_| BookingApplicationError::UnknownState(state.to_string()))?;

    // 3. クエリ時点のnowで述語を評価
    let now = Utc::now();
    deps.booking_store
        .query(BookingScope::Booker(booker_id), filter, now, page)
        .await
        .map_err(BookingApplicationError::BookingStoreError)
}

/// 所有者側の予約一覧を取得する（純粋な関数）
///
/// ビジネスルール：
/// - 所有者が存在すること
/// - 所有者がアイテムを1つ以上持っていること。持っていない場合は
///   予約履歴が存在し得ないため、空一覧ではなくNoItemsForOwner
/// - `state`のルールは予約者側と同じ
///
/// # 引数
/// * `deps` - サービスの依存関係
/// * `owner_id` - 所有者のユーザーID
/// * `state` - 状態フィルタ文字列
/// * `page` - ページ指定（構築時点で検証済み）
#[allow(dead_code)]
pub async fn list_for_owner(
    deps: &ServiceDependencies,
    owner_id: UserId,
    state: &str,
    page: Page,
) -> Result<Vec<Booking>> {
    // 1. 所有者の存在確認
    ensure_user_exists(&deps.user_directory, owner_id).await?;

    // 2. 所有アイテムの確認（ゼロ件なら短絡）
    let items = deps
        .item_catalog
        .items_owned_by(owner_id)
        .await
        .map_err(BookingApplicationError::ItemCatalogError)?;

    if items.is_empty() {
        return Err(BookingApplicationError::NoItemsForOwner);
    }

    // 3. 状態フィルタのパース
    let filter = StateFilter::from_str(state)
        .map_err(|_| BookingApplicationError::UnknownState(state.to_string()))?;

    // 4. 所有アイテムにスコープしたクエリ
    //
    // ストアは所有関係を知らない。ステップ2で取得したアイテムIDを
    // そのままスコープとして渡す。
    let now = Utc::now();
    deps.booking_store
        .query(BookingScope::Items(items), filter, now, page)
        .await
        .map_err(BookingApplicationError::BookingStoreError)
}
