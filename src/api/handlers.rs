use crate::application::booking::{
    ServiceDependencies, decide_booking as execute_decide_booking,
    get_booking as execute_get_booking, list_for_booker, list_for_owner,
    request_booking as execute_request_booking,
};
use crate::domain::commands::DecideBooking;
use crate::domain::value_objects::{BookingId, Page, UserId};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use std::sync::Arc;
use uuid::Uuid;

use super::{
    error::ApiError,
    types::{BookingResponse, CreateBookingRequest, DecideBookingQuery, ListBookingsQuery},
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

// ============================================================================
// Identity
// ============================================================================

/// 呼び出し元の識別に使うヘッダ
///
/// 認証・認可はスコープ外。ここで得たIDをそのまま信頼し、
/// 明示的な引数としてすべてのコア操作に渡す。
pub const USER_ID_HEADER: &str = "x-user-id";

/// ヘッダから呼び出し元のユーザーIDを取り出す
fn caller_id(headers: &HeaderMap) -> Result<UserId, ApiError> {
    let value = headers
        .get(USER_ID_HEADER)
        .ok_or_else(|| ApiError::BadRequest("X-User-Id header is required".to_string()))?;

    let value = value
        .to_str()
        .map_err(|_| ApiError::BadRequest("X-User-Id header must be valid ASCII".to_string()))?;

    let uuid = Uuid::parse_str(value)
        .map_err(|_| ApiError::BadRequest("X-User-Id header must be a UUID".to_string()))?;

    Ok(UserId::from_uuid(uuid))
}

/// クエリパラメータからページ指定を組み立てる
fn page_from_query(query: &ListBookingsQuery) -> Result<Page, ApiError> {
    Page::try_new(query.from(), query.size())
        .map_err(|_| ApiError::BadRequest("size must be strictly positive".to_string()))
}

// ============================================================================
// Command handlers (POST / PATCH)
// ============================================================================

/// POST /bookings - 新しい予約をリクエスト
///
/// X-User-Idヘッダのユーザーを予約者として予約を作成する。
///
/// 強制されるビジネスルール:
/// - 予約者とアイテムが存在すること
/// - ウィンドウが start < end を満たすこと
/// - アイテムが予約受付中であること
/// - 却下済みを除く既存予約とウィンドウが交差しないこと
/// - 所有者自身の予約でないこと
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    let booker_id = caller_id(&headers)?;
    let cmd = req.to_command(booker_id, chrono::Utc::now());

    let booking = execute_request_booking(&state.service_deps, cmd).await?;

    Ok((StatusCode::CREATED, Json(BookingResponse::from(booking))))
}

/// PATCH /bookings/:id - 予約の承認判定
///
/// X-User-Idヘッダのユーザーを所有者として承認または却下を確定する。
///
/// 強制されるビジネスルール:
/// - 判定者が存在し、予約のアイテムを所有していること
///   （所有していない場合は404。存在は明かさない）
/// - 予約がWaiting状態であること（判定は一度きり）
pub async fn decide_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(booking_id): Path<Uuid>,
    Query(query): Query<DecideBookingQuery>,
) -> Result<Json<BookingResponse>, ApiError> {
    let owner_id = caller_id(&headers)?;

    let cmd = DecideBooking {
        booking_id: BookingId::from_uuid(booking_id),
        owner_id,
        approve: query.approved,
        decided_at: chrono::Utc::now(),
    };

    let booking = execute_decide_booking(&state.service_deps, cmd).await?;

    Ok(Json(BookingResponse::from(booking)))
}

// ============================================================================
// Query handlers (GET)
// ============================================================================

/// GET /bookings/:id - 予約詳細をIDで取得
///
/// 予約者または所有者のみ取得できる。無関係なユーザーには404を返す。
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingResponse>, ApiError> {
    let requester_id = caller_id(&headers)?;

    let booking = execute_get_booking(
        &state.service_deps,
        BookingId::from_uuid(booking_id),
        requester_id,
    )
    .await?;

    Ok(Json(BookingResponse::from(booking)))
}

/// GET /bookings - 予約者側の予約一覧
///
/// クエリパラメータ:
/// - state: 状態フィルタ（ALL/CURRENT/PAST/FUTURE/WAITING/REJECTED、省略時はALL）
/// - from: 先頭結果の0始まりインデックス（省略時は0）
/// - size: ページサイズ（省略時は10、0は不可）
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let booker_id = caller_id(&headers)?;
    let page = page_from_query(&query)?;

    let bookings = list_for_booker(&state.service_deps, booker_id, query.state(), page).await?;

    Ok(Json(
        bookings.into_iter().map(BookingResponse::from).collect(),
    ))
}

/// GET /owners/bookings - 所有者側の予約一覧
///
/// 自分の所有アイテムに対する予約を横断して返す。
/// アイテムを1つも所有していない場合は404。
pub async fn list_owner_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let owner_id = caller_id(&headers)?;
    let page = page_from_query(&query)?;

    let bookings = list_for_owner(&state.service_deps, owner_id, query.state(), page).await?;

    Ok(Json(
        bookings.into_iter().map(BookingResponse::from).collect(),
    ))
}
