use crate::application::booking::BookingApplicationError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへの
/// マッピングを提供する。リクエストそのものが不正な場合
/// （ヘッダ欠落、不正なページ指定など）はBadRequestを使う。
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Application(BookingApplicationError),
}

impl From<BookingApplicationError> for ApiError {
    fn from(err: BookingApplicationError) -> Self {
        ApiError::Application(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.as_str()),

            ApiError::Application(err) => match err {
                // 404 Not Found - リソースが存在しない、または呼び出し元に存在を明かさない
                BookingApplicationError::UserNotFound => {
                    (StatusCode::NOT_FOUND, "USER_NOT_FOUND", "User not found")
                }
                BookingApplicationError::ItemNotFound => {
                    (StatusCode::NOT_FOUND, "ITEM_NOT_FOUND", "Item not found")
                }
                BookingApplicationError::BookingNotFound => (
                    StatusCode::NOT_FOUND,
                    "BOOKING_NOT_FOUND",
                    "Booking not found",
                ),
                BookingApplicationError::NoItemsForOwner => (
                    StatusCode::NOT_FOUND,
                    "NO_ITEMS_FOR_OWNER",
                    "Owner has no items",
                ),

                // 400 Bad Request - フィルタ文字列が解釈できない
                BookingApplicationError::UnknownState(state) => {
                    (StatusCode::BAD_REQUEST, "UNKNOWN_STATE", state.as_str())
                }

                // 409 Conflict - 現在の状態と両立しないリクエスト
                BookingApplicationError::ConflictingBooking => (
                    StatusCode::CONFLICT,
                    "CONFLICTING_BOOKING",
                    "Requested window conflicts with an existing booking",
                ),
                BookingApplicationError::AlreadyDecided => (
                    StatusCode::CONFLICT,
                    "ALREADY_DECIDED",
                    "Booking has already been decided",
                ),

                // 422 Unprocessable Entity - ビジネスルール違反
                BookingApplicationError::InvalidWindow => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "INVALID_WINDOW",
                    "Booking window start must be strictly before end",
                ),
                BookingApplicationError::ItemUnavailable => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "ITEM_UNAVAILABLE",
                    "Item is not available for booking",
                ),
                BookingApplicationError::SelfBookingForbidden => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "SELF_BOOKING_FORBIDDEN",
                    "Owner cannot book their own item",
                ),

                // 500 Internal Server Error - コラボレータ障害
                // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
                BookingApplicationError::UserDirectoryError(e) => {
                    tracing::error!("User directory error: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "USER_DIRECTORY_ERROR",
                        "User directory error",
                    )
                }
                BookingApplicationError::ItemCatalogError(e) => {
                    tracing::error!("Item catalog error: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "ITEM_CATALOG_ERROR",
                        "Item catalog error",
                    )
                }
                BookingApplicationError::BookingStoreError(e) => {
                    tracing::error!("Booking store error: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "BOOKING_STORE_ERROR",
                        "Booking store error",
                    )
                }
            },
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
