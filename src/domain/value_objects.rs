#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 予約ID - 予約管理コンテキストの集約ID
///
/// 採番はストレージ層が行う。プロセス内のグローバルカウンタは使用しない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(Uuid);

impl BookingId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

/// アイテムID - アイテムカタログコンテキストへの参照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(Uuid);

impl ItemId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

/// ユーザーID - ユーザーディレクトリコンテキストへの参照
///
/// 予約者と所有者のどちらにも同じ型を使う。区別は役割であって型ではない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

/// 予約ウィンドウのエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowError {
    /// 終了が開始より後ではない（start >= end）
    EndNotAfterStart,
}

/// 予約ウィンドウ - 半開区間 `[start, end)`
///
/// 不変条件：`start < end`（厳密）。長さゼロや逆転したウィンドウは
/// 型システムで作成できないようにする。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl BookingWindow {
    /// ウィンドウを検証して作成する
    ///
    /// # エラー
    /// `start >= end` の場合は`WindowError::EndNotAfterStart`を返す
    pub fn try_new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, WindowError> {
        if start >= end {
            return Err(WindowError::EndNotAfterStart);
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// 半開区間同士の交差判定
    ///
    /// `a.start < b.end AND b.start < a.end` のとき交差とみなす。
    /// 端点が接するだけ（`a.end == b.start`）の場合は交差しない。
    pub fn overlaps(&self, other: &BookingWindow) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// ページ指定のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    /// ページサイズが0
    ZeroSize,
}

/// ページ指定 - オフセット/リミット方式
///
/// 不変条件：`size > 0`。`from`は結果全体に対する0始まりのインデックス。
/// 符号なし型のため負値はそもそも表現できない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    from: u32,
    size: u32,
}

impl Page {
    /// ページ指定を検証して作成する
    ///
    /// # エラー
    /// `size == 0` の場合は`PageError::ZeroSize`を返す
    pub fn try_new(from: u32, size: u32) -> Result<Self, PageError> {
        if size == 0 {
            return Err(PageError::ZeroSize);
        }
        Ok(Self { from, size })
    }

    pub fn from(&self) -> u32 {
        self.from
    }

    pub fn size(&self) -> u32 {
        self.size
    }
}
