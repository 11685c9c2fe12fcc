#![allow(dead_code)]

/// 承認判定のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecideError {
    /// 既に承認または却下が確定している
    AlreadyDecided,
}
