/// コネクター操作のエラー型
///
/// - 接続・認証エラー: HTTP層のエラーをそのまま伝える
/// - スキーマ解決エラー: テーブルが空（ユーザーが対処できるメッセージ）
/// - 変更系エラー: APIのエラーボディを1行のメッセージに整形したもの
use thiserror::Error;

use crate::domain::SelectorError;
use crate::infrastructure::AppSheetApiError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectorError {
    /// 接続・認証エラー
    #[error(transparent)]
    Connectivity(#[from] AppSheetApiError),

    /// サンプル行が存在しない
    #[error(
        "Table '{table}' has no rows. Please add at least one example row so the connector can discover its columns."
    )]
    EmptyTable { table: String },

    /// Add/Edit/Deleteの失敗
    #[error("{0}")]
    Mutation(String),

    /// 入力値が不正
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 想定外のレスポンス形式
    #[error("Unexpected response from AppSheet: {0}")]
    InvalidResponse(String),

    /// 出力のシリアライズエラー
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ConnectorError {
    /// 変更系アクションのAPIエラーを変換
    ///
    /// エラーレスポンスは読みやすいメッセージに、それ以外は接続エラーのまま。
    pub fn from_mutation(err: AppSheetApiError) -> Self {
        match err {
            AppSheetApiError::HttpError { .. } => ConnectorError::Mutation(err.readable_message()),
            other => ConnectorError::Connectivity(other),
        }
    }
}

impl From<SelectorError> for ConnectorError {
    fn from(err: SelectorError) -> Self {
        ConnectorError::InvalidInput(err.to_string())
    }
}

impl From<serde_json::Error> for ConnectorError {
    fn from(err: serde_json::Error) -> Self {
        ConnectorError::Serialization(err.to_string())
    }
}
