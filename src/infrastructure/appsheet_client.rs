// AppSheetClient - AppSheet Action API用HTTPクライアント
//
// POST tables/{table}/Action にActionリクエストを送信し、JSONレスポンスを返す。
// 再試行は行わない。タイムアウト・再試行方針は呼び出し側の責務。

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, instrument};
use url::Url;

use super::config::{ConnectionConfig, ConnectionConfigError, action_url};
use crate::domain::{ActionRequest, format_error_response};

/// 認証ヘッダー名
const ACCESS_KEY_HEADER: &str = "ApplicationAccessKey";

/// リクエストタイムアウト（秒）
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// 接続タイムアウト（秒）
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// AppSheet API呼び出しのエラー型
///
/// # エラー種別
/// - `HttpError`: APIが返したエラーレスポンス
/// - `NetworkError`: ネットワーク接続エラー
/// - `SerializationError`: リクエストのシリアライズエラー
/// - `DeserializationError`: レスポンスのデシリアライズエラー
/// - `ClientBuildError`: HTTPクライアントまたはURLの構築エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppSheetApiError {
    /// HTTPエラー（ステータスコード付き）
    #[error("HTTP error: status={status}, body={body}")]
    HttpError {
        /// HTTPステータスコード
        status: u16,
        /// ステータス行（例: "400 Bad Request"）
        reason: String,
        /// レスポンスボディ
        body: String,
    },

    /// ネットワークエラー
    #[error("Network error: {0}")]
    NetworkError(String),

    /// シリアライズエラー
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// デシリアライズエラー
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// クライアント構築エラー
    #[error("Client build error: {0}")]
    ClientBuildError(String),
}

impl AppSheetApiError {
    /// 変更系アクション向けの読みやすいメッセージ
    ///
    /// HTTPエラーはボディの`type`/`detail`を優先して整形する。
    pub fn readable_message(&self) -> String {
        match self {
            AppSheetApiError::HttpError { reason, body, .. } => format_error_response(reason, body),
            other => other.to_string(),
        }
    }
}

impl From<ConnectionConfigError> for AppSheetApiError {
    fn from(err: ConnectionConfigError) -> Self {
        AppSheetApiError::ClientBuildError(err.to_string())
    }
}

/// AppSheet Action API呼び出し用トレイト
///
/// ハンドラーはこのトレイト越しにAPIを呼び出す（実際のHTTPクライアント、テスト用モック）。
#[async_trait]
pub trait AppSheetApi: Send + Sync {
    /// テーブルにActionリクエストを送信
    ///
    /// # 引数
    /// * `table` - テーブル名
    /// * `request` - Actionリクエスト
    ///
    /// # 戻り値
    /// * `Ok(Value)` - レスポンスJSON（空ボディは空配列）
    /// * `Err(AppSheetApiError)` - エラー
    async fn invoke(&self, table: &str, request: &ActionRequest) -> Result<Value, AppSheetApiError>;
}

/// reqwestを使用したAppSheet APIクライアント
#[derive(Clone)]
pub struct HttpAppSheetClient {
    /// HTTPクライアント
    client: Client,
    /// `https://<region>.appsheet.com/api/v2/apps/<app_id>/`
    base_url: Url,
    /// アクセスキー
    access_key: String,
}

impl std::fmt::Debug for HttpAppSheetClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAppSheetClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpAppSheetClient {
    /// 接続設定からクライアントを作成
    pub fn new(config: &ConnectionConfig) -> Result<Self, AppSheetApiError> {
        let base_url = config.base_url()?;
        Self::with_base_url(config, base_url)
    }

    /// ベースURLを指定して作成（モックサーバー向け）
    pub fn with_base_url(config: &ConnectionConfig, base_url: Url) -> Result<Self, AppSheetApiError> {
        info!(
            base_url = %base_url,
            "HttpAppSheetClientを初期化"
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppSheetApiError::ClientBuildError(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            access_key: config.application_access_key().to_string(),
        })
    }

    /// ベースURLを取得
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[async_trait]
impl AppSheetApi for HttpAppSheetClient {
    #[instrument(skip(self, request), fields(action = %request.action, row_count = request.rows.len()))]
    async fn invoke(&self, table: &str, request: &ActionRequest) -> Result<Value, AppSheetApiError> {
        let url = action_url(&self.base_url, table)?;
        debug!(url = %url, "Actionリクエストを送信");

        let response = self
            .client
            .post(url)
            .header(ACCESS_KEY_HEADER, &self.access_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Actionリクエスト送信に失敗");
                if e.is_builder() {
                    AppSheetApiError::SerializationError(e.to_string())
                } else {
                    AppSheetApiError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!(error = %e, "レスポンスボディの読み込みに失敗");
            AppSheetApiError::NetworkError(e.to_string())
        })?;

        if !status.is_success() {
            error!(status = %status, body = %body, table = table, "AppSheet APIエラー");
            return Err(AppSheetApiError::HttpError {
                status: status.as_u16(),
                reason: status_line(status),
                body,
            });
        }

        // 0件のFindは空ボディを返すことがある
        if body.trim().is_empty() {
            info!(status = %status, "空のレスポンス");
            return Ok(Value::Array(Vec::new()));
        }

        let value: Value = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "レスポンスのデシリアライズに失敗");
            AppSheetApiError::DeserializationError(e.to_string())
        })?;

        info!(status = %status, "Actionリクエストが完了");
        Ok(value)
    }
}

/// "400 Bad Request" 形式のステータス行
fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}
