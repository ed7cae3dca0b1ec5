// AppSheet接続設定
//
// アクセスキー・アプリID・リージョン・接続テスト用テーブルを管理し、
// すべてのリクエストのベースURLと認証ヘッダーを構築する。

use thiserror::Error;
use url::Url;

use crate::domain::{ControlType, FieldDefinition};

/// AppSheetのホスト名サフィックス
const HOST_SUFFIX: &str = ".appsheet.com";

/// 接続設定エラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConnectionConfigError {
    /// 必須の環境変数が設定されていない
    #[error("必須の環境変数が設定されていません: {0}")]
    MissingEnvVar(String),

    /// フィールド値が不正
    #[error("接続設定が不正です: {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },

    /// URL構築に失敗
    #[error("URLの構築に失敗しました: {0}")]
    InvalidUrl(String),
}

/// AppSheet接続設定
///
/// # フィールド
/// - `application_access_key`: ApplicationAccessKeyヘッダーに使用するアクセスキー
/// - `app_id`: AppSheetアプリID
/// - `region`: サブドメイン（"www" または "eu"）
/// - `test_table`: 接続テストで参照するテーブル名
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    application_access_key: String,
    app_id: String,
    region: String,
    test_table: String,
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("app_id", &self.app_id)
            .field("region", &self.region)
            .field("test_table", &self.test_table)
            .finish_non_exhaustive()
    }
}

impl ConnectionConfig {
    /// 新しい設定を作成して検証する
    pub fn new(
        application_access_key: impl Into<String>,
        app_id: impl Into<String>,
        region: impl Into<String>,
        test_table: impl Into<String>,
    ) -> Result<Self, ConnectionConfigError> {
        let config = Self {
            application_access_key: application_access_key.into(),
            app_id: app_id.into(),
            region: region.into(),
            test_table: test_table.into(),
        };
        config.validate()?;
        Ok(config)
    }

    /// 環境変数から設定を読み込み
    ///
    /// # 環境変数
    /// - `APPSHEET_APPLICATION_ACCESS_KEY`: アクセスキー（必須）
    /// - `APPSHEET_APP_ID`: アプリID（必須）
    /// - `APPSHEET_REGION`: リージョンのサブドメイン（必須）
    /// - `APPSHEET_TEST_TABLE`: 接続テスト用テーブル名（必須）
    pub fn from_env() -> Result<Self, ConnectionConfigError> {
        let application_access_key = read_env("APPSHEET_APPLICATION_ACCESS_KEY")?;
        let app_id = read_env("APPSHEET_APP_ID")?;
        let region = read_env("APPSHEET_REGION")?;
        let test_table = read_env("APPSHEET_TEST_TABLE")?;

        Self::new(application_access_key, app_id, region, test_table)
    }

    /// ホストに公開する接続フィールド定義
    pub fn fields() -> Vec<FieldDefinition> {
        vec![
            FieldDefinition::new("application_access_key")
                .with_label("Application Access Key")
                .with_control_type(ControlType::Password)
                .required(),
            FieldDefinition::new("app_id").with_label("App ID").required(),
            FieldDefinition::new("region")
                .with_label("Region")
                .with_control_type(ControlType::Subdomain)
                .with_url(HOST_SUFFIX)
                .with_hint("www or eu")
                .required(),
            FieldDefinition::new("test_table")
                .with_label("Test Table")
                .with_hint(
                    "Please enter a valid table name so the connector can verify connectivity. \
                     The table must exist. For continuity, choose the table that is most likely \
                     to not change in name.",
                )
                .required(),
        ]
    }

    fn validate(&self) -> Result<(), ConnectionConfigError> {
        require_non_empty("application_access_key", &self.application_access_key)?;
        require_non_empty("app_id", &self.app_id)?;
        require_non_empty("region", &self.region)?;
        require_non_empty("test_table", &self.test_table)?;

        if !self
            .region
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(ConnectionConfigError::InvalidField {
                field: "region",
                reason: format!("サブドメインとして使用できない文字を含みます: {}", self.region),
            });
        }

        Ok(())
    }

    /// アクセスキーを取得
    pub fn application_access_key(&self) -> &str {
        &self.application_access_key
    }

    /// アプリIDを取得
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// リージョンを取得
    pub fn region(&self) -> &str {
        &self.region
    }

    /// 接続テスト用テーブル名を取得
    pub fn test_table(&self) -> &str {
        &self.test_table
    }

    /// ベースURLを構築
    ///
    /// # 戻り値
    /// `https://<region>.appsheet.com/api/v2/apps/<app_id>/`
    pub fn base_url(&self) -> Result<Url, ConnectionConfigError> {
        let host = Url::parse(&format!("https://{}{}/", self.region, HOST_SUFFIX))
            .map_err(|e| ConnectionConfigError::InvalidUrl(e.to_string()))?;

        append_segments(&host, &["api", "v2", "apps", self.app_id.as_str(), ""])
    }
}

/// ベースURLにテーブルのActionエンドポイントを連結
///
/// テーブル名は1つのパスセグメントとしてパーセントエンコードされる。
pub fn action_url(base_url: &Url, table: &str) -> Result<Url, ConnectionConfigError> {
    append_segments(base_url, &["tables", table, "Action"])
}

/// 末尾の空セグメントを取り除いてからパスセグメントを追加
fn append_segments(base: &Url, segments: &[&str]) -> Result<Url, ConnectionConfigError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ConnectionConfigError::InvalidUrl(format!("cannot be a base: {}", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn read_env(name: &str) -> Result<String, ConnectionConfigError> {
    std::env::var(name).map_err(|_| ConnectionConfigError::MissingEnvVar(name.to_string()))
}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), ConnectionConfigError> {
    if value.trim().is_empty() {
        return Err(ConnectionConfigError::InvalidField {
            field,
            reason: "空にはできません".to_string(),
        });
    }
    Ok(())
}
