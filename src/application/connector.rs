/// コネクター定義とディスパッチ
///
/// 接続テスト・4つのアクション・1つのトリガーを関数テーブルとして束ね、
/// ホストからのリクエストを各ハンドラーに委譲する。
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::{info, instrument};

use super::add_rows::AddRowsHandler;
use super::connection_test::ConnectionTest;
use super::delete_rows::DeleteRowsHandler;
use super::error::ConnectorError;
use super::get_rows::GetRowsHandler;
use super::rows_payload::RowsPayload;
use super::table_config::TableConfig;
use super::update_rows::UpdateRowsHandler;
use super::updated_row_trigger::UpdatedRowTrigger;
use crate::domain::Row;
use crate::infrastructure::{AppSheetApi, ConnectionConfig};

/// コネクターの表示名
pub const CONNECTOR_TITLE: &str = "Google AppSheet";

/// アクション名
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionName {
    GetRows,
    AddRows,
    UpdateRows,
    DeleteRows,
}

impl ActionName {
    pub const ALL: [ActionName; 4] = [
        ActionName::GetRows,
        ActionName::AddRows,
        ActionName::UpdateRows,
        ActionName::DeleteRows,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionName::GetRows => "get_rows",
            ActionName::AddRows => "add_rows",
            ActionName::UpdateRows => "update_rows",
            ActionName::DeleteRows => "delete_rows",
        }
    }
}

/// ホストからのリクエスト
///
/// `operation`フィールドで操作を判別する。
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum ConnectorRequest {
    /// コネクター全体の定義
    Describe,
    /// 接続テスト
    Test,
    /// 接続フィールド
    ConnectionFields,
    /// アクション実行
    Execute {
        action: ActionName,
        config: TableConfig,
        #[serde(default)]
        input: Value,
    },
    /// アクションの入力フィールド
    InputFields {
        action: ActionName,
        config: TableConfig,
    },
    /// アクションの出力フィールド
    OutputFields {
        action: ActionName,
        config: TableConfig,
    },
    /// トリガーのポーリング（入力はそのまま`next_poll`になる）
    Poll { input: Map<String, Value> },
    /// トリガーの重複排除キー
    Dedup { record: Row },
    /// トリガーの入力フィールド
    TriggerInputFields,
    /// トリガーの出力フィールド
    TriggerOutputFields { config: Map<String, Value> },
    /// トリガーのサンプル出力
    SampleOutput { input: Map<String, Value> },
}

impl ConnectorRequest {
    fn operation(&self) -> &'static str {
        match self {
            ConnectorRequest::Describe => "describe",
            ConnectorRequest::Test => "test",
            ConnectorRequest::ConnectionFields => "connection_fields",
            ConnectorRequest::Execute { .. } => "execute",
            ConnectorRequest::InputFields { .. } => "input_fields",
            ConnectorRequest::OutputFields { .. } => "output_fields",
            ConnectorRequest::Poll { .. } => "poll",
            ConnectorRequest::Dedup { .. } => "dedup",
            ConnectorRequest::TriggerInputFields => "trigger_input_fields",
            ConnectorRequest::TriggerOutputFields { .. } => "trigger_output_fields",
            ConnectorRequest::SampleOutput { .. } => "sample_output",
        }
    }
}

/// AppSheetコネクター
pub struct Connector<A: AppSheetApi> {
    connection_test: ConnectionTest<A>,
    get_rows: GetRowsHandler<A>,
    add_rows: AddRowsHandler<A>,
    update_rows: UpdateRowsHandler<A>,
    delete_rows: DeleteRowsHandler<A>,
    updated_row: UpdatedRowTrigger<A>,
}

impl<A: AppSheetApi + Clone> Connector<A> {
    /// 新しいConnectorを作成
    ///
    /// # 引数
    /// * `api` - AppSheet APIクライアント
    /// * `test_table` - 接続テストで使用するテーブル名
    pub fn new(api: A, test_table: impl Into<String>) -> Self {
        Self {
            connection_test: ConnectionTest::new(api.clone(), test_table),
            get_rows: GetRowsHandler::new(api.clone()),
            add_rows: AddRowsHandler::new(api.clone()),
            update_rows: UpdateRowsHandler::new(api.clone()),
            delete_rows: DeleteRowsHandler::new(api.clone()),
            updated_row: UpdatedRowTrigger::new(api),
        }
    }

    /// コネクター定義（接続フィールド・アクション・トリガー）
    pub fn describe() -> Value {
        let actions: Vec<Value> = ActionName::ALL
            .into_iter()
            .map(|name| {
                let config_fields = match name {
                    ActionName::UpdateRows | ActionName::DeleteRows => {
                        TableConfig::fields_with_key_column()
                    }
                    ActionName::GetRows | ActionName::AddRows => TableConfig::fields(),
                };
                json!({
                    "name": name.as_str(),
                    "title": Self::action_title(name),
                    "config_fields": config_fields,
                })
            })
            .collect();

        json!({
            "title": CONNECTOR_TITLE,
            "connection": { "fields": ConnectionConfig::fields() },
            "actions": actions,
            "triggers": [{
                "name": UpdatedRowTrigger::<A>::NAME,
                "title": UpdatedRowTrigger::<A>::TITLE,
                "config_fields": UpdatedRowTrigger::<A>::config_fields(),
            }],
        })
    }

    /// リクエストを対応するハンドラーに委譲
    #[instrument(skip_all, fields(operation = request.operation()))]
    pub async fn dispatch(&self, request: ConnectorRequest) -> Result<Value, ConnectorError> {
        info!("リクエストを処理");

        match request {
            ConnectorRequest::Describe => Ok(Self::describe()),
            ConnectorRequest::Test => Ok(serde_json::to_value(self.connection_test.run().await?)?),
            ConnectorRequest::ConnectionFields => {
                Ok(serde_json::to_value(ConnectionConfig::fields())?)
            }
            ConnectorRequest::Execute {
                action,
                config,
                input,
            } => self.execute(action, &config, input).await,
            ConnectorRequest::InputFields { action, config } => {
                let fields = match action {
                    ActionName::GetRows => self.get_rows.input_fields(&config).await?,
                    ActionName::AddRows => self.add_rows.rows_fields(&config).await?,
                    ActionName::UpdateRows => self.update_rows.input_fields(&config).await?,
                    ActionName::DeleteRows => self.delete_rows.input_fields(&config).await?,
                };
                Ok(serde_json::to_value(fields)?)
            }
            ConnectorRequest::OutputFields { action, config } => {
                let fields = match action {
                    ActionName::GetRows => self.get_rows.output_fields(&config).await?,
                    ActionName::AddRows => self.add_rows.rows_fields(&config).await?,
                    ActionName::UpdateRows => self.update_rows.output_fields(&config).await?,
                    ActionName::DeleteRows => self.delete_rows.output_fields(&config).await?,
                };
                Ok(serde_json::to_value(fields)?)
            }
            ConnectorRequest::Poll { input } => {
                Ok(serde_json::to_value(self.updated_row.poll(&input).await?)?)
            }
            ConnectorRequest::Dedup { record } => {
                Ok(Value::String(UpdatedRowTrigger::<A>::dedup(&record)))
            }
            ConnectorRequest::TriggerInputFields => {
                Ok(serde_json::to_value(UpdatedRowTrigger::<A>::input_fields())?)
            }
            ConnectorRequest::TriggerOutputFields { config } => {
                Ok(serde_json::to_value(self.updated_row.output_fields(&config).await?)?)
            }
            ConnectorRequest::SampleOutput { input } => {
                Ok(Value::Object(self.updated_row.sample_output(&input).await?))
            }
        }
    }

    fn action_title(name: ActionName) -> &'static str {
        match name {
            ActionName::GetRows => GetRowsHandler::<A>::TITLE,
            ActionName::AddRows => AddRowsHandler::<A>::TITLE,
            ActionName::UpdateRows => UpdateRowsHandler::<A>::TITLE,
            ActionName::DeleteRows => DeleteRowsHandler::<A>::TITLE,
        }
    }

    /// アクションを実行
    pub async fn execute(
        &self,
        action: ActionName,
        config: &TableConfig,
        input: Value,
    ) -> Result<Value, ConnectorError> {
        let output = match action {
            ActionName::GetRows => {
                let filters = filter_input(input)?;
                self.get_rows.execute(config, &filters).await?
            }
            ActionName::AddRows => {
                self.add_rows
                    .execute(config, RowsPayload::from_input(input)?)
                    .await?
            }
            ActionName::UpdateRows => {
                self.update_rows
                    .execute(config, RowsPayload::from_input(input)?)
                    .await?
            }
            ActionName::DeleteRows => {
                self.delete_rows
                    .execute(config, RowsPayload::from_input(input)?)
                    .await?
            }
        };
        Ok(serde_json::to_value(output)?)
    }
}

/// get_rowsの入力をフィルターに変換（nullは条件なし）
fn filter_input(input: Value) -> Result<Row, ConnectorError> {
    match input {
        Value::Null => Ok(Row::new()),
        Value::Object(filters) => Ok(filters),
        other => Err(ConnectorError::InvalidInput(format!(
            "get_rows input must be an object, got {}",
            other
        ))),
    }
}
