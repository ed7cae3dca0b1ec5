/// updated_rowトリガー（新規・更新行）
///
/// ポーリングのたびにテーブル全体をFindし、全行をイベントとして返す。
/// カーソルは持たず、重複排除は行番号を除いた行内容のキーで行う。
/// 内容が変わった行は新しいキーになるため、更新も検知できる。
///
/// 入力設定は生のJSONオブジェクトのまま扱い、`next_poll`として
/// 一切変更せずに返す。
///
/// # 注意
/// 毎回全行を取得するため、行数に比例して転送量が増える。
/// 大きなテーブルでは常駐サービス側でスナップショット差分などの
/// 状態管理が必要になる。
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, instrument};

use super::error::ConnectorError;
use super::schema_resolver::SchemaResolver;
use super::table_config::{TableConfig, table_name_of};
use crate::domain::{FieldDefinition, Row, dedup_key};
use crate::infrastructure::AppSheetApi;

/// ポーリング結果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollResult {
    /// 取得した全行
    pub events: Vec<Row>,
    /// 常にfalse（ページングなし）
    pub can_poll_more: bool,
    /// 入力と同一の設定
    pub next_poll: Map<String, Value>,
}

pub struct UpdatedRowTrigger<A: AppSheetApi> {
    schema: SchemaResolver<A>,
}

impl<A: AppSheetApi> UpdatedRowTrigger<A> {
    pub const NAME: &'static str = "updated_row";
    pub const TITLE: &'static str = "New/updated row";

    pub fn new(api: A) -> Self {
        Self {
            schema: SchemaResolver::new(api),
        }
    }

    /// 設定フィールド
    pub fn config_fields() -> Vec<FieldDefinition> {
        TableConfig::fields()
    }

    /// 入力フィールド（なし）
    pub fn input_fields() -> Vec<FieldDefinition> {
        Vec::new()
    }

    /// テーブル全体をポーリング
    #[instrument(skip_all)]
    pub async fn poll(&self, input: &Map<String, Value>) -> Result<PollResult, ConnectorError> {
        let table = table_name_of(input)?;
        let events = self.schema.find_all(table).await?;
        info!(table = table, event_count = events.len(), "ポーリングが完了");

        Ok(PollResult {
            events,
            can_poll_more: false,
            next_poll: input.clone(),
        })
    }

    /// 重複排除キー
    pub fn dedup(record: &Row) -> String {
        dedup_key(record)
    }

    /// 出力フィールド: サンプル行の列
    pub async fn output_fields(
        &self,
        config: &Map<String, Value>,
    ) -> Result<Vec<FieldDefinition>, ConnectorError> {
        self.schema.column_fields(table_name_of(config)?, true).await
    }

    /// サンプル出力: テーブルの先頭行
    pub async fn sample_output(&self, input: &Map<String, Value>) -> Result<Row, ConnectorError> {
        self.schema.sample_row(table_name_of(input)?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::appsheet_client::tests::MockAppSheetApi;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    fn config(table: &str) -> Map<String, Value> {
        row(json!({"table_name": table}))
    }

    fn trigger_with(response: Value) -> (UpdatedRowTrigger<MockAppSheetApi>, MockAppSheetApi) {
        let api = MockAppSheetApi::new();
        api.push_response(response);
        (UpdatedRowTrigger::new(api.clone()), api)
    }

    // ==================== pollテスト ====================

    #[tokio::test]
    async fn test_poll_cannot_poll_more() {
        let (trigger, _api) = trigger_with(json!([{"_RowNumber": "2", "Name": "Alice"}]));

        let output = trigger.poll(&config("Contacts")).await.unwrap();
        assert!(!output.can_poll_more);
    }

    #[tokio::test]
    async fn test_poll_has_events() {
        let (trigger, api) = trigger_with(json!([
            {"_RowNumber": "2", "Name": "Alice"},
            {"_RowNumber": "3", "Name": "Bob"}
        ]));

        let output = trigger.poll(&config("Contacts")).await.unwrap();

        assert_eq!(output.events.len(), 2);
        assert_eq!(output.events[0]["Name"], json!("Alice"));
        let (_, request) = api.last_request().unwrap();
        assert_eq!(request, json!({"Action": "Find", "Properties": {}, "Rows": []}));
    }

    #[tokio::test]
    async fn test_poll_next_poll_equals_input() {
        let (trigger, _api) = trigger_with(json!([]));
        let input = row(json!({
            "table_name": "Contacts",
            "key_column": null,
            "custom": 1,
            "nested": {"since": ["2024-01-01"]}
        }));

        let output = trigger.poll(&input).await.unwrap();

        assert_eq!(output.next_poll, input);
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["next_poll"], Value::Object(input));
        assert_eq!(json["can_poll_more"], json!(false));
    }

    #[tokio::test]
    async fn test_poll_accepts_non_string_extra_keys() {
        let (trigger, api) = trigger_with(json!([{"_RowNumber": "2", "Name": "Alice"}]));
        let input = row(json!({"table_name": "Contacts", "key_column": 5}));

        let output = trigger.poll(&input).await.unwrap();

        assert_eq!(output.events.len(), 1);
        assert_eq!(output.next_poll["key_column"], json!(5));
        assert_eq!(api.last_request().unwrap().0, "Contacts");
    }

    #[tokio::test]
    async fn test_poll_requires_table_name() {
        let api = MockAppSheetApi::new();
        let trigger = UpdatedRowTrigger::new(api.clone());

        let error = trigger.poll(&row(json!({"table_name": 1}))).await.unwrap_err();

        assert!(matches!(error, ConnectorError::InvalidInput(_)));
        assert!(api.requests().is_empty());
    }

    // ==================== dedupテスト ====================

    #[test]
    fn test_dedup_removes_row_number() {
        let record = row(json!({"_RowNumber": 1, "Test": "Test"}));
        assert_eq!(
            UpdatedRowTrigger::<MockAppSheetApi>::dedup(&record),
            json!({"Test": "Test"}).to_string()
        );
    }

    #[test]
    fn test_dedup_changes_when_row_content_changes() {
        let alice = row(json!({"_RowNumber": "2", "Name": "Alice"}));
        let moved = row(json!({"_RowNumber": "7", "Name": "Alice"}));
        let updated = row(json!({"_RowNumber": "2", "Name": "Alicia"}));

        let dedup = UpdatedRowTrigger::<MockAppSheetApi>::dedup;
        assert_eq!(dedup(&alice), dedup(&moved));
        assert_ne!(dedup(&alice), dedup(&updated));
    }

    // ==================== フィールド・サンプルテスト ====================

    #[test]
    fn test_input_fields_empty() {
        assert!(UpdatedRowTrigger::<MockAppSheetApi>::input_fields().is_empty());
        assert_eq!(
            UpdatedRowTrigger::<MockAppSheetApi>::config_fields()[0].name,
            "table_name"
        );
    }

    #[tokio::test]
    async fn test_sample_output_has_row_number_and_columns() {
        let (trigger, _api) = trigger_with(json!([{"_RowNumber": "2", "Name": "Alice"}]));

        let sample = trigger.sample_output(&config("Contacts")).await.unwrap();

        assert!(sample["_RowNumber"].is_string());
        assert!(sample.keys().len() > 1);
    }

    #[tokio::test]
    async fn test_output_fields() {
        let (trigger, _api) = trigger_with(json!([{"_RowNumber": "2", "Name": "Alice"}]));

        let fields = trigger.output_fields(&config("Contacts")).await.unwrap();

        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "_RowNumber");
    }

    #[tokio::test]
    async fn test_sample_output_empty_table() {
        let (trigger, _api) = trigger_with(json!([]));

        let error = trigger.sample_output(&config("Empty")).await.unwrap_err();
        assert!(matches!(error, ConnectorError::EmptyTable { .. }));
    }
}
