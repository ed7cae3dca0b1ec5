/// get_rowsアクション
///
/// 全列を任意のフィルター入力として公開し、指定された値の等価条件で
/// Findを実行する。
use tracing::{debug, info, instrument};

use super::error::ConnectorError;
use super::rows_payload::{RowsPayload, extract_rows};
use super::schema_resolver::SchemaResolver;
use super::table_config::TableConfig;
use crate::domain::{ActionRequest, FieldDefinition, Row, SelectorBuilder};
use crate::infrastructure::AppSheetApi;

pub struct GetRowsHandler<A: AppSheetApi> {
    api: A,
    schema: SchemaResolver<A>,
}

impl<A: AppSheetApi + Clone> GetRowsHandler<A> {
    pub const TITLE: &'static str = "Get rows";

    pub fn new(api: A) -> Self {
        Self {
            schema: SchemaResolver::new(api.clone()),
            api,
        }
    }

    /// 入力フィールド: 全列を任意フィルターとして公開
    pub async fn input_fields(
        &self,
        config: &TableConfig,
    ) -> Result<Vec<FieldDefinition>, ConnectorError> {
        self.schema.column_fields(config.table()?, true).await
    }

    /// 出力フィールド: `Rows`（列を要素とするオブジェクト配列）
    pub async fn output_fields(
        &self,
        config: &TableConfig,
    ) -> Result<Vec<FieldDefinition>, ConnectorError> {
        let columns = self.schema.column_fields(config.table()?, true).await?;
        Ok(vec![FieldDefinition::array_of_objects("Rows", columns)])
    }

    /// フィルター条件に合致する行を取得
    ///
    /// # 引数
    /// * `config` - テーブル設定
    /// * `filters` - 列名と値（null・空文字列は無視）
    #[instrument(skip(self, filters), fields(table = %config.table_name))]
    pub async fn execute(
        &self,
        config: &TableConfig,
        filters: &Row,
    ) -> Result<RowsPayload, ConnectorError> {
        let table = config.table()?;

        let mut builder = SelectorBuilder::new();
        for (column, value) in filters {
            builder = builder.equals(column, value)?;
        }
        let selector = builder.build();
        debug!(clause_count = builder.len(), selector = ?selector, "Selectorを構築");

        let response = self
            .api
            .invoke(table, &ActionRequest::find_with_selector(selector))
            .await?;
        let rows = extract_rows(response)?;

        info!(row_count = rows.len(), "get_rowsが完了");
        Ok(RowsPayload::new(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::appsheet_client::tests::MockAppSheetApi;
    use serde_json::{Value, json};

    fn filters(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    fn handler_with(response: Value) -> (GetRowsHandler<MockAppSheetApi>, MockAppSheetApi) {
        let api = MockAppSheetApi::new();
        api.push_response(response);
        (GetRowsHandler::new(api.clone()), api)
    }

    // ==================== フィールド定義テスト ====================

    #[tokio::test]
    async fn test_input_fields_are_optional_columns() {
        let (handler, _api) = handler_with(json!([{"_RowNumber": "2", "Name": "Alice"}]));

        let fields = handler.input_fields(&TableConfig::new("T")).await.unwrap();

        assert_eq!(fields[0].name, "_RowNumber");
        assert_eq!(fields[1].name, "Name");
        assert!(fields.iter().all(|f| f.optional));
    }

    #[tokio::test]
    async fn test_output_fields() {
        let (handler, _api) = handler_with(json!([{"_RowNumber": "2", "Name": "Alice"}]));

        let fields = handler.output_fields(&TableConfig::new("T")).await.unwrap();
        let json = serde_json::to_value(&fields).unwrap();

        assert_eq!(json[0]["name"], "Rows");
        assert_eq!(json[0]["type"], "array");
        assert_eq!(json[0]["properties"][0]["name"], "_RowNumber");
    }

    // ==================== 実行テスト ====================

    #[tokio::test]
    async fn test_execute_without_filters_returns_all_rows() {
        let (handler, api) = handler_with(json!([
            {"_RowNumber": "2", "Name": "Alice"},
            {"_RowNumber": "3", "Name": "Bob"}
        ]));

        let output = handler
            .execute(&TableConfig::new("Contacts"), &Row::new())
            .await
            .unwrap();

        assert_eq!(output.rows.len(), 2);
        let (_, request) = api.last_request().unwrap();
        assert_eq!(request, json!({"Action": "Find", "Properties": {}, "Rows": []}));
    }

    #[tokio::test]
    async fn test_execute_with_one_filter() {
        let (handler, api) = handler_with(json!([{"_RowNumber": "1", "Name": "Alice"}]));

        let output = handler
            .execute(&TableConfig::new("Contacts"), &filters(json!({"_RowNumber": 1})))
            .await
            .unwrap();

        assert_eq!(output.rows.len(), 1);
        let (_, request) = api.last_request().unwrap();
        assert_eq!(request["Properties"]["Selector"], "([_RowNumber] = \"1\")");
    }

    #[tokio::test]
    async fn test_execute_with_multiple_filters() {
        let (handler, api) = handler_with(json!([{"_RowNumber": "2", "Name": "Alice"}]));

        handler
            .execute(
                &TableConfig::new("Contacts"),
                &filters(json!({"Name": "Alice", "Email": null, "City": "Tokyo", "Note": ""})),
            )
            .await
            .unwrap();

        let (_, request) = api.last_request().unwrap();
        assert_eq!(
            request["Properties"]["Selector"],
            "AND(([Name] = \"Alice\"), ([City] = \"Tokyo\"))"
        );
    }

    #[tokio::test]
    async fn test_execute_escapes_quotes() {
        let (handler, api) = handler_with(json!([]));

        handler
            .execute(
                &TableConfig::new("Contacts"),
                &filters(json!({"Name": "O\"Brien"})),
            )
            .await
            .unwrap();

        let (_, request) = api.last_request().unwrap();
        assert_eq!(request["Properties"]["Selector"], "([Name] = \"O\"\"Brien\")");
    }

    #[tokio::test]
    async fn test_execute_rejects_invalid_column() {
        let api = MockAppSheetApi::new();
        let handler = GetRowsHandler::new(api.clone());

        let error = handler
            .execute(&TableConfig::new("Contacts"), &filters(json!({"a]b": "x"})))
            .await
            .unwrap_err();

        assert!(matches!(error, ConnectorError::InvalidInput(_)));
        assert!(api.requests().is_empty());
    }
}
