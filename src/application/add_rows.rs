/// add_rowsアクション
///
/// 入力された行をそのままAddアクションで送信する。
use tracing::{info, instrument};

use super::error::ConnectorError;
use super::rows_payload::{RowsPayload, extract_rows};
use super::schema_resolver::SchemaResolver;
use super::table_config::TableConfig;
use crate::domain::{ActionRequest, FieldDefinition};
use crate::infrastructure::AppSheetApi;

pub struct AddRowsHandler<A: AppSheetApi> {
    api: A,
    schema: SchemaResolver<A>,
}

impl<A: AppSheetApi + Clone> AddRowsHandler<A> {
    pub const TITLE: &'static str = "Add rows";

    pub fn new(api: A) -> Self {
        Self {
            schema: SchemaResolver::new(api.clone()),
            api,
        }
    }

    /// 入力・出力フィールド: `Rows`（全列を持つオブジェクト配列）
    pub async fn rows_fields(
        &self,
        config: &TableConfig,
    ) -> Result<Vec<FieldDefinition>, ConnectorError> {
        let columns = self.schema.column_fields(config.table()?, true).await?;
        Ok(vec![FieldDefinition::array_of_objects("Rows", columns)])
    }

    #[instrument(skip(self, input), fields(table = %config.table_name, row_count = input.rows.len()))]
    pub async fn execute(
        &self,
        config: &TableConfig,
        input: RowsPayload,
    ) -> Result<RowsPayload, ConnectorError> {
        let table = config.table()?;
        input.require_rows()?;

        let response = self
            .api
            .invoke(table, &ActionRequest::add(input.rows))
            .await
            .map_err(ConnectorError::from_mutation)?;
        let rows = extract_rows(response)?;

        info!(added_count = rows.len(), "add_rowsが完了");
        Ok(RowsPayload::new(rows))
    }
}
