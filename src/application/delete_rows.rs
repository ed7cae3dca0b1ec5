/// delete_rowsアクション
///
/// キー列のみを持つ行をDeleteアクションで送信する。
use tracing::{info, instrument};

use super::error::ConnectorError;
use super::rows_payload::{RowsPayload, extract_rows};
use super::schema_resolver::{SchemaResolver, pick_key_column};
use super::table_config::TableConfig;
use super::update_rows::require_key;
use crate::domain::{ActionRequest, FieldDefinition, Row};
use crate::infrastructure::AppSheetApi;

pub struct DeleteRowsHandler<A: AppSheetApi> {
    api: A,
    schema: SchemaResolver<A>,
}

impl<A: AppSheetApi + Clone> DeleteRowsHandler<A> {
    pub const TITLE: &'static str = "Delete rows";

    pub fn new(api: A) -> Self {
        Self {
            schema: SchemaResolver::new(api.clone()),
            api,
        }
    }

    /// 入力フィールド: `Rows`（キー列のみ、必須）
    pub async fn input_fields(
        &self,
        config: &TableConfig,
    ) -> Result<Vec<FieldDefinition>, ConnectorError> {
        let key_column = match config.key_column.as_deref() {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => {
                let columns = self
                    .schema
                    .get_columns_using_table_name(config.table()?)
                    .await?;
                pick_key_column(&columns).to_string()
            }
        };

        Ok(vec![FieldDefinition::array_of_objects(
            "Rows",
            vec![FieldDefinition::new(key_column).required()],
        )])
    }

    /// 出力フィールド: `Rows`（全列を持つオブジェクト配列）
    pub async fn output_fields(
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

        let key_column = self.schema.resolve_key_column(config).await?;
        let identifiers = input
            .rows
            .iter()
            .map(|row| {
                require_key(row, &key_column)?;
                let mut identifier = Row::new();
                if let Some(value) = row.get(&key_column) {
                    identifier.insert(key_column.clone(), value.clone());
                }
                Ok(identifier)
            })
            .collect::<Result<Vec<Row>, ConnectorError>>()?;

        let response = self
            .api
            .invoke(table, &ActionRequest::delete(identifiers))
            .await
            .map_err(ConnectorError::from_mutation)?;
        let rows = extract_rows(response)?;

        info!(deleted_count = rows.len(), key_column = %key_column, "delete_rowsが完了");
        Ok(RowsPayload::new(rows))
    }
}
