/// update_rowsアクション
///
/// 各行からnullのフィールドを取り除いてEditアクションで送信する。
/// 指定されなかったフィールドはサーバー側で変更されない。
use tracing::{info, instrument};

use super::error::ConnectorError;
use super::rows_payload::{RowsPayload, extract_rows};
use super::schema_resolver::{SchemaResolver, pick_key_column};
use super::table_config::TableConfig;
use crate::domain::{ActionRequest, FieldDefinition, Row, compact_row, row::is_present};
use crate::infrastructure::AppSheetApi;

pub struct UpdateRowsHandler<A: AppSheetApi> {
    api: A,
    schema: SchemaResolver<A>,
}

impl<A: AppSheetApi + Clone> UpdateRowsHandler<A> {
    pub const TITLE: &'static str = "Update rows";

    pub fn new(api: A) -> Self {
        Self {
            schema: SchemaResolver::new(api.clone()),
            api,
        }
    }

    /// 入力フィールド: キー列のみ必須
    pub async fn input_fields(
        &self,
        config: &TableConfig,
    ) -> Result<Vec<FieldDefinition>, ConnectorError> {
        let columns = self
            .schema
            .get_columns_using_table_name(config.table()?)
            .await?;
        let key_column = match config.key_column.as_deref() {
            Some(key) if !key.is_empty() => key,
            _ => pick_key_column(&columns),
        };

        let properties = columns
            .iter()
            .map(|column| column.to_field(column.name != key_column))
            .collect();
        Ok(vec![FieldDefinition::array_of_objects("Rows", properties)])
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
        let rows = input
            .rows
            .iter()
            .map(|row| {
                let compacted = compact_row(row);
                require_key(&compacted, &key_column)?;
                Ok(compacted)
            })
            .collect::<Result<Vec<Row>, ConnectorError>>()?;

        let response = self
            .api
            .invoke(table, &ActionRequest::edit(rows))
            .await
            .map_err(ConnectorError::from_mutation)?;
        let rows = extract_rows(response)?;

        info!(updated_count = rows.len(), key_column = %key_column, "update_rowsが完了");
        Ok(RowsPayload::new(rows))
    }
}

/// 行がキー列の値を持つことを確認
pub(crate) fn require_key(row: &Row, key_column: &str) -> Result<(), ConnectorError> {
    match row.get(key_column) {
        Some(value) if is_present(value) => Ok(()),
        _ => Err(ConnectorError::InvalidInput(format!(
            "every row must include the key column '{}'",
            key_column
        ))),
    }
}
