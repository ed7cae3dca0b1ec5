/// スキーマリゾルバー
///
/// テーブルから1行をサンプリングし、そのキーを列として返す。
/// スキーマはキャッシュせず、呼び出しごとにAPIへ問い合わせる。
use tracing::{debug, info, warn};

use super::error::ConnectorError;
use super::rows_payload::extract_rows;
use super::table_config::TableConfig;
use crate::domain::{
    ActionRequest, Column, FieldDefinition, ROW_NUMBER_FIELD, Row, infer_columns,
};
use crate::infrastructure::AppSheetApi;

/// キー列が指定されないときに優先する列名
const DEFAULT_KEY_COLUMN: &str = "Row ID";

pub struct SchemaResolver<A: AppSheetApi> {
    api: A,
}

impl<A: AppSheetApi> SchemaResolver<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// テーブルの全行を取得（行フィルターなしのFind）
    pub async fn find_all(&self, table: &str) -> Result<Vec<Row>, ConnectorError> {
        let response = self.api.invoke(table, &ActionRequest::find_all()).await?;
        extract_rows(response)
    }

    /// サンプル行を取得
    ///
    /// # 戻り値
    /// * `Ok(Row)` - 先頭行
    /// * `Err(ConnectorError::EmptyTable)` - テーブルに行がない
    pub async fn sample_row(&self, table: &str) -> Result<Row, ConnectorError> {
        let rows = self.find_all(table).await?;
        debug!(table = table, row_count = rows.len(), "サンプル行を取得");

        rows.into_iter().next().ok_or_else(|| {
            warn!(table = table, "テーブルに行がないため列を推論できない");
            ConnectorError::EmptyTable {
                table: table.to_string(),
            }
        })
    }

    /// テーブル名から列一覧を取得
    ///
    /// 列順はサンプル行のキー順。呼び出し間で安定する保証はない。
    pub async fn get_columns_using_table_name(
        &self,
        table: &str,
    ) -> Result<Vec<Column>, ConnectorError> {
        let sample = self.sample_row(table).await?;
        let columns = infer_columns(&sample);
        info!(table = table, column_count = columns.len(), "列を解決");
        Ok(columns)
    }

    /// 列をフィールド定義に変換して返す
    pub async fn column_fields(
        &self,
        table: &str,
        optional: bool,
    ) -> Result<Vec<FieldDefinition>, ConnectorError> {
        let columns = self.get_columns_using_table_name(table).await?;
        Ok(columns.iter().map(|c| c.to_field(optional)).collect())
    }

    /// 更新・削除で使うキー列を決定
    ///
    /// 設定の`key_column`を優先し、なければ`Row ID`、それもなければ`_RowNumber`。
    pub async fn resolve_key_column(&self, config: &TableConfig) -> Result<String, ConnectorError> {
        if let Some(key_column) = config.key_column.as_deref().filter(|k| !k.is_empty()) {
            return Ok(key_column.to_string());
        }

        let columns = self.get_columns_using_table_name(config.table()?).await?;
        Ok(pick_key_column(&columns).to_string())
    }
}

/// 列一覧からキー列を選ぶ
pub fn pick_key_column(columns: &[Column]) -> &str {
    if columns.iter().any(|c| c.name == DEFAULT_KEY_COLUMN) {
        DEFAULT_KEY_COLUMN
    } else {
        ROW_NUMBER_FIELD
    }
}
