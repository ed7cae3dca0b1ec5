/// アクション・トリガー共通の設定フィールド
use serde::Deserialize;
use serde_json::{Map, Value};

use super::error::ConnectorError;
use crate::domain::FieldDefinition;

/// アクションのテーブル設定
///
/// 未知のキーは無視する。
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TableConfig {
    /// 対象テーブル名
    pub table_name: String,
    /// 更新・削除で行を特定するキー列（未指定ならスキーマから推定）
    #[serde(default)]
    pub key_column: Option<String>,
}

impl TableConfig {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            key_column: None,
        }
    }

    pub fn with_key_column(mut self, key_column: impl Into<String>) -> Self {
        self.key_column = Some(key_column.into());
        self
    }

    /// 空でないテーブル名を返す
    pub fn table(&self) -> Result<&str, ConnectorError> {
        non_blank(&self.table_name)
    }

    /// ホストに公開する設定フィールド定義
    pub fn fields() -> Vec<FieldDefinition> {
        vec![FieldDefinition::new("table_name").with_label("Table").required()]
    }

    /// キー列を選べるアクション用の設定フィールド定義
    pub fn fields_with_key_column() -> Vec<FieldDefinition> {
        let mut fields = Self::fields();
        fields.push(
            FieldDefinition::new("key_column")
                .with_label("Key column")
                .with_hint("Defaults to 'Row ID' when the table has it, otherwise '_RowNumber'."),
        );
        fields
    }
}

/// トリガー設定（生のJSONオブジェクト）からテーブル名を取り出す
///
/// トリガーは入力を`next_poll`としてそのまま返すため、型付きの
/// `TableConfig`には変換しない。
pub fn table_name_of(config: &Map<String, Value>) -> Result<&str, ConnectorError> {
    match config.get("table_name") {
        Some(Value::String(name)) => non_blank(name),
        _ => Err(ConnectorError::InvalidInput(
            "table_name must be a string".to_string(),
        )),
    }
}

fn non_blank(table_name: &str) -> Result<&str, ConnectorError> {
    if table_name.trim().is_empty() {
        return Err(ConnectorError::InvalidInput(
            "table_name must not be empty".to_string(),
        ));
    }
    Ok(table_name)
}
