/// `{"Rows": [...]}` 形式の入出力
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ConnectorError;
use crate::domain::Row;

/// 行配列のペイロード
///
/// add/update/delete_rowsの入力、および全アクションの出力に使用する。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowsPayload {
    #[serde(rename = "Rows", default)]
    pub rows: Vec<Row>,
}

impl RowsPayload {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// ホストからの入力をパース
    pub fn from_input(input: Value) -> Result<Self, ConnectorError> {
        serde_json::from_value(input).map_err(|e| ConnectorError::InvalidInput(e.to_string()))
    }

    /// 1行以上含むことを確認
    pub fn require_rows(&self) -> Result<(), ConnectorError> {
        if self.rows.is_empty() {
            return Err(ConnectorError::InvalidInput(
                "Rows must contain at least one row".to_string(),
            ));
        }
        Ok(())
    }
}

/// APIレスポンスから行配列を取り出す
///
/// FindはJSON配列を、Add/Edit/Deleteは配列または`{"Rows": [...]}`を返す。
pub fn extract_rows(response: Value) -> Result<Vec<Row>, ConnectorError> {
    match response {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(row) => Ok(row),
                other => Err(ConnectorError::InvalidResponse(format!(
                    "expected a row object, got {}",
                    other
                ))),
            })
            .collect(),
        Value::Object(mut object) => match object.shift_remove("Rows") {
            Some(rows @ Value::Array(_)) => extract_rows(rows),
            _ => Err(ConnectorError::InvalidResponse(
                "expected a Rows array in the response".to_string(),
            )),
        },
        Value::Null => Ok(Vec::new()),
        other => Err(ConnectorError::InvalidResponse(format!(
            "expected an array of rows, got {}",
            other
        ))),
    }
}
