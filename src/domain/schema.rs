/// サンプル行からの列スキーマ推論
///
/// AppSheet APIはテーブル定義を返さないため、1行をサンプリングして
/// そのキーを列として扱う。サンプルに存在しない列は見えない。
/// また、APIのキー順序は保証されていないため、呼び出し間で順序が
/// 安定することを前提にしてはならない。
use serde_json::Value;

use super::field_definition::{FieldDefinition, FieldType};
use super::row::Row;

/// サンプル値から推定した列の値種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
    Boolean,
    Other,
}

impl ColumnKind {
    /// JSON値から種別を推定
    ///
    /// AppSheetはほとんどの値を文字列で返すため、大半はTextになる。
    pub fn of(value: &Value) -> Self {
        match value {
            Value::String(_) => ColumnKind::Text,
            Value::Number(_) => ColumnKind::Number,
            Value::Bool(_) => ColumnKind::Boolean,
            _ => ColumnKind::Other,
        }
    }

    fn field_type(self) -> FieldType {
        match self {
            ColumnKind::Text | ColumnKind::Other => FieldType::String,
            ColumnKind::Number => FieldType::Number,
            ColumnKind::Boolean => FieldType::Boolean,
        }
    }
}

/// 列記述子
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// 列名
    pub name: String,
    /// サンプル値から推定した種別
    pub kind: ColumnKind,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// 列をフィールド定義に変換
    pub fn to_field(&self, optional: bool) -> FieldDefinition {
        FieldDefinition::new(&self.name)
            .with_type(self.kind.field_type())
            .optional(optional)
    }
}

/// サンプル行から列一覧を推論
///
/// 列はサンプル行のキー順に並ぶ。
pub fn infer_columns(sample: &Row) -> Vec<Column> {
    sample
        .iter()
        .map(|(name, value)| Column::new(name.clone(), ColumnKind::of(value)))
        .collect()
}
