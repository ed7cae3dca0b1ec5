// SelectorBuilder - 入力値からAppSheetのSelector式を組み立てる
//
// Find アクションの Properties.Selector に渡す式を生成する。
// 値は文字列連結せず、列参照とリテラルを個別にエスケープしてから組み立てる。

use serde_json::Value;
use thiserror::Error;

use super::row::is_present;

/// 接続テスト用のSelector
///
/// `X`は実在する列参照ではないため結果は常に0行になるが、
/// エンドポイント・認証情報・テーブルの存在は検証される。
pub const CONNECTIVITY_CHECK_SELECTOR: &str = "TOP(X, 1)";

/// Selector構築エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// 列参照`[...]`として表現できない列名
    #[error("column name cannot be used in a filter: {0}")]
    InvalidColumnName(String),

    /// スカラー以外の値
    #[error("filter value for column {0} must be a scalar")]
    UnsupportedValue(String),
}

/// 等価条件
#[derive(Debug, Clone, PartialEq, Eq)]
struct EqualsClause {
    column: String,
    literal: String,
}

impl EqualsClause {
    fn render(&self) -> String {
        format!("([{}] = \"{}\")", self.column, escape_literal(&self.literal))
    }
}

/// Selector式ビルダー
///
/// # 変換ルール
/// - 条件なし: Selectorなし（全行を返す）
/// - 条件1つ: `([Column] = "value")`
/// - 条件複数: `AND(clause1, clause2, ...)`
#[derive(Debug, Clone, Default)]
pub struct SelectorBuilder {
    clauses: Vec<EqualsClause>,
}

impl SelectorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 列の等価条件を追加
    ///
    /// nullまたは空文字列の値は未指定として無視する。
    pub fn equals(mut self, column: &str, value: &Value) -> Result<Self, SelectorError> {
        if !is_present(value) {
            return Ok(self);
        }

        if column.is_empty() || column.contains(']') {
            return Err(SelectorError::InvalidColumnName(column.to_string()));
        }

        let literal = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return Err(SelectorError::UnsupportedValue(column.to_string())),
        };

        self.clauses.push(EqualsClause {
            column: column.to_string(),
            literal,
        });
        Ok(self)
    }

    /// 条件の数
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Selector式を生成
    ///
    /// 条件が空の場合は`None`を返す。
    pub fn build(&self) -> Option<String> {
        match self.clauses.as_slice() {
            [] => None,
            [single] => Some(single.render()),
            clauses => {
                let rendered: Vec<String> = clauses.iter().map(EqualsClause::render).collect();
                Some(format!("AND({})", rendered.join(", ")))
            }
        }
    }
}

/// テキストリテラル内のダブルクォートを二重化する
fn escape_literal(literal: &str) -> String {
    literal.replace('"', "\"\"")
}
