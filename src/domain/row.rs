/// AppSheetの行モデル
///
/// 行は列名からJSONスカラー値へのマッピング。キー順序はAPIの返却順を保持する
/// （serde_jsonの`preserve_order`）。
use serde_json::{Map, Value};

/// AppSheetが行に付与する行番号フィールド
///
/// 更新・削除時の擬似主キー、およびトリガーの重複排除で使用される。
pub const ROW_NUMBER_FIELD: &str = "_RowNumber";

/// 1行分のデータ
pub type Row = Map<String, Value>;

/// null値のフィールドを取り除いた行を返す
///
/// Editアクションでnullを送るとサーバー側の値がnullで上書きされるため、
/// 指定されていないフィールドは送信前に落とす。
pub fn compact_row(row: &Row) -> Row {
    row.iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// トリガーの重複排除キーを生成
///
/// 行番号フィールドを除外した行のJSON文字列。内容が変わった行は
/// 新しいキーを持つため、更新も新しいイベントとして扱われる。
pub fn dedup_key(row: &Row) -> String {
    let mut stripped = row.clone();
    stripped.shift_remove(ROW_NUMBER_FIELD);
    Value::Object(stripped).to_string()
}

/// 値がフィルター条件として「存在する」か判定
///
/// nullと空文字列は未指定として扱う。
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
