/// AppSheet APIのエラーレスポンス整形
///
/// Add/Edit/Deleteが失敗したとき、レスポンスボディを人間が読める
/// 1行のメッセージにする。
use serde_json::Value;

/// エラーレスポンスをメッセージに整形
///
/// ボディが`type`と`detail`を持つJSONなら`"<type>: <detail>"`、
/// それ以外は`"<message>:<body>"`を返す。
///
/// # 引数
/// * `message` - HTTPステータス行（例: "400 Bad Request"）
/// * `body` - レスポンスボディ
pub fn format_error_response(message: &str, body: &str) -> String {
    if let Ok(Value::Object(object)) = serde_json::from_str::<Value>(body)
        && let (Some(error_type), Some(detail)) = (object.get("type"), object.get("detail"))
        && !error_type.is_null()
        && !detail.is_null()
    {
        return format!("{}: {}", display_value(error_type), display_value(detail));
    }

    format!("{}:{}", message, body)
}

/// 文字列はクォートなし、それ以外はJSON表記
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
