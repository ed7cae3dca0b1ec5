/// AppSheet Action APIのリクエストボディ
///
/// `POST tables/{table}/Action` に送信するJSON:
/// `{"Action": "Find", "Properties": {"Selector": "..."}, "Rows": [...]}`
use serde::Serialize;

use super::row::Row;

/// APIの操作種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ApiAction {
    Find,
    Add,
    Edit,
    Delete,
}

impl std::fmt::Display for ApiAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ApiAction::Find => "Find",
            ApiAction::Add => "Add",
            ApiAction::Edit => "Edit",
            ApiAction::Delete => "Delete",
        };
        f.write_str(name)
    }
}

/// リクエストのProperties
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequestProperties {
    #[serde(rename = "Selector", skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
}

/// Action APIリクエスト
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionRequest {
    #[serde(rename = "Action")]
    pub action: ApiAction,
    #[serde(rename = "Properties")]
    pub properties: RequestProperties,
    #[serde(rename = "Rows")]
    pub rows: Vec<Row>,
}

impl ActionRequest {
    /// 行フィルターなしのFind（全行を返す）
    pub fn find_all() -> Self {
        Self {
            action: ApiAction::Find,
            properties: RequestProperties::default(),
            rows: Vec::new(),
        }
    }

    /// Selector付きのFind
    pub fn find_with_selector(selector: Option<String>) -> Self {
        Self {
            properties: RequestProperties { selector },
            ..Self::find_all()
        }
    }

    pub fn add(rows: Vec<Row>) -> Self {
        Self::with_rows(ApiAction::Add, rows)
    }

    pub fn edit(rows: Vec<Row>) -> Self {
        Self::with_rows(ApiAction::Edit, rows)
    }

    pub fn delete(rows: Vec<Row>) -> Self {
        Self::with_rows(ApiAction::Delete, rows)
    }

    fn with_rows(action: ApiAction, rows: Vec<Row>) -> Self {
        Self {
            action,
            properties: RequestProperties::default(),
            rows,
        }
    }
}
