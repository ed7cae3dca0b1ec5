/// フィールド定義
///
/// ホストプラットフォームが入力フォームや出力データピルを描画するための
/// スキーマ記述。JSONにシリアライズしてホストへ返す。
use serde::Serialize;

/// フィールドの型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Object,
    Array,
}

/// 入力コントロールの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlType {
    Text,
    Password,
    Subdomain,
}

/// 1フィールド分の定義
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    /// 配列要素の型（`type`がarrayのときのみ）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub of: Option<FieldType>,
    pub optional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_type: Option<ControlType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// サブドメイン入力時の後置URL（例: ".appsheet.com"）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<FieldDefinition>,
}

impl FieldDefinition {
    /// 名前だけを持つ任意フィールドを作成
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            field_type: None,
            of: None,
            optional: true,
            control_type: None,
            hint: None,
            url: None,
            properties: Vec::new(),
        }
    }

    /// オブジェクト配列フィールドを作成
    ///
    /// `Rows`入出力のように、各要素が`properties`の形を持つ配列。
    pub fn array_of_objects(name: impl Into<String>, properties: Vec<FieldDefinition>) -> Self {
        Self {
            field_type: Some(FieldType::Array),
            of: Some(FieldType::Object),
            properties,
            ..Self::new(name)
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    pub fn with_control_type(mut self, control_type: ControlType) -> Self {
        self.control_type = Some(control_type);
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// 必須フィールドにする
    pub fn required(self) -> Self {
        self.optional(false)
    }
}
