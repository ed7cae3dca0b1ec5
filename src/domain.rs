// Domain layer modules
pub mod api_error;
pub mod api_request;
pub mod field_definition;
pub mod row;
pub mod schema;
pub mod selector;

// Re-exports
pub use api_error::format_error_response;
pub use api_request::{ActionRequest, ApiAction, RequestProperties};
pub use field_definition::{ControlType, FieldDefinition, FieldType};
pub use row::{ROW_NUMBER_FIELD, Row, compact_row, dedup_key};
pub use schema::{Column, ColumnKind, infer_columns};
pub use selector::{CONNECTIVITY_CHECK_SELECTOR, SelectorBuilder, SelectorError};
