// アプリケーション層モジュール
pub mod add_rows;
pub mod connection_test;
pub mod connector;
pub mod delete_rows;
pub mod error;
pub mod get_rows;
pub mod rows_payload;
pub mod schema_resolver;
pub mod table_config;
pub mod update_rows;
pub mod updated_row_trigger;

// 再エクスポート
pub use add_rows::AddRowsHandler;
pub use connection_test::ConnectionTest;
pub use connector::{ActionName, Connector, ConnectorRequest};
pub use delete_rows::DeleteRowsHandler;
pub use error::ConnectorError;
pub use get_rows::GetRowsHandler;
pub use rows_payload::RowsPayload;
pub use schema_resolver::SchemaResolver;
pub use table_config::TableConfig;
pub use update_rows::UpdateRowsHandler;
pub use updated_row_trigger::{PollResult, UpdatedRowTrigger};
