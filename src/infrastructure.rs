// Infrastructure layer modules
pub mod appsheet_client;
pub mod config;
pub mod logging;

// Re-exports
pub use appsheet_client::{AppSheetApi, AppSheetApiError, HttpAppSheetClient};
pub use config::{ConnectionConfig, ConnectionConfigError, action_url};
pub use logging::init_logging;
