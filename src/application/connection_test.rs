/// 接続テスト
///
/// 設定された`test_table`に対して、常に0行を返すSelector付きのFindを送る。
/// HTTPが成功すればボディの形式によらず成功とする。
/// 行を含むレスポンスならその行を、それ以外は空配列を返す。
use tracing::{debug, info, instrument};

use super::error::ConnectorError;
use super::rows_payload::extract_rows;
use crate::domain::{ActionRequest, CONNECTIVITY_CHECK_SELECTOR, Row};
use crate::infrastructure::AppSheetApi;

pub struct ConnectionTest<A: AppSheetApi> {
    api: A,
    test_table: String,
}

impl<A: AppSheetApi> ConnectionTest<A> {
    pub fn new(api: A, test_table: impl Into<String>) -> Self {
        Self {
            api,
            test_table: test_table.into(),
        }
    }

    /// 接続テストを実行
    ///
    /// # 戻り値
    /// * `Ok(Vec<Row>)` - 通常は空配列
    /// * `Err(ConnectorError::Connectivity)` - HTTP・認証エラー
    #[instrument(skip(self), fields(table = %self.test_table))]
    pub async fn run(&self) -> Result<Vec<Row>, ConnectorError> {
        let request =
            ActionRequest::find_with_selector(Some(CONNECTIVITY_CHECK_SELECTOR.to_string()));
        let response = self.api.invoke(&self.test_table, &request).await?;
        let rows = extract_rows(response).unwrap_or_else(|err| {
            debug!(error = %err, "行を含まないレスポンス");
            Vec::new()
        });

        info!(row_count = rows.len(), "接続テストに成功");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::AppSheetApiError;
    use crate::infrastructure::appsheet_client::tests::MockAppSheetApi;
    use serde_json::json;

    #[tokio::test]
    async fn test_run_returns_empty_result() {
        let api = MockAppSheetApi::new();
        api.push_response(json!([]));
        let test = ConnectionTest::new(api.clone(), "Contacts");

        let rows = test.run().await.unwrap();
        assert!(rows.is_empty());

        let (table, request) = api.last_request().unwrap();
        assert_eq!(table, "Contacts");
        assert_eq!(request["Action"], "Find");
        assert_eq!(request["Properties"]["Selector"], "TOP(X, 1)");
    }

    #[tokio::test]
    async fn test_run_accepts_response_without_rows() {
        let api = MockAppSheetApi::new();
        api.push_response(json!({"Properties": {}}));
        let test = ConnectionTest::new(api, "Contacts");

        let rows = test.run().await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_run_returns_rows_when_present() {
        let api = MockAppSheetApi::new();
        api.push_response(json!({"Rows": [{"_RowNumber": "2", "Name": "Alice"}]}));
        let test = ConnectionTest::new(api, "Contacts");

        let rows = test.run().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Name"], "Alice");
    }

    #[tokio::test]
    async fn test_run_propagates_auth_failure() {
        let api = MockAppSheetApi::new();
        api.push_error(AppSheetApiError::HttpError {
            status: 403,
            reason: "403 Forbidden".to_string(),
            body: "Access denied".to_string(),
        });
        let test = ConnectionTest::new(api, "Contacts");

        let error = test.run().await.unwrap_err();
        assert!(matches!(
            error,
            ConnectorError::Connectivity(AppSheetApiError::HttpError { status: 403, .. })
        ));
    }
}
