/// Google AppSheetコネクター Lambda関数
///
/// ホストからの`ConnectorRequest`を受け取り、接続テスト・アクション・トリガーの
/// 各操作をAppSheet Action APIに対して実行し、結果のJSONを返す。
use appsheet_connector::application::{Connector, ConnectorRequest};
use appsheet_connector::infrastructure::{ConnectionConfig, HttpAppSheetClient, init_logging};
use lambda_runtime::{Error, LambdaEvent, service_fn};
use serde_json::Value;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // 構造化ログを初期化
    init_logging();

    // Lambda関数を初期化して実行
    let func = service_fn(handler);
    lambda_runtime::run(func).await?;
    Ok(())
}

/// Lambda関数のメインハンドラー
///
/// # 処理フロー
/// 1. `describe`は接続設定なしで定義を返す
/// 2. 接続設定を環境変数から読み込み
/// 3. HTTPクライアントとConnectorを初期化
/// 4. リクエストを対応するハンドラーに委譲
async fn handler(event: LambdaEvent<ConnectorRequest>) -> Result<Value, Error> {
    let request = event.payload;

    if matches!(request, ConnectorRequest::Describe) {
        return Ok(Connector::<HttpAppSheetClient>::describe());
    }

    // 接続設定を環境変数から読み込み
    let config = match ConnectionConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "接続設定読み込み失敗");
            return Err(err.into());
        }
    };

    let client = HttpAppSheetClient::new(&config)?;
    let connector = Connector::new(client, config.test_table());

    match connector.dispatch(request).await {
        Ok(output) => {
            info!("リクエスト処理完了");
            Ok(output)
        }
        Err(err) => {
            error!(error = %err, "リクエスト処理失敗");
            Err(err.into())
        }
    }
}
