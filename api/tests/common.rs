use anyhow::Result;
use futures::Future;
use once_cell::sync::Lazy;

pub use crate::client::*;

use direct_upload_api::{config::Config, Server};

pub struct TestApp {
    /// A client set to the base url of the server.
    pub client: TestClient,
    pub base_url: String,
}

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0, // Bind to random port
        env: "test".to_string(),
        honeycomb_team: None,
        honeycomb_dataset: String::new(),
        oss_access_key: "LTAI5tExampleKey".to_string(),
        oss_access_secret: "ExampleSecret".to_string(),
        oss_bucket: "examplebucket".to_string(),
        oss_region: "oss-cn-hangzhou".to_string(),
        oss_custom_domain: None,
        oss_endpoint: None,
        oss_path_style: false,
        max_upload_size: 10 * 1024 * 1024,
        upload_expiry_secs: 600,
        key_prefix: "uploads/".to_string(),
        randomize_keys: false,
        default_method: direct_upload_api::config::MethodArg::Post,
        allowed_content_types: Vec::new(),
    }
}

async fn start_app(config: Config) -> Result<TestApp> {
    Lazy::force(&direct_upload_test::TRACING);
    let Server { server, host, port } = direct_upload_api::run_server(config).await?;

    tokio::task::spawn(server);

    let base_url = format!("http://{}:{}", host, port);
    let client = TestClient {
        base: base_url.clone(),
        client: reqwest::ClientBuilder::new()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Building client"),
    };

    Ok(TestApp {
        client,
        base_url,
    })
}

pub async fn run_app_test<F, R>(f: F)
where
    F: FnOnce(TestApp) -> R,
    R: Future<Output = Result<(), anyhow::Error>>,
{
    run_app_test_with(test_config(), f).await
}

pub async fn run_app_test_with<F, R>(config: Config, f: F)
where
    F: FnOnce(TestApp) -> R,
    R: Future<Output = Result<(), anyhow::Error>>,
{
    let app = start_app(config).await.expect("Starting app");
    f(app).await.unwrap();
}
