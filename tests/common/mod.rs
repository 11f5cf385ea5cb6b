// tests/common/mod.rs

#![allow(dead_code)]

use std::sync::Arc;
use tokio::{net::TcpListener, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use uni_dl::{
    config::AppConfig,
    error::AppResult,
    extractor::{MediaExtractor, testing::CannedExtractor},
    serve,
    state::AppState,
};

pub const FIXTURE_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

/// 在随机端口上启动的测试服务
pub struct TestApp {
    pub base_url: String,
    pub shutdown: CancellationToken,
    pub handle: JoinHandle<AppResult<()>>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn stop(self) -> AppResult<()> {
        self.shutdown.cancel();
        self.handle.await.expect("服务任务异常退出")
    }
}

pub async fn spawn_app_with(config: AppConfig, extractor: Arc<dyn MediaExtractor>) -> TestApp {
    let state = AppState::new(Arc::new(config), extractor).expect("无法构建 AppState");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("无法绑定端口");
    let addr = listener.local_addr().unwrap();
    let shutdown = CancellationToken::new();
    let handle = tokio::spawn(serve(listener, state, shutdown.clone()));
    TestApp {
        base_url: format!("http://{}", addr),
        shutdown,
        handle,
    }
}

pub async fn spawn_app(extractor: CannedExtractor) -> TestApp {
    spawn_app_with(AppConfig::default(), Arc::new(extractor)).await
}

pub fn fixture() -> serde_json::Value {
    let body = std::fs::read_to_string("tests/fixtures/ytdlp_response.json")
        .expect("无法读取模拟响应文件");
    serde_json::from_str(&body).expect("模拟响应不是有效的 JSON")
}
