// src/lib.rs

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod extractor;
pub mod logger;
pub mod models;
pub mod normalizer;
pub mod platform;
pub mod proxy;
pub mod state;
pub mod symbols;
pub mod ui;
pub mod utils;

use crate::{
    cli::Cli,
    config::AppConfig,
    error::{AppError, AppResult},
    extractor::YtDlpExtractor,
    state::AppState,
};
use colored::*;
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// 在已绑定的监听器上提供服务，直到 `shutdown` 被取消。
/// 取消后不再接受新连接，正在处理的请求会继续完成。
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: CancellationToken,
) -> AppResult<()> {
    let app = api::create_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;
    info!("服务已停止");
    Ok(())
}

/// 库的公共入口点，由 `main.rs` 调用
pub async fn run_from_cli(args: Arc<Cli>, shutdown: CancellationToken) -> AppResult<()> {
    debug!("CLI 参数: {:?}", args);

    let config = Arc::new(AppConfig::new(&args)?);
    debug!("加载的应用配置: {:?}", config);

    let extractor = YtDlpExtractor::new(config.extractor.clone());
    // 缺少 yt-dlp 时仍然启动，解析请求会返回 not_available 错误
    let extractor_status = match extractor.version().await {
        Ok(version) => {
            info!("检测到 yt-dlp {}", version);
            format!("{} {} {}", *symbols::OK, config.extractor.binary, version)
        }
        Err(e) => {
            warn!("yt-dlp 不可用: {}", e);
            format!("{} {}", *symbols::WARN, e.to_string().yellow())
        }
    };

    let state = AppState::new(config.clone(), Arc::new(extractor))?;

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Config(format!("无法监听 {}: {}", addr, e)))?;
    let local_addr = listener.local_addr()?;
    info!("服务已启动，监听 {}", local_addr);

    ui::box_message(
        concat!("Universal Downloader Backend v", env!("CARGO_PKG_VERSION")),
        &ui::startup_lines(&local_addr.to_string(), &extractor_status),
        |s| s.cyan(),
    );
    println!("\n{} 按 {} 停止服务。", *symbols::INFO, *symbols::CTRL_C);

    serve(listener, state, shutdown).await
}
