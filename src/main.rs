// src/main.rs

use clap::{CommandFactory, FromArgMatches};
use colored::*;
use std::{env, sync::Arc};
use tokio_util::sync::CancellationToken;
use uni_dl::{cli::Cli, logger, run_from_cli, symbols};

#[tokio::main]
async fn main() {
    // 为 Windows 终端启用 ANSI 颜色支持。
    #[cfg(windows)]
    {
        colored::control::set_virtual_terminal(true).ok();
    }

    let bin_name = env::var("CARGO_BIN_NAME").unwrap_or_else(|_| "uni-dl".to_string());

    let after_help = format!(
        "示例:\n  # 使用默认端口 4000 启动\n  {bin}\n\n  # 指定端口和 yt-dlp 路径\n  {bin} --port 8080 --ytdlp-path /usr/local/bin/yt-dlp\n\n  # 从配置文件加载\n  {bin} --config uni-dl.json --log-file logs/uni-dl.log",
        bin = bin_name
    );

    let cmd = Cli::command().after_help(after_help);
    let args = match Cli::from_arg_matches(&cmd.get_matches()) {
        Ok(args) => Arc::new(args),
        Err(e) => e.exit(),
    };

    logger::init_logger(args.log_level, args.log_file.as_deref());

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\n{} 收到中断信号，正在停止服务...", *symbols::WARN);
            signal_token.cancel();
        }
    });

    if let Err(e) = run_from_cli(args, shutdown).await {
        eprintln!("\n{} {}", *symbols::ERROR, format!("程序执行出错: {}", e).red());
        std::process::exit(1);
    }
}
