// tests/proxy_test.rs

mod common;

use common::{spawn_app, spawn_app_with};
use serde_json::Value;
use std::{
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    sync::oneshot,
};
use uni_dl::{config::AppConfig, extractor::testing::CannedExtractor};

/// 生成一段不会被误认为文本的测试数据
fn media_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 31 % 251) as u8).collect()
}

#[tokio::test]
async fn test_proxy_streams_identical_bytes_and_headers() {
    // --- 1. Arrange (准备阶段) ---
    let mut upstream = mockito::Server::new_async().await;
    let payload = media_bytes(512 * 1024);
    let mock = upstream
        .mock("GET", "/videoplayback")
        .match_query(mockito::Matcher::UrlEncoded("itag".into(), "18".into()))
        .match_header("user-agent", "test-agent/1.0")
        .with_status(200)
        .with_header("content-type", "video/mp4")
        .with_header("x-upstream-id", "cdn-7")
        .with_body(&payload)
        .create_async()
        .await;
    let app = spawn_app(CannedExtractor::new()).await;
    let target = format!("{}/videoplayback?itag=18", upstream.url());

    // --- 2. Act (执行阶段) ---
    let res = reqwest::Client::new()
        .get(app.url("/api/proxy"))
        .query(&[("url", target.as_str())])
        .send()
        .await
        .unwrap();

    // --- 3. Assert (断言阶段) ---
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "video/mp4");
    assert_eq!(res.headers()["x-upstream-id"], "cdn-7");
    let body = res.bytes().await.unwrap();
    assert_eq!(body.len(), payload.len());
    assert!(body.as_ref() == payload.as_slice(), "proxied bytes differ from upstream");

    mock.assert_async().await;
    app.stop().await.unwrap();
}

#[tokio::test]
async fn test_proxy_forwards_range_requests() {
    let mut upstream = mockito::Server::new_async().await;
    let mock = upstream
        .mock("GET", "/clip.mp4")
        .match_header("range", "bytes=100-199")
        .with_status(206)
        .with_header("content-type", "video/mp4")
        .with_header("content-range", "bytes 100-199/1000")
        .with_header("accept-ranges", "bytes")
        .with_body(media_bytes(100))
        .create_async()
        .await;
    let app = spawn_app(CannedExtractor::new()).await;

    let res = reqwest::Client::new()
        .get(app.url("/api/proxy"))
        .query(&[("url", format!("{}/clip.mp4", upstream.url()))])
        .header("Range", "bytes=100-199")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 206);
    assert_eq!(res.headers()["content-range"], "bytes 100-199/1000");
    assert_eq!(res.headers()["accept-ranges"], "bytes");
    assert_eq!(res.bytes().await.unwrap().len(), 100);

    mock.assert_async().await;
    app.stop().await.unwrap();
}

#[tokio::test]
async fn test_proxy_mirrors_upstream_error_status() {
    let mut upstream = mockito::Server::new_async().await;
    let _mock = upstream
        .mock("GET", "/expired.mp4")
        .with_status(403)
        .with_body("signature expired")
        .create_async()
        .await;
    let app = spawn_app(CannedExtractor::new()).await;

    let res = reqwest::Client::new()
        .get(app.url("/api/proxy"))
        .query(&[("url", format!("{}/expired.mp4", upstream.url()))])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 403);
    assert_eq!(res.text().await.unwrap(), "signature expired");

    app.stop().await.unwrap();
}

#[tokio::test]
async fn test_proxy_rejects_invalid_targets() {
    let app = spawn_app(CannedExtractor::new()).await;
    let client = reqwest::Client::new();

    // 缺少参数
    let res = client.get(app.url("/api/proxy")).send().await.unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["kind"], "invalid_target");
    assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));

    for target in ["not a url", "/relative/path.mp4", "ftp://files.example.com/a.mp4", "file:///etc/passwd"] {
        let res = client
            .get(app.url("/api/proxy"))
            .query(&[("url", target)])
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 400, "target {:?} should be rejected", target);
    }

    app.stop().await.unwrap();
}

#[tokio::test]
async fn test_proxy_reports_unreachable_upstream() {
    // 先占用一个端口再释放，确保没有服务在监听
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let app = spawn_app(CannedExtractor::new()).await;

    let res = reqwest::Client::new()
        .get(app.url("/api/proxy"))
        .query(&[("url", format!("http://127.0.0.1:{}/video.mp4", port))])
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 502);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["kind"], "upstream_unreachable");

    app.stop().await.unwrap();
}

#[tokio::test]
async fn test_proxy_header_timeout() {
    // 接受连接但从不响应的上游
    let silent = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let silent_addr = silent.local_addr().unwrap();
    let _accepting = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = silent.accept().await {
            held.push(socket);
        }
    });

    let mut config = AppConfig::default();
    config.proxy.header_timeout = Duration::from_secs(1);
    let app = spawn_app_with(config, Arc::new(CannedExtractor::new())).await;

    let res = reqwest::Client::new()
        .get(app.url("/api/proxy"))
        .query(&[("url", format!("http://{}/slow.mp4", silent_addr))])
        .timeout(Duration::from_secs(10))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 502);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["kind"], "upstream_unreachable");

    app.stop().await.unwrap();
}

/// 声明 `announced` 字节但只发送 `sent` 字节的上游。
/// `hold_open` 为真时发送完后保持连接，否则立即关闭。
async fn truncating_upstream(announced: usize, sent: usize, hold_open: bool) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await;
        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: video/mp4\r\nContent-Length: {}\r\n\r\n",
            announced
        );
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(&media_bytes(sent)).await.unwrap();
        socket.flush().await.unwrap();
        if hold_open {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
    });
    addr
}

#[tokio::test]
async fn test_proxy_terminates_stream_when_upstream_closes_early() {
    // --- 1. Arrange (准备阶段) ---
    let upstream = truncating_upstream(1000, 100, false).await;
    let app = spawn_app(CannedExtractor::new()).await;

    // --- 2. Act (执行阶段) ---
    let res = reqwest::Client::new()
        .get(app.url("/api/proxy"))
        .query(&[("url", format!("http://{}/video.mp4", upstream))])
        .timeout(Duration::from_secs(10))
        .send()
        .await
        .unwrap();

    // --- 3. Assert (断言阶段) ---
    // 响应头已经发出，之后只能中断连接
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-length"], "1000");
    assert!(res.bytes().await.is_err(), "truncated body must not look complete");

    // 单个请求失败不影响服务
    let res = reqwest::get(app.url("/")).await.unwrap();
    assert_eq!(res.status(), 200);

    app.stop().await.unwrap();
}

#[tokio::test]
async fn test_proxy_idle_timeout_aborts_stalled_upstream() {
    let upstream = truncating_upstream(1000, 100, true).await;
    let mut config = AppConfig::default();
    config.proxy.idle_timeout = Duration::from_secs(1);
    let app = spawn_app_with(config, Arc::new(CannedExtractor::new())).await;

    let started = Instant::now();
    let res = reqwest::Client::new()
        .get(app.url("/api/proxy"))
        .query(&[("url", format!("http://{}/video.mp4", upstream))])
        .timeout(Duration::from_secs(20))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body = res.bytes().await;

    assert!(body.is_err(), "stalled body must be aborted");
    assert!(
        started.elapsed() < Duration::from_secs(8),
        "idle timeout did not fire: {:?}",
        started.elapsed()
    );

    app.stop().await.unwrap();
}

#[tokio::test]
async fn test_caller_disconnect_closes_upstream_connection() {
    // --- 1. Arrange (准备阶段) ---
    // 上游持续缓慢地发送数据，写入失败说明代理已关闭连接
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let upstream = listener.local_addr().unwrap();
    let (closed_tx, closed_rx) = oneshot::channel();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await;
        let head = "HTTP/1.1 200 OK\r\nContent-Type: video/mp4\r\nContent-Length: 1073741824\r\n\r\n";
        if socket.write_all(head.as_bytes()).await.is_err() {
            return;
        }
        let chunk = media_bytes(16 * 1024);
        for _ in 0..600 {
            if socket.write_all(&chunk).await.is_err() || socket.flush().await.is_err() {
                let _ = closed_tx.send(());
                return;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    });
    let app = spawn_app(CannedExtractor::new()).await;

    // --- 2. Act (执行阶段) ---
    let client = reqwest::Client::new();
    let mut res = client
        .get(app.url("/api/proxy"))
        .query(&[("url", format!("http://{}/huge.mp4", upstream))])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert!(res.chunk().await.unwrap().is_some());
    // 读到第一块后断开
    drop(res);
    drop(client);

    // --- 3. Assert (断言阶段) ---
    tokio::time::timeout(Duration::from_secs(10), closed_rx)
        .await
        .expect("upstream connection still open after caller disconnected")
        .unwrap();

    app.stop().await.unwrap();
}
