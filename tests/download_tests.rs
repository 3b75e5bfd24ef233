#![cfg(feature = "http")]

use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use mxtgen::controller::{ControllerSettings, FormController};
use mxtgen::download::{DownloadTrigger, HttpDownloader};
use mxtgen::errors::GenError;
use mxtgen::form::FormField;
use mxtgen::storage::MemoryStore;

/// Serve one HTTP response and hand back the request line.
async fn serve_once(status: &'static str, body: &'static [u8]) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let base = format!("http://{}/", listener.local_addr().expect("addr"));

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.expect("read");
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let head = format!(
            "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        socket.write_all(head.as_bytes()).await.expect("write head");
        socket.write_all(body).await.expect("write body");
        socket.shutdown().await.ok();

        String::from_utf8_lossy(&request)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string()
    });

    (base, handle)
}

#[tokio::test]
async fn submit_downloads_artifact_into_out_dir() {
    let (base, server) = serve_once("200 OK", b"license-bytes").await;
    let dir = tempfile::tempdir().expect("temp dir");
    let downloader = Arc::new(HttpDownloader::new(&base, dir.path()).expect("valid base"));

    let mut form = FormController::initialize(
        MemoryStore::new(),
        Arc::clone(&downloader),
        ControllerSettings::default(),
    );
    form.set_field(FormField::Name, "张三");
    form.set_field(FormField::Count, "3");
    form.submit().expect("download starts");

    let outcomes = downloader.wait().await;
    let request_line = server.await.expect("server task");

    assert_eq!(
        request_line,
        "GET /gen?name=%E5%BC%A0%E4%B8%89&ver=25.2&count=3 HTTP/1.1"
    );
    let dest = downloader.out_dir().join("Custom.mxtpro");
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].result, Ok(dest.clone()));
    let saved = std::fs::read(&dest).expect("artifact saved");
    assert_eq!(saved, b"license-bytes");

    assert!(downloader.wait().await.is_empty(), "outcomes are drained");
}

#[tokio::test]
async fn server_error_is_not_saved() {
    let (base, server) = serve_once("400 Bad Request", b"bad params").await;
    let dir = tempfile::tempdir().expect("temp dir");
    let downloader = HttpDownloader::new(&base, dir.path()).expect("valid base");

    // The trigger itself succeeds; the server answer shows up in the outcome.
    downloader
        .trigger_download("./gen?name=a&ver=1&count=1", "Custom.mxtpro")
        .expect("download starts");
    let mut outcomes = downloader.wait().await;
    server.await.expect("server task");

    assert!(!dir.path().join("Custom.mxtpro").exists());
    assert_eq!(outcomes.len(), 1);
    let outcome = outcomes.remove(0);
    assert!(!outcome.is_saved());
    assert!(outcome.url.as_str().ends_with("/gen?name=a&ver=1&count=1"));

    let err = outcome.into_result().expect_err("400 is a failed download");
    assert!(matches!(err, GenError::Download(_)));
    assert!(err.to_string().contains("400"), "status in message: {err}");
}
