//! 测试辅助：内存抓取器、一次性 HTTP 服务器与临时样式表

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use newsletter_render::error::{RenderError, RenderResult};
use newsletter_render::network::PageFetcher;
use newsletter_render::utils::Url;

/// Serves pages and assets from memory and records every requested URL
#[derive(Default)]
pub struct MemoryFetcher {
    pages: HashMap<String, String>,
    assets: HashMap<String, (Vec<u8>, String)>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl MemoryFetcher {
    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(normalize(url), html.to_string());
        self
    }

    pub fn with_asset(mut self, url: &str, data: &[u8], media_type: &str) -> Self {
        self.assets
            .insert(normalize(url), (data.to_vec(), media_type.to_string()));
        self
    }

    /// Handle on the request log that stays usable after the fetcher is moved
    pub fn requested(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.requested)
    }

    fn record(&self, url: &Url) {
        self.requested.lock().unwrap().push(url.to_string());
    }
}

impl PageFetcher for MemoryFetcher {
    fn fetch_page(&self, url: &Url) -> RenderResult<String> {
        self.record(url);
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| RenderError::fetch(url, "HTTP status 404 Not Found"))
    }

    fn fetch_asset(&self, url: &Url) -> RenderResult<(Vec<u8>, String)> {
        self.record(url);
        self.assets
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| RenderError::fetch(url, "HTTP status 404 Not Found"))
    }
}

fn normalize(url: &str) -> String {
    Url::parse(url).unwrap().to_string()
}

/// Answers exactly one HTTP request with the given status line and body
///
/// Returns the server URL and a receiver for the raw request head.
pub fn serve_once(status_line: &str, content_type: &str, body: &[u8]) -> (Url, Receiver<String>) {
    serve_response(status_line, &[("Content-Type", content_type)], body)
}

/// Like [`serve_once`], with arbitrary response headers
pub fn serve_response(
    status_line: &str,
    headers: &[(&str, &str)],
    body: &[u8],
) -> (Url, Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();

    let mut response_head = format!("HTTP/1.1 {}\r\n", status_line);
    for (name, value) in headers {
        response_head.push_str(&format!("{}: {}\r\n", name, value));
    }
    response_head.push_str(&format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    ));

    let body = body.to_vec();
    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let request = read_request_head(&mut stream);

        stream.write_all(response_head.as_bytes()).unwrap();
        stream.write_all(&body).unwrap();
        stream.flush().unwrap();

        let _ = sender.send(request);
    });

    let url = Url::parse(&format!("http://{}/index.php", address)).unwrap();
    (url, receiver)
}

/// Accepts one connection, reads the request and never answers
///
/// The connection is held open for `hold`, then dropped.
pub fn serve_silently(hold: Duration) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();

    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let _request = read_request_head(&mut stream);
            thread::sleep(hold);
        }
    });

    Url::parse(&format!("http://{}/index.php", address)).unwrap()
}

fn read_request_head(stream: &mut TcpStream) -> String {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];

    while !request.windows(4).any(|window| window == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(read) => request.extend_from_slice(&buf[..read]),
        }
    }

    String::from_utf8_lossy(&request).into_owned()
}

/// Writes a stylesheet into `dir` and returns its path
pub fn stylesheet(dir: &Path, name: &str, css: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, css).unwrap();
    path
}
