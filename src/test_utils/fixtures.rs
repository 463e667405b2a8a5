//! Canned HTTP responses and fake executables.

use reqwest::Url;
use std::collections::HashMap;
use std::net::SocketAddr;
#[cfg(unix)]
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Clone)]
struct Route {
    status: u16,
    content_type: String,
    body: Vec<u8>,
    content_length: bool,
}

type Routes = Arc<Mutex<HashMap<String, Route>>>;

/// Minimal HTTP/1.1 server for tests.
///
/// Serves registered paths with a fixed status and body; anything else is a
/// 404. Every response closes the connection. The accept loop runs on the
/// current tokio runtime and stops when the server is dropped.
///
/// Blocking work on the same runtime, such as running the binary through
/// `assert_cmd`, must go through `tokio::task::spawn_blocking` so the server
/// keeps answering.
pub struct FixtureServer {
    addr: SocketAddr,
    routes: Routes,
    task: tokio::task::JoinHandle<()>,
}

impl FixtureServer {
    /// Bind to an ephemeral localhost port and start serving.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind fixture server");
        let addr = listener.local_addr().expect("fixture server address");
        let routes: Routes = Arc::default();

        let task_routes = Arc::clone(&routes);
        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let routes = Arc::clone(&task_routes);
                tokio::spawn(async move {
                    let _ = serve(stream, routes).await;
                });
            }
        });

        Self { addr, routes, task }
    }

    /// Register (or replace) the response for `path`.
    pub fn route(&self, path: &str, status: u16, content_type: &str, body: Vec<u8>) {
        self.insert(path, status, content_type, body, true);
    }

    /// Like [`route`](Self::route), but the response has no `Content-Length`
    /// and the body ends when the connection closes.
    pub fn route_unsized(&self, path: &str, status: u16, content_type: &str, body: Vec<u8>) {
        self.insert(path, status, content_type, body, false);
    }

    fn insert(&self, path: &str, status: u16, content_type: &str, body: Vec<u8>, sized: bool) {
        self.routes.lock().expect("routes lock").insert(
            path.to_string(),
            Route {
                status,
                content_type: content_type.to_string(),
                body,
                content_length: sized,
            },
        );
    }

    /// Absolute URL for `path` on this server.
    pub fn url(&self, path: &str) -> Url {
        Url::parse(&format!("http://{}{}", self.addr, path)).expect("fixture url")
    }
}

impl Drop for FixtureServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn serve(mut stream: TcpStream, routes: Routes) -> std::io::Result<()> {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        request.extend_from_slice(&buf[..n]);
    }

    let request = String::from_utf8_lossy(&request);
    let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
    let route = routes.lock().expect("routes lock").get(&path).cloned().unwrap_or(Route {
        status: 404,
        content_type: "text/plain".to_string(),
        body: b"not found".to_vec(),
        content_length: true,
    });

    let reason = match route.status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    };
    let mut head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\n",
        route.status, reason, route.content_type
    );
    if route.content_length {
        head.push_str(&format!("Content-Length: {}\r\n", route.body.len()));
    }
    head.push_str("Connection: close\r\n\r\n");

    stream.write_all(head.as_bytes()).await?;
    stream.write_all(&route.body).await?;
    stream.shutdown().await
}

/// A nightly listing page linking the given build file names.
///
/// Each file is linked relative to the page, as the real listing does, after
/// a few unrelated entries.
pub fn listing_page(files: &[&str]) -> String {
    let mut html = String::from(
        "<html><head><title>MTA:SA nightly</title></head><body><table>\n\
         <tr><td><a href=\"../\">Parent directory</a></td></tr>\n\
         <tr><td><a href=\"mtasa-1.5.9-rc-21000-1.exe\">mtasa-1.5.9-rc-21000-1.exe</a></td></tr>\n",
    );
    for file in files {
        html.push_str(&format!("<tr><td><a href=\"{file}\">{file}</a></td><td>44M</td></tr>\n"));
    }
    html.push_str("</table></body></html>\n");
    html
}

/// Write an executable shell script (Unix only).
#[cfg(unix)]
pub fn write_script(path: &Path, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create script dir");
    }
    std::fs::write(path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .expect("chmod script");
}

/// A fake server binary that prints `MTA:SA Server v{version}-release-{revision}` for `-v`.
#[cfg(unix)]
pub fn write_fake_server(path: &Path, version: &str, revision: u64) {
    write_script(
        path,
        &format!("[ \"$1\" = \"-v\" ] && echo 'MTA:SA Server v{version}-release-{revision}'"),
    );
}
