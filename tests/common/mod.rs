#![allow(dead_code)]

use static_group_sync::config::{
    ApiSettings, Config, API_ACCESS_TOKEN_PATH, API_COMPUTER_GROUP_PATH, CLIENT_ID,
    CLIENT_SECRET, ROOT_URL,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub const TOKEN_PATH: &str = "/api/oauth/token";
pub const GROUP_PATH: &str = "/JSSResource/computergroups/id";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

#[derive(Debug, Clone)]
struct Route {
    method: String,
    path: String,
    status: u16,
    body: String,
    delay: Duration,
}

/// Minimal HTTP/1.1 endpoint with canned responses and a request log.
pub struct MockServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct MockServerBuilder {
    routes: Vec<Route>,
}

impl MockServerBuilder {
    pub fn route(mut self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.routes.push(Route {
            method: method.to_string(),
            path: path.to_string(),
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        });
        self
    }

    pub fn delayed_route(
        mut self,
        method: &str,
        path: &str,
        status: u16,
        body: &str,
        delay: Duration,
    ) -> Self {
        self.routes.push(Route {
            method: method.to_string(),
            path: path.to_string(),
            status,
            body: body.to_string(),
            delay,
        });
        self
    }

    pub fn start(self) -> MockServer {
        let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        std_listener.set_nonblocking(true).unwrap();
        let addr = std_listener.local_addr().unwrap();

        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = requests.clone();
        let routes = Arc::new(self.routes);

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let listener = TcpListener::from_std(std_listener).unwrap();
                loop {
                    let (socket, _) = match listener.accept().await {
                        Ok(conn) => conn,
                        Err(_) => continue,
                    };
                    let routes = routes.clone();
                    let log = log.clone();
                    tokio::spawn(async move {
                        let _ = handle_connection(socket, routes, log).await;
                    });
                }
            });
        });

        MockServer { addr, requests }
    }
}

impl MockServer {
    pub fn builder() -> MockServerBuilder {
        MockServerBuilder { routes: Vec::new() }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_with_method(&self, method: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .collect()
    }
}

async fn handle_connection(
    mut socket: TcpStream,
    routes: Arc<Vec<Route>>,
    log: Arc<Mutex<Vec<RecordedRequest>>>,
) -> std::io::Result<()> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buffer.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find(&buffer, b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();

    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .get("content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);

    let body_start = header_end + 4;
    while buffer.len() < body_start + content_length {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);
    }
    let body_end = buffer.len().min(body_start + content_length);
    let body = String::from_utf8_lossy(&buffer[body_start..body_end]).to_string();

    log.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        headers,
        body,
    });

    let route = routes
        .iter()
        .find(|r| r.method == method && r.path == path)
        .cloned();
    let (status, body) = match route {
        Some(route) => {
            if !route.delay.is_zero() {
                tokio::time::sleep(route.delay).await;
            }
            (route.status, route.body)
        }
        None => (404, "no route".to_string()),
    };

    let response = format!(
        "HTTP/1.1 {} Mock\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    socket.write_all(response.as_bytes()).await?;
    socket.flush().await?;
    socket.shutdown().await?;
    Ok(())
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

pub fn config_pairs(server: &MockServer) -> (Vec<(&'static str, String)>, Vec<(&'static str, String)>) {
    let shared = vec![
        (ROOT_URL, server.url()),
        (API_ACCESS_TOKEN_PATH, TOKEN_PATH.to_string()),
        (API_COMPUTER_GROUP_PATH, GROUP_PATH.to_string()),
    ];
    let secret = vec![
        (CLIENT_ID, "test-client".to_string()),
        (CLIENT_SECRET, "test-secret".to_string()),
    ];
    (shared, secret)
}

pub fn settings_for(server: &MockServer) -> ApiSettings {
    let (shared, secret) = config_pairs(server);
    let to_map = |pairs: Vec<(&str, String)>| {
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<HashMap<_, _>>()
    };
    let config = Config::from_sources(to_map(shared), to_map(secret));
    ApiSettings::from_config(&config)
        .unwrap()
        .with_timeout(Duration::from_secs(5))
}

pub fn write_env_files(dir: &std::path::Path, server: &MockServer) {
    let (shared, secret) = config_pairs(server);
    let render = |pairs: Vec<(&str, String)>| {
        pairs
            .into_iter()
            .map(|(k, v)| format!("{}={}\n", k, v))
            .collect::<String>()
    };
    std::fs::write(dir.join(".env.shared"), render(shared)).unwrap();
    std::fs::write(dir.join(".env.secret"), render(secret)).unwrap();
}

pub fn fixture(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}
