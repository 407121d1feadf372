//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests.

#![allow(dead_code)]

use std::time::Duration;

use almacen_engine::{App, AuthClient, ClientConfig, Field, SignInResolution, UiOptions};
use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SIGNIN_PATH: &str = "/auth/signin";

/// Envelope the backend wraps every response in.
pub fn envelope(data: Value) -> Value {
    json!({
        "data": data,
        "error": false,
        "status": 200,
        "message": "OK"
    })
}

pub fn signed_in_body(role: &str) -> Value {
    envelope(json!({
        "token": "eyJhbGciOiJIUzI1NiJ9.test",
        "user": { "id": 7, "username": "erielit", "name": "Eriel" },
        "roles": [{ "id": 1, "name": role }]
    }))
}

/// Mount a sign-in response that only matches the given credentials.
pub async fn mount_signin_for(
    server: &MockServer,
    username: &str,
    password: &str,
    response: ResponseTemplate,
) {
    Mock::given(method("POST"))
        .and(path(SIGNIN_PATH))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({ "username": username, "password": password })))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Mount a sign-in response for any body.
pub async fn mount_signin(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(SIGNIN_PATH))
        .respond_with(response)
        .mount(server)
        .await;
}

pub fn app_for(base_url: &str, options: UiOptions) -> App {
    let config = ClientConfig::new(base_url).with_timeout(Duration::from_secs(5));
    let client = AuthClient::new(&config).expect("client builds");
    App::with_client(client, options)
}

pub fn fill(app: &mut App, username: &str, password: &str) {
    app.set_field(Field::Username, username);
    app.set_field(Field::Password, password);
}

/// Tick the app until the in-flight request resolves.
pub async fn settle(app: &mut App) -> SignInResolution {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(resolution) = app.poll_submission() {
            return resolution;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "sign-in did not resolve in time"
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

/// Address that refuses connections.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

pub fn buffer_text(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut out = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

/// Render one frame of the app into an in-memory terminal.
pub fn render(app: &mut App, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).expect("terminal");
    terminal
        .draw(|frame| almacen_tui::draw(frame, app))
        .expect("draw");
    buffer_text(terminal.backend().buffer())
}
